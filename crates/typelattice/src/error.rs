//! Construction-time errors for type values and class tables.

use thiserror::Error;

/// Errors raised while building a [`crate::Type`] or registering a [`crate::ClassDecl`].
///
/// The lattice algorithms never produce these: anything that reaches them has already been
/// validated at construction time.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    /// A parameterized type was given the wrong number of type arguments.
    #[error("`{raw}` declares {expected} type parameter(s) but {actual} argument(s) were supplied")]
    ArityMismatch {
        raw: String,
        expected: usize,
        actual: usize,
    },

    /// A wildcard was given more than one upper or more than one lower bound.
    #[error("wildcard accepts at most one {which} bound, got {count}")]
    TooManyBounds { which: &'static str, count: usize },

    /// A wildcard was given both a lower bound and an upper bound other than the universal top.
    #[error("wildcard cannot combine `super {lower}` with `extends {upper}`")]
    ConflictingWildcardBounds { upper: String, lower: String },

    /// A bound of a wildcard or type variable is not a reference type.
    #[error("`{bound}` is not a valid bound: bounds must be reference types")]
    InvalidBound { bound: String },

    /// A type variable bound by another type variable declared further bounds.
    #[error("type variable `{name}` is bounded by a type variable and cannot declare further bounds")]
    MixedTypeVariableBound { name: String },

    /// A type argument of a parameterized type is not a reference type.
    #[error("`{argument}` is not a valid type argument for `{raw}`")]
    InvalidTypeArgument { raw: String, argument: String },

    /// A primitive type was used as the raw type of a parameterized type.
    #[error("`{raw}` cannot be parameterized")]
    InvalidRawType { raw: String },

    /// `bind_bounds` was called on a type variable whose bounds were already fixed.
    #[error("bounds of type variable `{name}` are already bound")]
    BoundsAlreadyBound { name: String },

    /// A class with the same qualified name is already registered.
    #[error("class `{name}` is already defined")]
    DuplicateClass { name: String },

    /// A class referenced during registration is not known to the table.
    #[error("unknown class `{name}`")]
    UnknownClass { name: String },
}
