//! A nominal, generic type lattice.
//!
//! Types (classes, parameterized types, arrays, type variables and wildcards) are plain values
//! with structural equality. Facts about declarations come from a [`TypeEnv`]; on top of it the
//! crate answers three questions:
//!
//! - what are the direct and transitive supertypes of a type ([`SupertypeResolver`]),
//! - is a value of one type assignable to another ([`Assignability`]),
//! - which member of a set of types is the most specialized ([`most_specialized`]).
//!
//! [`TypeLattice`] bundles all of them behind one handle.

mod assignable;
mod boxing;
mod env;
mod error;
mod format;
mod lattice;
mod model;
mod specialize;
mod store;
mod subst;
mod supertypes;

pub use assignable::{AssignOptions, Assignability, Variance};
pub use boxing::BoxingTable;
pub use env::{ClassDecl, TypeEnv, WellKnownTypes};
pub use error::TypeError;
pub use lattice::TypeLattice;
pub use model::{
    ArrayType, DeclarationKey, NamedKind, NamedType, ParameterizedType, Type, TypeBounds,
    TypeVariable, WildcardType, TOP_TYPE_NAME,
};
pub use specialize::{closure_where, is_interface_like, most_specialized};
pub use store::{class_type_params, ClassTable};
pub use subst::{
    canonicalize, erased_named, erasure, is_raw, substitute, substitution_for, Substitution,
};
pub use supertypes::{ResolverOptions, SupertypeResolver, TypeSet};
