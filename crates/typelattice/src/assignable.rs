//! Covariant / invariant assignability.
//!
//! `receiver` accepts `payload` when a value of type `payload` may be used where `receiver` is
//! expected. Top-level comparisons are covariant; type arguments are compared invariantly except
//! through wildcards, which always reintroduce covariance for their own bounds.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::boxing::BoxingTable;
use crate::model::{NamedType, ParameterizedType, Type, TypeVariable, WildcardType};
use crate::subst::{erased_named, is_raw};
use crate::supertypes::SupertypeResolver;

/// Rule set used for the top-level comparison.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Variance {
    /// Exact match, except through wildcards.
    Invariant,
    /// Nominal subtyping with invariant type arguments.
    #[default]
    Covariant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignOptions {
    pub variance: Variance,
    /// Box primitive operands before comparing them.
    pub boxing: bool,
}

impl Default for AssignOptions {
    fn default() -> Self {
        Self::covariant()
    }
}

impl AssignOptions {
    pub fn covariant() -> Self {
        Self {
            variance: Variance::Covariant,
            boxing: true,
        }
    }

    pub fn invariant() -> Self {
        Self {
            variance: Variance::Invariant,
            boxing: true,
        }
    }

    pub fn with_boxing(mut self, boxing: bool) -> Self {
        self.boxing = boxing;
        self
    }
}

/// Assignability checks over the lattice described by a [`SupertypeResolver`].
#[derive(Debug, Clone, Copy)]
pub struct Assignability<'a, 'env> {
    resolver: &'a SupertypeResolver<'env>,
    boxing: &'a BoxingTable,
}

/// Type-variable payloads currently being widened to their bounds, per receiver. Self-referential
/// bounds can lead the comparison back to a pair it is already deciding.
#[derive(Default)]
struct Walk {
    expanding: Vec<(Type, TypeVariable)>,
}

impl<'a, 'env> Assignability<'a, 'env> {
    pub fn new(resolver: &'a SupertypeResolver<'env>, boxing: &'a BoxingTable) -> Self {
        Self { resolver, boxing }
    }

    pub fn is_assignable(&self, receiver: &Type, payload: &Type, options: AssignOptions) -> bool {
        // Boxing happens here and only here, for both operands alike.
        let (receiver, payload) = if options.boxing {
            (self.boxing.box_type(receiver), self.boxing.box_type(payload))
        } else {
            (receiver.clone(), payload.clone())
        };

        let mut walk = Walk::default();
        match options.variance {
            Variance::Covariant => self.covariant(&receiver, &payload, &mut walk),
            Variance::Invariant => self.invariant(&receiver, &payload, &mut walk),
        }
    }

    fn covariant(&self, receiver: &Type, payload: &Type, walk: &mut Walk) -> bool {
        match (receiver, payload) {
            (Type::Wildcard(r), Type::Wildcard(p)) => self.wildcard_accepts_wildcard(r, p, walk),
            (Type::Wildcard(r), _) => {
                self.covariant(r.upper(), payload, walk)
                    && r.lower()
                        .map_or(true, |lower| self.covariant(payload, lower, walk))
            }

            (Type::TypeVariable(r), Type::TypeVariable(p)) => type_variable_accepts(r, p),
            (Type::TypeVariable(_), _) => false,

            (_, Type::TypeVariable(p)) => self.accepts_any_bound(receiver, p, walk),
            (_, Type::Wildcard(_)) => false,

            (Type::Named(r), Type::Named(_) | Type::Parameterized(_) | Type::Array(_)) => {
                self.nominally_contains(r, payload)
            }

            (Type::Parameterized(r), Type::Named(_)) => {
                self.parameterized_accepts_named(r, payload, walk)
            }
            (Type::Parameterized(r), Type::Parameterized(_)) => {
                self.nominally_contains(r.raw(), payload)
                    && self.has_matching_ancestor(r, payload, walk)
            }
            (Type::Parameterized(_), Type::Array(_)) => false,

            // Covariant on components, as the modeled language does (unsound for writes).
            (Type::Array(r), Type::Array(p)) => self.covariant(r.component(), p.component(), walk),
            (Type::Array(_), Type::Named(_) | Type::Parameterized(_)) => false,
        }
    }

    fn invariant(&self, receiver: &Type, payload: &Type, walk: &mut Walk) -> bool {
        match (receiver, payload) {
            (Type::Wildcard(_), _) | (_, Type::Wildcard(_)) => {
                self.covariant(receiver, payload, walk)
            }
            (Type::Named(r), Type::Named(p)) => r == p,
            (Type::Parameterized(r), Type::Parameterized(p)) => {
                r.raw() == p.raw() && self.same_arguments(r, p, walk)
            }
            (Type::TypeVariable(r), Type::TypeVariable(p)) => r == p,
            (Type::Array(r), Type::Array(p)) => self.invariant(r.component(), p.component(), walk),
            _ => false,
        }
    }

    fn wildcard_accepts_wildcard(
        &self,
        receiver: &WildcardType,
        payload: &WildcardType,
        walk: &mut Walk,
    ) -> bool {
        if !self.covariant(receiver.upper(), payload.upper(), walk) {
            return false;
        }
        match (receiver.lower(), payload.lower()) {
            (Some(r), Some(p)) => self.covariant(p, r, walk),
            (Some(_), None) => false,
            // Only `?` accepts a lower-bounded wildcard.
            (None, Some(_)) => receiver.upper().is_top(),
            (None, None) => true,
        }
    }

    fn accepts_any_bound(&self, receiver: &Type, payload: &TypeVariable, walk: &mut Walk) -> bool {
        if walk
            .expanding
            .iter()
            .any(|(r, p)| r == receiver && p == payload)
        {
            return false;
        }

        walk.expanding.push((receiver.clone(), payload.clone()));
        let accepted = payload
            .bounds()
            .iter()
            .any(|bound| self.covariant(receiver, bound, walk));
        walk.expanding.pop();
        accepted
    }

    /// Whether some supertype of `payload` erases to `receiver`.
    fn nominally_contains(&self, receiver: &NamedType, payload: &Type) -> bool {
        self.resolver
            .supertypes(payload)
            .iter()
            .any(|sup| erased_named(sup).as_ref() == Some(receiver))
    }

    /// Whether `payload` has a parameterized ancestor with `receiver`'s raw type whose arguments
    /// match `receiver`'s invariantly.
    fn has_matching_ancestor(
        &self,
        receiver: &ParameterizedType,
        payload: &Type,
        walk: &mut Walk,
    ) -> bool {
        let supertypes = self.resolver.supertypes(payload);
        supertypes
            .iter()
            .filter_map(Type::as_parameterized)
            .filter(|ancestor| ancestor.raw() == receiver.raw())
            .any(|ancestor| self.same_arguments(receiver, ancestor, walk))
    }

    fn parameterized_accepts_named(
        &self,
        receiver: &ParameterizedType,
        payload: &Type,
        walk: &mut Walk,
    ) -> bool {
        if !self.nominally_contains(receiver.raw(), payload) {
            return false;
        }
        if self.has_matching_ancestor(receiver, payload, walk) {
            return true;
        }

        // A raw use of a generic declaration still matches through erasure.
        let raw_use = is_raw(self.resolver.env(), payload);
        if raw_use {
            tracing::debug!(
                target: "typelattice.assignable",
                receiver = %Type::Parameterized(receiver.clone()),
                payload = %payload,
                "no substituted ancestor matches; accepting raw payload by erasure"
            );
        }
        raw_use
    }

    fn same_arguments(
        &self,
        receiver: &ParameterizedType,
        payload: &ParameterizedType,
        walk: &mut Walk,
    ) -> bool {
        let owners_match = match (receiver.owner(), payload.owner()) {
            (Some(r), Some(p)) => self.invariant(r, p, walk),
            _ => true,
        };
        owners_match
            && receiver.args().len() == payload.args().len()
            && receiver
                .args()
                .iter()
                .zip(payload.args())
                .all(|(r, p)| self.invariant(r, p, walk))
    }
}

/// `receiver` is `payload`, or is reached from it through a chain of sole type-variable bounds.
fn type_variable_accepts(receiver: &TypeVariable, payload: &TypeVariable) -> bool {
    let mut seen = HashSet::new();
    let mut current = payload.clone();
    loop {
        if current == *receiver {
            return true;
        }
        if !seen.insert(current.clone()) {
            return false;
        }
        match &*current.bounds() {
            [Type::TypeVariable(next)] => current = next.clone(),
            _ => return false,
        }
    }
}
