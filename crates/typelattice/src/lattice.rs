//! [`TypeLattice`], one handle over the resolver, assignability and specialization.

use std::sync::Arc;

use crate::assignable::{AssignOptions, Assignability};
use crate::boxing::BoxingTable;
use crate::env::TypeEnv;
use crate::model::Type;
use crate::specialize;
use crate::supertypes::{ResolverOptions, SupertypeResolver, TypeSet};

/// Entry point bundling a [`SupertypeResolver`] with the [`BoxingTable`] used by assignability
/// queries.
///
/// ```
/// use typelattice::{AssignOptions, ClassTable, Type, TypeLattice};
///
/// let table = ClassTable::with_minimal_jdk();
/// let lattice = TypeLattice::new(&table);
/// let number: Type = table.named("java.lang.Number").unwrap().into();
/// let integer: Type = table.named("java.lang.Integer").unwrap().into();
/// assert!(lattice.is_assignable(&number, &integer, AssignOptions::default()));
/// ```
#[derive(Debug)]
pub struct TypeLattice<'env> {
    resolver: SupertypeResolver<'env>,
    boxing: BoxingTable,
}

impl<'env> TypeLattice<'env> {
    pub fn new(env: &'env dyn TypeEnv) -> Self {
        Self::with_options(env, ResolverOptions::default())
    }

    pub fn with_options(env: &'env dyn TypeEnv, options: ResolverOptions) -> Self {
        Self {
            resolver: SupertypeResolver::with_options(env, options),
            boxing: BoxingTable::default(),
        }
    }

    pub fn with_boxing_table(mut self, boxing: BoxingTable) -> Self {
        self.boxing = boxing;
        self
    }

    pub fn env(&self) -> &'env dyn TypeEnv {
        self.resolver.env()
    }

    pub fn resolver(&self) -> &SupertypeResolver<'env> {
        &self.resolver
    }

    pub fn boxing_table(&self) -> &BoxingTable {
        &self.boxing
    }

    pub fn assignability(&self) -> Assignability<'_, 'env> {
        Assignability::new(&self.resolver, &self.boxing)
    }

    pub fn direct_supertypes(&self, ty: &Type) -> TypeSet {
        self.resolver.direct_supertypes(ty)
    }

    pub fn supertypes(&self, ty: &Type) -> Arc<TypeSet> {
        self.resolver.supertypes(ty)
    }

    pub fn is_supertype(&self, sup: &Type, sub: &Type) -> bool {
        self.resolver.is_supertype(sup, sub)
    }

    pub fn is_assignable(&self, receiver: &Type, payload: &Type, options: AssignOptions) -> bool {
        self.assignability()
            .is_assignable(receiver, payload, options)
    }

    pub fn most_specialized(&self, types: &[Type], want_interfaces: bool) -> Option<Type> {
        specialize::most_specialized(&self.resolver, types, want_interfaces)
    }

    pub fn closure_where(&self, ty: &Type, legal: impl FnMut(&Type) -> bool) -> TypeSet {
        specialize::closure_where(&self.resolver, ty, legal)
    }

    /// Forget memoized supertype closures.
    pub fn clear_cache(&mut self) {
        self.resolver.clear_cache();
    }
}
