//! Direct and transitive supertypes with type-argument substitution.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use indexmap::IndexSet;
use parking_lot::RwLock;

use crate::env::{ClassDecl, TypeEnv};
use crate::model::{ArrayType, NamedType, ParameterizedType, Type};
use crate::subst::{erasure, substitute, substitution_for};

/// Insertion-ordered set of types, de-duplicated by structural equality.
pub type TypeSet = IndexSet<Type>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Memoize supertype closures per type.
    ///
    /// The cache is unbounded: it keeps one entry for every distinct type queried until
    /// [`SupertypeResolver::clear_cache`] runs. Long-lived resolvers over open-ended inputs should
    /// clear it periodically or run uncached.
    pub cache_closures: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            cache_closures: true,
        }
    }
}

/// Walks the supertype lattice described by a [`TypeEnv`].
///
/// Declarations the environment cannot describe are resolution gaps: the type simply has no
/// further supertypes. Closures are memoized; the cached value for a type is a pure function of
/// the type and the environment, so concurrent first computations insert equal sets.
pub struct SupertypeResolver<'env> {
    env: &'env dyn TypeEnv,
    options: ResolverOptions,
    closures: RwLock<HashMap<Type, Arc<TypeSet>>>,
}

impl<'env> SupertypeResolver<'env> {
    pub fn new(env: &'env dyn TypeEnv) -> Self {
        Self::with_options(env, ResolverOptions::default())
    }

    pub fn with_options(env: &'env dyn TypeEnv, options: ResolverOptions) -> Self {
        Self {
            env,
            options,
            closures: RwLock::new(HashMap::new()),
        }
    }

    pub fn env(&self) -> &'env dyn TypeEnv {
        self.env
    }

    pub fn options(&self) -> ResolverOptions {
        self.options
    }

    /// Supertypes reachable in one substitution step.
    pub fn direct_supertypes(&self, ty: &Type) -> TypeSet {
        let mut out = TypeSet::new();
        match ty {
            Type::Named(named) => self.named_direct_supertypes(named, &mut out),
            Type::Parameterized(p) => self.parameterized_direct_supertypes(p, &mut out),
            Type::Array(array) => self.array_direct_supertypes(array, &mut out),
            Type::TypeVariable(var) => out.extend(var.bounds().iter().cloned()),
            // Not a lattice node of its own; answer for the effective upper bound.
            Type::Wildcard(wildcard) => return self.direct_supertypes(wildcard.upper()),
        }
        out
    }

    /// Reflexive-transitive closure of [`Self::direct_supertypes`], `ty` first.
    pub fn supertypes(&self, ty: &Type) -> Arc<TypeSet> {
        if !self.options.cache_closures {
            return Arc::new(self.compute_closure(ty));
        }

        if let Some(hit) = self.closures.read().get(ty) {
            return Arc::clone(hit);
        }
        let closure = Arc::new(self.compute_closure(ty));
        Arc::clone(self.closures.write().entry(ty.clone()).or_insert(closure))
    }

    /// Whether `sup` is in the supertype closure of `sub`.
    pub fn is_supertype(&self, sup: &Type, sub: &Type) -> bool {
        self.supertypes(sub).contains(sup)
    }

    /// Number of memoized closures.
    pub fn cached_closures(&self) -> usize {
        self.closures.read().len()
    }

    /// Drop memoized closures, e.g. after the environment changed.
    pub fn clear_cache(&mut self) {
        self.closures.get_mut().clear();
    }

    fn compute_closure(&self, ty: &Type) -> TypeSet {
        let mut visited = TypeSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(ty.clone());

        while let Some(current) = queue.pop_front() {
            if visited.contains(&current) {
                continue;
            }
            let direct = self.direct_supertypes(&current);
            visited.insert(current);
            for sup in direct {
                if !visited.contains(&sup) {
                    queue.push_back(sup);
                }
            }
        }

        visited
    }

    fn declaration(&self, named: &NamedType) -> Option<&'env ClassDecl> {
        let decl = self.env.class_of(named);
        if decl.is_none() {
            tracing::debug!(
                target: "typelattice.supertypes",
                ty = %named,
                "no declaration available; treating type as having no supertypes"
            );
        }
        decl
    }

    fn named_direct_supertypes(&self, named: &NamedType, out: &mut TypeSet) {
        if named.is_top() || named.is_primitive() {
            return;
        }
        let Some(decl) = self.declaration(named) else {
            return;
        };

        // A raw use of a generic declaration only has raw supertypes.
        let raw = !decl.type_params.is_empty();
        for sup in decl.declared_supertypes() {
            out.insert(if raw { erasure(sup) } else { sup.clone() });
        }

        // Interfaces without super-interfaces (and classes without a superclass) hang off the top
        // so the lattice stays connected.
        if out.is_empty() {
            out.insert(Type::object());
        }
    }

    fn parameterized_direct_supertypes(&self, p: &ParameterizedType, out: &mut TypeSet) {
        let Some(decl) = self.declaration(p.raw()) else {
            return;
        };

        let mut subst = substitution_for(decl, p.args());
        // Member types may mention the type parameters of their owner.
        if let Some(Type::Parameterized(owner)) = p.owner() {
            if let Some(owner_decl) = self.env.class_of(owner.raw()) {
                for (var, arg) in substitution_for(owner_decl, owner.args()) {
                    subst.entry(var).or_insert(arg);
                }
            }
        }

        for sup in decl.declared_supertypes() {
            out.insert(substitute(sup, &subst));
        }
        if out.is_empty() && !p.raw().is_top() {
            out.insert(Type::object());
        }
    }

    fn array_direct_supertypes(&self, array: &ArrayType, out: &mut TypeSet) {
        // Arrays are covariant in their component type.
        for sup in self.direct_supertypes(array.component()) {
            out.insert(Type::array(sup));
        }

        let well_known = self.env.well_known();
        out.insert(Type::object());
        out.insert(Type::Named(well_known.cloneable.clone()));
        out.insert(Type::Named(well_known.serializable.clone()));
    }
}

impl std::fmt::Debug for SupertypeResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupertypeResolver")
            .field("options", &self.options)
            .field("cached_closures", &self.closures.read().len())
            .finish_non_exhaustive()
    }
}
