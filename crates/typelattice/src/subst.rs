//! Type-variable substitution, erasure and canonical forms.

use std::collections::{HashMap, HashSet};

use crate::env::{ClassDecl, TypeEnv};
use crate::model::{NamedType, ParameterizedType, Type, TypeVariable, WildcardType};

/// Mapping from formal type parameters to actual type arguments.
///
/// Keys are type variables, whose identity is name + declaration site, so two declarations that
/// both call their parameter `T` never collide.
pub type Substitution = HashMap<TypeVariable, Type>;

/// Substitution mapping `decl`'s type parameters to `args` positionally.
pub fn substitution_for(decl: &ClassDecl, args: &[Type]) -> Substitution {
    decl.type_params
        .iter()
        .cloned()
        .zip(args.iter().cloned())
        .collect()
}

/// Replace every type variable in `subst` throughout `ty`.
///
/// Bounds of type variables are not rewritten: a variable that is not a key stays as-is.
pub fn substitute(ty: &Type, subst: &Substitution) -> Type {
    if subst.is_empty() {
        return ty.clone();
    }

    match ty {
        Type::Named(_) => ty.clone(),
        Type::TypeVariable(var) => subst.get(var).cloned().unwrap_or_else(|| ty.clone()),
        Type::Parameterized(p) => Type::Parameterized(substitute_parameterized(p, subst)),
        Type::Array(array) => {
            let component = substitute(array.component(), subst);
            if component == *array.component() {
                ty.clone()
            } else {
                Type::array(component)
            }
        }
        Type::Wildcard(wildcard) => Type::Wildcard(substitute_wildcard(wildcard, subst)),
    }
}

fn substitute_parameterized(p: &ParameterizedType, subst: &Substitution) -> ParameterizedType {
    let owner = p.owner().map(|owner| substitute(owner, subst));
    let args: Vec<Type> = p.args().iter().map(|arg| substitute(arg, subst)).collect();
    if owner.as_ref() == p.owner() && args.as_slice() == p.args() {
        return p.clone();
    }
    p.with_parts(owner, args)
}

fn substitute_wildcard(wildcard: &WildcardType, subst: &Substitution) -> WildcardType {
    match wildcard.lower() {
        Some(lower) => match substitute(lower, subst) {
            // `? super (? super L)` is `? super L`; any other wildcard collapses to `?`.
            Type::Wildcard(inner) => match inner.lower() {
                Some(l) => WildcardType::from_parts(Type::object(), Some(l.clone())),
                None => WildcardType::unbounded(),
            },
            lower => WildcardType::from_parts(Type::object(), Some(lower)),
        },
        None => match substitute(wildcard.upper(), subst) {
            Type::Wildcard(inner) if inner.lower().is_none() => inner,
            Type::Wildcard(_) => WildcardType::unbounded(),
            upper => WildcardType::from_parts(upper, None),
        },
    }
}

/// Erasure of `ty`: type arguments dropped, type variables and wildcards replaced by the erasure
/// of their (first) upper bound.
pub fn erasure(ty: &Type) -> Type {
    match ty {
        Type::Named(_) => ty.clone(),
        Type::Parameterized(p) => Type::Named(p.raw().clone()),
        Type::Array(array) => Type::array(erasure(array.component())),
        Type::TypeVariable(var) => erase_type_variable(var),
        Type::Wildcard(wildcard) => erasure(wildcard.upper()),
    }
}

fn erase_type_variable(var: &TypeVariable) -> Type {
    let mut seen = HashSet::new();
    let mut current = var.clone();
    loop {
        if !seen.insert(current.clone()) {
            return Type::object();
        }
        match current.bounds().first() {
            Some(Type::TypeVariable(next)) => current = next.clone(),
            Some(bound) => return erasure(bound),
            None => return Type::object(),
        }
    }
}

/// The named type `ty` erases to, if it erases to a class or interface.
pub fn erased_named(ty: &Type) -> Option<NamedType> {
    match erasure(ty) {
        Type::Named(named) => Some(named),
        _ => None,
    }
}

/// Canonical form of `ty`: a raw use of a generic declaration becomes the declaration
/// parameterized by its own type parameters (`List` -> `List<E>`), recursively through arrays.
///
/// Types the environment cannot describe are returned unchanged.
pub fn canonicalize(env: &dyn TypeEnv, ty: &Type) -> Type {
    match ty {
        Type::Named(named) if !named.is_primitive() => {
            let Some(decl) = env.class_of(named) else {
                return ty.clone();
            };
            if decl.type_params.is_empty() {
                return ty.clone();
            }
            let args = decl.type_params.iter().cloned().map(Type::from).collect();
            ParameterizedType::new(None, decl.ty.clone(), args)
                .map(Type::Parameterized)
                .unwrap_or_else(|_| ty.clone())
        }
        Type::Array(array) => {
            let component = canonicalize(env, array.component());
            if component == *array.component() {
                ty.clone()
            } else {
                Type::array(component)
            }
        }
        _ => ty.clone(),
    }
}

/// Whether `ty` is a raw use of a generic declaration (its canonical form differs from itself).
pub fn is_raw(env: &dyn TypeEnv, ty: &Type) -> bool {
    canonicalize(env, ty) != *ty
}
