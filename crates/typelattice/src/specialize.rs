//! Selection of the most specialized member of a set of types.

use indexmap::IndexSet;

use crate::model::Type;
use crate::subst::erased_named;
use crate::supertypes::{SupertypeResolver, TypeSet};

/// Whether `ty` erases to an interface. Arrays, primitives and classes are not interface-like.
pub fn is_interface_like(ty: &Type) -> bool {
    erased_named(ty).is_some_and(|named| named.is_interface())
}

/// Most specialized member of `types` among those whose interface-likeness equals
/// `want_interfaces`, or `None` when no member qualifies.
///
/// Members are visited in input order and the candidate is replaced by any qualifying member
/// below it. When the qualifying members have several incomparable minimal elements the result is
/// whichever the visiting order reaches first; callers must not rely on which one that is.
pub fn most_specialized(
    resolver: &SupertypeResolver<'_>,
    types: &[Type],
    want_interfaces: bool,
) -> Option<Type> {
    let qualifying: IndexSet<&Type> = types
        .iter()
        .filter(|ty| is_interface_like(ty) == want_interfaces)
        .collect();

    let mut best: Option<Type> = None;
    for member in &qualifying {
        // The closure starts with `member` itself.
        for sup in resolver.supertypes(member).iter() {
            if !qualifying.contains(sup) {
                continue;
            }
            let promote = match &best {
                None => true,
                Some(current) => current != sup && resolver.is_supertype(current, sup),
            };
            if promote {
                best = Some(sup.clone());
            }
        }
    }
    best
}

/// The supertype closure of `ty` restricted to the members `legal` accepts, in closure order.
pub fn closure_where(
    resolver: &SupertypeResolver<'_>,
    ty: &Type,
    mut legal: impl FnMut(&Type) -> bool,
) -> TypeSet {
    resolver
        .supertypes(ty)
        .iter()
        .filter(|sup| legal(sup))
        .cloned()
        .collect()
}
