use proptest::prelude::*;
use typelattice::{
    AssignOptions, ClassTable, NamedKind, NamedType, ParameterizedType, Type, TypeLattice,
    WildcardType,
};

const PROPTEST_CASES: u32 = 128;

fn list() -> NamedType {
    NamedType::interface("java.util.List", 1)
}

fn array_list() -> NamedType {
    NamedType::class("java.util.ArrayList", 1)
}

fn hash_map() -> NamedType {
    NamedType::class("java.util.HashMap", 2)
}

fn arb_leaf() -> impl Strategy<Value = Type> {
    prop::sample::select(vec![
        ("java.lang.Object", NamedKind::Class, 0),
        ("java.lang.String", NamedKind::Class, 0),
        ("java.lang.Integer", NamedKind::Class, 0),
        ("java.lang.Number", NamedKind::Class, 0),
        ("java.lang.Boolean", NamedKind::Class, 0),
        ("java.io.Serializable", NamedKind::Interface, 0),
        // Raw uses of generic declarations.
        ("java.util.List", NamedKind::Interface, 1),
        ("java.lang.Comparable", NamedKind::Interface, 1),
    ])
    .prop_map(|(name, kind, arity)| NamedType::new(name, kind, arity).into())
}

fn arb_type() -> impl Strategy<Value = Type> {
    arb_leaf().prop_recursive(3, 24, 2, |inner| {
        let arg = prop_oneof![
            4 => inner.clone(),
            1 => Just(Type::unbounded_wildcard()),
            1 => inner
                .clone()
                .prop_map(|t| Type::wildcard_extends(t).expect("reference bound")),
            1 => inner
                .clone()
                .prop_map(|t| Type::wildcard_super(t).expect("reference bound")),
        ]
        .boxed();

        prop_oneof![
            inner.prop_map(Type::array),
            arg.clone()
                .prop_map(|a| Type::parameterized(list(), vec![a]).expect("arity 1")),
            arg.clone()
                .prop_map(|a| Type::parameterized(array_list(), vec![a]).expect("arity 1")),
            (arg.clone(), arg)
                .prop_map(|(k, v)| Type::parameterized(hash_map(), vec![k, v]).expect("arity 2")),
        ]
    })
}

/// Deep copy sharing no nodes with `ty`.
fn rebuild(ty: &Type) -> Type {
    match ty {
        Type::Named(named) => NamedType::new(named.name(), named.kind(), named.arity()).into(),
        Type::Parameterized(p) => ParameterizedType::new(
            p.owner().map(rebuild),
            NamedType::new(p.raw().name(), p.raw().kind(), p.raw().arity()),
            p.args().iter().map(rebuild).collect(),
        )
        .expect("copy of a valid type")
        .into(),
        Type::Array(array) => Type::array(rebuild(array.component())),
        Type::TypeVariable(var) => var.clone().into(),
        Type::Wildcard(wildcard) => WildcardType::new(
            wildcard.upper_bounds().iter().map(rebuild).collect(),
            wildcard.lower_bounds().iter().map(rebuild).collect(),
        )
        .expect("copy of a valid wildcard")
        .into(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: PROPTEST_CASES, .. ProptestConfig::default() })]

    #[test]
    fn rebuilt_types_are_equal_with_equal_hashes(ty in arb_type()) {
        let copy = rebuild(&ty);
        prop_assert_eq!(&copy, &ty);
        prop_assert_eq!(copy.structural_hash(), ty.structural_hash());
        prop_assert_eq!(copy.to_string(), ty.to_string());
    }

    #[test]
    fn every_type_accepts_itself(ty in arb_type()) {
        let table = ClassTable::with_minimal_jdk();
        let lattice = TypeLattice::new(&table);
        prop_assert!(lattice.is_assignable(&ty, &ty, AssignOptions::covariant()));
        prop_assert!(lattice.is_assignable(&ty, &ty, AssignOptions::invariant()));
    }

    #[test]
    fn supertype_closure_is_reflexive_and_accepting(ty in arb_type()) {
        let table = ClassTable::with_minimal_jdk();
        let lattice = TypeLattice::new(&table);
        let closure = lattice.supertypes(&ty);

        prop_assert_eq!(closure.first(), Some(&ty));
        for sup in closure.iter() {
            prop_assert!(
                lattice.is_assignable(sup, &ty, AssignOptions::covariant()),
                "{} should accept {}",
                sup,
                ty
            );
        }
    }
}
