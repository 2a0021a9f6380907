use pretty_assertions::assert_eq;
use typelattice::{is_interface_like, ClassTable, Type, TypeLattice};

fn ty(table: &ClassTable, name: &str) -> Type {
    table.named(name).unwrap().into()
}

#[test]
fn most_specialized_class_and_interface() {
    let table = ClassTable::with_minimal_jdk();
    let lattice = TypeLattice::new(&table);
    let integer = ty(&table, "java.lang.Integer");
    let comparable = ty(&table, "java.lang.Comparable");

    let set = [
        integer.clone(),
        ty(&table, "java.lang.Number"),
        Type::object(),
        comparable.clone(),
    ];
    assert_eq!(lattice.most_specialized(&set, false), Some(integer));
    assert_eq!(lattice.most_specialized(&set, true), Some(comparable));
}

#[test]
fn most_specialized_interface_chain() {
    let table = ClassTable::with_minimal_jdk();
    let lattice = TypeLattice::new(&table);
    let set = [
        ty(&table, "java.lang.Iterable"),
        ty(&table, "java.util.List"),
        ty(&table, "java.util.Collection"),
        ty(&table, "java.util.ArrayList"),
    ];
    assert_eq!(
        lattice.most_specialized(&set, true),
        Some(ty(&table, "java.util.List"))
    );
    assert_eq!(
        lattice.most_specialized(&set, false),
        Some(ty(&table, "java.util.ArrayList"))
    );
}

#[test]
fn incomparable_members_yield_one_of_them() {
    let table = ClassTable::with_minimal_jdk();
    let lattice = TypeLattice::new(&table);
    let string = ty(&table, "java.lang.String");
    let integer = ty(&table, "java.lang.Integer");

    let picked = lattice
        .most_specialized(&[string.clone(), integer.clone(), Type::object()], false)
        .expect("class members present");
    assert!(picked == string || picked == integer);
}

#[test]
fn legal_bean_types_via_closure_where() {
    let table = ClassTable::with_minimal_jdk();
    let lattice = TypeLattice::new(&table);
    let string = ty(&table, "java.lang.String");
    let array_list_string = Type::parameterized(
        table.named("java.util.ArrayList").unwrap(),
        vec![string],
    )
    .unwrap();

    // Caller-supplied policy: only interfaces, never the universal top.
    let legal = lattice.closure_where(&array_list_string, |t| is_interface_like(t) && !t.is_top());
    let names: Vec<String> = legal.iter().map(|t| t.to_string()).collect();
    assert_eq!(
        names,
        vec![
            "java.util.List<java.lang.String>",
            "java.lang.Cloneable",
            "java.io.Serializable",
            "java.util.Collection<java.lang.String>",
            "java.lang.Iterable<java.lang.String>",
        ]
    );
}
