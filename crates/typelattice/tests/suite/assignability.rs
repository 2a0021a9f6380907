use typelattice::{
    AssignOptions, ClassDecl, ClassTable, DeclarationKey, NamedType, Type, TypeEnv, TypeLattice,
    TypeVariable, Variance,
};

struct Jdk {
    table: ClassTable,
}

impl Jdk {
    fn new() -> Self {
        Self {
            table: ClassTable::with_minimal_jdk(),
        }
    }

    fn ty(&self, name: &str) -> Type {
        self.table
            .named(name)
            .unwrap_or_else(|| panic!("{name} should be defined"))
            .into()
    }

    fn generic(&self, name: &str, args: Vec<Type>) -> Type {
        Type::parameterized(self.table.named(name).unwrap(), args).expect("well-formed type")
    }
}

fn covariant() -> AssignOptions {
    AssignOptions::default()
}

#[test]
fn list_of_string_is_a_collection_of_string() {
    let jdk = Jdk::new();
    let lattice = TypeLattice::new(&jdk.table);
    let string = jdk.ty("java.lang.String");

    let collection = jdk.generic("java.util.Collection", vec![string.clone()]);
    let list = jdk.generic("java.util.List", vec![string.clone()]);
    assert!(lattice.is_assignable(&collection, &list, covariant()));
    assert!(!lattice.is_assignable(&list, &collection, covariant()));

    let collection_object = jdk.generic("java.util.Collection", vec![Type::object()]);
    assert!(!lattice.is_assignable(&collection_object, &list, covariant()));
}

#[test]
fn extends_wildcard_receiver() {
    let jdk = Jdk::new();
    let lattice = TypeLattice::new(&jdk.table);
    let extends_number = Type::wildcard_extends(jdk.ty("java.lang.Number")).unwrap();

    assert!(lattice.is_assignable(&extends_number, &jdk.ty("java.lang.Integer"), covariant()));
    assert!(!lattice.is_assignable(&extends_number, &Type::object(), covariant()));
}

#[test]
fn super_wildcard_receiver() {
    let jdk = Jdk::new();
    let lattice = TypeLattice::new(&jdk.table);
    let super_integer = Type::wildcard_super(jdk.ty("java.lang.Integer")).unwrap();

    assert!(lattice.is_assignable(&super_integer, &jdk.ty("java.lang.Number"), covariant()));
    assert!(lattice.is_assignable(&super_integer, &jdk.ty("java.lang.Integer"), covariant()));
    assert!(lattice.is_assignable(&super_integer, &Type::object(), covariant()));
    assert!(!lattice.is_assignable(&super_integer, &jdk.ty("java.lang.Short"), covariant()));
}

#[test]
fn wildcard_arguments_inside_parameterized_types() {
    let jdk = Jdk::new();
    let lattice = TypeLattice::new(&jdk.table);
    let integer = jdk.ty("java.lang.Integer");
    let number = jdk.ty("java.lang.Number");

    let list_extends_number = jdk.generic(
        "java.util.List",
        vec![Type::wildcard_extends(number.clone()).unwrap()],
    );
    let list_super_integer = jdk.generic(
        "java.util.List",
        vec![Type::wildcard_super(integer.clone()).unwrap()],
    );
    let list_any = jdk.generic("java.util.List", vec![Type::unbounded_wildcard()]);
    let array_list_integer = jdk.generic("java.util.ArrayList", vec![integer.clone()]);
    let array_list_number = jdk.generic("java.util.ArrayList", vec![number]);
    let array_list_string = jdk.generic("java.util.ArrayList", vec![jdk.ty("java.lang.String")]);

    assert!(lattice.is_assignable(&list_extends_number, &array_list_integer, covariant()));
    assert!(!lattice.is_assignable(&list_extends_number, &array_list_string, covariant()));
    assert!(lattice.is_assignable(&list_super_integer, &array_list_number, covariant()));
    assert!(!lattice.is_assignable(&list_super_integer, &array_list_string, covariant()));
    assert!(lattice.is_assignable(&list_any, &array_list_string, covariant()));
    assert!(lattice.is_assignable(&list_any, &list_super_integer, covariant()));
    assert!(!lattice.is_assignable(&list_extends_number, &list_any, covariant()));
}

#[test]
fn covariant_reflexivity() {
    let jdk = Jdk::new();
    let lattice = TypeLattice::new(&jdk.table);
    let string = jdk.ty("java.lang.String");
    let e: Type = jdk.table.class("java.lang.Enum").unwrap().type_params[0]
        .clone()
        .into();

    for t in [
        Type::object(),
        string.clone(),
        Type::array(Type::array(string.clone())),
        jdk.generic("java.util.Map", vec![string.clone(), Type::unbounded_wildcard()]),
        jdk.generic("java.util.List", vec![Type::wildcard_super(string).unwrap()]),
        jdk.ty("java.util.List"),
        e,
        Type::from(NamedType::primitive("int")),
    ] {
        assert!(lattice.is_assignable(&t, &t, covariant()), "{t} should accept itself");
        assert!(
            lattice.is_assignable(&t, &t, AssignOptions::invariant()),
            "{t} should accept itself invariantly"
        );
    }
}

#[test]
fn nominal_assignability_is_transitive() {
    let jdk = Jdk::new();
    let lattice = TypeLattice::new(&jdk.table);
    let integer = jdk.ty("java.lang.Integer");
    let number = jdk.ty("java.lang.Number");
    let serializable = jdk.ty("java.io.Serializable");

    assert!(lattice.is_assignable(&number, &integer, covariant()));
    assert!(lattice.is_assignable(&serializable, &number, covariant()));
    assert!(lattice.is_assignable(&serializable, &integer, covariant()));
}

#[test]
fn parameterized_assignability_is_transitive() {
    let jdk = Jdk::new();
    let lattice = TypeLattice::new(&jdk.table);
    let string = jdk.ty("java.lang.String");

    let iterable = jdk.generic("java.lang.Iterable", vec![string.clone()]);
    let collection = jdk.generic("java.util.Collection", vec![string.clone()]);
    let array_list = jdk.generic("java.util.ArrayList", vec![string]);

    assert!(lattice.is_assignable(&iterable, &collection, covariant()));
    assert!(lattice.is_assignable(&collection, &array_list, covariant()));
    assert!(lattice.is_assignable(&iterable, &array_list, covariant()));
    assert!(!lattice.is_assignable(&array_list, &iterable, covariant()));
}

#[test]
fn transitivity_holds_through_wildcard_arguments() {
    let jdk = Jdk::new();
    let lattice = TypeLattice::new(&jdk.table);
    let integer = jdk.ty("java.lang.Integer");
    let some_number = Type::wildcard_extends(jdk.ty("java.lang.Number")).unwrap();

    let numbers = jdk.generic("java.util.Collection", vec![some_number]);
    let list = jdk.generic("java.util.List", vec![integer.clone()]);
    let array_list = jdk.generic("java.util.ArrayList", vec![integer]);

    assert!(lattice.is_assignable(&numbers, &list, covariant()));
    assert!(lattice.is_assignable(&list, &array_list, covariant()));
    assert!(lattice.is_assignable(&numbers, &array_list, covariant()));
}

#[test]
fn arrays_are_covariant() {
    let jdk = Jdk::new();
    let lattice = TypeLattice::new(&jdk.table);
    let numbers = Type::array(jdk.ty("java.lang.Number"));
    let integers = Type::array(jdk.ty("java.lang.Integer"));

    // Accepted even though storing a Double into the Integer[] would fail at runtime.
    assert!(lattice.is_assignable(&numbers, &integers, covariant()));
    assert!(!lattice.is_assignable(&integers, &numbers, covariant()));
    assert!(!lattice.is_assignable(&numbers, &integers, AssignOptions::invariant()));

    let objects = Type::array(Type::object());
    assert!(lattice.is_assignable(&objects, &Type::array(integers.clone()), covariant()));
    assert!(lattice.is_assignable(&jdk.ty("java.io.Serializable"), &integers, covariant()));
}

#[test]
fn primitive_arrays_are_not_boxed() {
    let jdk = Jdk::new();
    let lattice = TypeLattice::new(&jdk.table);
    let ints = Type::array(NamedType::primitive("int").into());
    let integers = Type::array(jdk.ty("java.lang.Integer"));

    assert!(!lattice.is_assignable(&integers, &ints, covariant()));
    assert!(!lattice.is_assignable(&Type::array(Type::object()), &ints, covariant()));
    assert!(lattice.is_assignable(&Type::object(), &ints, covariant()));
}

#[test]
fn generic_method_type_variables() {
    let jdk = Jdk::new();
    let lattice = TypeLattice::new(&jdk.table);
    let key = DeclarationKey::method("pkg.Util", "<T extends Number, U extends T> copy");
    let t = TypeVariable::new("T", key.clone(), vec![jdk.ty("java.lang.Number")]).unwrap();
    let u = TypeVariable::new("U", key, vec![t.clone().into()]).unwrap();
    let t: Type = t.into();
    let u: Type = u.into();

    assert!(lattice.is_assignable(&t, &u, covariant()));
    assert!(!lattice.is_assignable(&u, &t, covariant()));
    assert!(lattice.is_assignable(&jdk.ty("java.lang.Number"), &u, covariant()));
    assert!(!lattice.is_assignable(&t, &jdk.ty("java.lang.Integer"), covariant()));

    let extends_t = Type::wildcard_extends(t).unwrap();
    assert!(lattice.is_assignable(&extends_t, &u, covariant()));
}

#[test]
fn inherited_parameterization_through_a_plain_class() {
    let mut table = ClassTable::with_minimal_jdk();
    let string: Type = table.named("java.lang.String").unwrap().into();
    let list = table.named("java.util.List").unwrap();
    let array_list = table.named("java.util.ArrayList").unwrap();

    // class Names extends ArrayList<String>
    let names = table
        .add_class(
            ClassDecl::new(NamedType::class("pkg.Names", 0))
                .extends(Type::parameterized(array_list, vec![string.clone()]).unwrap()),
        )
        .unwrap();
    let lattice = TypeLattice::new(&table);
    let names: Type = names.into();

    let list_string = Type::parameterized(list.clone(), vec![string]).unwrap();
    let list_object = Type::parameterized(list, vec![Type::object()]).unwrap();
    assert!(lattice.is_assignable(&list_string, &names, covariant()));
    assert!(!lattice.is_assignable(&list_object, &names, covariant()));
}

#[test]
fn options_default_to_covariant_with_boxing() {
    assert_eq!(Variance::default(), Variance::Covariant);
    assert_eq!(AssignOptions::default().variance, Variance::Covariant);
    assert!(AssignOptions::default().boxing);
}
