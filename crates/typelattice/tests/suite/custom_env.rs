use std::collections::BTreeMap;

use typelattice::{
    class_type_params, AssignOptions, ClassDecl, ClassTable, NamedType, Type, TypeEnv,
    TypeLattice, WellKnownTypes,
};

/// A hand-rolled environment, standing in for a loader that reads class files.
struct Loader {
    classes: BTreeMap<String, ClassDecl>,
    well_known: WellKnownTypes,
}

impl Loader {
    fn new(decls: impl IntoIterator<Item = ClassDecl>) -> Self {
        Self {
            classes: decls
                .into_iter()
                .map(|decl| (decl.name().to_string(), decl))
                .collect(),
            well_known: WellKnownTypes::default(),
        }
    }
}

impl TypeEnv for Loader {
    fn class(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.get(name)
    }

    fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }
}

/// `interface Source<T>`, `class Pipe<A> implements Source<A>`.
fn pipeline() -> Loader {
    let source = NamedType::interface("pkg.Source", 1);
    let pipe = NamedType::class("pkg.Pipe", 1);
    let a = class_type_params(pipe.name(), &["A"]);
    let pipe_supertype =
        Type::parameterized(source.clone(), vec![a[0].clone().into()]).expect("arity 1");

    Loader::new([
        ClassDecl::new(source.clone()).with_type_params(class_type_params(source.name(), &["T"])),
        ClassDecl::new(pipe)
            .with_type_params(a)
            .implements(pipe_supertype),
    ])
}

#[test]
fn lattice_runs_over_a_foreign_environment() {
    let loader = pipeline();
    let lattice = TypeLattice::new(&loader);
    let string: Type = NamedType::class("java.lang.String", 0).into();

    let pipe_string =
        Type::parameterized(NamedType::class("pkg.Pipe", 1), vec![string.clone()]).unwrap();
    let source_string =
        Type::parameterized(NamedType::interface("pkg.Source", 1), vec![string]).unwrap();

    assert!(lattice.is_assignable(&source_string, &pipe_string, AssignOptions::default()));
    // Object is not declared by the loader, but is still the terminal node.
    assert!(lattice.supertypes(&pipe_string).contains(&Type::object()));
}

#[test]
fn types_from_separate_environments_are_interchangeable() {
    let table = ClassTable::with_minimal_jdk();
    let loader = pipeline();
    let lattice = TypeLattice::new(&loader);

    // `String` as produced by the class table, used in a query against the loader.
    let string: Type = table.named("java.lang.String").unwrap().into();
    let pipe_string =
        Type::parameterized(NamedType::class("pkg.Pipe", 1), vec![string.clone()]).unwrap();
    let source_string =
        Type::parameterized(NamedType::interface("pkg.Source", 1), vec![string]).unwrap();

    let direct: Vec<Type> = lattice.direct_supertypes(&pipe_string).into_iter().collect();
    assert_eq!(direct, vec![source_string]);
}
