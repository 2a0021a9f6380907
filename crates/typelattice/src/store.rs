//! An in-memory [`TypeEnv`].

use indexmap::IndexMap;

use crate::env::{ClassDecl, TypeEnv, WellKnownTypes};
use crate::model::{DeclarationKey, NamedType, Type, TypeVariable};
use crate::TypeError;

/// Class declarations keyed by qualified name, iterated in registration order.
///
/// A fresh table already knows the universal top and the two array marker interfaces, so array
/// supertypes resolve without further setup.
#[derive(Debug, Clone)]
pub struct ClassTable {
    classes: IndexMap<String, ClassDecl>,
    well_known: WellKnownTypes,
}

impl Default for ClassTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassTable {
    pub fn new() -> Self {
        let well_known = WellKnownTypes::default();
        let mut classes = IndexMap::new();
        for ty in [
            well_known.object.clone(),
            well_known.cloneable.clone(),
            well_known.serializable.clone(),
        ] {
            classes.insert(ty.name().to_string(), ClassDecl::new(ty));
        }
        Self {
            classes,
            well_known,
        }
    }

    /// A table describing a small slice of the JDK: `Object`, the boxed primitives, `String`,
    /// `Comparable`, `Enum`, and the core collection interfaces and classes.
    pub fn with_minimal_jdk() -> Self {
        Self::try_with_minimal_jdk().expect("minimal JDK declarations should be well-formed")
    }

    pub fn try_with_minimal_jdk() -> Result<Self, TypeError> {
        let mut table = Self::new();
        seed_minimal_jdk(&mut table)?;
        Ok(table)
    }

    /// Register a new declaration. Fails if the name is taken or the declared type parameters do
    /// not match the declared arity.
    pub fn add_class(&mut self, decl: ClassDecl) -> Result<NamedType, TypeError> {
        if self.classes.contains_key(decl.name()) {
            return Err(TypeError::DuplicateClass {
                name: decl.name().to_string(),
            });
        }
        self.upsert_class(decl)
    }

    /// Register or replace a declaration.
    pub fn upsert_class(&mut self, decl: ClassDecl) -> Result<NamedType, TypeError> {
        if decl.type_params.len() != decl.ty.arity() {
            return Err(TypeError::ArityMismatch {
                raw: decl.name().to_string(),
                expected: decl.ty.arity(),
                actual: decl.type_params.len(),
            });
        }
        let ty = decl.ty.clone();
        self.classes.insert(ty.name().to_string(), decl);
        Ok(ty)
    }

    /// Remove a declaration, turning later lookups of it into resolution gaps.
    pub fn remove_class(&mut self, name: &str) -> Result<ClassDecl, TypeError> {
        self.classes
            .shift_remove(name)
            .ok_or_else(|| TypeError::UnknownClass {
                name: name.to_string(),
            })
    }

    /// The registered named type for `name`.
    pub fn named(&self, name: &str) -> Option<NamedType> {
        self.classes.get(name).map(|decl| decl.ty.clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassDecl> + '_ {
        self.classes.values()
    }
}

impl TypeEnv for ClassTable {
    fn class(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.get(name)
    }

    fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }
}

/// Declare class type parameters (bounds default to the universal top).
pub fn class_type_params(owner: &str, names: &[&str]) -> Vec<TypeVariable> {
    let key = DeclarationKey::class(owner);
    names
        .iter()
        .map(|name| TypeVariable::declare(*name, key.clone()))
        .collect()
}

fn vars(params: &[TypeVariable]) -> Vec<Type> {
    params.iter().cloned().map(Type::from).collect()
}

fn seed_minimal_jdk(table: &mut ClassTable) -> Result<(), TypeError> {
    let object = Type::object();
    let cloneable: Type = table.well_known.cloneable.clone().into();
    let serializable: Type = table.well_known.serializable.clone().into();

    let comparable = NamedType::interface("java.lang.Comparable", 1);
    let t = class_type_params(comparable.name(), &["T"]);
    table.add_class(ClassDecl::new(comparable.clone()).with_type_params(t))?;

    let char_sequence = NamedType::interface("java.lang.CharSequence", 0);
    table.add_class(ClassDecl::new(char_sequence.clone()))?;
    table.add_class(ClassDecl::new(NamedType::interface("java.lang.Runnable", 0)))?;

    let string = NamedType::class("java.lang.String", 0);
    table.add_class(
        ClassDecl::new(string.clone())
            .extends(object.clone())
            .implements(serializable.clone())
            .implements(Type::parameterized(comparable.clone(), vec![string.into()])?)
            .implements(char_sequence.into()),
    )?;

    let number = NamedType::class("java.lang.Number", 0);
    table.add_class(
        ClassDecl::new(number.clone())
            .extends(object.clone())
            .implements(serializable.clone()),
    )?;

    for name in [
        "java.lang.Byte",
        "java.lang.Short",
        "java.lang.Integer",
        "java.lang.Long",
        "java.lang.Float",
        "java.lang.Double",
    ] {
        let boxed = NamedType::class(name, 0);
        table.add_class(
            ClassDecl::new(boxed.clone())
                .extends(number.clone().into())
                .implements(Type::parameterized(comparable.clone(), vec![boxed.into()])?),
        )?;
    }

    for name in ["java.lang.Boolean", "java.lang.Character"] {
        let boxed = NamedType::class(name, 0);
        table.add_class(
            ClassDecl::new(boxed.clone())
                .extends(object.clone())
                .implements(serializable.clone())
                .implements(Type::parameterized(comparable.clone(), vec![boxed.into()])?),
        )?;
    }

    table.add_class(ClassDecl::new(NamedType::class("java.lang.Void", 0)).extends(object.clone()))?;

    // enum Enum<E extends Enum<E>> implements Comparable<E>, Serializable
    let enum_ty = NamedType::class("java.lang.Enum", 1);
    let e = class_type_params(enum_ty.name(), &["E"]);
    e[0].bind_bounds(vec![Type::parameterized(enum_ty.clone(), vars(&e))?])?;
    table.add_class(
        ClassDecl::new(enum_ty)
            .with_type_params(e.clone())
            .extends(object.clone())
            .implements(Type::parameterized(comparable, vars(&e))?)
            .implements(serializable.clone()),
    )?;

    let iterable = NamedType::interface("java.lang.Iterable", 1);
    let t = class_type_params(iterable.name(), &["T"]);
    table.add_class(ClassDecl::new(iterable.clone()).with_type_params(t))?;

    let collection = NamedType::interface("java.util.Collection", 1);
    let e = class_type_params(collection.name(), &["E"]);
    table.add_class(
        ClassDecl::new(collection.clone())
            .with_type_params(e.clone())
            .implements(Type::parameterized(iterable, vars(&e))?),
    )?;

    let list = NamedType::interface("java.util.List", 1);
    let e = class_type_params(list.name(), &["E"]);
    table.add_class(
        ClassDecl::new(list.clone())
            .with_type_params(e.clone())
            .implements(Type::parameterized(collection.clone(), vars(&e))?),
    )?;

    let set = NamedType::interface("java.util.Set", 1);
    let e = class_type_params(set.name(), &["E"]);
    table.add_class(
        ClassDecl::new(set)
            .with_type_params(e.clone())
            .implements(Type::parameterized(collection.clone(), vars(&e))?),
    )?;

    let abstract_collection = NamedType::class("java.util.AbstractCollection", 1);
    let e = class_type_params(abstract_collection.name(), &["E"]);
    table.add_class(
        ClassDecl::new(abstract_collection.clone())
            .with_type_params(e.clone())
            .extends(object.clone())
            .implements(Type::parameterized(collection, vars(&e))?),
    )?;

    let abstract_list = NamedType::class("java.util.AbstractList", 1);
    let e = class_type_params(abstract_list.name(), &["E"]);
    table.add_class(
        ClassDecl::new(abstract_list.clone())
            .with_type_params(e.clone())
            .extends(Type::parameterized(abstract_collection, vars(&e))?)
            .implements(Type::parameterized(list.clone(), vars(&e))?),
    )?;

    // `List<E>` is reachable both directly and through `AbstractList<E>`.
    let array_list = NamedType::class("java.util.ArrayList", 1);
    let e = class_type_params(array_list.name(), &["E"]);
    table.add_class(
        ClassDecl::new(array_list)
            .with_type_params(e.clone())
            .extends(Type::parameterized(abstract_list, vars(&e))?)
            .implements(Type::parameterized(list, vars(&e))?)
            .implements(cloneable.clone())
            .implements(serializable.clone()),
    )?;

    let map = NamedType::interface("java.util.Map", 2);
    let kv = class_type_params(map.name(), &["K", "V"]);
    table.add_class(ClassDecl::new(map.clone()).with_type_params(kv))?;

    let hash_map = NamedType::class("java.util.HashMap", 2);
    let kv = class_type_params(hash_map.name(), &["K", "V"]);
    table.add_class(
        ClassDecl::new(hash_map)
            .with_type_params(kv.clone())
            .extends(object)
            .implements(Type::parameterized(map, vars(&kv))?)
            .implements(cloneable)
            .implements(serializable),
    )?;

    Ok(())
}
