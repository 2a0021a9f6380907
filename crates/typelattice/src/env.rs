//! The introspection collaborator.
//!
//! The lattice algorithms never derive facts about classes on their own: every declared type
//! parameter and supertype comes from a [`TypeEnv`]. A missing declaration is a resolution gap,
//! not an error.

use crate::model::{NamedType, Type, TypeVariable};

/// Declaration of a class or interface as reported by a [`TypeEnv`].
///
/// `super_class` and `interfaces` are raw, unsubstituted descriptors: they may mention the
/// declaration's own `type_params`.
#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub ty: NamedType,
    pub type_params: Vec<TypeVariable>,
    pub super_class: Option<Type>,
    pub interfaces: Vec<Type>,
}

impl ClassDecl {
    /// A declaration with no type parameters and no declared supertypes.
    pub fn new(ty: NamedType) -> Self {
        Self {
            ty,
            type_params: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
        }
    }

    pub fn with_type_params(mut self, type_params: Vec<TypeVariable>) -> Self {
        self.type_params = type_params;
        self
    }

    pub fn extends(mut self, super_class: Type) -> Self {
        self.super_class = Some(super_class);
        self
    }

    pub fn implements(mut self, interface: Type) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn name(&self) -> &str {
        self.ty.name()
    }

    pub fn is_interface(&self) -> bool {
        self.ty.is_interface()
    }

    /// Declared superclass followed by declared interfaces.
    pub fn declared_supertypes(&self) -> impl Iterator<Item = &Type> + '_ {
        self.super_class.iter().chain(self.interfaces.iter())
    }
}

/// Types every environment must be able to name: the array supertypes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WellKnownTypes {
    pub object: NamedType,
    pub cloneable: NamedType,
    pub serializable: NamedType,
}

impl Default for WellKnownTypes {
    fn default() -> Self {
        Self {
            object: NamedType::object(),
            cloneable: NamedType::interface("java.lang.Cloneable", 0),
            serializable: NamedType::interface("java.io.Serializable", 0),
        }
    }
}

/// Source of "real world" type facts.
pub trait TypeEnv: Send + Sync {
    /// Look up a class or interface declaration by qualified name.
    fn class(&self, name: &str) -> Option<&ClassDecl>;

    fn well_known(&self) -> &WellKnownTypes;

    /// Declaration for `named`, if the environment can describe it.
    fn class_of(&self, named: &NamedType) -> Option<&ClassDecl> {
        self.class(named.name())
    }
}
