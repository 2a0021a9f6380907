//! Boxing of primitive-like leaf types.

use std::collections::HashMap;

use crate::model::{NamedType, Type};

/// Maps primitive [`NamedType`]s to their reference-type equivalents.
///
/// Boxing is applied to both operands of an assignability query before comparison and never
/// inside the recursive comparison itself.
#[derive(Debug, Clone)]
pub struct BoxingTable {
    boxed: HashMap<String, NamedType>,
}

impl Default for BoxingTable {
    fn default() -> Self {
        Self::java()
    }
}

impl BoxingTable {
    /// A table that boxes nothing.
    pub fn empty() -> Self {
        Self {
            boxed: HashMap::new(),
        }
    }

    /// The Java primitive wrappers.
    pub fn java() -> Self {
        let mut table = Self::empty();
        for (primitive, boxed) in [
            ("boolean", "java.lang.Boolean"),
            ("byte", "java.lang.Byte"),
            ("short", "java.lang.Short"),
            ("char", "java.lang.Character"),
            ("int", "java.lang.Integer"),
            ("long", "java.lang.Long"),
            ("float", "java.lang.Float"),
            ("double", "java.lang.Double"),
            ("void", "java.lang.Void"),
        ] {
            table.insert(primitive, NamedType::class(boxed, 0));
        }
        table
    }

    pub fn insert(&mut self, primitive: impl Into<String>, boxed: NamedType) {
        self.boxed.insert(primitive.into(), boxed);
    }

    pub fn boxed(&self, primitive: &NamedType) -> Option<&NamedType> {
        if !primitive.is_primitive() {
            return None;
        }
        self.boxed.get(primitive.name())
    }

    /// Box `ty` if it is a primitive with a known wrapper; otherwise return it unchanged.
    ///
    /// Idempotent: a boxed type is a reference type and boxes to itself.
    pub fn box_type(&self, ty: &Type) -> Type {
        match ty {
            Type::Named(named) => match self.boxed(named) {
                Some(boxed) => Type::Named(boxed.clone()),
                None => ty.clone(),
            },
            _ => ty.clone(),
        }
    }
}
