//! Canonical, Java-like rendering of types for diagnostics.
//!
//! `List<String>`, `? extends Number`, `? super Integer`, `?`, `int[]`. Owned member types render
//! as `Outer<String>.Inner<Integer>`. Type variables carry their declaration, `E@java.util.List`,
//! since same-named variables of different declarations are different types.

use std::fmt;

use crate::model::{ArrayType, NamedType, ParameterizedType, Type, TypeVariable, WildcardType};

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Named(t) => t.fmt(f),
            Type::Parameterized(t) => t.fmt(f),
            Type::Array(t) => t.fmt(f),
            Type::TypeVariable(t) => t.fmt(f),
            Type::Wildcard(t) => t.fmt(f),
        }
    }
}

impl fmt::Display for NamedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for ParameterizedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.owner() {
            Some(owner) => write!(f, "{owner}.{}", member_name(owner, self.raw()))?,
            None => f.write_str(self.raw().name())?,
        }
        if self.args().is_empty() {
            return Ok(());
        }
        f.write_str("<")?;
        for (idx, arg) in self.args().iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(">")
    }
}

/// The simple name when `raw` is nested in the owner's raw type, the full name otherwise.
fn member_name<'a>(owner: &Type, raw: &'a NamedType) -> &'a str {
    let owner_name = match owner {
        Type::Named(named) => named.name(),
        Type::Parameterized(p) => p.raw().name(),
        _ => return raw.name(),
    };
    let nested = raw
        .name()
        .strip_prefix(owner_name)
        .is_some_and(|rest| rest.strip_prefix(['$', '.']) == Some(raw.simple_name()));
    if nested {
        raw.simple_name()
    } else {
        raw.name()
    }
}

impl fmt::Display for ArrayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[]", self.component())
    }
}

impl fmt::Display for TypeVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name(), self.declaration())
    }
}

impl fmt::Display for WildcardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(lower) = self.lower() {
            return write!(f, "? super {lower}");
        }
        if self.upper().is_top() {
            return f.write_str("?");
        }
        write!(f, "? extends {}", self.upper())
    }
}
