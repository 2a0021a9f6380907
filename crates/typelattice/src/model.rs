//! The structural type model.
//!
//! Every [`Type`] is an immutable, cheaply clonable handle. Equality and hashing are defined
//! purely from field values, so types built by unrelated producers (two different class tables,
//! a test fixture and a real loader, ...) compare equal whenever they describe the same type.

use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::ops::Deref;
use std::sync::{Arc, OnceLock, Weak};

use crate::TypeError;

/// Qualified name of the universal top type (the root of the supertype lattice).
pub const TOP_TYPE_NAME: &str = "java.lang.Object";

/// Kind of a [`NamedType`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NamedKind {
    Class,
    Interface,
    /// A primitive-like leaf type (`int`, `boolean`, ...). Never a bound or a type argument.
    Primitive,
}

/// A class, interface or primitive type referenced by its qualified name.
///
/// Only the name takes part in equality; declared type parameters and supertypes are looked up
/// through the [`crate::TypeEnv`] collaborator when an algorithm needs them.
#[derive(Clone)]
pub struct NamedType(Arc<NamedData>);

struct NamedData {
    name: Box<str>,
    kind: NamedKind,
    arity: usize,
}

impl NamedType {
    pub fn new(name: impl Into<String>, kind: NamedKind, arity: usize) -> Self {
        let arity = if kind == NamedKind::Primitive { 0 } else { arity };
        Self(Arc::new(NamedData {
            name: name.into().into_boxed_str(),
            kind,
            arity,
        }))
    }

    pub fn class(name: impl Into<String>, arity: usize) -> Self {
        Self::new(name, NamedKind::Class, arity)
    }

    pub fn interface(name: impl Into<String>, arity: usize) -> Self {
        Self::new(name, NamedKind::Interface, arity)
    }

    pub fn primitive(name: impl Into<String>) -> Self {
        Self::new(name, NamedKind::Primitive, 0)
    }

    /// The universal top type.
    pub fn object() -> Self {
        Self::class(TOP_TYPE_NAME, 0)
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The last segment of the qualified name (`Entry` for `java.util.Map$Entry`).
    pub fn simple_name(&self) -> &str {
        let name = self.name();
        match name.rfind(['.', '$']) {
            Some(idx) => &name[idx + 1..],
            None => name,
        }
    }

    pub fn kind(&self) -> NamedKind {
        self.0.kind
    }

    /// Number of declared type parameters.
    pub fn arity(&self) -> usize {
        self.0.arity
    }

    pub fn is_interface(&self) -> bool {
        self.0.kind == NamedKind::Interface
    }

    pub fn is_primitive(&self) -> bool {
        self.0.kind == NamedKind::Primitive
    }

    pub fn is_generic(&self) -> bool {
        self.0.arity > 0
    }

    pub fn is_top(&self) -> bool {
        self.name() == TOP_TYPE_NAME
    }
}

impl PartialEq for NamedType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.name() == other.name()
    }
}

impl Eq for NamedType {}

impl Hash for NamedType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl fmt::Debug for NamedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Named").field(&self.name()).finish()
    }
}

/// An instantiation of a generic [`NamedType`], e.g. `List<String>`.
#[derive(Clone)]
pub struct ParameterizedType(Arc<ParameterizedData>);

struct ParameterizedData {
    owner: Option<Type>,
    raw: NamedType,
    args: Vec<Type>,
    hash: OnceLock<u64>,
}

impl ParameterizedType {
    /// Build `raw<args...>`, optionally nested in `owner`.
    ///
    /// The argument count must match the raw type's arity and every argument must be a
    /// reference type or a wildcard.
    pub fn new(owner: Option<Type>, raw: NamedType, args: Vec<Type>) -> Result<Self, TypeError> {
        if raw.is_primitive() {
            return Err(TypeError::InvalidRawType {
                raw: raw.name().to_string(),
            });
        }
        if args.len() != raw.arity() {
            return Err(TypeError::ArityMismatch {
                raw: raw.name().to_string(),
                expected: raw.arity(),
                actual: args.len(),
            });
        }
        if let Some(bad) = args.iter().find(|arg| arg.is_primitive()) {
            return Err(TypeError::InvalidTypeArgument {
                raw: raw.name().to_string(),
                argument: bad.to_string(),
            });
        }

        Ok(Self(Arc::new(ParameterizedData {
            owner,
            raw,
            args,
            hash: OnceLock::new(),
        })))
    }

    /// Same raw type with a new owner and arguments of unchanged count. Used by substitution,
    /// which only ever replaces reference types with reference types or wildcards.
    pub(crate) fn with_parts(&self, owner: Option<Type>, args: Vec<Type>) -> Self {
        debug_assert_eq!(args.len(), self.args().len());
        Self(Arc::new(ParameterizedData {
            owner,
            raw: self.raw().clone(),
            args,
            hash: OnceLock::new(),
        }))
    }

    pub fn owner(&self) -> Option<&Type> {
        self.0.owner.as_ref()
    }

    pub fn raw(&self) -> &NamedType {
        &self.0.raw
    }

    pub fn args(&self) -> &[Type] {
        &self.0.args
    }
}

impl PartialEq for ParameterizedType {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        self.raw() == other.raw() && self.owner() == other.owner() && self.args() == other.args()
    }
}

impl Eq for ParameterizedType {}

impl fmt::Debug for ParameterizedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Parameterized");
        if let Some(owner) = self.owner() {
            s.field("owner", owner);
        }
        s.field("raw", self.raw()).field("args", &self.args()).finish()
    }
}

/// A reference-type array `component[]`.
#[derive(Clone, PartialEq, Eq)]
pub struct ArrayType(Arc<Type>);

impl ArrayType {
    pub fn new(component: Type) -> Self {
        Self(Arc::new(component))
    }

    pub fn component(&self) -> &Type {
        &self.0
    }
}

impl fmt::Debug for ArrayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Array").field(self.component()).finish()
    }
}

/// Opaque identity of the entity that declares a type variable.
///
/// Two type variables are the same variable only when both their names and their declaration
/// keys match; the key is derived from the declaring entity's own name so it stays stable across
/// repeated introspection of the same declaration.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DeclarationKey(Arc<str>);

impl DeclarationKey {
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(Arc::from(key.as_ref()))
    }

    /// Key for a class or interface declaration.
    pub fn class(qualified_name: &str) -> Self {
        Self::new(qualified_name)
    }

    /// Key for a generic method or constructor declared in `owner`.
    pub fn method(owner: &str, signature: &str) -> Self {
        Self::new(format!("{owner}#{signature}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DeclarationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclarationKey({})", self.as_str())
    }
}

impl fmt::Display for DeclarationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A formal type parameter of a generic declaration.
///
/// Bounds live in a compute-once cell so self-referential bounds (`E extends Enum<E>`) can be
/// expressed: [`TypeVariable::declare`] the variable, build bounds that mention it, then
/// [`TypeVariable::bind_bounds`]. Reading the bounds of an unbound variable fixes them to the
/// universal top.
///
/// Any variable that is still unbound when it appears inside bounds being bound (the variable
/// itself, or a sibling declared ahead of time) is held there by a back reference that does not
/// keep its bounds alive. Every reference cycle through bounds goes through such an edge, so
/// dropping the declaring owner frees the whole bound graph. A back reference that outlives its
/// variable still has its name and declaration but reports the universal top as its bounds.
#[derive(Clone)]
pub struct TypeVariable {
    id: Arc<VarId>,
    bounds: BoundsRef,
}

struct VarId {
    name: Box<str>,
    declaration: DeclarationKey,
}

type BoundsCell = OnceLock<Vec<Type>>;

#[derive(Clone)]
enum BoundsRef {
    Owned(Arc<BoundsCell>),
    Back(Weak<BoundsCell>),
}

/// Upper bounds of a [`TypeVariable`]; never empty. Dereferences to a slice.
#[derive(Clone)]
pub struct TypeBounds(Arc<BoundsCell>);

impl TypeBounds {
    pub fn as_slice(&self) -> &[Type] {
        self.0.get_or_init(|| vec![Type::object()])
    }
}

impl Deref for TypeBounds {
    type Target = [Type];

    fn deref(&self) -> &[Type] {
        self.as_slice()
    }
}

impl PartialEq<[Type]> for TypeBounds {
    fn eq(&self, other: &[Type]) -> bool {
        self.as_slice() == other
    }
}

impl fmt::Debug for TypeBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl TypeVariable {
    /// Declare a type variable whose bounds will be bound later.
    pub fn declare(name: impl Into<String>, declaration: DeclarationKey) -> Self {
        Self {
            id: Arc::new(VarId {
                name: name.into().into_boxed_str(),
                declaration,
            }),
            bounds: BoundsRef::Owned(Arc::new(OnceLock::new())),
        }
    }

    /// Declare a type variable with its upper bounds. An empty list means the universal top.
    pub fn new(
        name: impl Into<String>,
        declaration: DeclarationKey,
        bounds: Vec<Type>,
    ) -> Result<Self, TypeError> {
        let var = Self::declare(name, declaration);
        var.bind_bounds(bounds)?;
        Ok(var)
    }

    pub fn bind_bounds(&self, bounds: Vec<Type>) -> Result<(), TypeError> {
        let bounds = validate_type_variable_bounds(self.name(), bounds)?;
        let already_bound = || TypeError::BoundsAlreadyBound {
            name: self.name().to_string(),
        };
        let cell = match &self.bounds {
            BoundsRef::Owned(cell) => Arc::clone(cell),
            BoundsRef::Back(weak) => weak.upgrade().ok_or_else(already_bound)?,
        };
        if cell.get().is_some() {
            return Err(already_bound());
        }
        let bounds = bounds.iter().map(weaken_unbound).collect();
        cell.set(bounds).map_err(|_| already_bound())
    }

    pub fn name(&self) -> &str {
        &self.id.name
    }

    pub fn declaration(&self) -> &DeclarationKey {
        &self.id.declaration
    }

    /// Upper bounds; never empty.
    pub fn bounds(&self) -> TypeBounds {
        match &self.bounds {
            BoundsRef::Owned(cell) => TypeBounds(Arc::clone(cell)),
            BoundsRef::Back(weak) => TypeBounds(weak.upgrade().unwrap_or_default()),
        }
    }

    #[cfg(test)]
    pub(crate) fn downgrade_bounds(&self) -> Weak<OnceLock<Vec<Type>>> {
        match &self.bounds {
            BoundsRef::Owned(cell) => Arc::downgrade(cell),
            BoundsRef::Back(weak) => weak.clone(),
        }
    }

    fn is_unbound(&self) -> bool {
        match &self.bounds {
            BoundsRef::Owned(cell) => cell.get().is_none(),
            BoundsRef::Back(_) => false,
        }
    }

    fn back_reference(&self) -> Self {
        let bounds = match &self.bounds {
            BoundsRef::Owned(cell) => BoundsRef::Back(Arc::downgrade(cell)),
            BoundsRef::Back(weak) => BoundsRef::Back(weak.clone()),
        };
        Self {
            id: Arc::clone(&self.id),
            bounds,
        }
    }
}

/// Rebuild `ty` with every still-unbound type variable replaced by a back reference.
fn weaken_unbound(ty: &Type) -> Type {
    match ty {
        Type::Named(_) => ty.clone(),
        Type::Parameterized(p) => Type::Parameterized(p.with_parts(
            p.owner().map(weaken_unbound),
            p.args().iter().map(weaken_unbound).collect(),
        )),
        Type::Array(array) => Type::array(weaken_unbound(array.component())),
        Type::TypeVariable(var) if var.is_unbound() => Type::TypeVariable(var.back_reference()),
        Type::TypeVariable(_) => ty.clone(),
        Type::Wildcard(w) => Type::Wildcard(WildcardType::from_parts(
            weaken_unbound(w.upper()),
            w.lower().map(weaken_unbound),
        )),
    }
}

fn validate_type_variable_bounds(name: &str, bounds: Vec<Type>) -> Result<Vec<Type>, TypeError> {
    if bounds.is_empty() {
        return Ok(vec![Type::object()]);
    }
    for bound in &bounds {
        check_reference_bound(bound)?;
    }
    if bounds.len() > 1 && bounds.iter().any(|b| matches!(b, Type::TypeVariable(_))) {
        return Err(TypeError::MixedTypeVariableBound {
            name: name.to_string(),
        });
    }
    Ok(bounds)
}

fn check_reference_bound(bound: &Type) -> Result<(), TypeError> {
    if bound.is_primitive() || matches!(bound, Type::Wildcard(_)) {
        return Err(TypeError::InvalidBound {
            bound: bound.to_string(),
        });
    }
    Ok(())
}

impl PartialEq for TypeVariable {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.id, &other.id)
            || (self.name() == other.name() && self.declaration() == other.declaration())
    }
}

impl Eq for TypeVariable {}

impl Hash for TypeVariable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
        self.declaration().hash(state);
    }
}

impl fmt::Debug for TypeVariable {
    // Bounds are left out: they may mention the variable itself.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeVariable")
            .field("name", &self.name())
            .field("declaration", self.declaration())
            .finish()
    }
}

/// A wildcard type argument: `?`, `? extends U` or `? super L`.
#[derive(Clone)]
pub struct WildcardType(Arc<WildcardData>);

struct WildcardData {
    upper: Type,
    lower: Option<Type>,
}

impl WildcardType {
    /// Build a wildcard from explicit bound lists, each holding at most one element.
    pub fn new(upper: Vec<Type>, lower: Vec<Type>) -> Result<Self, TypeError> {
        if upper.len() > 1 {
            return Err(TypeError::TooManyBounds {
                which: "upper",
                count: upper.len(),
            });
        }
        if lower.len() > 1 {
            return Err(TypeError::TooManyBounds {
                which: "lower",
                count: lower.len(),
            });
        }
        let upper = upper.into_iter().next();
        let lower = lower.into_iter().next();
        for bound in upper.iter().chain(lower.iter()) {
            check_reference_bound(bound)?;
        }
        if let (Some(upper), Some(lower)) = (&upper, &lower) {
            if !upper.is_top() {
                return Err(TypeError::ConflictingWildcardBounds {
                    upper: upper.to_string(),
                    lower: lower.to_string(),
                });
            }
        }

        Ok(Self(Arc::new(WildcardData {
            upper: upper.unwrap_or_else(Type::object),
            lower,
        })))
    }

    pub(crate) fn from_parts(upper: Type, lower: Option<Type>) -> Self {
        Self(Arc::new(WildcardData { upper, lower }))
    }

    /// `?`
    pub fn unbounded() -> Self {
        Self(Arc::new(WildcardData {
            upper: Type::object(),
            lower: None,
        }))
    }

    /// `? extends bound`
    pub fn extends(bound: Type) -> Result<Self, TypeError> {
        Self::new(vec![bound], Vec::new())
    }

    /// `? super bound`
    pub fn super_of(bound: Type) -> Result<Self, TypeError> {
        Self::new(Vec::new(), vec![bound])
    }

    /// Effective upper bound (the universal top when none was declared).
    pub fn upper(&self) -> &Type {
        &self.0.upper
    }

    pub fn lower(&self) -> Option<&Type> {
        self.0.lower.as_ref()
    }

    /// Effective upper bound list; always exactly one element.
    pub fn upper_bounds(&self) -> &[Type] {
        std::slice::from_ref(&self.0.upper)
    }

    pub fn lower_bounds(&self) -> &[Type] {
        self.0.lower.as_slice()
    }

    /// `?` (or the equivalent `? extends Object`).
    pub fn is_unbounded(&self) -> bool {
        self.lower().is_none() && self.upper().is_top()
    }
}

impl PartialEq for WildcardType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.upper() == other.upper() && self.lower() == other.lower())
    }
}

impl Eq for WildcardType {}

impl fmt::Debug for WildcardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Wildcard");
        s.field("upper", self.upper());
        if let Some(lower) = self.lower() {
            s.field("lower", lower);
        }
        s.finish()
    }
}

/// A type in the modeled nominal type system.
#[derive(Clone, PartialEq, Eq)]
pub enum Type {
    Named(NamedType),
    Parameterized(ParameterizedType),
    Array(ArrayType),
    TypeVariable(TypeVariable),
    Wildcard(WildcardType),
}

impl Type {
    /// The universal top type.
    pub fn object() -> Self {
        Type::Named(NamedType::object())
    }

    pub fn array(component: Type) -> Self {
        Type::Array(ArrayType::new(component))
    }

    /// `raw<args...>` without an owner.
    pub fn parameterized(raw: NamedType, args: Vec<Type>) -> Result<Self, TypeError> {
        ParameterizedType::new(None, raw, args).map(Type::Parameterized)
    }

    pub fn unbounded_wildcard() -> Self {
        Type::Wildcard(WildcardType::unbounded())
    }

    pub fn wildcard_extends(bound: Type) -> Result<Self, TypeError> {
        WildcardType::extends(bound).map(Type::Wildcard)
    }

    pub fn wildcard_super(bound: Type) -> Result<Self, TypeError> {
        WildcardType::super_of(bound).map(Type::Wildcard)
    }

    pub fn as_named(&self) -> Option<&NamedType> {
        match self {
            Type::Named(named) => Some(named),
            _ => None,
        }
    }

    pub fn as_parameterized(&self) -> Option<&ParameterizedType> {
        match self {
            Type::Parameterized(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_top(&self) -> bool {
        matches!(self, Type::Named(named) if named.is_top())
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Named(named) if named.is_primitive())
    }

    /// Structural hash, consistent with `==`.
    ///
    /// Hashes of parameterized types are memoized on the shared node; the computation is a pure
    /// function of immutable fields so concurrent first calls agree.
    pub fn structural_hash(&self) -> u64 {
        match self {
            Type::Parameterized(p) => *p.0.hash.get_or_init(|| compute_hash(self)),
            _ => compute_hash(self),
        }
    }
}

fn compute_hash(ty: &Type) -> u64 {
    let mut hasher = DefaultHasher::new();
    match ty {
        Type::Named(named) => {
            0u8.hash(&mut hasher);
            named.hash(&mut hasher);
        }
        Type::Parameterized(p) => {
            1u8.hash(&mut hasher);
            p.owner().map(Type::structural_hash).hash(&mut hasher);
            p.raw().hash(&mut hasher);
            for arg in p.args() {
                arg.structural_hash().hash(&mut hasher);
            }
        }
        Type::Array(array) => {
            2u8.hash(&mut hasher);
            array.component().structural_hash().hash(&mut hasher);
        }
        Type::TypeVariable(var) => {
            3u8.hash(&mut hasher);
            var.hash(&mut hasher);
        }
        Type::Wildcard(wildcard) => {
            4u8.hash(&mut hasher);
            wildcard.upper().structural_hash().hash(&mut hasher);
            wildcard.lower().map(Type::structural_hash).hash(&mut hasher);
        }
    }
    hasher.finish()
}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.structural_hash());
    }
}

impl fmt::Debug for Type {
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

impl From<NamedType> for Type {
    fn from(value: NamedType) -> Self {
        Type::Named(value)
    }
}

impl From<ParameterizedType> for Type {
    fn from(value: ParameterizedType) -> Self {
        Type::Parameterized(value)
    }
}

impl From<ArrayType> for Type {
    fn from(value: ArrayType) -> Self {
        Type::Array(value)
    }
}

impl From<TypeVariable> for Type {
    fn from(value: TypeVariable) -> Self {
        Type::TypeVariable(value)
    }
}

impl From<WildcardType> for Type {
    fn from(value: WildcardType) -> Self {
        Type::Wildcard(value)
    }
}
