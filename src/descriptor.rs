//! Static type introspection.
//!
//! Every type that can seed a model implements [`Describe`], producing a
//! [`TypeDescriptor`]: an optional declared name plus a [`Kind`]. Nested
//! types are held behind a lazy [`TypeRef`] so recursive graphs such as
//! `struct Node { children: Vec<Node> }` describe themselves finitely.
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::annotations::{Annotations, TagError};

// ------------------------------- Types ------------------------------------ //

/// A declared (non-synthesized) type name, qualified by its defining unit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeName {
    pub unit: Cow<'static, str>,
    pub name: Cow<'static, str>,
}

#[derive(Clone, Debug)]
pub struct TypeDescriptor {
    /// `None` for anonymous composites and for built-in types.
    pub name: Option<TypeName>,
    pub kind: Kind,
}

#[derive(Clone, Debug)]
pub enum Kind {
    Bool,
    Int { bits: u32, signed: bool },
    Float { bits: u32 },
    Text,
    /// Pointer-like indirection; the pointee may be absent at runtime.
    Reference(TypeRef),
    /// Ordered homogeneous container.
    Sequence(TypeRef),
    Struct(Vec<FieldDescriptor>),
    Unsupported(UnsupportedKind),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnsupportedKind {
    Function,
    Channel,
    RawPointer,
    Map,
}

/// Lazily or eagerly resolved nested type.
#[derive(Clone)]
pub enum TypeRef {
    Lazy(fn() -> TypeDescriptor),
    Resolved(Box<TypeDescriptor>),
}

#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    pub name: Cow<'static, str>,
    pub ty: TypeRef,
    pub exported: bool,
    /// Raw annotation text as written on the field (empty when absent).
    pub raw_tag: Cow<'static, str>,
    pub annotations: Annotations,
    /// Set when `raw_tag` could not be parsed; `annotations` is then default.
    pub tag_error: Option<TagError>,
}

pub trait Describe {
    fn describe() -> TypeDescriptor;
}

// ---------------------------- Construction -------------------------------- //

impl TypeDescriptor {
    pub fn new(kind: Kind) -> Self {
        Self { name: None, kind }
    }

    pub fn named(
        unit: impl Into<Cow<'static, str>>,
        name: impl Into<Cow<'static, str>>,
        fields: Vec<FieldDescriptor>,
    ) -> Self {
        Self {
            name: Some(TypeName { unit: unit.into(), name: name.into() }),
            kind: Kind::Struct(fields),
        }
    }

    pub fn anonymous(fields: Vec<FieldDescriptor>) -> Self {
        Self::new(Kind::Struct(fields))
    }

    pub fn reference_to(pointee: impl Into<TypeRef>) -> Self {
        Self::new(Kind::Reference(pointee.into()))
    }

    pub fn sequence_of(element: impl Into<TypeRef>) -> Self {
        Self::new(Kind::Sequence(element.into()))
    }
}

impl FieldDescriptor {
    /// An exported field with no annotations.
    pub fn new(name: impl Into<Cow<'static, str>>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            exported: true,
            raw_tag: Cow::Borrowed(""),
            annotations: Annotations::default(),
            tag_error: None,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.exported = false;
        self
    }

    pub fn exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }

    /// Attach raw annotation text. Parsing happens here; a malformed tag is
    /// kept as an error and degrades to "no override".
    pub fn tag(mut self, raw: impl Into<Cow<'static, str>>) -> Self {
        let raw = raw.into();
        match Annotations::parse(&raw) {
            Ok(parsed) => {
                self.annotations = parsed;
                self.tag_error = None;
            }
            Err(error) => {
                self.annotations = Annotations::default();
                self.tag_error = Some(error);
            }
        }
        self.raw_tag = raw;
        self
    }
}

impl TypeRef {
    pub fn get(&self) -> Cow<'_, TypeDescriptor> {
        match self {
            TypeRef::Lazy(f) => Cow::Owned(f()),
            TypeRef::Resolved(desc) => Cow::Borrowed(desc),
        }
    }
}

impl From<fn() -> TypeDescriptor> for TypeRef {
    fn from(f: fn() -> TypeDescriptor) -> Self {
        TypeRef::Lazy(f)
    }
}

impl From<TypeDescriptor> for TypeRef {
    fn from(desc: TypeDescriptor) -> Self {
        TypeRef::Resolved(Box::new(desc))
    }
}

impl fmt::Debug for TypeRef {
    // Lazy refs are not expanded: the graph may be cyclic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Lazy(_) => f.write_str("TypeRef::Lazy(..)"),
            TypeRef::Resolved(desc) => f.debug_tuple("TypeRef::Resolved").field(desc).finish(),
        }
    }
}

// ----------------------------- Capabilities ------------------------------- //

impl TypeDescriptor {
    pub fn fields(&self) -> &[FieldDescriptor] {
        match &self.kind {
            Kind::Struct(fields) => fields,
            _ => &[],
        }
    }

    pub fn is_array_like(&self) -> bool {
        matches!(self.kind, Kind::Sequence(_))
    }

    pub fn element_type(&self) -> Option<TypeDescriptor> {
        match &self.kind {
            Kind::Sequence(el) => Some(el.get().into_owned()),
            _ => None,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self.kind, Kind::Reference(_))
    }

    /// One level of indirection removed; `None` when not a reference.
    pub fn dereferenced_type(&self) -> Option<TypeDescriptor> {
        match &self.kind {
            Kind::Reference(pointee) => Some(pointee.get().into_owned()),
            _ => None,
        }
    }
}

impl FieldDescriptor {
    pub fn field_name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> TypeDescriptor {
        self.ty.get().into_owned()
    }

    pub fn is_exported(&self) -> bool {
        self.exported
    }

    /// Name used in the schema: the serialization override when present.
    pub fn schema_name(&self) -> &str {
        self.annotations.serialization_name.as_deref().unwrap_or(&self.name)
    }
}

impl UnsupportedKind {
    pub fn label(self) -> &'static str {
        match self {
            UnsupportedKind::Function => "fn",
            UnsupportedKind::Channel => "channel",
            UnsupportedKind::RawPointer => "raw-pointer",
            UnsupportedKind::Map => "map",
        }
    }
}

impl fmt::Display for UnsupportedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ------------------------------ Built-ins --------------------------------- //

macro_rules! describe_int {
    ($($t:ty => $signed:expr),* $(,)?) => {$(
        impl Describe for $t {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::new(Kind::Int { bits: <$t>::BITS, signed: $signed })
            }
        }
    )*};
}

describe_int! {
    i8 => true, i16 => true, i32 => true, i64 => true, i128 => true, isize => true,
    u8 => false, u16 => false, u32 => false, u64 => false, u128 => false, usize => false,
}

impl Describe for f32 {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new(Kind::Float { bits: 32 })
    }
}

impl Describe for f64 {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new(Kind::Float { bits: 64 })
    }
}

impl Describe for bool {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new(Kind::Bool)
    }
}

impl Describe for char {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new(Kind::Text)
    }
}

impl Describe for str {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new(Kind::Text)
    }
}

impl Describe for String {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new(Kind::Text)
    }
}

macro_rules! describe_reference {
    ($($wrapper:ty),* $(,)?) => {$(
        impl<T: Describe + ?Sized> Describe for $wrapper {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::reference_to(T::describe as fn() -> TypeDescriptor)
            }
        }
    )*};
}

describe_reference!(&T, &mut T, Box<T>, Rc<T>, Arc<T>);

impl<T: Describe> Describe for Option<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::reference_to(T::describe as fn() -> TypeDescriptor)
    }
}

impl<T: Describe + ToOwned + ?Sized> Describe for Cow<'_, T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::reference_to(T::describe as fn() -> TypeDescriptor)
    }
}

macro_rules! describe_sequence {
    ($($container:ty),* $(,)?) => {$(
        impl<T: Describe> Describe for $container {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::sequence_of(T::describe as fn() -> TypeDescriptor)
            }
        }
    )*};
}

describe_sequence!([T], Vec<T>, VecDeque<T>, BTreeSet<T>, HashSet<T>);

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::sequence_of(T::describe as fn() -> TypeDescriptor)
    }
}

impl<T: ?Sized> Describe for *const T {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new(Kind::Unsupported(UnsupportedKind::RawPointer))
    }
}

impl<T: ?Sized> Describe for *mut T {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new(Kind::Unsupported(UnsupportedKind::RawPointer))
    }
}

impl<T> Describe for std::sync::mpsc::Sender<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new(Kind::Unsupported(UnsupportedKind::Channel))
    }
}

impl<T> Describe for std::sync::mpsc::SyncSender<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new(Kind::Unsupported(UnsupportedKind::Channel))
    }
}

impl<T> Describe for std::sync::mpsc::Receiver<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new(Kind::Unsupported(UnsupportedKind::Channel))
    }
}

impl<K, V, S> Describe for HashMap<K, V, S> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new(Kind::Unsupported(UnsupportedKind::Map))
    }
}

impl<K, V> Describe for BTreeMap<K, V> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new(Kind::Unsupported(UnsupportedKind::Map))
    }
}

macro_rules! describe_fn_pointer {
    ($(($($arg:ident),*)),* $(,)?) => {$(
        impl<R, $($arg),*> Describe for fn($($arg),*) -> R {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::new(Kind::Unsupported(UnsupportedKind::Function))
            }
        }
    )*};
}

describe_fn_pointer!((), (A), (A, B), (A, B, C), (A, B, C, D));

// ------------------------------ Macro ------------------------------------- //

/// Declare a struct and implement [`Describe`] for it.
///
/// Only `pub` fields are exported. Annotation text follows the field type
/// after `=>`. The owning unit defaults to `module_path!()`; prefix the body
/// with `unit "name";` to override it.
///
/// ```ignore
/// describe_struct! {
///     unit "swagger";
///     #[derive(Debug, Default)]
///     pub struct Item {
///         pub id: String => r#"json:"Id""#,
///         pub name: String,
///         cache: u64,
///     }
/// }
/// ```
#[macro_export]
macro_rules! describe_struct {
    (
        unit $unit:expr;
        $(#[$attr:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fattr:meta])*
                $fvis:vis $field:ident : $fty:ty $(=> $tag:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$attr])*
        $vis struct $name {
            $(
                $(#[$fattr])*
                $fvis $field: $fty,
            )*
        }

        impl $crate::descriptor::Describe for $name {
            fn describe() -> $crate::descriptor::TypeDescriptor {
                $crate::descriptor::TypeDescriptor::named(
                    $unit,
                    stringify!($name),
                    ::std::vec![$(
                        $crate::descriptor::FieldDescriptor::new(
                            stringify!($field),
                            <$fty as $crate::descriptor::Describe>::describe
                                as fn() -> $crate::descriptor::TypeDescriptor,
                        )
                        .exported(stringify!($fvis) == "pub")
                        $(.tag($tag))?
                    ),*],
                )
            }
        }
    };
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident { $($body:tt)* }
    ) => {
        $crate::describe_struct! {
            unit module_path!();
            $(#[$attr])*
            $vis struct $name { $($body)* }
        }
    };
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    crate::describe_struct! {
        unit "desc";
        #[allow(dead_code)]
        pub struct Node {
            pub label: String => r#"json:"name""#,
            pub children: Vec<Node>,
            pub parent: Option<Box<Node>>,
            depth: u32,
        }
    }

    #[test]
    fn integers_carry_width_and_signedness() {
        assert!(matches!(u8::describe().kind, Kind::Int { bits: 8, signed: false }));
        assert!(matches!(i64::describe().kind, Kind::Int { bits: 64, signed: true }));
        assert!(matches!(f32::describe().kind, Kind::Float { bits: 32 }));
    }

    #[test]
    fn wrappers_are_references_and_containers_are_sequences() {
        assert!(Option::<String>::describe().is_reference());
        assert!(Box::<i32>::describe().is_reference());
        assert!(<&str>::describe().is_reference());
        assert!(Vec::<i32>::describe().is_array_like());
        assert!(<[u8; 4]>::describe().is_array_like());
        let el = VecDeque::<bool>::describe().element_type().unwrap();
        assert!(matches!(el.kind, Kind::Bool));
    }

    #[test]
    fn unsupported_kinds_are_flagged() {
        let kinds = [
            <fn(i32) -> i32>::describe().kind,
            <*const u8>::describe().kind,
            std::sync::mpsc::Sender::<u8>::describe().kind,
            HashMap::<String, u8>::describe().kind,
        ];
        let labels: Vec<_> = kinds.iter().map(|k| match k {
            Kind::Unsupported(u) => u.label(),
            _ => "supported",
        }).collect();
        assert_eq!(labels, ["fn", "raw-pointer", "channel", "map"]);
    }

    #[test]
    fn macro_describes_recursive_struct() {
        let node = Node::describe();
        let name = node.name.as_ref().unwrap();
        assert_eq!((&*name.unit, &*name.name), ("desc", "Node"));
        let fields = node.fields();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0].schema_name(), "name");
        assert!(fields[1].field_type().is_array_like());
        assert!(fields[2].field_type().is_reference());
        assert!(!fields[3].is_exported());

        // lazy refs let us walk the cycle one step at a time
        let child = fields[1].field_type().element_type().unwrap();
        assert_eq!(child.name, node.name);
    }

    mod default_unit {
        crate::describe_struct! {
            #[allow(dead_code)]
            pub struct Plain { pub x: i32 }
        }
    }

    #[test]
    fn macro_defaults_unit_to_module_path() {
        let desc = default_unit::Plain::describe();
        let unit = desc.name.unwrap().unit;
        assert!(unit.ends_with("descriptor::tests::default_unit"), "{unit}");
    }
}
