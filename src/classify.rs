//! Shape classification.
//!
//! Pure function of a [`TypeDescriptor`]: references are unwrapped first,
//! then the type falls in exactly one [`Shape`].
use serde::{Deserialize, Serialize};

use crate::descriptor::{Kind, TypeDescriptor, UnsupportedKind};

/// Fixed scalar vocabulary. Width and signedness are bucketed away.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scalar {
    Integer,
    Number,
    String,
    Boolean,
}

#[derive(Clone, Debug)]
pub enum Shape {
    Primitive(Scalar),
    /// Sequence; carries the element type, still unclassified.
    Array(TypeDescriptor),
    /// Field-bearing type, already dereferenced.
    Composite(TypeDescriptor),
    Unsupported(UnsupportedKind),
}

pub fn classify(desc: &TypeDescriptor) -> Shape {
    match &desc.kind {
        Kind::Reference(pointee) => classify(&pointee.get()),
        Kind::Bool => Shape::Primitive(Scalar::Boolean),
        Kind::Int { .. } => Shape::Primitive(Scalar::Integer),
        Kind::Float { .. } => Shape::Primitive(Scalar::Number),
        Kind::Text => Shape::Primitive(Scalar::String),
        Kind::Sequence(el) => Shape::Array(el.get().into_owned()),
        Kind::Struct(_) => Shape::Composite(desc.clone()),
        Kind::Unsupported(kind) => Shape::Unsupported(*kind),
    }
}

/// Strip all indirection: `Option<Box<T>>` resolves to `T`.
pub fn resolve(desc: &TypeDescriptor) -> TypeDescriptor {
    let mut current = desc.clone();
    while let Kind::Reference(pointee) = &current.kind {
        current = pointee.get().into_owned();
    }
    current
}

impl Scalar {
    pub fn as_str(self) -> &'static str {
        match self {
            Scalar::Integer => "integer",
            Scalar::Number => "number",
            Scalar::String => "string",
            Scalar::Boolean => "boolean",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::descriptor::{Describe, FieldDescriptor};

    fn scalar_of(desc: TypeDescriptor) -> Option<Scalar> {
        match classify(&desc) {
            Shape::Primitive(s) => Some(s),
            _ => None,
        }
    }

    #[test]
    fn integers_bucket_regardless_of_width() {
        let widths = [
            i8::describe(),
            u16::describe(),
            i64::describe(),
            u128::describe(),
            usize::describe(),
        ];
        for desc in widths {
            assert_eq!(scalar_of(desc), Some(Scalar::Integer));
        }
        assert_eq!(scalar_of(f32::describe()), Some(Scalar::Number));
        assert_eq!(scalar_of(f64::describe()), Some(Scalar::Number));
        assert_eq!(scalar_of(bool::describe()), Some(Scalar::Boolean));
        assert_eq!(scalar_of(String::describe()), Some(Scalar::String));
        assert_eq!(scalar_of(char::describe()), Some(Scalar::String));
    }

    #[test]
    fn indirection_is_transparent() {
        assert_eq!(scalar_of(Option::<Box<Arc<i32>>>::describe()), Some(Scalar::Integer));
        assert_eq!(scalar_of(<&str>::describe()), Some(Scalar::String));
    }

    #[test]
    fn resolve_strips_every_layer() {
        let desc = resolve(&Option::<Box<Arc<Vec<u8>>>>::describe());
        assert!(desc.is_array_like());
        assert!(!resolve(&<&bool>::describe()).is_reference());
    }

    #[test]
    fn sequences_yield_their_element() {
        let Shape::Array(el) = classify(&Option::<Vec<Option<u8>>>::describe()) else {
            panic!("expected array");
        };
        assert_eq!(scalar_of(el), Some(Scalar::Integer));
    }

    #[test]
    fn composites_are_dereferenced() {
        let anon = TypeDescriptor::anonymous(vec![FieldDescriptor::new("a", i32::describe())]);
        let boxed = TypeDescriptor::reference_to(anon);
        let Shape::Composite(desc) = classify(&boxed) else {
            panic!("expected composite");
        };
        assert_eq!(desc.fields().len(), 1);
    }

    #[test]
    fn unsupported_passes_through() {
        assert!(matches!(
            classify(&Option::<fn()>::describe()),
            Shape::Unsupported(UnsupportedKind::Function)
        ));
    }
}
