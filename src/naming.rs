//! Model ids.
//!
//! Declared types are keyed `"<unit>.<name>"`. Anonymous composites are keyed
//! by a canonical rendering of their shape, `struct { a i32; b ||pkg.Item }`,
//! so the same shape always yields the same id and two different shapes
//! never do. Every field takes part in the rendering; hidden ones are
//! prefixed with `priv`. Names that are empty, are `priv`, or contain one of
//! the rendering's own delimiters are written as quoted strings.
use std::borrow::Cow;

use crate::descriptor::{FieldDescriptor, Kind, TypeDescriptor};

/// Id of a composite descriptor (references already stripped).
pub fn model_id(desc: &TypeDescriptor) -> String {
    match &desc.name {
        Some(name) => format!("{}.{}", name.unit, name.name),
        None => render_struct(desc.fields()),
    }
}

/// Body rendering of a composite, independent of its declared name. Two
/// descriptors registered under one id must agree on this.
pub fn shape_signature(desc: &TypeDescriptor) -> String {
    render_struct(desc.fields())
}

pub fn render_type(desc: &TypeDescriptor) -> String {
    match &desc.kind {
        Kind::Bool => "bool".to_string(),
        Kind::Int { bits, signed: true } => format!("i{bits}"),
        Kind::Int { bits, signed: false } => format!("u{bits}"),
        Kind::Float { bits } => format!("f{bits}"),
        Kind::Text => "string".to_string(),
        Kind::Reference(pointee) => format!("*{}", render_type(&pointee.get())),
        Kind::Sequence(el) => format!("||{}", render_type(&el.get())),
        Kind::Struct(_) => match &desc.name {
            Some(_) => token(&model_id(desc)).into_owned(),
            None => model_id(desc),
        },
        Kind::Unsupported(kind) => kind.label().to_string(),
    }
}

fn render_struct(fields: &[FieldDescriptor]) -> String {
    if fields.is_empty() {
        return "struct {}".to_string();
    }
    let body = fields.iter().map(render_field).collect::<Vec<_>>().join("; ");
    format!("struct {{ {body} }}")
}

fn render_field(field: &FieldDescriptor) -> String {
    let visibility = if field.exported { "" } else { "priv " };
    let mut out = format!("{visibility}{} {}", token(&field.name), render_type(&field.ty.get()));
    if !field.raw_tag.is_empty() {
        out.push_str(&format!(" {:?}", field.raw_tag));
    }
    out
}

fn token(name: &str) -> Cow<'_, str> {
    let delimiter = |c: char| c.is_whitespace() || matches!(c, ';' | '{' | '}' | '"');
    if name.is_empty() || name == "priv" || name.contains(delimiter) {
        Cow::Owned(format!("{name:?}"))
    } else {
        Cow::Borrowed(name)
    }
}
