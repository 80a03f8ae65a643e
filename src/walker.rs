//! Sample-to-model compiler.
//!
//! Walks a composite type field by field, registering every composite it
//! reaches exactly once and describing each field as a primitive, a `$ref`
//! to another model, or an array of either.
use tracing::{debug, warn};

use crate::classify::{classify, resolve, Shape};
use crate::descriptor::{Describe, FieldDescriptor, TypeDescriptor};
use crate::error::CompileError;
use crate::model::{Model, Property};
use crate::naming;
use crate::registry::{Diagnostic, DiagnosticKind, Registry, Reservation};

// ------------------------------- Front API -------------------------------- //

/// Compile the static type of `sample` into `registry` and return its id.
///
/// The sample value itself is never inspected; absent optional fields still
/// get models from their declared types. With `root` set, a sequence sample
/// (e.g. `Vec<Item>`) compiles its element type.
pub fn compile_model<T: Describe + ?Sized>(
    _sample: &T,
    registry: &mut Registry,
    root: bool,
) -> Result<String, CompileError> {
    compile_descriptor(&T::describe(), registry, root)
}

pub fn compile_type<T: Describe + ?Sized>(
    registry: &mut Registry,
    root: bool,
) -> Result<String, CompileError> {
    compile_descriptor(&T::describe(), registry, root)
}

pub fn compile_descriptor(
    desc: &TypeDescriptor,
    registry: &mut Registry,
    root: bool,
) -> Result<String, CompileError> {
    let desc = resolve(desc);
    match classify(&desc) {
        Shape::Composite(desc) => compile_composite(&desc, registry),
        Shape::Array(element) if root => compile_descriptor(&element, registry, root),
        Shape::Array(_) | Shape::Primitive(_) => Err(CompileError::NotComposite {
            rendered: naming::render_type(&desc),
        }),
        Shape::Unsupported(kind) => Err(CompileError::Unsupported(kind)),
    }
}

// ------------------------------- Walk ------------------------------------- //

/// On failure every model reserved since this one (itself included) is rolled
/// back, so a registry never holds a half-built model.
fn compile_composite(
    desc: &TypeDescriptor,
    registry: &mut Registry,
) -> Result<String, CompileError> {
    let id = naming::model_id(desc);
    let checkpoint = registry.checkpoint();
    match registry.reserve(&id, naming::shape_signature(desc))? {
        Reservation::Existing => return Ok(id),
        Reservation::Fresh => debug!(model = %id, "compiling model"),
    }

    match compile_fields(&id, desc, registry) {
        Ok(model) => {
            registry.complete(model);
            Ok(id)
        }
        Err(error) => {
            debug!(model = %id, %error, "abandoning model");
            registry.rollback(checkpoint);
            Err(error)
        }
    }
}

fn compile_fields(
    id: &str,
    desc: &TypeDescriptor,
    registry: &mut Registry,
) -> Result<Model, CompileError> {
    let mut model = Model::new(id);
    for field in desc.fields() {
        // visibility trumps annotations
        if !field.is_exported() {
            continue;
        }
        if let Some(error) = &field.tag_error {
            warn!(model = %id, field = %field.name, %error, "malformed annotation");
            registry.report(Diagnostic::new(
                id,
                field.field_name(),
                DiagnosticKind::MalformedAnnotation(error.clone()),
            ));
        }
        if field.annotations.ignore {
            continue;
        }
        let name = field.schema_name();
        if model.properties.contains_key(name) {
            warn!(model = %id, field = %field.name, property = name, "duplicate property");
            registry.report(Diagnostic::new(
                id,
                field.field_name(),
                DiagnosticKind::DuplicateProperty(name.to_string()),
            ));
            continue;
        }
        let Some(mut property) = compile_property(id, field, &field.field_type(), registry)? else {
            continue;
        };
        property.description = field.annotations.description.clone();
        if field.annotations.required {
            model.required.push(name.to_string());
        }
        model.properties.insert(name.to_string(), property);
    }
    Ok(model)
}

/// `None` when the field (or its element) has an unsupported kind.
fn compile_property(
    owner: &str,
    field: &FieldDescriptor,
    ty: &TypeDescriptor,
    registry: &mut Registry,
) -> Result<Option<Property>, CompileError> {
    let property = match classify(ty) {
        Shape::Primitive(scalar) => Property::primitive(scalar),
        Shape::Composite(desc) => Property::reference(compile_composite(&desc, registry)?),
        Shape::Array(element) => match compile_property(owner, field, &element, registry)? {
            Some(items) => Property::array(items),
            None => return Ok(None),
        },
        Shape::Unsupported(kind) => {
            warn!(model = owner, field = %field.name, %kind, "unsupported kind, skipping field");
            registry.report(Diagnostic::new(
                owner,
                field.field_name(),
                DiagnosticKind::UnsupportedKind(kind),
            ));
            return Ok(None);
        }
    };
    Ok(Some(property))
}

// ------------------------------- Tests ------------------------------------ //
