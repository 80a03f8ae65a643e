//! Swagger model generation from Rust types.
//!
//! A representative sample (or just its type) is compiled into a registry of
//! named models: fields, scalar types, arrays and `$ref`s between models.
//! The document layer stitches those registries into per-service API
//! declarations.
//!
//! ```ignore
//! use swagger_models::{describe_struct, walker::compile_model, registry::Registry};
//!
//! describe_struct! {
//!     #[derive(Default)]
//!     pub struct Item { pub id: String, pub tags: Vec<String> }
//! }
//!
//! let mut registry = Registry::new();
//! let id = compile_model(&Item::default(), &mut registry, true)?;
//! ```
pub mod annotations;
pub mod classify;
pub mod config;
pub mod demo;
pub mod descriptor;
pub mod document;
pub mod error;
pub mod model;
pub mod naming;
pub mod registry;
pub mod service;
pub mod walker;

pub use classify::{classify, Scalar, Shape};
pub use config::Config;
pub use descriptor::{Describe, FieldDescriptor, Kind, TypeDescriptor, UnsupportedKind};
pub use document::{compose_all, compose_declaration, resource_listing, ApiDeclaration, Composed};
pub use error::{CompileError, ConfigError, DocumentError};
pub use model::{DataType, Model, Property};
pub use registry::{Diagnostic, DiagnosticKind, Registry};
pub use service::{RouteBuilder, Route, WebService, MIME_JSON, MIME_XML};
pub use walker::{compile_descriptor, compile_model, compile_type};
