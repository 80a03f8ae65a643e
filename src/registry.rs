//! Per-pass model registry.
//!
//! Created fresh for one document, filled by the walker, read afterwards.
//! Models keep discovery order (root first). An id is reserved before its
//! fields are walked, so a type reached again while it is still being
//! compiled resolves to the reserved entry instead of recursing.
use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;

use crate::annotations::TagError;
use crate::descriptor::UnsupportedKind;
use crate::error::CompileError;
use crate::model::Model;

#[derive(Debug, Default)]
pub struct Registry {
    models: IndexMap<String, Model>,
    /// id -> shape signature, for collision detection
    signatures: HashMap<String, String>,
    diagnostics: Vec<Diagnostic>,
}

/// A locally resolved problem; compilation carried on past it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub model: String,
    pub field: String,
    pub kind: DiagnosticKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Field skipped.
    UnsupportedKind(UnsupportedKind),
    /// Declared name used instead.
    MalformedAnnotation(TagError),
    /// Two fields share a schema name; the first one is kept.
    DuplicateProperty(String),
}

#[derive(Debug)]
pub(crate) enum Reservation {
    Fresh,
    Existing,
}

/// Registry size at some point of a walk; see [`Registry::rollback`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct Checkpoint {
    models: usize,
    diagnostics: usize,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.models.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Model> {
        self.models.get(id)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Model)> {
        self.models.iter().map(|(id, model)| (id.as_str(), model))
    }

    pub fn models(&self) -> &IndexMap<String, Model> {
        &self.models
    }

    pub fn into_models(self) -> IndexMap<String, Model> {
        self.models
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub(crate) fn reserve(
        &mut self,
        id: &str,
        signature: String,
    ) -> Result<Reservation, CompileError> {
        match self.signatures.get(id) {
            Some(existing) if *existing == signature => Ok(Reservation::Existing),
            Some(existing) => Err(CompileError::IdCollision {
                id: id.to_string(),
                existing: existing.clone(),
                incoming: signature,
            }),
            None => {
                self.signatures.insert(id.to_string(), signature);
                self.models.insert(id.to_string(), Model::new(id));
                Ok(Reservation::Fresh)
            }
        }
    }

    /// Replace the reservation with the finished model, keeping its position.
    pub(crate) fn complete(&mut self, model: Model) {
        self.models.insert(model.id.clone(), model);
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint { models: self.models.len(), diagnostics: self.diagnostics.len() }
    }

    /// Forget every model and diagnostic added since `checkpoint`. Models are
    /// only ever appended, so these are exactly the ones reserved after it.
    pub(crate) fn rollback(&mut self, checkpoint: Checkpoint) {
        for (id, _) in self.models.drain(checkpoint.models..) {
            self.signatures.remove(&id);
        }
        self.diagnostics.truncate(checkpoint.diagnostics);
    }

    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

impl Diagnostic {
    pub fn new(model: &str, field: &str, kind: DiagnosticKind) -> Self {
        Self { model: model.to_string(), field: field.to_string(), kind }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::UnsupportedKind(kind) => write!(
                f,
                "{}.{}: unsupported kind `{kind}`, field skipped",
                self.model, self.field
            ),
            DiagnosticKind::MalformedAnnotation(error) => write!(
                f,
                "{}.{}: {error}, using declared name",
                self.model, self.field
            ),
            DiagnosticKind::DuplicateProperty(name) => write!(
                f,
                "{}.{}: property `{name}` already defined, field skipped",
                self.model, self.field
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reservation_is_visible_before_completion() {
        let mut registry = Registry::new();
        assert!(matches!(registry.reserve("a.B", "struct {}".into()), Ok(Reservation::Fresh)));
        assert!(registry.contains("a.B"));
        assert!(registry.get("a.B").unwrap().properties.is_empty());
        assert!(matches!(registry.reserve("a.B", "struct {}".into()), Ok(Reservation::Existing)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn completion_keeps_discovery_order() {
        let mut registry = Registry::new();
        for id in ["root", "child"] {
            let _ = registry.reserve(id, "struct {}".into());
        }
        registry.complete(Model::new("root"));
        let ids: Vec<_> = registry.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, ["root", "child"]);
    }

    #[test]
    fn rollback_forgets_everything_after_the_checkpoint() {
        let mut registry = Registry::new();
        let _ = registry.reserve("kept", "struct {}".into());
        let checkpoint = registry.checkpoint();
        let _ = registry.reserve("outer", "struct { x i32 }".into());
        let _ = registry.reserve("inner", "struct {}".into());
        registry.report(Diagnostic::new(
            "inner",
            "cb",
            DiagnosticKind::UnsupportedKind(UnsupportedKind::Function),
        ));

        registry.rollback(checkpoint);
        let ids: Vec<_> = registry.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, ["kept"]);
        assert!(registry.diagnostics().is_empty());
        // the signature went too, so a different shape may now take the id
        let retry = registry.reserve("outer", "struct { x u8 }".into());
        assert!(matches!(retry, Ok(Reservation::Fresh)));
    }

    #[test]
    fn conflicting_signature_is_a_collision() {
        let mut registry = Registry::new();
        let _ = registry.reserve("a.B", "struct { x i32 }".into());
        let err = registry.reserve("a.B", "struct { x i64 }".into()).err().unwrap();
        assert_eq!(
            err,
            CompileError::IdCollision {
                id: "a.B".into(),
                existing: "struct { x i32 }".into(),
                incoming: "struct { x i64 }".into(),
            }
        );
    }

    #[test]
    fn diagnostics_render_model_and_field() {
        let kind = DiagnosticKind::UnsupportedKind(UnsupportedKind::Function);
        let d = Diagnostic::new("a.B", "cb", kind);
        assert_eq!(d.to_string(), "a.B.cb: unsupported kind `fn`, field skipped");
    }
}
