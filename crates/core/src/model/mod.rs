//! Structured document model.
//!
//! All mutation goes through [`Model::change`]: the closure receives a
//! [`Writer`], and once it returns the registered [`PostFixer`]s run over the
//! accumulated change set until a full pass leaves the document alone. A
//! failed transaction is rolled back, so observers only ever see settled
//! states.

pub mod differ;
pub mod document;
pub mod errors;
pub mod node;
pub mod position;
pub mod schema;
pub mod writer;

pub use differ::{Change, Differ};
pub use document::{Document, MAIN_ROOT, RootElement};
pub use errors::ModelError;
pub use node::{Attribute, Content, Element, ElementKind, Inline, NodeId};
pub use position::{Position, Selection};
pub use schema::{Schema, SchemaContext};
pub use writer::Writer;

use tracing::{debug, warn};

/// Upper bound on post-fixer passes per transaction.
pub const MAX_POST_FIX_PASSES: usize = 10;

/// Repair pass run after every transaction. Returns `true` when it changed the
/// document, which schedules another pass.
pub trait PostFixer {
    fn post_fix(&mut self, writer: &mut Writer<'_>) -> Result<bool, ModelError>;

    /// Called after a failed transaction has been rolled back, with the
    /// restored document.
    fn rolled_back(&mut self, _document: &Document) {}
}

impl<F> PostFixer for F
where
    F: FnMut(&mut Writer<'_>) -> Result<bool, ModelError>,
{
    fn post_fix(&mut self, writer: &mut Writer<'_>) -> Result<bool, ModelError> {
        self(writer)
    }
}

#[derive(Default)]
pub struct Model {
    document: Document,
    schema: Schema,
    selection: Selection,
    post_fixers: Vec<Box<dyn PostFixer>>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("document", &self.document)
            .field("selection", &self.selection)
            .field("post_fixers", &self.post_fixers.len())
            .finish()
    }
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Model over a document that has no root yet.
    pub fn uninitialized() -> Self {
        Self { document: Document::uninitialized(), ..Self::default() }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn schema_mut(&mut self) -> &mut Schema {
        &mut self.schema
    }

    pub fn register_post_fixer(&mut self, post_fixer: impl PostFixer + 'static) {
        self.post_fixers.push(Box::new(post_fixer));
    }

    /// Runs `f` as one transaction followed by the post-fixers.
    pub fn change<R>(
        &mut self,
        f: impl FnOnce(&mut Writer<'_>) -> Result<R, ModelError>,
    ) -> Result<R, ModelError> {
        let snapshot = (self.document.clone(), self.selection.clone());
        let mut differ = Differ::default();

        let written = {
            let mut writer =
                Writer::new(&mut self.document, &self.schema, &mut self.selection, &mut differ);
            f(&mut writer)
        };
        let result = written.and_then(|value| self.run_post_fixers(&mut differ).map(|()| value));

        if let Err(err) = &result {
            warn!(error = %err, "transaction rolled back");
            (self.document, self.selection) = snapshot;
            for post_fixer in &mut self.post_fixers {
                post_fixer.rolled_back(&self.document);
            }
        }
        result
    }

    fn run_post_fixers(&mut self, differ: &mut Differ) -> Result<(), ModelError> {
        if differ.is_empty() {
            return Ok(());
        }
        for pass in 1..=MAX_POST_FIX_PASSES {
            let mut changed = false;
            for post_fixer in &mut self.post_fixers {
                let mut writer =
                    Writer::new(&mut self.document, &self.schema, &mut self.selection, differ);
                if post_fixer.post_fix(&mut writer)? {
                    changed = true;
                    break;
                }
            }
            if !changed {
                debug!(passes = pass, changes = differ.changes().len(), "transaction settled");
                return Ok(());
            }
        }
        Err(ModelError::PostFixLimit(MAX_POST_FIX_PASSES))
    }
}
