//! Keeps the frontmatter container unique and at the top of the document, and
//! tracks whether one exists.

use tracing::debug;

use super::types::PresenceFlag;
use crate::model::{Change, Document, ElementKind, ModelError, PostFixer, Writer};

#[derive(Debug, Clone)]
pub struct FrontmatterPostFixer {
    flag: PresenceFlag,
}

impl FrontmatterPostFixer {
    pub fn new(flag: PresenceFlag) -> Self {
        Self { flag }
    }
}

impl PostFixer for FrontmatterPostFixer {
    fn post_fix(&mut self, writer: &mut Writer<'_>) -> Result<bool, ModelError> {
        if !writer.document().has_root() {
            return Ok(false);
        }

        for change in writer.changes() {
            match change {
                Change::Remove { kind: ElementKind::FrontmatterContainer, .. } => {
                    self.flag.set(false);
                }
                Change::Insert { kind: ElementKind::FrontmatterContainer, .. } => {
                    self.flag.set(true);
                    break;
                }
                _ => {}
            }
        }

        // Any edit can push a block above the container, not only its insertion.
        move_container_to_top(writer)
    }

    fn rolled_back(&mut self, document: &Document) {
        self.flag.set(document.count(&ElementKind::FrontmatterContainer) == 1);
    }
}

fn move_container_to_top(writer: &mut Writer<'_>) -> Result<bool, ModelError> {
    let document = writer.document();
    let count = document.count(&ElementKind::FrontmatterContainer);
    let first_is_container = document
        .element(&[0])
        .is_some_and(|element| element.is(&ElementKind::FrontmatterContainer));

    if first_is_container {
        if count > 1 {
            return Err(ModelError::InvariantViolation(format!(
                "{count} frontmatter containers in the document"
            )));
        }
        return Ok(false);
    }

    let Some(path) = document.find(&ElementKind::FrontmatterContainer) else {
        return Ok(false);
    };
    writer.move_to(&path, &[], 0)?;
    debug!(from = ?path, "moved frontmatter container to the top");
    Ok(true)
}
