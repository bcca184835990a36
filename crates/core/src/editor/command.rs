use crate::model::{Model, Position};

use super::{Editor, EditorError};

/// Arguments passed to [`Command::execute`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandParams {
    pub position: Option<Position>,
    pub text: Option<String>,
}

impl CommandParams {
    pub fn at(position: Position) -> Self {
        Self { position: Some(position), ..Self::default() }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), ..Self::default() }
    }
}

/// A named editing operation with a refreshed enabled state.
///
/// [`Editor::execute`] refreshes the command before running it and skips it
/// when disabled, so `execute` may assume its preconditions held at refresh
/// time.
pub trait Command {
    /// Recomputes state from the settled model.
    fn refresh(&mut self, model: &Model);

    fn is_enabled(&self) -> bool;

    /// Toggle state for commands that have one.
    fn value(&self) -> bool {
        false
    }

    fn execute(&mut self, editor: &mut Editor, params: &CommandParams) -> Result<(), EditorError>;
}
