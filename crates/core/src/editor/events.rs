use super::{Editor, EditorError};

/// Listener priority; higher priorities run first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Lowest,
    Low,
    #[default]
    Normal,
    High,
    Highest,
}

/// Whether a listener consumed the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Default handling and lower-priority listeners are skipped.
    Handled,
    Ignored,
}

/// The line break key was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnterEvent {
    /// Shift was held: the default action is a soft break.
    pub soft: bool,
}

pub trait EnterHandler {
    fn handle(&mut self, editor: &mut Editor, event: &EnterEvent)
    -> Result<EventOutcome, EditorError>;
}

impl<F> EnterHandler for F
where
    F: FnMut(&mut Editor, &EnterEvent) -> Result<EventOutcome, EditorError>,
{
    fn handle(
        &mut self,
        editor: &mut Editor,
        event: &EnterEvent,
    ) -> Result<EventOutcome, EditorError> {
        self(editor, event)
    }
}
