//! Editor facade: owns the model and data pipeline and dispatches commands
//! and key events.

pub mod builtin;
pub mod command;
pub mod events;

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, trace};

pub use command::{Command, CommandParams};
pub use events::{EnterEvent, EnterHandler, EventOutcome, Priority};

use crate::data::DataController;
use crate::model::{Element, Model, ModelError, Position, Selection, Writer};

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("command parameter '{0}' is missing")]
    MissingParameter(&'static str),

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub struct Editor {
    model: Model,
    data: DataController,
    commands: HashMap<String, Box<dyn Command>>,
    enter_handlers: Vec<(Priority, Box<dyn EnterHandler>)>,
    placeholder: Option<String>,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut commands: Vec<_> = self.commands.keys().collect();
        commands.sort();
        f.debug_struct("Editor")
            .field("model", &self.model)
            .field("data", &self.data)
            .field("commands", &commands)
            .field("enter_handlers", &self.enter_handlers.len())
            .field("placeholder", &self.placeholder)
            .finish()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Editor over an empty document with the built-in commands.
    pub fn new() -> Self {
        Self::with_model(Model::new())
    }

    /// Editor whose document root is not available yet.
    pub fn uninitialized() -> Self {
        Self::with_model(Model::uninitialized())
    }

    fn with_model(mut model: Model) -> Self {
        model.register_post_fixer(autoparagraph);
        let mut editor = Self {
            model,
            data: DataController::default(),
            commands: HashMap::new(),
            enter_handlers: Vec::new(),
            placeholder: None,
        };
        builtin::register(&mut editor);
        if let Err(err) = editor.change(|writer| autoparagraph(writer).map(|_| ())) {
            debug!(error = %err, "initial settle failed");
        }
        editor
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// For plugins registering schema rules and post-fixers.
    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    pub fn data(&self) -> &DataController {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut DataController {
        &mut self.data
    }

    /// Runs a model transaction and refreshes every command afterwards.
    pub fn change<R>(
        &mut self,
        f: impl FnOnce(&mut Writer<'_>) -> Result<R, ModelError>,
    ) -> Result<R, EditorError> {
        let result = self.model.change(f);
        self.refresh_commands();
        Ok(result?)
    }

    pub fn set_selection(&mut self, selection: Selection) -> Result<(), EditorError> {
        self.change(|writer| {
            writer.set_selection(selection);
            Ok(())
        })
    }

    /// Replaces the document content with `markdown`.
    pub fn set_data(&mut self, markdown: &str) -> Result<(), EditorError> {
        let result = self.data.set(&mut self.model, markdown);
        self.refresh_commands();
        Ok(result?)
    }

    /// Serializes the document to markdown.
    pub fn get_data(&self) -> String {
        self.data.get(self.model.document())
    }

    pub fn add_command(&mut self, name: impl Into<String>, command: impl Command + 'static) {
        let mut command: Box<dyn Command> = Box::new(command);
        command.refresh(&self.model);
        self.commands.insert(name.into(), command);
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Enabled state of `name`; unknown commands are disabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.commands.get(name).is_some_and(|command| command.is_enabled())
    }

    pub fn command_value(&self, name: &str) -> bool {
        self.commands.get(name).is_some_and(|command| command.value())
    }

    pub fn execute(&mut self, name: &str) -> Result<(), EditorError> {
        self.execute_with(name, &CommandParams::default())
    }

    /// Runs `name` when it is enabled; a disabled command is a no-op.
    pub fn execute_with(&mut self, name: &str, params: &CommandParams) -> Result<(), EditorError> {
        let mut command = self
            .commands
            .remove(name)
            .ok_or_else(|| EditorError::UnknownCommand(name.to_string()))?;
        command.refresh(&self.model);

        let result = if command.is_enabled() {
            trace!(command = name, "execute");
            command.execute(self, params)
        } else {
            debug!(command = name, "command disabled, not executed");
            Ok(())
        };

        self.commands.insert(name.to_string(), command);
        self.refresh_commands();
        result
    }

    fn refresh_commands(&mut self) {
        for command in self.commands.values_mut() {
            command.refresh(&self.model);
        }
    }

    /// Registers a listener for the line break key. Listeners with a higher
    /// priority run first; equal priorities run in registration order.
    pub fn on_enter(&mut self, priority: Priority, handler: impl EnterHandler + 'static) {
        let index = self.enter_handlers.partition_point(|(existing, _)| *existing >= priority);
        self.enter_handlers.insert(index, (priority, Box::new(handler)));
    }

    /// Enter key: listeners first, then the `enter` command.
    pub fn press_enter(&mut self) -> Result<EventOutcome, EditorError> {
        self.fire_enter(EnterEvent { soft: false })
    }

    /// Shift+Enter: listeners first, then the `shiftEnter` command.
    pub fn press_shift_enter(&mut self) -> Result<EventOutcome, EditorError> {
        self.fire_enter(EnterEvent { soft: true })
    }

    fn fire_enter(&mut self, event: EnterEvent) -> Result<EventOutcome, EditorError> {
        let mut handlers = std::mem::take(&mut self.enter_handlers);
        let mut outcome = Ok(EventOutcome::Ignored);
        for (_, handler) in &mut handlers {
            outcome = handler.handle(self, &event);
            if !matches!(outcome, Ok(EventOutcome::Ignored)) {
                break;
            }
        }
        // Listeners added while dispatching go after the existing ones.
        let added = std::mem::replace(&mut self.enter_handlers, handlers);
        for (priority, handler) in added {
            let index = self.enter_handlers.partition_point(|(existing, _)| *existing >= priority);
            self.enter_handlers.insert(index, (priority, handler));
        }

        if outcome? == EventOutcome::Handled {
            return Ok(EventOutcome::Handled);
        }
        self.execute(if event.soft { builtin::SHIFT_ENTER } else { builtin::ENTER })?;
        Ok(EventOutcome::Ignored)
    }

    /// Types `text` at the selection.
    pub fn type_text(&mut self, text: &str) -> Result<(), EditorError> {
        self.execute_with(builtin::INPUT, &CommandParams::text(text))
    }

    /// Backspace.
    pub fn delete(&mut self) -> Result<(), EditorError> {
        self.execute(builtin::DELETE)
    }

    /// Prompt shown while the main editable is empty.
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn set_placeholder(&mut self, placeholder: Option<String>) {
        self.placeholder = placeholder.filter(|text| !text.is_empty());
    }
}

/// Keeps at least one paragraph in an existing root.
fn autoparagraph(writer: &mut Writer<'_>) -> Result<bool, ModelError> {
    let empty = writer.document().root().is_some_and(|root| root.child_count() == 0);
    if !empty {
        return Ok(false);
    }
    writer.insert(&[], 0, Element::paragraph(""))?;
    writer.set_selection(Selection::collapsed(Position::new([0], 0)));
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ElementKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn new_editor_has_an_empty_paragraph() {
        let editor = Editor::new();
        let root = editor.model().document().root().unwrap();
        assert_eq!(root.child_count(), 1);
        assert_eq!(root.child(0).map(Element::kind), Some(&ElementKind::Paragraph));
        assert_eq!(editor.get_data(), "");
    }

    #[test]
    fn typing_and_enter_split_paragraphs() {
        let mut editor = Editor::new();
        editor.type_text("hello world").unwrap();
        editor.set_selection(Selection::collapsed(Position::new([0], 5))).unwrap();
        editor.press_enter().unwrap();
        assert_eq!(editor.get_data(), "hello\n\n world");
        assert_eq!(editor.model().selection().anchor, Position::new([1], 0));
    }

    #[test]
    fn shift_enter_inserts_soft_break() {
        let mut editor = Editor::new();
        editor.type_text("a").unwrap();
        editor.press_shift_enter().unwrap();
        editor.type_text("b").unwrap();
        assert_eq!(editor.get_data(), "a  \nb");
    }

    #[test]
    fn delete_removes_character_before_caret() {
        let mut editor = Editor::new();
        editor.type_text("abc").unwrap();
        editor.delete().unwrap();
        assert_eq!(editor.get_data(), "ab");
    }

    #[test]
    fn bold_toggles_on_selection() {
        let mut editor = Editor::new();
        editor.type_text("abc").unwrap();
        editor
            .set_selection(Selection::new(Position::new([0], 0), Position::new([0], 3)))
            .unwrap();
        assert!(editor.is_enabled(builtin::BOLD));
        editor.execute(builtin::BOLD).unwrap();
        assert_eq!(editor.get_data(), "**abc**");
        assert!(editor.command_value(builtin::BOLD));
        editor.execute(builtin::BOLD).unwrap();
        assert_eq!(editor.get_data(), "abc");
    }

    #[test]
    fn unknown_command_is_an_error() {
        let mut editor = Editor::new();
        let result = editor.execute("nope");
        assert!(matches!(result, Err(EditorError::UnknownCommand(name)) if name == "nope"));
    }

    #[test]
    fn enter_handlers_run_by_priority() {
        let mut editor = Editor::new();
        let calls = Rc::new(RefCell::new(Vec::new()));

        let log = Rc::clone(&calls);
        editor.on_enter(Priority::Normal, move |_: &mut Editor, _: &EnterEvent| {
            log.borrow_mut().push("normal");
            Ok::<_, EditorError>(EventOutcome::Ignored)
        });
        let log = Rc::clone(&calls);
        editor.on_enter(Priority::High, move |_: &mut Editor, _: &EnterEvent| {
            log.borrow_mut().push("high");
            Ok::<_, EditorError>(EventOutcome::Handled)
        });

        assert_eq!(editor.press_enter().unwrap(), EventOutcome::Handled);
        assert_eq!(*calls.borrow(), vec!["high"]);
        // Handled: the default split did not happen.
        assert_eq!(editor.model().document().root().map(|root| root.child_count()), Some(1));
    }

    #[test]
    fn uninitialized_editor_ignores_edits() {
        let mut editor = Editor::uninitialized();
        editor.set_data("text").unwrap();
        editor.press_enter().unwrap();
        assert_eq!(editor.get_data(), "");
        assert!(!editor.is_enabled(builtin::ENTER));
    }

    #[test]
    fn placeholder_ignores_empty_text() {
        let mut editor = Editor::new();
        editor.set_placeholder(Some(String::new()));
        assert_eq!(editor.placeholder(), None);
        editor.set_placeholder(Some("Start writing...".into()));
        assert_eq!(editor.placeholder(), Some("Start writing..."));
    }
}
