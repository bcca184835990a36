//! Commands every editor starts with.

use tracing::debug;

use crate::model::{
    Attribute, Element, ElementKind, Inline, Model, ModelError, Position, SchemaContext,
    Selection, Writer,
};

use super::command::{Command, CommandParams};
use super::{Editor, EditorError};

pub const ENTER: &str = "enter";
pub const SHIFT_ENTER: &str = "shiftEnter";
pub const INSERT_PARAGRAPH: &str = "insertParagraph";
pub const INPUT: &str = "input";
pub const DELETE: &str = "delete";
pub const BOLD: &str = "bold";
pub const ITALIC: &str = "italic";

pub(crate) fn register(editor: &mut Editor) {
    editor.add_command(ENTER, EnterCommand::default());
    editor.add_command(SHIFT_ENTER, ShiftEnterCommand::default());
    editor.add_command(INSERT_PARAGRAPH, InsertParagraphCommand::default());
    editor.add_command(INPUT, InputCommand::default());
    editor.add_command(DELETE, DeleteCommand::default());
    editor.add_command(BOLD, AttributeCommand::new(Attribute::Bold));
    editor.add_command(ITALIC, AttributeCommand::new(Attribute::Italic));
}

/// Element holding inline content at `position`, if any.
fn inline_holder<'m>(model: &'m Model, position: &Position) -> Option<&'m Element> {
    model.document().element(&position.path).filter(|element| element.kind().holds_inlines())
}

/// Removes a non-collapsed selection inside one inline holder.
fn remove_selected_inlines(writer: &mut Writer<'_>) -> Result<(), ModelError> {
    if writer.selection().is_collapsed() {
        return Ok(());
    }
    let Some((path, start, end)) =
        writer.selection().flat_range().map(|(path, start, end)| (path.to_vec(), start, end))
    else {
        return Ok(());
    };
    let holds_inlines =
        writer.document().element(&path).is_some_and(|element| element.kind().holds_inlines());
    if holds_inlines {
        writer.remove_inlines(&path, start, end)?;
    }
    Ok(())
}

/// Splits the block at the selection, or starts a new paragraph when the
/// selection sits between blocks.
#[derive(Debug, Default)]
pub struct EnterCommand {
    enabled: bool,
}

impl Command for EnterCommand {
    fn refresh(&mut self, model: &Model) {
        self.enabled = model.document().has_root();
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn execute(&mut self, editor: &mut Editor, _: &CommandParams) -> Result<(), EditorError> {
        editor.change(|writer| {
            remove_selected_inlines(writer)?;
            let position = writer.selection().first().clone();
            let kind =
                writer.document().element(&position.path).map(|element| element.kind().clone());
            match kind {
                Some(ElementKind::CodeBlock { .. }) => {
                    writer.insert_text(&position, "\n")?;
                }
                Some(kind) if kind.is_limit() => {
                    debug!(kind = kind.name(), "enter ignored inside limit element");
                }
                Some(kind) if kind.holds_inlines() => {
                    let next = writer.split(&position)?;
                    writer.set_selection(Selection::collapsed(next));
                }
                _ => {
                    let paragraph = Element::paragraph("");
                    let path = writer.insert(&position.path, position.offset, paragraph)?;
                    writer.set_selection(Selection::collapsed(Position::new(path, 0)));
                }
            }
            Ok(())
        })
    }
}

/// Inserts a soft break at the selection.
#[derive(Debug, Default)]
pub struct ShiftEnterCommand {
    enabled: bool,
}

impl Command for ShiftEnterCommand {
    fn refresh(&mut self, model: &Model) {
        self.enabled = inline_holder(model, model.selection().first())
            .is_some_and(|element| !matches!(element.kind(), ElementKind::CodeBlock { .. }));
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn execute(&mut self, editor: &mut Editor, _: &CommandParams) -> Result<(), EditorError> {
        editor.change(|writer| {
            remove_selected_inlines(writer)?;
            let position = writer.selection().first().clone();
            writer.insert_inline(&position, Inline::SoftBreak)?;
            Ok(())
        })
    }
}

/// Inserts an empty paragraph at `params.position` and moves the selection
/// into it.
#[derive(Debug, Default)]
pub struct InsertParagraphCommand {
    enabled: bool,
}

impl Command for InsertParagraphCommand {
    fn refresh(&mut self, model: &Model) {
        self.enabled = model.document().has_root();
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn execute(&mut self, editor: &mut Editor, params: &CommandParams) -> Result<(), EditorError> {
        let position = params.position.clone().ok_or(EditorError::MissingParameter("position"))?;
        editor.change(|writer| {
            let path = writer.insert(&position.path, position.offset, Element::paragraph(""))?;
            writer.set_selection(Selection::collapsed(Position::new(path, 0)));
            Ok(())
        })
    }
}

/// Types `params.text` at the selection, replacing selected text.
#[derive(Debug, Default)]
pub struct InputCommand {
    enabled: bool,
}

impl Command for InputCommand {
    fn refresh(&mut self, model: &Model) {
        self.enabled = inline_holder(model, model.selection().first()).is_some();
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn execute(&mut self, editor: &mut Editor, params: &CommandParams) -> Result<(), EditorError> {
        let text = params.text.clone().ok_or(EditorError::MissingParameter("text"))?;
        editor.change(|writer| {
            remove_selected_inlines(writer)?;
            let position = writer.selection().first().clone();
            writer.insert_text(&position, &text)?;
            Ok(())
        })
    }
}

/// Backward deletion.
///
/// A collapsed selection removes the character or soft break before it. A
/// selection inside one block removes the selected text; a selection spanning
/// sibling blocks removes those blocks whole.
#[derive(Debug, Default)]
pub struct DeleteCommand {
    enabled: bool,
}

impl Command for DeleteCommand {
    fn refresh(&mut self, model: &Model) {
        self.enabled = model.document().has_root();
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn execute(&mut self, editor: &mut Editor, _: &CommandParams) -> Result<(), EditorError> {
        editor.change(|writer| {
            let selection = writer.selection().clone();
            let (first, last) = (selection.first().clone(), selection.last().clone());
            let holds_inlines = writer
                .document()
                .element(&first.path)
                .is_some_and(|element| element.kind().holds_inlines());

            if first.path != last.path {
                debug!(?first, ?last, "deleting across blocks is not supported");
                return Ok(());
            }
            if holds_inlines {
                if selection.is_collapsed() && first.offset > 0 {
                    writer.remove_inlines(&first.path, first.offset - 1, first.offset)?;
                } else {
                    writer.remove_inlines(&first.path, first.offset, last.offset)?;
                }
                return Ok(());
            }

            for index in (first.offset..last.offset).rev() {
                let mut path = first.path.clone();
                path.push(index);
                writer.remove(&path)?;
            }
            let caret = caret_near(writer, &first);
            writer.set_selection(Selection::collapsed(caret));
            Ok(())
        })
    }
}

/// Start of the block at `position`, or of the block before it, when that
/// block holds text. Falls back to `position` itself.
fn caret_near(writer: &Writer<'_>, position: &Position) -> Position {
    let candidates = [Some(position.offset), position.offset.checked_sub(1)];
    for index in candidates.into_iter().flatten() {
        let mut path = position.path.clone();
        path.push(index);
        if writer.document().element(&path).is_some_and(|element| element.kind().holds_inlines()) {
            return Position::new(path, 0);
        }
    }
    position.clone()
}

/// Toggles a text attribute on the selected range.
#[derive(Debug)]
pub struct AttributeCommand {
    attribute: Attribute,
    enabled: bool,
    value: bool,
}

impl AttributeCommand {
    pub fn new(attribute: Attribute) -> Self {
        Self { attribute, enabled: false, value: false }
    }
}

impl Command for AttributeCommand {
    fn refresh(&mut self, model: &Model) {
        let range = model.selection().flat_range();
        let holder = range.and_then(|(path, _, _)| {
            model.document().element(path).filter(|element| element.kind().holds_inlines())
        });
        match (range, holder) {
            (Some((path, start, end)), Some(element)) => {
                let context = SchemaContext::new(model.document(), path);
                self.enabled = model.schema().check_attribute(&context, self.attribute);
                self.value = self.enabled
                    && start < end
                    && range_has_attribute(element.inlines(), start, end, self.attribute);
            }
            _ => {
                self.enabled = false;
                self.value = false;
            }
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn value(&self) -> bool {
        self.value
    }

    fn execute(&mut self, editor: &mut Editor, _: &CommandParams) -> Result<(), EditorError> {
        let Some((path, start, end)) = editor
            .model()
            .selection()
            .flat_range()
            .map(|(path, start, end)| (path.to_vec(), start, end))
        else {
            return Ok(());
        };
        if start == end {
            return Ok(());
        }
        let (attribute, enable) = (self.attribute, !self.value);
        editor.change(|writer| writer.set_attribute(&path, start, end, attribute, enable))
    }
}

/// Every text node overlapping `start..end` carries `attribute`.
fn range_has_attribute(inlines: &[Inline], start: usize, end: usize, attribute: Attribute) -> bool {
    let mut offset = 0;
    let mut covered = false;
    for inline in inlines {
        let (from, to) = (offset, offset + inline.len());
        offset = to;
        if to <= start || from >= end {
            continue;
        }
        if let Inline::Text { attributes, .. } = inline {
            if !attributes.contains(&attribute) {
                return false;
            }
            covered = true;
        }
    }
    covered
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn attribute_range_requires_full_coverage() {
        let bold = BTreeSet::from([Attribute::Bold]);
        let inlines = vec![Inline::styled("ab", bold.clone()), Inline::text("cd")];
        assert!(range_has_attribute(&inlines, 0, 2, Attribute::Bold));
        assert!(!range_has_attribute(&inlines, 1, 3, Attribute::Bold));
        assert!(!range_has_attribute(&[Inline::SoftBreak], 0, 1, Attribute::Bold));
    }
}
