//! Line breaks inside the frontmatter body.
//!
//! Enter never splits the body. It inserts a soft break instead, and pressing
//! it again right after a trailing soft break leaves the block: the break is
//! dropped and a paragraph opens below the container.

use tracing::debug;

use super::utils::{
    find_frontmatter_container, in_frontmatter, is_frontmatter_end,
    remove_soft_break_before_selection,
};
use crate::editor::builtin::{INSERT_PARAGRAPH, SHIFT_ENTER};
use crate::editor::{CommandParams, Editor, EditorError, EnterEvent, EventOutcome};
use crate::model::Position;

pub(crate) fn handle_enter(
    editor: &mut Editor,
    _: &EnterEvent,
) -> Result<EventOutcome, EditorError> {
    if !in_frontmatter(editor.model()) {
        return Ok(EventOutcome::Ignored);
    }

    if !is_frontmatter_end(editor.model()) {
        editor.execute(SHIFT_ENTER)?;
        return Ok(EventOutcome::Handled);
    }

    let Some(container) = find_frontmatter_container(editor.model()) else {
        return Ok(EventOutcome::Ignored);
    };
    let Some((&index, parent)) = container.split_last() else {
        return Ok(EventOutcome::Ignored);
    };
    let after = Position::new(parent, index + 1);

    remove_soft_break_before_selection(editor)?;
    debug!(?after, "leaving frontmatter");
    editor.execute_with(INSERT_PARAGRAPH, &CommandParams::at(after))?;
    Ok(EventOutcome::Handled)
}
