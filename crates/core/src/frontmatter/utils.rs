//! Selection queries around the frontmatter body.

use crate::editor::{Editor, EditorError};
use crate::model::node::node_before;
use crate::model::{ElementKind, Inline, Model};

/// The selection starts inside a frontmatter body.
pub fn in_frontmatter(model: &Model) -> bool {
    let path = &model.selection().first().path;
    model.document().element(path).is_some_and(|element| element.is(&ElementKind::Frontmatter))
}

/// Collapsed selection at the very end of the body, right after a soft break.
pub fn is_frontmatter_end(model: &Model) -> bool {
    let selection = model.selection();
    if !selection.is_collapsed() || !in_frontmatter(model) {
        return false;
    }
    let position = selection.first();
    model.document().element(&position.path).is_some_and(|body| {
        position.offset == body.inline_len()
            && node_before(body.inlines(), position.offset).is_some_and(Inline::is_soft_break)
    })
}

/// Path of the container enclosing the selection.
pub fn find_frontmatter_container(model: &Model) -> Option<Vec<usize>> {
    let path = &model.selection().first().path;
    (0..=path.len()).rev().map(|len| &path[..len]).find_map(|ancestor| {
        model
            .document()
            .element(ancestor)
            .filter(|element| element.is(&ElementKind::FrontmatterContainer))
            .map(|_| ancestor.to_vec())
    })
}

/// Drops the soft break right before a collapsed selection, if there is one.
pub fn remove_soft_break_before_selection(editor: &mut Editor) -> Result<(), EditorError> {
    editor.change(|writer| {
        let position = writer.selection().first().clone();
        let ends_with_break = position.offset > 0
            && writer.document().element(&position.path).is_some_and(|element| {
                node_before(element.inlines(), position.offset).is_some_and(Inline::is_soft_break)
            });
        if ends_with_break {
            writer.remove_inlines(&position.path, position.offset - 1, position.offset)?;
        }
        Ok(())
    })
}
