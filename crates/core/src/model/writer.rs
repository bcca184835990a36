//! The only way to mutate a document.
//!
//! A [`Writer`] is handed out by [`Model::change`](super::Model::change). Every
//! operation checks the schema, keeps the selection pointing at the same
//! content, and records what it did in the transaction's [`Differ`].

use std::collections::BTreeSet;

use tracing::trace;

use super::differ::{Change, Differ};
use super::document::Document;
use super::errors::{ModelError, parent_name};
use super::node::{
    Attribute, Element, ElementKind, Inline, inline_len, normalize_inlines, split_inlines_at,
};
use super::position::{Position, Selection};
use super::schema::{Schema, SchemaContext};

pub struct Writer<'a> {
    document: &'a mut Document,
    schema: &'a Schema,
    selection: &'a mut Selection,
    differ: &'a mut Differ,
}

impl<'a> Writer<'a> {
    pub(crate) fn new(
        document: &'a mut Document,
        schema: &'a Schema,
        selection: &'a mut Selection,
        differ: &'a mut Differ,
    ) -> Self {
        Self { document, schema, selection, differ }
    }

    pub fn document(&self) -> &Document {
        self.document
    }

    pub fn schema(&self) -> &Schema {
        self.schema
    }

    pub fn selection(&self) -> &Selection {
        self.selection
    }

    /// Changes recorded so far in this transaction, including post-fixer passes.
    pub fn changes(&self) -> &[Change] {
        self.differ.changes()
    }

    pub fn set_selection(&mut self, selection: Selection) {
        *self.selection = selection;
    }

    /// Inserts a detached element at `index` among the children of `parent`.
    /// Returns the path of the inserted element.
    pub fn insert(
        &mut self,
        parent: &[usize],
        index: usize,
        mut element: Element,
    ) -> Result<Vec<usize>, ModelError> {
        let len = self.block_children(parent)?.len();
        let mut ancestry = SchemaContext::new(self.document, parent).ancestry;
        self.ensure_subtree_allowed(&mut ancestry, &element)?;
        if index > len {
            return Err(ModelError::InvalidOffset { path: parent.to_vec(), offset: index });
        }

        let document = &mut *self.document;
        element.for_each_mut(&mut |node| node.id = document.allocate_id());
        if let Some(children) = self.document.children_mut(parent) {
            children.insert(index, element);
        }

        for position in self.selection.positions_mut() {
            position.shift_for_insert(parent, index);
        }

        let mut path = parent.to_vec();
        path.push(index);
        if let Some(inserted) = self.document.element(&path) {
            trace!(kind = inserted.kind().name(), ?path, "insert");
            self.differ.record_insert(&path, inserted);
        }
        Ok(path)
    }

    /// Appends a detached element to the children of `parent`.
    pub fn append(&mut self, parent: &[usize], element: Element) -> Result<Vec<usize>, ModelError> {
        let index = self.block_children(parent)?.len();
        self.insert(parent, index, element)
    }

    /// Detaches the element at `path` and returns it.
    pub fn remove(&mut self, path: &[usize]) -> Result<Element, ModelError> {
        let (index, parent) = split_path(path)?;
        let removed = self.detach(parent, index)?;
        trace!(kind = removed.kind().name(), ?path, "remove");
        self.differ.record_remove(path, &removed);
        Ok(removed)
    }

    /// Moves the element at `from` so that it ends up at `to_index` among the
    /// children of `to_parent`, as addressed before the move. The element
    /// keeps its identity and content. Structural moves are not schema-checked.
    pub fn move_to(
        &mut self,
        from: &[usize],
        to_parent: &[usize],
        to_index: usize,
    ) -> Result<Vec<usize>, ModelError> {
        let (from_index, from_parent) = split_path(from)?;
        if to_parent.starts_with(from) {
            return Err(ModelError::InvalidPath(to_parent.to_vec()));
        }

        // Target as addressed after the source is gone.
        let mut target = Position::new(to_parent, to_index);
        target.shift_for_remove(from_parent, from_index);

        let relative: Vec<Option<Position>> = self
            .selection
            .positions_mut()
            .into_iter()
            .map(|p| {
                p.is_inside(from).then(|| Position::new(&p.path[from.len()..], p.offset))
            })
            .collect();
        let element = self.detach(from_parent, from_index)?;

        let len = self.block_children(&target.path)?.len();
        if target.offset > len {
            return Err(ModelError::InvalidOffset { path: target.path, offset: target.offset });
        }
        if let Some(children) = self.document.children_mut(&target.path) {
            children.insert(target.offset, element);
        }

        let mut new_path = target.path.clone();
        new_path.push(target.offset);
        for (position, relative) in self.selection.positions_mut().into_iter().zip(relative) {
            match relative {
                Some(relative) => {
                    let mut path = new_path.clone();
                    path.extend(relative.path);
                    *position = Position::new(path, relative.offset);
                }
                None => position.shift_for_insert(&target.path, target.offset),
            }
        }

        if let Some(moved) = self.document.element(&new_path) {
            trace!(kind = moved.kind().name(), ?from, to = ?new_path, "move");
            self.differ.record_move(from, &new_path, moved);
        }
        Ok(new_path)
    }

    /// Removes every top-level block.
    pub fn clear_root(&mut self) -> Result<(), ModelError> {
        while !self.block_children(&[])?.is_empty() {
            self.remove(&[0])?;
        }
        self.set_selection(Selection::collapsed(Position::in_root(0)));
        Ok(())
    }

    /// Inserts one inline at `position`; returns the position right after it.
    ///
    /// Attributes the schema refuses at that place are dropped from the text.
    pub fn insert_inline(
        &mut self,
        position: &Position,
        inline: Inline,
    ) -> Result<Position, ModelError> {
        let parent_kind = self.inline_parent(&position.path)?.kind().clone();
        if inline.is_soft_break() && matches!(parent_kind, ElementKind::CodeBlock { .. }) {
            return Err(ModelError::NotAllowed { parent: parent_kind.name(), child: "softBreak" });
        }
        let inline = match inline {
            Inline::Text { data, attributes } => {
                let context = SchemaContext::new(self.document, &position.path);
                let allowed: BTreeSet<Attribute> = attributes
                    .into_iter()
                    .filter(|attribute| self.schema.check_attribute(&context, *attribute))
                    .collect();
                Inline::Text { data, attributes: allowed }
            }
            Inline::SoftBreak => Inline::SoftBreak,
        };
        let len = inline.len();

        let inlines = self.inlines_mut(position)?;
        let index = split_inlines_at(inlines, position.offset);
        inlines.insert(index, inline);
        normalize_inlines(inlines);

        for selected in self.selection.positions_mut() {
            if selected.path == position.path && selected.offset >= position.offset {
                selected.offset += len;
            }
        }
        self.differ.record_content(&position.path);
        Ok(Position::new(position.path.clone(), position.offset + len))
    }

    pub fn insert_text(
        &mut self,
        position: &Position,
        text: &str,
    ) -> Result<Position, ModelError> {
        if text.is_empty() {
            return Ok(position.clone());
        }
        self.insert_inline(position, Inline::text(text))
    }

    /// Removes inline content between `start` and `end` inside `path`.
    pub fn remove_inlines(
        &mut self,
        path: &[usize],
        start: usize,
        end: usize,
    ) -> Result<(), ModelError> {
        if start >= end {
            return Ok(());
        }
        let inlines = self.inlines_mut(&Position::new(path, end))?;
        let first = split_inlines_at(inlines, start);
        let last = split_inlines_at(inlines, end);
        inlines.drain(first..last);
        normalize_inlines(inlines);

        for selected in self.selection.positions_mut() {
            if selected.path == path && selected.offset > start {
                selected.offset = if selected.offset >= end {
                    selected.offset - (end - start)
                } else {
                    start
                };
            }
        }
        self.differ.record_content(path);
        Ok(())
    }

    /// Sets or clears an attribute on the text between `start` and `end`.
    pub fn set_attribute(
        &mut self,
        path: &[usize],
        start: usize,
        end: usize,
        attribute: Attribute,
        enabled: bool,
    ) -> Result<(), ModelError> {
        let parent_kind = self.inline_parent(path)?.kind().clone();
        if enabled {
            let context = SchemaContext::new(self.document, path);
            if !self.schema.check_attribute(&context, attribute) {
                return Err(ModelError::AttributeNotAllowed {
                    parent: parent_kind.name(),
                    attribute: attribute.name(),
                });
            }
        }

        let inlines = self.inlines_mut(&Position::new(path, end))?;
        split_inlines_at(inlines, end);
        let first = split_inlines_at(inlines, start);
        let mut offset = start;
        for inline in inlines.iter_mut().skip(first) {
            if offset >= end {
                break;
            }
            offset += inline.len();
            if let Inline::Text { attributes, .. } = inline {
                if enabled {
                    attributes.insert(attribute);
                } else {
                    attributes.remove(&attribute);
                }
            }
        }
        normalize_inlines(inlines);
        self.differ.record_content(path);
        Ok(())
    }

    /// Splits the inline-holding element at `position` in two and returns the
    /// start of the second half. A heading split at its end continues as a
    /// paragraph.
    pub fn split(&mut self, position: &Position) -> Result<Position, ModelError> {
        let element = self.inline_parent(&position.path)?;
        let kind = element.kind().clone();
        if kind.is_limit() || matches!(kind, ElementKind::CodeBlock { .. }) {
            return Err(ModelError::NotAllowed { parent: kind.name(), child: kind.name() });
        }
        let at_end = position.offset >= element.inline_len();

        let inlines = self.inlines_mut(position)?;
        let index = split_inlines_at(inlines, position.offset);
        let tail: Vec<Inline> = inlines.drain(index..).collect();
        normalize_inlines(inlines);
        self.differ.record_content(&position.path);

        let next_kind = match kind {
            ElementKind::Heading { .. } if at_end => ElementKind::Paragraph,
            other => other,
        };
        let (index, parent) = split_path(&position.path)?;
        let parent = parent.to_vec();
        let new_path = self.insert(&parent, index + 1, Element::with_inlines(next_kind, tail))?;

        for selected in self.selection.positions_mut() {
            if selected.path == position.path && selected.offset > position.offset {
                *selected = Position::new(new_path.clone(), selected.offset - position.offset);
            }
        }
        Ok(Position::new(new_path, 0))
    }

    /// Checks `element` and all of its descendants against the schema, with
    /// `ancestry` describing where `element` would be placed.
    fn ensure_subtree_allowed<'s>(
        &'s self,
        ancestry: &mut Vec<&'s ElementKind>,
        element: &'s Element,
    ) -> Result<(), ModelError> {
        let context = SchemaContext { document: &*self.document, ancestry: ancestry.clone() };
        if !self.schema.check_child(&context, element.kind()) {
            return Err(ModelError::NotAllowed {
                parent: parent_name(context.parent()),
                child: element.kind().name(),
            });
        }
        ancestry.push(element.kind());
        for child in element.children() {
            self.ensure_subtree_allowed(ancestry, child)?;
        }
        ancestry.pop();
        Ok(())
    }

    fn block_children(&self, parent: &[usize]) -> Result<&[Element], ModelError> {
        if !self.document.has_root() {
            return Err(ModelError::NoRoot);
        }
        self.document.children(parent).ok_or_else(|| ModelError::InvalidPath(parent.to_vec()))
    }

    fn inline_parent(&self, path: &[usize]) -> Result<&Element, ModelError> {
        if !self.document.has_root() {
            return Err(ModelError::NoRoot);
        }
        let element =
            self.document.element(path).ok_or_else(|| ModelError::InvalidPath(path.to_vec()))?;
        if element.kind().holds_inlines() {
            Ok(element)
        } else {
            Err(ModelError::NotInline(element.kind().name()))
        }
    }

    fn inlines_mut(&mut self, position: &Position) -> Result<&mut Vec<Inline>, ModelError> {
        let len = inline_len(self.inline_parent(&position.path)?.inlines());
        if position.offset > len {
            return Err(ModelError::InvalidOffset {
                path: position.path.clone(),
                offset: position.offset,
            });
        }
        self.document
            .element_mut(&position.path)
            .and_then(Element::inlines_mut)
            .ok_or_else(|| ModelError::InvalidPath(position.path.clone()))
    }

    fn detach(&mut self, parent: &[usize], index: usize) -> Result<Element, ModelError> {
        let len = self.block_children(parent)?.len();
        if index >= len {
            let mut path = parent.to_vec();
            path.push(index);
            return Err(ModelError::InvalidPath(path));
        }
        let removed = self
            .document
            .children_mut(parent)
            .map(|children| children.remove(index))
            .ok_or_else(|| ModelError::InvalidPath(parent.to_vec()))?;
        for position in self.selection.positions_mut() {
            position.shift_for_remove(parent, index);
        }
        Ok(removed)
    }
}

fn split_path(path: &[usize]) -> Result<(usize, &[usize]), ModelError> {
    path.split_last()
        .map(|(index, parent)| (*index, parent))
        .ok_or_else(|| ModelError::InvalidPath(path.to_vec()))
}
