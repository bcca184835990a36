//! Positions and selections.
//!
//! A [`Position`] names a parent element by its path of child indices from
//! the root and an offset inside it. In a block-holding parent the offset is a
//! child index; in an inline-holding parent it counts characters and soft
//! breaks.

use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub path: Vec<usize>,
    pub offset: usize,
}

impl Position {
    pub fn new(path: impl Into<Vec<usize>>, offset: usize) -> Self {
        Self { path: path.into(), offset }
    }

    /// Position between top-level blocks.
    pub fn in_root(offset: usize) -> Self {
        Self { path: Vec::new(), offset }
    }

    pub fn is_in_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Updates the position for a node inserted at `index` inside `parent`.
    pub(crate) fn shift_for_insert(&mut self, parent: &[usize], index: usize) {
        if self.path == parent {
            if self.offset >= index {
                self.offset += 1;
            }
        } else if self.path.starts_with(parent) && self.path[parent.len()] >= index {
            self.path[parent.len()] += 1;
        }
    }

    /// Updates the position for the node at `index` inside `parent` being
    /// removed. A position inside the removed node collapses to where it was.
    pub(crate) fn shift_for_remove(&mut self, parent: &[usize], index: usize) {
        if self.path == parent {
            if self.offset > index {
                self.offset -= 1;
            }
        } else if self.path.starts_with(parent) {
            let slot = self.path[parent.len()];
            if slot == index {
                *self = Position::new(parent, index);
            } else if slot > index {
                self.path[parent.len()] -= 1;
            }
        }
    }

    /// Whether the position lies inside the node at `path`.
    pub(crate) fn is_inside(&self, path: &[usize]) -> bool {
        self.path.starts_with(path)
    }

    fn key(&self) -> impl Iterator<Item = usize> + '_ {
        self.path.iter().copied().chain(std::iter::once(self.offset))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(other.key())
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Anchor/focus pair; collapsed when both are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub anchor: Position,
    pub focus: Position,
}

impl Selection {
    pub fn new(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    pub fn collapsed(position: Position) -> Self {
        Self { anchor: position.clone(), focus: position }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn first(&self) -> &Position {
        if self.focus < self.anchor { &self.focus } else { &self.anchor }
    }

    pub fn last(&self) -> &Position {
        if self.focus < self.anchor { &self.anchor } else { &self.focus }
    }

    /// Inline range `(parent, start, end)` when both ends share one parent.
    pub fn flat_range(&self) -> Option<(&[usize], usize, usize)> {
        let (first, last) = (self.first(), self.last());
        (first.path == last.path).then(|| (first.path.as_slice(), first.offset, last.offset))
    }

    pub(crate) fn positions_mut(&mut self) -> [&mut Position; 2] {
        [&mut self.anchor, &mut self.focus]
    }
}
