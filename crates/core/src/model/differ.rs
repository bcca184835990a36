//! Change set of a single transaction.

use super::node::{Element, ElementKind, NodeId};

/// One structural or content change, with paths as they were when it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Insert { id: NodeId, kind: ElementKind, path: Vec<usize> },
    Remove { id: NodeId, kind: ElementKind, path: Vec<usize> },
    Move { id: NodeId, kind: ElementKind, from: Vec<usize>, to: Vec<usize> },
    /// Inline content or attributes of the element at `path` changed.
    Content { path: Vec<usize> },
}

impl Change {
    pub fn kind(&self) -> Option<&ElementKind> {
        match self {
            Change::Insert { kind, .. } | Change::Remove { kind, .. } | Change::Move { kind, .. } => {
                Some(kind)
            }
            Change::Content { .. } => None,
        }
    }
}

/// Records changes in order. An element inserted and removed again within the
/// same transaction leaves no trace.
#[derive(Debug, Default)]
pub struct Differ {
    changes: Vec<Change>,
}

impl Differ {
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub(crate) fn record_insert(&mut self, path: &[usize], element: &Element) {
        visit(path, element, &mut |path, element| {
            self.changes.push(Change::Insert {
                id: element.id(),
                kind: element.kind().clone(),
                path: path.to_vec(),
            });
        });
    }

    pub(crate) fn record_remove(&mut self, path: &[usize], element: &Element) {
        visit(path, element, &mut |path, element| {
            let id = element.id();
            let inserted_here = self.changes.iter().any(
                |change| matches!(change, Change::Insert { id: inserted, .. } if *inserted == id),
            );
            self.changes.retain(|change| {
                !matches!(
                    change,
                    Change::Insert { id: touched, .. } | Change::Move { id: touched, .. }
                        if *touched == id
                )
            });
            if !inserted_here {
                self.changes.push(Change::Remove {
                    id,
                    kind: element.kind().clone(),
                    path: path.to_vec(),
                });
            }
        });
    }

    pub(crate) fn record_move(&mut self, from: &[usize], to: &[usize], element: &Element) {
        self.changes.push(Change::Move {
            id: element.id(),
            kind: element.kind().clone(),
            from: from.to_vec(),
            to: to.to_vec(),
        });
    }

    pub(crate) fn record_content(&mut self, path: &[usize]) {
        let path = path.to_vec();
        if !self.changes.iter().any(|change| matches!(change, Change::Content { path: p } if *p == path)) {
            self.changes.push(Change::Content { path });
        }
    }
}

fn visit(path: &[usize], element: &Element, f: &mut impl FnMut(&[usize], &Element)) {
    f(path, element);
    let mut child_path = path.to_vec();
    for (index, child) in element.children().iter().enumerate() {
        child_path.push(index);
        visit(&child_path, child, f);
        child_path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamped(kind: ElementKind, id: u64) -> Element {
        let mut element = Element::new(kind);
        element.id = NodeId(id);
        element
    }

    #[test]
    fn insert_then_remove_cancels_out() {
        let mut differ = Differ::default();
        let element = stamped(ElementKind::FrontmatterContainer, 7);
        differ.record_insert(&[2], &element);
        differ.record_remove(&[2], &element);
        assert!(differ.is_empty());
    }

    #[test]
    fn removal_of_existing_node_is_recorded() {
        let mut differ = Differ::default();
        let element = stamped(ElementKind::Paragraph, 3);
        differ.record_remove(&[0], &element);
        assert_eq!(
            differ.changes(),
            &[Change::Remove { id: NodeId(3), kind: ElementKind::Paragraph, path: vec![0] }]
        );
    }

    #[test]
    fn moved_then_removed_node_reports_removal() {
        let mut differ = Differ::default();
        let element = stamped(ElementKind::Paragraph, 4);
        differ.record_move(&[3], &[0], &element);
        differ.record_remove(&[0], &element);
        assert_eq!(differ.changes().len(), 1);
        assert!(matches!(differ.changes()[0], Change::Remove { .. }));
    }

    #[test]
    fn insert_records_descendants() {
        let mut differ = Differ::default();
        let mut container = Element::with_children(
            ElementKind::FrontmatterContainer,
            vec![Element::new(ElementKind::Frontmatter)],
        );
        container.for_each_mut(&mut |element| element.id = NodeId(9));
        differ.record_insert(&[0], &container);
        let kinds: Vec<_> = differ.changes().iter().filter_map(Change::kind).collect();
        assert_eq!(kinds, vec![&ElementKind::FrontmatterContainer, &ElementKind::Frontmatter]);
    }
}
