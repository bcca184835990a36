//! The document: one optional root holding top-level blocks.

use serde::Serialize;

use super::node::{Element, ElementKind, NodeId};

/// Name of the single editable root.
pub const MAIN_ROOT: &str = "main";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootElement {
    name: String,
    children: Vec<Element>,
}

impl RootElement {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&Element> {
        self.children.get(index)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    root: Option<RootElement>,
    #[serde(skip)]
    next_id: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a document with an empty main root.
    pub fn new() -> Self {
        Self {
            root: Some(RootElement { name: MAIN_ROOT.to_string(), children: Vec::new() }),
            next_id: 1,
        }
    }

    /// Creates a document whose root has not been initialized yet.
    pub fn uninitialized() -> Self {
        Self { root: None, next_id: 1 }
    }

    pub fn root(&self) -> Option<&RootElement> {
        self.root.as_ref()
    }

    pub fn has_root(&self) -> bool {
        self.root.is_some()
    }

    /// Element at `path`; the empty path names the root, which is not an element.
    pub fn element(&self, path: &[usize]) -> Option<&Element> {
        let (first, rest) = path.split_first()?;
        let mut current = self.root.as_ref()?.children.get(*first)?;
        for index in rest {
            current = current.children().get(*index)?;
        }
        Some(current)
    }

    pub(crate) fn element_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let (first, rest) = path.split_first()?;
        let mut current = self.root.as_mut()?.children.get_mut(*first)?;
        for index in rest {
            current = current.children_mut()?.get_mut(*index)?;
        }
        Some(current)
    }

    /// Block children of the root (empty path) or of the element at `path`.
    pub fn children(&self, path: &[usize]) -> Option<&[Element]> {
        if path.is_empty() {
            return self.root.as_ref().map(|root| root.children.as_slice());
        }
        let element = self.element(path)?;
        element.kind().holds_blocks().then(|| element.children())
    }

    pub(crate) fn children_mut(&mut self, path: &[usize]) -> Option<&mut Vec<Element>> {
        if path.is_empty() {
            return self.root.as_mut().map(|root| &mut root.children);
        }
        self.element_mut(path)?.children_mut()
    }

    /// Kinds of the elements along `path`, outermost first.
    pub fn ancestry(&self, path: &[usize]) -> Vec<&ElementKind> {
        (1..=path.len()).filter_map(|depth| self.element(&path[..depth])).map(Element::kind).collect()
    }

    /// Every element with its path, in document order.
    pub fn walk(&self) -> Vec<(Vec<usize>, &Element)> {
        fn visit<'a>(
            elements: &'a [Element],
            prefix: &mut Vec<usize>,
            out: &mut Vec<(Vec<usize>, &'a Element)>,
        ) {
            for (index, element) in elements.iter().enumerate() {
                prefix.push(index);
                out.push((prefix.clone(), element));
                visit(element.children(), prefix, out);
                prefix.pop();
            }
        }

        let mut out = Vec::new();
        if let Some(root) = &self.root {
            visit(&root.children, &mut Vec::new(), &mut out);
        }
        out
    }

    /// Path of the first element of `kind` in document order.
    pub fn find(&self, kind: &ElementKind) -> Option<Vec<usize>> {
        self.walk().into_iter().find(|(_, element)| element.is(kind)).map(|(path, _)| path)
    }

    pub fn count(&self, kind: &ElementKind) -> usize {
        self.walk().iter().filter(|(_, element)| element.is(kind)).count()
    }

    pub(crate) fn allocate_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }
}
