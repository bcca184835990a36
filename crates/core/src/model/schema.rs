//! Structural rules: which element may live where, which attributes text may carry.
//!
//! The base rules are fixed per [`ElementKind`]. Plugins narrow them further
//! with callbacks registered through [`Schema::add_child_check`] and
//! [`Schema::add_attribute_check`]; a callback returning `Some` decides, `None`
//! defers to the next callback and finally to the base rule.

use super::document::Document;
use super::node::{Attribute, ElementKind};
use super::position::Position;

/// Where a check is being evaluated.
pub struct SchemaContext<'a> {
    pub document: &'a Document,
    /// Kinds of the elements from the root down to the parent; empty for the root.
    pub ancestry: Vec<&'a ElementKind>,
}

impl<'a> SchemaContext<'a> {
    pub fn new(document: &'a Document, parent: &[usize]) -> Self {
        Self { document, ancestry: document.ancestry(parent) }
    }

    /// Direct parent kind, `None` for the root.
    pub fn parent(&self) -> Option<&'a ElementKind> {
        self.ancestry.last().copied()
    }

    pub fn ends_with(&self, kind: &ElementKind) -> bool {
        self.parent() == Some(kind)
    }
}

pub type ChildCheck = Box<dyn Fn(&SchemaContext<'_>, &ElementKind) -> Option<bool>>;
pub type AttributeCheck = Box<dyn Fn(&SchemaContext<'_>, Attribute) -> Option<bool>>;

#[derive(Default)]
pub struct Schema {
    child_checks: Vec<ChildCheck>,
    attribute_checks: Vec<AttributeCheck>,
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("child_checks", &self.child_checks.len())
            .field("attribute_checks", &self.attribute_checks.len())
            .finish()
    }
}

impl Schema {
    pub fn add_child_check(
        &mut self,
        check: impl Fn(&SchemaContext<'_>, &ElementKind) -> Option<bool> + 'static,
    ) {
        self.child_checks.push(Box::new(check));
    }

    pub fn add_attribute_check(
        &mut self,
        check: impl Fn(&SchemaContext<'_>, Attribute) -> Option<bool> + 'static,
    ) {
        self.attribute_checks.push(Box::new(check));
    }

    pub fn check_child(&self, context: &SchemaContext<'_>, child: &ElementKind) -> bool {
        self.child_checks
            .iter()
            .find_map(|check| check(context, child))
            .unwrap_or_else(|| base_allows_child(context.parent(), child))
    }

    pub fn check_attribute(&self, context: &SchemaContext<'_>, attribute: Attribute) -> bool {
        self.attribute_checks
            .iter()
            .find_map(|check| check(context, attribute))
            .unwrap_or_else(|| base_allows_attribute(context.parent()))
    }

    /// Walks up from the position's parent looking for an element that accepts
    /// `child`. Stops without a result at the first limit element and at the
    /// root, which is always a limit.
    pub fn find_allowed_parent(
        &self,
        document: &Document,
        position: &Position,
        child: &ElementKind,
    ) -> Option<Vec<usize>> {
        let mut path = position.path.clone();
        loop {
            let context = SchemaContext::new(document, &path);
            if path.is_empty() {
                return (document.has_root() && self.check_child(&context, child)).then_some(path);
            }
            if self.check_child(&context, child) {
                return Some(path);
            }
            if context.parent().is_none_or(ElementKind::is_limit) {
                return None;
            }
            path.pop();
        }
    }
}

fn is_block(kind: &ElementKind) -> bool {
    !matches!(kind, ElementKind::Frontmatter)
}

fn base_allows_child(parent: Option<&ElementKind>, child: &ElementKind) -> bool {
    match parent {
        None | Some(ElementKind::BlockQuote) => is_block(child),
        Some(ElementKind::FrontmatterContainer) => matches!(child, ElementKind::Frontmatter),
        Some(_) => false,
    }
}

fn base_allows_attribute(parent: Option<&ElementKind>) -> bool {
    matches!(parent, Some(kind) if kind.holds_inlines() && !matches!(kind, ElementKind::CodeBlock { .. }))
}
