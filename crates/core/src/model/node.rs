//! Document tree nodes.
//!
//! The set of element kinds is closed: every consumer dispatches on
//! [`ElementKind`] with a `match`, and the schema rules for each kind live in
//! [`crate::model::schema`].

use serde::Serialize;
use std::collections::BTreeSet;

/// Identifier of an element, unique within the document it is attached to.
///
/// Detached elements carry [`NodeId::DETACHED`] until a writer inserts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    pub const DETACHED: NodeId = NodeId(0);

    pub fn is_detached(self) -> bool {
        self == Self::DETACHED
    }
}

/// Character-level formatting carried by text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
    Bold,
    Italic,
    Code,
}

impl Attribute {
    pub fn name(self) -> &'static str {
        match self {
            Attribute::Bold => "bold",
            Attribute::Italic => "italic",
            Attribute::Code => "code",
        }
    }
}

/// Kind of a block-level element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ElementKind {
    Paragraph,
    Heading { level: u8 },
    BlockQuote,
    CodeBlock { language: Option<String> },
    HorizontalLine,
    /// Positioned singleton wrapper of the frontmatter body.
    FrontmatterContainer,
    /// Opaque line-oriented metadata text.
    Frontmatter,
}

impl ElementKind {
    pub fn heading(level: u8) -> Self {
        ElementKind::Heading { level: level.clamp(1, 6) }
    }

    /// Name used in schema errors, logs and converter registries.
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Paragraph => "paragraph",
            ElementKind::Heading { .. } => "heading",
            ElementKind::BlockQuote => "blockQuote",
            ElementKind::CodeBlock { .. } => "codeBlock",
            ElementKind::HorizontalLine => "horizontalLine",
            ElementKind::FrontmatterContainer => "frontmatterContainer",
            ElementKind::Frontmatter => "frontmatter",
        }
    }

    pub fn holds_inlines(&self) -> bool {
        matches!(
            self,
            ElementKind::Paragraph
                | ElementKind::Heading { .. }
                | ElementKind::CodeBlock { .. }
                | ElementKind::Frontmatter
        )
    }

    pub fn holds_blocks(&self) -> bool {
        matches!(self, ElementKind::BlockQuote | ElementKind::FrontmatterContainer)
    }

    /// Block that is treated as a single unit by selection and structural edits.
    pub fn is_object(&self) -> bool {
        matches!(self, ElementKind::HorizontalLine | ElementKind::FrontmatterContainer)
    }

    /// Structural edits driven by the selection (splitting, searching for an
    /// allowed parent) never cross a limit element.
    pub fn is_limit(&self) -> bool {
        self.is_object() || matches!(self, ElementKind::Frontmatter)
    }

    fn empty_content(&self) -> Content {
        if self.holds_inlines() {
            Content::Inlines(Vec::new())
        } else if self.holds_blocks() {
            Content::Blocks(Vec::new())
        } else {
            Content::Empty
        }
    }
}

/// Inline content of a text-holding element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Inline {
    Text {
        data: String,
        #[serde(skip_serializing_if = "BTreeSet::is_empty")]
        attributes: BTreeSet<Attribute>,
    },
    /// Line break that stays inside the current block.
    SoftBreak,
}

impl Inline {
    pub fn text(data: impl Into<String>) -> Self {
        Inline::Text { data: data.into(), attributes: BTreeSet::new() }
    }

    pub fn styled(data: impl Into<String>, attributes: BTreeSet<Attribute>) -> Self {
        Inline::Text { data: data.into(), attributes }
    }

    /// Length in model offsets: one per character, one for a soft break.
    pub fn len(&self) -> usize {
        match self {
            Inline::Text { data, .. } => data.chars().count(),
            Inline::SoftBreak => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_soft_break(&self) -> bool {
        matches!(self, Inline::SoftBreak)
    }
}

/// Children of an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Content {
    Blocks(Vec<Element>),
    Inlines(Vec<Inline>),
    Empty,
}

/// A block-level node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    #[serde(skip)]
    pub(crate) id: NodeId,
    #[serde(flatten)]
    kind: ElementKind,
    #[serde(rename = "children")]
    content: Content,
}

impl Element {
    /// Creates a detached, empty element.
    pub fn new(kind: ElementKind) -> Self {
        let content = kind.empty_content();
        Self { id: NodeId::DETACHED, kind, content }
    }

    pub fn with_inlines(kind: ElementKind, inlines: Vec<Inline>) -> Self {
        let mut element = Self::new(kind);
        if let Content::Inlines(items) = &mut element.content {
            *items = inlines;
            normalize_inlines(items);
        }
        element
    }

    pub fn with_children(kind: ElementKind, children: Vec<Element>) -> Self {
        let mut element = Self::new(kind);
        if let Content::Blocks(items) = &mut element.content {
            *items = children;
        }
        element
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        let text = text.into();
        let inlines = if text.is_empty() { Vec::new() } else { vec![Inline::text(text)] };
        Self::with_inlines(ElementKind::Paragraph, inlines)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn is(&self, kind: &ElementKind) -> bool {
        &self.kind == kind
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn children(&self) -> &[Element] {
        match &self.content {
            Content::Blocks(children) => children,
            _ => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<Element>> {
        match &mut self.content {
            Content::Blocks(children) => Some(children),
            _ => None,
        }
    }

    pub fn inlines(&self) -> &[Inline] {
        match &self.content {
            Content::Inlines(inlines) => inlines,
            _ => &[],
        }
    }

    pub(crate) fn inlines_mut(&mut self) -> Option<&mut Vec<Inline>> {
        match &mut self.content {
            Content::Inlines(inlines) => Some(inlines),
            _ => None,
        }
    }

    /// Length of the inline content in model offsets.
    pub fn inline_len(&self) -> usize {
        inline_len(self.inlines())
    }

    /// Concatenated text of the inline content, soft breaks rendered as `\n`.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for inline in self.inlines() {
            match inline {
                Inline::Text { data, .. } => out.push_str(data),
                Inline::SoftBreak => out.push('\n'),
            }
        }
        out
    }

    /// Visits this element and every descendant in document order.
    pub(crate) fn for_each_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        f(self);
        if let Content::Blocks(children) = &mut self.content {
            for child in children {
                child.for_each_mut(f);
            }
        }
    }
}

pub fn inline_len(inlines: &[Inline]) -> usize {
    inlines.iter().map(Inline::len).sum()
}

/// Returns the inline that ends exactly at `offset`, if any.
pub fn node_before(inlines: &[Inline], offset: usize) -> Option<&Inline> {
    let mut start = 0;
    for inline in inlines {
        let end = start + inline.len();
        if start < offset && offset <= end {
            return Some(inline);
        }
        start = end;
    }
    None
}

/// Makes `offset` fall on a node boundary, splitting a text node when needed.
/// Returns the index of the first inline at or after `offset`.
pub(crate) fn split_inlines_at(inlines: &mut Vec<Inline>, offset: usize) -> usize {
    let mut start = 0;
    for index in 0..inlines.len() {
        if offset == start {
            return index;
        }
        let len = inlines[index].len();
        if offset < start + len {
            if let Inline::Text { data, attributes } = &mut inlines[index] {
                let byte = char_to_byte(data, offset - start);
                let tail = data.split_off(byte);
                let attributes = attributes.clone();
                inlines.insert(index + 1, Inline::Text { data: tail, attributes });
            }
            return index + 1;
        }
        start += len;
    }
    inlines.len()
}

/// Drops empty text nodes and merges neighbours with equal attributes.
pub(crate) fn normalize_inlines(inlines: &mut Vec<Inline>) {
    inlines.retain(|inline| !matches!(inline, Inline::Text { data, .. } if data.is_empty()));
    let mut merged: Vec<Inline> = Vec::with_capacity(inlines.len());
    for inline in inlines.drain(..) {
        if let (
            Some(Inline::Text { data: last, attributes: last_attrs }),
            Inline::Text { data, attributes },
        ) = (merged.last_mut(), &inline)
            && last_attrs == attributes
        {
            last.push_str(data);
            continue;
        }
        merged.push(inline);
    }
    *inlines = merged;
}

fn char_to_byte(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(byte, _)| byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_inside_text_creates_boundary() {
        let mut inlines = vec![Inline::text("hello"), Inline::SoftBreak];
        let index = split_inlines_at(&mut inlines, 2);
        assert_eq!(index, 1);
        assert_eq!(inlines[0], Inline::text("he"));
        assert_eq!(inlines[1], Inline::text("llo"));
    }

    #[test]
    fn split_at_end_returns_len() {
        let mut inlines = vec![Inline::text("ab"), Inline::SoftBreak];
        assert_eq!(split_inlines_at(&mut inlines, 3), 2);
        assert_eq!(inlines.len(), 2);
    }

    #[test]
    fn split_counts_chars_not_bytes() {
        let mut inlines = vec![Inline::text("año")];
        split_inlines_at(&mut inlines, 2);
        assert_eq!(inlines, vec![Inline::text("añ"), Inline::text("o")]);
    }

    #[test]
    fn normalize_merges_equal_neighbours() {
        let mut inlines = vec![
            Inline::text("a"),
            Inline::text(""),
            Inline::text("b"),
            Inline::SoftBreak,
            Inline::styled("c", BTreeSet::from([Attribute::Bold])),
            Inline::text("d"),
        ];
        normalize_inlines(&mut inlines);
        assert_eq!(inlines.len(), 4);
        assert_eq!(inlines[0], Inline::text("ab"));
    }

    #[test]
    fn node_before_finds_soft_break() {
        let inlines = vec![Inline::text("a"), Inline::SoftBreak];
        assert_eq!(node_before(&inlines, 2), Some(&Inline::SoftBreak));
        assert_eq!(node_before(&inlines, 1), Some(&Inline::text("a")));
        assert_eq!(node_before(&inlines, 0), None);
    }

    #[test]
    fn element_text_joins_soft_breaks() {
        let element = Element::with_inlines(
            ElementKind::Frontmatter,
            vec![Inline::text("title: A"), Inline::SoftBreak, Inline::text("draft: true")],
        );
        assert_eq!(element.text(), "title: A\ndraft: true");
        assert_eq!(element.inline_len(), 20);
    }
}
