use crate::model::{Element, Inline};

/// Intermediate block representation handed to the markdown writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewBlock {
    Paragraph(Vec<Inline>),
    Heading(u8, Vec<Inline>),
    Quote(Vec<ViewBlock>),
    Code { language: Option<String>, text: String },
    /// Thematic break.
    Rule,
}

impl ViewBlock {
    /// Paragraph holding a single plain text run.
    pub fn text(text: impl Into<String>) -> Self {
        ViewBlock::Paragraph(vec![Inline::text(text)])
    }
}

/// Output of an HTML block converter.
#[derive(Debug, Clone, Default)]
pub struct UpcastResult {
    /// Model elements produced from the recognised markup.
    pub elements: Vec<Element>,
    /// Source that followed the recognised markup; parsed again as markdown.
    pub rest: String,
}
