//! Loading markdown into the model and serializing it back.
//!
//! Plugins hook in at two points: [`HtmlUpcast`] converters claim raw HTML
//! blocks found while parsing, and [`ElementDowncast`] converters render
//! element kinds that the built-in conversion does not know how to write.

pub mod markdown;
pub mod types;
mod upcast;

use std::collections::HashMap;

use tracing::{debug, warn};

pub use types::{UpcastResult, ViewBlock};

use crate::model::{
    Content, Document, Element, ElementKind, Inline, Model, ModelError, Position, Selection,
};

/// Claims an HTML block and converts it to model elements.
pub trait HtmlUpcast {
    /// Returns `None` when the markup is not recognised.
    fn upcast(&self, html: &str) -> Option<UpcastResult>;
}

impl<F> HtmlUpcast for F
where
    F: Fn(&str) -> Option<UpcastResult>,
{
    fn upcast(&self, html: &str) -> Option<UpcastResult> {
        self(html)
    }
}

/// Renders one element kind into view blocks.
pub trait ElementDowncast {
    fn downcast(&self, element: &Element, data: &DataController, out: &mut Vec<ViewBlock>);
}

impl<F> ElementDowncast for F
where
    F: Fn(&Element, &DataController, &mut Vec<ViewBlock>),
{
    fn downcast(&self, element: &Element, data: &DataController, out: &mut Vec<ViewBlock>) {
        self(element, data, out)
    }
}

#[derive(Default)]
pub struct DataController {
    upcasts: Vec<Box<dyn HtmlUpcast>>,
    downcasts: HashMap<&'static str, Box<dyn ElementDowncast>>,
}

impl std::fmt::Debug for DataController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.downcasts.keys().collect();
        kinds.sort();
        f.debug_struct("DataController")
            .field("upcasts", &self.upcasts.len())
            .field("downcasts", &kinds)
            .finish()
    }
}

impl DataController {
    pub fn add_html_upcast(&mut self, converter: impl HtmlUpcast + 'static) {
        self.upcasts.push(Box::new(converter));
    }

    /// Registers the downcast for `kind`, replacing any earlier one.
    pub fn add_downcast(&mut self, kind: &ElementKind, converter: impl ElementDowncast + 'static) {
        self.downcasts.insert(kind.name(), Box::new(converter));
    }

    /// Parse markdown into detached top-level elements.
    pub fn parse(&self, markdown: &str) -> Vec<Element> {
        upcast::parse(self, markdown)
    }

    /// Offers an HTML block to the registered converters. Source following the
    /// claimed markup is parsed as markdown and appended.
    pub fn upcast_html(&self, html: &str) -> Option<Vec<Element>> {
        let result = self.upcasts.iter().find_map(|converter| converter.upcast(html))?;
        let mut elements = result.elements;
        if !result.rest.trim().is_empty() {
            elements.extend(self.parse(&result.rest));
        }
        Some(elements)
    }

    /// Replaces the whole document content with `markdown` in one transaction.
    ///
    /// Blocks the schema refuses are skipped with a warning. Without a root
    /// this is a no-op.
    pub fn set(&self, model: &mut Model, markdown: &str) -> Result<(), ModelError> {
        if !model.document().has_root() {
            debug!("document has no root, data not loaded");
            return Ok(());
        }
        let elements = self.parse(markdown);
        debug!(blocks = elements.len(), "loading data");

        model.change(|writer| {
            writer.clear_root()?;
            for element in elements {
                let kind = element.kind().name();
                match writer.append(&[], element) {
                    Ok(_) => {}
                    Err(err @ ModelError::NotAllowed { .. }) => {
                        warn!(error = %err, kind, "skipping block rejected by the schema");
                    }
                    Err(err) => return Err(err),
                }
            }
            if let Some(position) = first_inline_position(writer.document()) {
                writer.set_selection(Selection::collapsed(position));
            }
            Ok(())
        })
    }

    /// Serializes the document to markdown. Empty without a root.
    pub fn get(&self, document: &Document) -> String {
        markdown::write(&self.to_view(document))
    }

    pub fn to_view(&self, document: &Document) -> Vec<ViewBlock> {
        let mut out = Vec::new();
        self.downcast_all(document.children(&[]).unwrap_or_default(), &mut out);
        out
    }

    pub fn downcast_all(&self, elements: &[Element], out: &mut Vec<ViewBlock>) {
        for element in elements {
            self.downcast(element, out);
        }
    }

    pub fn downcast(&self, element: &Element, out: &mut Vec<ViewBlock>) {
        if let Some(converter) = self.downcasts.get(element.kind().name()) {
            converter.downcast(element, self, out);
            return;
        }
        match element.kind() {
            ElementKind::Paragraph | ElementKind::Frontmatter => {
                out.push(ViewBlock::Paragraph(element.inlines().to_vec()));
            }
            ElementKind::Heading { level } => {
                out.push(ViewBlock::Heading(*level, element.inlines().to_vec()));
            }
            ElementKind::BlockQuote => {
                let mut children = Vec::new();
                self.downcast_all(element.children(), &mut children);
                out.push(ViewBlock::Quote(children));
            }
            ElementKind::CodeBlock { language } => {
                out.push(ViewBlock::Code { language: language.clone(), text: element.text() });
            }
            ElementKind::HorizontalLine => out.push(ViewBlock::Rule),
            ElementKind::FrontmatterContainer => self.downcast_all(element.children(), out),
        }
    }
}

/// First place where text can be typed, in document order.
pub fn first_inline_position(document: &Document) -> Option<Position> {
    document
        .walk()
        .into_iter()
        .find(|(_, element)| matches!(element.content(), Content::Inlines(_)))
        .map(|(path, _)| Position::new(path, 0))
}

/// Inline content with every attribute removed.
pub fn plain_inlines(inlines: &[Inline]) -> Vec<Inline> {
    inlines
        .iter()
        .map(|inline| match inline {
            Inline::Text { data, .. } => Inline::text(data.clone()),
            Inline::SoftBreak => Inline::SoftBreak,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_and_serialize_plain_markdown() {
        let data = DataController::default();
        let mut model = Model::new();
        data.set(&mut model, "## Heading 1\n\nSome *text*").unwrap();
        assert_eq!(data.get(model.document()), "## Heading 1\n\nSome _text_");
        assert_eq!(model.selection().anchor, Position::new([0], 0));
    }

    #[test]
    fn set_replaces_previous_content() {
        let data = DataController::default();
        let mut model = Model::new();
        data.set(&mut model, "first").unwrap();
        data.set(&mut model, "second").unwrap();
        assert_eq!(data.get(model.document()), "second");
    }

    #[test]
    fn set_without_root_is_a_no_op() {
        let data = DataController::default();
        let mut model = Model::uninitialized();
        data.set(&mut model, "text").unwrap();
        assert!(!model.document().has_root());
        assert_eq!(data.get(model.document()), "");
    }

    #[test]
    fn claimed_html_is_converted_and_rest_reparsed() {
        let mut data = DataController::default();
        data.add_html_upcast(|html: &str| {
            let rest = html.strip_prefix("<hr-marker>")?;
            Some(UpcastResult {
                elements: vec![Element::new(ElementKind::HorizontalLine)],
                rest: rest.to_string(),
            })
        });
        let elements = data.parse("<hr-marker>\nafter");
        let kinds: Vec<_> = elements.iter().map(|element| element.kind().name()).collect();
        assert_eq!(kinds, vec!["horizontalLine", "paragraph"]);
    }

    #[test]
    fn registered_downcast_wins() {
        let mut data = DataController::default();
        data.add_downcast(
            &ElementKind::HorizontalLine,
            |_: &Element, _: &DataController, out: &mut Vec<ViewBlock>| {
                out.push(ViewBlock::text("~~~ rule ~~~"));
            },
        );
        let mut model = Model::new();
        data.set(&mut model, "a\n\n* * *").unwrap();
        assert_eq!(data.get(model.document()), "a\n\n~~~ rule ~~~");
    }
}
