//! Markdown to model conversion on top of comrak.

use std::collections::BTreeSet;

use comrak::nodes::{AstNode, NodeValue};
use comrak::{Arena, Options, parse_document};

use super::DataController;
use crate::model::{Attribute, Element, ElementKind, Inline};

/// Parse markdown into detached top-level model elements.
pub(crate) fn parse(data: &DataController, markdown: &str) -> Vec<Element> {
    let arena = Arena::new();
    let options = default_options();
    let root = parse_document(&arena, markdown, &options);

    let mut blocks = Vec::new();
    for node in root.children() {
        upcast_block(data, node, &mut blocks);
    }
    blocks
}

fn upcast_block<'a>(data: &DataController, node: &'a AstNode<'a>, out: &mut Vec<Element>) {
    match &node.data.borrow().value {
        NodeValue::Paragraph => {
            out.push(Element::with_inlines(ElementKind::Paragraph, collect_inlines(node)));
        }
        NodeValue::Heading(heading) => {
            out.push(Element::with_inlines(
                ElementKind::heading(heading.level),
                collect_inlines(node),
            ));
        }
        NodeValue::BlockQuote => {
            let mut children = Vec::new();
            for child in node.children() {
                upcast_block(data, child, &mut children);
            }
            out.push(Element::with_children(ElementKind::BlockQuote, children));
        }
        NodeValue::CodeBlock(code) => {
            let language = code.info.split_whitespace().next().map(str::to_string);
            let text = code.literal.strip_suffix('\n').unwrap_or(&code.literal);
            out.push(Element::with_inlines(
                ElementKind::CodeBlock { language },
                vec![Inline::text(text)],
            ));
        }
        NodeValue::ThematicBreak => out.push(Element::new(ElementKind::HorizontalLine)),
        NodeValue::HtmlBlock(html) => match data.upcast_html(&html.literal) {
            Some(elements) => out.extend(elements),
            None => out.push(Element::paragraph(html.literal.trim_end())),
        },
        // Lists have no model counterpart; their items become plain blocks.
        NodeValue::List(_) | NodeValue::Item(_) => {
            for child in node.children() {
                upcast_block(data, child, out);
            }
        }
        _ => {
            let text = collect_text(node);
            if !text.trim().is_empty() {
                out.push(Element::paragraph(text));
            }
        }
    }
}

fn collect_inlines<'a>(node: &'a AstNode<'a>) -> Vec<Inline> {
    let mut inlines = Vec::new();
    push_inlines(node, &BTreeSet::new(), &mut inlines);
    inlines
}

fn push_inlines<'a>(node: &'a AstNode<'a>, attributes: &BTreeSet<Attribute>, out: &mut Vec<Inline>) {
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Text(text) => out.push(Inline::styled(text.to_string(), attributes.clone())),
            NodeValue::SoftBreak => out.push(Inline::styled(" ", attributes.clone())),
            NodeValue::LineBreak => out.push(Inline::SoftBreak),
            NodeValue::Code(code) => {
                out.push(Inline::styled(code.literal.clone(), with(attributes, Attribute::Code)));
            }
            NodeValue::HtmlInline(html) => {
                out.push(Inline::styled(html.to_string(), attributes.clone()));
            }
            NodeValue::Emph => push_inlines(child, &with(attributes, Attribute::Italic), out),
            NodeValue::Strong => push_inlines(child, &with(attributes, Attribute::Bold), out),
            // Links, images and the like keep their text only.
            _ => push_inlines(child, attributes, out),
        }
    }
}

fn with(attributes: &BTreeSet<Attribute>, attribute: Attribute) -> BTreeSet<Attribute> {
    let mut attributes = attributes.clone();
    attributes.insert(attribute);
    attributes
}

fn default_options() -> Options<'static> {
    let mut options = Options::default();
    // GFM extensions for compatibility
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;

    // Don't convert quotes/dashes
    options.parse.smart = false;

    options
}

fn collect_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    for child in node.descendants() {
        match &child.data.borrow().value {
            NodeValue::Text(t) => text.push_str(t),
            NodeValue::Code(code) => text.push_str(&code.literal),
            NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
            _ => {}
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Content;

    fn parse_plain(markdown: &str) -> Vec<Element> {
        parse(&DataController::default(), markdown)
    }

    #[test]
    fn parses_headings_and_paragraphs() {
        let blocks = parse_plain("## Heading 1\n\nSome text");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].kind(), &ElementKind::heading(2));
        assert_eq!(blocks[0].text(), "Heading 1");
        assert_eq!(blocks[1].text(), "Some text");
    }

    #[test]
    fn emphasis_becomes_attributes() {
        let blocks = parse_plain("plain **bold** _it_");
        let inlines = blocks[0].inlines();
        assert_eq!(inlines[0], Inline::text("plain "));
        assert_eq!(inlines[1], Inline::styled("bold", BTreeSet::from([Attribute::Bold])));
        assert_eq!(inlines[3], Inline::styled("it", BTreeSet::from([Attribute::Italic])));
    }

    #[test]
    fn hard_breaks_become_soft_breaks() {
        let blocks = parse_plain("one  \ntwo\nthree");
        assert_eq!(blocks[0].text(), "one\ntwo three");
    }

    #[test]
    fn block_quotes_nest() {
        let blocks = parse_plain("> quoted\n>\n> # inner");
        assert_eq!(blocks[0].kind(), &ElementKind::BlockQuote);
        let Content::Blocks(children) = blocks[0].content() else {
            panic!("quote should hold blocks");
        };
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].kind(), &ElementKind::heading(1));
    }

    #[test]
    fn fenced_code_keeps_language_and_text() {
        let blocks = parse_plain("```rust\nfn main() {}\n```");
        assert_eq!(blocks[0].kind(), &ElementKind::CodeBlock { language: Some("rust".into()) });
        assert_eq!(blocks[0].text(), "fn main() {}");
    }

    #[test]
    fn lists_are_flattened() {
        let blocks = parse_plain("- one\n- two\n\n* * *");
        let texts: Vec<_> = blocks.iter().map(Element::text).collect();
        assert_eq!(texts, vec!["one", "two", ""]);
        assert_eq!(blocks[2].kind(), &ElementKind::HorizontalLine);
    }

    #[test]
    fn unclaimed_html_is_kept_as_text() {
        let blocks = parse_plain("<div>raw</div>");
        assert_eq!(blocks[0].text(), "<div>raw</div>");
    }
}
