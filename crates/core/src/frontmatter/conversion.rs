//! Conversion between the frontmatter elements and their data forms.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::codec::unescape_known;
use super::types::{EMPTY_BODY, END_SENTINEL, START_SENTINEL};
use crate::data::{DataController, UpcastResult, ViewBlock, plain_inlines};
use crate::model::node::inline_len;
use crate::model::{Element, ElementKind, Inline};

static CONTAINER_MARKUP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)\A\s*<section class="frontmatter-container">\s*<div class="frontmatter">(.*?)</div>\s*</section>"#,
    )
    .unwrap()
});

static BR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<br\s*/?>").unwrap());

pub(crate) fn register(data: &mut DataController) {
    data.add_html_upcast(upcast_container);
    data.add_downcast(&ElementKind::FrontmatterContainer, downcast_container);
    data.add_downcast(&ElementKind::Frontmatter, downcast_body);
}

/// A container holding one body with `inlines`.
pub fn container_with_body(inlines: Vec<Inline>) -> Element {
    Element::with_children(
        ElementKind::FrontmatterContainer,
        vec![Element::with_inlines(ElementKind::Frontmatter, inlines)],
    )
}

/// Body content from its markup: one line per `<br>`, the placeholder when
/// nothing is left.
pub fn body_inlines(markup: &str) -> Vec<Inline> {
    let mut inlines = Vec::new();
    for (index, line) in BR_RE.split(markup).enumerate() {
        if index > 0 {
            inlines.push(Inline::SoftBreak);
        }
        let line = unescape_known(line);
        if !line.is_empty() {
            inlines.push(Inline::text(line));
        }
    }
    if inlines.is_empty() {
        inlines.push(Inline::text(EMPTY_BODY));
    }
    inlines
}

fn upcast_container(html: &str) -> Option<UpcastResult> {
    let caps = CONTAINER_MARKUP_RE.captures(html)?;
    let markup = caps.get(1).map_or("", |m| m.as_str());
    let end = caps.get(0).map_or(0, |m| m.end());
    debug!(len = markup.len(), "frontmatter container loaded");
    Some(UpcastResult {
        elements: vec![container_with_body(body_inlines(markup))],
        rest: html[end..].to_string(),
    })
}

fn downcast_container(element: &Element, data: &DataController, out: &mut Vec<ViewBlock>) {
    out.push(ViewBlock::text(START_SENTINEL));
    data.downcast_all(element.children(), out);
    out.push(ViewBlock::text(END_SENTINEL));
}

fn downcast_body(element: &Element, _: &DataController, out: &mut Vec<ViewBlock>) {
    let mut inlines = plain_inlines(element.inlines());
    if inline_len(&inlines) == 0 {
        inlines = vec![Inline::text(EMPTY_BODY)];
    }
    out.push(ViewBlock::Paragraph(inlines));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> DataController {
        let mut data = DataController::default();
        register(&mut data);
        data
    }

    #[test]
    fn markup_becomes_container_with_soft_breaks() {
        let elements = data().parse(
            "<section class=\"frontmatter-container\"><div class=\"frontmatter\">a: 1<br>b: \\[x\\]</div></section>",
        );
        assert_eq!(elements.len(), 1);
        let container = &elements[0];
        assert!(container.is(&ElementKind::FrontmatterContainer));
        assert_eq!(container.children().len(), 1);
        assert_eq!(container.children()[0].text(), "a: 1\nb: [x]");
    }

    #[test]
    fn empty_markup_gets_placeholder() {
        assert_eq!(body_inlines(""), vec![Inline::text(EMPTY_BODY)]);
        assert_eq!(body_inlines("<br/>"), vec![Inline::SoftBreak]);
    }

    #[test]
    fn text_after_markup_is_parsed() {
        let elements = data().parse(
            "<section class=\"frontmatter-container\"><div class=\"frontmatter\">a: 1</div></section>\n\n# Title",
        );
        let kinds: Vec<_> = elements.iter().map(|element| element.kind().name()).collect();
        assert_eq!(kinds, vec!["frontmatterContainer", "heading"]);
    }

    #[test]
    fn other_html_is_not_claimed() {
        let elements = data().parse("<section class=\"other\">x</section>");
        assert!(elements.iter().all(|element| !element.is(&ElementKind::FrontmatterContainer)));
    }

    #[test]
    fn container_renders_between_sentinels() {
        let data = data();
        let mut out = Vec::new();
        data.downcast(&container_with_body(vec![Inline::text("k: v")]), &mut out);
        assert_eq!(
            out,
            vec![
                ViewBlock::text(START_SENTINEL),
                ViewBlock::text("k: v"),
                ViewBlock::text(END_SENTINEL),
            ]
        );
    }

    #[test]
    fn emptied_body_renders_placeholder() {
        let data = data();
        let mut out = Vec::new();
        data.downcast(&Element::with_inlines(ElementKind::Frontmatter, Vec::new()), &mut out);
        assert_eq!(out, vec![ViewBlock::text(EMPTY_BODY)]);
    }
}
