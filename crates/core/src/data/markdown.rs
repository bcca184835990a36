//! Markdown writer for [`ViewBlock`]s.
//!
//! The writer is generic: it escapes every character that could
//! change the meaning of plain text, without knowing which block the text came
//! from. Blocks are separated by one blank line and the output carries no
//! trailing newline. Soft breaks are written as hard-break padding (two spaces
//! and a newline).

use crate::model::{Attribute, Inline};

use super::types::ViewBlock;

/// Serialize blocks to markdown. Blocks that render to nothing are dropped.
pub fn write(blocks: &[ViewBlock]) -> String {
    blocks
        .iter()
        .map(render_block)
        .filter(|block| !block.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_block(block: &ViewBlock) -> String {
    match block {
        ViewBlock::Paragraph(inlines) => render_inlines(inlines),
        ViewBlock::Heading(level, inlines) => {
            let text = render_inlines(inlines);
            if text.is_empty() {
                return text;
            }
            format!("{} {text}", "#".repeat(usize::from(*level)))
        }
        ViewBlock::Quote(children) => write(children)
            .lines()
            .map(|line| if line.is_empty() { ">".to_string() } else { format!("> {line}") })
            .collect::<Vec<_>>()
            .join("\n"),
        ViewBlock::Code { language, text } => {
            format!("```{}\n{text}\n```", language.as_deref().unwrap_or_default())
        }
        // `---` would collide with frontmatter delimiters.
        ViewBlock::Rule => "* * *".to_string(),
    }
}

fn render_inlines(inlines: &[Inline]) -> String {
    let mut out = String::new();
    let mut line_start = true;
    for inline in inlines {
        match inline {
            Inline::SoftBreak => {
                out.push_str("  \n");
                line_start = true;
            }
            Inline::Text { data, attributes } => {
                let body = if attributes.contains(&Attribute::Code) {
                    format!("`{data}`")
                } else {
                    escape(data, line_start)
                };
                let bold = attributes.contains(&Attribute::Bold);
                let italic = attributes.contains(&Attribute::Italic);
                if bold {
                    out.push_str("**");
                }
                if italic {
                    out.push('_');
                }
                out.push_str(&body);
                if italic {
                    out.push('_');
                }
                if bold {
                    out.push_str("**");
                }
                line_start = false;
            }
        }
    }
    out
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum LineState {
    Start,
    Digits,
    Rest,
}

/// Backslash-escape markdown syntax in plain text.
///
/// Emphasis, code, link and HTML characters are escaped everywhere; block
/// markers (`#`, `>`, `-`, `+`, `=` and ordered list numbers) only when they
/// open a line. A backslash is escaped only when it precedes punctuation.
pub fn escape(text: &str, line_start: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut state = if line_start { LineState::Start } else { LineState::Rest };
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let needs_escape = match c {
            '\\' => chars.peek().is_some_and(char::is_ascii_punctuation),
            '*' | '_' | '`' | '[' | ']' | '<' => true,
            '#' | '>' | '-' | '+' | '=' => state == LineState::Start,
            '.' | ')' => state == LineState::Digits,
            _ => false,
        };
        if needs_escape {
            out.push('\\');
        }
        out.push(c);

        state = match (state, c) {
            (LineState::Start, ' ') => LineState::Start,
            (LineState::Start | LineState::Digits, '0'..='9') => LineState::Digits,
            (_, '\n') => LineState::Start,
            _ => LineState::Rest,
        };
    }
    out
}

/// Undo backslash escapes of ASCII punctuation; other backslashes stay.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(&next) = chars.peek()
            && next.is_ascii_punctuation()
        {
            out.push(next);
            chars.next();
            continue;
        }
        out.push(c);
    }
    out
}
