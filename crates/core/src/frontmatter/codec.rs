//! Text-level conversion between raw documents and the serialized form the
//! data pipeline understands.
//!
//! On the way in, a leading `---` block is rewritten into the container
//! markup that [`super::conversion`] claims while parsing. On the way out, the
//! `>>>` / `<<<` sentinel paragraphs the container serializes to are turned
//! back into `---` delimiters.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::trace;

use super::types::{BODY_CLASS, CONTAINER_CLASS};
use crate::data::markdown;

/// Leading `---` block. The body group is absent for `---\n---`.
static FRONTMATTER_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A(?:\s*\n)?---\r?\n(?:(.*?)\r?\n)??---(\r?\n|\z)").unwrap()
});

static LINE_BREAKS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:\r?\n)+").unwrap());

/// Backslash runs in front of characters YAML uses unescaped.
static ESCAPED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\\+([\[\]\-_>"'])"#).unwrap());

static START_SENTINEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\A\\?>>>\n*").unwrap());

static END_SENTINEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(?:\\?<){3}\n*").unwrap());

/// Leading block after the sentinels were replaced.
static ENCODED_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A---\n(.*?)\n---(\n|\z)").unwrap());

/// Hard line break padding left by the markdown writer.
static SPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());

/// Replaces a leading `---` block with container markup.
///
/// Input without such a block is returned unchanged.
pub fn decode(raw: &str) -> String {
    let Some(caps) = FRONTMATTER_BLOCK_RE.captures(raw) else {
        trace!("no frontmatter block to decode");
        return raw.to_string();
    };

    let body = caps.get(1).map_or("", |m| m.as_str());
    let body = LINE_BREAKS_RE.replace_all(body, "<br>");
    let body = unescape_known(&body);
    let tail = caps.get(2).map_or("", |m| m.as_str());
    let end = caps.get(0).map_or(0, |m| m.end());
    trace!(body_len = body.len(), "decoded frontmatter block");

    format!(
        r#"<section class="{CONTAINER_CLASS}"><div class="{BODY_CLASS}">{body}</div></section>{tail}{}"#,
        &raw[end..]
    )
}

/// Drops backslashes in front of `[ ] - _ > " '`; other escapes stay.
pub(crate) fn unescape_known(text: &str) -> String {
    ESCAPED_RE.replace_all(text, "$1").into_owned()
}

/// Turns the serialized sentinels back into `---` delimiters and strips the
/// escaping the markdown writer added inside the block.
///
/// Text that does not start with the start sentinel is returned unchanged.
pub fn encode(text: &str) -> String {
    let Some(start) = START_SENTINEL_RE.find(text) else {
        return text.to_string();
    };

    let mut out = String::with_capacity(text.len());
    out.push_str("---\n");
    out.push_str(&text[start.end()..]);
    let out = END_SENTINEL_RE.replace(&out, "---\n\n");

    let encoded = ENCODED_BLOCK_RE.replace(&out, |caps: &Captures<'_>| {
        let body = SPACE_RUN_RE.replace_all(&caps[1], "");
        let body = unescape_known(&markdown::unescape(&body));
        format!("---\n{body}\n---{}", &caps[2])
    });
    trace!(len = encoded.len(), "encoded frontmatter block");
    encoded.into_owned()
}
