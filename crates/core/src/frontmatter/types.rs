//! Frontmatter types and constants.

use std::cell::Cell;
use std::rc::Rc;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Class of the markup a container is loaded from.
pub const CONTAINER_CLASS: &str = "frontmatter-container";

/// Class of the markup a body is loaded from.
pub const BODY_CLASS: &str = "frontmatter";

/// Paragraph text marking where a container starts in serialized output.
pub const START_SENTINEL: &str = ">>>";

/// Paragraph text marking where a container ends in serialized output.
pub const END_SENTINEL: &str = "<<<";

/// Placeholder text of an empty body.
pub const EMPTY_BODY: &str = "\u{a0}";

/// Template value replaced with today's date when a body is created.
pub const CURRENT_DATE_PLACEHOLDER: &str = "$currentDate";

/// Template for the body of a newly inserted frontmatter block.
///
/// Keys keep the order they were configured in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrontmatterConfig(IndexMap<String, String>);

impl FrontmatterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert; a repeated key keeps its first position.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Body lines as `key: value`, with the date placeholder resolved.
    pub fn lines(&self, today: NaiveDate) -> Vec<String> {
        self.iter()
            .map(|(key, value)| {
                if value == CURRENT_DATE_PLACEHOLDER {
                    format!("{key}: {}", today.format("%Y-%m-%d"))
                } else {
                    format!("{key}: {value}")
                }
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FrontmatterConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
    }
}

/// Shared flag telling whether the document holds a frontmatter block.
///
/// Clones observe the same value.
#[derive(Debug, Clone, Default)]
pub struct PresenceFlag(Rc<Cell<bool>>);

impl PresenceFlag {
    pub fn get(&self) -> bool {
        self.0.get()
    }

    pub(crate) fn set(&self, present: bool) {
        self.0.set(present);
    }
}
