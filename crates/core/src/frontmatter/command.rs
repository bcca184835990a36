use chrono::{Local, NaiveDate};
use tracing::debug;

use super::conversion::container_with_body;
use super::types::{EMPTY_BODY, FrontmatterConfig, PresenceFlag};
use crate::editor::{Command, CommandParams, Editor, EditorError};
use crate::model::{Element, ElementKind, Inline, Model, Position, Selection};

/// Inserts a frontmatter block at the top of the document.
///
/// Enabled only while the document has none and the selection is not inside
/// a limit element such as the frontmatter body itself.
pub struct InsertFrontmatterCommand {
    config: Option<FrontmatterConfig>,
    flag: PresenceFlag,
    today: Box<dyn Fn() -> NaiveDate>,
    enabled: bool,
}

impl std::fmt::Debug for InsertFrontmatterCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsertFrontmatterCommand")
            .field("config", &self.config)
            .field("flag", &self.flag)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl InsertFrontmatterCommand {
    pub fn new(config: Option<FrontmatterConfig>, flag: PresenceFlag) -> Self {
        Self { config, flag, today: Box::new(|| Local::now().date_naive()), enabled: false }
    }

    /// Replaces the source of the date `$currentDate` resolves to.
    #[must_use]
    pub fn with_clock(mut self, today: impl Fn() -> NaiveDate + 'static) -> Self {
        self.today = Box::new(today);
        self
    }

    fn body(&self) -> Vec<Inline> {
        let lines = self.config.as_ref().map(|config| config.lines((self.today)()));
        let Some(lines) = lines.filter(|lines| !lines.is_empty()) else {
            return vec![Inline::text(EMPTY_BODY)];
        };

        let mut inlines = Vec::with_capacity(lines.len() * 2);
        for (index, line) in lines.into_iter().enumerate() {
            if index > 0 {
                inlines.push(Inline::SoftBreak);
            }
            inlines.push(Inline::text(line));
        }
        inlines
    }
}

impl Command for InsertFrontmatterCommand {
    fn refresh(&mut self, model: &Model) {
        let document = model.document();
        let allowed = document.has_root()
            && model
                .schema()
                .find_allowed_parent(
                    document,
                    model.selection().first(),
                    &ElementKind::FrontmatterContainer,
                )
                .is_some();
        self.enabled = allowed && !self.flag.get();
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn execute(&mut self, editor: &mut Editor, _: &CommandParams) -> Result<(), EditorError> {
        if !editor.model().document().has_root() {
            return Ok(());
        }
        let container = container_with_body(self.body());

        editor.change(|writer| {
            let mut body = writer.insert(&[], 0, container)?;
            body.push(0);
            let end = writer.document().element(&body).map_or(0, Element::inline_len);
            writer.set_selection(Selection::collapsed(Position::new(body, end)));
            Ok(())
        })?;
        debug!("frontmatter inserted");

        editor.set_placeholder(None);
        Ok(())
    }
}
