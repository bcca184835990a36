//! Frontmatter support for the editor.
//!
//! A document may start with a metadata block delimited by `---` lines. In
//! the model it is a [`ElementKind::FrontmatterContainer`] holding a single
//! [`ElementKind::Frontmatter`] body of plain lines. This module provides:
//! - The text codec between raw documents and the data pipeline
//! - Schema rules and conversions for the two elements
//! - A post-fixer keeping the container unique and first
//! - Enter handling inside the body
//! - The `insertFrontmatter` command

pub mod codec;
pub mod command;
pub mod conversion;
mod enter;
pub mod postfixer;
pub mod types;
pub mod utils;

use chrono::{Local, NaiveDate};
use tracing::debug;

pub use codec::{decode, encode};
pub use command::InsertFrontmatterCommand;
pub use postfixer::FrontmatterPostFixer;
pub use types::{CURRENT_DATE_PLACEHOLDER, FrontmatterConfig, PresenceFlag};

use crate::editor::{Editor, EditorError, Priority};
use crate::model::{ElementKind, Schema};

/// Name the insert command is registered under.
pub const INSERT_FRONTMATTER: &str = "insertFrontmatter";

/// Handle to the frontmatter support installed on an editor.
#[derive(Debug, Clone)]
pub struct Frontmatter {
    flag: PresenceFlag,
}

impl Frontmatter {
    /// Installs frontmatter support. `config` pre-populates inserted blocks.
    pub fn register(editor: &mut Editor, config: Option<FrontmatterConfig>) -> Self {
        Self::register_with_clock(editor, config, || Local::now().date_naive())
    }

    /// Like [`Frontmatter::register`], with a fixed source for `$currentDate`.
    pub fn register_with_clock(
        editor: &mut Editor,
        config: Option<FrontmatterConfig>,
        today: impl Fn() -> NaiveDate + 'static,
    ) -> Self {
        let flag = PresenceFlag::default();
        flag.set(editor.model().document().count(&ElementKind::FrontmatterContainer) == 1);

        extend_schema(editor.model_mut().schema_mut());
        conversion::register(editor.data_mut());
        editor.model_mut().register_post_fixer(FrontmatterPostFixer::new(flag.clone()));
        editor.on_enter(Priority::High, enter::handle_enter);
        editor.add_command(
            INSERT_FRONTMATTER,
            InsertFrontmatterCommand::new(config, flag.clone()).with_clock(today),
        );
        debug!(present = flag.get(), "frontmatter support registered");

        Self { flag }
    }

    /// Whether the document currently holds a frontmatter block.
    pub fn is_loaded(&self) -> bool {
        self.flag.get()
    }

    /// Shared handle to the presence flag, for observers outside the editor.
    pub fn presence(&self) -> PresenceFlag {
        self.flag.clone()
    }
}

fn extend_schema(schema: &mut Schema) {
    // One container per document.
    schema.add_child_check(|context, child| {
        (*child == ElementKind::FrontmatterContainer
            && context.document.find(&ElementKind::FrontmatterContainer).is_some())
        .then_some(false)
    });
    // The body is plain text.
    schema.add_attribute_check(|context, _| {
        context.ends_with(&ElementKind::Frontmatter).then_some(false)
    });
}

/// Document text API aware of the `---` block.
pub trait FrontmatterDataApi {
    /// Loads `raw`, turning a leading `---` block into a frontmatter element.
    fn set_data_with_frontmatter(&mut self, raw: &str) -> Result<(), EditorError>;

    /// Serializes the document with its frontmatter back as a `---` block.
    fn get_data_with_frontmatter(&self) -> String;
}

impl FrontmatterDataApi for Editor {
    fn set_data_with_frontmatter(&mut self, raw: &str) -> Result<(), EditorError> {
        self.set_data(&decode(raw))
    }

    fn get_data_with_frontmatter(&self) -> String {
        encode(&self.get_data())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attribute, Position, Selection};

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 10, 1).unwrap()
    }

    fn editor() -> (Editor, Frontmatter) {
        let mut editor = Editor::new();
        let frontmatter = Frontmatter::register_with_clock(&mut editor, None, fixed_today);
        (editor, frontmatter)
    }

    #[test]
    fn registers_command_and_starts_absent() {
        let (editor, frontmatter) = editor();
        assert!(editor.has_command(INSERT_FRONTMATTER));
        assert!(editor.is_enabled(INSERT_FRONTMATTER));
        assert!(!frontmatter.is_loaded());
    }

    #[test]
    fn loading_sets_presence() {
        let (mut editor, frontmatter) = editor();
        editor.set_data_with_frontmatter("---\na: 1\n---\n\ntext").unwrap();
        assert!(frontmatter.is_loaded());
        assert!(!editor.is_enabled(INSERT_FRONTMATTER));

        editor.set_data_with_frontmatter("text only").unwrap();
        assert!(!frontmatter.is_loaded());
        assert!(editor.is_enabled(INSERT_FRONTMATTER));
    }

    #[test]
    fn presence_handle_follows_the_document() {
        let (mut editor, frontmatter) = editor();
        let presence = frontmatter.presence();
        assert!(!presence.get());

        editor.execute(INSERT_FRONTMATTER).unwrap();
        assert!(presence.get());
    }

    #[test]
    fn insert_places_caret_at_body_end() {
        let (mut editor, _) = editor();
        editor.set_placeholder(Some("Start writing...".into()));
        editor.execute(INSERT_FRONTMATTER).unwrap();
        assert_eq!(editor.model().selection().anchor, Position::new([0, 0], 1));
        assert_eq!(editor.placeholder(), None);
    }

    #[test]
    fn singleton_rule_refuses_second_container() {
        let (mut editor, _) = editor();
        editor.execute(INSERT_FRONTMATTER).unwrap();
        let result = editor.change(|writer| {
            writer.append(&[], conversion::container_with_body(Vec::new())).map(|_| ())
        });
        assert!(matches!(result, Err(EditorError::Model(_))));
        assert_eq!(editor.model().document().count(&ElementKind::FrontmatterContainer), 1);
    }

    #[test]
    fn body_refuses_attributes() {
        let (mut editor, _) = editor();
        editor.set_data_with_frontmatter("---\nkey: value\n---\n").unwrap();
        editor
            .set_selection(Selection::new(Position::new([0, 0], 0), Position::new([0, 0], 3)))
            .unwrap();
        assert!(!editor.is_enabled(crate::editor::builtin::BOLD));

        let result =
            editor.change(|writer| writer.set_attribute(&[0, 0], 0, 3, Attribute::Bold, true));
        assert!(result.is_err());
        assert_eq!(editor.get_data_with_frontmatter(), "---\nkey: value\n---\n\n");
    }

    #[test]
    fn insert_disabled_inside_body() {
        let (mut editor, _) = editor();
        editor.execute(INSERT_FRONTMATTER).unwrap();
        editor.delete().unwrap();
        // Body emptied but the container is still there.
        assert!(!editor.is_enabled(INSERT_FRONTMATTER));
        assert_eq!(editor.get_data_with_frontmatter(), "---\n\u{a0}\n---\n\n");
    }
}
