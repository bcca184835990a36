use chrono::NaiveDate;
use mdfront_core::frontmatter::{CURRENT_DATE_PLACEHOLDER, decode, encode};
use mdfront_core::model::{Position, Selection};
use mdfront_core::{Editor, Frontmatter, FrontmatterConfig, FrontmatterDataApi, INSERT_FRONTMATTER};
use rstest::rstest;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 10, 1).unwrap()
}

fn editor(config: Option<FrontmatterConfig>) -> (Editor, Frontmatter) {
    let mut editor = Editor::new();
    let frontmatter = Frontmatter::register_with_clock(&mut editor, config, today);
    (editor, frontmatter)
}

fn cycle(raw: &str) -> String {
    let (mut editor, _) = editor(None);
    editor.set_data_with_frontmatter(raw).unwrap();
    editor.get_data_with_frontmatter()
}

#[test]
fn empty_document_round_trips() {
    let (mut editor, frontmatter) = editor(None);
    editor.set_data_with_frontmatter("").unwrap();
    assert_eq!(editor.get_data_with_frontmatter(), "");
    assert!(!frontmatter.is_loaded());
}

#[test]
fn frontmatter_round_trips_exactly() {
    let raw = "---\ntitle: Title\ndraft: false\n---\n\n## Heading 1";
    let (mut editor, frontmatter) = editor(None);
    editor.set_data_with_frontmatter(raw).unwrap();
    assert_eq!(editor.get_data_with_frontmatter(), raw);
    assert!(frontmatter.is_loaded());
}

#[test]
fn insert_goes_to_top_wherever_the_caret_is() {
    let (mut editor, frontmatter) = editor(None);
    editor.set_data_with_frontmatter("## Heading 1").unwrap();
    editor.set_selection(Selection::collapsed(Position::new([0], 9))).unwrap();
    assert!(editor.is_enabled(INSERT_FRONTMATTER));

    editor.execute(INSERT_FRONTMATTER).unwrap();
    assert_eq!(editor.get_data_with_frontmatter(), "---\n\u{a0}\n---\n\n## Heading 1");
    assert!(frontmatter.is_loaded());
}

#[test]
fn configured_template_fills_the_body() {
    let config = FrontmatterConfig::new()
        .with("title", "")
        .with("draft", "true")
        .with("date", CURRENT_DATE_PLACEHOLDER);
    let (mut editor, _) = editor(Some(config));
    editor.execute(INSERT_FRONTMATTER).unwrap();

    let body = editor.model().document().element(&[0, 0]).unwrap().text();
    assert_eq!(body, "title: \ndraft: true\ndate: 2023-10-01");
    assert_eq!(
        editor.get_data_with_frontmatter(),
        "---\ntitle:\ndraft: true\ndate: 2023-10-01\n---\n\n"
    );
}

#[test]
fn insert_is_disabled_once_present() {
    let (mut editor, _) = editor(None);
    editor.set_data_with_frontmatter("text").unwrap();
    editor.execute(INSERT_FRONTMATTER).unwrap();
    assert!(!editor.is_enabled(INSERT_FRONTMATTER));

    // Also with the caret back in ordinary content.
    editor.set_selection(Selection::collapsed(Position::new([1], 0))).unwrap();
    assert!(!editor.is_enabled(INSERT_FRONTMATTER));

    let before = editor.get_data_with_frontmatter();
    editor.execute(INSERT_FRONTMATTER).unwrap();
    assert_eq!(editor.get_data_with_frontmatter(), before);
    assert_eq!(
        editor
            .model()
            .document()
            .count(&mdfront_core::model::ElementKind::FrontmatterContainer),
        1
    );
}

#[rstest]
#[case::empty("")]
#[case::plain("# Title\n\nSome **bold** text")]
#[case::exact("---\ntitle: Title\ndraft: false\n---\n\n## Heading 1")]
#[case::empty_block("---\n---\n\ntext")]
#[case::escapes("---\ntags: [a, b]\nslug: my_post\n---\n\nBody with *emphasis*")]
#[case::block_markers("---\n# comment\n> quote\n---\n")]
#[case::leading_blank_lines("  \n---\na: 1\n---\ntext")]
#[case::later_delimiters("Intro\n\n---\nnot: frontmatter\n---\n")]
#[case::crlf("---\r\na: 1\r\n---\r\n\r\ntext")]
fn cycles_reach_a_fixed_point(#[case] raw: &str) {
    let once = cycle(raw);
    assert_eq!(cycle(&once), once);
}

#[test]
fn escapes_are_compensated() {
    let once = cycle("---\ntags: [a, b]\nslug: my_post\n---\n\nBody with *emphasis*");
    insta::assert_snapshot!(once, @r"
    ---
    tags: [a, b]
    slug: my_post
    ---

    Body with _emphasis_
    ");
}

#[test]
fn leading_blank_lines_are_dropped() {
    assert_eq!(cycle("  \n---\na: 1\n---\ntext"), "---\na: 1\n---\n\ntext");
}

#[test]
fn codec_is_stable_on_its_own_output() {
    let raw = "---\na: 1\n---\n\ntext";
    let (mut editor, _) = editor(None);
    editor.set_data(&decode(raw)).unwrap();
    let encoded = encode(&editor.get_data());
    assert_eq!(encoded, raw);
}
