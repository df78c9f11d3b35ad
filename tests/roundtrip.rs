use adfless::adf::{Document, Mark, Node, mark_types};
use adfless::cache::ArtifactCache;
use adfless::convert::Converter;
use adfless::error::ConvertError;
use adfless::ids::SequentialIds;
use adfless::readview::{ReadViewNode, flatten};
use adfless::registry::ComponentRegistry;
use adfless::search;
use proptest::prelude::*;

const SAMPLE_MD: &str = include_str!("fixtures/sample.md");
const SAMPLE_JSON: &str = include_str!("fixtures/sample.json");

fn parse(source: &str) -> Document {
    Converter::new().from_markdown(source, &mut SequentialIds::default())
}

fn render(doc: &Document) -> String {
    Converter::new().to_markdown(doc)
}

fn types(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().map(|n| n.node_type.as_str()).collect()
}

#[test]
fn test_canonical_round_trip_is_stable() {
    let first = parse(SAMPLE_MD);
    let markdown = render(&first);
    let second = parse(&markdown);
    assert_eq!(first, second);
    assert_eq!(render(&second), markdown);
}

#[test]
fn test_sample_markdown_block_structure() {
    let doc = parse(SAMPLE_MD);
    assert_eq!(
        types(&doc.content),
        vec![
            "heading",
            "paragraph",
            "blockquote",
            "bulletList",
            "orderedList",
            "taskList",
            "table",
            "codeBlock",
            "rule",
        ]
    );
}

#[test]
fn test_unknown_node_type_stays_visible() {
    let doc = Document::new(vec![
        Node::new("extension").with_attr("extensionKey", "toc"),
        Node::with_content(
            "paragraph",
            vec![Node::text("see "), Node::new("inlineCard")],
        ),
    ]);
    let markdown = render(&doc);
    assert!(markdown.contains("extension"));
    assert!(markdown.contains("see [unsupported: inlineCard]"));

    let lines = doc.display_lines();
    assert!(lines.iter().any(|l| l.content().contains("extension")));
    assert!(lines.iter().any(|l| l.content().contains("inlineCard")));
}

#[test]
fn test_strong_em_nesting() {
    let node = Node::text("both").with_marks(vec![
        Mark::new(mark_types::STRONG),
        Mark::new(mark_types::EM),
    ]);
    let doc = Document::new(vec![Node::with_content("paragraph", vec![node])]);
    assert_eq!(render(&doc), "***both***\n");

    let parsed = parse("***both***");
    let text = &parsed.content[0].children()[0];
    assert_eq!(text.text_str(), "both");
    assert!(text.has_mark(mark_types::STRONG));
    assert!(text.has_mark(mark_types::EM));
    assert_eq!(render(&parsed), "***both***\n");
}

#[test]
fn test_adjacent_empty_nodes_collapse_to_one_blank() {
    let root = ReadViewNode::container(
        "",
        vec![
            ReadViewNode::text("first"),
            ReadViewNode::blank(),
            ReadViewNode::blank(),
            ReadViewNode::text("second"),
        ],
    );
    let lines: Vec<String> = flatten(&root)
        .iter()
        .map(|l| l.content().to_string())
        .collect();
    assert_eq!(lines, vec!["first", "", "second"]);
}

#[test]
fn test_empty_document_is_one_empty_line() {
    let lines = Document::empty().display_lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].is_empty());
}

#[test]
fn test_task_line_beats_bullet_line() {
    let task = parse("- [ ] buy milk");
    assert_eq!(types(&task.content), vec!["taskList"]);
    assert_eq!(task.content[0].children()[0].plain_text(), "buy milk");

    let bullet = parse("- buy milk");
    assert_eq!(types(&bullet.content), vec!["bulletList"]);
}

#[test]
fn test_title_paragraph_and_tasks_scenario() {
    let source = "# Title\n\nSome **bold** and *italic* text.\n\n- [ ] todo one\n- [x] todo two\n";
    let doc = parse(source);
    assert_eq!(types(&doc.content), vec!["heading", "paragraph", "taskList"]);

    let heading = &doc.content[0];
    assert_eq!(heading.attr_u64("level"), Some(1));
    assert_eq!(heading.plain_text(), "Title");

    let inline = doc.content[1].children();
    let texts: Vec<&str> = inline.iter().map(Node::text_str).collect();
    assert_eq!(texts, vec!["Some ", "bold", " and ", "italic", " text."]);
    assert!(inline[0].marks().is_empty());
    assert!(inline[1].has_mark(mark_types::STRONG));
    assert!(inline[2].marks().is_empty());
    assert!(inline[3].has_mark(mark_types::EM));
    assert!(inline[4].marks().is_empty());

    let items = doc.content[2].children();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].attr_str("state"), Some("TODO"));
    assert_eq!(items[0].plain_text(), "todo one");
    assert_eq!(items[1].attr_str("state"), Some("DONE"));
    assert_eq!(items[1].plain_text(), "todo two");

    assert_eq!(render(&doc), source);
}

#[test]
fn test_table_cells_are_isolated() {
    let doc = parse("| Name | Value |\n| --- | --- |\n| a **b** | c |");
    assert_eq!(types(&doc.content), vec!["table"]);
    let rows = doc.content[0].children();
    assert_eq!(rows.len(), 2);
    assert_eq!(types(rows[0].children()), vec!["tableHeader", "tableHeader"]);
    assert_eq!(types(rows[1].children()), vec!["tableCell", "tableCell"]);

    let cell_text: Vec<String> = rows[1].children().iter().map(Node::plain_text).collect();
    assert_eq!(cell_text, vec!["a b", "c"]);
    let bold = &rows[1].children()[0].children()[0].children()[1];
    assert!(bold.has_mark(mark_types::STRONG));
}

#[test]
fn test_nested_bullet_list_round_trip() {
    let doc = parse("- a\n  - b\n- c");
    let list = &doc.content[0];
    assert!(list.is_type("bulletList"));
    let first_item = &list.children()[0];
    assert_eq!(types(first_item.children()), vec!["paragraph", "bulletList"]);
    assert_eq!(render(&doc), "- a\n  - b\n- c\n");
}

#[test]
fn test_ordered_list_keeps_start() {
    let doc = parse("3. x\n4. y");
    assert_eq!(doc.content[0].attr_u64("order"), Some(3));
    assert_eq!(render(&doc), "3. x\n4. y\n");
}

#[test]
fn test_cache_round_trip_and_corruption() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ArtifactCache::new(dir.path());
    let doc = Document::from_json(SAMPLE_JSON).unwrap();
    cache.store("page-1", &doc, &render(&doc)).unwrap();
    assert_eq!(cache.load_document("page-1"), Some(doc));

    std::fs::write(cache.document_path("page-1"), "{ not json").unwrap();
    assert_eq!(cache.load_document("page-1"), None);
}

#[test]
fn test_registry_without_paragraph_is_rejected() {
    let mut registry = ComponentRegistry::new();
    for handler in ComponentRegistry::with_defaults()
        .node_types()
        .iter()
        .filter(|t| t.as_str() != "paragraph")
        .filter_map(|t| ComponentRegistry::shared().get(t))
    {
        registry.register(*handler);
    }
    let err = Converter::with_registry(registry).unwrap_err();
    assert_eq!(
        err,
        ConvertError::MissingHandler {
            node_type: "paragraph".to_string()
        }
    );
}

#[test]
fn test_search_indexes_flattened_lines() {
    let doc = parse("# Intro\n\nThe RELEASE date\n\nnothing here\n\n- release notes");
    let lines = doc.display_lines();
    let found = search::find_matches(&lines, "release");
    assert_eq!(found.len(), 2);
    for index in found {
        assert!(lines[index].content().to_lowercase().contains("release"));
    }
}

#[test]
fn test_sample_json_conversions() {
    let doc = Document::from_json(SAMPLE_JSON).unwrap();
    let markdown = render(&doc);
    assert!(markdown.starts_with("## Status page\n\n> **Warning:**\n>\n> Deploy freeze"));
    assert!(markdown.contains("Owner @Sam is [IN PROGRESS] since 2023-11-14"));
    assert!(markdown.contains("<!-- unsupported node: extension -->"));
    assert!(markdown.contains("<summary>More</summary>"));

    let lines = doc.display_lines();
    assert!(!lines[0].is_empty());
    assert!(lines.iter().any(|l| l.content() == "▾ More"));
    assert!(lines.iter().any(|l| l.content().contains("[IN PROGRESS]")));
    for pair in lines.windows(2) {
        assert!(!(pair[0].is_empty() && pair[1].is_empty()));
    }
}

#[test]
fn test_display_lines_point_back_into_document() {
    let doc = Document::from_json(SAMPLE_JSON).unwrap();
    let lines = doc.display_lines();
    let heading = lines
        .iter()
        .find(|l| l.content() == "Status page")
        .and_then(|l| l.source())
        .and_then(|path| doc.node_at(path))
        .unwrap();
    assert!(heading.is_type("heading"));
}

proptest! {
    #[test]
    fn test_parse_never_panics(source in "[ -~\n#>*_`|\\[\\]()-]{0,200}") {
        let doc = parse(&source);
        let _ = render(&doc);
        let _ = doc.display_lines();
    }

    #[test]
    fn test_rendered_markdown_reparses_to_same_document(
        words in proptest::collection::vec("[a-z]{1,8}", 1..6)
    ) {
        let source = format!("- {}\n\n{}\n", words.join(" "), words.join(" **x** "));
        let first = parse(&source);
        let second = parse(&render(&first));
        prop_assert_eq!(first, second);
    }
}
