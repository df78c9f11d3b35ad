//! Display tree to line sequence.

use crate::adf::NodePath;

use super::{ReadViewNode, ViewStyle};

/// A single display line with styling information.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayLine {
    /// The text content of the line
    content: String,
    /// Optional style for the whole line
    style: Option<ViewStyle>,
    /// Path of the document node the line came from
    source: Option<NodePath>,
}

impl DisplayLine {
    pub const fn new(content: String, style: Option<ViewStyle>, source: Option<NodePath>) -> Self {
        Self {
            content,
            style,
            source,
        }
    }

    /// Get the text content.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub const fn style(&self) -> Option<&ViewStyle> {
        self.style.as_ref()
    }

    pub const fn source(&self) -> Option<&NodePath> {
        self.source.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Flatten a display tree into lines.
///
/// Each node's content is appended to the inherited prefix. Content with
/// newlines becomes several lines; otherwise the first child inherits the
/// accumulated text and later children start from an empty prefix. A run of
/// empty lines is collapsed to one and the sequence never starts with an
/// empty line, except that a tree with nothing to show yields a single empty
/// line.
pub fn flatten(root: &ReadViewNode) -> Vec<DisplayLine> {
    let mut lines = Vec::new();
    flatten_node(root, "", &mut lines);
    if lines.is_empty() {
        lines.push(DisplayLine::default());
    }
    lines
}

fn flatten_node(node: &ReadViewNode, prefix: &str, lines: &mut Vec<DisplayLine>) {
    let content = format!("{prefix}{}", node.content);

    if content.contains('\n') {
        let mut parts: Vec<&str> = content.split('\n').collect();
        // The fragment after a trailing newline is not a line of its own.
        if parts.last().is_some_and(|p| p.is_empty()) {
            parts.pop();
        }
        for part in parts {
            push_line(lines, part.to_string(), node);
        }
        for child in &node.children {
            flatten_node(child, "", lines);
        }
    } else if !node.children.is_empty() {
        for (index, child) in node.children.iter().enumerate() {
            let inherited = if index == 0 { content.as_str() } else { "" };
            flatten_node(child, inherited, lines);
        }
    } else if !content.is_empty() {
        push_line(lines, content, node);
    }
}

fn push_line(lines: &mut Vec<DisplayLine>, content: String, node: &ReadViewNode) {
    if content.is_empty() && lines.last().is_none_or(DisplayLine::is_empty) {
        return;
    }
    lines.push(DisplayLine::new(content, node.style, node.source.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(lines: &[DisplayLine]) -> Vec<&str> {
        lines.iter().map(DisplayLine::content).collect()
    }

    #[test]
    fn test_leaf_becomes_one_line() {
        let lines = flatten(&ReadViewNode::text("hello"));
        assert_eq!(contents(&lines), vec!["hello"]);
    }

    #[test]
    fn test_first_child_inherits_prefix() {
        let node = ReadViewNode::container(
            "• ",
            vec![ReadViewNode::text("first"), ReadViewNode::text("second")],
        );
        let lines = flatten(&node);
        assert_eq!(contents(&lines), vec!["• first", "second"]);
    }

    #[test]
    fn test_prefix_accumulates_through_nested_first_children() {
        let node = ReadViewNode::container(
            "a",
            vec![ReadViewNode::container("b", vec![ReadViewNode::text("c")])],
        );
        assert_eq!(contents(&flatten(&node)), vec!["abc"]);
    }

    #[test]
    fn test_embedded_newlines_split_into_lines() {
        let lines = flatten(&ReadViewNode::text("one\ntwo\nthree"));
        assert_eq!(contents(&lines), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_trailing_newline_does_not_add_phantom_line() {
        let node = ReadViewNode::container(
            "",
            vec![ReadViewNode::text("line\n"), ReadViewNode::text("next")],
        );
        assert_eq!(contents(&flatten(&node)), vec!["line", "next"]);
    }

    #[test]
    fn test_adjacent_blanks_collapse() {
        let node = ReadViewNode::container(
            "",
            vec![
                ReadViewNode::text("a"),
                ReadViewNode::blank(),
                ReadViewNode::blank(),
                ReadViewNode::text("\n\n"),
                ReadViewNode::text("b"),
            ],
        );
        assert_eq!(contents(&flatten(&node)), vec!["a", "", "b"]);
    }

    #[test]
    fn test_no_leading_blank_line() {
        let node = ReadViewNode::container(
            "",
            vec![ReadViewNode::blank(), ReadViewNode::text("a")],
        );
        assert_eq!(contents(&flatten(&node)), vec!["a"]);
    }

    #[test]
    fn test_empty_leaf_pushes_nothing() {
        let node = ReadViewNode::container(
            "",
            vec![ReadViewNode::text("a"), ReadViewNode::text(""), ReadViewNode::text("b")],
        );
        assert_eq!(contents(&flatten(&node)), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_tree_yields_single_empty_line() {
        let lines = flatten(&ReadViewNode::container("", vec![ReadViewNode::blank()]));
        assert_eq!(contents(&lines), vec![""]);
    }

    #[test]
    fn test_lines_keep_node_style_and_source() {
        let style = ViewStyle::default().bold();
        let node = ReadViewNode::styled("x\ny", style).with_source(NodePath::from(vec![2]));
        let lines = flatten(&node);
        assert_eq!(lines.len(), 2);
        for line in &lines {
            assert_eq!(line.style(), Some(&style));
            assert_eq!(line.source(), Some(&NodePath::from(vec![2])));
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_node() -> impl Strategy<Value = ReadViewNode> {
            let leaf = prop::sample::select(vec!["", "\n", "\n\n", "a", "b\n", "c\nd", " "])
                .prop_map(ReadViewNode::text);
            leaf.prop_recursive(4, 32, 4, |inner| {
                (
                    prop::sample::select(vec!["", "• ", "x", "\n"]),
                    prop::collection::vec(inner, 0..4),
                )
                    .prop_map(|(content, children)| ReadViewNode::container(content, children))
            })
        }

        proptest! {
            #[test]
            fn never_two_consecutive_blank_lines(node in arb_node()) {
                let lines = flatten(&node);
                for pair in lines.windows(2) {
                    prop_assert!(!(pair[0].is_empty() && pair[1].is_empty()));
                }
            }

            #[test]
            fn first_line_blank_only_when_alone(node in arb_node()) {
                let lines = flatten(&node);
                prop_assert!(!lines.is_empty());
                if lines[0].is_empty() {
                    prop_assert_eq!(lines.len(), 1);
                }
            }

            #[test]
            fn lines_never_contain_newlines(node in arb_node()) {
                for line in flatten(&node) {
                    prop_assert!(!line.content().contains('\n'));
                }
            }
        }
    }
}
