//! Task lists (`- [ ]` / `- [x]`) and decision lists.
//!
//! Task items hold inline content directly. Both the list and every item
//! get a `localId` from the parse's identifier source, list first.

use crate::adf::{Node, node_types};
use crate::markdown::patterns;
use crate::readview::{ReadViewNode, ViewColor, ViewStyle};
use crate::registry::{Handler, ParseContext, ParsedBlock, RenderContext};

use super::lists::{close_list, continues_after_blank, dedent};

pub const STATE_TODO: &str = "TODO";
pub const STATE_DONE: &str = "DONE";
pub const STATE_DECIDED: &str = "DECIDED";

pub(super) fn handlers() -> Vec<Handler> {
    vec![
        Handler::new(node_types::TASK_LIST, list_markdown, list_read_view)
            .with_block_parser(can_parse_task_list, parse_task_list),
        Handler::new(node_types::TASK_ITEM, task_item_markdown, task_item_read_view),
        Handler::new(node_types::DECISION_LIST, list_markdown, list_read_view),
        Handler::new(node_types::DECISION_ITEM, decision_item_markdown, decision_item_read_view),
    ]
}

fn is_done(node: &Node) -> bool {
    node.attr_str("state") == Some(STATE_DONE)
}

fn list_markdown(node: &Node, ctx: &mut RenderContext<'_>) -> String {
    let body = ctx.in_list(|ctx| ctx.markdown_children(node));
    close_list(body, ctx)
}

fn list_read_view(node: &Node, ctx: &mut RenderContext<'_>) -> ReadViewNode {
    ReadViewNode::container("", ctx.in_list(|ctx| ctx.project_children(node)))
}

/// `prefix` followed by the item's inline text, if any. Lines after a
/// hard break are indented to line up with the text.
fn item_line(prefix: &str, text: &str) -> String {
    if text.is_empty() {
        return format!("{prefix}\n");
    }
    let continuation = " ".repeat(prefix.chars().count() + 1);
    let mut out = String::new();
    for (index, line) in text.split('\n').enumerate() {
        if index == 0 {
            out.push_str(prefix);
            out.push(' ');
        } else {
            out.push_str(&continuation);
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

fn task_item_markdown(node: &Node, ctx: &mut RenderContext<'_>) -> String {
    let check = if is_done(node) { "x" } else { " " };
    let prefix = format!("{}- [{check}]", ctx.list_indent());
    // A task item is inline-only, but nested task lists sometimes land here.
    let mut inline = Vec::new();
    let mut nested = String::new();
    for child in node.children() {
        if super::lists::is_list(child) {
            nested.push_str(&ctx.markdown(child));
        } else {
            inline.push(child);
        }
    }
    let saved = std::mem::replace(&mut ctx.in_inline, true);
    let text: String = inline.into_iter().map(|child| ctx.markdown(child)).collect();
    ctx.in_inline = saved;
    item_line(&prefix, &text) + &nested
}

fn task_item_read_view(node: &Node, ctx: &mut RenderContext<'_>) -> ReadViewNode {
    let text = ctx.inline_text(node);
    let (check, style) = if is_done(node) {
        ("☑", ViewStyle::default().fg(ViewColor::GREEN).dim())
    } else {
        ("☐", ViewStyle::default())
    };
    let line = item_line(&format!("{}{check}", ctx.list_indent()), &text);
    ReadViewNode::styled(line.trim_end_matches('\n'), style)
}

fn decision_item_markdown(node: &Node, ctx: &mut RenderContext<'_>) -> String {
    let prefix = format!("{}- ◆", ctx.list_indent());
    item_line(&prefix, &ctx.inline_markdown(node))
}

fn decision_item_read_view(node: &Node, ctx: &mut RenderContext<'_>) -> ReadViewNode {
    let text = ctx.inline_text(node);
    let line = item_line(&format!("{}◆", ctx.list_indent()), &text);
    let style = if node.attr_str("state") == Some(STATE_DECIDED) {
        ViewStyle::default().fg(ViewColor::GREEN)
    } else {
        ViewStyle::default().fg(ViewColor::GRAY)
    };
    ReadViewNode::styled(line.trim_end_matches('\n'), style)
}

fn can_parse_task_list(ctx: &ParseContext<'_>) -> bool {
    ctx.current().and_then(patterns::task_item).is_some()
}

enum Entry {
    Item { text: String, checked: bool },
    Nested(Vec<String>),
}

/// Task lines at the first item's indentation. Deeper lines continue the
/// item's text, or start nested blocks after the item above them.
fn parse_task_list(ctx: &mut ParseContext<'_>) -> Option<ParsedBlock> {
    let lines = ctx.remaining();
    let (first, _) = patterns::task_item(lines.first()?)?;
    let base = first.indent;

    let mut entries: Vec<Entry> = Vec::new();
    let mut consumed = 0;
    while let Some(line) = lines.get(consumed) {
        if patterns::is_blank(line) {
            if !continues_after_blank(&lines[consumed..], base) {
                break;
            }
            match entries.last_mut() {
                Some(Entry::Nested(nested)) => nested.push(String::new()),
                _ => entries.push(Entry::Nested(Vec::new())),
            }
            consumed += 1;
            continue;
        }
        let indent = patterns::indent_width(line);
        match patterns::task_item(line) {
            Some((item, checked)) if item.indent == base => entries.push(Entry::Item {
                text: item.text.to_string(),
                checked,
            }),
            _ if indent <= base => break,
            task => match entries.last_mut() {
                Some(Entry::Nested(nested)) => nested.push(line.clone()),
                Some(Entry::Item { text, .. })
                    if task.is_none() && !patterns::starts_block(line.trim_start()) =>
                {
                    patterns::join_line(text, line);
                }
                _ => entries.push(Entry::Nested(vec![line.clone()])),
            },
        }
        consumed += 1;
    }

    let list_id = ctx.next_id();
    let mut content = Vec::new();
    for entry in entries {
        match entry {
            Entry::Item { text, checked } => {
                let state = if checked { STATE_DONE } else { STATE_TODO };
                let inline = ctx.parse_inline(text.trim_end());
                let item = Node::with_content(node_types::TASK_ITEM, inline)
                    .with_attr("localId", ctx.next_id())
                    .with_attr("state", state);
                content.push(item);
            }
            Entry::Nested(lines) => content.extend(ctx.parse_nested(dedent(lines))),
        }
    }

    let node = Node::with_content(node_types::TASK_LIST, content).with_attr("localId", list_id);
    Some(ParsedBlock::new(node, consumed))
}
