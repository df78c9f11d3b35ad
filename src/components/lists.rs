//! Bullet and ordered lists.
//!
//! Items nest by indentation: lines indented deeper than the list's first
//! item belong to the item above them and are parsed again as blocks, with
//! their common indentation removed. A blank line stays inside the item
//! when the next line is indented deeper.

use crate::adf::{Node, node_types};
use crate::markdown::patterns::{self, ListLine};
use crate::readview::ReadViewNode;
use crate::registry::{Handler, ParseContext, ParsedBlock, RenderContext};

pub(super) fn handlers() -> Vec<Handler> {
    vec![
        Handler::new(node_types::BULLET_LIST, bullet_list_markdown, bullet_list_read_view)
            .with_block_parser(can_parse_bullet_list, parse_bullet_list),
        Handler::new(node_types::ORDERED_LIST, ordered_list_markdown, ordered_list_read_view)
            .with_block_parser(can_parse_ordered_list, parse_ordered_list),
        Handler::new(node_types::LIST_ITEM, list_item_markdown, list_item_read_view),
    ]
}

/// Node types that render as a nested list inside an item.
pub(super) fn is_list(node: &Node) -> bool {
    [
        node_types::BULLET_LIST,
        node_types::ORDERED_LIST,
        node_types::TASK_LIST,
        node_types::DECISION_LIST,
    ]
    .contains(&node.node_type.as_str())
}

/// A top-level list is followed by a blank line; nested lists are not.
pub(super) fn close_list(body: String, ctx: &RenderContext<'_>) -> String {
    if ctx.list_depth == 0 {
        format!("{body}\n")
    } else {
        body
    }
}

// markdown

fn bullet_list_markdown(node: &Node, ctx: &mut RenderContext<'_>) -> String {
    let body = ctx.in_list(|ctx| ctx.markdown_children(node));
    close_list(body, ctx)
}

fn ordered_list_markdown(node: &Node, ctx: &mut RenderContext<'_>) -> String {
    let start = node.attr_u64("order").unwrap_or(1);
    let body = ctx.in_list(|ctx| {
        let mut out = String::new();
        for (offset, item) in (0u64..).zip(node.children()) {
            ctx.ordered_index = Some(start.saturating_add(offset));
            out.push_str(&ctx.markdown(item));
        }
        out
    });
    close_list(body, ctx)
}

fn list_item_markdown(node: &Node, ctx: &mut RenderContext<'_>) -> String {
    let indent = ctx.list_indent();
    let marker = ctx
        .ordered_index
        .take()
        .map_or_else(|| "- ".to_string(), |n| format!("{n}. "));
    let continuation = format!("{indent}{}", " ".repeat(marker.len()));

    let mut out = String::new();
    let mut started = false;
    for child in node.children() {
        if is_list(child) {
            if !started {
                out.push_str(&format!("{indent}{}\n", marker.trim_end()));
                started = true;
            }
            out.push_str(&ctx.markdown(child));
            continue;
        }

        let is_paragraph = child.is_type(node_types::PARAGRAPH);
        let body = if is_paragraph {
            ctx.inline_markdown(child)
        } else {
            ctx.markdown(child)
        };
        if started && is_paragraph {
            out.push('\n');
        }
        for line in body.trim_end_matches('\n').lines() {
            if started {
                if !line.is_empty() {
                    out.push_str(&continuation);
                }
            } else {
                out.push_str(&indent);
                out.push_str(&marker);
                started = true;
            }
            out.push_str(line);
            out.push('\n');
        }
    }
    if !started {
        out.push_str(&format!("{indent}{}\n", marker.trim_end()));
    }
    out
}

// read view

fn bullet_list_read_view(node: &Node, ctx: &mut RenderContext<'_>) -> ReadViewNode {
    ReadViewNode::container("", ctx.in_list(|ctx| ctx.project_children(node)))
}

fn ordered_list_read_view(node: &Node, ctx: &mut RenderContext<'_>) -> ReadViewNode {
    let start = node.attr_u64("order").unwrap_or(1);
    let items = ctx.in_list(|ctx| {
        let mut items = Vec::new();
        for (offset, (index, item)) in (0u64..).zip(node.children().iter().enumerate()) {
            ctx.ordered_index = Some(start.saturating_add(offset));
            items.push(ctx.project_child(item, index));
        }
        items
    });
    ReadViewNode::container("", items)
}

fn list_item_read_view(node: &Node, ctx: &mut RenderContext<'_>) -> ReadViewNode {
    let indent = ctx.list_indent();
    let marker = ctx
        .ordered_index
        .take()
        .map_or_else(|| "• ".to_string(), |n| format!("{n}. "));
    let continuation = format!("{indent}{}", " ".repeat(marker.chars().count()));

    let children = ctx
        .project_children(node)
        .into_iter()
        .zip(node.children())
        .enumerate()
        .map(|(index, (view, child))| {
            if index == 0 || is_list(child) {
                view
            } else {
                ReadViewNode::container(continuation.clone(), vec![view])
            }
        })
        .collect();
    ReadViewNode::container(format!("{indent}{marker}"), children)
}

// parsing

/// One item of a list being parsed: its own text and the deeper lines
/// that belong to it.
struct PendingItem {
    text: String,
    nested: Vec<String>,
}

/// Collect the items of the list starting at the cursor. `item` recognises
/// a line of this list kind. Returns the items, the number of lines
/// consumed and the first item's value (its number for ordered lists).
fn collect_items<T>(
    lines: &[String],
    item: impl Fn(&str) -> Option<(ListLine<'_>, T)>,
) -> Option<(Vec<PendingItem>, usize, T)> {
    let (first, first_value) = item(lines.first()?)?;
    let base = first.indent;

    let mut items = vec![PendingItem {
        text: first.text.to_string(),
        nested: Vec::new(),
    }];
    let mut consumed = 1;
    while let Some(line) = lines.get(consumed) {
        let Some(current) = items.last_mut() else {
            break;
        };
        if patterns::is_blank(line) {
            if !continues_after_blank(&lines[consumed..], base) {
                break;
            }
            current.nested.push(String::new());
        } else if patterns::indent_width(line) > base {
            if patterns::starts_block(line.trim_start()) || !current.nested.is_empty() {
                current.nested.push(line.clone());
            } else {
                patterns::join_line(&mut current.text, line);
            }
        } else {
            match item(line) {
                Some((next, _)) if next.indent == base => items.push(PendingItem {
                    text: next.text.to_string(),
                    nested: Vec::new(),
                }),
                _ => break,
            }
        }
        consumed += 1;
    }
    Some((items, consumed, first_value))
}

/// Whether the first non-blank line of `rest` is indented deeper than
/// `base`, so the blank lines before it belong to the current item.
pub(super) fn continues_after_blank(rest: &[String], base: usize) -> bool {
    rest.iter()
        .find(|line| !patterns::is_blank(line))
        .is_some_and(|line| patterns::indent_width(line) > base)
}

/// Remove the indentation shared by every non-blank line.
pub(super) fn dedent(lines: Vec<String>) -> Vec<String> {
    let width = lines
        .iter()
        .filter(|line| !patterns::is_blank(line))
        .map(|line| patterns::indent_width(line))
        .min()
        .unwrap_or(0);
    lines
        .into_iter()
        .map(|line| patterns::strip_indent(&line, width).to_string())
        .collect()
}

fn build_items(ctx: &mut ParseContext<'_>, items: Vec<PendingItem>) -> Vec<Node> {
    items
        .into_iter()
        .map(|item| {
            let mut content = vec![Node::with_content(
                node_types::PARAGRAPH,
                ctx.parse_inline(item.text.trim_end()),
            )];
            if !item.nested.is_empty() {
                content.extend(ctx.parse_nested(dedent(item.nested)));
            }
            Node::with_content(node_types::LIST_ITEM, content)
        })
        .collect()
}

fn bullet_line(line: &str) -> Option<(ListLine<'_>, ())> {
    if patterns::task_item(line).is_some() {
        return None;
    }
    patterns::bullet_item(line).map(|item| (item, ()))
}

fn can_parse_bullet_list(ctx: &ParseContext<'_>) -> bool {
    ctx.current().and_then(bullet_line).is_some()
}

fn parse_bullet_list(ctx: &mut ParseContext<'_>) -> Option<ParsedBlock> {
    let (items, consumed, ()) = collect_items(ctx.remaining(), bullet_line)?;
    let content = build_items(ctx, items);
    Some(ParsedBlock::new(
        Node::with_content(node_types::BULLET_LIST, content),
        consumed,
    ))
}

fn can_parse_ordered_list(ctx: &ParseContext<'_>) -> bool {
    ctx.current().and_then(patterns::ordered_item).is_some()
}

fn parse_ordered_list(ctx: &mut ParseContext<'_>) -> Option<ParsedBlock> {
    let (items, consumed, start) = collect_items(ctx.remaining(), patterns::ordered_item)?;
    let content = build_items(ctx, items);
    let mut node = Node::with_content(node_types::ORDERED_LIST, content);
    if start != 1 {
        node = node.with_attr("order", start);
    }
    Some(ParsedBlock::new(node, consumed))
}
