//! Panels, expands and media.
//!
//! None of these have Markdown syntax of their own. They render to the
//! nearest readable Markdown and are not recognized when parsing.

use crate::adf::{Node, node_types};
use crate::readview::{ReadViewNode, ViewColor, ViewStyle};
use crate::registry::{Handler, RenderContext};

/// Collapsible section nested inside another container.
pub const NESTED_EXPAND: &str = "nestedExpand";

pub(super) fn handlers() -> Vec<Handler> {
    vec![
        Handler::new(node_types::PANEL, panel_markdown, panel_read_view),
        Handler::new(node_types::EXPAND, expand_markdown, expand_read_view),
        Handler::new(NESTED_EXPAND, expand_markdown, expand_read_view),
        Handler::new(node_types::MEDIA_SINGLE, media_group_markdown, media_group_read_view),
        Handler::new(node_types::MEDIA_GROUP, media_group_markdown, media_group_read_view),
        Handler::new(node_types::MEDIA, media_markdown, media_read_view),
    ]
}

/// Panel flavours: label, icon and color.
fn panel_kind(node: &Node) -> (&'static str, &'static str, ViewColor) {
    match node.attr_str("panelType").unwrap_or("info") {
        "note" => ("Note", "✎", ViewColor::PURPLE),
        "warning" => ("Warning", "⚠", ViewColor::YELLOW),
        "error" => ("Error", "✖", ViewColor::RED),
        "success" => ("Success", "✔", ViewColor::GREEN),
        _ => ("Info", "ℹ", ViewColor::BLUE),
    }
}

/// Prefix every line of rendered block Markdown with `> `.
fn quote_lines(markdown: &str) -> String {
    let mut out = String::new();
    for line in markdown.trim_end_matches('\n').lines() {
        if line.is_empty() {
            out.push_str(">\n");
        } else {
            out.push_str("> ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

fn panel_markdown(node: &Node, ctx: &mut RenderContext<'_>) -> String {
    let (label, _, _) = panel_kind(node);
    let body = ctx.markdown_children(node);
    let mut out = format!("> **{label}:**\n");
    if !body.trim().is_empty() {
        out.push_str(">\n");
        out.push_str(&quote_lines(&body));
    }
    out.push('\n');
    out
}

fn panel_read_view(node: &Node, ctx: &mut RenderContext<'_>) -> ReadViewNode {
    let (label, icon, color) = panel_kind(node);
    let body: Vec<String> = ctx
        .project_lines(node)
        .iter()
        .map(|line| format!("┃ {}", line.content()).trim_end().to_string())
        .collect();

    let mut children = vec![ReadViewNode::styled(
        format!("{icon} {label}\n"),
        ViewStyle::default().fg(color).bold(),
    )];
    if !body.is_empty() {
        children.push(ReadViewNode::styled(
            body.join("\n"),
            ViewStyle::default().fg(color),
        ));
    }
    ReadViewNode::container("", children)
}

fn expand_title(node: &Node) -> &str {
    node.attr_str("title")
        .filter(|title| !title.trim().is_empty())
        .unwrap_or("Details")
}

fn expand_markdown(node: &Node, ctx: &mut RenderContext<'_>) -> String {
    let body = ctx.markdown_children(node);
    format!(
        "<details>\n<summary>{}</summary>\n\n{}\n\n</details>\n\n",
        expand_title(node),
        body.trim_end_matches('\n')
    )
}

fn expand_read_view(node: &Node, ctx: &mut RenderContext<'_>) -> ReadViewNode {
    let body: Vec<String> = ctx
        .project_lines(node)
        .iter()
        .map(|line| format!("  {}", line.content()).trim_end().to_string())
        .collect();

    let mut children = vec![ReadViewNode::styled(
        format!("▾ {}\n", expand_title(node)),
        ViewStyle::default().bold(),
    )];
    if !body.is_empty() {
        children.push(ReadViewNode::text(body.join("\n")));
    }
    ReadViewNode::container("", children)
}

fn media_group_markdown(node: &Node, ctx: &mut RenderContext<'_>) -> String {
    let items: Vec<String> = node
        .children()
        .iter()
        .map(|child| ctx.markdown(child).trim_end().to_string())
        .filter(|item| !item.is_empty())
        .collect();
    if items.is_empty() {
        String::new()
    } else {
        format!("{}\n\n", items.join("\n"))
    }
}

fn media_group_read_view(node: &Node, ctx: &mut RenderContext<'_>) -> ReadViewNode {
    let items = ctx.project_children(node);
    let lines: Vec<String> = items.iter().map(|item| item.content.clone()).collect();
    ReadViewNode::styled(lines.join("\n"), ViewStyle::default().fg(ViewColor::PURPLE).italic())
}

/// Alt text, falling back to the file name and then the media id.
fn media_label(node: &Node) -> &str {
    node.attr_str("alt")
        .or_else(|| node.attr_str("name"))
        .or_else(|| node.attr_str("id"))
        .unwrap_or("media")
}

fn media_markdown(node: &Node, _ctx: &mut RenderContext<'_>) -> String {
    let label = media_label(node);
    match node.attr_str("url") {
        Some(url) => format!("![{label}]({url})"),
        None => format!("![{label}](attachment:{})", node.attr_str("id").unwrap_or_default()),
    }
}

fn media_read_view(node: &Node, _ctx: &mut RenderContext<'_>) -> ReadViewNode {
    ReadViewNode::styled(
        format!("[media: {}]", media_label(node)),
        ViewStyle::default().fg(ViewColor::PURPLE).italic(),
    )
}
