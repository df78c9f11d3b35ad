//! Inline handlers: text with marks, hard breaks, and the inline atoms
//! (status lozenges, emoji, mentions and dates).

use chrono::{DateTime, Utc};

use crate::adf::{Node, mark_types, node_types};
use crate::readview::{ReadViewNode, ViewColor, ViewStyle};
use crate::registry::{Handler, RenderContext};

pub(super) fn handlers() -> Vec<Handler> {
    vec![
        Handler::new(node_types::TEXT, text_markdown, text_read_view).with_can_render(has_text),
        Handler::new(node_types::HARD_BREAK, hard_break_markdown, hard_break_read_view),
        Handler::new(node_types::STATUS, status_markdown, status_read_view),
        Handler::new(node_types::EMOJI, emoji_markdown, emoji_read_view),
        Handler::new(node_types::MENTION, mention_markdown, mention_read_view),
        Handler::new(node_types::DATE, date_markdown, date_read_view),
    ]
}

const fn has_text(node: &Node) -> bool {
    node.text.is_some()
}

// text

/// Wrap the text in each mark's delimiters, first mark innermost.
fn text_markdown(node: &Node, ctx: &mut RenderContext<'_>) -> String {
    let text = node.text_str();
    if ctx.in_code_block {
        return text.to_string();
    }
    node.marks()
        .iter()
        .fold(text.to_string(), |inner, mark| match mark.mark_type.as_str() {
            mark_types::STRONG => format!("**{inner}**"),
            mark_types::EM => format!("*{inner}*"),
            mark_types::CODE => format!("`{inner}`"),
            mark_types::STRIKE => format!("~~{inner}~~"),
            mark_types::UNDERLINE => format!("<u>{inner}</u>"),
            mark_types::LINK => format!("[{inner}]({})", mark.href().unwrap_or_default()),
            _ => inner,
        })
}

fn mark_style(node: &Node) -> Option<ViewStyle> {
    let mut style = ViewStyle::default();
    for mark in node.marks() {
        style = match mark.mark_type.as_str() {
            mark_types::STRONG => style.bold(),
            mark_types::EM => style.italic(),
            mark_types::CODE => style.fg(ViewColor::RED),
            mark_types::STRIKE => style.strikethrough(),
            mark_types::UNDERLINE => style.underline(),
            mark_types::LINK => style.fg(ViewColor::BLUE).underline(),
            _ => style,
        };
    }
    (style != ViewStyle::default()).then_some(style)
}

fn text_read_view(node: &Node, ctx: &mut RenderContext<'_>) -> ReadViewNode {
    let view = ReadViewNode::text(node.text_str());
    match mark_style(node) {
        Some(style) if !ctx.in_code_block => view.with_style(style),
        _ => view,
    }
}

// hard break

fn hard_break_markdown(_node: &Node, _ctx: &mut RenderContext<'_>) -> String {
    "  \n".to_string()
}

fn hard_break_read_view(_node: &Node, _ctx: &mut RenderContext<'_>) -> ReadViewNode {
    ReadViewNode::text("\n")
}

// status

fn status_text(node: &Node) -> String {
    node.attr_str("text").unwrap_or_default().to_uppercase()
}

fn status_markdown(node: &Node, _ctx: &mut RenderContext<'_>) -> String {
    format!("[{}]", status_text(node))
}

fn status_color(node: &Node) -> ViewColor {
    match node.attr_str("color").unwrap_or("neutral") {
        "purple" => ViewColor::PURPLE,
        "blue" => ViewColor::BLUE,
        "red" => ViewColor::RED,
        "yellow" => ViewColor::YELLOW,
        "green" => ViewColor::GREEN,
        _ => ViewColor::GRAY,
    }
}

fn status_read_view(node: &Node, _ctx: &mut RenderContext<'_>) -> ReadViewNode {
    ReadViewNode::styled(
        format!("[{}]", status_text(node)),
        ViewStyle::default().fg(status_color(node)).bold(),
    )
}

// emoji

/// The emoji character if known, otherwise its `:short:` name.
fn emoji_text(node: &Node) -> &str {
    node.attr_str("text")
        .filter(|text| !text.is_empty())
        .or_else(|| node.attr_str("shortName"))
        .unwrap_or_default()
}

fn emoji_markdown(node: &Node, _ctx: &mut RenderContext<'_>) -> String {
    emoji_text(node).to_string()
}

fn emoji_read_view(node: &Node, _ctx: &mut RenderContext<'_>) -> ReadViewNode {
    ReadViewNode::text(emoji_text(node))
}

// mention

fn mention_text(node: &Node) -> String {
    let name = node
        .attr_str("text")
        .map(|text| text.trim_start_matches('@'))
        .filter(|text| !text.is_empty())
        .or_else(|| node.attr_str("id"))
        .unwrap_or("unknown");
    format!("@{name}")
}

fn mention_markdown(node: &Node, _ctx: &mut RenderContext<'_>) -> String {
    mention_text(node)
}

fn mention_read_view(node: &Node, _ctx: &mut RenderContext<'_>) -> ReadViewNode {
    ReadViewNode::styled(mention_text(node), ViewStyle::default().fg(ViewColor::BLUE).bold())
}

// date

/// `attrs.timestamp` (milliseconds since the epoch) as `YYYY-MM-DD`.
/// Unreadable timestamps are shown as stored.
fn date_text(node: &Node) -> String {
    let formatted = node
        .attr_u64("timestamp")
        .and_then(|millis| i64::try_from(millis).ok())
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|date| date.format("%Y-%m-%d").to_string());
    formatted.unwrap_or_else(|| match node.attr("timestamp") {
        Some(value) => value.as_str().map_or_else(|| value.to_string(), ToString::to_string),
        None => String::new(),
    })
}

fn date_markdown(node: &Node, _ctx: &mut RenderContext<'_>) -> String {
    date_text(node)
}

fn date_read_view(node: &Node, _ctx: &mut RenderContext<'_>) -> ReadViewNode {
    ReadViewNode::styled(date_text(node), ViewStyle::default().fg(ViewColor::TEAL))
}
