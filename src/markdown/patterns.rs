//! Line classification shared by the block parsers.
//!
//! Each block handler asks these whether the cursor line starts its
//! construct; the paragraph parser asks `starts_block` where to stop.

use once_cell::sync::Lazy;
use regex::Regex;

static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,6})(?:\s+(.*))?$").expect("valid heading regex"));
static RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:-{3,}|\*{3,}|_{3,})\s*$").expect("valid rule regex"));
static TASK_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*)[-*+]\s+\[([ xX])\](?:\s+(.*))?$").expect("valid task regex")
});
static BULLET_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)[-*+]\s+(.*)$").expect("valid bullet regex"));
static ORDERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)(\d{1,9})[.)]\s+(.*)$").expect("valid ordered regex"));
static TABLE_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\|.*\|\s*$").expect("valid table row regex"));
static TABLE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\|?[\s:|-]*-[\s:|-]*$").expect("valid separator regex"));

/// A list line split into its indentation and item text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLine<'a> {
    pub indent: usize,
    pub text: &'a str,
}

/// Width of leading whitespace; a tab counts as four columns.
pub fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Drop up to `width` columns of leading whitespace.
pub fn strip_indent(line: &str, width: usize) -> &str {
    let mut columns = 0;
    for (index, c) in line.char_indices() {
        if columns >= width || !(c == ' ' || c == '\t') {
            return &line[index..];
        }
        columns += if c == '\t' { 4 } else { 1 };
    }
    ""
}

/// Append a continuation line to inline text. The line break becomes a
/// space unless the text ends in two spaces, which marks a hard break.
pub fn join_line(text: &mut String, line: &str) {
    if text.ends_with("  ") {
        text.push('\n');
    } else {
        text.truncate(text.trim_end().len());
        text.push(' ');
    }
    text.push_str(line.trim_start());
}

pub fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

/// Language tag of an opening fence.
pub fn fence_language(line: &str) -> &str {
    line.trim_start()
        .strip_prefix("```")
        .map_or("", str::trim)
}

/// Heading level and text.
pub fn heading(line: &str) -> Option<(u8, &str)> {
    let caps = HEADING.captures(line)?;
    let level = u8::try_from(caps.get(1)?.as_str().len()).ok()?;
    let text = caps.get(2).map_or("", |m| m.as_str().trim());
    Some((level, text))
}

pub fn is_rule(line: &str) -> bool {
    RULE.is_match(line)
}

pub fn is_blockquote(line: &str) -> bool {
    line.starts_with("> ") || line == ">"
}

/// Content of a quoted line, `None` if the line is not quoted.
pub fn strip_blockquote(line: &str) -> Option<&str> {
    if line == ">" {
        Some("")
    } else {
        line.strip_prefix("> ")
    }
}

/// Task item and whether it is checked.
pub fn task_item(line: &str) -> Option<(ListLine<'_>, bool)> {
    let caps = TASK_ITEM.captures(line)?;
    let indent = indent_width(caps.get(1)?.as_str());
    let checked = caps.get(2)?.as_str().eq_ignore_ascii_case("x");
    let text = caps.get(3).map_or("", |m| m.as_str());
    Some((ListLine { indent, text }, checked))
}

pub fn bullet_item(line: &str) -> Option<ListLine<'_>> {
    let caps = BULLET_ITEM.captures(line)?;
    Some(ListLine {
        indent: indent_width(caps.get(1)?.as_str()),
        text: caps.get(2)?.as_str(),
    })
}

/// Ordered item and its number.
pub fn ordered_item(line: &str) -> Option<(ListLine<'_>, u64)> {
    let caps = ORDERED_ITEM.captures(line)?;
    let number = caps.get(2)?.as_str().parse().ok()?;
    Some((
        ListLine {
            indent: indent_width(caps.get(1)?.as_str()),
            text: caps.get(3)?.as_str(),
        },
        number,
    ))
}

pub fn is_list_line(line: &str) -> bool {
    BULLET_ITEM.is_match(line) || ORDERED_ITEM.is_match(line)
}

pub fn is_table_row(line: &str) -> bool {
    TABLE_ROW.is_match(line)
}

/// Header separator such as `|---|:--:|`.
pub fn is_table_separator(line: &str) -> bool {
    line.contains('|') && TABLE_SEPARATOR.is_match(line)
}

/// Split a table row into trimmed cell texts. `\|` is a literal pipe.
pub fn table_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = inner.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(ch),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

/// Whether a line begins some block construct other than a paragraph.
pub fn starts_block(line: &str) -> bool {
    is_fence(line)
        || heading(line).is_some()
        || line.starts_with('>')
        || is_rule(line)
        || TASK_ITEM.is_match(line)
        || is_list_line(line)
        || is_table_row(line)
}
