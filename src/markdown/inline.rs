//! Inline Markdown to ADF inline nodes.
//!
//! A fixed cascade of matchers is tried against the remaining text. The
//! first matcher that finds something wins, even when a lower priority
//! construct starts earlier; the text in front of the match is parsed again
//! with the full cascade, the matched node is emitted and scanning resumes
//! after it. Unterminated delimiters never match and stay literal.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::adf::{Mark, Node, mark_types, node_types};

static CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").expect("valid code regex"));
static BOLD_ITALIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*\*(.+?)\*\*\*|___(.+?)___").expect("valid bold italic regex")
});
static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*|__(.+?)__").expect("valid bold regex"));
static STRIKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"~~(.+?)~~").expect("valid strike regex"));
static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").expect("valid link regex"));
static HARD_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}\n").expect("valid break regex"));

/// A construct found in a span of inline text.
struct InlineMatch<'t> {
    before: &'t str,
    node: Node,
    after: &'t str,
}

type Matcher = fn(&str) -> Option<InlineMatch<'_>>;

/// Priority order of the inline constructs.
const CASCADE: [Matcher; 7] = [
    match_code,
    match_bold_italic,
    match_bold,
    match_italic,
    match_strike,
    match_link,
    match_hard_break,
];

/// Parse inline Markdown into text and hard break nodes.
pub fn parse_inline(text: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    parse_into(text, &mut nodes);
    nodes
}

fn parse_into(text: &str, nodes: &mut Vec<Node>) {
    let mut rest = text;
    while !rest.is_empty() {
        let Some(found) = CASCADE.iter().find_map(|matcher| matcher(rest)) else {
            nodes.push(Node::text(rest));
            return;
        };
        if !found.before.is_empty() {
            parse_into(found.before, nodes);
        }
        nodes.push(found.node);
        rest = found.after;
    }
}

fn split_at<'t>(
    text: &'t str,
    caps: &Captures<'t>,
    node: Node,
) -> Option<InlineMatch<'t>> {
    let whole = caps.get(0)?;
    Some(InlineMatch {
        before: &text[..whole.start()],
        node,
        after: &text[whole.end()..],
    })
}

/// Text of the first participating capture group.
fn inner<'t>(caps: &Captures<'t>) -> Option<&'t str> {
    caps.iter().skip(1).flatten().next().map(|m| m.as_str())
}

fn marked(text: &str, marks: &[&str]) -> Node {
    Node::text(text).with_marks(marks.iter().map(|m| Mark::new(*m)).collect())
}

fn match_code(text: &str) -> Option<InlineMatch<'_>> {
    let caps = CODE.captures(text)?;
    let node = marked(inner(&caps)?, &[mark_types::CODE]);
    split_at(text, &caps, node)
}

fn match_bold_italic(text: &str) -> Option<InlineMatch<'_>> {
    let caps = BOLD_ITALIC.captures(text)?;
    let node = marked(inner(&caps)?, &[mark_types::STRONG, mark_types::EM]);
    split_at(text, &caps, node)
}

fn match_bold(text: &str) -> Option<InlineMatch<'_>> {
    let caps = BOLD.captures(text)?;
    let node = marked(inner(&caps)?, &[mark_types::STRONG]);
    split_at(text, &caps, node)
}

fn match_strike(text: &str) -> Option<InlineMatch<'_>> {
    let caps = STRIKE.captures(text)?;
    let node = marked(inner(&caps)?, &[mark_types::STRIKE]);
    split_at(text, &caps, node)
}

fn match_link(text: &str) -> Option<InlineMatch<'_>> {
    let caps = LINK.captures(text)?;
    let label = caps.get(1)?.as_str();
    let href = caps.get(2)?.as_str();
    let node = Node::text(label).with_marks(vec![Mark::link(href)]);
    split_at(text, &caps, node)
}

fn match_hard_break(text: &str) -> Option<InlineMatch<'_>> {
    let caps = HARD_BREAK.captures(text)?;
    split_at(text, &caps, Node::new(node_types::HARD_BREAK))
}

/// Single `*` or `_` emphasis. A delimiter only counts when it is not part
/// of a doubled run, so `**` never opens or closes italics.
fn match_italic(text: &str) -> Option<InlineMatch<'_>> {
    let star = find_single_delimited(text, b'*');
    let underscore = find_single_delimited(text, b'_');
    let (open, close) = match (star, underscore) {
        (Some(a), Some(b)) => {
            if a.0 <= b.0 {
                a
            } else {
                b
            }
        }
        (a, b) => a.or(b)?,
    };
    Some(InlineMatch {
        before: &text[..open],
        node: marked(&text[open + 1..close], &[mark_types::EM]),
        after: &text[close + 1..],
    })
}

/// Byte offsets of the leftmost opening delimiter and its nearest closing
/// partner, both single, with at least one byte between and no newline.
fn find_single_delimited(text: &str, delim: u8) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let is_single = |i: usize| {
        bytes[i] == delim
            && (i == 0 || bytes[i - 1] != delim)
            && bytes.get(i + 1) != Some(&delim)
    };

    for open in (0..bytes.len()).filter(|&i| is_single(i)) {
        let mut close = open + 1;
        while close < bytes.len() && bytes[close] != b'\n' {
            if close > open + 1 && is_single(close) {
                return Some((open, close));
            }
            close += 1;
        }
    }
    None
}
