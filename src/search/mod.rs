//! Search over display lines.
//!
//! Matching is a case-insensitive substring test over the full lowercase
//! form of each character. Results are indices into the flattened line
//! sequence, the same numbering the view scrolls by.

use std::ops::Range;

use crate::readview::DisplayLine;

/// Indices of every line containing `query`. An empty query matches nothing.
pub fn find_matches(lines: &[DisplayLine], query: &str) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !match_spans(line.content(), query).is_empty())
        .map(|(index, _)| index)
        .collect()
}

/// Character column ranges of `line` that match `query`, for highlighting.
/// Overlapping occurrences are all reported.
pub fn match_spans(line: &str, query: &str) -> Vec<Range<usize>> {
    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return Vec::new();
    }
    // Each lowercase char paired with the column of the char it came from.
    let folded: Vec<(char, usize)> = line
        .chars()
        .enumerate()
        .flat_map(|(column, c)| c.to_lowercase().map(move |lower| (lower, column)))
        .collect();

    let mut spans: Vec<Range<usize>> = Vec::new();
    for window in folded.windows(needle.len()) {
        if !window.iter().map(|&(c, _)| c).eq(needle.iter().copied()) {
            continue;
        }
        let (Some(&(_, start)), Some(&(_, last))) = (window.first(), window.last()) else {
            continue;
        };
        if spans.last().is_none_or(|span| span.start != start) {
            spans.push(start..last + 1);
        }
    }
    spans
}

/// Next match after `current`, wrapping around to the first.
pub fn next_match(matches: &[usize], current: usize) -> Option<usize> {
    matches
        .iter()
        .copied()
        .find(|&line| line > current)
        .or_else(|| matches.first().copied())
}

/// Previous match before `current`, wrapping around to the last.
pub fn previous_match(matches: &[usize], current: usize) -> Option<usize> {
    matches
        .iter()
        .rev()
        .copied()
        .find(|&line| line < current)
        .or_else(|| matches.last().copied())
}
