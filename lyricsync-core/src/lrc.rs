//! Parsing of LRC-style lyric text into a time-ordered [`LyricDocument`].
//!
//! Each caption line carries a `[MM:SS.FF]` or `[MM:SS.FFF]` timestamp followed
//! by its text. Shorter fractions are right-padded to milliseconds. Anything
//! that does not carry such a timestamp (blank lines, ID tags like
//! `[ar:Artist]`, free text) is skipped without failing the parse.

use serde::Serialize;
use std::ops::Range;
use tracing::debug;

/// A single timed caption
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LyricLine {
    /// Milliseconds from document start
    pub timestamp_ms: u64,
    pub text: String,
}

impl LyricLine {
    /// Create a new lyric line
    #[must_use]
    pub fn new(timestamp_ms: u64, text: impl Into<String>) -> Self {
        Self {
            timestamp_ms,
            text: text.into(),
        }
    }
}

/// Time-ordered sequence of lyric lines.
///
/// Lines are kept in non-decreasing timestamp order. Lines sharing a timestamp
/// keep the order in which they were supplied. A document never changes after
/// construction; loading new lyrics means building a new document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LyricDocument {
    lines: Vec<LyricLine>,
}

impl LyricDocument {
    /// Parse LRC-style text. Never fails; see [`parse`].
    #[must_use]
    pub fn parse(input: &str) -> Self {
        parse(input)
    }

    /// Build a document from lines in any order.
    ///
    /// Lines are stably sorted by timestamp.
    #[must_use]
    pub fn from_lines(mut lines: Vec<LyricLine>) -> Self {
        // `sort_by_key` is stable
        lines.sort_by_key(|line| line.timestamp_ms);
        Self { lines }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the line at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LyricLine> {
        self.lines.get(index)
    }

    /// All lines in timestamp order
    #[must_use]
    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LyricLine> {
        self.lines.iter()
    }

    /// Timestamp of the last line, if any
    #[must_use]
    pub fn last_timestamp_ms(&self) -> Option<u64> {
        self.lines.last().map(|line| line.timestamp_ms)
    }

    /// Find the index of the line active at `position_ms` by searching the whole
    /// document.
    ///
    /// Returns the greatest index whose timestamp is at or before the position,
    /// so among lines sharing a timestamp the last one wins. `None` when the
    /// position precedes the first line or the document is empty.
    #[must_use]
    pub fn line_index_at(&self, position_ms: u64) -> Option<usize> {
        self.lines
            .partition_point(|line| line.timestamp_ms <= position_ms)
            .checked_sub(1)
    }

    /// Find the line active at `position_ms`
    #[must_use]
    pub fn line_at(&self, position_ms: u64) -> Option<&LyricLine> {
        self.line_index_at(position_ms).and_then(|i| self.lines.get(i))
    }

    /// Get lines around `index` for display.
    ///
    /// With no index (nothing active yet) the window is anchored at the first line.
    #[must_use]
    pub fn visible_lines(
        &self,
        index: Option<usize>,
        before: usize,
        after: usize,
    ) -> &[LyricLine] {
        &self.lines[self.visible_range(index, before, after)]
    }

    /// Index range covered by [`visible_lines`](Self::visible_lines)
    #[must_use]
    pub fn visible_range(
        &self,
        index: Option<usize>,
        before: usize,
        after: usize,
    ) -> Range<usize> {
        let Some(last) = self.lines.len().checked_sub(1) else {
            return 0..0;
        };

        let current_idx = index.unwrap_or(0).min(last);
        let start = current_idx.saturating_sub(before);
        let end = current_idx
            .saturating_add(after)
            .saturating_add(1)
            .min(self.lines.len());

        start..end
    }

    /// Caption text of every line joined with newlines
    #[must_use]
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a LyricDocument {
    type Item = &'a LyricLine;
    type IntoIter = std::slice::Iter<'a, LyricLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// Parse LRC-style text into a [`LyricDocument`].
///
/// Lines without a timestamp, or whose text is blank after trimming, are
/// dropped individually. Empty or entirely malformed input yields an empty
/// document. Out-of-order timestamps are sorted; equal timestamps keep file
/// order.
#[must_use]
pub fn parse(input: &str) -> LyricDocument {
    let mut lines = Vec::new();
    let mut skipped = 0_usize;

    for raw in input.lines() {
        if raw.trim().is_empty() {
            continue;
        }

        match parse_line(raw) {
            Some(line) => lines.push(line),
            None => skipped += 1,
        }
    }

    debug!(
        "Parsed {} lyric line(s), skipped {} malformed or empty line(s)",
        lines.len(),
        skipped
    );

    LyricDocument::from_lines(lines)
}

/// Parse a line like `[01:02.34]Hello world`.
///
/// The first bracket that opens a valid timestamp is used; the text is
/// everything after its closing bracket.
fn parse_line(line: &str) -> Option<LyricLine> {
    let (timestamp_ms, text) = line
        .match_indices('[')
        .find_map(|(start, _)| parse_timestamp(&line[start + 1..]))?;

    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    Some(LyricLine::new(timestamp_ms, text))
}

/// Parse `MM:SS.F]` through `MM:SS.FFF]` (the opening bracket already consumed).
///
/// Returns the timestamp in milliseconds and the remainder after `]`.
fn parse_timestamp(s: &str) -> Option<(u64, &str)> {
    let (minutes, rest) = split_digits(s)?;
    let rest = rest.strip_prefix(':')?;

    let (seconds, rest) = split_digits(rest)?;
    if seconds.len() != 2 {
        return None;
    }
    let rest = rest.strip_prefix('.')?;

    let (fraction, rest) = split_digits(rest)?;
    // Right-padded to milliseconds: "4" is 400ms, "12" is 120ms
    let fraction_ms: u64 = match fraction.len() {
        1 => fraction.parse::<u64>().ok()? * 100,
        2 => fraction.parse::<u64>().ok()? * 10,
        3 => fraction.parse().ok()?,
        _ => return None,
    };
    let rest = rest.strip_prefix(']')?;

    let minutes: u64 = minutes.parse().ok()?;
    let seconds: u64 = seconds.parse().ok()?;

    let timestamp_ms = minutes
        .checked_mul(60_000)?
        .checked_add(seconds * 1000)?
        .checked_add(fraction_ms)?;

    Some((timestamp_ms, rest))
}

/// Split a leading run of one or more ASCII digits off `s`
fn split_digits(s: &str) -> Option<(&str, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    Some(s.split_at(end))
}
