//! Cursor that tracks the active lyric line as playback advances.

use crate::error::{CoreError, Result};
use crate::lrc::{LyricDocument, LyricLine};
use serde::Serialize;
use tracing::debug;

/// Maximum lines stepped over linearly before falling back to a binary search.
///
/// Normal playback moves at most a line or two per update; anything further is
/// treated like a seek.
const FORWARD_SCAN_LIMIT: usize = 8;

/// Result of resolving a playback position against a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ActiveLine<'a> {
    /// Position precedes the first line, or the document is empty
    Inactive,
    /// `line` is the line at `index` in the document
    Active { index: usize, line: &'a LyricLine },
}

impl<'a> ActiveLine<'a> {
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        match self {
            Self::Inactive => None,
            Self::Active { index, .. } => Some(*index),
        }
    }

    #[must_use]
    pub const fn line(&self) -> Option<&'a LyricLine> {
        match self {
            Self::Inactive => None,
            Self::Active { line, .. } => Some(*line),
        }
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }
}

/// Per-document cursor over a borrowed [`LyricDocument`].
///
/// The active index is always the greatest index whose timestamp is at or
/// before the last position passed to [`advance`](Self::advance), or `None`
/// when there is no such line. Access must be serialized by the caller.
#[derive(Debug, Clone)]
pub struct LyricSync<'a> {
    document: &'a LyricDocument,
    active: Option<usize>,
}

impl<'a> LyricSync<'a> {
    /// Create an inactive cursor over `document`
    #[must_use]
    pub const fn new(document: &'a LyricDocument) -> Self {
        Self {
            document,
            active: None,
        }
    }

    /// Rebuild a cursor from a previously observed active index.
    ///
    /// Used by owners that cannot hold the borrow between updates. An index
    /// outside the document is discarded.
    #[must_use]
    pub fn resume(document: &'a LyricDocument, active: Option<usize>) -> Self {
        Self {
            document,
            active: active.filter(|&i| i < document.len()),
        }
    }

    /// Track a different document and reset to inactive
    pub fn attach(&mut self, document: &'a LyricDocument) {
        self.document = document;
        self.active = None;
    }

    #[must_use]
    pub const fn document(&self) -> &'a LyricDocument {
        self.document
    }

    /// Currently active index, `None` while inactive
    #[must_use]
    pub const fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Currently active line without moving the cursor
    #[must_use]
    pub fn current(&self) -> ActiveLine<'a> {
        self.to_active_line(self.active)
    }

    /// Move the cursor to `position_ms` and report the active line.
    ///
    /// Negative positions are clamped to zero. Small forward steps are resolved
    /// by scanning from the cached index; backward jumps and long forward jumps
    /// fall back to a search over the whole document.
    pub fn advance(&mut self, position_ms: i64) -> ActiveLine<'a> {
        let position_ms = clamp_position(position_ms);
        self.active = self.resolve(position_ms);
        self.current()
    }

    /// Timestamp to seek to so that line `index` becomes active.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::OutOfRange`] if `index` is not a line of the
    /// current document. The cursor is left unchanged.
    pub fn seek_target_for(&self, index: usize) -> Result<u64> {
        self.document
            .get(index)
            .map(|line| line.timestamp_ms)
            .ok_or(CoreError::OutOfRange {
                index,
                len: self.document.len(),
            })
    }

    /// Whether line `index` would be active at `position_ms`, without moving
    /// the cursor.
    #[must_use]
    pub fn is_active(&self, index: usize, position_ms: i64) -> bool {
        let position_ms = clamp_position(position_ms);
        let lines = self.document.lines();

        let Some(line) = lines.get(index) else {
            return false;
        };

        line.timestamp_ms <= position_ms
            && lines
                .get(index + 1)
                .is_none_or(|next| next.timestamp_ms > position_ms)
    }

    fn resolve(&self, position_ms: u64) -> Option<usize> {
        let lines = self.document.lines();
        let first = lines.first()?;
        if position_ms < first.timestamp_ms {
            return None;
        }

        let mut index = match self.active {
            Some(i) if lines.get(i).is_some_and(|l| l.timestamp_ms <= position_ms) => i,
            Some(_) => {
                debug!("Position moved backward to {position_ms}ms, searching whole document");
                return self.document.line_index_at(position_ms);
            }
            None => 0,
        };

        for _ in 0..FORWARD_SCAN_LIMIT {
            match lines.get(index + 1) {
                Some(next) if next.timestamp_ms <= position_ms => index += 1,
                _ => return Some(index),
            }
        }

        debug!("Position jumped forward to {position_ms}ms, searching whole document");
        self.document.line_index_at(position_ms)
    }

    fn to_active_line(&self, index: Option<usize>) -> ActiveLine<'a> {
        index
            .and_then(|index| {
                self.document
                    .get(index)
                    .map(|line| ActiveLine::Active { index, line })
            })
            .unwrap_or(ActiveLine::Inactive)
    }
}

fn clamp_position(position_ms: i64) -> u64 {
    u64::try_from(position_ms).unwrap_or_else(|_| {
        debug!("Clamping negative position {position_ms}ms to 0");
        0
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> LyricDocument {
        LyricDocument::from_lines(vec![
            LyricLine::new(0, "a"),
            LyricLine::new(1000, "b"),
            LyricLine::new(3000, "c"),
        ])
    }

    fn long_document() -> LyricDocument {
        let input = r#"
[00:01.00]one
[00:02.50]two
[00:02.50]two again
[00:04.00]three
[00:04.00]three again
[00:04.00]three once more
[00:07.25]four
[00:09.00]five
[00:15.00]six
[00:15.10]seven
[00:16.00]eight
[00:20.00]nine
[00:21.00]ten
[00:22.00]eleven
[00:23.00]twelve
[00:24.00]thirteen
[00:30.00]fourteen
"#;
        LyricDocument::parse(input)
    }

    fn text_at<'a>(sync: &mut LyricSync<'a>, position_ms: i64) -> Option<&'a str> {
        sync.advance(position_ms).line().map(|l| l.text.as_str())
    }

    #[test]
    fn test_resolution() {
        let doc = abc();
        let mut sync = LyricSync::new(&doc);

        assert_eq!(text_at(&mut sync, 500), Some("a"));
        assert_eq!(text_at(&mut sync, 1000), Some("b"));
        assert_eq!(text_at(&mut sync, 2999), Some("b"));
        assert_eq!(text_at(&mut sync, 3000), Some("c"));
        assert_eq!(text_at(&mut sync, 1_000_000), Some("c"));
        assert_eq!(sync.active_index(), Some(2));
    }

    #[test]
    fn test_negative_position_is_clamped() {
        let doc = abc();
        let mut sync = LyricSync::new(&doc);

        assert_eq!(text_at(&mut sync, -5), Some("a"));
        assert_eq!(text_at(&mut sync, i64::MIN), Some("a"));
        assert!(sync.is_active(0, -1));
    }

    #[test]
    fn test_inactive_before_first_line() {
        let doc = LyricDocument::from_lines(vec![
            LyricLine::new(2000, "first"),
            LyricLine::new(4000, "second"),
        ]);
        let mut sync = LyricSync::new(&doc);

        assert_eq!(sync.advance(0), ActiveLine::Inactive);
        assert_eq!(sync.advance(1999), ActiveLine::Inactive);
        assert_eq!(sync.active_index(), None);
        assert_eq!(sync.advance(2000).index(), Some(0));

        // Seeking back before the first line deactivates again
        assert_eq!(sync.advance(100), ActiveLine::Inactive);
        assert_eq!(sync.active_index(), None);
    }

    #[test]
    fn test_first_line_at_zero_is_always_active() {
        let doc = abc();
        let mut sync = LyricSync::new(&doc);
        assert!(sync.advance(0).is_active());
    }

    #[test]
    fn test_empty_document() {
        let doc = LyricDocument::default();
        let mut sync = LyricSync::new(&doc);

        assert_eq!(sync.advance(0), ActiveLine::Inactive);
        assert_eq!(sync.advance(10_000), ActiveLine::Inactive);
        assert!(!sync.is_active(0, 0));
        assert!(matches!(
            sync.seek_target_for(0),
            Err(CoreError::OutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_tie_break_selects_last_line() {
        let doc = LyricDocument::parse("[00:01.00]x\n[00:01.00]y");
        let mut sync = LyricSync::new(&doc);

        assert_eq!(text_at(&mut sync, 1000), Some("y"));
        assert_eq!(sync.active_index(), Some(1));
        assert!(!sync.is_active(0, 1000));
        assert!(sync.is_active(1, 1000));
    }

    #[test]
    fn test_tie_break_after_backward_jump() {
        let doc = long_document();
        let mut sync = LyricSync::new(&doc);

        sync.advance(29_000);
        assert_eq!(text_at(&mut sync, 4000), Some("three once more"));
        assert_eq!(text_at(&mut sync, 2500), Some("two again"));
    }

    #[test]
    fn test_seek_target_round_trip() {
        let doc = long_document();
        let mut sync = LyricSync::new(&doc);

        // Walk forward then backward so both scan paths are exercised
        let forward: Vec<usize> = (0..doc.len()).collect();
        let backward: Vec<usize> = (0..doc.len()).rev().collect();

        for index in forward.into_iter().chain(backward) {
            let target = sync.seek_target_for(index).unwrap();
            let resolved = sync.advance(i64::try_from(target).unwrap()).index().unwrap();

            // Lines sharing a timestamp resolve to the last of them
            assert_eq!(doc.lines()[resolved].timestamp_ms, target);
            assert_eq!(resolved, doc.line_index_at(target).unwrap());
        }
    }

    #[test]
    fn test_seek_target_round_trip_distinct_timestamps() {
        let doc = abc();
        let mut sync = LyricSync::new(&doc);

        for index in [2, 0, 1, 2, 1, 0] {
            let target = sync.seek_target_for(index).unwrap();
            assert_eq!(
                sync.advance(i64::try_from(target).unwrap()).index(),
                Some(index)
            );
        }
    }

    #[test]
    fn test_seek_target_out_of_range_leaves_state() {
        let doc = abc();
        let mut sync = LyricSync::new(&doc);
        sync.advance(1500);

        let err = sync.seek_target_for(3).unwrap_err();
        assert!(matches!(err, CoreError::OutOfRange { index: 3, len: 3 }));
        assert_eq!(sync.active_index(), Some(1));
        assert_eq!(sync.seek_target_for(2).unwrap(), 3000);
    }

    #[test]
    fn test_is_active_does_not_move_cursor() {
        let doc = abc();
        let mut sync = LyricSync::new(&doc);
        sync.advance(500);

        assert!(sync.is_active(2, 5000));
        assert!(!sync.is_active(1, 5000));
        assert!(sync.is_active(1, 1000));
        assert!(!sync.is_active(1, 999));
        assert!(!sync.is_active(3, 5000));
        assert_eq!(sync.active_index(), Some(0));
    }

    #[test]
    fn test_is_active_matches_advance() {
        let doc = long_document();
        let mut sync = LyricSync::new(&doc);

        for position in (0..32_000).step_by(250) {
            let active = sync.advance(position).index();
            for index in 0..doc.len() {
                assert_eq!(sync.is_active(index, position), active == Some(index));
            }
        }
    }

    #[test]
    fn test_forward_scan_matches_full_search() {
        let doc = long_document();

        let sequences: Vec<Vec<i64>> = vec![
            (0..35_000).step_by(17).collect(),
            (0..35_000).step_by(1000).collect(),
            vec![0, 0, 999, 1000, 1000, 2500, 2500, 3999, 4000, 30_000, 30_000],
            vec![0, 29_999, 30_000, 40_000],
            vec![4000, 4000, 4001, 7250, 8999, 9000, 14_999, 15_000, 15_099, 15_100],
        ];

        for positions in sequences {
            let mut sync = LyricSync::new(&doc);
            for position in positions {
                let expected = doc.line_index_at(u64::try_from(position).unwrap());
                assert_eq!(sync.advance(position).index(), expected, "at {position}ms");
            }
        }
    }

    #[test]
    fn test_arbitrary_jumps_match_full_search() {
        let doc = long_document();
        let mut sync = LyricSync::new(&doc);

        let positions = [
            16_000, 500, 30_000, 2500, 2499, 21_500, 21_500, 0, 9000, 8999, 100_000, 4000,
        ];
        for position in positions {
            let expected = doc.line_index_at(position);
            assert_eq!(
                sync.advance(i64::try_from(position).unwrap()).index(),
                expected,
                "at {position}ms"
            );
        }
    }

    #[test]
    fn test_attach_resets_to_inactive() {
        let first = abc();
        let second = LyricDocument::parse("[00:10.00]later");
        let mut sync = LyricSync::new(&first);

        sync.advance(3500);
        assert_eq!(sync.active_index(), Some(2));

        sync.attach(&second);
        assert_eq!(sync.active_index(), None);
        assert_eq!(sync.current(), ActiveLine::Inactive);
        assert_eq!(sync.advance(3500), ActiveLine::Inactive);
        assert_eq!(text_at(&mut sync, 10_000), Some("later"));
    }

    #[test]
    fn test_resume_discards_stale_index() {
        let doc = abc();
        assert_eq!(LyricSync::resume(&doc, Some(7)).active_index(), None);

        let mut sync = LyricSync::resume(&doc, Some(1));
        assert_eq!(sync.current().index(), Some(1));
        assert_eq!(text_at(&mut sync, 3000), Some("c"));
    }
}
