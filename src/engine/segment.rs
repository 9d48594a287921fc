//! Segment navigation over a passage.
//!
//! A segment is a maximal run of content characters bounded by separators or
//! the passage ends. Choice modes use the answerable-position searches to move
//! the cursor; free mode walks whole segments.

use crate::engine::classify::{is_content, is_separator};
use crate::engine::mask::is_protected;

/// First hidden, answerable position at or after `start`.
pub fn find_next_answerable(
    passage: &[char],
    mask: &[Option<char>],
    start: usize,
    snapshot: Option<&[Option<char>]>,
) -> Option<usize> {
    (start..passage.len().min(mask.len()))
        .find(|&i| is_content(passage[i]) && mask[i].is_none() && !is_protected(snapshot, i))
}

/// Nearest revealed, answerable position strictly before `before`.
pub fn find_prev_answered(
    passage: &[char],
    mask: &[Option<char>],
    before: usize,
    snapshot: Option<&[Option<char>]>,
) -> Option<usize> {
    let end = before.min(passage.len()).min(mask.len());
    (0..end)
        .rev()
        .find(|&i| is_content(passage[i]) && mask[i].is_some() && !is_protected(snapshot, i))
}

/// Hidden answerable position strictly before `before`, used to step a tap
/// target backwards.
pub fn find_prev_answerable(
    passage: &[char],
    mask: &[Option<char>],
    before: usize,
    snapshot: Option<&[Option<char>]>,
) -> Option<usize> {
    let end = before.min(passage.len()).min(mask.len());
    (0..end)
        .rev()
        .find(|&i| is_content(passage[i]) && mask[i].is_none() && !is_protected(snapshot, i))
}

/// `(start, end)` of the segment around `anchor`: `start` is the first content
/// position after the previous separator, `end` the index of the next separator
/// (or the passage length). A separator anchor belongs to the segment it ends.
pub fn segment_bounds(passage: &[char], anchor: usize) -> (usize, usize) {
    let len = passage.len();
    if anchor >= len {
        return (len, len);
    }
    let mut start = anchor;
    while start > 0 && !is_separator(passage[start - 1]) {
        start -= 1;
    }
    let mut end = anchor;
    while end < len && !is_separator(passage[end]) {
        end += 1;
    }
    (start, end)
}

/// First content position at or after `from`, or the passage length.
pub fn skip_separators(passage: &[char], from: usize) -> usize {
    let mut i = from;
    while i < passage.len() && is_separator(passage[i]) {
        i += 1;
    }
    i
}

/// Start of the segment following the one that contains `from`, skipping any
/// run of separators in between. Returns the passage length past the last one.
pub fn next_segment_start(passage: &[char], from: usize) -> usize {
    let mut i = from;
    while i < passage.len() && !is_separator(passage[i]) {
        i += 1;
    }
    skip_separators(passage, i)
}

/// Start of the segment before the one beginning at `start`, if any.
pub fn prev_segment_start(passage: &[char], start: usize) -> Option<usize> {
    let mut i = start.min(passage.len());
    while i > 0 && is_separator(passage[i - 1]) {
        i -= 1;
    }
    if i == 0 {
        return None;
    }
    Some(segment_bounds(passage, i - 1).0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_segment_bounds_first_and_second_clause() {
        let p = chars("学而时习之，不亦说乎？");
        assert_eq!(segment_bounds(&p, 0), (0, 5));
        assert_eq!(segment_bounds(&p, 3), (0, 5));
        assert_eq!(segment_bounds(&p, 6), (6, 10));
        assert_eq!(segment_bounds(&p, 9), (6, 10));
    }

    #[test]
    fn test_segment_bounds_separator_anchor_and_out_of_range() {
        let p = chars("学而，不亦");
        assert_eq!(segment_bounds(&p, 2), (0, 2));
        assert_eq!(segment_bounds(&p, 99), (5, 5));
        assert_eq!(segment_bounds(&[], 0), (0, 0));
    }

    #[test]
    fn test_find_next_answerable_skips_revealed_and_separators() {
        let p = chars("学而，不亦");
        let mask = vec![Some('学'), None, Some('，'), None, None];
        assert_eq!(find_next_answerable(&p, &mask, 0, None), Some(1));
        assert_eq!(find_next_answerable(&p, &mask, 2, None), Some(3));
        assert_eq!(find_next_answerable(&p, &mask, 5, None), None);
    }

    #[test]
    fn test_find_next_answerable_respects_snapshot() {
        let p = chars("学而时");
        let mask = vec![None, None, None];
        let snapshot = vec![None, Some('而'), None];
        // Hidden in the live mask but pre-revealed in the snapshot.
        assert_eq!(find_next_answerable(&p, &mask, 1, Some(&snapshot)), Some(2));
    }

    #[test]
    fn test_find_prev_answered() {
        let p = chars("学而，不亦");
        let mask = vec![Some('学'), Some('而'), Some('，'), None, None];
        assert_eq!(find_prev_answered(&p, &mask, 3, None), Some(1));
        assert_eq!(find_prev_answered(&p, &mask, 1, None), Some(0));
        assert_eq!(find_prev_answered(&p, &mask, 0, None), None);
        let snapshot = vec![None, Some('而'), Some('，'), None, None];
        assert_eq!(find_prev_answered(&p, &mask, 3, Some(&snapshot)), Some(0));
    }

    #[test]
    fn test_find_prev_answerable() {
        let p = chars("学而，不亦");
        let mask = vec![None, Some('而'), Some('，'), None, None];
        assert_eq!(find_prev_answerable(&p, &mask, 4, None), Some(3));
        assert_eq!(find_prev_answerable(&p, &mask, 3, None), Some(0));
        assert_eq!(find_prev_answerable(&p, &mask, 0, None), None);
    }

    #[test]
    fn test_next_segment_start_skips_separator_runs() {
        let p = chars("学而。”不亦");
        assert_eq!(next_segment_start(&p, 0), 4);
        assert_eq!(next_segment_start(&p, 4), 6);
        assert_eq!(skip_separators(&p, 2), 4);
    }

    #[test]
    fn test_prev_segment_start() {
        let p = chars("学而时习之，不亦说乎？");
        assert_eq!(prev_segment_start(&p, 6), Some(0));
        assert_eq!(prev_segment_start(&p, 11), Some(6));
        assert_eq!(prev_segment_start(&p, 0), None);
        let leading = chars("“学而");
        assert_eq!(prev_segment_start(&leading, 1), None);
    }
}
