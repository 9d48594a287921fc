use crate::engine::classify::{content_len, is_content};
use crate::engine::mask::{MaskBuffer, hidden_mask};
use crate::engine::segment::{next_segment_start, prev_segment_start, segment_bounds, skip_separators};

/// Live feedback for one character of the typed buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypedStatus {
    Correct,
    Incorrect,
    /// Past the end of the current segment.
    Neutral,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentCheck {
    /// The segment is not finished; `mismatch` is the first wrong position.
    Partial { mismatch: Option<usize> },
    /// Every content position matched; the segment start moved to `next_start`.
    Matched { next_start: usize },
    /// Nothing left to type.
    Finished,
}

/// State for free mode: type each segment in full; the segment start only
/// advances once every character of the segment is right.
#[derive(Clone, Debug)]
pub struct FreeSession {
    pub mask: MaskBuffer,
    pub segment_start: usize,
    pub typed: String,
}

impl FreeSession {
    pub fn new(passage: &[char]) -> Self {
        Self {
            mask: hidden_mask(passage),
            segment_start: skip_separators(passage, 0),
            typed: String::new(),
        }
    }

    /// `[first content, terminating separator)` of the segment being typed.
    fn current_segment(&self, passage: &[char]) -> Option<(usize, usize)> {
        let first = skip_separators(passage, self.segment_start);
        (first < passage.len()).then(|| (first, segment_bounds(passage, first).1))
    }

    /// Compare `input` against the current segment and update the mask.
    /// Called once the typed buffer has been quiet for the debounce period.
    pub fn validate(&mut self, passage: &[char], input: &str) -> SegmentCheck {
        let Some((first, end)) = self.current_segment(passage) else {
            return SegmentCheck::Finished;
        };

        // Separators only ever sit in the prefix before `first`.
        for i in self.segment_start..first {
            self.mask[i] = Some(passage[i]);
        }

        let mut pos = first;
        let mut mismatch = None;
        for ch in input.chars() {
            if pos >= end {
                break;
            }
            if ch == passage[pos] {
                self.mask[pos] = Some(ch);
            } else {
                self.mask[pos] = None;
                mismatch = Some(pos);
                pos += 1;
                break;
            }
            pos += 1;
        }

        for i in pos..end {
            if is_content(passage[i]) {
                self.mask[i] = None;
            }
        }

        if mismatch.is_none() && pos >= end {
            self.typed.clear();
            self.segment_start = next_segment_start(passage, first);
            SegmentCheck::Matched {
                next_start: self.segment_start,
            }
        } else {
            SegmentCheck::Partial { mismatch }
        }
    }

    /// Per-character status of `input` against the current segment.
    pub fn typed_statuses(&self, passage: &[char], input: &str) -> Vec<TypedStatus> {
        let Some((first, end)) = self.current_segment(passage) else {
            return vec![TypedStatus::Neutral; input.chars().count()];
        };
        let mut pos = first;
        input
            .chars()
            .map(|ch| {
                if pos >= end {
                    return TypedStatus::Neutral;
                }
                let status = if ch == passage[pos] {
                    TypedStatus::Correct
                } else {
                    TypedStatus::Incorrect
                };
                pos += 1;
                status
            })
            .collect()
    }

    /// Hide the nearest revealed content position before the segment start.
    /// The segment start itself stays put.
    pub fn undo_char(&mut self, passage: &[char]) -> bool {
        let before = self.segment_start.min(passage.len());
        match (0..before)
            .rev()
            .find(|&i| is_content(passage[i]) && self.mask[i].is_some())
        {
            Some(i) => {
                self.mask[i] = None;
                true
            }
            None => false,
        }
    }

    /// Move back to the previous segment, hiding it and any partial progress in
    /// the current one.
    pub fn undo_segment(&mut self, passage: &[char]) -> bool {
        let Some(prev) = prev_segment_start(passage, self.segment_start) else {
            return false;
        };
        let end = self
            .current_segment(passage)
            .map_or(passage.len(), |(_, end)| end);
        for i in prev..end {
            if is_content(passage[i]) {
                self.mask[i] = None;
            }
        }
        self.segment_start = prev;
        self.typed.clear();
        true
    }

    pub fn clear_all(&mut self, passage: &[char]) {
        *self = Self::new(passage);
    }

    pub fn is_complete(&self, passage: &[char]) -> bool {
        content_len(passage) > 0 && self.segment_start >= passage.len()
    }
}
