use rand::Rng;

use crate::engine::classify::{content_len, is_content};
use crate::engine::mask::{self, MaskBuffer, create_mask, is_protected};
use crate::engine::mode::PracticeMode;
use crate::engine::options::generate_options;
use crate::engine::segment::{
    find_next_answerable, find_prev_answerable, find_prev_answered, prev_segment_start,
    segment_bounds,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickOutcome {
    Correct,
    Incorrect,
    /// No pending position, or the option index is out of range.
    NoTarget,
}

/// State for the random and all modes: answer one blank at a time by picking
/// from a candidate set.
#[derive(Clone, Debug)]
pub struct ChoiceSession {
    pub mask: MaskBuffer,
    pub snapshot: Option<MaskBuffer>,
    pub cursor: Option<usize>,
    pub options: Vec<char>,
    /// Option indices already tried and rejected at the current cursor.
    pub rejected: Vec<usize>,
}

impl ChoiceSession {
    pub fn new<R: Rng + ?Sized>(passage: &[char], mode: PracticeMode, rng: &mut R) -> Self {
        debug_assert!(mode.is_choice());
        let outcome = create_mask(passage, mode, rng);
        let mut session = Self {
            mask: outcome.mask,
            snapshot: outcome.snapshot,
            cursor: None,
            options: Vec::new(),
            rejected: Vec::new(),
        };
        let first = session.next_answerable(passage, 0);
        session.move_cursor(passage, first, rng);
        session
    }

    fn snapshot(&self) -> Option<&[Option<char>]> {
        self.snapshot.as_deref()
    }

    fn next_answerable(&self, passage: &[char], start: usize) -> Option<usize> {
        find_next_answerable(passage, &self.mask, start, self.snapshot())
    }

    fn is_answerable(&self, passage: &[char], index: usize) -> bool {
        index < passage.len() && is_content(passage[index]) && !is_protected(self.snapshot(), index)
    }

    fn move_cursor<R: Rng + ?Sized>(&mut self, passage: &[char], cursor: Option<usize>, rng: &mut R) {
        self.cursor = cursor;
        self.rejected.clear();
        self.options = match cursor {
            Some(i) => generate_options(passage, passage[i], rng),
            None => Vec::new(),
        };
    }

    /// Point the cursor at a specific blank. Revealed, protected and separator
    /// positions are ignored.
    pub fn tap<R: Rng + ?Sized>(&mut self, passage: &[char], index: usize, rng: &mut R) -> bool {
        if !self.is_answerable(passage, index) || self.mask[index].is_some() {
            return false;
        }
        if self.cursor != Some(index) {
            self.move_cursor(passage, Some(index), rng);
        }
        true
    }

    /// Move the cursor to the neighbouring blank in either direction.
    pub fn step_target<R: Rng + ?Sized>(&mut self, passage: &[char], forward: bool, rng: &mut R) -> bool {
        let Some(cursor) = self.cursor else {
            return false;
        };
        let target = if forward {
            self.next_answerable(passage, cursor + 1)
        } else {
            find_prev_answerable(passage, &self.mask, cursor, self.snapshot())
        };
        match target {
            Some(i) => {
                self.move_cursor(passage, Some(i), rng);
                true
            }
            None => false,
        }
    }

    pub fn pick<R: Rng + ?Sized>(&mut self, passage: &[char], option: usize, rng: &mut R) -> PickOutcome {
        let (Some(cursor), Some(&ch)) = (self.cursor, self.options.get(option)) else {
            return PickOutcome::NoTarget;
        };
        if ch != passage[cursor] {
            if !self.rejected.contains(&option) {
                self.rejected.push(option);
            }
            return PickOutcome::Incorrect;
        }

        self.mask[cursor] = Some(ch);
        // Continue forward; wrap to any blank left behind by an earlier tap.
        let next = self
            .next_answerable(passage, cursor + 1)
            .or_else(|| self.next_answerable(passage, 0));
        self.move_cursor(passage, next, rng);
        PickOutcome::Correct
    }

    /// Hide the nearest answered position before the cursor and move there.
    pub fn undo_char<R: Rng + ?Sized>(&mut self, passage: &[char], rng: &mut R) -> bool {
        let before = self.cursor.unwrap_or(passage.len());
        match find_prev_answered(passage, &self.mask, before, self.snapshot()) {
            Some(i) => {
                self.mask[i] = None;
                self.move_cursor(passage, Some(i), rng);
                true
            }
            None => false,
        }
    }

    /// Re-hide the segment holding the cursor, or the one before it when the
    /// cursor sits on the segment's first answerable position.
    pub fn undo_segment<R: Rng + ?Sized>(&mut self, passage: &[char], rng: &mut R) -> bool {
        let anchor = match self.cursor {
            Some(c) => c,
            None => match (0..passage.len()).rev().find(|&i| self.is_answerable(passage, i)) {
                Some(last) => last,
                None => return false,
            },
        };

        let (mut start, end) = segment_bounds(passage, anchor);
        let first_answerable = (start..end).find(|&i| self.is_answerable(passage, i));
        if self.cursor.is_some()
            && first_answerable == self.cursor
            && let Some(prev) = prev_segment_start(passage, start)
        {
            start = prev;
        }
        let (start, end) = segment_bounds(passage, start);

        let targets: Vec<usize> = (start..end)
            .filter(|&i| self.is_answerable(passage, i) && self.mask[i].is_some())
            .collect();
        if targets.is_empty() {
            return false;
        }
        for i in targets {
            self.mask[i] = None;
        }
        let next = self.next_answerable(passage, start);
        self.move_cursor(passage, next, rng);
        true
    }

    /// Hide everything that was not pre-revealed at mode entry.
    pub fn clear_all<R: Rng + ?Sized>(&mut self, passage: &[char], rng: &mut R) {
        self.mask = match &self.snapshot {
            Some(snapshot) => snapshot
                .iter()
                .zip(passage)
                .map(|(&pre, &ch)| pre.or_else(|| (!is_content(ch)).then_some(ch)))
                .collect(),
            None => mask::hidden_mask(passage),
        };
        let first = self.next_answerable(passage, 0);
        self.move_cursor(passage, first, rng);
    }

    pub fn is_complete(&self, passage: &[char]) -> bool {
        content_len(passage) > 0
            && passage
                .iter()
                .zip(&self.mask)
                .all(|(&ch, shown)| !is_content(ch) || shown.is_some())
    }

    pub fn remaining(&self, passage: &[char]) -> usize {
        passage
            .iter()
            .zip(&self.mask)
            .filter(|(ch, shown)| is_content(**ch) && shown.is_none())
            .count()
    }
}
