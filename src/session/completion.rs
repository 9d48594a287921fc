use serde::{Deserialize, Serialize};

use crate::engine::mode::PracticeMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEvent {
    pub passage_index: usize,
    pub mode: PracticeMode,
}

/// Receiver of completion edges, typically the persisted counter table.
pub trait CompletionSink {
    fn record(&mut self, event: CompletionEvent);
}

/// Edge detector over the "passage complete" predicate.
///
/// The state observed when the tracker is created counts as the baseline, so a
/// passage that loads already solved reports complete without emitting.
#[derive(Clone, Debug)]
pub struct CompletionTracker {
    passage_index: usize,
    mode: PracticeMode,
    was_complete: bool,
}

impl CompletionTracker {
    pub fn new(passage_index: usize, mode: PracticeMode, complete_now: bool) -> Self {
        Self {
            passage_index,
            mode,
            was_complete: complete_now,
        }
    }

    pub fn observe(&mut self, complete: bool) -> Option<CompletionEvent> {
        let rising = complete && !self.was_complete;
        self.was_complete = complete;
        rising.then_some(CompletionEvent {
            passage_index: self.passage_index,
            mode: self.mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl CompletionSink for Vec<CompletionEvent> {
        fn record(&mut self, event: CompletionEvent) {
            self.push(event);
        }
    }

    #[test]
    fn test_fires_only_on_rising_edge() {
        let mut tracker = CompletionTracker::new(3, PracticeMode::All, false);
        let mut sink: Vec<CompletionEvent> = Vec::new();
        for complete in [false, false, true, true, true] {
            if let Some(ev) = tracker.observe(complete) {
                sink.record(ev);
            }
        }
        assert_eq!(
            sink,
            vec![CompletionEvent {
                passage_index: 3,
                mode: PracticeMode::All
            }]
        );
    }

    #[test]
    fn test_fires_again_after_falling_edge() {
        let mut tracker = CompletionTracker::new(0, PracticeMode::Free, false);
        assert!(tracker.observe(true).is_some());
        assert!(tracker.observe(false).is_none());
        assert!(tracker.observe(true).is_some());
    }

    #[test]
    fn test_complete_baseline_does_not_emit() {
        let mut tracker = CompletionTracker::new(0, PracticeMode::Random, true);
        assert!(tracker.observe(true).is_none());
    }
}
