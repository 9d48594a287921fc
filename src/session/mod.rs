pub mod choice;
pub mod completion;
pub mod debounce;
pub mod free;

use std::time::{Duration, Instant};

use rand::Rng;
use rand::rngs::SmallRng;
use tracing::{debug, info};

use crate::engine::mode::PracticeMode;
use crate::engine::normalize::nfc;

pub use choice::{ChoiceSession, PickOutcome};
pub use completion::{CompletionEvent, CompletionSink, CompletionTracker};
pub use debounce::Debouncer;
pub use free::{FreeSession, SegmentCheck, TypedStatus};

/// Mode-specific state. Both families share the engine's classifier, segment
/// navigator and the session's completion tracker.
#[derive(Clone, Debug)]
pub enum SessionKind {
    Choice(ChoiceSession),
    Free(FreeSession),
}

/// One passage practiced under one mode. Every learner action goes through a
/// method here and returns the completion edge it produced, if any.
pub struct Session<R: Rng = SmallRng> {
    passage: Vec<char>,
    passage_index: usize,
    mode: PracticeMode,
    kind: SessionKind,
    tracker: CompletionTracker,
    debouncer: Debouncer,
    rng: R,
}

impl<R: Rng> Session<R> {
    pub fn new(content: &str, passage_index: usize, mode: PracticeMode, debounce: Duration, mut rng: R) -> Self {
        let passage: Vec<char> = nfc(content).chars().collect();
        let kind = build_kind(&passage, mode, &mut rng);
        let complete = kind_is_complete(&kind, &passage);
        debug!(passage_index, %mode, len = passage.len(), complete, "session started");
        Self {
            tracker: CompletionTracker::new(passage_index, mode, complete),
            passage,
            passage_index,
            mode,
            kind,
            debouncer: Debouncer::new(debounce),
            rng,
        }
    }

    /// Rebuild mask, cursor, typed buffer and tracker as on a fresh entry.
    fn reset(&mut self) {
        self.kind = build_kind(&self.passage, self.mode, &mut self.rng);
        self.tracker = CompletionTracker::new(self.passage_index, self.mode, self.is_complete());
        self.debouncer.cancel();
    }

    fn settle(&mut self) -> Option<CompletionEvent> {
        let event = self.tracker.observe(self.is_complete());
        if let Some(ev) = event {
            info!(passage_index = ev.passage_index, mode = %ev.mode, "passage completed");
        }
        event
    }

    pub fn passage(&self) -> &[char] {
        &self.passage
    }

    pub fn passage_index(&self) -> usize {
        self.passage_index
    }

    pub fn mode(&self) -> PracticeMode {
        self.mode
    }

    pub fn kind(&self) -> &SessionKind {
        &self.kind
    }

    pub fn mask(&self) -> &[Option<char>] {
        match &self.kind {
            SessionKind::Choice(c) => &c.mask,
            SessionKind::Free(f) => &f.mask,
        }
    }

    /// Pending position in choice modes, current segment start in free mode.
    pub fn cursor(&self) -> Option<usize> {
        match &self.kind {
            SessionKind::Choice(c) => c.cursor,
            SessionKind::Free(f) => (f.segment_start < self.passage.len()).then_some(f.segment_start),
        }
    }

    pub fn options(&self) -> &[char] {
        match &self.kind {
            SessionKind::Choice(c) => &c.options,
            SessionKind::Free(_) => &[],
        }
    }

    pub fn is_rejected(&self, option: usize) -> bool {
        matches!(&self.kind, SessionKind::Choice(c) if c.rejected.contains(&option))
    }

    pub fn typed(&self) -> &str {
        match &self.kind {
            SessionKind::Free(f) => &f.typed,
            SessionKind::Choice(_) => "",
        }
    }

    pub fn typed_statuses(&self) -> Vec<TypedStatus> {
        match &self.kind {
            SessionKind::Free(f) => f.typed_statuses(&self.passage, &nfc(&f.typed)),
            SessionKind::Choice(_) => Vec::new(),
        }
    }

    pub fn is_validation_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn is_complete(&self) -> bool {
        kind_is_complete(&self.kind, &self.passage)
    }

    /// Blanks still to answer in the choice modes.
    pub fn remaining(&self) -> Option<usize> {
        match &self.kind {
            SessionKind::Choice(c) => Some(c.remaining(&self.passage)),
            SessionKind::Free(_) => None,
        }
    }

    /// Switch practice mode; the passage restarts under the new masking policy.
    pub fn set_mode(&mut self, mode: PracticeMode) {
        self.mode = mode;
        self.reset();
        debug!(passage_index = self.passage_index, %mode, "mode changed");
    }

    /// Start the current passage over under the current mode.
    pub fn redo(&mut self) {
        self.reset();
        debug!(passage_index = self.passage_index, "passage restarted");
    }

    pub fn tap(&mut self, index: usize) -> Option<CompletionEvent> {
        if let SessionKind::Choice(c) = &mut self.kind {
            c.tap(&self.passage, index, &mut self.rng);
        }
        self.settle()
    }

    pub fn step_target(&mut self, forward: bool) -> Option<CompletionEvent> {
        if let SessionKind::Choice(c) = &mut self.kind {
            c.step_target(&self.passage, forward, &mut self.rng);
        }
        self.settle()
    }

    pub fn pick(&mut self, option: usize) -> (PickOutcome, Option<CompletionEvent>) {
        let outcome = match &mut self.kind {
            SessionKind::Choice(c) => c.pick(&self.passage, option, &mut self.rng),
            SessionKind::Free(_) => PickOutcome::NoTarget,
        };
        debug!(option, ?outcome, "option picked");
        (outcome, self.settle())
    }

    /// Append keystrokes to the typed buffer and restart the quiet period.
    pub fn type_str(&mut self, text: &str, now: Instant) {
        if self.is_complete() {
            return;
        }
        if let SessionKind::Free(f) = &mut self.kind {
            f.typed.push_str(text);
            self.debouncer.schedule(now);
        }
    }

    pub fn type_char(&mut self, ch: char, now: Instant) {
        let mut buf = [0u8; 4];
        self.type_str(ch.encode_utf8(&mut buf), now);
    }

    pub fn backspace(&mut self, now: Instant) {
        if let SessionKind::Free(f) = &mut self.kind
            && f.typed.pop().is_some()
        {
            self.debouncer.schedule(now);
        }
    }

    /// Run the pending validation once the quiet period has elapsed.
    pub fn tick(&mut self, now: Instant) -> Option<CompletionEvent> {
        if self.debouncer.poll(now) {
            self.validate()
        } else {
            None
        }
    }

    /// Validate the typed buffer immediately, superseding any pending timer.
    pub fn flush(&mut self) -> Option<CompletionEvent> {
        self.debouncer.cancel();
        self.validate()
    }

    fn validate(&mut self) -> Option<CompletionEvent> {
        if let SessionKind::Free(f) = &mut self.kind {
            let input = nfc(&f.typed);
            let check = f.validate(&self.passage, &input);
            debug!(?check, "typed buffer validated");
        }
        self.settle()
    }

    pub fn undo_char(&mut self) -> Option<CompletionEvent> {
        let changed = match &mut self.kind {
            SessionKind::Choice(c) => c.undo_char(&self.passage, &mut self.rng),
            SessionKind::Free(f) => f.undo_char(&self.passage),
        };
        debug!(changed, "undo character");
        self.settle()
    }

    pub fn undo_segment(&mut self) -> Option<CompletionEvent> {
        let changed = match &mut self.kind {
            SessionKind::Choice(c) => c.undo_segment(&self.passage, &mut self.rng),
            SessionKind::Free(f) => {
                self.debouncer.cancel();
                f.undo_segment(&self.passage)
            }
        };
        debug!(changed, "undo segment");
        self.settle()
    }

    pub fn clear_all(&mut self) -> Option<CompletionEvent> {
        match &mut self.kind {
            SessionKind::Choice(c) => c.clear_all(&self.passage, &mut self.rng),
            SessionKind::Free(f) => {
                self.debouncer.cancel();
                f.clear_all(&self.passage);
            }
        }
        debug!("cleared");
        self.settle()
    }
}

fn build_kind<R: Rng + ?Sized>(passage: &[char], mode: PracticeMode, rng: &mut R) -> SessionKind {
    match mode {
        PracticeMode::Random | PracticeMode::All => SessionKind::Choice(ChoiceSession::new(passage, mode, rng)),
        PracticeMode::Free => SessionKind::Free(FreeSession::new(passage)),
    }
}

fn kind_is_complete(kind: &SessionKind, passage: &[char]) -> bool {
    match kind {
        SessionKind::Choice(c) => c.is_complete(passage),
        SessionKind::Free(f) => f.is_complete(passage),
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::engine::mask::render;

    const PASSAGE: &str = "学而时习之，不亦说乎？";
    const DEBOUNCE: Duration = Duration::from_millis(600);

    fn session(content: &str, mode: PracticeMode) -> Session {
        Session::new(content, 0, mode, DEBOUNCE, SmallRng::seed_from_u64(99))
    }

    fn answer_current(s: &mut Session) -> Option<CompletionEvent> {
        let cursor = s.cursor().unwrap();
        let target = s.passage()[cursor];
        let idx = s.options().iter().position(|&c| c == target).unwrap();
        let (outcome, event) = s.pick(idx);
        assert_eq!(outcome, PickOutcome::Correct);
        event
    }

    #[test]
    fn test_free_mode_advances_after_quiet_period() {
        let t0 = Instant::now();
        let mut s = session(PASSAGE, PracticeMode::Free);
        s.type_str("学而时习之", t0);
        assert!(s.tick(t0 + Duration::from_millis(300)).is_none());
        assert_eq!(render(s.mask(), '_'), "_____，____？");

        s.tick(t0 + DEBOUNCE);
        assert_eq!(render(s.mask(), '_'), "学而时习之，____？");
        assert_eq!(s.cursor(), Some(6));
        assert_eq!(s.passage()[6], '不');
        assert_eq!(s.typed(), "");
    }

    #[test]
    fn test_new_keystroke_supersedes_pending_validation() {
        let t0 = Instant::now();
        let mut s = session(PASSAGE, PracticeMode::Free);
        s.type_char('学', t0);
        s.type_char('而', t0 + Duration::from_millis(500));
        assert!(s.tick(t0 + Duration::from_millis(700)).is_none());
        assert_eq!(render(s.mask(), '_'), "_____，____？");
        s.tick(t0 + Duration::from_millis(1100));
        assert_eq!(render(s.mask(), '_'), "学而___，____？");
        assert!(!s.is_validation_pending());
    }

    #[test]
    fn test_free_mode_completion_fires_once() {
        let t0 = Instant::now();
        let mut s = session(PASSAGE, PracticeMode::Free);
        s.type_str("学而时习之", t0);
        assert!(s.flush().is_none());
        s.type_str("不亦说乎", t0);
        let event = s.flush();
        assert_eq!(
            event,
            Some(CompletionEvent {
                passage_index: 0,
                mode: PracticeMode::Free
            })
        );
        assert!(s.flush().is_none());
        assert!(s.undo_char().is_none());
        assert!(s.is_complete());
    }

    #[test]
    fn test_remaining_counts_open_blanks() {
        let mut s = session("学而，时", PracticeMode::All);
        assert_eq!(s.remaining(), Some(3));
        answer_current(&mut s);
        assert_eq!(s.remaining(), Some(2));
        s.undo_char();
        assert_eq!(s.remaining(), Some(3));
        assert_eq!(session(PASSAGE, PracticeMode::Free).remaining(), None);
    }

    #[test]
    fn test_choice_completion_fires_on_last_answer_only() {
        let mut s = session("学而，时", PracticeMode::All);
        assert!(answer_current(&mut s).is_none());
        assert!(answer_current(&mut s).is_none());
        let event = answer_current(&mut s);
        assert_eq!(event.map(|e| e.mode), Some(PracticeMode::All));
        assert!(s.tap(0).is_none());
        assert!(s.step_target(true).is_none());
        let (outcome, event) = s.pick(0);
        assert_eq!(outcome, PickOutcome::NoTarget);
        assert!(event.is_none());
    }

    #[test]
    fn test_completion_fires_again_after_undo() {
        let mut s = session("学而", PracticeMode::All);
        answer_current(&mut s);
        assert!(answer_current(&mut s).is_some());
        s.undo_char();
        assert!(!s.is_complete());
        assert!(answer_current(&mut s).is_some());
    }

    #[test]
    fn test_redo_then_answer_everything_restores_passage() {
        let mut s = session(PASSAGE, PracticeMode::All);
        answer_current(&mut s);
        s.redo();
        assert_eq!(s.cursor(), Some(0));
        while s.cursor().is_some() {
            answer_current(&mut s);
        }
        assert_eq!(render(s.mask(), '_'), PASSAGE);
    }

    #[test]
    fn test_set_mode_rebuilds_state() {
        let t0 = Instant::now();
        let mut s = session(PASSAGE, PracticeMode::Free);
        s.type_str("学而", t0);
        s.set_mode(PracticeMode::All);
        assert_eq!(s.mode(), PracticeMode::All);
        assert_eq!(s.typed(), "");
        assert!(!s.is_validation_pending());
        assert_eq!(s.options().len(), 6);
        assert!(matches!(s.kind(), SessionKind::Choice(_)));
    }

    #[test]
    fn test_choice_mode_ignores_typing() {
        let t0 = Instant::now();
        let mut s = session(PASSAGE, PracticeMode::All);
        s.type_str("学", t0);
        s.backspace(t0);
        assert_eq!(s.typed(), "");
        assert!(!s.is_validation_pending());
        assert!(s.tick(t0 + DEBOUNCE).is_none());
    }

    #[test]
    fn test_rejected_option_is_visible_until_cursor_moves() {
        let mut s = session(PASSAGE, PracticeMode::All);
        let wrong = s.options().iter().position(|&c| c != '学').unwrap();
        let (outcome, _) = s.pick(wrong);
        assert_eq!(outcome, PickOutcome::Incorrect);
        assert!(s.is_rejected(wrong));
        answer_current(&mut s);
        assert!(!s.is_rejected(wrong));
    }

    #[test]
    fn test_empty_passage_never_completes() {
        let mut s = session("", PracticeMode::All);
        assert_eq!(s.cursor(), None);
        assert!(!s.is_complete());
        assert!(s.clear_all().is_none());
        let mut s = session("", PracticeMode::Free);
        assert!(s.flush().is_none());
        assert!(!s.is_complete());
    }

    #[test]
    fn test_input_is_normalized_before_comparison() {
        let mut s = session("豈不", PracticeMode::Free);
        s.type_str("\u{f900}不", Instant::now());
        assert!(s.flush().is_some());
    }
}
