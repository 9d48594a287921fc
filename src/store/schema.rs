use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bank::Passage;
use crate::engine::mode::PracticeMode;
use crate::session::completion::{CompletionEvent, CompletionSink};

const SCHEMA_VERSION: u32 = 1;

/// Per-passage completion counters, one per practice mode.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionCount {
    pub random: u32,
    pub all: u32,
    pub free: u32,
    #[serde(default)]
    pub last_completed_at: Option<DateTime<Utc>>,
}

impl CompletionCount {
    pub fn get(&self, mode: PracticeMode) -> u32 {
        match mode {
            PracticeMode::Random => self.random,
            PracticeMode::All => self.all,
            PracticeMode::Free => self.free,
        }
    }

    pub fn increment(&mut self, mode: PracticeMode, at: DateTime<Utc>) {
        let slot = match mode {
            PracticeMode::Random => &mut self.random,
            PracticeMode::All => &mut self.all,
            PracticeMode::Free => &mut self.free,
        };
        *slot = slot.saturating_add(1);
        self.last_completed_at = Some(at);
    }
}

/// On-disk completion counts for every bank that has been practised.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompletionFile {
    pub schema_version: u32,
    #[serde(default)]
    pub banks: BTreeMap<String, Vec<CompletionCount>>,
}

impl Default for CompletionFile {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            banks: BTreeMap::new(),
        }
    }
}

impl CompletionFile {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    /// The counts for `bank`, grown to at least `len` entries.
    pub fn take_bank(&mut self, bank: &str, len: usize) -> CompletionData {
        let mut data = CompletionData {
            bank: bank.to_string(),
            counts: self.banks.remove(bank).unwrap_or_default(),
        };
        data.ensure_len(len);
        data
    }

    pub fn put_bank(&mut self, data: &CompletionData) {
        self.banks.insert(data.bank.clone(), data.counts.clone());
    }
}

/// Completion counts for the passages of one bank, indexed like the bank.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompletionData {
    pub bank: String,
    pub counts: Vec<CompletionCount>,
}

impl CompletionData {
    pub fn for_bank(bank: &str, len: usize) -> Self {
        Self {
            bank: bank.to_string(),
            counts: vec![CompletionCount::default(); len],
        }
    }

    /// Grow the counter list to cover a bank of `len` passages. Counts past
    /// the end of a shrunk bank are kept.
    pub fn ensure_len(&mut self, len: usize) {
        if self.counts.len() < len {
            self.counts.resize(len, CompletionCount::default());
        }
    }

    pub fn count(&self, index: usize) -> CompletionCount {
        self.counts.get(index).cloned().unwrap_or_default()
    }

    pub fn record_at(&mut self, event: CompletionEvent, at: DateTime<Utc>) {
        if event.passage_index >= self.counts.len() {
            self.ensure_len(event.passage_index + 1);
        }
        self.counts[event.passage_index].increment(event.mode, at);
    }
}

impl CompletionSink for CompletionData {
    fn record(&mut self, event: CompletionEvent) {
        self.record_at(event, Utc::now());
    }
}

/// The passage bank that was active when the app last exited.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BankData {
    pub schema_version: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub passages: Vec<Passage>,
}

impl Default for BankData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            name: String::new(),
            passages: Vec::new(),
        }
    }
}

impl BankData {
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(passage_index: usize, mode: PracticeMode) -> CompletionEvent {
        CompletionEvent {
            passage_index,
            mode,
        }
    }

    #[test]
    fn test_record_increments_only_that_mode() {
        let mut data = CompletionData::for_bank("default", 3);
        data.record(event(1, PracticeMode::Free));
        data.record(event(1, PracticeMode::Free));
        data.record(event(1, PracticeMode::Random));
        let c = data.count(1);
        assert_eq!(c.free, 2);
        assert_eq!(c.random, 1);
        assert_eq!(c.all, 0);
        assert!(c.last_completed_at.is_some());
        assert_eq!(data.count(0), CompletionCount::default());
    }

    #[test]
    fn test_record_past_end_grows_counts() {
        let mut data = CompletionData::default();
        data.record(event(4, PracticeMode::All));
        assert_eq!(data.counts.len(), 5);
        assert_eq!(data.count(4).get(PracticeMode::All), 1);
    }

    #[test]
    fn test_ensure_len_never_shrinks() {
        let mut data = CompletionData::for_bank("default", 5);
        data.record(event(4, PracticeMode::Free));
        data.ensure_len(2);
        assert_eq!(data.counts.len(), 5);
        assert_eq!(data.count(4).free, 1);
    }

    #[test]
    fn test_count_without_timestamp_loads() {
        let json = r#"{"schema_version":1,"banks":{"default":[{"random":2,"all":0,"free":1}]}}"#;
        let mut file: CompletionFile = serde_json::from_str(json).unwrap();
        assert!(!file.needs_reset());
        let data = file.take_bank("default", 1);
        assert_eq!(data.count(0).random, 2);
        assert_eq!(data.count(0).last_completed_at, None);
    }

    #[test]
    fn test_banks_are_kept_apart() {
        let mut file = CompletionFile::default();
        let mut first = file.take_bank("default", 2);
        first.record(event(0, PracticeMode::All));
        file.put_bank(&first);

        let other = file.take_bank("midterm", 3);
        assert_eq!(other.count(0), CompletionCount::default());
        file.put_bank(&other);

        let again = file.take_bank("default", 2);
        assert_eq!(again.count(0).all, 1);
    }

    #[test]
    fn test_stale_schema_needs_reset() {
        let file = CompletionFile {
            schema_version: 0,
            ..CompletionFile::default()
        };
        assert!(file.needs_reset());
    }
}
