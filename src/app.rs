use std::time::Instant;

use anyhow::{Result, bail};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{info, warn};

use crate::bank::{Bank, Passage};
use crate::config::Config;
use crate::engine::mode::PracticeMode;
use crate::session::{CompletionEvent, CompletionSink, PickOutcome, Session};
use crate::store::json_store::JsonStore;
use crate::store::schema::{BankData, CompletionData};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Practice,
    QuestionSelect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
    Success,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub theme: Theme,
    pub bank: Bank,
    pub completions: CompletionData,
    pub store: Option<JsonStore>,
    pub session: Session,
    pub question_selected: usize,
    pub status: Option<StatusMessage>,
    pub should_quit: bool,
}

impl App {
    /// Pick the bank: an explicit name wins, then the bank saved on last exit,
    /// then the configured one.
    pub fn resolve_bank(config: &Config, store: Option<&JsonStore>, explicit: Option<&str>) -> Result<Bank> {
        if let Some(name) = explicit {
            return Bank::load(name);
        }
        if let Some(saved) = store.and_then(|s| s.load_bank()) {
            info!(bank = %saved.name, "restoring last bank");
            return Ok(Bank {
                name: saved.name,
                passages: saved.passages,
            });
        }
        Bank::load(&config.bank)
    }

    pub fn new(
        config: Config,
        theme: Theme,
        bank: Bank,
        store: Option<JsonStore>,
        mode: PracticeMode,
        question: usize,
    ) -> Result<Self> {
        if bank.is_empty() {
            bail!("Passage bank `{}` has no passages", bank.name);
        }
        let completions = match &store {
            Some(s) => s.load_completions(&bank.name, bank.len()),
            None => CompletionData::for_bank(&bank.name, bank.len()),
        };
        let index = question.min(bank.len() - 1);
        let session = new_session(&bank.passages[index], index, mode, &config);

        Ok(Self {
            screen: AppScreen::Practice,
            config,
            theme,
            bank,
            completions,
            store,
            session,
            question_selected: index,
            status: None,
            should_quit: false,
        })
    }

    pub fn passage(&self) -> &Passage {
        &self.bank.passages[self.session.passage_index()]
    }

    pub fn mode(&self) -> PracticeMode {
        self.session.mode()
    }

    pub fn start_question(&mut self, index: usize) {
        let index = index.min(self.bank.len() - 1);
        let mode = self.session.mode();
        self.session = new_session(&self.bank.passages[index], index, mode, &self.config);
        self.question_selected = index;
        self.status = None;
        self.screen = AppScreen::Practice;
    }

    pub fn next_question(&mut self) {
        let next = (self.session.passage_index() + 1) % self.bank.len();
        self.start_question(next);
    }

    pub fn prev_question(&mut self) {
        let len = self.bank.len();
        let prev = (self.session.passage_index() + len - 1) % len;
        self.start_question(prev);
    }

    pub fn cycle_mode(&mut self) {
        let mode = self.session.mode().next();
        self.session.set_mode(mode);
        self.set_status(StatusKind::Info, format!("切换到{}", mode.label()));
    }

    pub fn redo(&mut self) {
        self.session.redo();
        self.status = None;
    }

    pub fn pick(&mut self, option: usize) {
        let (outcome, event) = self.session.pick(option);
        match outcome {
            PickOutcome::Incorrect => self.set_status(StatusKind::Error, "不对，再想想".to_string()),
            PickOutcome::Correct => self.status = None,
            PickOutcome::NoTarget => {}
        }
        self.record(event);
    }

    pub fn step_target(&mut self, forward: bool) {
        let event = self.session.step_target(forward);
        self.record(event);
    }

    pub fn type_str(&mut self, text: &str) {
        self.session.type_str(text, Instant::now());
    }

    pub fn backspace(&mut self) {
        if self.session.mode().is_choice() {
            self.undo_char();
        } else {
            self.session.backspace(Instant::now());
        }
    }

    pub fn undo_char(&mut self) {
        let event = self.session.undo_char();
        self.record(event);
    }

    pub fn undo_segment(&mut self) {
        let event = self.session.undo_segment();
        self.record(event);
    }

    pub fn clear_all(&mut self) {
        let event = self.session.clear_all();
        self.status = None;
        self.record(event);
    }

    /// Enter: move on once complete, otherwise validate typed text now.
    pub fn submit(&mut self) {
        if self.session.is_complete() {
            self.next_question();
        } else if !self.session.mode().is_choice() {
            let event = self.session.flush();
            self.record(event);
        }
    }

    pub fn tick(&mut self, now: Instant) {
        let event = self.session.tick(now);
        self.record(event);
    }

    pub fn open_question_list(&mut self) {
        self.question_selected = self.session.passage_index();
        self.screen = AppScreen::QuestionSelect;
    }

    pub fn close_question_list(&mut self) {
        self.screen = AppScreen::Practice;
    }

    pub fn question_list_next(&mut self) {
        self.question_selected = (self.question_selected + 1) % self.bank.len();
    }

    pub fn question_list_prev(&mut self) {
        let len = self.bank.len();
        self.question_selected = (self.question_selected + len - 1) % len;
    }

    pub fn confirm_question(&mut self) {
        self.start_question(self.question_selected);
    }

    fn record(&mut self, event: Option<CompletionEvent>) {
        let Some(event) = event else {
            return;
        };
        self.completions.record(event);
        if let Some(store) = &self.store
            && let Err(e) = store.save_completions(&self.completions)
        {
            warn!(error = %e, "failed to save completions");
        }
        let count = self.completions.count(event.passage_index).get(event.mode);
        self.set_status(
            StatusKind::Success,
            format!("完成！第 {count} 次 · Enter 下一题 · Ctrl-R 重做"),
        );
    }

    fn set_status(&mut self, kind: StatusKind, text: String) {
        self.status = Some(StatusMessage { kind, text });
    }

    /// Remember the active bank for the next launch.
    pub fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };
        let data = BankData {
            name: self.bank.name.clone(),
            passages: self.bank.passages.clone(),
            ..BankData::default()
        };
        if let Err(e) = store.save_bank(&data) {
            warn!(error = %e, "failed to save active bank");
        }
        if let Err(e) = store.save_completions(&self.completions) {
            warn!(error = %e, "failed to save completions");
        }
    }
}

fn new_session(passage: &Passage, index: usize, mode: PracticeMode, config: &Config) -> Session {
    Session::new(
        &passage.content,
        index,
        mode,
        config.debounce(),
        SmallRng::from_entropy(),
    )
}
