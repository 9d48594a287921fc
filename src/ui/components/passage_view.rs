use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::bank::Passage;
use crate::engine::classify::is_separator;
use crate::engine::mask::is_protected;
use crate::session::{Session, SessionKind};
use crate::ui::theme::Theme;

pub const BLANK: char = '＿';

/// The masked passage with the pending position highlighted.
pub struct PassageView<'a> {
    passage: &'a Passage,
    session: &'a Session,
    theme: &'a Theme,
}

impl<'a> PassageView<'a> {
    pub fn new(passage: &'a Passage, session: &'a Session, theme: &'a Theme) -> Self {
        Self {
            passage,
            session,
            theme,
        }
    }

    fn char_style(&self, index: usize, revealed: bool) -> Style {
        let colors = &self.theme.colors;
        let snapshot = match self.session.kind() {
            SessionKind::Choice(c) => c.snapshot.as_deref(),
            SessionKind::Free(_) => None,
        };
        if self.session.cursor() == Some(index) {
            Style::default()
                .fg(colors.cursor_fg())
                .bg(colors.cursor_bg())
        } else if !revealed {
            Style::default()
                .fg(colors.blank())
                .add_modifier(Modifier::UNDERLINED)
        } else if is_separator(self.session.passage()[index]) || is_protected(snapshot, index) {
            Style::default().fg(colors.revealed())
        } else {
            Style::default().fg(colors.answered())
        }
    }
}

impl Widget for PassageView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let spans: Vec<Span> = self
            .session
            .mask()
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                let shown = slot.unwrap_or(BLANK);
                Span::styled(shown.to_string(), self.char_style(i, slot.is_some()))
            })
            .collect();

        let mut lines = Vec::new();
        if !self.passage.hint.is_empty() {
            lines.push(Line::from(Span::styled(
                self.passage.hint.as_str(),
                Style::default().fg(colors.dim()).add_modifier(Modifier::ITALIC),
            )));
            lines.push(Line::from(""));
        }
        lines.push(Line::from(spans));

        let border = if self.session.is_complete() {
            colors.success()
        } else {
            colors.border()
        };
        let block = Block::bordered()
            .title(format!(" {} ", self.passage.title))
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
