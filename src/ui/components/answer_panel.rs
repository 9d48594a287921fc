use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::{Session, TypedStatus};
use crate::ui::theme::Theme;

/// Candidate characters in choice modes, the typed buffer in free mode.
pub struct AnswerPanel<'a> {
    session: &'a Session,
    theme: &'a Theme,
}

impl<'a> AnswerPanel<'a> {
    pub fn new(session: &'a Session, theme: &'a Theme) -> Self {
        Self { session, theme }
    }

    fn option_lines(&self) -> Vec<Line<'a>> {
        let colors = &self.theme.colors;
        if self.session.cursor().is_none() {
            let msg = if self.session.is_complete() {
                "全部答对"
            } else {
                "没有待填的空"
            };
            return vec![Line::from(Span::styled(
                msg,
                Style::default().fg(colors.success()),
            ))];
        }

        let mut spans = Vec::new();
        for (i, &ch) in self.session.options().iter().enumerate() {
            let style = if self.session.is_rejected(i) {
                Style::default()
                    .fg(colors.incorrect())
                    .bg(colors.incorrect_bg())
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD)
            };
            spans.push(Span::styled(
                format!("[{}] ", i + 1),
                Style::default().fg(colors.accent()),
            ));
            spans.push(Span::styled(ch.to_string(), style));
            spans.push(Span::raw("   "));
        }
        vec![Line::from(spans)]
    }

    fn typed_lines(&self) -> Vec<Line<'a>> {
        let colors = &self.theme.colors;
        if self.session.is_complete() {
            return vec![Line::from(Span::styled(
                "全文默写完成",
                Style::default().fg(colors.success()),
            ))];
        }

        let statuses = self.session.typed_statuses();
        let mut spans = vec![Span::styled("> ", Style::default().fg(colors.accent()))];
        for (ch, status) in self.session.typed().chars().zip(statuses) {
            let style = match status {
                TypedStatus::Correct => Style::default().fg(colors.answered()),
                TypedStatus::Incorrect => Style::default()
                    .fg(colors.incorrect())
                    .bg(colors.incorrect_bg())
                    .add_modifier(Modifier::UNDERLINED),
                TypedStatus::Neutral => Style::default().fg(colors.dim()),
            };
            spans.push(Span::styled(ch.to_string(), style));
        }
        spans.push(Span::styled(
            "▏",
            Style::default().fg(colors.cursor_bg()),
        ));

        let mut lines = vec![Line::from(spans)];
        if self.session.is_validation_pending() {
            lines.push(Line::from(Span::styled(
                "校验中…",
                Style::default().fg(colors.dim()),
            )));
        }
        lines
    }
}

impl Widget for AnswerPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let (title, lines) = match self.session.remaining() {
            Some(n) => (format!(" 选择 · 剩余 {n} "), self.option_lines()),
            None => (" 默写 ".to_string(), self.typed_lines()),
        };

        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
