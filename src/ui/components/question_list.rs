use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::bank::Bank;
use crate::engine::mode::PracticeMode;
use crate::store::schema::CompletionData;
use crate::ui::theme::Theme;

pub struct QuestionList<'a> {
    pub bank: &'a Bank,
    pub completions: &'a CompletionData,
    pub selected: usize,
    pub current: usize,
    pub theme: &'a Theme,
}

impl Widget for QuestionList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} · 选择题目 ", self.bank.name))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let visible = inner.height as usize;
        // Keep the selection on screen.
        let first = self.selected.saturating_sub(visible.saturating_sub(1));

        let lines: Vec<Line> = self
            .bank
            .passages
            .iter()
            .enumerate()
            .skip(first)
            .take(visible)
            .map(|(i, p)| {
                let is_selected = i == self.selected;
                let indicator = if is_selected { ">" } else { " " };
                let marker = if i == self.current { "*" } else { " " };
                let count = self.completions.count(i);
                let tally = PracticeMode::ALL
                    .iter()
                    .map(|&m| format!("{} {}", m.label(), count.get(m)))
                    .collect::<Vec<_>>()
                    .join(" · ");

                let title_style = Style::default()
                    .fg(if is_selected { colors.accent() } else { colors.fg() })
                    .add_modifier(if is_selected {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    });

                Line::from(vec![
                    Span::styled(format!(" {indicator}{marker}{:>3}. ", i + 1), title_style),
                    Span::styled(p.title.as_str(), title_style),
                    Span::styled(format!("   {tally}"), Style::default().fg(colors.dim())),
                ])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
