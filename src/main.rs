use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};
use tracing::{error, info, warn};

use recitalist::app::{App, AppScreen, StatusKind};
use recitalist::config::Config;
use recitalist::engine::mode::PracticeMode;
use recitalist::event::{AppEvent, EventHandler};
use recitalist::logging;
use recitalist::store::json_store::JsonStore;
use recitalist::ui::components::answer_panel::AnswerPanel;
use recitalist::ui::components::passage_view::PassageView;
use recitalist::ui::components::question_list::QuestionList;
use recitalist::ui::layout::{AppLayout, centered_rect};
use recitalist::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "recitalist", version, about = "Terminal recitation trainer for classical Chinese passages")]
struct Cli {
    #[arg(short, long, help = "Practice mode (random, all, free)")]
    mode: Option<PracticeMode>,

    #[arg(short, long, help = "Passage bank name or path to a JSON bank")]
    bank: Option<String>,

    #[arg(short, long, help = "Question number to start from (1-based)")]
    question: Option<usize>,

    #[arg(long, help = "Free mode validation delay in milliseconds")]
    debounce_ms: Option<u64>,

    #[arg(long, help = "Path to an alternative config file")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = Config::config_path();
    let (mut config, config_err) = match &cli.config {
        Some(path) => (Config::load_from(path)?, None),
        None => Config::load_or_default(&config_path),
    };

    let _log_guard = logging::init(&logging::log_dir(), &config.log_level).ok();
    info!(version = env!("CARGO_PKG_VERSION"), "starting");

    match config_err {
        Some(e) => warn!(
            path = %config_path.display(),
            error = %format_args!("{e:#}"),
            "unreadable config, using defaults"
        ),
        None if cli.config.is_none() && !config_path.exists() => {
            if let Err(e) = config.save() {
                warn!(error = %e, "failed to write default config");
            }
        }
        None => {}
    }
    if let Some(ms) = cli.debounce_ms {
        config.debounce_ms = ms;
        config.validate();
    }

    let store = JsonStore::new()
        .inspect_err(|e| error!(error = %e, "data directory unavailable, progress will not be saved"))
        .ok();
    let bank = App::resolve_bank(&config, store.as_ref(), cli.bank.as_deref())?;
    let mode = cli.mode.unwrap_or_else(|| config.mode());
    let question = cli.question.unwrap_or(1).saturating_sub(1);
    let mut app = App::new(config, Theme::load(), bank, store, mode, question)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(50));

    let result = run_app(&mut terminal, &mut app, &events);

    app.persist();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!(error = ?err, "exited with error");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Paste(text) => {
                if app.screen == AppScreen::Practice {
                    app.type_str(&text);
                }
            }
            AppEvent::Tick => app.tick(Instant::now()),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Practice => handle_practice_key(app, key),
        AppScreen::QuestionSelect => handle_question_select_key(app, key),
    }
}

fn handle_practice_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('z') => app.undo_char(),
            KeyCode::Char('w') => app.undo_segment(),
            KeyCode::Char('l') => app.clear_all(),
            KeyCode::Char('r') => app.redo(),
            KeyCode::Char('n') => app.next_question(),
            KeyCode::Char('p') => app.prev_question(),
            KeyCode::Char('o') => app.open_question_list(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab => app.cycle_mode(),
        KeyCode::Enter => app.submit(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Left => app.step_target(false),
        KeyCode::Right => app.step_target(true),
        KeyCode::Char(ch) if app.mode().is_choice() => {
            if let Some(digit) = ch.to_digit(10)
                && (1..=6).contains(&digit)
            {
                app.pick(digit as usize - 1);
            }
        }
        KeyCode::Char(ch) => {
            let mut buf = [0u8; 4];
            app.type_str(ch.encode_utf8(&mut buf));
        }
        _ => {}
    }
}

fn handle_question_select_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_question_list(),
        KeyCode::Up | KeyCode::Char('k') => app.question_list_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.question_list_next(),
        KeyCode::Enter => app.confirm_question(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    render_practice(frame, app);
    if app.screen == AppScreen::QuestionSelect {
        render_question_select(frame, app);
    }
}

fn render_practice(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let layout = AppLayout::new(frame.area());
    let index = app.session.passage_index();
    let count = app.completions.count(index).get(app.mode());

    let header_info = format!(
        " {} · 第 {}/{} 题 · {} · 已完成 {count} 次",
        app.bank.name,
        index + 1,
        app.bank.len(),
        app.mode().label(),
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " recitalist ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            header_info,
            Style::default().fg(colors.dim()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    frame.render_widget(
        PassageView::new(app.passage(), &app.session, &app.theme),
        layout.passage,
    );
    frame.render_widget(AnswerPanel::new(&app.session, &app.theme), layout.answer);

    if let Some(status) = &app.status {
        let color = match status.kind {
            StatusKind::Info => colors.accent(),
            StatusKind::Error => colors.incorrect(),
            StatusKind::Success => colors.success(),
        };
        let line = Paragraph::new(Line::from(Span::styled(
            format!(" {}", status.text),
            Style::default().fg(color),
        )));
        frame.render_widget(line, layout.status);
    }

    let hints = if app.mode().is_choice() {
        " [1-6] 选字  [←→] 换空  [Bksp] 撤销  [^W] 撤销一句  [^L] 清空  [Tab] 模式  [^O] 题目  [Esc] 退出"
    } else {
        " [Enter] 校验  [^Z] 撤销  [^W] 撤销一句  [^L] 清空  [^R] 重做  [Tab] 模式  [^O] 题目  [Esc] 退出"
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        hints,
        Style::default().fg(colors.dim()),
    )));
    frame.render_widget(footer, layout.footer);
}

fn render_question_select(frame: &mut ratatui::Frame, app: &App) {
    let area = centered_rect(70, 70, frame.area());
    frame.render_widget(Clear, area);
    frame.render_widget(
        QuestionList {
            bank: &app.bank,
            completions: &app.completions,
            selected: app.question_selected,
            current: app.session.passage_index(),
            theme: &app.theme,
        },
        area,
    );
}
