use crate::app::{mode::AppMode, App, AppEvent, RenderState};
use crate::ui::command::{command_to_app_event, parse_command};
use crate::ui::reader::view::{render_buffer, render_progress_bar, render_word_display};
use crate::ui::terminal_guard::TerminalGuard;
use crate::ui::theme;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Margin, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use std::io::{self, Stdout};
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(1000 / 60);

/// Text typed on the command line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommandLine {
    input: String,
}

impl CommandLine {
    pub fn as_str(&self) -> &str {
        &self.input
    }

    /// Applies an editing key. Returns the submitted line on Enter.
    pub fn handle_key(&mut self, code: KeyCode) -> Option<String> {
        match code {
            KeyCode::Char(c) => self.input.push(c),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Esc => self.input.clear(),
            KeyCode::Enter => return Some(std::mem::take(&mut self.input)),
            _ => {}
        }
        None
    }
}

pub struct TuiManager {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    command_line: CommandLine,
    _guard: TerminalGuard,
}

impl TuiManager {
    pub fn new() -> Result<Self, io::Error> {
        let guard = TerminalGuard::new()?;
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;

        Ok(TuiManager {
            terminal,
            command_line: CommandLine::default(),
            _guard: guard,
        })
    }

    /// Runs until the app enters Quit mode. Must be called from inside a tokio
    /// runtime context; pacer sessions and generation run on its workers.
    pub fn run_event_loop(&mut self, app: &mut App) -> io::Result<()> {
        loop {
            app.tick();
            if app.mode() == AppMode::Quit {
                return Ok(());
            }
            self.render_frame(app)?;

            if event::poll(FRAME)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(app, key);
                    }
                }
            }
        }
    }

    fn handle_key(&mut self, app: &mut App, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            app.handle_event(AppEvent::Quit);
            return;
        }

        match app.mode() {
            AppMode::Reading | AppMode::Paused => match key.code {
                KeyCode::Esc => app.stop_reading(),
                KeyCode::Char(c) => app.handle_keypress(c),
                _ => {}
            },
            AppMode::Command => {
                if let Some(line) = self.command_line.handle_key(key.code) {
                    tracing::debug!(%line, "command submitted");
                    app.handle_event(command_to_app_event(parse_command(&line)));
                }
            }
            AppMode::Generating | AppMode::Quit => {}
        }
    }

    pub fn render_frame(&mut self, app: &App) -> io::Result<()> {
        let render_state = app.get_render_state();
        let input = self.command_line.as_str().to_string();

        self.terminal.draw(|frame| {
            let area = frame.area();
            frame.render_widget(
                Paragraph::new("").style(theme::screen()),
                area,
            );

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1),
                    Constraint::Min(1),
                    Constraint::Length(1),
                    Constraint::Length(1),
                ])
                .split(area);

            frame.render_widget(header(&render_state), chunks[0]);

            if render_state.mode.is_reading() {
                draw_reader(frame, &render_state, chunks[1]);
                frame.render_widget(render_progress_bar(render_state.progress), chunks[2]);
            } else {
                draw_panel(frame, &render_state, chunks[1]);
                frame.render_widget(prompt(&render_state, &input), chunks[2]);
            }

            frame.render_widget(status_line(&render_state), chunks[3]);
        })?;

        Ok(())
    }
}

fn draw_reader(frame: &mut Frame, state: &RenderState, area: Rect) {
    let Some(emission) = &state.emission else {
        return;
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(area);

    frame.render_widget(render_word_display(&emission.word), chunks[0]);

    let text_area = chunks[1].inner(Margin {
        horizontal: 2,
        vertical: 0,
    });
    frame.render_widget(
        render_buffer(&emission.buffer, text_area.width, text_area.height),
        text_area,
    );
}

fn draw_panel(frame: &mut Frame, state: &RenderState, area: Rect) {
    let lines: Vec<Line> = state
        .panel
        .iter()
        .map(|line| Line::from(Span::styled(line.clone(), theme::body())))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn header(state: &RenderState) -> Paragraph<'static> {
    let mode = match state.mode {
        AppMode::Command => "COMMAND",
        AppMode::Generating => "GENERATING",
        AppMode::Reading => "READING",
        AppMode::Paused => "PAUSED",
        AppMode::Quit => "QUIT",
    };
    Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {mode} "),
            theme::mode_badge(),
        ),
        Span::styled(
            format!(
                "  {} wpm  {} words",
                state.words_per_minute, state.number_of_words
            ),
            theme::faded(),
        ),
    ]))
}

fn prompt(state: &RenderState, input: &str) -> Paragraph<'static> {
    let marker = if state.mode == AppMode::Generating {
        "… "
    } else {
        "> "
    };
    Paragraph::new(Line::from(vec![
        Span::styled(marker, theme::prompt_marker()),
        Span::styled(input.to_string(), theme::body()),
    ]))
}

fn status_line(state: &RenderState) -> Paragraph<'static> {
    let Some(status) = &state.status else {
        return Paragraph::new("");
    };
    Paragraph::new(Span::styled(
        status.text().to_string(),
        theme::status(status.is_error()),
    ))
}
