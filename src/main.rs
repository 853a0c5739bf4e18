use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use rift_terminal::champions::ChampionTaxonomy;
use rift_terminal::classifier::{LinearClassifier, WinClassifier, load_model_bundle};
use rift_terminal::config::{AppConfig, LiveSource};
use rift_terminal::demo_feed::demo_snapshot;
use rift_terminal::live_feed::try_fetch_live_snapshot;
use rift_terminal::predict::run_prediction;
use rift_terminal::session::{FormField, MessageLevel, SessionState};

struct App {
    config: AppConfig,
    champions: ChampionTaxonomy,
    model: Option<LinearClassifier>,
    columns: Vec<String>,
    session: SessionState,
    fields: Vec<FormField>,
    selected: usize,
    help_overlay: bool,
    should_quit: bool,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let mut startup_logs = Vec::new();

        let champions = match ChampionTaxonomy::from_csv_path(&config.champion_classes_path) {
            Ok(champions) => {
                startup_logs.push(format!("[INFO] Loaded {} champions", champions.len()));
                champions
            }
            Err(err) => {
                startup_logs.push(format!("[ERROR] Champion classes unavailable: {err:#}"));
                ChampionTaxonomy::default()
            }
        };

        let (model, columns) =
            match load_model_bundle(&config.model_path, &config.feature_columns_path) {
                Ok((model, columns)) => {
                    startup_logs.push(format!(
                        "[INFO] Loaded model with {} columns",
                        model.coefficient_count()
                    ));
                    (Some(model), columns)
                }
                Err(err) => {
                    startup_logs.push(format!("[WARN] Model unavailable: {err:#}"));
                    (None, Vec::new())
                }
            };

        let mut session =
            SessionState::with_context(&champions, config.default_platform, config.default_rank);
        for line in startup_logs {
            session.push_log(line);
        }

        Self {
            config,
            champions,
            model,
            columns,
            session,
            fields: FormField::all(),
            selected: 0,
            help_overlay: false,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.select_by(1),
            KeyCode::Char('k') | KeyCode::Up => self.select_by(-1),
            KeyCode::PageDown => self.select_by(10),
            KeyCode::PageUp => self.select_by(-10),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Char('+') | KeyCode::Char(' ') => {
                self.adjust_selected(1)
            }
            KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('-') => self.adjust_selected(-1),
            KeyCode::Char(']') => self.adjust_selected(10),
            KeyCode::Char('[') => self.adjust_selected(-10),
            KeyCode::Char('L') => self.load_live(),
            KeyCode::Char('C') => self.session.clear_live(),
            KeyCode::Char('p') | KeyCode::Char('P') => self.predict(),
            KeyCode::Char('?') => self.help_overlay = !self.help_overlay,
            KeyCode::Esc => self.help_overlay = false,
            _ => {}
        }
    }

    fn select_by(&mut self, delta: i64) {
        if self.fields.is_empty() {
            return;
        }
        let max = self.fields.len() as i64 - 1;
        self.selected = (self.selected as i64 + delta).clamp(0, max) as usize;
    }

    fn adjust_selected(&mut self, step: i32) {
        let Some(field) = self.fields.get(self.selected).copied() else {
            return;
        };
        self.session.adjust(field, step, &self.champions);
    }

    fn load_live(&mut self) {
        let fetched = match self.config.live_source {
            LiveSource::Demo => Some(demo_snapshot(&self.champions)),
            LiveSource::Client => {
                match try_fetch_live_snapshot(&self.config.live_url, self.config.live_timeout) {
                    Ok(snapshot) => Some(snapshot),
                    Err(err) => {
                        self.session
                            .push_log(format!("[INFO] Live fetch failed: {err:#}"));
                        None
                    }
                }
            }
        };
        self.session.load_live(fetched, &self.champions);
    }

    fn predict(&mut self) {
        let classifier = self.model.as_ref().map(|m| m as &dyn WinClassifier);
        let result = run_prediction(
            &mut self.session,
            &self.champions,
            classifier,
            &self.columns,
            self.config.schema_policy,
        );
        if let Ok(report) = result {
            self.session
                .set_message(MessageLevel::Success, format!("Prediction: {}", report.outcome()));
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let mut app = App::new(AppConfig::from_env());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(7),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(44)])
        .split(chunks[1]);
    render_form(frame, columns[0], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(1)])
        .split(columns[1]);

    let preds = Paragraph::new(prediction_text(app))
        .block(Block::default().title("Prediction").borders(Borders::ALL));
    frame.render_widget(preds, right[0]);

    let status = Paragraph::new(status_lines(&app.session))
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Status").borders(Borders::ALL));
    frame.render_widget(status, right[1]);

    let console = Paragraph::new(console_text(&app.session))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(
        "j/k Move | h/l Adjust | [/] ±10 | L Load live | C Clear | p Predict | ? Help | q Quit",
    );
    frame.render_widget(footer, chunks[3]);

    if app.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> String {
    let source = match app.config.live_source {
        LiveSource::Client => "client",
        LiveSource::Demo => "demo",
    };
    let live = if app.session.live_loaded {
        "LIVE"
    } else {
        "MANUAL"
    };
    let model = if app.model.is_some() {
        "model ready"
    } else {
        "no model"
    };
    let line1 = format!(
        "  /\\   RIFT TERMINAL | {live} | source: {source} | {model} | {} {}",
        app.session.platform.label(),
        app.session.rank.label()
    );
    let line2 = " /__\\".to_string();
    format!("{line1}\n{line2}")
}

fn render_form(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title("Snapshot").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 {
        return;
    }
    let lines: Vec<Line> = form_window(app.selected, app.fields.len(), inner.height as usize)
        .map(|idx| {
            let field = app.fields[idx];
            let selected = idx == app.selected;
            let prefix = if selected { "> " } else { "  " };
            let text = format!(
                "{prefix}{:<34} {}",
                field.label(),
                app.session.display_value(field)
            );
            let style = if selected {
                Style::default()
                    .fg(Color::White)
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::styled(text, style)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Rows of the form to draw so the selected field stays roughly centred.
fn form_window(selected: usize, total: usize, rows: usize) -> std::ops::Range<usize> {
    let rows = rows.min(total);
    let start = selected.saturating_sub(rows / 2).min(total - rows);
    start..start + rows
}

fn prediction_text(app: &App) -> String {
    let Some(report) = &app.session.last_prediction else {
        return if app.model.is_some() {
            "Press p to predict".to_string()
        } else {
            "No model loaded".to_string()
        };
    };
    let secs = report.snapshot_time_sec;
    let mut lines = vec![
        report.outcome(),
        String::new(),
        format!("Team 1: {:>5.1}%", report.prediction.proba[0] * 100.0),
        format!("Team 2: {:>5.1}%", report.prediction.proba[1] * 100.0),
        format!("At: {}:{:02}", secs / 60, secs % 60),
    ];
    if !report.zero_filled.is_empty() {
        lines.push(format!("Zero-filled columns: {}", report.zero_filled.len()));
    }
    lines.join("\n")
}

fn status_lines(session: &SessionState) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(msg) = &session.live_message {
        let color = match msg.level {
            MessageLevel::Success => Color::Green,
            MessageLevel::Info => Color::Cyan,
            MessageLevel::Warning => Color::Yellow,
            MessageLevel::Error => Color::Red,
        };
        lines.push(Line::styled(msg.text.clone(), Style::default().fg(color)));
    }
    for warning in session.consistency_warnings() {
        lines.push(Line::styled(warning, Style::default().fg(Color::Yellow)));
    }
    if lines.is_empty() {
        lines.push(Line::styled(
            "Fill in the snapshot or press L to load live data",
            Style::default().fg(Color::DarkGray),
        ));
    }
    lines
}

fn console_text(session: &SessionState) -> String {
    if session.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    session
        .logs
        .iter()
        .rev()
        .take(5)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = overlay_area(area, 60, 60);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Rift Terminal - Help",
        "",
        "Form:",
        "  j/k or ↑/↓   Move",
        "  PgUp/PgDn    Move by 10",
        "  h/l or ←/→   Adjust value, toggle, cycle choice",
        "  [ / ]        Adjust by 10",
        "",
        "Actions:",
        "  L            Load live data",
        "  C            Clear live data",
        "  p            Predict",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn overlay_area(area: Rect, width_pct: u16, height_pct: u16) -> Rect {
    let width = (area.width as u32 * width_pct.min(100) as u32 / 100) as u16;
    let height = (area.height as u32 * height_pct.min(100) as u32 / 100) as u16;
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_window_keeps_selection_in_view() {
        assert_eq!(form_window(0, 90, 20), 0..20);
        assert_eq!(form_window(50, 90, 20), 40..60);
        assert_eq!(form_window(89, 90, 20), 70..90);
        assert_eq!(form_window(3, 5, 20), 0..5);
        assert_eq!(form_window(0, 0, 20), 0..0);
    }

    #[test]
    fn overlay_sits_inside_the_frame() {
        let area = Rect::new(2, 1, 100, 40);
        let popup = overlay_area(area, 60, 60);
        assert_eq!(popup, Rect::new(22, 9, 60, 24));
    }
}
