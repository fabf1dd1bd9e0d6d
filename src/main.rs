use std::io;
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::{
    Axis, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph, Row, Table,
};

use hoops_terminal::config::Config;
use hoops_terminal::lookup::{LookupOptions, PlayerReport, build_player_report};
use hoops_terminal::name_matcher::EntryState;
use hoops_terminal::nba_fetch::{NbaStatsSource, StatsSource, parse_game_date};
use hoops_terminal::prop_line::{PropMetric, trend_series};
use hoops_terminal::report_export::{export_file_name, export_report};
use hoops_terminal::state::{AppState, Delta, Focus, apply_delta};
use hoops_terminal::tables;

enum Action {
    None,
    Lookup(String),
    Export,
}

struct App<S: StatsSource> {
    state: AppState,
    source: S,
    cfg: Config,
    should_quit: bool,
}

impl<S: StatsSource> App<S> {
    fn new(source: S, cfg: Config) -> Self {
        Self {
            state: AppState::new(),
            source,
            cfg,
            should_quit: false,
        }
    }

    fn load_roster(&mut self) {
        match self.source.player_names() {
            Ok(names) => apply_delta(&mut self.state, Delta::SetRoster(names)),
            Err(err) => apply_delta(
                &mut self.state,
                Delta::Log(format!("[WARN] Player index unavailable: {err:#}")),
            ),
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Action::None;
        }
        match key.code {
            KeyCode::Enter => {
                if let Some(name) = self.state.take_lookup_name() {
                    return Action::Lookup(name);
                }
                self.state.push_log("[INFO] Please enter a player's name");
            }
            KeyCode::Tab => self.state.commit_suggestion(),
            KeyCode::Esc => {
                if self.state.help_overlay {
                    self.state.help_overlay = false;
                } else {
                    self.state.leave_entry();
                }
            }
            KeyCode::Backspace => self.state.backspace(),
            KeyCode::Delete => self.state.clear_entry(),
            KeyCode::Down => {
                if self.state.entry.state() == EntryState::SuggestionsVisible {
                    self.state.entry.highlight_next();
                } else {
                    self.state.scroll_game_log_down();
                }
            }
            KeyCode::Up => {
                if self.state.entry.state() == EntryState::SuggestionsVisible {
                    self.state.entry.highlight_prev();
                } else {
                    self.state.scroll_game_log_up();
                }
            }
            KeyCode::PageUp => self.state.raise_line(),
            KeyCode::PageDown => self.state.lower_line(),
            KeyCode::F(1) => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::F(2) => self.state.cycle_prop_metric(),
            KeyCode::F(3) => self.state.toggle_prop_side(),
            KeyCode::F(5) => return Action::Export,
            KeyCode::Char('q') if self.state.focus == Focus::Tables => self.should_quit = true,
            KeyCode::Char(ch) => self.state.type_char(ch),
            _ => {}
        }
        Action::None
    }

    fn lookup(&mut self, name: &str) {
        let opts = LookupOptions::from(&self.cfg);
        let delta = match build_player_report(&self.source, name, &opts) {
            Ok(report) => Delta::SetReport(report),
            Err(err) => Delta::LookupFailed {
                name: name.to_string(),
                error: format!("{err:#}"),
            },
        };
        apply_delta(&mut self.state, delta);
    }

    fn export(&mut self) {
        let Some(report) = self.state.report.as_ref() else {
            self.state.push_log("[INFO] Nothing to export yet");
            return;
        };
        let path = self.cfg.export_dir.join(export_file_name(report));
        let delta = match export_report(&path, report) {
            Ok(summary) => Delta::Exported {
                path: summary.path.display().to_string(),
            },
            Err(err) => Delta::Log(format!("[WARN] Export failed: {err:#}")),
        };
        apply_delta(&mut self.state, delta);
    }
}

fn main() -> io::Result<()> {
    let cfg = Config::from_env();
    let source = NbaStatsSource::new(&cfg);
    let mut app = App::new(source, cfg);

    println!("Loading player index...");
    app.load_roster();

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

fn run_app<B: Backend, S: StatsSource>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);

    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.on_key(key) {
                        Action::Lookup(name) => {
                            app.state.push_log(format!("[INFO] Fetching {name}..."));
                            terminal.draw(|f| ui(f, app))?;
                            app.lookup(&name);
                        }
                        Action::Export => app.export(),
                        Action::None => {}
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui<S: StatsSource>(frame: &mut Frame, app: &App<S>) {
    let state = &app.state;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(9),
            Constraint::Length(4),
            Constraint::Length(3 + app.cfg.windows.len() as u16),
            Constraint::Min(5),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_entry(frame, chunks[1], state);
    render_trends(frame, chunks[2], state.report.as_ref());
    render_season_table(frame, chunks[3], state.report.as_ref());
    render_rolling_table(frame, chunks[4], state.report.as_ref());
    render_game_log(frame, chunks[5], state);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(20)])
        .split(chunks[6]);
    let prop = Paragraph::new(prop_text(state))
        .block(Block::default().title("Line").borders(Borders::ALL));
    frame.render_widget(prop, bottom[0]);
    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, bottom[1]);

    let footer = Paragraph::new(
        "Type name | Tab Complete | Enter Get stats | ↑/↓ Pick/Scroll | F2 Stat | F3 O/U | PgUp/PgDn Line | F5 Export | F1 Help | Ctrl-C Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[7]);

    // Drawn last so the dropdown overlays the chart.
    render_suggestions(frame, chunks[1], state);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text<S: StatsSource>(app: &App<S>) -> String {
    let player = app
        .state
        .report
        .as_ref()
        .map(|r| format!("{} (#{})", r.player_name, r.player_id))
        .unwrap_or_else(|| "No player loaded".to_string());
    format!(
        " HOOPS TERMINAL | {} | {} | {}",
        app.cfg.season, app.cfg.season_type, player
    )
}

fn render_entry(frame: &mut Frame, area: Rect, state: &AppState) {
    let border = if state.focus == Focus::Entry {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let text = format!("{}▏", state.entry.text());
    let entry = Paragraph::new(text).block(
        Block::default()
            .title("Player Name")
            .borders(Borders::ALL)
            .border_style(border),
    );
    frame.render_widget(entry, area);
}

fn render_suggestions(frame: &mut Frame, entry_area: Rect, state: &AppState) {
    let suggestions = state.entry.suggestions();
    if suggestions.is_empty() {
        return;
    }
    let width = suggestions
        .iter()
        .map(|s| s.chars().count() as u16 + 4)
        .max()
        .unwrap_or(20)
        .clamp(20, entry_area.width.max(20));
    let popup = Rect {
        x: entry_area.x + 1,
        y: entry_area.y + entry_area.height.saturating_sub(1),
        width: width.min(entry_area.width.saturating_sub(1)),
        height: suggestions.len() as u16 + 2,
    }
    .intersection(frame.size());
    if popup.area() == 0 {
        return;
    }
    let lines: Vec<Line> = suggestions
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            if idx == state.entry.highlighted() {
                Line::from(Span::styled(
                    format!("> {name}"),
                    Style::default().fg(Color::White).bg(Color::DarkGray),
                ))
            } else {
                Line::from(format!("  {name}"))
            }
        })
        .collect();
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL)),
        popup,
    );
}

fn render_trends(frame: &mut Frame, area: Rect, report: Option<&PlayerReport>) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let metrics = [
        (PropMetric::Points, "Points", Color::Green),
        (PropMetric::Rebounds, "Rebounds", Color::Yellow),
        (PropMetric::Assists, "Assists", Color::Cyan),
    ];
    for ((metric, title, color), col) in metrics.into_iter().zip(cols.iter()) {
        let block = Block::default().title(title).borders(Borders::ALL);
        let Some(report) = report.filter(|r| !r.recent_games.is_empty()) else {
            frame.render_widget(Paragraph::new("No games yet").block(block), *col);
            continue;
        };
        let points = trend_series(&report.recent_games, metric);
        let (lo, hi) = points
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), (_, y)| (lo.min(*y), hi.max(*y)));
        let hi = if hi > lo { hi } else { lo + 1.0 };
        let x_max = (points.len().saturating_sub(1)).max(1) as f64;
        let first = report.recent_games.last().map(|g| short_date(&g.game_date));
        let last = report.recent_games.first().map(|g| short_date(&g.game_date));

        let dataset = Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(color))
            .data(&points);
        let chart = Chart::new(vec![dataset])
            .block(block)
            .x_axis(
                Axis::default()
                    .bounds([0.0, x_max])
                    .labels(vec![
                        Span::raw(first.unwrap_or_default()),
                        Span::raw(last.unwrap_or_default()),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .bounds([lo * 0.95, hi * 1.05])
                    .labels(vec![
                        Span::raw(format!("{lo:.0}")),
                        Span::raw(format!("{hi:.0}")),
                    ]),
            );
        frame.render_widget(chart, *col);
    }
}

fn short_date(raw: &str) -> String {
    parse_game_date(raw)
        .map(|d| d.format("%m/%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn render_season_table(frame: &mut Frame, area: Rect, report: Option<&PlayerReport>) {
    let columns = tables::season_columns();
    let rows: Vec<Row> = report
        .map(|r| vec![Row::new(tables::season_cells(&r.season))])
        .unwrap_or_default();
    render_table(frame, area, "Season Averages", &columns, rows);
}

fn render_rolling_table(frame: &mut Frame, area: Rect, report: Option<&PlayerReport>) {
    let columns = tables::rolling_columns();
    let rows: Vec<Row> = report
        .map(|r| {
            r.rolling
                .iter()
                .map(|row| Row::new(tables::rolling_cells(row)))
                .collect()
        })
        .unwrap_or_default();
    render_table(frame, area, "Recent Averages", &columns, rows);
}

fn render_game_log(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows: Vec<Row> = state
        .report
        .as_ref()
        .map(|r| {
            r.recent_games
                .iter()
                .skip(state.game_log_scroll)
                .map(|g| Row::new(tables::game_log_cells(g)))
                .collect()
        })
        .unwrap_or_default();
    render_table(frame, area, "Game Log", &tables::GAME_LOG_COLUMNS, rows);
}

fn render_table(frame: &mut Frame, area: Rect, title: &str, columns: &[&str], rows: Vec<Row>) {
    let widths: Vec<Constraint> = columns
        .iter()
        .map(|c| Constraint::Length((c.len() as u16).max(6)))
        .collect();
    let header = Row::new(columns.iter().map(|c| c.to_string()))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn prop_text(state: &AppState) -> String {
    let input = &state.prop;
    let mut lines = vec![format!(
        "{} {} {:.1}",
        input.metric.label(),
        input.side.label(),
        input.line
    )];
    match (state.prop_summary(), state.report.as_ref()) {
        (Some(summary), Some(report)) => {
            lines.push(format!(
                "Hit {}/{} ({:.0}%) push {}",
                summary.hits,
                summary.games,
                summary.hit_rate * 100.0,
                summary.pushes
            ));
            lines.push(format!(
                "Last {} avg {:.2} | season {:.2}",
                summary.games,
                summary.average,
                input.metric.season_average(&report.season)
            ));
        }
        _ => lines.push("No games yet".to_string()),
    }
    lines.join("\n")
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .skip(state.logs.len().saturating_sub(4))
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Hoops Terminal - Help",
        "",
        "Entry:",
        "  type         Filter player names",
        "  ↑/↓          Move through suggestions",
        "  Tab          Take highlighted suggestion",
        "  Enter        Get stats",
        "  Del          Clear entry",
        "  Esc          Hide suggestions / leave entry",
        "",
        "Tables:",
        "  ↑/↓          Scroll game log",
        "  q            Quit (outside the entry)",
        "",
        "Line:",
        "  F2           Cycle stat",
        "  F3           Over / Under",
        "  PgUp/PgDn    Move line by 0.5",
        "",
        "  F5           Export workbook",
        "  F1           Toggle help",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
