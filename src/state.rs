use std::collections::VecDeque;

use crate::lookup::PlayerReport;
use crate::name_matcher::{AutocompleteEntry, NameList, build_index};
use crate::prop_line::{PropMetric, PropSide, PropSummary, evaluate_prop};

const MAX_LOGS: usize = 200;
const LINE_STEP: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Entry,
    Tables,
}

#[derive(Debug, Clone)]
pub struct PropInput {
    pub metric: PropMetric,
    pub side: PropSide,
    pub line: f64,
}

impl Default for PropInput {
    fn default() -> Self {
        Self {
            metric: PropMetric::Points,
            side: PropSide::Over,
            line: 20.5,
        }
    }
}

pub struct AppState {
    pub names: NameList,
    pub entry: AutocompleteEntry,
    pub focus: Focus,
    pub report: Option<PlayerReport>,
    pub last_error: Option<String>,
    pub prop: PropInput,
    pub game_log_scroll: usize,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            names: NameList::default(),
            entry: AutocompleteEntry::new(),
            focus: Focus::Entry,
            report: None,
            last_error: None,
            prop: PropInput::default(),
            game_log_scroll: 0,
            help_overlay: false,
            logs: VecDeque::new(),
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn type_char(&mut self, ch: char) {
        self.focus = Focus::Entry;
        self.entry.push_char(ch, &self.names);
    }

    pub fn backspace(&mut self) {
        self.entry.backspace(&self.names);
    }

    pub fn clear_entry(&mut self) {
        self.entry.clear();
    }

    pub fn leave_entry(&mut self) {
        self.entry.focus_lost();
        self.focus = Focus::Tables;
    }

    /// Name to look up: the highlighted suggestion when the dropdown is
    /// open, otherwise the typed text.
    pub fn take_lookup_name(&mut self) -> Option<String> {
        if !self.entry.suggestions().is_empty() {
            if let Ok(name) = self.entry.commit() {
                return Some(name);
            }
        }
        let typed = self.entry.text().trim();
        if typed.is_empty() {
            None
        } else {
            Some(typed.to_string())
        }
    }

    pub fn commit_suggestion(&mut self) {
        if let Err(err) = self.entry.commit() {
            self.push_log(format!("[INFO] {err}"));
        }
    }

    pub fn cycle_prop_metric(&mut self) {
        self.prop.metric = self.prop.metric.next();
    }

    pub fn toggle_prop_side(&mut self) {
        self.prop.side = self.prop.side.toggle();
    }

    pub fn raise_line(&mut self) {
        self.prop.line += LINE_STEP;
    }

    pub fn lower_line(&mut self) {
        self.prop.line = (self.prop.line - LINE_STEP).max(0.0);
    }

    pub fn scroll_game_log_down(&mut self) {
        let rows = self.report.as_ref().map(|r| r.recent_games.len()).unwrap_or(0);
        if self.game_log_scroll + 1 < rows {
            self.game_log_scroll += 1;
        }
    }

    pub fn scroll_game_log_up(&mut self) {
        self.game_log_scroll = self.game_log_scroll.saturating_sub(1);
    }

    pub fn prop_summary(&self) -> Option<PropSummary> {
        let report = self.report.as_ref()?;
        evaluate_prop(
            &report.recent_games,
            self.prop.metric,
            self.prop.line,
            self.prop.side,
            report.recent_games.len(),
        )
        .ok()
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetRoster(Vec<String>),
    SetReport(PlayerReport),
    LookupFailed { name: String, error: String },
    Exported { path: String },
    Log(String),
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetRoster(names) => {
            state.push_log(format!("[INFO] Loaded {} active players", names.len()));
            state.names = build_index(names);
        }
        Delta::SetReport(report) => {
            state.push_log(format!(
                "[INFO] {}: {} season, {} recent games",
                report.player_name,
                report.season.season_id(),
                report.recent_games.len()
            ));
            state.report = Some(report);
            state.last_error = None;
            state.game_log_scroll = 0;
        }
        Delta::LookupFailed { name, error } => {
            state.push_log(format!("[WARN] {name}: {error}"));
            state.last_error = Some(error);
        }
        Delta::Exported { path } => {
            state.push_log(format!("[INFO] Exported {path}"));
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
