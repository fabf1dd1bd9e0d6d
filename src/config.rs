use std::env;
use std::path::PathBuf;

use crate::stats::{DEFAULT_WINDOWS, RECENT_GAMES};

pub const DEFAULT_SEASON: &str = "2024-25";
pub const DEFAULT_SEASON_TYPE: &str = "Regular Season";
pub const DEFAULT_STATS_BASE_URL: &str = "https://stats.nba.com/stats";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Season shown in the season-average table (HOOPS_SEASON).
    pub season: String,
    /// Game-log season type (HOOPS_SEASON_TYPE), e.g. "Playoffs".
    pub season_type: String,
    /// Rolling windows in display order (HOOPS_WINDOWS, comma-separated).
    pub windows: Vec<usize>,
    /// Rows kept in the raw game-log table (HOOPS_RECENT_GAMES).
    pub recent_games: usize,
    pub stats_base_url: String,
    pub http_timeout_secs: u64,
    /// Where F5 exports land (HOOPS_EXPORT_DIR).
    pub export_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            season: DEFAULT_SEASON.to_string(),
            season_type: DEFAULT_SEASON_TYPE.to_string(),
            windows: DEFAULT_WINDOWS.to_vec(),
            recent_games: RECENT_GAMES,
            stats_base_url: DEFAULT_STATS_BASE_URL.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            export_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Reads `.env.local` / `.env` first; bad values fall back to defaults.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let windows = text("HOOPS_WINDOWS")
            .map(|raw| parse_windows(&raw))
            .filter(|w| !w.is_empty())
            .unwrap_or(defaults.windows);

        Self {
            season: text("HOOPS_SEASON").unwrap_or(defaults.season),
            season_type: text("HOOPS_SEASON_TYPE").unwrap_or(defaults.season_type),
            windows,
            recent_games: text("HOOPS_RECENT_GAMES")
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.recent_games),
            stats_base_url: text("HOOPS_STATS_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.stats_base_url),
            http_timeout_secs: text("HOOPS_HTTP_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(defaults.http_timeout_secs)
                .max(1),
            export_dir: text("HOOPS_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
        }
    }
}

fn parse_windows(raw: &str) -> Vec<usize> {
    raw.split(',')
        .filter_map(|part| part.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .collect()
}
