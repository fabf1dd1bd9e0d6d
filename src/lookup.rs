use anyhow::{Context, Result};

use crate::config::Config;
use crate::error::{StatsError, StatsResult};
use crate::nba_fetch::StatsSource;
use crate::stats::{
    DerivedAverageRow, PlayerGameLogRow, PlayerSeasonRow, compute_rolling_averages,
    compute_season_averages, select_recent_game_log,
};

#[derive(Debug, Clone, PartialEq)]
pub struct LookupOptions {
    pub season: String,
    pub windows: Vec<usize>,
    pub recent_games: usize,
}

impl From<&Config> for LookupOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            season: cfg.season.clone(),
            windows: cfg.windows.clone(),
            recent_games: cfg.recent_games,
        }
    }
}

/// The three tables shown for one player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerReport {
    pub player_name: String,
    pub player_id: u32,
    pub season: DerivedAverageRow,
    pub rolling: Vec<DerivedAverageRow>,
    pub recent_games: Vec<PlayerGameLogRow>,
}

/// Resolves `player_name`, pulls both row sets and derives the report.
/// Blocks until every request has finished.
pub fn build_player_report<S: StatsSource + ?Sized>(
    source: &S,
    player_name: &str,
    opts: &LookupOptions,
) -> Result<PlayerReport> {
    let name = player_name.trim();
    if name.is_empty() {
        return Err(StatsError::EmptyInput("player name").into());
    }
    let player_id = source.find_player_id(name)?;
    let season_rows = source
        .season_rows(player_id)
        .with_context(|| format!("season rows for {name}"))?;
    let game_log = source
        .game_log(player_id, &opts.season)
        .with_context(|| format!("game log for {name}"))?;
    let report = derive_report(name, player_id, &season_rows, &game_log, opts)
        .with_context(|| format!("{name} {}", opts.season))?;
    Ok(report)
}

pub fn derive_report(
    player_name: &str,
    player_id: u32,
    season_rows: &[PlayerSeasonRow],
    game_log: &[PlayerGameLogRow],
    opts: &LookupOptions,
) -> StatsResult<PlayerReport> {
    let season = compute_season_averages(season_rows, &opts.season)?;
    let rolling = compute_rolling_averages(game_log, &opts.windows)?;
    let recent_games = select_recent_game_log(game_log, opts.recent_games)?.to_vec();
    Ok(PlayerReport {
        player_name: player_name.to_string(),
        player_id,
        season,
        rolling,
        recent_games,
    })
}
