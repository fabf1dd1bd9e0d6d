use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};

pub const DEFAULT_WINDOWS: [usize; 3] = [3, 5, 10];
pub const RECENT_GAMES: usize = 10;
pub const COMBINED_TEAM: &str = "TOT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Min,
    Fgm,
    Fga,
    Fg3m,
    Fg3a,
    Oreb,
    Dreb,
    Reb,
    Ast,
    Stl,
    Blk,
    Pts,
}

impl Category {
    pub const COUNT: usize = 12;

    pub const ALL: [Category; Category::COUNT] = [
        Category::Min,
        Category::Fgm,
        Category::Fga,
        Category::Fg3m,
        Category::Fg3a,
        Category::Oreb,
        Category::Dreb,
        Category::Reb,
        Category::Ast,
        Category::Stl,
        Category::Blk,
        Category::Pts,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Category::Min => "min",
            Category::Fgm => "fgm",
            Category::Fga => "fga",
            Category::Fg3m => "fg3m",
            Category::Fg3a => "fg3a",
            Category::Oreb => "oreb",
            Category::Dreb => "dreb",
            Category::Reb => "reb",
            Category::Ast => "ast",
            Category::Stl => "stl",
            Category::Blk => "blk",
            Category::Pts => "pts",
        }
    }

    pub fn avg_key(self) -> String {
        format!("{}_avg", self.key())
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Raw per-category values of one row, season totals or a single game.
pub trait CategoryTotals {
    fn category(&self, category: Category) -> f64;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSeasonRow {
    pub player_id: u32,
    pub season_id: String,
    pub team: String,
    pub gp: u32,
    pub min: f64,
    pub fgm: f64,
    pub fga: f64,
    pub fg_pct: Option<f64>,
    pub fg3m: f64,
    pub fg3a: f64,
    pub fg3_pct: Option<f64>,
    pub oreb: f64,
    pub dreb: f64,
    pub reb: f64,
    pub ast: f64,
    pub stl: f64,
    pub blk: f64,
    pub pts: f64,
}

impl CategoryTotals for PlayerSeasonRow {
    fn category(&self, category: Category) -> f64 {
        match category {
            Category::Min => self.min,
            Category::Fgm => self.fgm,
            Category::Fga => self.fga,
            Category::Fg3m => self.fg3m,
            Category::Fg3a => self.fg3a,
            Category::Oreb => self.oreb,
            Category::Dreb => self.dreb,
            Category::Reb => self.reb,
            Category::Ast => self.ast,
            Category::Stl => self.stl,
            Category::Blk => self.blk,
            Category::Pts => self.pts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerGameLogRow {
    pub season_id: String,
    pub game_id: String,
    pub game_date: String,
    pub matchup: String,
    pub wl: String,
    pub min: f64,
    pub fgm: f64,
    pub fga: f64,
    pub fg_pct: Option<f64>,
    pub fg3m: f64,
    pub fg3a: f64,
    pub fg3_pct: Option<f64>,
    pub ftm: f64,
    pub fta: f64,
    pub ft_pct: Option<f64>,
    pub oreb: f64,
    pub dreb: f64,
    pub reb: f64,
    pub ast: f64,
    pub stl: f64,
    pub blk: f64,
    pub tov: f64,
    pub pf: f64,
    pub pts: f64,
    pub plus_minus: f64,
}

impl CategoryTotals for PlayerGameLogRow {
    fn category(&self, category: Category) -> f64 {
        match category {
            Category::Min => self.min,
            Category::Fgm => self.fgm,
            Category::Fga => self.fga,
            Category::Fg3m => self.fg3m,
            Category::Fg3a => self.fg3a,
            Category::Oreb => self.oreb,
            Category::Dreb => self.dreb,
            Category::Reb => self.reb,
            Category::Ast => self.ast,
            Category::Stl => self.stl,
            Category::Blk => self.blk,
            Category::Pts => self.pts,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComboMetrics {
    pub pr: f64,
    pub pa: f64,
    pub pra: f64,
    pub ra: f64,
    pub bs: f64,
}

impl ComboMetrics {
    // Sums over already-rounded averages, then rounded again.
    fn from_averages(avg: &[f64; Category::COUNT]) -> Self {
        let pts = avg[Category::Pts.index()];
        let reb = avg[Category::Reb.index()];
        let ast = avg[Category::Ast.index()];
        let stl = avg[Category::Stl.index()];
        let blk = avg[Category::Blk.index()];
        Self {
            pr: round2(pts + reb),
            pa: round2(pts + ast),
            pra: round2(pts + reb + ast),
            ra: round2(reb + ast),
            bs: round2(blk + stl),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AverageScope {
    Season {
        player_id: u32,
        season_id: String,
        team: String,
    },
    Window {
        season_id: String,
        requested: usize,
        partial: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedAverageRow {
    pub scope: AverageScope,
    pub num_games: u32,
    averages: [f64; Category::COUNT],
    pub combos: ComboMetrics,
    pub fg_pct: Option<f64>,
    pub fg3_pct: Option<f64>,
}

impl DerivedAverageRow {
    pub fn avg(&self, category: Category) -> f64 {
        self.averages[category.index()]
    }

    pub fn season_id(&self) -> &str {
        match &self.scope {
            AverageScope::Season { season_id, .. } => season_id,
            AverageScope::Window { season_id, .. } => season_id,
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self.scope, AverageScope::Window { partial: true, .. })
    }
}

/// Two-place rounding with exact halves going to the even neighbour.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

fn per_game_averages<'a, R, I>(rows: I, games: u32) -> [f64; Category::COUNT]
where
    R: CategoryTotals + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut totals = [0.0_f64; Category::COUNT];
    for row in rows {
        for category in Category::ALL {
            totals[category.index()] += row.category(category);
        }
    }
    let divisor = games as f64;
    totals.map(|total| round2(total / divisor))
}

/// Per-game averages for the row of `target_season_id`.
///
/// A traded player has one row per team plus a combined `TOT` row for the
/// same season; the combined row wins when present.
pub fn compute_season_averages(
    season_rows: &[PlayerSeasonRow],
    target_season_id: &str,
) -> StatsResult<DerivedAverageRow> {
    if season_rows.is_empty() {
        return Err(StatsError::EmptyInput("season rows"));
    }

    let target = target_season_id.trim();
    let mut matching = season_rows.iter().filter(|row| row.season_id == target);
    let first = matching
        .next()
        .ok_or_else(|| StatsError::NotFound(format!("season {target}")))?;
    let row = std::iter::once(first)
        .chain(matching)
        .find(|row| row.team == COMBINED_TEAM)
        .unwrap_or(first);

    if row.gp == 0 {
        return Err(StatsError::DivisionByZero(format!(
            "zero games played in season {} ({})",
            row.season_id, row.team
        )));
    }

    let averages = per_game_averages(std::iter::once(row), row.gp);
    Ok(DerivedAverageRow {
        scope: AverageScope::Season {
            player_id: row.player_id,
            season_id: row.season_id.clone(),
            team: row.team.clone(),
        },
        num_games: row.gp,
        combos: ComboMetrics::from_averages(&averages),
        averages,
        fg_pct: row.fg_pct,
        fg3_pct: row.fg3_pct,
    })
}

/// Averages over the first N games of a most-recent-first log, one row per
/// window in the order given.
///
/// The smallest window must fit in the log. Larger windows that do not fit
/// are averaged over the rows available and marked partial.
pub fn compute_rolling_averages(
    game_log: &[PlayerGameLogRow],
    window_sizes: &[usize],
) -> StatsResult<Vec<DerivedAverageRow>> {
    if game_log.is_empty() {
        return Err(StatsError::EmptyInput("game log"));
    }
    let Some(smallest) = window_sizes.iter().copied().min() else {
        return Ok(Vec::new());
    };
    if smallest == 0 {
        return Err(StatsError::DivisionByZero("rolling window of size 0".to_string()));
    }
    if smallest > game_log.len() {
        return Err(StatsError::InsufficientData {
            requested: smallest,
            available: game_log.len(),
        });
    }

    let season_id = game_log[0].season_id.clone();
    let mut out = Vec::with_capacity(window_sizes.len());
    for &requested in window_sizes {
        let used = requested.min(game_log.len());
        let window = &game_log[..used];
        let averages = per_game_averages(window, used as u32);
        let (fg_pct, fg3_pct) = window_shooting(window);
        out.push(DerivedAverageRow {
            scope: AverageScope::Window {
                season_id: season_id.clone(),
                requested,
                partial: used < requested,
            },
            num_games: used as u32,
            combos: ComboMetrics::from_averages(&averages),
            averages,
            fg_pct,
            fg3_pct,
        });
    }
    Ok(out)
}

// Made over attempted across the window; None when nothing was attempted.
fn window_shooting(window: &[PlayerGameLogRow]) -> (Option<f64>, Option<f64>) {
    let pct = |made: f64, attempted: f64| {
        if attempted > 0.0 {
            Some(((made / attempted) * 1000.0).round_ties_even() / 1000.0)
        } else {
            None
        }
    };
    let fgm: f64 = window.iter().map(|g| g.fgm).sum();
    let fga: f64 = window.iter().map(|g| g.fga).sum();
    let fg3m: f64 = window.iter().map(|g| g.fg3m).sum();
    let fg3a: f64 = window.iter().map(|g| g.fg3a).sum();
    (pct(fgm, fga), pct(fg3m, fg3a))
}

pub fn select_recent_game_log(
    game_log: &[PlayerGameLogRow],
    count: usize,
) -> StatsResult<&[PlayerGameLogRow]> {
    if game_log.is_empty() {
        return Err(StatsError::EmptyInput("game log"));
    }
    Ok(&game_log[..count.min(game_log.len())])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn season(season_id: &str, team: &str, gp: u32, pts: f64, reb: f64, ast: f64) -> PlayerSeasonRow {
        PlayerSeasonRow {
            player_id: 2544,
            season_id: season_id.to_string(),
            team: team.to_string(),
            gp,
            min: 350.0,
            fgm: 90.0,
            fga: 180.0,
            fg_pct: Some(0.5),
            fg3m: 20.0,
            fg3a: 55.0,
            fg3_pct: Some(0.364),
            oreb: 10.0,
            dreb: 70.0,
            reb,
            ast,
            stl: 12.0,
            blk: 7.0,
            pts,
        }
    }

    fn game(pts: f64, reb: f64, ast: f64) -> PlayerGameLogRow {
        PlayerGameLogRow {
            season_id: "22024".to_string(),
            game_id: "0022400001".to_string(),
            game_date: "APR 13, 2025".to_string(),
            matchup: "LAL vs. HOU".to_string(),
            wl: "W".to_string(),
            min: 35.0,
            fgm: 10.0,
            fga: 20.0,
            fg_pct: Some(0.5),
            fg3m: 2.0,
            fg3a: 6.0,
            fg3_pct: Some(0.333),
            ftm: 4.0,
            fta: 5.0,
            ft_pct: Some(0.8),
            oreb: 1.0,
            dreb: 6.0,
            reb,
            ast,
            stl: 1.0,
            blk: 1.0,
            tov: 3.0,
            pf: 2.0,
            pts,
            plus_minus: 5.0,
        }
    }

    #[test]
    fn season_averages_divide_by_games_played() {
        let rows = vec![
            season("2023-24", "LAL", 71, 1822.0, 518.0, 589.0),
            season("2024-25", "LAL", 10, 250.0, 80.0, 50.0),
        ];
        let row = compute_season_averages(&rows, "2024-25").expect("season exists");
        assert_eq!(row.num_games, 10);
        assert_eq!(row.avg(Category::Pts), 25.0);
        assert_eq!(row.avg(Category::Reb), 8.0);
        assert_eq!(row.avg(Category::Ast), 5.0);
        assert_eq!(row.avg(Category::Min), 35.0);
        assert_eq!(row.combos.pra, 38.0);
        assert_eq!(row.combos.pr, 33.0);
        assert_eq!(row.combos.bs, 1.9);
        assert_eq!(row.fg_pct, Some(0.5));
        assert_eq!(row.fg3_pct, Some(0.364));
    }

    #[test]
    fn season_averages_round_to_two_places() {
        let rows = vec![season("2024-25", "LAL", 3, 100.0, 20.0, 10.0)];
        let row = compute_season_averages(&rows, "2024-25").expect("season exists");
        assert_eq!(row.avg(Category::Pts), 33.33);
        assert_eq!(row.avg(Category::Reb), 6.67);
        assert_eq!(row.avg(Category::Ast), 3.33);
        // Combos sum the rounded averages.
        assert_eq!(row.combos.pra, 43.33);
        assert!((row.combos.pra - (row.combos.pr + row.avg(Category::Ast))).abs() < 0.011);
    }

    #[test]
    fn exact_halves_round_to_even() {
        let mut row = season("2024-25", "LAL", 8, 200.0, 64.0, 40.0);
        row.stl = 1.0;
        row.blk = 0.0;
        row.min = 5.0;
        let avg = compute_season_averages(&[row], "2024-25").expect("season exists");
        assert_eq!(avg.avg(Category::Stl), 0.12);
        assert_eq!(avg.avg(Category::Min), 0.62);
        assert_eq!(avg.combos.bs, 0.12);
        assert_eq!(round2(0.375), 0.38);
    }

    #[test]
    fn season_averages_prefer_combined_row() {
        let rows = vec![
            season("2024-25", "DAL", 22, 616.0, 180.0, 170.0),
            season("2024-25", "LAL", 28, 784.0, 230.0, 220.0),
            season("2024-25", "TOT", 50, 1400.0, 410.0, 390.0),
        ];
        let row = compute_season_averages(&rows, "2024-25").expect("season exists");
        assert_eq!(row.num_games, 50);
        assert_eq!(row.avg(Category::Pts), 28.0);
        assert!(matches!(row.scope, AverageScope::Season { ref team, .. } if team == "TOT"));
    }

    #[test]
    fn season_averages_errors() {
        let rows = vec![season("2024-25", "LAL", 0, 0.0, 0.0, 0.0)];
        assert!(matches!(
            compute_season_averages(&rows, "2024-25"),
            Err(StatsError::DivisionByZero(_))
        ));
        assert!(matches!(
            compute_season_averages(&rows, "2019-20"),
            Err(StatsError::NotFound(_))
        ));
        assert_eq!(
            compute_season_averages(&[], "2024-25"),
            Err(StatsError::EmptyInput("season rows"))
        );
    }

    #[test]
    fn rolling_averages_follow_window_order() {
        let pts = [30.0, 20.0, 25.0, 18.0, 22.0, 31.0, 27.0, 19.0, 24.0, 26.0];
        let log: Vec<_> = pts.iter().map(|p| game(*p, 8.0, 6.0)).collect();
        let rows = compute_rolling_averages(&log, &DEFAULT_WINDOWS).expect("enough games");
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows.iter().map(|r| r.num_games).collect::<Vec<_>>(),
            vec![3, 5, 10]
        );
        assert_eq!(rows[0].avg(Category::Pts), 25.0);
        assert_eq!(rows[1].avg(Category::Pts), 23.0);
        assert_eq!(rows[2].avg(Category::Pts), 24.2);
        assert_eq!(rows[0].combos.pra, 39.0);
        assert_eq!(rows[0].fg_pct, Some(0.5));
        assert!(rows.iter().all(|r| !r.is_partial()));
        assert_eq!(rows[0].season_id(), "22024");
    }

    #[test]
    fn rolling_averages_mark_short_windows_partial() {
        let log: Vec<_> = [30.0, 20.0, 25.0, 17.0].iter().map(|p| game(*p, 5.0, 5.0)).collect();
        let rows = compute_rolling_averages(&log, &DEFAULT_WINDOWS).expect("smallest fits");
        assert!(!rows[0].is_partial());
        assert!(rows[1].is_partial());
        assert_eq!(rows[1].num_games, 4);
        assert_eq!(rows[1].avg(Category::Pts), 23.0);
        assert!(matches!(rows[2].scope, AverageScope::Window { requested: 10, partial: true, .. }));
    }

    #[test]
    fn rolling_averages_errors() {
        let log = vec![game(10.0, 1.0, 1.0), game(12.0, 1.0, 1.0)];
        assert_eq!(
            compute_rolling_averages(&log, &DEFAULT_WINDOWS),
            Err(StatsError::InsufficientData {
                requested: 3,
                available: 2
            })
        );
        assert_eq!(
            compute_rolling_averages(&[], &DEFAULT_WINDOWS),
            Err(StatsError::EmptyInput("game log"))
        );
        assert!(matches!(
            compute_rolling_averages(&log, &[0, 2]),
            Err(StatsError::DivisionByZero(_))
        ));
    }

    #[test]
    fn recent_log_keeps_rows_and_order() {
        let log: Vec<_> = (0..12).map(|i| game(i as f64, 1.0, 1.0)).collect();
        let recent = select_recent_game_log(&log, RECENT_GAMES).expect("non-empty");
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0], log[0]);
        assert_eq!(recent[9].pts, 9.0);

        let short = select_recent_game_log(&log[..4], RECENT_GAMES).expect("non-empty");
        assert_eq!(short.len(), 4);
        assert!(select_recent_game_log(&[], RECENT_GAMES).is_err());
    }
}
