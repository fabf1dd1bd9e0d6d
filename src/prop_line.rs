use crate::error::{StatsError, StatsResult};
use crate::stats::{Category, CategoryTotals, DerivedAverageRow, PlayerGameLogRow, round2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropMetric {
    Points,
    Rebounds,
    Assists,
    Blocks,
    Steals,
    PointsRebounds,
    PointsAssists,
    PointsReboundsAssists,
    ReboundsAssists,
    BlocksSteals,
}

impl PropMetric {
    pub const ALL: [PropMetric; 10] = [
        PropMetric::Points,
        PropMetric::Rebounds,
        PropMetric::Assists,
        PropMetric::Blocks,
        PropMetric::Steals,
        PropMetric::PointsRebounds,
        PropMetric::PointsAssists,
        PropMetric::PointsReboundsAssists,
        PropMetric::ReboundsAssists,
        PropMetric::BlocksSteals,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PropMetric::Points => "Points",
            PropMetric::Rebounds => "Rebounds",
            PropMetric::Assists => "Assists",
            PropMetric::Blocks => "Blocks",
            PropMetric::Steals => "Steals",
            PropMetric::PointsRebounds => "PR",
            PropMetric::PointsAssists => "PA",
            PropMetric::PointsReboundsAssists => "PRA",
            PropMetric::ReboundsAssists => "RA",
            PropMetric::BlocksSteals => "BS",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    fn categories(self) -> &'static [Category] {
        match self {
            PropMetric::Points => &[Category::Pts],
            PropMetric::Rebounds => &[Category::Reb],
            PropMetric::Assists => &[Category::Ast],
            PropMetric::Blocks => &[Category::Blk],
            PropMetric::Steals => &[Category::Stl],
            PropMetric::PointsRebounds => &[Category::Pts, Category::Reb],
            PropMetric::PointsAssists => &[Category::Pts, Category::Ast],
            PropMetric::PointsReboundsAssists => &[Category::Pts, Category::Reb, Category::Ast],
            PropMetric::ReboundsAssists => &[Category::Reb, Category::Ast],
            PropMetric::BlocksSteals => &[Category::Blk, Category::Stl],
        }
    }

    pub fn value<R: CategoryTotals>(self, row: &R) -> f64 {
        self.categories().iter().map(|c| row.category(*c)).sum()
    }

    pub fn season_average(self, row: &DerivedAverageRow) -> f64 {
        match self {
            PropMetric::PointsRebounds => row.combos.pr,
            PropMetric::PointsAssists => row.combos.pa,
            PropMetric::PointsReboundsAssists => row.combos.pra,
            PropMetric::ReboundsAssists => row.combos.ra,
            PropMetric::BlocksSteals => row.combos.bs,
            single => row.avg(single.categories()[0]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropSide {
    Over,
    Under,
}

impl PropSide {
    pub fn label(self) -> &'static str {
        match self {
            PropSide::Over => "Over",
            PropSide::Under => "Under",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            PropSide::Over => PropSide::Under,
            PropSide::Under => PropSide::Over,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropSummary {
    pub metric: PropMetric,
    pub side: PropSide,
    pub line: f64,
    pub games: usize,
    pub hits: usize,
    pub pushes: usize,
    pub hit_rate: f64,
    pub average: f64,
}

/// Counts how often the most recent `count` games cleared `line` on `side`.
pub fn evaluate_prop(
    game_log: &[PlayerGameLogRow],
    metric: PropMetric,
    line: f64,
    side: PropSide,
    count: usize,
) -> StatsResult<PropSummary> {
    let window = &game_log[..count.min(game_log.len())];
    if window.is_empty() {
        return Err(StatsError::EmptyInput("game log"));
    }

    let mut hits = 0;
    let mut pushes = 0;
    let mut total = 0.0;
    for game in window {
        let value = metric.value(game);
        total += value;
        if value == line {
            pushes += 1;
            continue;
        }
        let hit = match side {
            PropSide::Over => value > line,
            PropSide::Under => value < line,
        };
        if hit {
            hits += 1;
        }
    }

    let games = window.len();
    Ok(PropSummary {
        metric,
        side,
        line,
        games,
        hits,
        pushes,
        hit_rate: round2(hits as f64 / games as f64),
        average: round2(total / games as f64),
    })
}

/// `(x, y)` points of `metric` for the given games, oldest game at x = 0.
pub fn trend_series(game_log: &[PlayerGameLogRow], metric: PropMetric) -> Vec<(f64, f64)> {
    game_log
        .iter()
        .rev()
        .enumerate()
        .map(|(x, game)| (x as f64, metric.value(game)))
        .collect()
}
