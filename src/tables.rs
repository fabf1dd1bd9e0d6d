use crate::stats::{AverageScope, Category, DerivedAverageRow, PlayerGameLogRow};

// Average columns after the leading identity columns, shared by both
// average tables.
const AVERAGE_TAIL: [&str; 19] = [
    "pts_avg", "reb_avg", "ast_avg", "stl_avg", "blk_avg", "combo_pr", "combo_pa", "combo_pra",
    "combo_ra", "combo_bs", "fg3m_avg", "fg3a_avg", "fg3_pct", "fgm_avg", "fga_avg", "fg_pct",
    "oreb_avg", "dreb_avg", "min_avg",
];

pub const GAME_LOG_COLUMNS: [&str; 24] = [
    "game_id", "game_date", "matchup", "wl", "pts", "reb", "ast", "stl", "blk", "fg3m", "fg3a",
    "fg3_pct", "fgm", "fga", "fg_pct", "ftm", "fta", "ft_pct", "oreb", "dreb", "min", "tov", "pf",
    "plus_minus",
];

pub fn season_columns() -> Vec<&'static str> {
    let mut cols = vec!["player_id", "season_id", "team", "gp"];
    cols.extend(AVERAGE_TAIL);
    cols
}

pub fn rolling_columns() -> Vec<&'static str> {
    let mut cols = vec!["season_id", "num_games"];
    cols.extend(AVERAGE_TAIL);
    cols
}

pub fn season_cells(row: &DerivedAverageRow) -> Vec<String> {
    let (player_id, team) = match &row.scope {
        AverageScope::Season {
            player_id, team, ..
        } => (player_id.to_string(), team.clone()),
        AverageScope::Window { .. } => (String::new(), String::new()),
    };
    let mut cells = vec![
        player_id,
        row.season_id().to_string(),
        team,
        row.num_games.to_string(),
    ];
    cells.extend(average_tail(row));
    cells
}

pub fn rolling_cells(row: &DerivedAverageRow) -> Vec<String> {
    let games = match &row.scope {
        AverageScope::Window {
            requested,
            partial: true,
            ..
        } => format!("{}/{requested}*", row.num_games),
        _ => row.num_games.to_string(),
    };
    let mut cells = vec![row.season_id().to_string(), games];
    cells.extend(average_tail(row));
    cells
}

fn average_tail(row: &DerivedAverageRow) -> Vec<String> {
    let avg = |c: Category| fmt2(row.avg(c));
    vec![
        avg(Category::Pts),
        avg(Category::Reb),
        avg(Category::Ast),
        avg(Category::Stl),
        avg(Category::Blk),
        fmt2(row.combos.pr),
        fmt2(row.combos.pa),
        fmt2(row.combos.pra),
        fmt2(row.combos.ra),
        fmt2(row.combos.bs),
        avg(Category::Fg3m),
        avg(Category::Fg3a),
        fmt_pct(row.fg3_pct),
        avg(Category::Fgm),
        avg(Category::Fga),
        fmt_pct(row.fg_pct),
        avg(Category::Oreb),
        avg(Category::Dreb),
        avg(Category::Min),
    ]
}

pub fn game_log_cells(game: &PlayerGameLogRow) -> Vec<String> {
    vec![
        game.game_id.clone(),
        game.game_date.clone(),
        game.matchup.clone(),
        game.wl.clone(),
        fmt_count(game.pts),
        fmt_count(game.reb),
        fmt_count(game.ast),
        fmt_count(game.stl),
        fmt_count(game.blk),
        fmt_count(game.fg3m),
        fmt_count(game.fg3a),
        fmt_pct(game.fg3_pct),
        fmt_count(game.fgm),
        fmt_count(game.fga),
        fmt_pct(game.fg_pct),
        fmt_count(game.ftm),
        fmt_count(game.fta),
        fmt_pct(game.ft_pct),
        fmt_count(game.oreb),
        fmt_count(game.dreb),
        fmt_count(game.min),
        fmt_count(game.tov),
        fmt_count(game.pf),
        format!("{:+}", game.plus_minus),
    ]
}

fn fmt2(value: f64) -> String {
    format!("{value:.2}")
}

fn fmt_pct(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.3}")).unwrap_or_else(|| "-".to_string())
}

fn fmt_count(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::stats::{PlayerSeasonRow, compute_rolling_averages, compute_season_averages};

    fn season_row() -> PlayerSeasonRow {
        PlayerSeasonRow {
            player_id: 201939,
            season_id: "2024-25".to_string(),
            team: "GSW".to_string(),
            gp: 70,
            min: 2252.0,
            fgm: 580.0,
            fga: 1288.0,
            fg_pct: Some(0.45),
            fg3m: 311.0,
            fg3a: 781.0,
            fg3_pct: None,
            oreb: 36.0,
            dreb: 308.0,
            reb: 344.0,
            ast: 422.0,
            stl: 77.0,
            blk: 28.0,
            pts: 1718.0,
        }
    }

    fn game_row(pts: f64) -> PlayerGameLogRow {
        PlayerGameLogRow {
            season_id: "22024".to_string(),
            game_id: "0022401190".to_string(),
            game_date: "APR 13, 2025".to_string(),
            matchup: "GSW vs. LAC".to_string(),
            wl: "W".to_string(),
            min: 36.0,
            fgm: 11.0,
            fga: 22.0,
            fg_pct: Some(0.5),
            fg3m: 5.0,
            fg3a: 12.0,
            fg3_pct: Some(0.417),
            ftm: 3.0,
            fta: 3.0,
            ft_pct: Some(1.0),
            oreb: 0.0,
            dreb: 5.0,
            reb: 5.0,
            ast: 6.0,
            stl: 1.0,
            blk: 0.0,
            tov: 2.0,
            pf: 1.0,
            pts,
            plus_minus: -3.0,
        }
    }

    #[test]
    fn headers_line_up_with_cells() {
        let season = compute_season_averages(&[season_row()], "2024-25").expect("season");
        let cells = season_cells(&season);
        assert_eq!(cells.len(), season_columns().len());
        assert_eq!(cells[0], "201939");
        assert_eq!(cells[2], "GSW");

        let log: Vec<_> = [30.0, 24.0, 18.0, 41.0].into_iter().map(game_row).collect();
        let rolling = compute_rolling_averages(&log, &[3, 5]).expect("rolling");
        for row in &rolling {
            assert_eq!(rolling_cells(row).len(), rolling_columns().len());
        }
        assert_eq!(rolling_cells(&rolling[1])[1], "4/5*");

        let game = game_log_cells(&log[0]);
        assert_eq!(game.len(), GAME_LOG_COLUMNS.len());
        assert_eq!(game[GAME_LOG_COLUMNS.len() - 1], "-3");
    }

    #[test]
    fn every_category_has_an_average_column() {
        let season = season_columns();
        let rolling = rolling_columns();
        for category in Category::ALL {
            let key = category.avg_key();
            assert!(season.contains(&key.as_str()), "{key}");
            assert!(rolling.contains(&key.as_str()), "{key}");
        }
    }

    #[test]
    fn counts_drop_trailing_zeroes() {
        assert_eq!(fmt_count(30.0), "30");
        assert_eq!(fmt_count(33.5), "33.5");
        assert_eq!(fmt_pct(None), "-");
        assert_eq!(fmt_pct(Some(0.5)), "0.500");
    }
}
