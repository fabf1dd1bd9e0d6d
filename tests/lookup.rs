use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use hoops_terminal::error::StatsError;
use hoops_terminal::lookup::{LookupOptions, build_player_report, derive_report};
use hoops_terminal::nba_fetch::{
    RosterPlayer, StatsSource, find_player_by_name, parse_all_players_json, parse_career_json,
    parse_game_log_json,
};
use hoops_terminal::stats::{Category, PlayerGameLogRow, PlayerSeasonRow};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

struct FixtureSource {
    roster: Vec<RosterPlayer>,
    career: Vec<PlayerSeasonRow>,
    games: Vec<PlayerGameLogRow>,
}

impl FixtureSource {
    fn load() -> Self {
        Self {
            roster: parse_all_players_json(&read_fixture("all_players.json")).expect("roster"),
            career: parse_career_json(&read_fixture("player_career.json")).expect("career"),
            games: parse_game_log_json(&read_fixture("player_game_log.json")).expect("games"),
        }
    }
}

impl StatsSource for FixtureSource {
    fn player_names(&self) -> Result<Vec<String>> {
        Ok(self
            .roster
            .iter()
            .filter(|p| p.active)
            .map(|p| p.name.clone())
            .collect())
    }

    fn find_player_id(&self, full_name: &str) -> Result<u32> {
        find_player_by_name(&self.roster, full_name)
            .map(|p| p.id)
            .ok_or_else(|| StatsError::NotFound(format!("player '{full_name}'")).into())
    }

    fn season_rows(&self, _player_id: u32) -> Result<Vec<PlayerSeasonRow>> {
        Ok(self.career.clone())
    }

    fn game_log(&self, _player_id: u32, _season: &str) -> Result<Vec<PlayerGameLogRow>> {
        Ok(self.games.clone())
    }
}

fn options() -> LookupOptions {
    LookupOptions {
        season: "2024-25".to_string(),
        windows: vec![3, 5, 10],
        recent_games: 10,
    }
}

#[test]
fn builds_full_report_for_known_player() {
    let source = FixtureSource::load();
    let report = build_player_report(&source, "  luka doncic ", &options()).expect("report");
    assert_eq!(report.player_id, 1629029);
    assert_eq!(report.player_name, "luka doncic");
    assert_eq!(report.season.avg(Category::Pts), 28.18);
    assert_eq!(report.rolling.len(), 3);
    assert_eq!(report.rolling[2].num_games, 10);
    assert_eq!(report.recent_games.len(), 10);
    assert_eq!(report.recent_games[0].game_id, "0022401190");
}

#[test]
fn retired_players_are_not_suggested() {
    let source = FixtureSource::load();
    let names = source.player_names().expect("names");
    assert_eq!(names.len(), 4);
    assert!(!names.iter().any(|n| n == "Kobe Bryant"));
}

#[test]
fn unknown_player_is_not_found() {
    let source = FixtureSource::load();
    let err = build_player_report(&source, "Nobody Special", &options()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StatsError>(),
        Some(StatsError::NotFound(_))
    ));
}

#[test]
fn blank_name_is_rejected_before_lookup() {
    let source = FixtureSource::load();
    let err = build_player_report(&source, "   ", &options()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<StatsError>(),
        Some(&StatsError::EmptyInput("player name"))
    );
}

#[test]
fn short_game_log_reports_insufficient_data() {
    let mut source = FixtureSource::load();
    source.games.truncate(2);
    let err = build_player_report(&source, "Luka Doncic", &options()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<StatsError>(),
        Some(&StatsError::InsufficientData {
            requested: 3,
            available: 2
        })
    );
}

#[test]
fn missing_season_is_not_found() {
    let source = FixtureSource::load();
    let opts = LookupOptions {
        season: "2019-20".to_string(),
        ..options()
    };
    let err = derive_report("Luka Doncic", 1629029, &source.career, &source.games, &opts)
        .unwrap_err();
    assert!(matches!(err, StatsError::NotFound(_)));
}

#[test]
fn long_window_on_short_log_is_partial() {
    let source = FixtureSource::load();
    let games = &source.games[..6];
    let report = derive_report("Luka Doncic", 1629029, &source.career, games, &options())
        .expect("smallest window fits");
    assert!(!report.rolling[0].is_partial());
    assert!(!report.rolling[1].is_partial());
    assert!(report.rolling[2].is_partial());
    assert_eq!(report.rolling[2].num_games, 6);
    assert_eq!(report.recent_games.len(), 6);
}

#[test]
fn retired_player_resolves_by_full_name() {
    let source = FixtureSource::load();
    assert_eq!(source.find_player_id("kobe bryant").expect("retired player"), 977);
}
