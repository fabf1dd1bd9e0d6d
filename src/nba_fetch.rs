use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use once_cell::unsync::OnceCell;
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::StatsError;
use crate::http_cache::fetch_json_cached;
use crate::http_client::http_client;
use crate::stats::{PlayerGameLogRow, PlayerSeasonRow};

const STATS_HEADERS: [(&str, &str); 5] = [
    ("Accept", "application/json, text/plain, */*"),
    ("Referer", "https://www.nba.com/"),
    ("Origin", "https://www.nba.com"),
    ("x-nba-stats-origin", "stats"),
    ("x-nba-stats-token", "true"),
];

const ROSTER_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);
const STATS_MAX_AGE: Duration = Duration::from_secs(15 * 60);

const CAREER_SET: &str = "SeasonTotalsRegularSeason";
const GAME_LOG_SET: &str = "PlayerGameLog";
const ALL_PLAYERS_SET: &str = "CommonAllPlayers";

/// Supplier of raw rows for one player.
pub trait StatsSource {
    /// Active players' display names, roster order.
    fn player_names(&self) -> Result<Vec<String>>;
    fn find_player_id(&self, full_name: &str) -> Result<u32>;
    fn season_rows(&self, player_id: u32) -> Result<Vec<PlayerSeasonRow>>;
    /// Games of `season`, most recent first.
    fn game_log(&self, player_id: u32, season: &str) -> Result<Vec<PlayerGameLogRow>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct RosterPlayer {
    pub id: u32,
    pub name: String,
    pub active: bool,
}

pub struct NbaStatsSource {
    base_url: String,
    season: String,
    season_type: String,
    timeout_secs: u64,
    roster: OnceCell<Vec<RosterPlayer>>,
}

impl NbaStatsSource {
    pub fn new(cfg: &Config) -> Self {
        Self {
            base_url: cfg.stats_base_url.clone(),
            season: cfg.season.clone(),
            season_type: cfg.season_type.clone(),
            timeout_secs: cfg.http_timeout_secs,
            roster: OnceCell::new(),
        }
    }

    fn roster(&self) -> Result<&[RosterPlayer]> {
        let roster = self.roster.get_or_try_init(|| {
            let url = format!(
                "{}/commonallplayers?LeagueID=00&Season={}&IsOnlyCurrentSeason=0",
                self.base_url,
                query_value(&self.season)
            );
            let body = self.get(&url, ROSTER_MAX_AGE).context("player index")?;
            parse_all_players_json(&body)
        })?;
        Ok(roster.as_slice())
    }

    fn get(&self, url: &str, max_age: Duration) -> Result<String> {
        let client = http_client(self.timeout_secs)?;
        fetch_json_cached(client, url, &STATS_HEADERS, max_age)
    }
}

impl StatsSource for NbaStatsSource {
    fn player_names(&self) -> Result<Vec<String>> {
        Ok(self
            .roster()?
            .iter()
            .filter(|p| p.active)
            .map(|p| p.name.clone())
            .collect())
    }

    fn find_player_id(&self, full_name: &str) -> Result<u32> {
        let roster = self.roster()?;
        let player = find_player_by_name(roster, full_name)
            .ok_or_else(|| StatsError::NotFound(format!("player '{}'", full_name.trim())))?;
        Ok(player.id)
    }

    fn season_rows(&self, player_id: u32) -> Result<Vec<PlayerSeasonRow>> {
        let url = format!(
            "{}/playercareerstats?PlayerID={player_id}&PerMode=Totals&LeagueID=00",
            self.base_url
        );
        let body = self.get(&url, STATS_MAX_AGE).context("career stats")?;
        parse_career_json(&body)
    }

    fn game_log(&self, player_id: u32, season: &str) -> Result<Vec<PlayerGameLogRow>> {
        let url = format!(
            "{}/playergamelog?PlayerID={player_id}&Season={}&SeasonType={}",
            self.base_url,
            query_value(season),
            query_value(&self.season_type)
        );
        let body = self.get(&url, STATS_MAX_AGE).context("game log")?;
        parse_game_log_json(&body)
    }
}

/// Case-insensitive full-name match; an active player wins over a retired
/// namesake.
pub fn find_player_by_name<'a>(roster: &'a [RosterPlayer], full_name: &str) -> Option<&'a RosterPlayer> {
    let wanted = normalize_name(full_name);
    if wanted.is_empty() {
        return None;
    }
    let mut matches = roster.iter().filter(|p| normalize_name(&p.name) == wanted);
    let first = matches.next()?;
    if first.active {
        return Some(first);
    }
    Some(std::iter::once(first).chain(matches).find(|p| p.active).unwrap_or(first))
}

fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn query_value(raw: &str) -> String {
    raw.trim().replace(' ', "+")
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(rename = "resultSets", default)]
    result_sets: Vec<ResultSet>,
}

#[derive(Debug, Deserialize)]
struct ResultSet {
    #[serde(default)]
    name: String,
    headers: Vec<String>,
    #[serde(rename = "rowSet", default)]
    row_set: Vec<Vec<Value>>,
}

/// Header-indexed view over one result set.
struct Table<'a> {
    name: &'a str,
    columns: HashMap<String, usize>,
    rows: &'a [Vec<Value>],
}

impl<'a> Table<'a> {
    fn new(set: &'a ResultSet) -> Self {
        let columns = set
            .headers
            .iter()
            .enumerate()
            .map(|(idx, h)| (h.to_ascii_uppercase(), idx))
            .collect();
        Self {
            name: &set.name,
            columns,
            rows: &set.row_set,
        }
    }

    fn col(&self, header: &str) -> Result<usize> {
        self.columns
            .get(header)
            .copied()
            .ok_or_else(|| anyhow!("{}: missing column {header}", self.name))
    }

    fn opt_col(&self, header: &str) -> Option<usize> {
        self.columns.get(header).copied()
    }
}

fn parse_response(raw: &str) -> Result<StatsResponse> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(StatsResponse {
            result_sets: Vec::new(),
        });
    }
    serde_json::from_str(trimmed).context("invalid stats json")
}

fn pick_set<'a>(resp: &'a StatsResponse, name: &str) -> Result<&'a ResultSet> {
    resp.result_sets
        .iter()
        .find(|set| set.name.eq_ignore_ascii_case(name))
        .or_else(|| resp.result_sets.first())
        .ok_or_else(|| anyhow!("response has no result sets"))
}

pub fn parse_career_json(raw: &str) -> Result<Vec<PlayerSeasonRow>> {
    let resp = parse_response(raw)?;
    if resp.result_sets.is_empty() {
        return Ok(Vec::new());
    }
    let table = Table::new(pick_set(&resp, CAREER_SET)?);

    let player_id = table.col("PLAYER_ID")?;
    let season_id = table.col("SEASON_ID")?;
    let team = table.col("TEAM_ABBREVIATION")?;
    let gp = table.col("GP")?;
    let min = table.col("MIN")?;
    let fgm = table.col("FGM")?;
    let fga = table.col("FGA")?;
    let fg_pct = table.opt_col("FG_PCT");
    let fg3m = table.col("FG3M")?;
    let fg3a = table.col("FG3A")?;
    let fg3_pct = table.opt_col("FG3_PCT");
    let oreb = table.col("OREB")?;
    let dreb = table.col("DREB")?;
    let reb = table.col("REB")?;
    let ast = table.col("AST")?;
    let stl = table.col("STL")?;
    let blk = table.col("BLK")?;
    let pts = table.col("PTS")?;

    let rows = table
        .rows
        .iter()
        .map(|row| PlayerSeasonRow {
            player_id: cell_f64(row, player_id).unwrap_or(0.0) as u32,
            season_id: cell_string(row, season_id),
            team: cell_string(row, team),
            gp: cell_f64(row, gp).unwrap_or(0.0) as u32,
            min: cell_f64(row, min).unwrap_or(0.0),
            fgm: cell_f64(row, fgm).unwrap_or(0.0),
            fga: cell_f64(row, fga).unwrap_or(0.0),
            fg_pct: fg_pct.and_then(|idx| cell_f64(row, idx)),
            fg3m: cell_f64(row, fg3m).unwrap_or(0.0),
            fg3a: cell_f64(row, fg3a).unwrap_or(0.0),
            fg3_pct: fg3_pct.and_then(|idx| cell_f64(row, idx)),
            oreb: cell_f64(row, oreb).unwrap_or(0.0),
            dreb: cell_f64(row, dreb).unwrap_or(0.0),
            reb: cell_f64(row, reb).unwrap_or(0.0),
            ast: cell_f64(row, ast).unwrap_or(0.0),
            stl: cell_f64(row, stl).unwrap_or(0.0),
            blk: cell_f64(row, blk).unwrap_or(0.0),
            pts: cell_f64(row, pts).unwrap_or(0.0),
        })
        .collect();
    Ok(rows)
}

pub fn parse_game_log_json(raw: &str) -> Result<Vec<PlayerGameLogRow>> {
    let resp = parse_response(raw)?;
    if resp.result_sets.is_empty() {
        return Ok(Vec::new());
    }
    let table = Table::new(pick_set(&resp, GAME_LOG_SET)?);

    let season_id = table.opt_col("SEASON_ID");
    let game_id = table.col("GAME_ID")?;
    let game_date = table.col("GAME_DATE")?;
    let matchup = table.col("MATCHUP")?;
    let wl = table.opt_col("WL");
    let num = |header: &str| table.col(header);
    let (min, fgm, fga, fg3m, fg3a) = (num("MIN")?, num("FGM")?, num("FGA")?, num("FG3M")?, num("FG3A")?);
    let (oreb, dreb, reb, ast) = (num("OREB")?, num("DREB")?, num("REB")?, num("AST")?);
    let (stl, blk, pts) = (num("STL")?, num("BLK")?, num("PTS")?);
    let opt = |header: &str| table.opt_col(header);
    let (fg_pct, fg3_pct, ft_pct) = (opt("FG_PCT"), opt("FG3_PCT"), opt("FT_PCT"));
    let (ftm, fta, tov, pf, plus_minus) = (opt("FTM"), opt("FTA"), opt("TOV"), opt("PF"), opt("PLUS_MINUS"));

    let value = |row: &[Value], idx: usize| cell_f64(row, idx).unwrap_or(0.0);
    let opt_value = |row: &[Value], idx: Option<usize>| idx.and_then(|i| cell_f64(row, i));

    let mut rows: Vec<PlayerGameLogRow> = table
        .rows
        .iter()
        .map(|row| PlayerGameLogRow {
            season_id: season_id.map(|idx| cell_string(row, idx)).unwrap_or_default(),
            game_id: cell_string(row, game_id),
            game_date: cell_string(row, game_date),
            matchup: cell_string(row, matchup),
            wl: wl.map(|idx| cell_string(row, idx)).unwrap_or_default(),
            min: value(row, min),
            fgm: value(row, fgm),
            fga: value(row, fga),
            fg_pct: opt_value(row, fg_pct),
            fg3m: value(row, fg3m),
            fg3a: value(row, fg3a),
            fg3_pct: opt_value(row, fg3_pct),
            ftm: opt_value(row, ftm).unwrap_or(0.0),
            fta: opt_value(row, fta).unwrap_or(0.0),
            ft_pct: opt_value(row, ft_pct),
            oreb: value(row, oreb),
            dreb: value(row, dreb),
            reb: value(row, reb),
            ast: value(row, ast),
            stl: value(row, stl),
            blk: value(row, blk),
            tov: opt_value(row, tov).unwrap_or(0.0),
            pf: opt_value(row, pf).unwrap_or(0.0),
            pts: value(row, pts),
            plus_minus: opt_value(row, plus_minus).unwrap_or(0.0),
        })
        .collect();
    order_most_recent_first(&mut rows);
    Ok(rows)
}

pub fn parse_all_players_json(raw: &str) -> Result<Vec<RosterPlayer>> {
    let resp = parse_response(raw)?;
    if resp.result_sets.is_empty() {
        return Ok(Vec::new());
    }
    let table = Table::new(pick_set(&resp, ALL_PLAYERS_SET)?);
    let id = table.col("PERSON_ID")?;
    let display_name = table.col("DISPLAY_FIRST_LAST")?;
    let status = table.opt_col("ROSTERSTATUS");

    let players = table
        .rows
        .iter()
        .filter_map(|row| {
            let name = cell_string(row, display_name);
            if name.is_empty() {
                return None;
            }
            let active = status
                .and_then(|idx| row.get(idx))
                .map(roster_status_active)
                .unwrap_or(true);
            Some(RosterPlayer {
                id: cell_f64(row, id)? as u32,
                name,
                active,
            })
        })
        .collect();
    Ok(players)
}

/// Stable sort by game date, newest first. Left untouched when any date
/// fails to parse, since the endpoint already answers newest first.
pub fn order_most_recent_first(rows: &mut [PlayerGameLogRow]) {
    let dates: Option<Vec<NaiveDate>> = rows.iter().map(|r| parse_game_date(&r.game_date)).collect();
    let Some(dates) = dates else {
        return;
    };
    let mut keyed: Vec<(NaiveDate, PlayerGameLogRow)> = dates.into_iter().zip(rows.iter().cloned()).collect();
    keyed.sort_by(|a, b| b.0.cmp(&a.0));
    for (slot, (_, row)) in rows.iter_mut().zip(keyed) {
        *slot = row;
    }
}

pub fn parse_game_date(raw: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 4] = ["%b %d, %Y", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d", "%m/%d/%Y"];

    let cleaned = raw.trim();
    for fmt in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(cleaned, fmt) {
            return Some(date);
        }
    }
    None
}

fn roster_status_active(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64().map(|v| v > 0.0).unwrap_or(false),
        Value::String(s) => matches!(s.trim(), "1" | "Active" | "active"),
        Value::Bool(b) => *b,
        _ => false,
    }
}

fn cell_f64(row: &[Value], idx: usize) -> Option<f64> {
    match row.get(idx)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn cell_string(row: &[Value], idx: usize) -> String {
    match row.get(idx) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: u32, name: &str, active: bool) -> RosterPlayer {
        RosterPlayer {
            id,
            name: name.to_string(),
            active,
        }
    }

    #[test]
    fn name_lookup_ignores_case_and_spacing() {
        let roster = vec![player(2544, "LeBron James", true), player(1629029, "Luka Doncic", true)];
        let found = find_player_by_name(&roster, "  luka   DONCIC ").expect("player");
        assert_eq!(found.id, 1629029);
        assert!(find_player_by_name(&roster, "Luka").is_none());
        assert!(find_player_by_name(&roster, "").is_none());
    }

    #[test]
    fn name_lookup_prefers_active_namesake() {
        let roster = vec![player(1, "Marcus Williams", false), player(2, "Marcus Williams", true)];
        assert_eq!(find_player_by_name(&roster, "marcus williams").map(|p| p.id), Some(2));
    }

    #[test]
    fn game_dates_parse_stats_format() {
        assert_eq!(
            parse_game_date("APR 13, 2025"),
            NaiveDate::from_ymd_opt(2025, 4, 13)
        );
        assert_eq!(
            parse_game_date("2025-04-13T00:00:00"),
            NaiveDate::from_ymd_opt(2025, 4, 13)
        );
        assert_eq!(parse_game_date("yesterday"), None);
    }

    #[test]
    fn query_values_encode_spaces() {
        assert_eq!(query_value(" Regular Season "), "Regular+Season");
    }
}
