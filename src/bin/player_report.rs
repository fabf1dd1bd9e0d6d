use std::path::PathBuf;

use anyhow::{Context, Result};

use hoops_terminal::config::Config;
use hoops_terminal::lookup::{LookupOptions, build_player_report};
use hoops_terminal::nba_fetch::NbaStatsSource;
use hoops_terminal::report_export::export_report;
use hoops_terminal::tables;

struct Args {
    player: String,
    season: Option<String>,
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = parse_args().context("usage: player_report <full name> [--season 2024-25] [--export out.xlsx]")?;
    let mut cfg = Config::from_env();
    if let Some(season) = args.season {
        cfg.season = season;
    }

    let source = NbaStatsSource::new(&cfg);
    let report = build_player_report(&source, &args.player, &LookupOptions::from(&cfg))?;

    println!("{} (#{}) {}", report.player_name, report.player_id, cfg.season);
    println!();
    print_table(
        "Season averages",
        &tables::season_columns(),
        &[tables::season_cells(&report.season)],
    );
    let rolling: Vec<Vec<String>> = report.rolling.iter().map(tables::rolling_cells).collect();
    print_table("Recent averages", &tables::rolling_columns(), &rolling);
    let games: Vec<Vec<String>> = report
        .recent_games
        .iter()
        .map(tables::game_log_cells)
        .collect();
    print_table("Game log", &tables::GAME_LOG_COLUMNS, &games);

    if let Some(path) = args.export {
        let summary = export_report(&path, &report)?;
        println!(
            "Exported {} ({} recent rows, {} games)",
            summary.path.display(),
            summary.rolling_rows,
            summary.game_rows
        );
    }
    Ok(())
}

fn print_table(title: &str, columns: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(idx) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }
    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, w)| format!("{cell:>w$}"))
            .collect::<Vec<_>>()
            .join(" ")
    };

    println!("{title}");
    println!("{}", line(columns.to_vec()));
    for row in rows {
        println!("{}", line(row.iter().map(String::as_str).collect()));
    }
    println!();
}

fn parse_args() -> Option<Args> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut name_parts = Vec::new();
    let mut season = None;
    let mut export = None;
    let mut idx = 0;
    while idx < args.len() {
        let arg = &args[idx];
        if let Some(value) = arg.strip_prefix("--season=") {
            season = non_empty(value);
        } else if arg == "--season" {
            idx += 1;
            season = args.get(idx).and_then(|v| non_empty(v));
        } else if let Some(value) = arg.strip_prefix("--export=") {
            export = non_empty(value).map(PathBuf::from);
        } else if arg == "--export" {
            idx += 1;
            export = args.get(idx).and_then(|v| non_empty(v)).map(PathBuf::from);
        } else {
            name_parts.push(arg.clone());
        }
        idx += 1;
    }
    let player = name_parts.join(" ");
    if player.trim().is_empty() {
        return None;
    }
    Some(Args {
        player,
        season,
        export,
    })
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
