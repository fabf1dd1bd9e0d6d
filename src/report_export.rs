use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::lookup::PlayerReport;
use crate::tables;

pub struct ExportSummary {
    pub path: PathBuf,
    pub rolling_rows: usize,
    pub game_rows: usize,
}

pub fn export_file_name(report: &PlayerReport) -> String {
    let slug: String = report
        .player_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    format!("{}_{}.xlsx", slug.trim_matches('_'), report.season.season_id())
}

/// Writes Season / Recent / Game Log sheets to `path`.
pub fn export_report(path: &Path, report: &PlayerReport) -> Result<ExportSummary> {
    let season_rows = vec![
        header_row(&tables::season_columns()),
        tables::season_cells(&report.season),
    ];

    let mut rolling_rows = vec![header_row(&tables::rolling_columns())];
    rolling_rows.extend(report.rolling.iter().map(tables::rolling_cells));

    let mut game_rows = vec![header_row(&tables::GAME_LOG_COLUMNS)];
    game_rows.extend(report.recent_games.iter().map(tables::game_log_cells));

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Season")?;
        write_rows(sheet, &season_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Recent")?;
        write_rows(sheet, &rolling_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Game Log")?;
        write_rows(sheet, &game_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportSummary {
        path: path.to_path_buf(),
        rolling_rows: rolling_rows.len().saturating_sub(1),
        game_rows: game_rows.len().saturating_sub(1),
    })
}

fn header_row(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|c| c.to_string()).collect()
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            match numeric_cell(value) {
                Some(number) if row_idx > 0 => worksheet.write_number(r, c, number),
                _ => worksheet.write_string(r, c, value),
            }
            .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}

// Game ids carry leading zeroes and stay text.
fn numeric_cell(value: &str) -> Option<f64> {
    let mut chars = value.chars();
    if chars.next() == Some('0') && chars.next().is_some_and(|c| c.is_ascii_digit()) {
        return None;
    }
    value.parse::<f64>().ok()
}
