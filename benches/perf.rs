use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use hoops_terminal::name_matcher::{build_index, suggest};
use hoops_terminal::nba_fetch::{parse_career_json, parse_game_log_json};
use hoops_terminal::stats::{compute_rolling_averages, compute_season_averages};

fn bench_suggest(c: &mut Criterion) {
    let index = build_index((0..5_000).map(|idx| format!("Player{idx:04} Surname{}", idx % 97)));

    c.bench_function("suggest_prefix", |b| {
        b.iter(|| {
            let hits = suggest(black_box(&index), black_box("player49"));
            black_box(hits.len());
        })
    });
}

fn bench_game_log_parse(c: &mut Criterion) {
    c.bench_function("game_log_parse", |b| {
        b.iter(|| {
            let rows = parse_game_log_json(black_box(GAME_LOG_JSON)).unwrap();
            black_box(rows.len());
        })
    });
}

fn bench_rolling_averages(c: &mut Criterion) {
    let games = parse_game_log_json(GAME_LOG_JSON).expect("valid fixture json");

    c.bench_function("rolling_averages", |b| {
        b.iter(|| {
            let rows = compute_rolling_averages(black_box(&games), black_box(&[3, 5, 10])).unwrap();
            black_box(rows.len());
        })
    });
}

fn bench_season_averages(c: &mut Criterion) {
    let rows = parse_career_json(CAREER_JSON).expect("valid fixture json");

    c.bench_function("season_averages", |b| {
        b.iter(|| {
            let season = compute_season_averages(black_box(&rows), black_box("2024-25")).unwrap();
            black_box(season.num_games);
        })
    });
}

criterion_group!(
    perf,
    bench_suggest,
    bench_game_log_parse,
    bench_rolling_averages,
    bench_season_averages
);
criterion_main!(perf);

static GAME_LOG_JSON: &str = include_str!("../tests/fixtures/player_game_log.json");
static CAREER_JSON: &str = include_str!("../tests/fixtures/player_career.json");
