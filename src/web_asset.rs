use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::game_record::{GameKey, GameRecord};

/// Display name at time of play -> franchise, for grouping relocated teams.
pub const FRANCHISE_MAP: &[(&str, &str)] = &[
    ("Indianapolis Colts", "Colts"),
    ("Baltimore Colts", "Colts"),
    ("Las Vegas Raiders", "Raiders"),
    ("Oakland Raiders", "Raiders"),
    ("Los Angeles Raiders", "Raiders"),
    ("Los Angeles Chargers", "Chargers"),
    ("San Diego Chargers", "Chargers"),
    ("Los Angeles Rams", "Rams"),
    ("St. Louis Rams", "Rams"),
    ("Cleveland Rams", "Rams"),
    ("Tennessee Titans", "Titans"),
    ("Tennessee Oilers", "Titans"),
    ("Houston Oilers", "Titans"),
    ("Arizona Cardinals", "Cardinals"),
    ("Phoenix Cardinals", "Cardinals"),
    ("St. Louis Cardinals", "Cardinals"),
    ("Chicago Cardinals", "Cardinals"),
    ("Washington Commanders", "Washington"),
    ("Washington Football Team", "Washington"),
    ("Washington Redskins", "Washington"),
    ("New England Patriots", "Patriots"),
    ("Boston Patriots", "Patriots"),
    ("Houston Texans", "Texans"),
];

#[derive(Debug, Serialize)]
pub struct CompactGame<'a> {
    s: i32,
    w: &'a str,
    d: &'a str,
    dt: &'a str,
    tm: &'a str,
    h: &'a str,
    a: &'a str,
    hs: u32,
    #[serde(rename = "as")]
    away_score: u32,
    pt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ou: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sr: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    our: Option<&'static str>,
}

impl<'a> CompactGame<'a> {
    pub fn from_record(game: &'a GameRecord) -> Self {
        Self {
            s: game.season,
            w: &game.week,
            d: &game.day,
            dt: &game.date,
            tm: &game.kickoff_time,
            h: &game.home_team,
            a: &game.away_team,
            hs: game.home_score,
            away_score: game.away_score,
            pt: game.primetime.label(),
            sp: game.spread.map(round_tenth),
            ou: game.over_under.map(round_tenth),
            sr: game.spread_result.map(|r| r.label()),
            our: game.ou_result.map(|r| r.label()),
        }
    }
}

// Ties go to the even tenth, so a 2.25 line reads 2.2.
fn round_tenth(v: f64) -> f64 {
    (v * 10.0).round_ties_even() / 10.0
}

/// Drops later games sharing `(season, date, home, away)` with an earlier
/// one, then orders by season and date. The sort is stable, so ties keep input order.
pub fn dedup_and_sort(games: Vec<GameRecord>) -> Vec<GameRecord> {
    let mut seen: HashSet<GameKey> = HashSet::new();
    let mut unique: Vec<GameRecord> = games
        .into_iter()
        .filter(|game| seen.insert(game.key()))
        .collect();
    unique.sort_by(|a, b| a.season.cmp(&b.season).then_with(|| a.date.cmp(&b.date)));
    unique
}

pub fn render_data_js(games: &[GameRecord]) -> Result<String> {
    let mut lines = Vec::with_capacity(games.len());
    for game in games {
        lines.push(serde_json::to_string(&CompactGame::from_record(game)).context("serialize game")?);
    }

    let mut out = format!(
        "// Auto-generated from NFL score data - {} games\n",
        games.len()
    );
    out.push_str("const NFL_GAMES = [\n");
    out.push_str(&lines.join(",\n"));
    out.push_str("\n];\n\n");
    out.push_str("const FRANCHISE_MAP = ");
    out.push_str(&render_franchise_map()?);
    out.push_str(";\n");
    Ok(out)
}

// Written by hand to keep the listed order.
fn render_franchise_map() -> Result<String> {
    let mut entries = Vec::with_capacity(FRANCHISE_MAP.len());
    for (name, franchise) in FRANCHISE_MAP {
        let key = serde_json::to_string(name).context("serialize franchise name")?;
        let value = serde_json::to_string(franchise).context("serialize franchise")?;
        entries.push(format!("  {key}: {value}"));
    }
    Ok(format!("{{\n{}\n}}", entries.join(",\n")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebAssetReport {
    pub games_in: usize,
    pub games_written: usize,
    pub bytes: usize,
}

pub fn write_data_js(path: &Path, games: Vec<GameRecord>) -> Result<WebAssetReport> {
    let games_in = games.len();
    let unique = dedup_and_sort(games);
    let js = render_data_js(&unique)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir {}", parent.display()))?;
    }
    fs::write(path, &js).with_context(|| format!("write {}", path.display()))?;

    Ok(WebAssetReport {
        games_in,
        games_written: unique.len(),
        bytes: js.len(),
    })
}
