use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::game_record::{GameRecord, TIE, score_diff};
use crate::primetime;
use crate::schedule_table::RawGameRow;

const AWAY_MARKER: &str = "@";
const PLACEHOLDER_SORT_KEY: &str = "zz";

static ISO_DATE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}").expect("static date pattern is valid"));

/// The results table lists winner/loser, not home/away. An `@` in the
/// location column means the winner-column team played on the road.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationMarker {
    Marked,
    Unmarked,
}

impl LocationMarker {
    pub fn from_cell(raw: &str) -> Self {
        if raw.trim() == AWAY_MARKER {
            LocationMarker::Marked
        } else {
            LocationMarker::Unmarked
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeAway {
    pub home: String,
    pub away: String,
    pub home_score: u32,
    pub away_score: u32,
}

pub fn resolve_home_away(
    marker: LocationMarker,
    winner: &str,
    loser: &str,
    pts_win: u32,
    pts_lose: u32,
) -> HomeAway {
    match marker {
        LocationMarker::Marked => HomeAway {
            home: loser.to_string(),
            away: winner.to_string(),
            home_score: pts_lose,
            away_score: pts_win,
        },
        LocationMarker::Unmarked => HomeAway {
            home: winner.to_string(),
            away: loser.to_string(),
            home_score: pts_win,
            away_score: pts_lose,
        },
    }
}

/// Prefers the sort key when it is a real `YYYY-MM-DD` date, else the visible text verbatim.
pub fn resolve_date(sort_key: Option<&str>, text: Option<&str>) -> String {
    if let Some(key) = sort_key
        && !key.starts_with(PLACEHOLDER_SORT_KEY)
        && starts_with_iso_date(key)
    {
        return key.to_string();
    }
    text.unwrap_or_default().to_string()
}

fn starts_with_iso_date(raw: &str) -> bool {
    ISO_DATE_PREFIX.is_match(raw) && NaiveDate::parse_from_str(&raw[..10], "%Y-%m-%d").is_ok()
}

/// Missing or non-numeric point cells count as zero.
pub fn parse_points(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .unwrap_or(0)
}

fn is_team_name(winner: &str) -> bool {
    !winner.is_empty()
        && !winner.starts_with("Week")
        && winner.chars().any(|c| c.is_alphabetic())
}

/// Turns one table row into a game, or `None` for separator and header rows.
pub fn extract_game(season: i32, row: &RawGameRow) -> Option<GameRecord> {
    let (Some(winner), Some(loser)) = (row.winner.as_deref(), row.loser.as_deref()) else {
        return None;
    };
    if !is_team_name(winner) {
        return None;
    }

    let pts_win = parse_points(row.pts_win.as_deref());
    let pts_lose = parse_points(row.pts_lose.as_deref());
    let marker = LocationMarker::from_cell(row.location.as_deref().unwrap_or_default());
    let sides = resolve_home_away(marker, winner, loser, pts_win, pts_lose);

    let day = row.day.clone().unwrap_or_default();
    let kickoff_time = row.kickoff_time.clone().unwrap_or_default();
    let primetime = primetime::classify(&day, &kickoff_time, season);

    let winner = if pts_win == pts_lose {
        TIE.to_string()
    } else {
        winner.to_string()
    };

    Some(GameRecord {
        season,
        week: row.week.clone().unwrap_or_default(),
        day,
        date: resolve_date(row.date_sort_key.as_deref(), row.date_text.as_deref()),
        kickoff_time,
        home_team: sides.home,
        away_team: sides.away,
        home_score: sides.home_score,
        away_score: sides.away_score,
        score_diff: score_diff(pts_win, pts_lose),
        winner,
        primetime,
        spread: None,
        over_under: None,
        spread_result: None,
        ou_result: None,
    })
}

pub fn extract_games(season: i32, rows: &[RawGameRow]) -> Vec<GameRecord> {
    rows.iter()
        .filter_map(|row| extract_game(season, row))
        .collect()
}
