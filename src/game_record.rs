use std::fmt;

use serde::{Deserialize, Serialize};

pub const TIE: &str = "Tie";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PrimetimeSlot {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "MNF")]
    Mnf,
    #[serde(rename = "TNF")]
    Tnf,
    #[serde(rename = "SNF")]
    Snf,
    #[serde(rename = "Saturday Primetime")]
    SaturdayPrimetime,
}

impl PrimetimeSlot {
    pub fn label(self) -> &'static str {
        match self {
            PrimetimeSlot::None => "",
            PrimetimeSlot::Mnf => "MNF",
            PrimetimeSlot::Tnf => "TNF",
            PrimetimeSlot::Snf => "SNF",
            PrimetimeSlot::SaturdayPrimetime => "Saturday Primetime",
        }
    }

    pub fn is_primetime(self) -> bool {
        self != PrimetimeSlot::None
    }
}

impl fmt::Display for PrimetimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpreadResult {
    Covered,
    Lost,
    Push,
}

impl SpreadResult {
    pub fn label(self) -> &'static str {
        match self {
            SpreadResult::Covered => "Covered",
            SpreadResult::Lost => "Lost",
            SpreadResult::Push => "Push",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OuResult {
    Over,
    Under,
    Push,
}

impl OuResult {
    pub fn label(self) -> &'static str {
        match self {
            OuResult::Over => "Over",
            OuResult::Under => "Under",
            OuResult::Push => "Push",
        }
    }
}

/// Natural key of a game: `(season, date, home, away)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameKey {
    pub season: i32,
    pub date: String,
    pub home_team: String,
    pub away_team: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub season: i32,
    pub week: String,
    pub day: String,
    pub date: String,
    pub kickoff_time: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
    pub score_diff: u32,
    pub winner: String,
    #[serde(default)]
    pub primetime: PrimetimeSlot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub over_under: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread_result: Option<SpreadResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ou_result: Option<OuResult>,
}

impl GameRecord {
    pub fn key(&self) -> GameKey {
        GameKey {
            season: self.season,
            date: self.date.clone(),
            home_team: self.home_team.clone(),
            away_team: self.away_team.clone(),
        }
    }

    pub fn is_tie(&self) -> bool {
        self.home_score == self.away_score
    }

    pub fn total_points(&self) -> u64 {
        u64::from(self.home_score) + u64::from(self.away_score)
    }

    pub fn has_betting(&self) -> bool {
        self.spread.is_some()
            || self.over_under.is_some()
            || self.spread_result.is_some()
            || self.ou_result.is_some()
    }

    pub fn clear_betting(&mut self) {
        self.spread = None;
        self.over_under = None;
        self.spread_result = None;
        self.ou_result = None;
    }
}

pub fn score_diff(home_score: u32, away_score: u32) -> u32 {
    home_score.abs_diff(away_score)
}
