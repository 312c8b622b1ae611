use tracing::debug;

use crate::betting_lines::BettingLookup;
use crate::game_record::{GameRecord, OuResult, SpreadResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub matched: usize,
    pub eligible: usize,
}

impl MergeReport {
    pub fn add(&mut self, other: MergeReport) {
        self.matched += other.matched;
        self.eligible += other.eligible;
    }

    pub fn match_pct(&self) -> Option<f64> {
        (self.eligible > 0).then(|| self.matched as f64 / self.eligible as f64 * 100.0)
    }
}

/// Exact comparison against the line; no rounding or tolerance.
pub fn spread_result(home_score: u32, away_score: u32, spread: Option<f64>) -> Option<SpreadResult> {
    let adjusted = home_score as f64 + spread?;
    let away = away_score as f64;
    Some(if adjusted > away {
        SpreadResult::Covered
    } else if adjusted < away {
        SpreadResult::Lost
    } else {
        SpreadResult::Push
    })
}

pub fn over_under_result(home_score: u32, away_score: u32, total: Option<f64>) -> Option<OuResult> {
    let line = total?;
    let points = home_score as f64 + away_score as f64;
    Some(if points > line {
        OuResult::Over
    } else if points < line {
        OuResult::Under
    } else {
        OuResult::Push
    })
}

/// The lookup key a stored game is matched under: first ten characters of
/// the date and the home team text, both trimmed. No name normalization.
pub fn lookup_key(game: &GameRecord) -> Option<(String, String)> {
    let date: String = game.date.trim().chars().take(10).collect();
    let home = game.home_team.trim();
    if date.is_empty() || home.is_empty() {
        return None;
    }
    Some((date, home.to_string()))
}

/// Joins closing lines onto games in place. Only the four betting fields are
/// written; a miss clears them so repeated runs give the same result.
pub fn merge_betting_lines(games: &mut [GameRecord], lookup: &BettingLookup) -> MergeReport {
    let mut report = MergeReport::default();
    for game in games.iter_mut() {
        let Some((date, home)) = lookup_key(game) else {
            continue;
        };
        report.eligible += 1;

        match lookup.get(&date, &home) {
            Some(line) => {
                report.matched += 1;
                game.spread = line.spread;
                game.over_under = line.over_under;
                game.spread_result = spread_result(game.home_score, game.away_score, line.spread);
                game.ou_result =
                    over_under_result(game.home_score, game.away_score, line.over_under);
            }
            None => {
                debug!(%date, %home, "no betting line");
                game.clear_betting();
            }
        }
    }
    report
}
