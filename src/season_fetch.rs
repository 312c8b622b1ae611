use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::game_extract::extract_games;
use crate::game_record::GameRecord;
use crate::http_client::PageFetcher;
use crate::schedule_table::{ScheduleTable, parse_schedule_table};

const STATUS_OK: u16 = 200;
const STATUS_TOO_MANY_REQUESTS: u16 = 429;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// A 429 on attempt `n` waits `n * rate_limit_step`.
    pub rate_limit_step: Duration,
    /// Wait after any other failed attempt.
    pub retry_wait: Duration,
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            rate_limit_step: Duration::from_secs(15),
            retry_wait: Duration::from_secs(5),
            attempt_timeout: Duration::from_secs(45),
        }
    }
}

pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    RateLimited,
    Status(u16),
    EmptyBody,
    Transport(String),
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptFailure::RateLimited => write!(f, "rate limited (429)"),
            AttemptFailure::Status(code) => write!(f, "http {code}"),
            AttemptFailure::EmptyBody => write!(f, "empty body"),
            AttemptFailure::Transport(err) => write!(f, "fetch error: {err}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Page(String),
    Unavailable {
        attempts: u32,
        last_failure: AttemptFailure,
    },
}

// Lives for exactly one season's fetch.
enum FetchState {
    Attempting(u32),
    Waiting {
        attempt: u32,
        wait: Duration,
        failure: AttemptFailure,
    },
    Done(FetchOutcome),
}

pub fn fetch_season_page(
    fetcher: &dyn PageFetcher,
    sleeper: &mut dyn Sleeper,
    policy: &RetryPolicy,
    url: &str,
) -> FetchOutcome {
    let max_attempts = policy.max_attempts.max(1);
    let mut state = FetchState::Attempting(1);
    loop {
        state = match state {
            FetchState::Attempting(attempt) => {
                debug!(url, attempt, "fetching");
                match fetcher.get(url, policy.attempt_timeout) {
                    Ok(resp) if resp.status == STATUS_OK && !resp.body.is_empty() => {
                        FetchState::Done(FetchOutcome::Page(resp.body))
                    }
                    Ok(resp) if resp.status == STATUS_TOO_MANY_REQUESTS => FetchState::Waiting {
                        attempt,
                        wait: policy.rate_limit_step * attempt,
                        failure: AttemptFailure::RateLimited,
                    },
                    Ok(resp) => FetchState::Waiting {
                        attempt,
                        wait: policy.retry_wait,
                        failure: if resp.status == STATUS_OK {
                            AttemptFailure::EmptyBody
                        } else {
                            AttemptFailure::Status(resp.status)
                        },
                    },
                    Err(err) => FetchState::Waiting {
                        attempt,
                        wait: policy.retry_wait,
                        failure: AttemptFailure::Transport(format!("{err:#}")),
                    },
                }
            }
            FetchState::Waiting {
                attempt,
                wait,
                failure,
            } => {
                warn!(
                    url,
                    attempt,
                    wait_secs = wait.as_secs_f64(),
                    "{failure}, waiting before retry"
                );
                sleeper.sleep(wait);
                if attempt >= max_attempts {
                    FetchState::Done(FetchOutcome::Unavailable {
                        attempts: attempt,
                        last_failure: failure,
                    })
                } else {
                    FetchState::Attempting(attempt + 1)
                }
            }
            FetchState::Done(outcome) => return outcome,
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeasonFailure {
    Unavailable {
        attempts: u32,
        last_failure: AttemptFailure,
    },
    NoTable,
    NoBody,
    NoRows,
}

impl fmt::Display for SeasonFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonFailure::Unavailable {
                attempts,
                last_failure,
            } => write!(f, "unavailable after {attempts} attempts ({last_failure})"),
            SeasonFailure::NoTable => write!(f, "no table found"),
            SeasonFailure::NoBody => write!(f, "no tbody found"),
            SeasonFailure::NoRows => write!(f, "no games found"),
        }
    }
}

pub fn scrape_season(
    fetcher: &dyn PageFetcher,
    sleeper: &mut dyn Sleeper,
    policy: &RetryPolicy,
    season: i32,
    url: &str,
) -> Result<Vec<GameRecord>, SeasonFailure> {
    let html = match fetch_season_page(fetcher, sleeper, policy, url) {
        FetchOutcome::Page(html) => html,
        FetchOutcome::Unavailable {
            attempts,
            last_failure,
        } => {
            return Err(SeasonFailure::Unavailable {
                attempts,
                last_failure,
            });
        }
    };

    let rows = match parse_schedule_table(&html) {
        ScheduleTable::Rows(rows) => rows,
        ScheduleTable::NoTable => return Err(SeasonFailure::NoTable),
        ScheduleTable::NoBody => return Err(SeasonFailure::NoBody),
    };
    let games = extract_games(season, &rows);
    if games.is_empty() {
        return Err(SeasonFailure::NoRows);
    }
    Ok(games)
}

#[derive(Debug, Clone, Default)]
pub struct ScrapeSummary {
    pub games: Vec<GameRecord>,
    pub seasons_total: usize,
    pub seasons_succeeded: usize,
    pub failed: Vec<(i32, SeasonFailure)>,
}

impl ScrapeSummary {
    pub fn failed_seasons(&self) -> Vec<i32> {
        self.failed.iter().map(|(season, _)| *season).collect()
    }
}

pub struct SeasonRun<'a> {
    pub seasons: std::ops::RangeInclusive<i32>,
    pub policy: &'a RetryPolicy,
    pub request_delay: Duration,
    pub url_for: &'a dyn Fn(i32) -> String,
}

/// Fetches seasons one after another, sleeping `request_delay` between
/// seasons (never after the last). A failed season is recorded and skipped.
pub fn scrape_seasons(
    fetcher: &dyn PageFetcher,
    sleeper: &mut dyn Sleeper,
    run: &SeasonRun<'_>,
) -> ScrapeSummary {
    let mut summary = ScrapeSummary::default();
    let last = *run.seasons.end();

    for season in run.seasons.clone() {
        summary.seasons_total += 1;
        let url = (run.url_for)(season);
        info!(season, %url, "scraping season");

        match scrape_season(fetcher, sleeper, run.policy, season, &url) {
            Ok(games) => {
                info!(season, games = games.len(), "season scraped");
                summary.seasons_succeeded += 1;
                summary.games.extend(games);
            }
            Err(failure) => {
                warn!(season, "season failed: {failure}");
                summary.failed.push((season, failure));
            }
        }

        if season < last {
            sleeper.sleep(run.request_delay);
        }
    }

    summary
}
