use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use anyhow::{Result, anyhow};

use nfl_history::http_client::{PageFetcher, PageResponse};
use nfl_history::season_fetch::{
    AttemptFailure, FetchOutcome, RetryPolicy, SeasonFailure, SeasonRun, Sleeper,
    fetch_season_page, scrape_seasons,
};

const GAMES_HTML: &str = r#"<table id="games"><tbody>
<tr>
  <th data-stat="week_num">1</th>
  <td data-stat="game_day_of_week">Sun</td>
  <td data-stat="game_date" csk="1999-09-12">September 12</td>
  <td data-stat="gametime">1:00PM</td>
  <td data-stat="winner">Buffalo Bills</td>
  <td data-stat="game_location">@</td>
  <td data-stat="loser">Indianapolis Colts</td>
  <td data-stat="pts_win">24</td>
  <td data-stat="pts_lose">14</td>
</tr>
</tbody></table>"#;

enum Scripted {
    Status(u16, &'static str),
    Transport,
}

/// Replies from a fixed script and records every requested url.
struct ScriptedFetcher {
    replies: RefCell<VecDeque<Scripted>>,
    requests: RefCell<Vec<String>>,
}

impl ScriptedFetcher {
    fn new(replies: Vec<Scripted>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl PageFetcher for ScriptedFetcher {
    fn get(&self, url: &str, _timeout: Duration) -> Result<PageResponse> {
        self.requests.borrow_mut().push(url.to_string());
        match self.replies.borrow_mut().pop_front() {
            Some(Scripted::Status(status, body)) => Ok(PageResponse {
                status,
                body: body.to_string(),
            }),
            Some(Scripted::Transport) => Err(anyhow!("operation timed out")),
            None => Err(anyhow!("script exhausted")),
        }
    }
}

#[derive(Default)]
struct RecordingSleeper {
    waits: Vec<Duration>,
}

impl Sleeper for RecordingSleeper {
    fn sleep(&mut self, duration: Duration) {
        self.waits.push(duration);
    }
}

fn secs(values: &[u64]) -> Vec<Duration> {
    values.iter().map(|s| Duration::from_secs(*s)).collect()
}

#[test]
fn three_rate_limits_back_off_linearly_then_give_up() {
    let fetcher = ScriptedFetcher::new(vec![
        Scripted::Status(429, ""),
        Scripted::Status(429, ""),
        Scripted::Status(429, ""),
    ]);
    let mut sleeper = RecordingSleeper::default();
    let outcome = fetch_season_page(&fetcher, &mut sleeper, &RetryPolicy::default(), "u");

    assert_eq!(
        outcome,
        FetchOutcome::Unavailable {
            attempts: 3,
            last_failure: AttemptFailure::RateLimited,
        }
    );
    assert_eq!(sleeper.waits, secs(&[15, 30, 45]));
    assert_eq!(fetcher.request_count(), 3);
}

#[test]
fn other_failures_wait_fixed_interval() {
    let fetcher = ScriptedFetcher::new(vec![
        Scripted::Status(503, "busy"),
        Scripted::Transport,
        Scripted::Status(200, "<html>ok</html>"),
    ]);
    let mut sleeper = RecordingSleeper::default();
    let outcome = fetch_season_page(&fetcher, &mut sleeper, &RetryPolicy::default(), "u");

    assert_eq!(outcome, FetchOutcome::Page("<html>ok</html>".to_string()));
    assert_eq!(sleeper.waits, secs(&[5, 5]));
}

#[test]
fn empty_ok_body_is_retried() {
    let fetcher = ScriptedFetcher::new(vec![
        Scripted::Status(200, ""),
        Scripted::Status(200, "body"),
    ]);
    let mut sleeper = RecordingSleeper::default();
    let outcome = fetch_season_page(&fetcher, &mut sleeper, &RetryPolicy::default(), "u");
    assert_eq!(outcome, FetchOutcome::Page("body".to_string()));
    assert_eq!(sleeper.waits, secs(&[5]));
}

#[test]
fn success_on_first_attempt_never_sleeps() {
    let fetcher = ScriptedFetcher::new(vec![Scripted::Status(200, "body")]);
    let mut sleeper = RecordingSleeper::default();
    let outcome = fetch_season_page(&fetcher, &mut sleeper, &RetryPolicy::default(), "u");
    assert_eq!(outcome, FetchOutcome::Page("body".to_string()));
    assert!(sleeper.waits.is_empty());
}

#[test]
fn rate_limit_then_success_uses_attempt_number() {
    let fetcher = ScriptedFetcher::new(vec![
        Scripted::Status(500, ""),
        Scripted::Status(429, ""),
        Scripted::Status(200, "body"),
    ]);
    let mut sleeper = RecordingSleeper::default();
    fetch_season_page(&fetcher, &mut sleeper, &RetryPolicy::default(), "u");
    assert_eq!(sleeper.waits, secs(&[5, 30]));
}

fn season_url(season: i32) -> String {
    format!("https://example.test/years/{season}/games.htm")
}

#[test]
fn seasons_run_in_order_with_delay_between_only() {
    let fetcher = ScriptedFetcher::new(vec![
        Scripted::Status(200, GAMES_HTML),
        Scripted::Status(429, ""),
        Scripted::Status(429, ""),
        Scripted::Status(429, ""),
        Scripted::Status(200, GAMES_HTML),
    ]);
    let mut sleeper = RecordingSleeper::default();
    let policy = RetryPolicy::default();
    let run = SeasonRun {
        seasons: 1999..=2001,
        policy: &policy,
        request_delay: Duration::from_millis(3_500),
        url_for: &season_url,
    };

    let summary = scrape_seasons(&fetcher, &mut sleeper, &run);

    assert_eq!(summary.seasons_total, 3);
    assert_eq!(summary.seasons_succeeded, 2);
    assert_eq!(summary.failed_seasons(), vec![2000]);
    assert!(matches!(
        summary.failed[0].1,
        SeasonFailure::Unavailable { attempts: 3, .. }
    ));
    assert_eq!(summary.games.len(), 2);
    assert_eq!(summary.games[0].season, 1999);
    assert_eq!(summary.games[0].home_team, "Indianapolis Colts");
    assert_eq!(summary.games[1].season, 2001);

    let delay = Duration::from_millis(3_500);
    let mut expected = vec![delay];
    expected.extend(secs(&[15, 30, 45]));
    expected.push(delay);
    assert_eq!(sleeper.waits, expected);

    assert_eq!(
        fetcher.requests.borrow().first().map(String::as_str),
        Some("https://example.test/years/1999/games.htm")
    );
}

#[test]
fn page_without_table_or_games_fails_season() {
    let fetcher = ScriptedFetcher::new(vec![
        Scripted::Status(200, "<html><body>maintenance</body></html>"),
        Scripted::Status(200, "<table id=\"games\"><tbody></tbody></table>"),
        Scripted::Status(200, "<table id=\"games\"><caption>Schedule</caption></table>"),
    ]);
    let mut sleeper = RecordingSleeper::default();
    let policy = RetryPolicy::default();
    let run = SeasonRun {
        seasons: 2010..=2012,
        policy: &policy,
        request_delay: Duration::from_secs(1),
        url_for: &season_url,
    };

    let summary = scrape_seasons(&fetcher, &mut sleeper, &run);
    assert_eq!(summary.seasons_succeeded, 0);
    assert_eq!(
        summary.failed,
        vec![
            (2010, SeasonFailure::NoTable),
            (2011, SeasonFailure::NoRows),
            (2012, SeasonFailure::NoBody),
        ]
    );
    assert_eq!(sleeper.waits, secs(&[1, 1]));
}
