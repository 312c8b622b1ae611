use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;

use anyhow::{Result, anyhow};

use nfl_history::config::ScrapeConfig;
use nfl_history::game_record::{GameRecord, PrimetimeSlot, SpreadResult, score_diff};
use nfl_history::http_client::{PageFetcher, PageResponse};
use nfl_history::pipeline::run_scrape_with;
use nfl_history::season_fetch::Sleeper;
use nfl_history::store::GameStore;

const SEASON_2000_HTML: &str = r#"<table id="games"><tbody>
<tr>
  <th data-stat="week_num">1</th>
  <td data-stat="game_day_of_week">Sun</td>
  <td data-stat="game_date" csk="2000-09-03">September 3</td>
  <td data-stat="gametime">1:00PM</td>
  <td data-stat="winner">Buffalo Bills</td>
  <td data-stat="game_location">@</td>
  <td data-stat="loser">Indianapolis Colts</td>
  <td data-stat="pts_win">24</td>
  <td data-stat="pts_lose">14</td>
</tr>
<tr>
  <th data-stat="week_num">1</th>
  <td data-stat="game_day_of_week">Mon</td>
  <td data-stat="game_date" csk="2000-09-04">September 4</td>
  <td data-stat="gametime">9:00PM</td>
  <td data-stat="winner">Denver Broncos</td>
  <td data-stat="game_location"></td>
  <td data-stat="loser">St. Louis Rams</td>
  <td data-stat="pts_win">41</td>
  <td data-stat="pts_lose">36</td>
</tr>
</tbody></table>"#;

/// Serves queued `(status, body)` replies in order.
struct QueuedFetcher {
    replies: RefCell<VecDeque<(u16, &'static str)>>,
}

impl QueuedFetcher {
    fn new(replies: Vec<(u16, &'static str)>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
        }
    }
}

impl PageFetcher for QueuedFetcher {
    fn get(&self, _url: &str, _timeout: Duration) -> Result<PageResponse> {
        let (status, body) = self
            .replies
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow!("no reply queued"))?;
        Ok(PageResponse {
            status,
            body: body.to_string(),
        })
    }
}

struct NoSleep;

impl Sleeper for NoSleep {
    fn sleep(&mut self, _duration: Duration) {}
}

fn stored_game(season: i32, date: &str, home: &str, away: &str) -> GameRecord {
    GameRecord {
        season,
        week: "1".to_string(),
        day: "Sun".to_string(),
        date: date.to_string(),
        kickoff_time: "1:00PM".to_string(),
        home_team: home.to_string(),
        away_team: away.to_string(),
        home_score: 10,
        away_score: 7,
        score_diff: score_diff(10, 7),
        winner: home.to_string(),
        primetime: PrimetimeSlot::None,
        spread: None,
        over_under: None,
        spread_result: None,
        ou_result: None,
    }
}

fn config(dir: &Path, start_year: i32, end_year: i32) -> ScrapeConfig {
    let mut cfg = ScrapeConfig::from_env();
    cfg.start_year = start_year;
    cfg.end_year = end_year;
    cfg.base_url = "https://example.test/years/{year}/games.htm".to_string();
    cfg.request_delay = Duration::ZERO;
    cfg.store_path = dir.join("nfl_scores.json");
    cfg.workbook_path = dir.join("nfl_scores.xlsx");
    cfg
}

#[test]
fn partial_range_keeps_other_seasons() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), 2000, 2001);

    let mut lined = stored_game(1999, "1999-09-12", "Chicago Bears", "Kansas City Chiefs");
    lined.spread = Some(-2.5);
    lined.spread_result = Some(SpreadResult::Covered);
    let mut colts = stored_game(2000, "2000-09-03", "Indianapolis Colts", "Buffalo Bills");
    colts.spread = Some(-3.0);
    colts.spread_result = Some(SpreadResult::Covered);
    let stale = stored_game(2000, "2000-12-31", "Miami Dolphins", "New York Jets");
    let untouched_2001 = stored_game(2001, "2001-09-09", "Detroit Lions", "Green Bay Packers");
    GameStore::from_games(vec![lined.clone(), colts, stale, untouched_2001.clone()])
        .save(&cfg.store_path)
        .unwrap();

    let fetcher = QueuedFetcher::new(vec![
        (200, SEASON_2000_HTML),
        (429, ""),
        (429, ""),
        (429, ""),
    ]);
    let run = run_scrape_with(&cfg, &fetcher, &mut NoSleep).unwrap();

    assert_eq!(run.summary.failed_seasons(), vec![2001]);
    assert_eq!(run.scraped, 2);
    assert_eq!(run.counts.mnf, 1);
    assert_eq!(run.stored, 4);

    let store = GameStore::load(&cfg.store_path).unwrap();
    let keys: Vec<(i32, &str)> = store
        .games()
        .iter()
        .map(|g| (g.season, g.home_team.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![
            (1999, "Chicago Bears"),
            (2000, "Indianapolis Colts"),
            (2000, "Denver Broncos"),
            (2001, "Detroit Lions"),
        ]
    );
    assert_eq!(store.games()[0], lined);
    assert_eq!(store.games()[3], untouched_2001);

    let colts = &store.games()[1];
    assert_eq!((colts.home_score, colts.away_score), (14, 24));
    assert_eq!(colts.spread, Some(-3.0));
    assert_eq!(colts.spread_result, Some(SpreadResult::Lost));
    assert!(cfg.workbook_path.exists());
}

#[test]
fn first_scrape_creates_store() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), 2000, 2000);
    let fetcher = QueuedFetcher::new(vec![(200, SEASON_2000_HTML)]);

    let run = run_scrape_with(&cfg, &fetcher, &mut NoSleep).unwrap();
    assert_eq!(run.stored, 2);
    assert_eq!(GameStore::load(&cfg.store_path).unwrap().len(), 2);
}

#[test]
fn failed_run_leaves_store_file_alone() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), 2000, 2000);
    GameStore::from_games(vec![stored_game(2000, "2000-09-03", "Indianapolis Colts", "Buffalo Bills")])
        .save(&cfg.store_path)
        .unwrap();
    let before = std::fs::read_to_string(&cfg.store_path).unwrap();

    let fetcher = QueuedFetcher::new(vec![(500, ""), (500, ""), (500, "")]);
    let run = run_scrape_with(&cfg, &fetcher, &mut NoSleep).unwrap();

    assert_eq!(run.scraped, 0);
    assert_eq!(run.stored, 1);
    assert_eq!(std::fs::read_to_string(&cfg.store_path).unwrap(), before);
    assert!(!cfg.workbook_path.exists());
}
