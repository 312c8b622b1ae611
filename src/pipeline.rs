use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::betting_lines::{BettingLookup, download_workbook, read_workbook_rows};
use crate::config::{MergeConfig, ScrapeConfig, WebAssetConfig};
use crate::game_record::{GameRecord, PrimetimeSlot};
use crate::http_client::{HttpPageFetcher, PageFetcher, http_client};
use crate::reconcile::{MergeReport, merge_betting_lines};
use crate::scores_export::write_scores_workbook;
use crate::season_fetch::{ScrapeSummary, SeasonRun, Sleeper, ThreadSleeper, scrape_seasons};
use crate::store::GameStore;
use crate::web_asset::{WebAssetReport, write_data_js};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrimetimeCounts {
    pub mnf: usize,
    pub snf: usize,
    pub tnf: usize,
}

pub fn primetime_counts(games: &[GameRecord]) -> PrimetimeCounts {
    let mut counts = PrimetimeCounts::default();
    for game in games {
        match game.primetime {
            PrimetimeSlot::Mnf => counts.mnf += 1,
            PrimetimeSlot::Snf => counts.snf += 1,
            PrimetimeSlot::Tnf => counts.tnf += 1,
            PrimetimeSlot::SaturdayPrimetime | PrimetimeSlot::None => {}
        }
    }
    counts
}

pub struct ScrapeRun {
    pub summary: ScrapeSummary,
    /// Games returned by this run.
    pub scraped: usize,
    /// Games in the store afterwards.
    pub stored: usize,
    pub counts: PrimetimeCounts,
}

/// Scrapes every configured season with the live client.
pub fn run_scrape(cfg: &ScrapeConfig) -> Result<ScrapeRun> {
    let fetcher = HttpPageFetcher::new()?;
    let mut sleeper = ThreadSleeper;
    run_scrape_with(cfg, &fetcher, &mut sleeper)
}

/// Scrapes the configured range and folds it into the store: seasons that
/// came back replace their stored games, every other season is kept. Nothing
/// is written when no season succeeded.
pub fn run_scrape_with(
    cfg: &ScrapeConfig,
    fetcher: &dyn PageFetcher,
    sleeper: &mut dyn Sleeper,
) -> Result<ScrapeRun> {
    let url_for = |season: i32| cfg.season_url(season);
    let run = SeasonRun {
        seasons: cfg.seasons(),
        policy: &cfg.retry,
        request_delay: cfg.request_delay,
        url_for: &url_for,
    };

    let mut summary = scrape_seasons(fetcher, sleeper, &run);
    let games = std::mem::take(&mut summary.games);
    let counts = primetime_counts(&games);
    let scraped_games = games.len();
    let scraped: HashSet<i32> = games.iter().map(|game| game.season).collect();

    if scraped.is_empty() {
        warn!("no games scraped, store left untouched");
        let stored = if cfg.store_path.exists() {
            GameStore::load(&cfg.store_path)?.len()
        } else {
            0
        };
        return Ok(ScrapeRun {
            summary,
            scraped: scraped_games,
            stored,
            counts,
        });
    }

    let mut store = if cfg.store_path.exists() {
        GameStore::load(&cfg.store_path)?
    } else {
        GameStore::new()
    };
    let added = store.replace_seasons(&scraped, games);
    store.save(&cfg.store_path)?;
    let with_betting = store.games().iter().any(GameRecord::has_betting);
    write_scores_workbook(&cfg.workbook_path, store.games(), with_betting)?;
    info!(
        store = %cfg.store_path.display(),
        workbook = %cfg.workbook_path.display(),
        seasons = scraped.len(),
        added,
        total = store.len(),
        "store written"
    );

    Ok(ScrapeRun {
        scraped: scraped_games,
        stored: store.len(),
        summary,
        counts,
    })
}

pub struct StoreMerge {
    pub store: PathBuf,
    pub report: Option<MergeReport>,
}

pub struct MergeRun {
    pub lookup_size: usize,
    pub per_store: Vec<StoreMerge>,
    pub total: MergeReport,
}

pub fn load_betting_lookup(cfg: &MergeConfig) -> Result<BettingLookup> {
    let rows = match cfg.betting_file.as_ref() {
        Some(path) => read_workbook_rows(path)?,
        None => {
            let tmp = tempfile_path();
            let client = http_client()?;
            let bytes = download_workbook(client, &cfg.betting_url, &tmp)?;
            info!(kb = bytes / 1024, "betting workbook downloaded");
            let rows = read_workbook_rows(&tmp);
            let _ = std::fs::remove_file(&tmp);
            rows?
        }
    };
    let lookup = BettingLookup::build(&rows, &cfg.columns);
    info!(games = lookup.len(), "built betting lookup");
    Ok(lookup)
}

fn tempfile_path() -> PathBuf {
    std::env::temp_dir().join(format!("nfl_betting_{}.xlsx", std::process::id()))
}

/// Merges closing lines into every configured store. A missing store is
/// reported and skipped; the rest still run.
pub fn run_merge(cfg: &MergeConfig) -> Result<MergeRun> {
    let lookup = load_betting_lookup(cfg)?;
    let mut per_store = Vec::with_capacity(cfg.stores.len());
    let mut total = MergeReport::default();

    for path in &cfg.stores {
        if !path.exists() {
            warn!(store = %path.display(), "store not found");
            per_store.push(StoreMerge {
                store: path.clone(),
                report: None,
            });
            continue;
        }
        let mut store = GameStore::load(path)?;
        let report = merge_betting_lines(store.games_mut(), &lookup);
        store.save(path)?;
        write_scores_workbook(&cfg.workbook_for(path), store.games(), true)
            .with_context(|| format!("export workbook for {}", path.display()))?;
        info!(
            store = %path.display(),
            matched = report.matched,
            eligible = report.eligible,
            "betting lines merged"
        );
        total.add(report);
        per_store.push(StoreMerge {
            store: path.clone(),
            report: Some(report),
        });
    }

    Ok(MergeRun {
        lookup_size: lookup.len(),
        per_store,
        total,
    })
}

/// Concatenates every readable store and writes the deduplicated web asset.
pub fn run_web_asset(cfg: &WebAssetConfig) -> Result<WebAssetReport> {
    let mut games = Vec::new();
    for path in &cfg.stores {
        if !path.exists() {
            warn!(store = %path.display(), "store not found, skipping");
            continue;
        }
        let store = GameStore::load(path)?;
        info!(store = %path.display(), games = store.len(), "read store");
        games.extend(store.into_games());
    }
    write_data_js(&cfg.output, games)
}
