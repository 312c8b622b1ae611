use std::env;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::betting_lines::BettingColumns;
use crate::season_fetch::RetryPolicy;

const APP_DIR: &str = "nfl_history";
const STORE_FILE: &str = "nfl_scores.json";

const DEFAULT_START_YEAR: i32 = 1966;
const DEFAULT_END_YEAR: i32 = 2024;
const DEFAULT_BASE_URL: &str = "https://www.pro-football-reference.com/years/{year}/games.htm";
const DEFAULT_REQUEST_DELAY_MS: u64 = 3_500;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_BETTING_URL: &str = "https://www.aussportsbetting.com/historical_data/nfl.xlsx";
const DEFAULT_WEB_OUTPUT: &str = "public/data.js";

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub start_year: i32,
    pub end_year: i32,
    pub base_url: String,
    pub request_delay: Duration,
    pub retry: RetryPolicy,
    pub store_path: PathBuf,
    pub workbook_path: PathBuf,
}

impl ScrapeConfig {
    pub fn from_env() -> Self {
        let start_year = env_parse("NFL_START_YEAR").unwrap_or(DEFAULT_START_YEAR);
        let end_year = env_parse("NFL_END_YEAR").unwrap_or(DEFAULT_END_YEAR);
        let base_url = env::var("NFL_BASE_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let request_delay_ms = env_parse("NFL_REQUEST_DELAY_MS").unwrap_or(DEFAULT_REQUEST_DELAY_MS);
        let max_attempts = env_parse::<u32>("NFL_MAX_RETRIES")
            .unwrap_or(DEFAULT_MAX_RETRIES)
            .clamp(1, 10);
        let store_path = default_store_path();
        let workbook_path = store_path.with_extension("xlsx");

        Self {
            start_year,
            end_year,
            base_url,
            request_delay: Duration::from_millis(request_delay_ms),
            retry: RetryPolicy {
                max_attempts,
                ..RetryPolicy::default()
            },
            store_path,
            workbook_path,
        }
    }

    pub fn apply_args(&mut self, args: &[String]) {
        if let Some(year) = arg_value(args, "--start-year").and_then(|v| v.parse().ok()) {
            self.start_year = year;
        }
        if let Some(year) = arg_value(args, "--end-year").and_then(|v| v.parse().ok()) {
            self.end_year = year;
        }
        if let Some(path) = arg_value(args, "--store") {
            self.store_path = PathBuf::from(path);
            self.workbook_path = self.store_path.with_extension("xlsx");
        }
        if let Some(path) = arg_value(args, "--output") {
            self.workbook_path = PathBuf::from(path);
        }
    }

    /// Inclusive season range; a reversed range is swapped.
    pub fn seasons(&self) -> RangeInclusive<i32> {
        if self.start_year <= self.end_year {
            self.start_year..=self.end_year
        } else {
            self.end_year..=self.start_year
        }
    }

    pub fn season_url(&self, season: i32) -> String {
        self.base_url.replace("{year}", &season.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct MergeConfig {
    pub betting_url: String,
    pub betting_file: Option<PathBuf>,
    pub stores: Vec<PathBuf>,
    /// Workbook for a single merged store; several stores each get their own.
    pub workbook_path: Option<PathBuf>,
    pub columns: BettingColumns,
}

impl MergeConfig {
    pub fn from_env() -> Self {
        let betting_url = env::var("NFL_BETTING_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BETTING_URL.to_string());
        let betting_file = env::var("NFL_BETTING_FILE")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);
        Self {
            betting_url,
            betting_file,
            stores: vec![default_store_path()],
            workbook_path: None,
            columns: BettingColumns::default(),
        }
    }

    pub fn apply_args(&mut self, args: &[String]) {
        if let Some(path) = arg_value(args, "--betting-file") {
            self.betting_file = Some(PathBuf::from(path));
        }
        let stores = arg_values(args, "--files");
        if !stores.is_empty() {
            self.stores = stores.into_iter().map(PathBuf::from).collect();
        }
        if let Some(path) = arg_value(args, "--output") {
            self.workbook_path = Some(PathBuf::from(path));
        }
    }

    pub fn workbook_for(&self, store: &Path) -> PathBuf {
        match self.workbook_path.as_ref() {
            Some(path) if self.stores.len() == 1 => path.clone(),
            _ => store.with_extension("xlsx"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebAssetConfig {
    pub stores: Vec<PathBuf>,
    pub output: PathBuf,
}

impl WebAssetConfig {
    pub fn from_env() -> Self {
        let output = env::var("NFL_WEB_OUTPUT")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_WEB_OUTPUT.to_string());
        Self {
            stores: vec![default_store_path()],
            output: PathBuf::from(output),
        }
    }

    pub fn apply_args(&mut self, args: &[String]) {
        let stores = arg_values(args, "--files");
        if !stores.is_empty() {
            self.stores = stores.into_iter().map(PathBuf::from).collect();
        }
        if let Some(path) = arg_value(args, "--web-output") {
            self.output = PathBuf::from(path);
        }
    }
}

pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

pub fn cli_args() -> Vec<String> {
    env::args().skip(1).collect()
}

pub fn default_store_path() -> PathBuf {
    if let Some(path) = env::var("NFL_STORE")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
    {
        return PathBuf::from(path);
    }
    app_data_dir()
        .map(|dir| dir.join(STORE_FILE))
        .unwrap_or_else(|| PathBuf::from(STORE_FILE))
}

fn app_data_dir() -> Option<PathBuf> {
    if let Ok(base) = env::var("XDG_DATA_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(APP_DIR));
    }
    let home = env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".local").join("share").join(APP_DIR))
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

/// Value of `--flag=value` or `--flag value`; blank values are ignored.
pub fn arg_value(args: &[String], flag: &str) -> Option<String> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg
            .strip_prefix(flag)
            .and_then(|rest| rest.strip_prefix('='))
        {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() && !next.starts_with("--") {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}

/// Values following `--flag` up to the next `--` argument, plus any comma
/// separated `--flag=a,b`.
pub fn arg_values(args: &[String], flag: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut collecting = false;
    for arg in args {
        if let Some(raw) = arg
            .strip_prefix(flag)
            .and_then(|rest| rest.strip_prefix('='))
        {
            out.extend(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            );
            collecting = false;
            continue;
        }
        if arg == flag {
            collecting = true;
            continue;
        }
        if arg.starts_with("--") {
            collecting = false;
            continue;
        }
        if collecting && !arg.trim().is_empty() {
            out.push(arg.trim().to_string());
        }
    }
    out
}
