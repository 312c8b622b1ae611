use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use calamine::{Data, Reader, open_workbook_auto};
use chrono::NaiveDate;
use reqwest::blocking::Client;
use tracing::info;

const DOWNLOAD_TIMEOUT_SECS: u64 = 60;

static EMPTY_CELL: CellValue = CellValue::Empty;

/// A workbook cell reduced to what the lookup needs.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl CellValue {
    fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    /// Numeric value of the cell; text is parsed, dates and blanks are absent.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            CellValue::Empty | CellValue::Date(_) => None,
        }?;
        n.is_finite().then_some(n)
    }
}

/// Zero-based column positions in the betting workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BettingColumns {
    pub date: usize,
    pub home: usize,
    pub home_line_close: usize,
    pub total_score_close: usize,
}

impl Default for BettingColumns {
    fn default() -> Self {
        Self {
            date: 0,
            home: 1,
            home_line_close: 19,
            total_score_close: 35,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BettingLine {
    pub spread: Option<f64>,
    pub over_under: Option<f64>,
}

/// Closing lines keyed by `(YYYY-MM-DD, home team text)`.
#[derive(Debug, Clone, Default)]
pub struct BettingLookup {
    lines: HashMap<(String, String), BettingLine>,
}

impl BettingLookup {
    /// Rows without a date cell or home team are skipped; a later row with
    /// the same key replaces an earlier one.
    pub fn build(rows: &[Vec<CellValue>], cols: &BettingColumns) -> Self {
        let mut lines = HashMap::new();
        for row in rows {
            let cell = |idx: usize| row.get(idx).unwrap_or(&EMPTY_CELL);

            let date_cell = cell(cols.date);
            if date_cell.is_empty() {
                continue;
            }
            let date = normalize_date(date_cell);
            let home = cell(cols.home).as_text().trim().to_string();
            if home.is_empty() || date.is_empty() {
                continue;
            }

            let line = BettingLine {
                spread: cell(cols.home_line_close).as_number(),
                over_under: cell(cols.total_score_close).as_number(),
            };
            lines.insert((date, home), line);
        }
        Self { lines }
    }

    pub fn get(&self, date: &str, home_team: &str) -> Option<&BettingLine> {
        self.lines.get(&(date.to_string(), home_team.to_string()))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Date-typed cells format as `YYYY-MM-DD`; anything else keeps its first ten characters.
pub fn normalize_date(cell: &CellValue) -> String {
    match cell {
        CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        other => other.as_text().chars().take(10).collect(),
    }
}

pub fn download_workbook(client: &Client, url: &str, dest: &Path) -> Result<u64> {
    info!(%url, "downloading betting workbook");
    let resp = client
        .get(url)
        .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
        .send()
        .context("betting workbook request failed")?;
    let status = resp.status();
    if !status.is_success() {
        return Err(anyhow!("betting workbook http {status}"));
    }
    let bytes = resp.bytes().context("failed reading betting workbook body")?;
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create download dir {}", parent.display()))?;
    }
    fs::write(dest, &bytes)
        .with_context(|| format!("write betting workbook {}", dest.display()))?;
    Ok(bytes.len() as u64)
}

/// Reads every row below the header of the workbook's first sheet.
pub fn read_workbook_rows(path: &Path) -> Result<Vec<Vec<CellValue>>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|err| anyhow!("open betting workbook {}: {err}", path.display()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("betting workbook {} has no sheets", path.display()))?
        .map_err(|err| anyhow!("read betting sheet: {err}"))?;

    Ok(range
        .rows()
        .skip(1)
        .map(|row| row.iter().map(cell_value).collect())
        .collect())
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Number(if *b { 1.0 } else { 0.0 }),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ts) => CellValue::Date(ts.date()),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_date_prefers_typed_dates() {
        let d = NaiveDate::from_ymd_opt(2019, 9, 8).unwrap();
        assert_eq!(normalize_date(&CellValue::Date(d)), "2019-09-08");
        assert_eq!(
            normalize_date(&CellValue::Text("2019-09-08 00:00:00".to_string())),
            "2019-09-08"
        );
        assert_eq!(normalize_date(&CellValue::Text("8/9/19".to_string())), "8/9/19");
    }

    #[test]
    fn as_number_tolerates_text_and_rejects_junk() {
        assert_eq!(CellValue::Text(" -3.5 ".to_string()).as_number(), Some(-3.5));
        assert_eq!(CellValue::Text("pk".to_string()).as_number(), None);
        assert_eq!(CellValue::Text("NaN".to_string()).as_number(), None);
        assert_eq!(CellValue::Empty.as_number(), None);
        assert_eq!(CellValue::Number(44.0).as_number(), Some(44.0));
    }
}
