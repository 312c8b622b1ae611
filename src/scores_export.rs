use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use crate::game_record::{GameRecord, OuResult, PrimetimeSlot, SpreadResult};

const SHEET_NAME: &str = "NFL Scores";

const HEADER_BLUE: u32 = 0x013369;
const RULE_GREY: u32 = 0xDDDDDD;
const AMBER: u32 = 0xFFF3CD;
const CYAN: u32 = 0xD1ECF1;
const GREEN: u32 = 0xD4EDDA;
const RED: u32 = 0xF8D7DA;

struct Column {
    header: &'static str,
    width: f64,
    left: bool,
}

const fn col(header: &'static str, width: f64, left: bool) -> Column {
    Column {
        header,
        width,
        left,
    }
}

const BASE_COLUMNS: [Column; 12] = [
    col("Season", 9.0, false),
    col("Week", 14.0, false),
    col("Day", 6.0, false),
    col("Date", 12.0, false),
    col("Time (ET)", 10.0, false),
    col("Home Team", 26.0, true),
    col("Away Team", 26.0, true),
    col("Home Score", 11.0, false),
    col("Away Score", 11.0, false),
    col("Score Difference", 14.0, false),
    col("Winner", 26.0, true),
    col("Primetime Slot", 18.0, false),
];

const BETTING_COLUMNS: [Column; 4] = [
    col("Spread", 10.0, false),
    col("Over/Under", 12.0, false),
    col("Spread Result", 14.0, false),
    col("O/U Result", 12.0, false),
];

enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Blank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fill {
    None,
    Amber,
    Cyan,
    Green,
    Red,
}

impl Fill {
    fn color(self) -> Option<u32> {
        match self {
            Fill::None => None,
            Fill::Amber => Some(AMBER),
            Fill::Cyan => Some(CYAN),
            Fill::Green => Some(GREEN),
            Fill::Red => Some(RED),
        }
    }
}

fn primetime_fill(slot: PrimetimeSlot) -> Fill {
    match slot {
        PrimetimeSlot::Mnf => Fill::Amber,
        PrimetimeSlot::Snf => Fill::Cyan,
        PrimetimeSlot::Tnf => Fill::Green,
        PrimetimeSlot::SaturdayPrimetime | PrimetimeSlot::None => Fill::None,
    }
}

fn spread_fill(result: Option<SpreadResult>) -> Fill {
    match result {
        Some(SpreadResult::Covered) => Fill::Green,
        Some(SpreadResult::Lost) => Fill::Red,
        _ => Fill::None,
    }
}

fn ou_fill(result: Option<OuResult>) -> Fill {
    match result {
        Some(OuResult::Over) => Fill::Amber,
        _ => Fill::None,
    }
}

fn text_or_blank(value: &str) -> Cell<'_> {
    if value.is_empty() {
        Cell::Blank
    } else {
        Cell::Text(value)
    }
}

fn game_cells(game: &GameRecord, with_betting: bool) -> Vec<(Cell<'_>, Fill)> {
    let mut cells = vec![
        (Cell::Number(game.season as f64), Fill::None),
        (text_or_blank(&game.week), Fill::None),
        (text_or_blank(&game.day), Fill::None),
        (text_or_blank(&game.date), Fill::None),
        (text_or_blank(&game.kickoff_time), Fill::None),
        (Cell::Text(&game.home_team), Fill::None),
        (Cell::Text(&game.away_team), Fill::None),
        (Cell::Number(game.home_score as f64), Fill::None),
        (Cell::Number(game.away_score as f64), Fill::None),
        (Cell::Number(game.score_diff as f64), Fill::None),
        (Cell::Text(&game.winner), Fill::None),
        (
            text_or_blank(game.primetime.label()),
            primetime_fill(game.primetime),
        ),
    ];
    if with_betting {
        cells.push((game.spread.map_or(Cell::Blank, Cell::Number), Fill::None));
        cells.push((game.over_under.map_or(Cell::Blank, Cell::Number), Fill::None));
        cells.push((
            game.spread_result.map_or(Cell::Blank, |r| Cell::Text(r.label())),
            spread_fill(game.spread_result),
        ));
        cells.push((
            game.ou_result.map_or(Cell::Blank, |r| Cell::Text(r.label())),
            ou_fill(game.ou_result),
        ));
    }
    cells
}

fn header_format() -> Format {
    Format::new()
        .set_font_name("Calibri")
        .set_font_size(11)
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_BLUE))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
}

fn body_format(left: bool, fill: Fill) -> Format {
    let mut format = Format::new()
        .set_border_bottom(FormatBorder::Thin)
        .set_border_bottom_color(Color::RGB(RULE_GREY))
        .set_align(if left {
            FormatAlign::Left
        } else {
            FormatAlign::Center
        });
    if let Some(rgb) = fill.color() {
        format = format.set_background_color(Color::RGB(rgb));
    }
    format
}

/// Writes the store as one styled sheet: header row, frozen panes, filter,
/// and the four betting columns when `with_betting` is set.
pub fn write_scores_workbook(path: &Path, games: &[GameRecord], with_betting: bool) -> Result<()> {
    let columns: Vec<&Column> = if with_betting {
        BASE_COLUMNS.iter().chain(BETTING_COLUMNS.iter()).collect()
    } else {
        BASE_COLUMNS.iter().collect()
    };

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;
        write_sheet(sheet, &columns, games, with_betting)?;
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create workbook dir {}", parent.display()))?;
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    Ok(())
}

fn write_sheet(
    sheet: &mut Worksheet,
    columns: &[&Column],
    games: &[GameRecord],
    with_betting: bool,
) -> Result<()> {
    let header = header_format();
    for (col_idx, column) in columns.iter().enumerate() {
        let col_idx = col_idx as u16;
        sheet
            .write_string_with_format(0, col_idx, column.header, &header)
            .with_context(|| format!("write header {}", column.header))?;
        sheet.set_column_width(col_idx, column.width)?;
    }
    sheet.set_freeze_panes(1, 0)?;

    for (idx, game) in games.iter().enumerate() {
        let row_idx = (idx + 1) as u32;
        for (col_idx, (cell, fill)) in game_cells(game, with_betting).into_iter().enumerate() {
            let format = body_format(columns[col_idx].left, fill);
            let col_idx = col_idx as u16;
            match cell {
                Cell::Text(value) => {
                    sheet.write_string_with_format(row_idx, col_idx, value, &format)
                }
                Cell::Number(value) => {
                    sheet.write_number_with_format(row_idx, col_idx, value, &format)
                }
                Cell::Blank => sheet.write_blank(row_idx, col_idx, &format),
            }
            .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }

    let last_col = columns.len().saturating_sub(1) as u16;
    sheet.autofilter(0, 0, games.len() as u32, last_col)?;
    Ok(())
}
