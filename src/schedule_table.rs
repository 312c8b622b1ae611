use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// One `<tr>` of a season's results table, cell text already trimmed.
/// A field is `None` when the row had no cell for it at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGameRow {
    pub week: Option<String>,
    pub day: Option<String>,
    pub date_text: Option<String>,
    /// The machine-sortable `csk` attribute of the date cell.
    pub date_sort_key: Option<String>,
    pub kickoff_time: Option<String>,
    pub winner: Option<String>,
    pub loser: Option<String>,
    pub location: Option<String>,
    pub pts_win: Option<String>,
    pub pts_lose: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleTable {
    Rows(Vec<RawGameRow>),
    NoTable,
    NoBody,
}

static GAMES_TABLE: Lazy<Selector> = Lazy::new(|| selector("table#games"));
static ANY_TABLE: Lazy<Selector> = Lazy::new(|| selector("table"));
static TBODY: Lazy<Selector> = Lazy::new(|| selector("tbody"));
static ROW: Lazy<Selector> = Lazy::new(|| selector("tr"));
static COL_HEADER: Lazy<Selector> = Lazy::new(|| selector(r#"th[scope="col"]"#));
static WEEK: Lazy<Selector> = Lazy::new(|| {
    selector(r#"th[data-stat="week_num"], td[data-stat="week_num"]"#)
});
static DAY: Lazy<Selector> = Lazy::new(|| stat_cell("game_day_of_week"));
static DATE: Lazy<Selector> = Lazy::new(|| stat_cell("game_date"));
static TIME: Lazy<Selector> = Lazy::new(|| stat_cell("gametime"));
static WINNER: Lazy<Selector> = Lazy::new(|| stat_cell("winner"));
static LOSER: Lazy<Selector> = Lazy::new(|| stat_cell("loser"));
static LOCATION: Lazy<Selector> = Lazy::new(|| stat_cell("game_location"));
static PTS_WIN: Lazy<Selector> = Lazy::new(|| stat_cell("pts_win"));
static PTS_LOSE: Lazy<Selector> = Lazy::new(|| stat_cell("pts_lose"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

fn stat_cell(stat: &str) -> Selector {
    selector(&format!(r#"td[data-stat="{stat}"]"#))
}

/// Finds the `games` table (or the first table on the page) and reads its body rows.
/// Column sub-header rows repeated inside the body are skipped here.
pub fn parse_schedule_table(html: &str) -> ScheduleTable {
    let document = Html::parse_document(html);
    let Some(table) = document
        .select(&GAMES_TABLE)
        .next()
        .or_else(|| document.select(&ANY_TABLE).next())
    else {
        return ScheduleTable::NoTable;
    };
    let Some(tbody) = table.select(&TBODY).next() else {
        return ScheduleTable::NoBody;
    };

    let rows = tbody
        .select(&ROW)
        .filter(|row| row.select(&COL_HEADER).next().is_none())
        .map(read_row)
        .collect();
    ScheduleTable::Rows(rows)
}

fn read_row(row: ElementRef<'_>) -> RawGameRow {
    let date_el = row.select(&DATE).next();
    RawGameRow {
        week: cell_text(row, &WEEK),
        day: cell_text(row, &DAY),
        date_text: date_el.map(element_text),
        date_sort_key: date_el
            .and_then(|el| el.value().attr("csk"))
            .map(|s| s.to_string()),
        kickoff_time: cell_text(row, &TIME),
        winner: cell_text(row, &WINNER),
        loser: cell_text(row, &LOSER),
        location: cell_text(row, &LOCATION),
        pts_win: cell_text(row, &PTS_WIN),
        pts_lose: cell_text(row, &PTS_LOSE),
    }
}

fn cell_text(row: ElementRef<'_>, sel: &Selector) -> Option<String> {
    row.select(sel).next().map(element_text)
}

// Every text node is trimmed before joining, so "<a> Bills </a>\n" reads "Bills".
fn element_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).collect()
}
