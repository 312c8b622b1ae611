use nfl_history::game_record::{GameRecord, OuResult, PrimetimeSlot, SpreadResult, score_diff};
use nfl_history::web_asset::{dedup_and_sort, render_data_js, write_data_js};

fn game(season: i32, date: &str, home: &str, away: &str, home_score: u32) -> GameRecord {
    GameRecord {
        season,
        week: "2".to_string(),
        day: "Sun".to_string(),
        date: date.to_string(),
        kickoff_time: "8:20PM".to_string(),
        home_team: home.to_string(),
        away_team: away.to_string(),
        home_score,
        away_score: 10,
        score_diff: score_diff(home_score, 10),
        winner: home.to_string(),
        primetime: PrimetimeSlot::Snf,
        spread: None,
        over_under: None,
        spread_result: None,
        ou_result: None,
    }
}

#[test]
fn dedup_keeps_first_then_sorts_by_season_and_date() {
    let games = vec![
        game(2012, "2012-09-16", "A", "B", 20),
        game(2011, "2011-10-02", "C", "D", 20),
        game(2012, "2012-09-09", "E", "F", 20),
        game(2012, "2012-09-16", "A", "B", 99),
        game(2011, "2011-10-02", "G", "H", 20),
    ];
    let out = dedup_and_sort(games);
    let keys: Vec<(i32, &str, &str)> = out
        .iter()
        .map(|g| (g.season, g.date.as_str(), g.home_team.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![
            (2011, "2011-10-02", "C"),
            (2011, "2011-10-02", "G"),
            (2012, "2012-09-09", "E"),
            (2012, "2012-09-16", "A"),
        ]
    );
    assert_eq!(out[3].home_score, 20);
}

#[test]
fn compact_lines_use_short_keys() {
    let js = render_data_js(&[game(2012, "2012-09-09", "Denver Broncos", "Pittsburgh Steelers", 31)])
        .unwrap();
    assert!(js.starts_with("// Auto-generated from NFL score data - 1 games\nconst NFL_GAMES = [\n"));
    assert!(js.contains(
        r#"{"s":2012,"w":"2","d":"Sun","dt":"2012-09-09","tm":"8:20PM","h":"Denver Broncos","a":"Pittsburgh Steelers","hs":31,"as":10,"pt":"SNF"}"#
    ));
    assert!(!js.contains("\"sp\""));
    assert!(!js.contains("\"sr\""));
    assert!(js.contains("const FRANCHISE_MAP = {\n  \"Indianapolis Colts\": \"Colts\","));
    assert!(js.ends_with("};\n"));
}

#[test]
fn betting_fields_appear_when_present() {
    let mut g = game(2012, "2012-09-09", "Denver Broncos", "Pittsburgh Steelers", 31);
    g.spread = Some(-1.04);
    g.over_under = Some(42.5);
    g.spread_result = Some(SpreadResult::Covered);
    g.ou_result = Some(OuResult::Under);
    let js = render_data_js(&[g]).unwrap();
    assert!(js.contains(r#""pt":"SNF","sp":-1.0,"ou":42.5,"sr":"Covered","our":"Under"}"#));
}

#[test]
fn spread_without_result_omits_result_key() {
    let mut g = game(2012, "2012-09-09", "Denver Broncos", "Pittsburgh Steelers", 31);
    g.over_under = Some(40.0);
    g.ou_result = Some(OuResult::Over);
    let js = render_data_js(&[g]).unwrap();
    assert!(js.contains(r#""ou":40.0,"our":"Over"}"#));
    assert!(!js.contains("\"sr\""));
}

#[test]
fn write_reports_counts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("public").join("data.js");
    let games = vec![
        game(2012, "2012-09-09", "A", "B", 20),
        game(2012, "2012-09-09", "A", "B", 20),
    ];
    let report = write_data_js(&path, games).unwrap();
    assert_eq!(report.games_in, 2);
    assert_eq!(report.games_written, 1);
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written.len(), report.bytes);
    assert!(written.starts_with("// Auto-generated from NFL score data - 1 games\n"));
}
