use anyhow::Result;

use nfl_history::config::{self, MergeConfig};
use nfl_history::logging;
use nfl_history::pipeline;

fn main() -> Result<()> {
    config::load_dotenv();
    logging::init();

    let mut cfg = MergeConfig::from_env();
    cfg.apply_args(&config::cli_args());

    println!("NFL betting lines merge");
    match cfg.betting_file.as_ref() {
        Some(path) => println!("Betting workbook: {}", path.display()),
        None => println!("Betting workbook: {}", cfg.betting_url),
    }

    let run = pipeline::run_merge(&cfg)?;
    println!("Lookup games: {}", run.lookup_size);
    for item in &run.per_store {
        match item.report {
            Some(report) => match report.match_pct() {
                Some(pct) => println!(
                    "{}: matched {}/{} games ({pct:.1}%)",
                    item.store.display(),
                    report.matched,
                    report.eligible
                ),
                None => println!("{}: no games found", item.store.display()),
            },
            None => println!("{}: file not found", item.store.display()),
        }
    }
    println!(
        "Total: {} games matched with betting data out of {}",
        run.total.matched, run.total.eligible
    );
    Ok(())
}
