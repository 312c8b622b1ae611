use anyhow::Result;

use nfl_history::config::{self, ScrapeConfig};
use nfl_history::logging;
use nfl_history::pipeline::{self, ScrapeRun};

fn main() -> Result<()> {
    config::load_dotenv();
    logging::init();

    let mut cfg = ScrapeConfig::from_env();
    cfg.apply_args(&config::cli_args());

    let seasons = cfg.seasons();
    println!("NFL historical scores scrape");
    println!("Seasons: {} - {}", seasons.start(), seasons.end());
    println!("Store: {}", cfg.store_path.display());
    println!("Workbook: {}", cfg.workbook_path.display());

    let run = pipeline::run_scrape(&cfg)?;
    print_scrape_run(&run);
    Ok(())
}

fn print_scrape_run(run: &ScrapeRun) {
    let summary = &run.summary;
    println!("Games scraped: {}", run.scraped);
    println!("Total games stored: {}", run.stored);
    println!(
        "Seasons processed: {}/{}",
        summary.seasons_succeeded, summary.seasons_total
    );
    if !summary.failed.is_empty() {
        println!("Failed seasons: {:?}", summary.failed_seasons());
        for (season, failure) in &summary.failed {
            println!(" - {season}: {failure}");
        }
    }
    println!(
        "MNF games: {} | SNF games: {} | TNF games: {}",
        run.counts.mnf, run.counts.snf, run.counts.tnf
    );
}
