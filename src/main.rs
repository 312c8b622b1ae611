use anyhow::Result;

use nfl_history::config::{self, MergeConfig, ScrapeConfig, WebAssetConfig};
use nfl_history::logging;
use nfl_history::pipeline;

/// Runs scrape, betting merge and web asset generation back to back over the
/// same store. `--skip-spreads` leaves betting columns out.
fn main() -> Result<()> {
    config::load_dotenv();
    logging::init();
    let args = config::cli_args();

    let mut scrape_cfg = ScrapeConfig::from_env();
    scrape_cfg.apply_args(&args);
    let scrape = pipeline::run_scrape(&scrape_cfg)?;
    println!(
        "Scraped {} games ({} stored), seasons {}/{}",
        scrape.scraped,
        scrape.stored, scrape.summary.seasons_succeeded, scrape.summary.seasons_total
    );
    if !scrape.summary.failed.is_empty() {
        println!("Failed seasons: {:?}", scrape.summary.failed_seasons());
    }
    if scrape.stored == 0 {
        println!("No games to write");
        return Ok(());
    }

    if !args.iter().any(|a| a == "--skip-spreads") {
        let mut merge_cfg = MergeConfig::from_env();
        merge_cfg.apply_args(&args);
        merge_cfg.stores = vec![scrape_cfg.store_path.clone()];
        merge_cfg.workbook_path = Some(scrape_cfg.workbook_path.clone());
        let merge = pipeline::run_merge(&merge_cfg)?;
        match merge.total.match_pct() {
            Some(pct) => println!(
                "Betting lines matched: {}/{} ({pct:.1}%)",
                merge.total.matched, merge.total.eligible
            ),
            None => println!("Betting lines matched: 0/0"),
        }
    }

    let mut web_cfg = WebAssetConfig::from_env();
    web_cfg.apply_args(&args);
    web_cfg.stores = vec![scrape_cfg.store_path.clone()];
    let web = pipeline::run_web_asset(&web_cfg)?;
    println!(
        "Web asset: {} games -> {}",
        web.games_written,
        web_cfg.output.display()
    );
    Ok(())
}
