use anyhow::{Result, anyhow};

use nfl_history::config::{self, WebAssetConfig};
use nfl_history::logging;
use nfl_history::pipeline;

fn main() -> Result<()> {
    config::load_dotenv();
    logging::init();

    let mut cfg = WebAssetConfig::from_env();
    cfg.apply_args(&config::cli_args());
    if cfg.stores.is_empty() {
        return Err(anyhow!("no stores given, use --files <path> ..."));
    }

    let report = pipeline::run_web_asset(&cfg)?;
    println!("Games read: {}", report.games_in);
    println!("Total unique games: {}", report.games_written);
    println!(
        "Written {} ({} KB)",
        cfg.output.display(),
        report.bytes / 1024
    );
    Ok(())
}
