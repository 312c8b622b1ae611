pub mod betting_lines;
pub mod config;
pub mod game_extract;
pub mod game_record;
pub mod http_client;
pub mod logging;
pub mod pipeline;
pub mod primetime;
pub mod reconcile;
pub mod schedule_table;
pub mod scores_export;
pub mod season_fetch;
pub mod store;
pub mod web_asset;
