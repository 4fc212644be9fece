// main.rs
use std::process::ExitCode;

use risk_territory_engine::map_config::MapConfig;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Usage: risk_territory_engine <map.json>
    let args: Vec<String> = std::env::args().collect();
    let Some(path) = args.get(1) else {
        let program = args.first().map(String::as_str).unwrap_or("risk_territory_engine");
        error!("usage: {program} <map.json>");
        return ExitCode::FAILURE;
    };

    let mut board = match MapConfig::load_from_file(path).and_then(|config| config.to_board()) {
        Ok(board) => board,
        Err(err) => {
            error!(%path, "{err}");
            return ExitCode::FAILURE;
        }
    };

    let valid = board.is_map_valid();
    match serde_json::to_string_pretty(&board.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            error!("failed to serialize snapshot: {err}");
            return ExitCode::FAILURE;
        }
    }

    if valid {
        info!(%path, "map is valid");
        ExitCode::SUCCESS
    } else {
        error!(%path, "map is not strongly connected");
        ExitCode::FAILURE
    }
}
