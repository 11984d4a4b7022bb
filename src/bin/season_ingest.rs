use anyhow::{Context, Result};

use understat_datasets::cli_args::{args, has_flag, parse_flag};
use understat_datasets::config::DatasetConfig;
use understat_datasets::logging::init_tracing;
use understat_datasets::page::HttpPageFetcher;
use understat_datasets::season::{build_team_sets, export_player_tables};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing();

    let args = args();
    let config = DatasetConfig::from_env();
    let first = parse_flag(&args, "first")?.unwrap_or(config.first_year);
    let last = parse_flag(&args, "last")?.unwrap_or(config.last_year);

    // Neither flag means both.
    let mut teams = has_flag(&args, "teams");
    let mut players = has_flag(&args, "players");
    if !teams && !players {
        teams = true;
        players = true;
    }

    let fetcher = HttpPageFetcher::new()?;

    if teams {
        let sets = build_team_sets(fetcher, &config, first, last).context("team sets failed")?;
        println!("Team sets {first}-{last}");
        for (league, names) in &sets {
            println!("  {league}: {} teams", names.len());
        }
    }
    if players {
        let written =
            export_player_tables(fetcher, &config, first, last).context("player export failed")?;
        println!("Player tables written: {}", written.len());
    }
    Ok(())
}
