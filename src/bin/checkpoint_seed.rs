use anyhow::{Context, Result, anyhow};

use understat_datasets::MatchId;
use understat_datasets::checkpoint::CheckpointStore;
use understat_datasets::cli_args::{args, flag_value, parse_flag, require_flag};
use understat_datasets::config::{DatasetConfig, UPDATE_CHECKPOINT};
use understat_datasets::logging::init_tracing;

/// Maintenance for the update checkpoint:
///   --from N --to N          replace it with a fresh id range
///   --retain-from N          drop ids the site will never use
///   --merge-prefix P         fold legacy `P*.txt` lists into `empty_url.txt`
fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing();

    let args = args();
    let config = DatasetConfig::from_env();
    let store = CheckpointStore::new(&config);

    if let Some(prefix) = flag_value(&args, "merge-prefix") {
        let merged = store
            .merge_unresolved_lists(&prefix, "empty_url.txt")
            .context("merge unresolved lists")?;
        println!("Merged {} ids into empty_url.txt", merged.len());
        return Ok(());
    }

    if let Some(first_live) = parse_flag::<MatchId>(&args, "retain-from")? {
        let removed = store
            .retain_from(UPDATE_CHECKPOINT, first_live)
            .context("prune update checkpoint")?;
        println!("Removed {removed} ids below {first_live}");
        return Ok(());
    }

    let from: MatchId = require_flag(&args, "from")?;
    let to: MatchId = require_flag(&args, "to")?;
    if from > to {
        return Err(anyhow!("--from {from} is after --to {to}"));
    }
    let count = store
        .seed_update_checkpoint(from..=to)
        .context("seed update checkpoint")?;
    println!("Seeded {UPDATE_CHECKPOINT} with {count} ids");
    Ok(())
}
