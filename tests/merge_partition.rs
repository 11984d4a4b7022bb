mod common;

use std::collections::BTreeSet;
use std::fs;

use tempfile::TempDir;

use common::{config_in, read_file, write_file};
use understat_datasets::ScrapeError;
use understat_datasets::checkpoint::CheckpointStore;
use understat_datasets::league::{League, SeasonKey};
use understat_datasets::merge::{fold_batch, merge_shot_exports, merge_tables};
use understat_datasets::partition::{partition_shots, partition_table};
use understat_datasets::table::{ColumnFix, Table};

const HEADER: &str = "id,minute,player,h_team,a_team,season\n";

fn table(rows: &[&str]) -> Table {
    let headers = HEADER.trim().split(',').map(str::to_string).collect();
    let mut t = Table::new(headers);
    for row in rows {
        t.rows.push(row.split(',').map(str::to_string).collect());
    }
    t
}

fn teams(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn sorted_rows(t: &Table) -> Vec<Vec<String>> {
    let mut rows = t.rows.clone();
    rows.sort();
    rows
}

#[test]
fn merge_fixes_encoded_apostrophes() {
    let merged = merge_tables(&[table(&["1,10,N&#039;Golo Kanté,Chelsea,Arsenal,2019"])]);
    assert_eq!(merged.cell(0, "player"), Some("N'Golo Kanté"));
}

#[test]
fn merging_a_table_with_itself_doubles_rows() {
    let t = table(&[
        "1,10,A,Chelsea,Arsenal,2019",
        "2,55,B,Arsenal,Chelsea,2019",
    ]);
    let merged = merge_tables(&[t.clone(), t.clone()]);
    assert_eq!(merged.len(), 2 * t.len());
}

#[test]
fn merge_row_membership_ignores_input_order() {
    let a = table(&["1,10,A,Chelsea,Arsenal,2019"]);
    let b = table(&["2,55,B,Arsenal,Chelsea,2019", "3,70,C,Everton,Burnley,2020"]);
    let c = table(&["4,12,D,Burnley,Everton,2020"]);

    let abc = merge_tables(&[a.clone(), b.clone(), c.clone()]);
    let cab = merge_tables(&[c.clone(), a.clone(), b.clone()]);
    let nested = merge_tables(&[merge_tables(&[a, b]), c]);

    assert_eq!(sorted_rows(&abc), sorted_rows(&cab));
    assert_eq!(sorted_rows(&abc), sorted_rows(&nested));
}

#[test]
fn batch_without_player_column_skips_the_fix() {
    let mut batch = Table::new(vec!["id".into(), "h_team".into()]);
    batch.rows.push(vec!["1".into(), "Chelsea".into()]);
    assert_eq!(
        understat_datasets::merge::fix_player_names(&mut batch),
        ColumnFix::MissingColumn
    );

    let folded = fold_batch(batch, table(&["2,5,O&#039;Neil,Arsenal,Chelsea,2019"]));
    assert_eq!(folded.len(), 2);
    assert_eq!(folded.cell(0, "h_team"), Some("Chelsea"));
    assert_eq!(folded.cell(0, "player"), Some(""));
}

#[test]
fn fold_puts_new_batch_first() {
    let canonical = table(&["1,10,A,Chelsea,Arsenal,2019"]);
    let batch = table(&["9,90,O&#039;Reilly,Arsenal,Chelsea,2020"]);
    let folded = fold_batch(batch, canonical);
    assert_eq!(folded.cell(0, "player"), Some("O'Reilly"));
    assert_eq!(folded.cell(1, "id"), Some("1"));
}

#[test]
fn partition_keeps_home_team_and_season_matches() {
    let canonical = table(&[
        "1,10,A,Chelsea,Arsenal,2019",
        "2,20,B,Chelsea,Arsenal,2020",
        "3,30,C,Real Madrid,Chelsea,2019",
        "4,40,D,Arsenal,Chelsea,2019.0",
    ]);
    let part = partition_table(&canonical, &teams(&["Chelsea", "Arsenal"]), 2019).unwrap();
    let ids: Vec<&str> = part.rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(ids, ["1", "4"]);
}

#[test]
fn partition_ignores_away_team_membership() {
    // The away side is in the league set, the home side is not.
    let canonical = table(&["1,10,A,Galatasaray,Chelsea,2019"]);
    let part = partition_table(&canonical, &teams(&["Chelsea"]), 2019).unwrap();
    assert!(part.is_empty());
}

#[test]
fn partition_requires_home_team_column() {
    let mut canonical = Table::new(vec!["id".into(), "season".into()]);
    canonical.rows.push(vec!["1".into(), "2019".into()]);
    match partition_table(&canonical, &teams(&["Chelsea"]), 2019) {
        Err(ScrapeError::MissingColumn { column }) => assert_eq!(column, "h_team"),
        other => panic!("expected missing column, got {other:?}"),
    }
}

fn seed_partition_inputs(config: &understat_datasets::config::DatasetConfig) {
    write_file(
        &config.canonical_shots_path(),
        &format!(
            "{HEADER}1,10,A,Chelsea,Arsenal,2019\n2,20,B,Zenit,Spartak,2019\n3,30,\"Smith, Jr\",Chelsea,Arsenal,2020\n"
        ),
    );
    let store = CheckpointStore::new(config);
    store
        .save_team_set(League::Epl, &teams(&["Chelsea", "Arsenal"]))
        .unwrap();
    store
        .save_team_set(League::Rfpl, &teams(&["Zenit", "Spartak"]))
        .unwrap();
}

#[test]
fn partition_files_follow_directory_layout() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(dir.path());
    config.leagues = vec![League::Epl, League::Rfpl];
    seed_partition_inputs(&config);
    let store = CheckpointStore::new(&config);

    let written = partition_shots(&config, &store, 2019, 2020).unwrap();

    assert_eq!(written.len(), 4);
    let epl_19 = config.shots_partition_path(&SeasonKey::new(League::Epl, 2019));
    assert!(epl_19.ends_with("datasets/epl/shots_epl_19-20.csv"));
    assert_eq!(
        read_file(&epl_19),
        format!("{HEADER}1,10,A,Chelsea,Arsenal,2019\n")
    );
    let epl_20 = config.shots_partition_path(&SeasonKey::new(League::Epl, 2020));
    assert_eq!(
        read_file(&epl_20),
        format!("{HEADER}3,30,\"Smith, Jr\",Chelsea,Arsenal,2020\n")
    );
    let rfpl_20 = config.shots_partition_path(&SeasonKey::new(League::Rfpl, 2020));
    assert_eq!(read_file(&rfpl_20), HEADER);
}

#[test]
fn partitioning_twice_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(dir.path());
    config.leagues = vec![League::Epl, League::Rfpl];
    seed_partition_inputs(&config);
    let store = CheckpointStore::new(&config);

    let first = partition_shots(&config, &store, 2019, 2020).unwrap();
    let first_bytes: Vec<Vec<u8>> = first.iter().map(|p| fs::read(p).unwrap()).collect();
    let second = partition_shots(&config, &store, 2019, 2020).unwrap();
    let second_bytes: Vec<Vec<u8>> = second.iter().map(|p| fs::read(p).unwrap()).collect();

    assert_eq!(first, second);
    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn partition_without_team_set_fails() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(dir.path());
    config.leagues = vec![League::SerieA];
    write_file(&config.canonical_shots_path(), HEADER);
    let store = CheckpointStore::new(&config);

    assert!(matches!(
        partition_shots(&config, &store, 2019, 2019),
        Err(ScrapeError::Io { .. })
    ));
}

#[test]
fn export_merge_rebuilds_canonical_from_run_files() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    write_file(
        &config.datasets_dir.join("shots_b.csv"),
        &format!("{HEADER}2,20,O&#039;Shea,Arsenal,Chelsea,2019\n"),
    );
    write_file(
        &config.datasets_dir.join("shots_a.csv"),
        &format!("{HEADER}1,10,A,Chelsea,Arsenal,2019\n"),
    );
    write_file(&config.canonical_shots_path(), &format!("{HEADER}0,0,old,X,Y,2018\n"));
    write_file(&config.datasets_dir.join("notes.txt"), "ignored");
    write_file(
        &config.datasets_dir.join("epl").join("shots_epl_19-20.csv"),
        &format!("{HEADER}5,5,sub,Chelsea,Arsenal,2019\n"),
    );

    let summary = merge_shot_exports(&config).unwrap();

    assert_eq!(summary.files.len(), 2);
    assert_eq!(summary.rows, 2);
    assert_eq!(
        read_file(&config.canonical_shots_path()),
        format!("{HEADER}1,10,A,Chelsea,Arsenal,2019\n2,20,O'Shea,Arsenal,Chelsea,2019\n")
    );
}

#[test]
fn short_rows_are_padded_and_wide_rows_rejected() {
    let dir = TempDir::new().unwrap();
    let short = dir.path().join("short.csv");
    write_file(&short, "id,player,h_team\n1,A\n");
    let table = Table::read_csv(&short).unwrap();
    assert_eq!(table.rows[0], ["1", "A", ""]);

    let wide = dir.path().join("wide.csv");
    write_file(&wide, "id,player\n1,A\n2,B,extra\n");
    match Table::read_csv(&wide).unwrap_err() {
        ScrapeError::WideRow {
            line, cells, width, ..
        } => assert_eq!((line, cells, width), (3, 3, 2)),
        other => panic!("expected WideRow, got {other:?}"),
    }
}
