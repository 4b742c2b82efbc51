use std::fs;
use std::path::PathBuf;

use boog_terminal::dataset::{Dataset, Metric};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_positional_fixture() {
    let raw = read_fixture("boog.json");
    let dataset = Dataset::parse(&raw).expect("fixture should parse");
    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.names(), ["Babe Ruth", "Hank Aaron", "Willie Mays"]);
    // All four metrics carry data in the positional shape.
    assert_eq!(dataset.metrics(), Metric::ALL);
}

#[test]
fn parses_named_fixture() {
    let raw = read_fixture("maws.json");
    let dataset = Dataset::parse(&raw).expect("fixture should parse");
    assert_eq!(dataset.len(), 2);
    // The named shape has no probability columns, so only two charts exist.
    assert_eq!(dataset.metrics(), [Metric::Cumulative, Metric::ByAge]);
    assert_eq!(dataset.series("Ted Williams", Metric::ByAge), vec![
        (20.0, 0.664),
        (21.0, 0.532),
        (22.0, 1.042)
    ]);
    assert!(dataset.series("Ted Williams", Metric::HofChance).is_empty());
}

#[test]
fn null_metric_slots_are_skipped() {
    let raw = read_fixture("boog.json");
    let dataset = Dataset::parse(&raw).expect("fixture should parse");
    // Ruth's age-19 season has no hof/bbwaa rates yet.
    let hof = dataset.series("Babe Ruth", Metric::HofChance);
    assert_eq!(hof.first(), Some(&(20.0, 0.001)));
    assert_eq!(hof.len(), 3);
}

#[test]
fn series_for_unknown_player_is_empty() {
    let raw = read_fixture("boog.json");
    let dataset = Dataset::parse(&raw).expect("fixture should parse");
    assert!(dataset.series("Nobody", Metric::Cumulative).is_empty());
    assert!(!dataset.contains("Nobody"));
}

#[test]
fn non_object_dataset_is_an_error() {
    assert!(Dataset::parse("[1,2,3]").is_err());
    assert!(Dataset::parse("null").is_err());
}
