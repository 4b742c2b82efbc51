use boog_terminal::chart::{PALETTE, TickFormat, build_chart, extent, percent_format};
use boog_terminal::dataset::{Dataset, Metric};
use boog_terminal::state::AppState;

const TWO_PLAYERS: &str = r#"{
    "Alpha": [[20, 1.0, 1.0, 0.1, 0.1], [21, 1.2, 2.2, 0.2, 0.2]],
    "Beta":  [[20, 0.5, 0.5, 0.1, 0.1], [22, 0.9, 1.4, 0.2, 0.2]]
}"#;

fn two_player_dataset() -> Dataset {
    Dataset::parse(TWO_PLAYERS).expect("valid dataset")
}

fn as_names(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn domains_union_across_series() {
    let dataset = two_player_dataset();
    let spec = build_chart(Metric::ByAge, &dataset, &as_names(&["Alpha", "Beta"]))
        .expect("chart should build");

    assert_eq!(spec.x_domain, [20.0, 22.0]);
    // Pre-nicing extent of the values.
    let values = spec
        .series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.1));
    assert_eq!(extent(values), Some((0.5, 1.2)));
    // [0.5, 1.2] already sits on 0.1 boundaries, so nicing keeps it.
    assert_eq!(spec.y_domain, [0.5, 1.2]);
}

#[test]
fn one_polyline_per_player_in_roster_order() {
    let dataset = two_player_dataset();
    let spec = build_chart(Metric::Cumulative, &dataset, &as_names(&["Beta", "Alpha"]))
        .expect("chart should build");

    assert_eq!(spec.series.len(), 2);
    assert_eq!(spec.series[0].player, "Beta");
    assert_eq!(spec.series[1].player, "Alpha");
    // Palette colors are assigned positionally, stable per render.
    assert_eq!(spec.series[0].color, PALETTE[0]);
    assert_eq!(spec.series[1].color, PALETTE[1]);
    assert_eq!(spec.series[1].points, vec![(20.0, 1.0), (21.0, 2.2)]);
}

#[test]
fn players_without_points_are_left_out() {
    let raw = r#"{"Alpha": [[20, 1.0, 1.0, null, null]], "Beta": [[20, 0.5, 0.5, 0.1, 0.1]]}"#;
    let dataset = Dataset::parse(raw).expect("valid dataset");
    let spec = build_chart(Metric::HofChance, &dataset, &as_names(&["Alpha", "Beta"]))
        .expect("chart should build");
    assert_eq!(spec.series.len(), 1);
    assert_eq!(spec.series[0].player, "Beta");
}

#[test]
fn chart_without_any_points_is_none() {
    let dataset = two_player_dataset();
    assert!(build_chart(Metric::ByAge, &dataset, &[]).is_none());
    assert!(build_chart(Metric::ByAge, &dataset, &as_names(&["Nobody"])).is_none());
}

#[test]
fn large_percent_domains_use_integer_labels() {
    // Ticks over [0, 0.3] scale to a 30% top tick, more than the tick
    // count, so whole percents are enough.
    let raw = r#"{"Alpha": [[20, 1.0, 1.0, 0.0, 0.0], [30, 1.0, 2.0, 0.3, 0.3]]}"#;
    let dataset = Dataset::parse(raw).expect("valid dataset");
    let spec = build_chart(Metric::HofChance, &dataset, &as_names(&["Alpha"]))
        .expect("chart should build");
    assert_eq!(spec.y_format, TickFormat::PercentInt);
}

#[test]
fn small_percent_domains_keep_one_decimal() {
    // A 2% top tick over ~11 ticks would collapse to misleading labels
    // without the decimal digit.
    let raw = r#"{"Alpha": [[20, 1.0, 1.0, 0.0, 0.0], [30, 1.0, 2.0, 0.02, 0.02]]}"#;
    let dataset = Dataset::parse(raw).expect("valid dataset");
    let spec = build_chart(Metric::HofChance, &dataset, &as_names(&["Alpha"]))
        .expect("chart should build");
    assert_eq!(spec.y_format, TickFormat::PercentOneDecimal);
}

#[test]
fn percent_format_boundary() {
    // Five ticks topping out at 20%: 20 > 5 picks integers.
    assert_eq!(
        percent_format(&[0.0, 0.05, 0.1, 0.15, 0.2]),
        TickFormat::PercentInt
    );
    // Five ticks topping out at 4%: 4 <= 5 keeps a decimal.
    assert_eq!(
        percent_format(&[0.0, 0.01, 0.02, 0.03, 0.04]),
        TickFormat::PercentOneDecimal
    );
}

#[test]
fn non_percentage_metrics_use_plain_labels() {
    let dataset = two_player_dataset();
    let spec = build_chart(Metric::Cumulative, &dataset, &as_names(&["Alpha"]))
        .expect("chart should build");
    assert_eq!(spec.y_format, TickFormat::Plain);
}

#[test]
fn rerender_replaces_charts_instead_of_accumulating() {
    let mut state = AppState::new();
    state.dataset = Some(two_player_dataset());
    assert!(state.roster.add("Alpha"));

    assert!(state.render_charts());
    let first = state.charts.len();
    assert_eq!(first, 4);

    assert!(state.render_charts());
    assert_eq!(state.charts.len(), first);
    // Still exactly one polyline for the one chosen player.
    assert!(state.charts.iter().all(|spec| spec.series.len() == 1));
}

#[test]
fn empty_roster_render_is_a_noop() {
    let mut state = AppState::new();
    state.dataset = Some(two_player_dataset());
    assert!(!state.render_charts());
    assert!(state.charts.is_empty());
}
