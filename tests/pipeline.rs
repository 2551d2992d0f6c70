use std::io::Write;
use std::path::Path;

use claims_explorer::charts::{ChartKind, MissingReason};
use claims_explorer::config::AppConfig;
use claims_explorer::data::export::to_csv_bytes;
use claims_explorer::data::filter::ValueRange;
use claims_explorer::data::loader::{DatasetCache, load_file, parse_csv};
use claims_explorer::data::model::{ColumnType, Value};
use claims_explorer::state::UiState;
use claims_explorer::view::{FilterSection, ViewCache, ViewError, render};
use tempfile::NamedTempFile;

const CLAIMS_CSV: &str = "\
claim_nb,claim_amount,TX,RR,LAT,LON,pol_insee_code
1,100,5.0,1.0,48.8566,2.3522,75056
0,0,5.0,1.0,43.2965,5.3698,13055
2,300,7.0,1.0,45.7640,4.8357,69123
";

fn csv_file(contents: &str) -> NamedTempFile {
    let mut tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    write!(tmp, "{contents}").unwrap();
    tmp
}

#[test]
fn loading_twice_yields_equal_tables() {
    let tmp = csv_file(CLAIMS_CSV);
    let first = load_file(tmp.path()).unwrap();
    let second = load_file(tmp.path()).unwrap();
    assert_eq!(first, second);

    let cache = DatasetCache::new(tmp.path());
    assert_eq!(*cache.get().unwrap(), first);
}

#[test]
fn export_round_trips_through_the_loader() {
    let tmp = csv_file(CLAIMS_CSV);
    let table = load_file(tmp.path()).unwrap();

    let bytes = to_csv_bytes(&table).unwrap();
    let out = csv_file(std::str::from_utf8(&bytes).unwrap());
    let reloaded = load_file(out.path()).unwrap();

    assert_eq!(reloaded, table);
    assert_eq!(reloaded.column("TX").unwrap().kind, ColumnType::Numeric);
    assert_eq!(reloaded.column("pol_insee_code").unwrap().kind, ColumnType::Numeric);
}

#[test]
fn claim_amount_range_keeps_rows_one_and_three() {
    let tmp = csv_file(CLAIMS_CSV);
    let table = load_file(tmp.path()).unwrap();

    let mut state = UiState::new(&table, &AppConfig::default());
    state.set_filter_column("claim_amount".into());
    state.filter_range = ValueRange::new(100.0, 300.0);

    let output = render(&table, &state).unwrap();
    let Some(FilterSection::Applied {
        matched_rows,
        preview,
        csv,
        ..
    }) = &output.filter
    else {
        panic!("expected the filter to apply, got {:?}", output.filter);
    };

    assert_eq!(*matched_rows, 2);
    assert_eq!(
        preview.column("claim_amount").unwrap().values,
        vec![Value::Number(100.0), Value::Number(300.0)]
    );
    // Download carries the selected columns only.
    assert_eq!(
        preview.column_names().collect::<Vec<_>>(),
        vec!["claim_nb", "claim_amount", "TX", "RR"]
    );
    let downloaded = parse_csv(csv.as_slice(), Path::new("download")).unwrap();
    assert_eq!(&downloaded, preview);

    // Charts follow the filtered rows.
    let histogram = output.histogram.unwrap().unwrap();
    assert_eq!(histogram.total(), 2);
}

#[test]
fn degenerate_column_warns_and_keeps_every_row() {
    let tmp = csv_file(CLAIMS_CSV);
    let table = load_file(tmp.path()).unwrap();

    let mut state = UiState::new(&table, &AppConfig::default());
    state.set_filter_column("RR".into());

    let output = render(&table, &state).unwrap();
    match &output.filter {
        Some(FilterSection::Degenerate(w)) => {
            assert_eq!(w.column, "RR");
            assert_eq!(w.value, Some(1.0));
        }
        other => panic!("expected degenerate warning, got {other:?}"),
    }
    let geo = output.geo.unwrap();
    assert_eq!(geo.points.len(), 3);
}

#[test]
fn missing_lon_only_skips_the_map() {
    let tmp = csv_file("claim_nb,claim_amount,TX,RR,LAT\n1,100,5.0,1.0,48.8\n2,300,7.0,2.0,43.3\n");
    let table = load_file(tmp.path()).unwrap();
    let mut state = UiState::new(&table, &AppConfig::default());
    state.request_correlation();
    state.pair_columns = vec!["TX".into(), "RR".into()];

    let output = render(&table, &state).unwrap();

    let err = output.geo.as_ref().unwrap_err();
    assert_eq!(err.chart, ChartKind::Geographic);
    assert_eq!(err.column, "LON");
    assert_eq!(err.reason, MissingReason::Absent);
    assert_eq!(output.chart_errors().count(), 1);

    assert!(matches!(output.filter, Some(FilterSection::Applied { .. })));
    assert!(matches!(output.histogram, Some(Ok(_))));
    assert!(matches!(output.boxplot, Some(Ok(_))));
    assert!(matches!(output.correlation, Some(Ok(_))));
    assert!(matches!(output.pairplot, Some(Ok(_))));
}

#[test]
fn expensive_charts_wait_for_the_user() {
    let tmp = csv_file(CLAIMS_CSV);
    let table = load_file(tmp.path()).unwrap();
    let state = UiState::new(&table, &AppConfig::default());

    let output = render(&table, &state).unwrap();
    assert!(output.correlation.is_none());
    assert!(output.pairplot.is_none());
    assert!(output.stats.is_none());
}

#[test]
fn correlation_is_kept_until_requested_again() {
    let tmp = csv_file(CLAIMS_CSV);
    let table = load_file(tmp.path()).unwrap();
    let mut state = UiState::new(&table, &AppConfig::default());
    state.set_filter_column("claim_amount".into());
    let mut view = ViewCache::default();

    let nb_tx = |view: &mut ViewCache, state: &mut UiState| {
        let output = view.refresh(&table, state).unwrap().as_ref().unwrap();
        let spec = output.correlation.clone().unwrap().unwrap();
        spec.get("claim_nb", "TX").unwrap()
    };

    state.request_correlation();
    let first = nb_tx(&mut view, &mut state);
    assert!(!state.correlation_requested);
    assert!((first - 0.866_025).abs() < 1e-5);

    // Narrowing the range alone leaves the matrix as it was computed.
    state.filter_range = ValueRange::new(100.0, 300.0);
    assert_eq!(nb_tx(&mut view, &mut state), first);

    state.request_correlation();
    assert!((nb_tx(&mut view, &mut state) - 1.0).abs() < 1e-12);
}

#[test]
fn nothing_is_correlated_before_the_first_request() {
    let tmp = csv_file(CLAIMS_CSV);
    let table = load_file(tmp.path()).unwrap();
    let mut state = UiState::new(&table, &AppConfig::default());
    let mut view = ViewCache::default();

    let output = view.refresh(&table, &mut state).unwrap().as_ref().unwrap();
    assert!(output.correlation.is_none());
}

#[test]
fn empty_selection_shows_nothing_but_still_filters() {
    let tmp = csv_file(CLAIMS_CSV);
    let table = load_file(tmp.path()).unwrap();
    let mut state = UiState::new(&table, &AppConfig::default());
    state.selected_columns.clear();
    state.show_stats = true;

    let output = render(&table, &state).unwrap();
    assert_eq!(output.preview.n_cols(), 0);
    assert_eq!(output.stats.as_deref().map(<[_]>::len), Some(0));
    match &output.filter {
        Some(FilterSection::Applied { preview, .. }) => assert_eq!(preview.n_cols(), 7),
        other => panic!("expected the filter to apply, got {other:?}"),
    }
}

#[test]
fn unknown_selected_column_aborts_the_pass() {
    let tmp = csv_file(CLAIMS_CSV);
    let table = load_file(tmp.path()).unwrap();
    let mut state = UiState::new(&table, &AppConfig::default());
    state.selected_columns.push("not_a_column".into());

    assert!(matches!(
        render(&table, &state),
        Err(ViewError::ColumnNotFound(e)) if e.0 == "not_a_column"
    ));
}

#[test]
fn chart_specs_serialize_to_json() {
    let tmp = csv_file(CLAIMS_CSV);
    let table = load_file(tmp.path()).unwrap();
    let mut state = UiState::new(&table, &AppConfig::default());
    state.request_correlation();

    let output = render(&table, &state).unwrap();
    let geo = serde_json::to_value(output.geo.as_ref().unwrap()).unwrap();
    assert_eq!(geo["size_column"], "claim_nb");
    assert_eq!(geo["points"].as_array().unwrap().len(), 3);
    assert_eq!(geo["points"][0]["label"], "75056");

    let corr = serde_json::to_value(output.correlation.unwrap().unwrap()).unwrap();
    assert_eq!(corr["columns"].as_array().unwrap().len(), 7);
}
