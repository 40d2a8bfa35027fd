use approx::assert_relative_eq;
use chrono::{Datelike, NaiveDate, Weekday};
use configuration::ZoomSettings;
use core_types::{Event, PriceTable, RecoveryDays, WindowConfig};
use engine::{EventOutcome, EventStudy};

const TICKERS: [&str; 3] = ["^GSPC", "XLE", "XLK"];

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn tickers() -> Vec<String> {
    TICKERS.iter().map(|t| t.to_string()).collect()
}

fn market_return(i: usize) -> f64 {
    0.001 + 0.01 * (i as f64 * 0.7).sin()
}

/// 120 weekdays from 2020-01-01. XLE moves 1.5x the market, XLK 0.5x.
fn synthetic_table() -> PriceTable {
    let mut dates = Vec::new();
    let mut date = d("2020-01-01");
    while dates.len() < 120 {
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            dates.push(date);
        }
        date = date.succ_opt().unwrap();
    }

    let (mut market, mut energy, mut tech) = (100.0, 50.0, 80.0);
    let mut rows = vec![vec![Some(market), Some(energy), Some(tech)]];
    for i in 1..dates.len() {
        let r = market_return(i);
        market *= 1.0 + r;
        energy *= 1.0 + 1.5 * r;
        tech *= 1.0 + 0.5 * r;
        rows.push(vec![Some(market), Some(energy), Some(tech)]);
    }
    PriceTable::new(tickers(), dates, rows).unwrap()
}

fn study() -> EventStudy {
    EventStudy::new(
        &tickers(),
        "^GSPC",
        WindowConfig {
            pre_window: 20,
            post_window: 20,
        },
    )
    .unwrap()
}

#[test]
fn full_window_summary_excludes_the_market_and_recovers_betas() {
    let study = study();
    let table = synthetic_table();
    let prepared = study
        .prepare(&table, &Event::new(d("2020-03-16"), "COVID-19"))
        .unwrap();
    assert_eq!(prepared.anchor(), d("2020-03-16"));
    assert_eq!(prepared.raw.len(), 41);

    let report = study.analyze_zoom(&prepared, prepared.max_zoom());
    let summary = report.summary.as_ref().unwrap();
    let order: Vec<&str> = summary.rows.iter().map(|r| r.ticker.as_str()).collect();
    assert_eq!(order, vec!["XLE", "XLK"]);

    assert_relative_eq!(summary.get("XLE").unwrap().beta, 1.5, epsilon = 1e-6);
    assert_relative_eq!(summary.get("XLK").unwrap().beta, 0.5, epsilon = 1e-6);

    // Three times the market's swing, so three times the dispersion.
    let xle = summary.get("XLE").unwrap();
    let xlk = summary.get("XLK").unwrap();
    assert!(xle.volatility > xlk.volatility);
    assert!(xle.max_drawdown >= 0.0 && xlk.max_drawdown >= 0.0);

    let recommendations = report.recommendations.as_ref().unwrap();
    assert_eq!(recommendations.defensive.as_deref(), Some("XLK"));
    assert!(recommendations.growth.is_some());
}

/// The market and XLE (2x the market) from [`synthetic_table`], plus an XLF
/// column that never received a single price.
fn table_with_empty_column() -> PriceTable {
    let base = synthetic_table();
    let mut energy = 50.0;
    let rows = base
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            if i > 0 {
                energy *= 1.0 + 2.0 * market_return(i);
            }
            vec![row[0], Some(energy), None]
        })
        .collect();
    let tickers = vec!["^GSPC".to_string(), "XLE".to_string(), "XLF".to_string()];
    PriceTable::new(tickers, base.dates().to_vec(), rows).unwrap()
}

#[test]
fn empty_column_does_not_blank_other_assets() {
    let tickers = vec!["^GSPC".to_string(), "XLE".to_string(), "XLF".to_string()];
    let study = EventStudy::new(
        &tickers,
        "^GSPC",
        WindowConfig {
            pre_window: 20,
            post_window: 20,
        },
    )
    .unwrap();
    let prepared = study
        .prepare(&table_with_empty_column(), &Event::new(d("2020-03-16"), "COVID-19"))
        .unwrap();

    let report = study.analyze_zoom(&prepared, prepared.max_zoom());
    let summary = report.summary.as_ref().unwrap();
    let xle = summary.get("XLE").unwrap();
    assert_relative_eq!(xle.beta, 2.0, epsilon = 1e-6);
    assert!(xle.volatility.is_finite() && xle.volatility > 0.0);
    assert!(summary.get("XLF").unwrap().beta.is_nan());

    let picks = report.recommendations.as_ref().unwrap();
    assert_eq!(picks.defensive.as_deref(), Some("XLE"));

    // The empty asset is called out instead of passing silently.
    assert!(!report.is_complete());
    assert!(report.notes.iter().any(|n| n.starts_with("XLF: beta")));
    assert!(report.notes.iter().all(|n| !n.starts_with("XLE")));
}

#[test]
fn returns_match_the_visible_boundary_rows() {
    let study = study();
    let table = synthetic_table();
    let prepared = study
        .prepare(&table, &Event::new(d("2020-03-16"), "COVID-19"))
        .unwrap();

    let report = study.analyze_zoom(&prepared, 30);
    let returns = report.returns.as_ref().unwrap();
    let slice = prepared.normalized.zoom(30);
    let column = slice.column_index("XLE").unwrap();
    let first = slice.rows()[0][column].unwrap();
    let last = slice.rows()[slice.len() - 1][column].unwrap();

    assert_eq!(returns["XLE"].pre_return, 1.0 / first - 1.0);
    assert_eq!(returns["XLE"].post_return, last - 1.0);
    assert!(returns.contains_key("^GSPC"));
}

#[test]
fn one_row_slice_is_insufficient_not_fabricated() {
    let study = study();
    let table = synthetic_table();
    let prepared = study
        .prepare(&table, &Event::new(d("2020-03-16"), "COVID-19"))
        .unwrap();

    let report = study.analyze_zoom(&prepared, 0);
    assert_eq!(report.visible_rows, 1);
    assert!(report.returns.is_none());
    assert!(report.betas.is_none());
    assert!(report.summary.is_none());
    assert!(report.notes.iter().any(|n| n.starts_with("Returns")));
    assert!(report.notes.iter().any(|n| n.starts_with("Beta")));
}

#[test]
fn run_covers_every_event_and_preset() {
    let study = study();
    let table = synthetic_table();
    let presets = ZoomSettings::default().presets;
    let events = vec![
        Event::new(d("2020-03-16"), "COVID-19"),
        // A Saturday before the history starts snaps to the first row.
        Event::new(d("2019-12-28"), "Before history"),
    ];

    let report = study.run(&table, &events, &presets);
    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.failed(), 0);

    let covid = report.outcomes[0].report().unwrap();
    assert_eq!(covid.zooms.len(), presets.len());
    let full = covid.zooms.last().unwrap();
    assert_eq!(full.requested_zoom, None);
    assert_eq!(full.effective_zoom, covid.max_zoom);

    // No pre-event rows: nothing to recover to.
    let early = report.outcomes[1].report().unwrap();
    assert_eq!(early.anchor, d("2020-01-01"));
    let summary = early.zooms.last().unwrap().summary.as_ref().unwrap();
    assert!(summary
        .rows
        .iter()
        .all(|r| r.days_to_recovery == RecoveryDays::Unbounded));
    let picks = early.zooms.last().unwrap().recommendations.as_ref().unwrap();
    assert_eq!(picks.fastest_recovery, None);
}

#[test]
fn empty_table_fails_each_event_without_aborting_the_run() {
    let study = study();
    let table = PriceTable::new(tickers(), vec![], vec![]).unwrap();
    let events = vec![
        Event::new(d("2020-03-16"), "COVID-19"),
        Event::new(d("2022-02-24"), "Invasion of Ukraine"),
    ];

    let report = study.run(&table, &events, &ZoomSettings::default().presets);
    assert_eq!(report.failed(), 2);
    for (outcome, event) in report.outcomes.iter().zip(&events) {
        assert_eq!(outcome.event(), event);
        match outcome {
            EventOutcome::Failed { error, .. } => assert!(error.contains("No price data")),
            EventOutcome::Completed(_) => panic!("expected a failed outcome"),
        }
    }
}

#[test]
fn report_serializes_with_status_tags_and_null_for_missing_values() {
    let study = study();
    let table = synthetic_table();
    let report = study.run(
        &table,
        &[Event::new(d("2019-12-28"), "Before history")],
        &ZoomSettings::default().presets,
    );

    let json = serde_json::to_value(&report).unwrap();
    let outcome = &json["outcomes"][0];
    assert_eq!(outcome["status"], "completed");
    assert_eq!(outcome["anchor"], "2020-01-01");
    let row = &outcome["zooms"][6]["summary"]["rows"][0];
    assert!(row["days_to_recovery"].is_null());
}
