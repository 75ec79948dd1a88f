//! Scenario: reference results over the historical IntraQuotes files.
//!
//! Needs `SPB_QUOTES_DIR` pointing at the directory holding `AMAT.txt`,
//! `C.txt`, `JD.txt`, `MU.txt` and `TWTR.txt`. Skips otherwise.
//!
//! The invalid-input cases need no data and always run.

use spb_analysis::{analyze, AnalysisRequest, AnalysisSettings, NullChartSink, StatisticsRecord};
use spb_md::{CsvQuoteStore, MemoryQuoteStore};
use spb_testkit::quotes_dir_from_env;

fn run(request: AnalysisRequest) -> Option<StatisticsRecord> {
    let Some(dir) = quotes_dir_from_env() else {
        eprintln!("SKIP: SPB_QUOTES_DIR not set");
        return None;
    };
    let store = CsvQuoteStore::new(dir);
    let outcome = analyze(&request, &AnalysisSettings::default(), &store, &NullChartSink)
        .expect("analysis over historical quotes");
    Some(outcome.record)
}

#[test]
fn amat_open_minus_prior_close_minimum() {
    if let Some(r) = run(AnalysisRequest::new("AMAT", "open_priorclose", 0.5)) {
        assert_eq!(r.min_price_change, -3.81);
    }
}

#[test]
fn mu_close_minus_open_std_ignores_cutoff() {
    if let Some(r) = run(AnalysisRequest::new("MU", "close_open", 0.5).with_cutoff("1800")) {
        assert_eq!(r.std, 1.252);
    }
}

#[test]
fn c_close_minus_prior_close_within_count() {
    if let Some(r) = run(AnalysisRequest::new("C", "close_priorclose", 1.0)) {
        assert_eq!(r.obs_btw_boundaries, 181);
    }
}

#[test]
fn jd_intraday_1835_mean() {
    if let Some(r) = run(AnalysisRequest::new("JD", "intraprice_open", 0.5).with_cutoff("1835")) {
        assert_eq!(r.mean, -0.069);
    }
}

#[test]
fn twtr_intraday_1900_observation_count() {
    if let Some(r) = run(AnalysisRequest::new("TWTR", "intraprice_open", 0.5).with_cutoff("1900")) {
        assert_eq!(r.all_obs_number, 248);
    }
}

#[test]
fn historical_records_are_internally_consistent() {
    for (ticker, mode, cutoff) in [
        ("AMAT", "open_priorclose", None),
        ("MU", "close_open", None),
        ("C", "close_priorclose", None),
        ("JD", "intraprice_open", Some("1835")),
        ("TWTR", "intraprice_open", Some("1900")),
    ] {
        let mut req = AnalysisRequest::new(ticker, mode, 1000.0);
        req.cutoff = cutoff.map(str::to_string);
        let Some(r) = run(req) else { return };
        assert!(r.min_price_change <= r.mean && r.mean <= r.max_price_change);
        assert_eq!(r.obs_btw_boundaries, r.all_obs_number, "{ticker} {mode}");
        assert_eq!(r.obs_btw_boundaries_perc, 100.0);
    }
}

fn rejected_kind(request: AnalysisRequest) -> &'static str {
    // Validation runs before loading, so an empty store is enough.
    analyze(
        &request,
        &AnalysisSettings::default(),
        &MemoryQuoteStore::new(),
        &NullChartSink,
    )
    .expect_err("request should be rejected")
    .kind()
}

#[test]
fn invalid_inputs_name_the_failing_field() {
    assert_eq!(
        rejected_kind(AnalysisRequest::new("TWTR1", "close_open", 0.5)),
        "INVALID_TICKER"
    );
    assert_eq!(
        rejected_kind(AnalysisRequest::new("TWTR", "intra_open", 0.5)),
        "INVALID_MODE"
    );
    assert_eq!(
        rejected_kind(AnalysisRequest::new("TWTR", "close_open", -0.5)),
        "INVALID_BOUNDARY"
    );
    assert_eq!(
        rejected_kind(AnalysisRequest::new("TWTR", "intraprice_open", 0.5).with_cutoff("1200")),
        "INVALID_CUTOFF_TIME"
    );
    assert_eq!(
        rejected_kind(AnalysisRequest::new("TWTR", "intraprice_open", 0.5).with_cutoff("2300")),
        "INVALID_CUTOFF_TIME"
    );
}
