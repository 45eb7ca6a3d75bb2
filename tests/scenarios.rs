//! End-to-end checks of the reference scenarios.

mod common;

use cel_forecast::EngineError;
use cel_forecast::config::{EngineConfig, Thresholds};
use cel_forecast::forecast::compute_forecast;
use cel_forecast::history::HistoricalData;
use cel_forecast::surplus::{
    BalanceState, Severity, Urgency, evaluate, find_optimal_windows, generate,
};

#[test]
fn reference_history_conserves_daily_energy() {
    let fc = common::reference_forecast();
    assert_eq!(fc.forecast.len(), 24);
    for (h, p) in fc.forecast.iter().enumerate() {
        assert_eq!(usize::from(p.hour), h);
    }
    assert!((common::total_production(&fc.forecast) - 50.0).abs() < 1e-6);
    assert!((common::total_consumption(&fc.forecast) - 100.0).abs() < 1e-6);
    assert_eq!(fc.curtailed_kwh, 0.0);
}

#[test]
fn reference_history_has_a_midday_surplus() {
    let fc = common::reference_forecast();
    let noon = fc.point(12).expect("hour 12");
    assert!(noon.expected_surplus_kw > 0.0);

    let best = fc.optimal_windows.first().expect("at least one window");
    assert!(best.contains(12));
    assert!(fc.point(2).expect("hour 2").expected_surplus_kw < 0.0);
}

#[test]
fn strong_sample_is_high_surplus() {
    let s = evaluate(12.0, 4.0, &Thresholds::default()).unwrap();
    assert_eq!(s.status, BalanceState::Surplus);
    assert_eq!(s.surplus_kw, 8.0);
    assert_eq!(s.severity, Severity::High);
}

#[test]
fn no_production_is_deficit() {
    let s = evaluate(0.0, 5.0, &Thresholds::default()).unwrap();
    assert_eq!(s.status, BalanceState::Deficit);
    assert_eq!(s.surplus_kw, -5.0);
}

#[test]
fn all_deficit_day_still_gets_a_recommendation() {
    let t = Thresholds::default();
    let forecast = common::forecast_from_surplus(&[-1.5; 24]);
    let windows = find_optimal_windows(&forecast, t.min_surplus_kw).unwrap();
    assert!(windows.is_empty());

    for hour in [0, 9, 13, 23] {
        let rec = generate("m-1", -1.5, hour, &forecast, &windows, &t).unwrap();
        assert_eq!(rec.items.len(), 1);
        assert_eq!(rec.items[0].urgency, Urgency::Later);
        assert_eq!(rec.items[0].confidence_kwh, 0.0);
        assert!(rec.items[0].window_ref.is_none());
    }
}

#[test]
fn short_strong_run_outranks_long_weak_run() {
    let mut surplus = [-1.0; 24];
    // 4 hours at 2 kW, then 2 hours at 5 kW
    surplus[8..12].fill(2.0);
    surplus[14..16].fill(5.0);
    let forecast = common::forecast_from_surplus(&surplus);

    let windows = find_optimal_windows(&forecast, Thresholds::default().min_surplus_kw).unwrap();
    assert_eq!(windows.len(), 2);
    assert_eq!((windows[0].start_hour, windows[0].end_hour), (14, 15));
    assert_eq!(windows[0].total_surplus_kwh, 10.0);
    assert_eq!((windows[1].start_hour, windows[1].end_hour), (8, 11));
    assert_eq!(windows[1].total_surplus_kwh, 8.0);

    // Before both windows the best one is suggested
    let rec = generate("m-1", 0.0, 6, &forecast, &windows, &Thresholds::default()).unwrap();
    assert_eq!(rec.items[0].window_ref, Some(windows[0]));
}

#[test]
fn recommendation_follows_the_day() {
    let fc = common::reference_forecast();
    let t = Thresholds::default();
    let best = fc.optimal_windows[0];

    let at = |hour: u8, surplus: f64| {
        generate("m-1", surplus, hour, &fc.forecast, &fc.optimal_windows, &t)
            .unwrap()
            .items
            .remove(0)
    };

    assert_eq!(at(12, 3.0).urgency, Urgency::Now);
    assert_eq!(at(best.start_hour - 1, 0.0).urgency, Urgency::Soon);
    assert_eq!(at(2, 0.0).urgency, Urgency::Later);
    assert_eq!(at(22, -2.0).confidence_kwh, 0.0);
}

#[test]
fn extreme_history_never_yields_infinite_totals() {
    assert!(matches!(
        HistoricalData::new(f64::MAX, 0.0, f64::MAX),
        Err(EngineError::InvalidHistoricalData(_))
    ));

    // Bypassing the constructor still fails before synthesis
    let raw = HistoricalData {
        avg_daily_production_kwh: f64::MAX,
        avg_daily_consumption_kwh: 0.0,
        installed_capacity_kwp: f64::MAX,
    };
    assert!(matches!(
        compute_forecast("o", &raw, &EngineConfig::baseline()),
        Err(EngineError::InvalidHistoricalData(_))
    ));

    let max = cel_forecast::history::MAX_MAGNITUDE;
    let data = HistoricalData::new(max, 0.0, max).unwrap();
    let fc = compute_forecast("o", &data, &EngineConfig::baseline()).unwrap();
    for w in &fc.optimal_windows {
        assert!(w.total_surplus_kwh.is_finite() && w.avg_surplus_kw.is_finite());
    }
    let summary = cel_forecast::surplus::ForecastSummary::from_forecast(&fc);
    assert!(summary.production_kwh.is_finite());
}
