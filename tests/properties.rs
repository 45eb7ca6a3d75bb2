//! Seeded property sweeps over the forecast pipeline.

mod common;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use cel_forecast::config::EngineConfig;
use cel_forecast::forecast::compute_forecast;
use cel_forecast::history::HistoricalData;

const CASES: usize = 500;

fn random_history(rng: &mut StdRng) -> HistoricalData {
    let production = rng.random::<f64>() * 400.0;
    let consumption = rng.random::<f64>() * 300.0;
    let capacity = 0.5 + rng.random::<f64>() * 60.0;
    HistoricalData::new(production, consumption, capacity).unwrap()
}

#[test]
fn profiles_respect_bounds_and_conserve_energy() {
    let mut rng = StdRng::seed_from_u64(42);
    for config in [EngineConfig::baseline(), EngineConfig::summer(), EngineConfig::winter()] {
        let daylight = config.production.daylight_hours() as f64;
        for _ in 0..CASES {
            let data = random_history(&mut rng);
            let fc = compute_forecast("prop", &data, &config).unwrap();
            let cap = data.installed_capacity_kwp;

            for p in &fc.forecast {
                assert!(p.production_kw >= 0.0, "{data:?}: {p:?}");
                assert!(p.expected_consumption_kw >= 0.0, "{data:?}: {p:?}");
                assert!(p.production_kw <= cap + common::EPS, "{data:?}: {p:?}");
                let diff = p.production_kw - p.expected_consumption_kw;
                assert!((p.expected_surplus_kw - diff).abs() < common::EPS);
            }

            let produced = common::total_production(&fc.forecast);
            let tol = 1e-6 * data.avg_daily_production_kwh.max(1.0);
            assert!((produced + fc.curtailed_kwh - data.avg_daily_production_kwh).abs() < tol);
            assert!(produced <= cap * daylight + tol);
            assert!(fc.curtailed_kwh >= 0.0);

            let consumed = common::total_consumption(&fc.forecast);
            let tol = 1e-6 * data.avg_daily_consumption_kwh.max(1.0);
            assert!((consumed - data.avg_daily_consumption_kwh).abs() < tol);
        }
    }
}

#[test]
fn windows_are_maximal_disjoint_and_ranked() {
    let mut rng = StdRng::seed_from_u64(7);
    let config = EngineConfig::baseline();
    let min = config.thresholds.min_surplus_kw;

    for _ in 0..CASES {
        let data = random_history(&mut rng);
        let fc = compute_forecast("prop", &data, &config).unwrap();
        let above = |h: u8| fc.forecast[usize::from(h)].expected_surplus_kw > min;

        let mut covered = [false; 24];
        for w in &fc.optimal_windows {
            assert!(w.start_hour <= w.end_hour && w.end_hour < 24);
            assert!((w.start_hour..=w.end_hour).all(above));
            if w.start_hour > 0 {
                assert!(!above(w.start_hour - 1));
            }
            if w.end_hour < 23 {
                assert!(!above(w.end_hour + 1));
            }

            let total: f64 = (w.start_hour..=w.end_hour)
                .map(|h| fc.forecast[usize::from(h)].expected_surplus_kw)
                .sum();
            assert!((w.total_surplus_kwh - total).abs() < common::EPS);
            assert!((w.avg_surplus_kw * f64::from(w.length_hours()) - total).abs() < 1e-6);

            for h in w.start_hour..=w.end_hour {
                assert!(!covered[usize::from(h)], "windows overlap at {h}");
                covered[usize::from(h)] = true;
            }
        }
        // every hour above the threshold belongs to some window
        for h in 0..24u8 {
            assert_eq!(covered[usize::from(h)], above(h));
        }
        for pair in fc.optimal_windows.windows(2) {
            assert!(pair[0].total_surplus_kwh >= pair[1].total_surplus_kwh);
        }
    }
}

#[test]
fn forecasts_are_deterministic() {
    let mut rng = StdRng::seed_from_u64(2024);
    let config = EngineConfig::baseline();
    for _ in 0..50 {
        let data = random_history(&mut rng);
        let a = compute_forecast("prop", &data, &config).unwrap();
        let b = compute_forecast("prop", &data, &config).unwrap();
        assert_eq!(a, b);
    }
}
