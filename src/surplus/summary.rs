//! Post-hoc daily summary computed from a community forecast.

use std::fmt;

use serde::Serialize;

use crate::forecast::CommunityForecast;

/// Aggregate indicators for one forecast day.
///
/// Computed post-hoc from a [`CommunityForecast`] so the summary always
/// agrees with the hourly points.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSummary {
    /// Total production (kWh).
    pub production_kwh: f64,
    /// Total consumption (kWh).
    pub consumption_kwh: f64,
    /// Energy produced beyond concurrent consumption (kWh, >= 0).
    pub surplus_kwh: f64,
    /// Consumption not covered by concurrent production (kWh, >= 0).
    pub deficit_kwh: f64,
    /// Hour with the highest production.
    pub peak_production_hour: u8,
    /// Production at that hour (kW).
    pub peak_production_kw: f64,
    /// Share of production consumed locally (0.0 to 1.0).
    pub self_consumption_ratio: f64,
    /// Share of consumption covered locally (0.0 to 1.0).
    pub self_sufficiency_ratio: f64,
    /// Number of optimal windows.
    pub window_count: usize,
    /// Production dropped by the capacity bound (kWh).
    pub curtailed_kwh: f64,
}

impl ForecastSummary {
    /// Computes all indicators from the forecast.
    ///
    /// # Arguments
    ///
    /// * `fc` - Community forecast to summarize
    ///
    /// # Returns
    ///
    /// A `ForecastSummary` with all fields populated.
    pub fn from_forecast(fc: &CommunityForecast) -> Self {
        let mut production = 0.0_f64;
        let mut consumption = 0.0_f64;
        let mut surplus = 0.0_f64;
        let mut deficit = 0.0_f64;
        let mut local = 0.0_f64;
        let mut peak_hour = 0_u8;
        let mut peak_kw = 0.0_f64;

        for p in &fc.forecast {
            production += p.production_kw;
            consumption += p.expected_consumption_kw;
            surplus += p.expected_surplus_kw.max(0.0);
            deficit += (-p.expected_surplus_kw).max(0.0);
            local += p.production_kw.min(p.expected_consumption_kw);
            if p.production_kw > peak_kw {
                peak_kw = p.production_kw;
                peak_hour = p.hour;
            }
        }

        let ratio = |num: f64, den: f64| if den > 0.0 { num / den } else { 0.0 };

        Self {
            production_kwh: production,
            consumption_kwh: consumption,
            surplus_kwh: surplus,
            deficit_kwh: deficit,
            peak_production_hour: peak_hour,
            peak_production_kw: peak_kw,
            self_consumption_ratio: ratio(local, production),
            self_sufficiency_ratio: ratio(local, consumption),
            window_count: fc.optimal_windows.len(),
            curtailed_kwh: fc.curtailed_kwh,
        }
    }
}

impl fmt::Display for ForecastSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Daily Summary ---")?;
        writeln!(f, "Production:        {:.2} kWh", self.production_kwh)?;
        writeln!(f, "Consumption:       {:.2} kWh", self.consumption_kwh)?;
        writeln!(f, "Surplus:           {:.2} kWh", self.surplus_kwh)?;
        writeln!(f, "Deficit:           {:.2} kWh", self.deficit_kwh)?;
        writeln!(
            f,
            "Peak production:   {:.2} kW at {:02}:00",
            self.peak_production_kw, self.peak_production_hour
        )?;
        writeln!(
            f,
            "Self-consumption:  {:.1}%",
            self.self_consumption_ratio * 100.0
        )?;
        writeln!(
            f,
            "Self-sufficiency:  {:.1}%",
            self.self_sufficiency_ratio * 100.0
        )?;
        writeln!(f, "Surplus windows:   {}", self.window_count)?;
        write!(f, "Curtailed:         {:.2} kWh", self.curtailed_kwh)
    }
}
