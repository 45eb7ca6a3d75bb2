//! TOML-based engine configuration, policy constants, and preset definitions.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::history::{OrganizationRecord, demo_organization};

/// Top-level engine configuration parsed from TOML.
///
/// All sections have defaults matching the baseline preset. Load from TOML
/// with [`EngineConfig::from_toml_file`] or use [`EngineConfig::baseline`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Solar production shape.
    #[serde(default)]
    pub production: ProductionConfig,
    /// Household consumption shape.
    #[serde(default)]
    pub consumption: ConsumptionConfig,
    /// Surplus, severity, and urgency thresholds.
    #[serde(default)]
    pub thresholds: Thresholds,
    /// Historical aggregation defaults.
    #[serde(default)]
    pub history: HistoryConfig,
    /// REST server bind settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Communities served by the in-memory history source.
    #[serde(default)]
    pub organizations: Vec<OrganizationRecord>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::baseline()
    }
}

/// Daylight window of the bell-shaped production curve.
///
/// Weight is `sin(pi * (h - sunrise) / (sunset - sunrise))` for
/// `sunrise < h < sunset` and zero otherwise, so the curve peaks at
/// [`ProductionConfig::solar_noon`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProductionConfig {
    /// Hour at which production starts (exclusive, weight zero).
    pub sunrise_hour: u8,
    /// Hour at which production ends (exclusive, weight zero).
    pub sunset_hour: u8,
}

impl Default for ProductionConfig {
    fn default() -> Self {
        Self {
            sunrise_hour: 6,
            sunset_hour: 18,
        }
    }
}

impl ProductionConfig {
    /// Midpoint of the daylight window, where the curve peaks.
    pub fn solar_noon(&self) -> f64 {
        (f64::from(self.sunrise_hour) + f64::from(self.sunset_hour)) / 2.0
    }

    /// Number of hours with strictly positive production weight.
    pub fn daylight_hours(&self) -> usize {
        usize::from(self.sunset_hour.saturating_sub(self.sunrise_hour)).saturating_sub(1)
    }
}

/// Two-peak household consumption curve.
///
/// Each hour gets `base_weight` plus two Gaussian bumps centred on the
/// morning and evening peak hours.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsumptionConfig {
    /// Flat weight shared by every hour (> 0).
    pub base_weight: f64,
    /// Centre of the morning peak (fractional hour).
    pub morning_peak_hour: f64,
    /// Height of the morning bump.
    pub morning_weight: f64,
    /// Centre of the evening peak (fractional hour).
    pub evening_peak_hour: f64,
    /// Height of the evening bump.
    pub evening_weight: f64,
    /// Standard deviation of both bumps (hours).
    pub peak_width_hours: f64,
}

impl Default for ConsumptionConfig {
    fn default() -> Self {
        Self {
            base_weight: 0.6,
            morning_peak_hour: 8.0,
            morning_weight: 0.8,
            evening_peak_hour: 19.5,
            evening_weight: 1.0,
            peak_width_hours: 1.5,
        }
    }
}

/// Policy thresholds for windows, status, severity, and urgency.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    /// Surplus an hour must exceed to join a window, and the "run now" bar (kW).
    pub min_surplus_kw: f64,
    /// Half-width of the `balanced` band around zero surplus (kW).
    pub balance_epsilon_kw: f64,
    /// Lower bound of the severity ratio denominator (kW).
    pub severity_consumption_floor_kw: f64,
    /// Ratio at which severity becomes `moderate`.
    pub severity_moderate_ratio: f64,
    /// Ratio at which severity becomes `high`.
    pub severity_high_ratio: f64,
    /// Windows starting at most this many hours ahead are `soon`.
    pub soon_within_hours: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_surplus_kw: 0.01,
            balance_epsilon_kw: 0.01,
            severity_consumption_floor_kw: 1.0,
            severity_moderate_ratio: 0.10,
            severity_high_ratio: 0.40,
            soon_within_hours: 3,
        }
    }
}

/// Historical aggregation defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    /// Capacity assumed when members declare none (kWp).
    pub default_capacity_kwp: f64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            default_capacity_kwp: 30.0,
        }
    }
}

/// REST server bind settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"production.sunset_hour"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl EngineConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "summer", "winter"];

    /// Returns the baseline configuration with the demo community.
    pub fn baseline() -> Self {
        Self {
            production: ProductionConfig::default(),
            consumption: ConsumptionConfig::default(),
            thresholds: Thresholds::default(),
            history: HistoryConfig::default(),
            server: ServerConfig::default(),
            organizations: vec![demo_organization()],
        }
    }

    /// Returns the summer preset: long daylight window, flatter evening peak.
    pub fn summer() -> Self {
        Self {
            production: ProductionConfig {
                sunrise_hour: 5,
                sunset_hour: 21,
            },
            consumption: ConsumptionConfig {
                morning_peak_hour: 7.5,
                evening_peak_hour: 20.5,
                evening_weight: 0.8,
                ..ConsumptionConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the winter preset: short daylight window, pronounced evening peak.
    pub fn winter() -> Self {
        Self {
            production: ProductionConfig {
                sunrise_hour: 7,
                sunset_hour: 17,
            },
            consumption: ConsumptionConfig {
                base_weight: 0.7,
                evening_peak_hour: 18.5,
                evening_weight: 1.3,
                ..ConsumptionConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "summer" => Ok(Self::summer()),
            "winter" => Ok(Self::winter()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// Missing sections fall back to their defaults; a file without
    /// `[[organizations]]` serves no communities.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let p = &self.production;
        if p.sunset_hour > 24 {
            errors.push(ConfigError::new("production.sunset_hour", "must be <= 24"));
        }
        if p.sunrise_hour.saturating_add(2) > p.sunset_hour {
            errors.push(ConfigError::new(
                "production.sunrise_hour",
                "must be at least 2 hours before production.sunset_hour",
            ));
        }

        let c = &self.consumption;
        if !(c.base_weight.is_finite() && c.base_weight > 0.0) {
            errors.push(ConfigError::new("consumption.base_weight", "must be > 0"));
        }
        for (field, value) in [
            ("consumption.morning_weight", c.morning_weight),
            ("consumption.evening_weight", c.evening_weight),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                errors.push(ConfigError::new(field, "must be >= 0"));
            }
        }
        for (field, value) in [
            ("consumption.morning_peak_hour", c.morning_peak_hour),
            ("consumption.evening_peak_hour", c.evening_peak_hour),
        ] {
            if !(0.0..24.0).contains(&value) {
                errors.push(ConfigError::new(field, "must be in [0, 24)"));
            }
        }
        if !(c.peak_width_hours.is_finite() && c.peak_width_hours > 0.0) {
            errors.push(ConfigError::new("consumption.peak_width_hours", "must be > 0"));
        }

        let t = &self.thresholds;
        if !(t.min_surplus_kw.is_finite() && t.min_surplus_kw > 0.0) {
            errors.push(ConfigError::new("thresholds.min_surplus_kw", "must be > 0"));
        }
        if !(t.balance_epsilon_kw.is_finite() && t.balance_epsilon_kw >= 0.0) {
            errors.push(ConfigError::new("thresholds.balance_epsilon_kw", "must be >= 0"));
        }
        if !(t.severity_consumption_floor_kw.is_finite() && t.severity_consumption_floor_kw > 0.0)
        {
            errors.push(ConfigError::new(
                "thresholds.severity_consumption_floor_kw",
                "must be > 0",
            ));
        }
        if !(t.severity_moderate_ratio > 0.0
            && t.severity_moderate_ratio < t.severity_high_ratio
            && t.severity_high_ratio.is_finite())
        {
            errors.push(ConfigError::new(
                "thresholds.severity_moderate_ratio",
                "must satisfy 0 < severity_moderate_ratio < severity_high_ratio",
            ));
        }
        if !(1..=23).contains(&t.soon_within_hours) {
            errors.push(ConfigError::new("thresholds.soon_within_hours", "must be in [1, 23]"));
        }

        let h = &self.history;
        if !(h.default_capacity_kwp.is_finite() && h.default_capacity_kwp > 0.0) {
            errors.push(ConfigError::new("history.default_capacity_kwp", "must be > 0"));
        }

        let mut org_ids = HashSet::new();
        for (i, org) in self.organizations.iter().enumerate() {
            if org.id.is_empty() {
                errors.push(ConfigError::new(format!("organizations[{i}].id"), "must not be empty"));
            } else if !org_ids.insert(org.id.as_str()) {
                errors.push(ConfigError::new(
                    format!("organizations[{i}].id"),
                    format!("duplicate organization id \"{}\"", org.id),
                ));
            }

            let mut member_ids = HashSet::new();
            for (j, m) in org.members.iter().enumerate() {
                if !member_ids.insert(m.id.as_str()) {
                    errors.push(ConfigError::new(
                        format!("organizations[{i}].members[{j}].id"),
                        format!("duplicate member id \"{}\"", m.id),
                    ));
                }
                if m.installed_kwp.is_some_and(|kwp| !(kwp.is_finite() && kwp >= 0.0)) {
                    errors.push(ConfigError::new(
                        format!("organizations[{i}].members[{j}].installed_kwp"),
                        "must be >= 0",
                    ));
                }
            }

            for (j, month) in org.months.iter().enumerate() {
                if month.days().is_none() {
                    errors.push(ConfigError::new(
                        format!("organizations[{i}].months[{j}].month"),
                        "must be in [1, 12]",
                    ));
                }
                if !(month.production_kwh >= 0.0 && month.consumption_kwh >= 0.0)
                    || !month.production_kwh.is_finite()
                    || !month.consumption_kwh.is_finite()
                {
                    errors.push(ConfigError::new(
                        format!("organizations[{i}].months[{j}]"),
                        "totals must be finite and >= 0",
                    ));
                }
            }
        }

        errors
    }
}
