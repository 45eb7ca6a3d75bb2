//! Historical aggregates for a community and the persistence seam that supplies them.
//!
//! The persistence layer hands over monthly production/consumption totals and
//! member-declared solar capacity. [`aggregate`] reduces those to the three
//! scalars the profile synthesizer needs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, Result};

/// Upper bound for daily energy and installed capacity.
///
/// Keeps every 24-hour sum derived from the profile finite.
pub const MAX_MAGNITUDE: f64 = 1.0e12;

/// Reduced historical aggregates for one community.
///
/// # Examples
///
/// ```
/// use cel_forecast::history::HistoricalData;
///
/// let data = HistoricalData::new(50.0, 100.0, 30.0).unwrap();
/// assert_eq!(data.installed_capacity_kwp, 30.0);
/// assert!(HistoricalData::new(-1.0, 100.0, 30.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalData {
    /// Average daily production (kWh, >= 0).
    pub avg_daily_production_kwh: f64,
    /// Average daily consumption (kWh, >= 0).
    pub avg_daily_consumption_kwh: f64,
    /// Installed solar capacity across all members (kWp, > 0).
    pub installed_capacity_kwp: f64,
}

impl HistoricalData {
    /// Creates validated historical data.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidHistoricalData`] for negative or
    /// non-finite averages, a capacity that is not strictly positive, or any
    /// value above [`MAX_MAGNITUDE`].
    pub fn new(
        avg_daily_production_kwh: f64,
        avg_daily_consumption_kwh: f64,
        installed_capacity_kwp: f64,
    ) -> Result<Self> {
        let data = Self {
            avg_daily_production_kwh,
            avg_daily_consumption_kwh,
            installed_capacity_kwp,
        };
        data.validate()?;
        Ok(data)
    }

    /// Checks the invariants [`HistoricalData::new`] enforces.
    ///
    /// Fields are public (and deserializable), so consumers re-check before use.
    pub fn validate(&self) -> Result<()> {
        non_negative("avgDailyProductionKwh", self.avg_daily_production_kwh)?;
        non_negative("avgDailyConsumptionKwh", self.avg_daily_consumption_kwh)?;
        if !self.installed_capacity_kwp.is_finite() || self.installed_capacity_kwp <= 0.0 {
            return Err(EngineError::InvalidHistoricalData(format!(
                "installedCapacityKwp must be > 0, got {}",
                self.installed_capacity_kwp
            )));
        }
        for (name, value) in [
            ("avgDailyProductionKwh", self.avg_daily_production_kwh),
            ("avgDailyConsumptionKwh", self.avg_daily_consumption_kwh),
            ("installedCapacityKwp", self.installed_capacity_kwp),
        ] {
            if value > MAX_MAGNITUDE {
                return Err(EngineError::InvalidHistoricalData(format!(
                    "{name} must be <= {MAX_MAGNITUDE:e}, got {value}"
                )));
            }
        }
        Ok(())
    }
}

fn non_negative(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidHistoricalData(format!(
            "{field} must be a finite value >= 0, got {value}"
        )))
    }
}

/// Production and consumption totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MonthlyTotals {
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
    /// Energy produced by the community during the month (kWh).
    pub production_kwh: f64,
    /// Energy consumed by the community during the month (kWh).
    pub consumption_kwh: f64,
}

impl MonthlyTotals {
    /// Number of calendar days in this month, or `None` for an invalid month.
    pub fn days(&self) -> Option<u32> {
        let first = NaiveDate::from_ymd_opt(self.year, self.month, 1)?;
        let next = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year.checked_add(1)?, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)?
        };
        u32::try_from((next - first).num_days()).ok()
    }
}

/// A community member with its declared solar capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MemberRecord {
    /// Stable member identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Declared installed capacity (kWp); `None` when the member has no panels.
    #[serde(default)]
    pub installed_kwp: Option<f64>,
}

/// A community as stored by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrganizationRecord {
    /// Stable organization identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Community members.
    #[serde(default)]
    pub members: Vec<MemberRecord>,
    /// Monthly totals, in any order.
    #[serde(default)]
    pub months: Vec<MonthlyTotals>,
}

impl OrganizationRecord {
    /// Looks up a member by id.
    pub fn member(&self, member_id: &str) -> Option<&MemberRecord> {
        self.members.iter().find(|m| m.id == member_id)
    }
}

/// Reduces monthly totals and member capacities to [`HistoricalData`].
///
/// Daily averages divide the summed totals by the summed calendar days of the
/// listed months; an empty month list yields zero averages. Capacity is the
/// sum of positive declared capacities, or `default_capacity_kwp` when that
/// sum is not positive.
///
/// # Errors
///
/// Returns [`EngineError::InvalidHistoricalData`] for an invalid month,
/// negative or non-finite totals or capacities, or a non-positive default.
pub fn aggregate(
    months: &[MonthlyTotals],
    members: &[MemberRecord],
    default_capacity_kwp: f64,
) -> Result<HistoricalData> {
    let mut days = 0_u32;
    let mut production_kwh = 0.0_f64;
    let mut consumption_kwh = 0.0_f64;

    for m in months {
        let month_days = m.days().ok_or_else(|| {
            EngineError::InvalidHistoricalData(format!("invalid month {}-{:02}", m.year, m.month))
        })?;
        non_negative("productionKwh", m.production_kwh)?;
        non_negative("consumptionKwh", m.consumption_kwh)?;
        days += month_days;
        production_kwh += m.production_kwh;
        consumption_kwh += m.consumption_kwh;
    }

    let mut declared_kwp = 0.0_f64;
    for member in members {
        if let Some(kwp) = member.installed_kwp {
            non_negative("installedKwp", kwp)?;
            declared_kwp += kwp;
        }
    }
    let capacity = if declared_kwp > 0.0 {
        declared_kwp
    } else {
        default_capacity_kwp
    };

    let (avg_production, avg_consumption) = if days == 0 {
        (0.0, 0.0)
    } else {
        let d = f64::from(days);
        (production_kwh / d, consumption_kwh / d)
    };

    debug!(
        months = months.len(),
        days,
        avg_production,
        avg_consumption,
        capacity,
        "aggregated community history"
    );

    HistoricalData::new(avg_production, avg_consumption, capacity)
}

/// Persistence seam supplying stored communities.
pub trait HistorySource: Send + Sync {
    /// Returns the organization with the given id, if it exists.
    fn organization(&self, organization_id: &str) -> Option<OrganizationRecord>;

    /// Ids of all known organizations, in storage order.
    fn organization_ids(&self) -> Vec<String>;
}

/// In-memory [`HistorySource`] backed by a fixed list of organizations.
#[derive(Debug, Clone, Default)]
pub struct StaticHistory {
    organizations: Vec<OrganizationRecord>,
}

impl StaticHistory {
    /// Creates a source over the given organizations.
    pub fn new(organizations: Vec<OrganizationRecord>) -> Self {
        Self { organizations }
    }
}

impl HistorySource for StaticHistory {
    fn organization(&self, organization_id: &str) -> Option<OrganizationRecord> {
        self.organizations
            .iter()
            .find(|o| o.id == organization_id)
            .cloned()
    }

    fn organization_ids(&self) -> Vec<String> {
        self.organizations.iter().map(|o| o.id.clone()).collect()
    }
}

/// Loads an organization and its aggregated history in one call.
///
/// Returns `Ok(None)` when the organization is unknown.
pub fn load_history(
    source: &dyn HistorySource,
    organization_id: &str,
    default_capacity_kwp: f64,
) -> Result<Option<(OrganizationRecord, HistoricalData)>> {
    let Some(org) = source.organization(organization_id) else {
        return Ok(None);
    };
    let data = aggregate(&org.months, &org.members, default_capacity_kwp)?;
    Ok(Some((org, data)))
}

/// Built-in demo community used by the presets.
pub fn demo_organization() -> OrganizationRecord {
    let member = |id: &str, name: &str, kwp: Option<f64>| MemberRecord {
        id: id.to_string(),
        name: name.to_string(),
        installed_kwp: kwp,
    };
    // Monthly totals for a small Romandie community with ~30 kWp installed.
    let monthly = [
        (1, 650.0, 3400.0),
        (2, 950.0, 3000.0),
        (3, 1900.0, 3000.0),
        (4, 2800.0, 2700.0),
        (5, 3500.0, 2600.0),
        (6, 3800.0, 2400.0),
        (7, 4000.0, 2450.0),
        (8, 3500.0, 2500.0),
        (9, 2500.0, 2600.0),
        (10, 1500.0, 2900.0),
        (11, 750.0, 3200.0),
        (12, 500.0, 3500.0),
    ];
    OrganizationRecord {
        id: "cel-les-vergers".to_string(),
        name: "CEL Les Vergers".to_string(),
        members: vec![
            member("m-001", "Famille Rochat", Some(12.0)),
            member("m-002", "Ferme du Châtelard", Some(18.0)),
            member("m-003", "Immeuble Les Tilleuls", None),
        ],
        months: monthly
            .iter()
            .map(|&(month, production_kwh, consumption_kwh)| MonthlyTotals {
                year: 2025,
                month,
                production_kwh,
                consumption_kwh,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(year: i32, month: u32, production_kwh: f64, consumption_kwh: f64) -> MonthlyTotals {
        MonthlyTotals {
            year,
            month,
            production_kwh,
            consumption_kwh,
        }
    }

    fn member(id: &str, kwp: Option<f64>) -> MemberRecord {
        MemberRecord {
            id: id.to_string(),
            name: id.to_uppercase(),
            installed_kwp: kwp,
        }
    }

    #[test]
    fn days_in_month_follow_calendar() {
        assert_eq!(month(2024, 2, 0.0, 0.0).days(), Some(29));
        assert_eq!(month(2025, 2, 0.0, 0.0).days(), Some(28));
        assert_eq!(month(2025, 12, 0.0, 0.0).days(), Some(31));
        assert_eq!(month(2025, 4, 0.0, 0.0).days(), Some(30));
        assert_eq!(month(2025, 13, 0.0, 0.0).days(), None);
        assert_eq!(month(2025, 0, 0.0, 0.0).days(), None);
    }

    #[test]
    fn aggregate_divides_by_calendar_days() {
        // 31 + 30 days
        let months = [month(2025, 3, 610.0, 1220.0), month(2025, 4, 0.0, 0.0)];
        let data = aggregate(&months, &[member("a", Some(10.0))], 30.0).unwrap();
        assert!((data.avg_daily_production_kwh - 10.0).abs() < 1e-12);
        assert!((data.avg_daily_consumption_kwh - 20.0).abs() < 1e-12);
        assert_eq!(data.installed_capacity_kwp, 10.0);
    }

    #[test]
    fn capacity_defaults_when_none_declared() {
        let members = [member("a", None), member("b", Some(0.0))];
        let data = aggregate(&[], &members, 30.0).unwrap();
        assert_eq!(data.installed_capacity_kwp, 30.0);
        assert_eq!(data.avg_daily_production_kwh, 0.0);
        assert_eq!(data.avg_daily_consumption_kwh, 0.0);
    }

    #[test]
    fn capacity_sums_declared_members() {
        let members = [member("a", Some(12.0)), member("b", None), member("c", Some(3.5))];
        let data = aggregate(&[], &members, 30.0).unwrap();
        assert!((data.installed_capacity_kwp - 15.5).abs() < 1e-12);
    }

    #[test]
    fn negative_totals_are_rejected() {
        let months = [month(2025, 1, -5.0, 10.0)];
        let err = aggregate(&months, &[], 30.0).unwrap_err();
        assert!(matches!(err, EngineError::InvalidHistoricalData(_)));
    }

    #[test]
    fn invalid_month_is_rejected() {
        let months = [month(2025, 14, 5.0, 10.0)];
        assert!(aggregate(&months, &[], 30.0).is_err());
    }

    #[test]
    fn zero_default_capacity_is_rejected() {
        assert!(aggregate(&[], &[], 0.0).is_err());
    }

    #[test]
    fn historical_data_rejects_non_finite() {
        assert!(HistoricalData::new(f64::NAN, 1.0, 30.0).is_err());
        assert!(HistoricalData::new(1.0, f64::INFINITY, 30.0).is_err());
        assert!(HistoricalData::new(1.0, 1.0, 0.0).is_err());
        assert!(HistoricalData::new(0.0, 0.0, 0.1).is_ok());
    }

    #[test]
    fn historical_data_rejects_overflowing_magnitudes() {
        assert!(HistoricalData::new(f64::MAX, 0.0, 30.0).is_err());
        assert!(HistoricalData::new(10.0, f64::MAX, 30.0).is_err());
        assert!(HistoricalData::new(10.0, 10.0, f64::MAX).is_err());
        assert!(HistoricalData::new(MAX_MAGNITUDE, MAX_MAGNITUDE, MAX_MAGNITUDE).is_ok());
    }

    #[test]
    fn static_history_lookup() {
        let source = StaticHistory::new(vec![demo_organization()]);
        assert_eq!(source.organization_ids(), vec!["cel-les-vergers".to_string()]);
        assert!(source.organization("missing").is_none());

        let (org, data) = load_history(&source, "cel-les-vergers", 30.0)
            .unwrap()
            .unwrap();
        assert_eq!(org.members.len(), 3);
        assert!(org.member("m-002").is_some());
        assert!(org.member("m-999").is_none());
        // 12 + 18 kWp declared
        assert!((data.installed_capacity_kwp - 30.0).abs() < 1e-12);
        assert!(data.avg_daily_production_kwh > 0.0);
    }

    #[test]
    fn load_history_unknown_org_is_none() {
        let source = StaticHistory::default();
        assert_eq!(load_history(&source, "nope", 30.0), Ok(None));
    }

    #[test]
    fn historical_data_serializes_camel_case() {
        let data = HistoricalData::new(50.0, 100.0, 30.0).unwrap();
        let json = serde_json::to_value(data).unwrap();
        assert_eq!(json["avgDailyProductionKwh"], 50.0);
        assert_eq!(json["installedCapacityKwp"], 30.0);
    }
}
