//! API response and query types.
//!
//! Field names are camelCase to match the engine's JSON contract.

use serde::{Deserialize, Serialize};

use crate::surplus::{Recommendation, SurplusStatus};

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: &'static str,
}

/// Optional instantaneous sample for the surplus endpoint.
#[derive(Debug, Deserialize)]
pub struct SurplusQuery {
    /// Measured production (kW).
    pub production_kw: Option<f64>,
    /// Measured consumption (kW).
    pub consumption_kw: Option<f64>,
}

/// Current surplus classification with the hour it refers to.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurplusResponse {
    /// Hour of day the status refers to.
    pub hour: u8,
    /// Classification of the sample.
    #[serde(flatten)]
    pub status: SurplusStatus,
}

/// Optional explicit surplus for the recommendations endpoint.
#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    /// Surplus available to the member right now (kW).
    pub current_surplus_kw: Option<f64>,
}

/// Recommendation decorated with display names.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    /// Community display name.
    pub organization_name: String,
    /// Member display name.
    pub member_name: String,
    /// Engine output.
    pub recommendation: Recommendation,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surplus::{BalanceState, Severity};

    #[test]
    fn surplus_response_flattens_status() {
        let resp = SurplusResponse {
            hour: 12,
            status: SurplusStatus {
                surplus_kw: 3.0,
                status: BalanceState::Surplus,
                severity: Severity::Moderate,
            },
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["hour"], 12);
        assert_eq!(json["surplusKw"], 3.0);
        assert_eq!(json["status"], "surplus");
        assert_eq!(json["severity"], "moderate");
    }
}
