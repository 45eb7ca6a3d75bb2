//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use tracing::debug;

use super::AppState;
use super::error::ApiError;
use super::types::{
    HealthResponse, RecommendationQuery, RecommendationResponse, SurplusQuery, SurplusResponse,
};
use crate::forecast::{CommunityForecast, compute_forecast};
use crate::history::{OrganizationRecord, load_history};
use crate::surplus::{evaluate, generate};

/// `GET /health` → 200 + `{"status":"ok"}`
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Returns the community forecast with optimal windows.
///
/// `GET /organizations/{org_id}/forecast` → 200 + `CommunityForecast` JSON
/// Unknown organization → 404
pub async fn get_forecast(
    State(state): State<Arc<AppState>>,
    Path(org_id): Path<String>,
) -> Result<Json<CommunityForecast>, ApiError> {
    let (_, fc) = community_forecast(&state, &org_id)?;
    Ok(Json(fc))
}

/// Returns the surplus status for a measured sample or the current forecast hour.
///
/// `GET /organizations/{org_id}/surplus` → forecast point at the current hour
/// `GET /organizations/{org_id}/surplus?production_kw=P&consumption_kw=C` → measured sample
/// Only one of the two parameters → 400
pub async fn get_surplus(
    State(state): State<Arc<AppState>>,
    Path(org_id): Path<String>,
    query: Result<Query<SurplusQuery>, QueryRejection>,
) -> Result<Json<SurplusResponse>, ApiError> {
    let Query(query) = query?;
    let (_, fc) = community_forecast(&state, &org_id)?;
    let hour = state.clock.current_hour();

    let (production_kw, consumption_kw) = match (query.production_kw, query.consumption_kw) {
        (Some(p), Some(c)) => (p, c),
        (None, None) => {
            let point = fc
                .point(hour)
                .ok_or_else(|| ApiError::Internal(format!("forecast has no hour {hour}")))?;
            (point.production_kw, point.expected_consumption_kw)
        }
        _ => {
            return Err(ApiError::BadRequest(
                "`production_kw` and `consumption_kw` must be given together".to_string(),
            ));
        }
    };

    let status = evaluate(production_kw, consumption_kw, &state.config.thresholds)?;
    Ok(Json(SurplusResponse { hour, status }))
}

/// Returns a recommendation for one member.
///
/// `GET /organizations/{org_id}/members/{member_id}/recommendations` → member share
/// of the forecast surplus at the current hour
/// `...?current_surplus_kw=S` → explicit surplus
/// Unknown organization or member → 404
pub async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    Path((org_id, member_id)): Path<(String, String)>,
    query: Result<Query<RecommendationQuery>, QueryRejection>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let Query(query) = query?;
    let (org, fc) = community_forecast(&state, &org_id)?;
    let member = org.member(&member_id).ok_or_else(|| {
        ApiError::NotFound(format!(
            "member \"{member_id}\" not found in organization \"{org_id}\""
        ))
    })?;
    let hour = state.clock.current_hour();

    let current_surplus_kw = match query.current_surplus_kw {
        Some(kw) => kw,
        None => {
            let point = fc
                .point(hour)
                .ok_or_else(|| ApiError::Internal(format!("forecast has no hour {hour}")))?;
            // A member was found, so the count is at least one
            point.expected_surplus_kw / org.members.len() as f64
        }
    };

    let recommendation = generate(
        member.id.clone(),
        current_surplus_kw,
        hour,
        &fc.forecast,
        &fc.optimal_windows,
        &state.config.thresholds,
    )?;

    Ok(Json(RecommendationResponse {
        organization_name: org.name.clone(),
        member_name: member.name.clone(),
        recommendation,
    }))
}

/// Loads history once and computes the forecast for `org_id`.
fn community_forecast(
    state: &AppState,
    org_id: &str,
) -> Result<(OrganizationRecord, CommunityForecast), ApiError> {
    let (org, data) = load_history(
        state.history.as_ref(),
        org_id,
        state.config.history.default_capacity_kwp,
    )?
    .ok_or_else(|| ApiError::NotFound(format!("organization \"{org_id}\" not found")))?;
    debug!(org_id, ?data, "loaded community history");

    let fc = compute_forecast(org.id.clone(), &data, &state.config)?;
    Ok((org, fc))
}
