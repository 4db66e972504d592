use crate::schemas::{
    engine_error_response, ApiResponse, AppState, CachedData, ErrorResponse,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use common::{DateRange, FinancialSummary};
use compute::summary::SummaryEngine;
use serde::Deserialize;
use tracing::{debug, instrument};
use utoipa::ToSchema;

/// Query parameters for the financial summary
#[derive(Debug, Deserialize, ToSchema)]
pub struct SummaryQuery {
    /// Owner user ID
    pub owner_id: i32,
    /// Start of the date window (YYYY-MM-DD), open when omitted
    pub start_date: Option<NaiveDate>,
    /// End of the date window (YYYY-MM-DD), open when omitted
    pub end_date: Option<NaiveDate>,
}

/// Get the reconciled financial summary
#[utoipa::path(
    get,
    path = "/api/v1/summary",
    tag = "summary",
    params(
        ("owner_id" = i32, Query, description = "Owner user ID"),
        ("start_date" = Option<String>, Query, description = "Window start (YYYY-MM-DD)"),
        ("end_date" = Option<String>, Query, description = "Window end (YYYY-MM-DD)"),
    ),
    responses(
        (status = 200, description = "Summary computed", body = ApiResponse<common::FinancialSummary>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_summary(
    Query(query): Query<SummaryQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<FinancialSummary>>, (StatusCode, Json<ErrorResponse>)> {
    let cache_key = format!(
        "summary_{}_{:?}_{:?}",
        query.owner_id, query.start_date, query.end_date
    );
    if let Some(CachedData::Summary(summary)) = state.cache.get(&cache_key).await {
        debug!("Summary served from cache");
        return Ok(Json(ApiResponse {
            data: summary,
            message: "Summary retrieved from cache".to_string(),
            success: true,
        }));
    }

    let range = DateRange::new(query.start_date, query.end_date);
    let summary = SummaryEngine::new()
        .summary(&state.db, query.owner_id, &range)
        .await
        .map_err(|e| engine_error_response("OWNER_NOT_FOUND", e))?;

    state
        .cache
        .insert(cache_key, CachedData::Summary(summary.clone()))
        .await;

    Ok(Json(ApiResponse {
        data: summary,
        message: "Summary computed successfully".to_string(),
        success: true,
    }))
}
