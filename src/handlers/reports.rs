use crate::schemas::{
    db_error_response, engine_error_response, ApiResponse, AppState, CachedData, ErrorResponse,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::MonthlyReport;
use compute::monthly;
use model::entities::profit_goal;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;
use validator::Validate;

/// Query parameters for the monthly report
#[derive(Debug, Deserialize, ToSchema)]
pub struct MonthlyReportQuery {
    /// Owner user ID
    pub owner_id: i32,
    pub year: i32,
    /// 1-12
    pub month: u32,
}

/// Request body for setting a monthly profit goal. Upserts on
/// (owner, year, month).
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct SetProfitGoalRequest {
    /// Owner user ID
    pub owner_id: i32,
    pub year: i32,
    /// 1-12
    #[validate(range(min = 1, max = 12))]
    pub month: i32,
    /// Net profit target, decimal string
    pub target_value: Decimal,
    pub notes: Option<String>,
}

/// Profit goal response model
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfitGoalResponse {
    pub id: i32,
    pub owner_id: i32,
    pub year: i32,
    pub month: i32,
    pub target_value: Decimal,
    pub notes: Option<String>,
}

impl From<profit_goal::Model> for ProfitGoalResponse {
    fn from(model: profit_goal::Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            year: model.year,
            month: model.month,
            target_value: model.target_value,
            notes: model.notes,
        }
    }
}

/// Get the monthly report for one calendar month
#[utoipa::path(
    get,
    path = "/api/v1/reports/monthly",
    tag = "reports",
    params(
        ("owner_id" = i32, Query, description = "Owner user ID"),
        ("year" = i32, Query, description = "Report year"),
        ("month" = u32, Query, description = "Report month (1-12)"),
    ),
    responses(
        (status = 200, description = "Report computed", body = ApiResponse<common::MonthlyReport>),
        (status = 400, description = "Invalid month", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_monthly_report(
    Query(query): Query<MonthlyReportQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<MonthlyReport>>, (StatusCode, Json<ErrorResponse>)> {
    let cache_key = format!("report_{}_{}_{}", query.owner_id, query.year, query.month);
    if let Some(CachedData::Report(report)) = state.cache.get(&cache_key).await {
        debug!("Monthly report served from cache");
        return Ok(Json(ApiResponse {
            data: report,
            message: "Monthly report retrieved from cache".to_string(),
            success: true,
        }));
    }

    let report = monthly::monthly_report(&state.db, query.owner_id, query.year, query.month)
        .await
        .map_err(|e| engine_error_response("OWNER_NOT_FOUND", e))?;

    state
        .cache
        .insert(cache_key, CachedData::Report(report.clone()))
        .await;

    Ok(Json(ApiResponse {
        data: report,
        message: "Monthly report computed successfully".to_string(),
        success: true,
    }))
}

/// Set (upsert) the profit goal for a month
#[utoipa::path(
    put,
    path = "/api/v1/profit-goals",
    tag = "reports",
    request_body = SetProfitGoalRequest,
    responses(
        (status = 200, description = "Profit goal set", body = ApiResponse<ProfitGoalResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn set_profit_goal(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<SetProfitGoalRequest>>,
) -> Result<Json<ApiResponse<ProfitGoalResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let existing = profit_goal::Entity::find()
        .filter(profit_goal::Column::OwnerId.eq(request.owner_id))
        .filter(profit_goal::Column::Year.eq(request.year))
        .filter(profit_goal::Column::Month.eq(request.month))
        .one(&state.db)
        .await
        .map_err(db_error_response)?;

    let saved = match existing {
        Some(goal) => {
            let mut active: profit_goal::ActiveModel = goal.into();
            active.target_value = Set(request.target_value);
            active.notes = Set(request.notes);
            active.update(&state.db).await.map_err(db_error_response)?
        }
        None => profit_goal::ActiveModel {
            owner_id: Set(request.owner_id),
            year: Set(request.year),
            month: Set(request.month),
            target_value: Set(request.target_value),
            notes: Set(request.notes),
            ..Default::default()
        }
        .insert(&state.db)
        .await
        .map_err(db_error_response)?,
    };

    info!(
        "Profit goal set for owner {} {}-{:02}",
        saved.owner_id, saved.year, saved.month
    );
    state.invalidate_reports();
    Ok(Json(ApiResponse {
        data: ProfitGoalResponse::from(saved),
        message: "Profit goal set successfully".to_string(),
        success: true,
    }))
}
