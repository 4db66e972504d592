use crate::schemas::{
    conflict_response, db_error_response, not_found_response, validation_error_response,
    ApiResponse, AppState, ErrorResponse, OwnerQuery,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::NaiveDate;
use model::entities::ledger_entry;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a manual ledger entry. The `origin` is
/// always `manual`; derived entries are written by the payment cascade
/// only.
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateLedgerEntryRequest {
    /// Owner user ID
    pub owner_id: i32,
    /// "revenue" or "expense"
    pub kind: String,
    pub category_id: Option<i32>,
    #[validate(length(min = 1))]
    pub description: String,
    /// Entry amount, decimal string
    pub amount: Decimal,
    /// Posting date (YYYY-MM-DD)
    pub entry_date: NaiveDate,
    /// "pending" or "paid", defaults to "pending"
    pub status: Option<String>,
    pub payment_date: Option<NaiveDate>,
    pub payment_method: Option<String>,
}

/// Distinguishes an absent field (leave the stored value alone) from
/// an explicit `null` (clear it).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Request body for updating a manual ledger entry. The nullable
/// fields accept an explicit `null` to clear the stored value;
/// omitting them leaves it untouched.
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateLedgerEntryRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<i32>>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub entry_date: Option<NaiveDate>,
    /// "pending", "paid" or "cancelled"
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub payment_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub payment_method: Option<Option<String>>,
}

/// Ledger entry response model
#[derive(Debug, Serialize, ToSchema)]
pub struct LedgerEntryResponse {
    pub id: i32,
    pub owner_id: i32,
    pub kind: String,
    pub category_id: Option<i32>,
    pub description: String,
    pub amount: Decimal,
    pub entry_date: NaiveDate,
    pub status: String,
    pub payment_date: Option<NaiveDate>,
    pub payment_method: Option<String>,
    pub origin: String,
    pub reference_id: Option<i32>,
}

impl From<ledger_entry::Model> for LedgerEntryResponse {
    fn from(model: ledger_entry::Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            kind: kind_str(model.kind).to_string(),
            category_id: model.category_id,
            description: model.description,
            amount: model.amount,
            entry_date: model.entry_date,
            status: status_str(model.status).to_string(),
            payment_date: model.payment_date,
            payment_method: model.payment_method,
            origin: origin_str(model.origin).to_string(),
            reference_id: model.reference_id,
        }
    }
}

fn kind_str(kind: ledger_entry::EntryKind) -> &'static str {
    match kind {
        ledger_entry::EntryKind::Revenue => "revenue",
        ledger_entry::EntryKind::Expense => "expense",
    }
}

fn parse_kind(s: &str) -> Result<ledger_entry::EntryKind, String> {
    match s {
        "revenue" => Ok(ledger_entry::EntryKind::Revenue),
        "expense" => Ok(ledger_entry::EntryKind::Expense),
        other => Err(format!("Invalid entry kind: {}", other)),
    }
}

fn status_str(status: ledger_entry::EntryStatus) -> &'static str {
    match status {
        ledger_entry::EntryStatus::Pending => "pending",
        ledger_entry::EntryStatus::Paid => "paid",
        ledger_entry::EntryStatus::Cancelled => "cancelled",
    }
}

fn parse_status(s: &str) -> Result<ledger_entry::EntryStatus, String> {
    match s {
        "pending" => Ok(ledger_entry::EntryStatus::Pending),
        "paid" => Ok(ledger_entry::EntryStatus::Paid),
        "cancelled" => Ok(ledger_entry::EntryStatus::Cancelled),
        other => Err(format!("Invalid entry status: {}", other)),
    }
}

fn origin_str(origin: ledger_entry::EntryOrigin) -> &'static str {
    match origin {
        ledger_entry::EntryOrigin::Manual => "manual",
        ledger_entry::EntryOrigin::Contract => "contract",
        ledger_entry::EntryOrigin::ServiceOrder => "service_order",
    }
}

async fn find_owned(
    state: &AppState,
    entry_id: i32,
    owner_id: i32,
) -> Result<ledger_entry::Model, (StatusCode, Json<ErrorResponse>)> {
    ledger_entry::Entity::find_by_id(entry_id)
        .filter(ledger_entry::Column::OwnerId.eq(owner_id))
        .one(&state.db)
        .await
        .map_err(db_error_response)?
        .ok_or_else(|| {
            warn!("Ledger entry {} not found for owner {}", entry_id, owner_id);
            not_found_response(
                "LEDGER_ENTRY_NOT_FOUND",
                format!("Ledger entry {} not found", entry_id),
            )
        })
}

/// Create a manual ledger entry
#[utoipa::path(
    post,
    path = "/api/v1/ledger-entries",
    tag = "ledger-entries",
    request_body = CreateLedgerEntryRequest,
    responses(
        (status = 201, description = "Ledger entry created", body = ApiResponse<LedgerEntryResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_ledger_entry(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateLedgerEntryRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<LedgerEntryResponse>>), (StatusCode, Json<ErrorResponse>)>
{
    if request.amount <= Decimal::ZERO {
        return Err(validation_error_response("Entry amount must be positive"));
    }
    let kind = parse_kind(&request.kind).map_err(validation_error_response)?;
    let status = match request.status.as_deref() {
        Some(s) => parse_status(s).map_err(validation_error_response)?,
        None => ledger_entry::EntryStatus::Pending,
    };

    let created = ledger_entry::ActiveModel {
        owner_id: Set(request.owner_id),
        kind: Set(kind),
        category_id: Set(request.category_id),
        description: Set(request.description),
        amount: Set(request.amount),
        entry_date: Set(request.entry_date),
        status: Set(status),
        payment_date: Set(request.payment_date),
        payment_method: Set(request.payment_method),
        origin: Set(ledger_entry::EntryOrigin::Manual),
        reference_id: Set(None),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(db_error_response)?;

    info!("Ledger entry created with ID: {}", created.id);
    state.invalidate_reports();
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: LedgerEntryResponse::from(created),
            message: "Ledger entry created successfully".to_string(),
            success: true,
        }),
    ))
}

/// Get all ledger entries of an owner
#[utoipa::path(
    get,
    path = "/api/v1/ledger-entries",
    tag = "ledger-entries",
    params(("owner_id" = i32, Query, description = "Owner user ID")),
    responses(
        (status = 200, description = "Ledger entries retrieved", body = ApiResponse<Vec<LedgerEntryResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_ledger_entries(
    Query(query): Query<OwnerQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<LedgerEntryResponse>>>, (StatusCode, Json<ErrorResponse>)> {
    let entries = ledger_entry::Entity::find()
        .filter(ledger_entry::Column::OwnerId.eq(query.owner_id))
        .all(&state.db)
        .await
        .map_err(db_error_response)?;

    debug!("Retrieved {} ledger entries", entries.len());
    Ok(Json(ApiResponse {
        data: entries.into_iter().map(LedgerEntryResponse::from).collect(),
        message: "Ledger entries retrieved successfully".to_string(),
        success: true,
    }))
}

/// Get a specific ledger entry
#[utoipa::path(
    get,
    path = "/api/v1/ledger-entries/{entry_id}",
    tag = "ledger-entries",
    params(
        ("entry_id" = i32, Path, description = "Ledger entry ID"),
        ("owner_id" = i32, Query, description = "Owner user ID"),
    ),
    responses(
        (status = 200, description = "Ledger entry retrieved", body = ApiResponse<LedgerEntryResponse>),
        (status = 404, description = "Ledger entry not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_ledger_entry(
    Path(entry_id): Path<i32>,
    Query(query): Query<OwnerQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<LedgerEntryResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let found = find_owned(&state, entry_id, query.owner_id).await?;
    Ok(Json(ApiResponse {
        data: LedgerEntryResponse::from(found),
        message: "Ledger entry retrieved successfully".to_string(),
        success: true,
    }))
}

/// Update a manual ledger entry
#[utoipa::path(
    put,
    path = "/api/v1/ledger-entries/{entry_id}",
    tag = "ledger-entries",
    params(
        ("entry_id" = i32, Path, description = "Ledger entry ID"),
        ("owner_id" = i32, Query, description = "Owner user ID"),
    ),
    request_body = UpdateLedgerEntryRequest,
    responses(
        (status = 200, description = "Ledger entry updated", body = ApiResponse<LedgerEntryResponse>),
        (status = 404, description = "Ledger entry not found", body = ErrorResponse),
        (status = 409, description = "Derived entries are read-only", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_ledger_entry(
    Path(entry_id): Path<i32>,
    Query(query): Query<OwnerQuery>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateLedgerEntryRequest>>,
) -> Result<Json<ApiResponse<LedgerEntryResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let existing = find_owned(&state, entry_id, query.owner_id).await?;
    if existing.origin != ledger_entry::EntryOrigin::Manual {
        return Err(conflict_response(
            "Derived ledger entries cannot be edited through the manual surface",
        ));
    }

    let mut active: ledger_entry::ActiveModel = existing.into();
    if let Some(category_id) = request.category_id {
        active.category_id = Set(category_id);
    }
    if let Some(description) = request.description {
        active.description = Set(description);
    }
    if let Some(amount) = request.amount {
        if amount <= Decimal::ZERO {
            return Err(validation_error_response("Entry amount must be positive"));
        }
        active.amount = Set(amount);
    }
    if let Some(entry_date) = request.entry_date {
        active.entry_date = Set(entry_date);
    }
    if let Some(status) = request.status.as_deref() {
        active.status = Set(parse_status(status).map_err(validation_error_response)?);
    }
    if let Some(payment_date) = request.payment_date {
        active.payment_date = Set(payment_date);
    }
    if let Some(payment_method) = request.payment_method {
        active.payment_method = Set(payment_method);
    }

    let updated = active.update(&state.db).await.map_err(db_error_response)?;
    info!("Ledger entry {} updated", updated.id);
    state.invalidate_reports();
    Ok(Json(ApiResponse {
        data: LedgerEntryResponse::from(updated),
        message: "Ledger entry updated successfully".to_string(),
        success: true,
    }))
}

/// Delete a manual ledger entry
#[utoipa::path(
    delete,
    path = "/api/v1/ledger-entries/{entry_id}",
    tag = "ledger-entries",
    params(
        ("entry_id" = i32, Path, description = "Ledger entry ID"),
        ("owner_id" = i32, Query, description = "Owner user ID"),
    ),
    responses(
        (status = 200, description = "Ledger entry deleted", body = ApiResponse<String>),
        (status = 404, description = "Ledger entry not found", body = ErrorResponse),
        (status = 409, description = "Derived entries are read-only", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_ledger_entry(
    Path(entry_id): Path<i32>,
    Query(query): Query<OwnerQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ErrorResponse>)> {
    let existing = find_owned(&state, entry_id, query.owner_id).await?;
    if existing.origin != ledger_entry::EntryOrigin::Manual {
        return Err(conflict_response(
            "Derived ledger entries cannot be deleted through the manual surface",
        ));
    }

    existing.delete(&state.db).await.map_err(db_error_response)?;
    info!("Ledger entry {} deleted", entry_id);
    state.invalidate_reports();
    Ok(Json(ApiResponse {
        data: format!("Ledger entry {} deleted", entry_id),
        message: "Ledger entry deleted successfully".to_string(),
        success: true,
    }))
}
