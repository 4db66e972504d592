use crate::handlers::installments::InstallmentResponse;
use crate::schemas::{
    conflict_response, db_error_response, engine_error_response, not_found_response,
    validation_error_response, ApiResponse, AppState, ErrorResponse, OwnerQuery,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::NaiveDate;
use compute::schedule::{create_contract as generate_contract, NewContract};
use model::entities::{contract, installment};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a contract. Creation expands the contract
/// into its installment schedule in the same transaction.
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateContractRequest {
    /// Owner user ID
    pub owner_id: i32,
    pub client_id: i32,
    pub description: Option<String>,
    /// Total contract value, decimal string
    pub total_value: Decimal,
    /// Number of installments (>= 1)
    #[validate(range(min = 1))]
    pub installment_count: i32,
    /// Value of each installment, decimal string
    pub installment_value: Decimal,
    /// Nominal day-of-month each installment falls due (1-31)
    #[validate(range(min = 1, max = 31))]
    pub due_day: i32,
    /// Contract start date (YYYY-MM-DD)
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Request body for updating a contract (status and notes only)
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateContractRequest {
    /// One of "active", "suspended", "cancelled"
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// Contract response model
#[derive(Debug, Serialize, ToSchema)]
pub struct ContractResponse {
    pub id: i32,
    pub owner_id: i32,
    pub client_id: i32,
    pub description: Option<String>,
    pub total_value: Decimal,
    pub installment_count: i32,
    pub installment_value: Decimal,
    pub due_day: i32,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: String,
    pub notes: Option<String>,
}

/// Response for contract creation: the contract plus how many
/// installments were generated.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateContractResponse {
    pub contract: ContractResponse,
    pub installments_created: usize,
}

impl From<contract::Model> for ContractResponse {
    fn from(model: contract::Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            client_id: model.client_id,
            description: model.description,
            total_value: model.total_value,
            installment_count: model.installment_count,
            installment_value: model.installment_value,
            due_day: model.due_day,
            start_date: model.start_date,
            end_date: model.end_date,
            status: status_str(model.status).to_string(),
            notes: model.notes,
        }
    }
}

fn status_str(status: contract::ContractStatus) -> &'static str {
    match status {
        contract::ContractStatus::Active => "active",
        contract::ContractStatus::Suspended => "suspended",
        contract::ContractStatus::Cancelled => "cancelled",
        contract::ContractStatus::Completed => "completed",
    }
}

/// Create a contract and generate its installment schedule
#[utoipa::path(
    post,
    path = "/api/v1/contracts",
    tag = "contracts",
    request_body = CreateContractRequest,
    responses(
        (status = 201, description = "Contract created with installments", body = ApiResponse<CreateContractResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_contract(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateContractRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<CreateContractResponse>>), (StatusCode, Json<ErrorResponse>)>
{
    debug!(
        "Creating contract for owner {} with {} installments",
        request.owner_id, request.installment_count
    );

    let (created, installments) = generate_contract(
        &state.db,
        NewContract {
            owner_id: request.owner_id,
            client_id: request.client_id,
            description: request.description,
            total_value: request.total_value,
            installment_count: request.installment_count,
            installment_value: request.installment_value,
            due_day: request.due_day,
            start_date: request.start_date,
            end_date: request.end_date,
            notes: request.notes,
        },
    )
    .await
    .map_err(|e| engine_error_response("CONTRACT_NOT_FOUND", e))?;

    info!(
        "Contract created with ID: {}, {} installments generated",
        created.id,
        installments.len()
    );
    state.invalidate_reports();
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: CreateContractResponse {
                contract: ContractResponse::from(created),
                installments_created: installments.len(),
            },
            message: "Contract created successfully".to_string(),
            success: true,
        }),
    ))
}

/// Get all contracts of an owner
#[utoipa::path(
    get,
    path = "/api/v1/contracts",
    tag = "contracts",
    params(("owner_id" = i32, Query, description = "Owner user ID")),
    responses(
        (status = 200, description = "Contracts retrieved", body = ApiResponse<Vec<ContractResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_contracts(
    Query(query): Query<OwnerQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ContractResponse>>>, (StatusCode, Json<ErrorResponse>)> {
    let contracts = contract::Entity::find()
        .filter(contract::Column::OwnerId.eq(query.owner_id))
        .all(&state.db)
        .await
        .map_err(db_error_response)?;

    debug!("Retrieved {} contracts", contracts.len());
    Ok(Json(ApiResponse {
        data: contracts.into_iter().map(ContractResponse::from).collect(),
        message: "Contracts retrieved successfully".to_string(),
        success: true,
    }))
}

async fn find_owned(
    state: &AppState,
    contract_id: i32,
    owner_id: i32,
) -> Result<contract::Model, (StatusCode, Json<ErrorResponse>)> {
    contract::Entity::find_by_id(contract_id)
        .filter(contract::Column::OwnerId.eq(owner_id))
        .one(&state.db)
        .await
        .map_err(db_error_response)?
        .ok_or_else(|| {
            warn!("Contract {} not found for owner {}", contract_id, owner_id);
            not_found_response(
                "CONTRACT_NOT_FOUND",
                format!("Contract {} not found", contract_id),
            )
        })
}

/// Get a specific contract
#[utoipa::path(
    get,
    path = "/api/v1/contracts/{contract_id}",
    tag = "contracts",
    params(
        ("contract_id" = i32, Path, description = "Contract ID"),
        ("owner_id" = i32, Query, description = "Owner user ID"),
    ),
    responses(
        (status = 200, description = "Contract retrieved", body = ApiResponse<ContractResponse>),
        (status = 404, description = "Contract not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_contract(
    Path(contract_id): Path<i32>,
    Query(query): Query<OwnerQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ContractResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let found = find_owned(&state, contract_id, query.owner_id).await?;
    Ok(Json(ApiResponse {
        data: ContractResponse::from(found),
        message: "Contract retrieved successfully".to_string(),
        success: true,
    }))
}

/// Get the installment schedule of a contract
#[utoipa::path(
    get,
    path = "/api/v1/contracts/{contract_id}/installments",
    tag = "contracts",
    params(
        ("contract_id" = i32, Path, description = "Contract ID"),
        ("owner_id" = i32, Query, description = "Owner user ID"),
    ),
    responses(
        (status = 200, description = "Installments retrieved", body = ApiResponse<Vec<InstallmentResponse>>),
        (status = 404, description = "Contract not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_contract_installments(
    Path(contract_id): Path<i32>,
    Query(query): Query<OwnerQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<InstallmentResponse>>>, (StatusCode, Json<ErrorResponse>)> {
    find_owned(&state, contract_id, query.owner_id).await?;

    let installments = installment::Entity::find()
        .filter(installment::Column::ContractId.eq(contract_id))
        .order_by_asc(installment::Column::SequenceNumber)
        .all(&state.db)
        .await
        .map_err(db_error_response)?;

    Ok(Json(ApiResponse {
        data: installments
            .into_iter()
            .map(InstallmentResponse::from)
            .collect(),
        message: "Installments retrieved successfully".to_string(),
        success: true,
    }))
}

/// Update a contract's status or notes
#[utoipa::path(
    put,
    path = "/api/v1/contracts/{contract_id}",
    tag = "contracts",
    params(
        ("contract_id" = i32, Path, description = "Contract ID"),
        ("owner_id" = i32, Query, description = "Owner user ID"),
    ),
    request_body = UpdateContractRequest,
    responses(
        (status = 200, description = "Contract updated", body = ApiResponse<ContractResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Contract not found", body = ErrorResponse),
        (status = 409, description = "Invalid status transition", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_contract(
    Path(contract_id): Path<i32>,
    Query(query): Query<OwnerQuery>,
    State(state): State<AppState>,
    Json(request): Json<UpdateContractRequest>,
) -> Result<Json<ApiResponse<ContractResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let existing = find_owned(&state, contract_id, query.owner_id).await?;

    let mut active: contract::ActiveModel = existing.into();
    if let Some(status) = request.status.as_deref() {
        // `completed` is only ever set by the payment cascade.
        let parsed = match status {
            "active" => contract::ContractStatus::Active,
            "suspended" => contract::ContractStatus::Suspended,
            "cancelled" => contract::ContractStatus::Cancelled,
            "completed" => {
                return Err(conflict_response(
                    "Contract completion is derived from installment payments",
                ))
            }
            other => {
                return Err(validation_error_response(format!(
                    "Invalid contract status: {}",
                    other
                )))
            }
        };
        active.status = Set(parsed);
    }
    if let Some(notes) = request.notes {
        active.notes = Set(Some(notes));
    }

    let updated = active.update(&state.db).await.map_err(db_error_response)?;
    info!("Contract {} updated", updated.id);
    state.invalidate_reports();
    Ok(Json(ApiResponse {
        data: ContractResponse::from(updated),
        message: "Contract updated successfully".to_string(),
        success: true,
    }))
}
