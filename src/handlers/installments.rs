use crate::schemas::{
    db_error_response, engine_error_response, validation_error_response, ApiResponse, AppState,
    ErrorResponse, OwnerQuery,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use compute::payment::{self, PaymentDetails};
use model::entities::installment;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

/// Request body for creating an independent installment (one not owned
/// by a contract).
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateInstallmentRequest {
    /// Owner user ID
    pub owner_id: i32,
    /// Scheduled amount, decimal string
    pub amount: Decimal,
    /// Due date (YYYY-MM-DD)
    pub due_date: NaiveDate,
}

/// Request body for driving an installment through its lifecycle.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateInstallmentRequest {
    /// Target status: "paid", "pending" or "cancelled"
    pub status: String,
    /// Required when status is "paid"
    pub payment_date: Option<NaiveDate>,
    /// Defaults to the scheduled amount
    pub paid_amount: Option<Decimal>,
    pub payment_method: Option<String>,
}

/// Installment response model. `status` is the effective status:
/// a pending installment past its due date reads as "overdue".
#[derive(Debug, Serialize, ToSchema)]
pub struct InstallmentResponse {
    pub id: i32,
    pub owner_id: i32,
    pub contract_id: Option<i32>,
    pub sequence_number: i32,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub status: String,
    pub payment_date: Option<NaiveDate>,
    pub paid_amount: Option<Decimal>,
    pub payment_method: Option<String>,
}

impl From<installment::Model> for InstallmentResponse {
    fn from(model: installment::Model) -> Self {
        let today = chrono::Utc::now().date_naive();
        Self {
            id: model.id,
            owner_id: model.owner_id,
            contract_id: model.contract_id,
            sequence_number: model.sequence_number,
            amount: model.amount,
            due_date: model.due_date,
            status: status_str(model.effective_status(today)).to_string(),
            payment_date: model.payment_date,
            paid_amount: model.paid_amount,
            payment_method: model.payment_method,
        }
    }
}

fn status_str(status: installment::InstallmentStatus) -> &'static str {
    match status {
        installment::InstallmentStatus::Pending => "pending",
        installment::InstallmentStatus::Paid => "paid",
        installment::InstallmentStatus::Overdue => "overdue",
        installment::InstallmentStatus::Cancelled => "cancelled",
    }
}

/// Create an independent installment
#[utoipa::path(
    post,
    path = "/api/v1/installments",
    tag = "installments",
    request_body = CreateInstallmentRequest,
    responses(
        (status = 201, description = "Installment created", body = ApiResponse<InstallmentResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_installment(
    State(state): State<AppState>,
    Json(request): Json<CreateInstallmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<InstallmentResponse>>), (StatusCode, Json<ErrorResponse>)>
{
    if request.amount <= Decimal::ZERO {
        return Err(validation_error_response("Installment amount must be positive"));
    }

    let created = installment::ActiveModel {
        owner_id: Set(request.owner_id),
        contract_id: Set(None),
        sequence_number: Set(1),
        amount: Set(request.amount),
        due_date: Set(request.due_date),
        status: Set(installment::InstallmentStatus::Pending),
        payment_date: Set(None),
        paid_amount: Set(None),
        payment_method: Set(None),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(db_error_response)?;

    info!("Independent installment created with ID: {}", created.id);
    state.invalidate_reports();
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: InstallmentResponse::from(created),
            message: "Installment created successfully".to_string(),
            success: true,
        }),
    ))
}

/// Update an installment's status (pay, cancel, reopen)
#[utoipa::path(
    put,
    path = "/api/v1/installments/{installment_id}",
    tag = "installments",
    params(
        ("installment_id" = i32, Path, description = "Installment ID"),
        ("owner_id" = i32, Query, description = "Owner user ID"),
    ),
    request_body = UpdateInstallmentRequest,
    responses(
        (status = 200, description = "Installment updated", body = ApiResponse<InstallmentResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Installment not found", body = ErrorResponse),
        (status = 409, description = "Invalid state transition", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_installment(
    Path(installment_id): Path<i32>,
    Query(query): Query<OwnerQuery>,
    State(state): State<AppState>,
    Json(request): Json<UpdateInstallmentRequest>,
) -> Result<Json<ApiResponse<InstallmentResponse>>, (StatusCode, Json<ErrorResponse>)> {
    match request.status.as_str() {
        "paid" => {
            let payment_date = request.payment_date.ok_or_else(|| {
                validation_error_response("payment_date is required when paying an installment")
            })?;

            let outcome = payment::pay_installment(
                &state.db,
                query.owner_id,
                installment_id,
                PaymentDetails {
                    payment_date,
                    paid_amount: request.paid_amount,
                    payment_method: request.payment_method,
                },
            )
            .await
            .map_err(|e| engine_error_response("INSTALLMENT_NOT_FOUND", e))?;

            info!(
                "Installment {} paid{}",
                installment_id,
                if outcome.contract_completed {
                    ", contract completed"
                } else {
                    ""
                }
            );
            state.invalidate_reports();
            Ok(Json(ApiResponse {
                data: InstallmentResponse::from(outcome.installment),
                message: if outcome.contract_completed {
                    "Installment paid; contract completed".to_string()
                } else {
                    "Installment paid successfully".to_string()
                },
                success: true,
            }))
        }
        "pending" | "cancelled" => {
            let target = if request.status == "pending" {
                installment::InstallmentStatus::Pending
            } else {
                installment::InstallmentStatus::Cancelled
            };
            let updated =
                payment::set_installment_status(&state.db, query.owner_id, installment_id, target)
                    .await
                    .map_err(|e| engine_error_response("INSTALLMENT_NOT_FOUND", e))?;

            info!("Installment {} set to {}", installment_id, request.status);
            state.invalidate_reports();
            Ok(Json(ApiResponse {
                data: InstallmentResponse::from(updated),
                message: "Installment updated successfully".to_string(),
                success: true,
            }))
        }
        other => Err(validation_error_response(format!(
            "Invalid installment status: {} (overdue is derived, not settable)",
            other
        ))),
    }
}

/// Delete an installment
#[utoipa::path(
    delete,
    path = "/api/v1/installments/{installment_id}",
    tag = "installments",
    params(
        ("installment_id" = i32, Path, description = "Installment ID"),
        ("owner_id" = i32, Query, description = "Owner user ID"),
    ),
    responses(
        (status = 200, description = "Installment deleted", body = ApiResponse<String>),
        (status = 404, description = "Installment not found", body = ErrorResponse),
        (status = 409, description = "Paid installments cannot be deleted", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_installment(
    Path(installment_id): Path<i32>,
    Query(query): Query<OwnerQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ErrorResponse>)> {
    payment::delete_installment(&state.db, query.owner_id, installment_id)
        .await
        .map_err(|e| engine_error_response("INSTALLMENT_NOT_FOUND", e))?;

    info!("Installment {} deleted", installment_id);
    state.invalidate_reports();
    Ok(Json(ApiResponse {
        data: format!("Installment {} deleted", installment_id),
        message: "Installment deleted successfully".to_string(),
        success: true,
    }))
}
