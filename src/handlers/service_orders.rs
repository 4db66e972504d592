use crate::schemas::{
    db_error_response, not_found_response, validation_error_response, ApiResponse, AppState,
    ErrorResponse, OwnerQuery,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::NaiveDate;
use model::entities::service_order;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a service order
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateServiceOrderRequest {
    /// Owner user ID
    pub owner_id: i32,
    pub client_id: Option<i32>,
    #[validate(length(min = 1))]
    pub description: String,
    /// Order value, decimal string
    pub value: Decimal,
    /// Execution date (YYYY-MM-DD)
    pub execution_date: NaiveDate,
    /// Lifecycle status, defaults to "pending"
    pub status: Option<String>,
}

/// Request body for updating a service order
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateServiceOrderRequest {
    pub client_id: Option<i32>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub value: Option<Decimal>,
    pub execution_date: Option<NaiveDate>,
    pub status: Option<String>,
}

/// Request body for settling a service order
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SettleServiceOrderRequest {
    /// Settlement date, defaults to today
    pub settlement_date: Option<NaiveDate>,
    /// Amount collected, defaults to the order value
    pub paid_amount: Option<Decimal>,
}

/// Service order response model
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceOrderResponse {
    pub id: i32,
    pub owner_id: i32,
    pub client_id: Option<i32>,
    pub description: String,
    pub value: Decimal,
    pub execution_date: NaiveDate,
    pub status: String,
    pub settled: bool,
    pub settlement_date: Option<NaiveDate>,
    pub paid_amount: Option<Decimal>,
}

impl From<service_order::Model> for ServiceOrderResponse {
    fn from(model: service_order::Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            client_id: model.client_id,
            description: model.description,
            value: model.value,
            execution_date: model.execution_date,
            status: status_str(model.status).to_string(),
            settled: model.settled,
            settlement_date: model.settlement_date,
            paid_amount: model.paid_amount,
        }
    }
}

fn status_str(status: service_order::OrderStatus) -> &'static str {
    match status {
        service_order::OrderStatus::Pending => "pending",
        service_order::OrderStatus::InProgress => "in_progress",
        service_order::OrderStatus::Completed => "completed",
        service_order::OrderStatus::Cancelled => "cancelled",
    }
}

fn parse_status(s: &str) -> Result<service_order::OrderStatus, String> {
    match s {
        "pending" => Ok(service_order::OrderStatus::Pending),
        "in_progress" => Ok(service_order::OrderStatus::InProgress),
        "completed" => Ok(service_order::OrderStatus::Completed),
        "cancelled" => Ok(service_order::OrderStatus::Cancelled),
        other => Err(format!("Invalid order status: {}", other)),
    }
}

async fn find_owned(
    state: &AppState,
    order_id: i32,
    owner_id: i32,
) -> Result<service_order::Model, (StatusCode, Json<ErrorResponse>)> {
    service_order::Entity::find_by_id(order_id)
        .filter(service_order::Column::OwnerId.eq(owner_id))
        .one(&state.db)
        .await
        .map_err(db_error_response)?
        .ok_or_else(|| {
            warn!("Service order {} not found for owner {}", order_id, owner_id);
            not_found_response(
                "SERVICE_ORDER_NOT_FOUND",
                format!("Service order {} not found", order_id),
            )
        })
}

/// Create a new service order
#[utoipa::path(
    post,
    path = "/api/v1/service-orders",
    tag = "service-orders",
    request_body = CreateServiceOrderRequest,
    responses(
        (status = 201, description = "Service order created", body = ApiResponse<ServiceOrderResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_service_order(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateServiceOrderRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<ServiceOrderResponse>>), (StatusCode, Json<ErrorResponse>)>
{
    if request.value <= Decimal::ZERO {
        return Err(validation_error_response("Order value must be positive"));
    }
    let status = match request.status.as_deref() {
        Some(s) => parse_status(s).map_err(validation_error_response)?,
        None => service_order::OrderStatus::Pending,
    };

    let created = service_order::ActiveModel {
        owner_id: Set(request.owner_id),
        client_id: Set(request.client_id),
        description: Set(request.description),
        value: Set(request.value),
        execution_date: Set(request.execution_date),
        status: Set(status),
        settled: Set(false),
        settlement_date: Set(None),
        paid_amount: Set(None),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(db_error_response)?;

    info!("Service order created with ID: {}", created.id);
    state.invalidate_reports();
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: ServiceOrderResponse::from(created),
            message: "Service order created successfully".to_string(),
            success: true,
        }),
    ))
}

/// Get all service orders of an owner
#[utoipa::path(
    get,
    path = "/api/v1/service-orders",
    tag = "service-orders",
    params(("owner_id" = i32, Query, description = "Owner user ID")),
    responses(
        (status = 200, description = "Service orders retrieved", body = ApiResponse<Vec<ServiceOrderResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_service_orders(
    Query(query): Query<OwnerQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ServiceOrderResponse>>>, (StatusCode, Json<ErrorResponse>)> {
    let orders = service_order::Entity::find()
        .filter(service_order::Column::OwnerId.eq(query.owner_id))
        .all(&state.db)
        .await
        .map_err(db_error_response)?;

    debug!("Retrieved {} service orders", orders.len());
    Ok(Json(ApiResponse {
        data: orders.into_iter().map(ServiceOrderResponse::from).collect(),
        message: "Service orders retrieved successfully".to_string(),
        success: true,
    }))
}

/// Get a specific service order
#[utoipa::path(
    get,
    path = "/api/v1/service-orders/{order_id}",
    tag = "service-orders",
    params(
        ("order_id" = i32, Path, description = "Service order ID"),
        ("owner_id" = i32, Query, description = "Owner user ID"),
    ),
    responses(
        (status = 200, description = "Service order retrieved", body = ApiResponse<ServiceOrderResponse>),
        (status = 404, description = "Service order not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_service_order(
    Path(order_id): Path<i32>,
    Query(query): Query<OwnerQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ServiceOrderResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let order = find_owned(&state, order_id, query.owner_id).await?;
    Ok(Json(ApiResponse {
        data: ServiceOrderResponse::from(order),
        message: "Service order retrieved successfully".to_string(),
        success: true,
    }))
}

/// Update a service order
#[utoipa::path(
    put,
    path = "/api/v1/service-orders/{order_id}",
    tag = "service-orders",
    params(
        ("order_id" = i32, Path, description = "Service order ID"),
        ("owner_id" = i32, Query, description = "Owner user ID"),
    ),
    request_body = UpdateServiceOrderRequest,
    responses(
        (status = 200, description = "Service order updated", body = ApiResponse<ServiceOrderResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Service order not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_service_order(
    Path(order_id): Path<i32>,
    Query(query): Query<OwnerQuery>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateServiceOrderRequest>>,
) -> Result<Json<ApiResponse<ServiceOrderResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let existing = find_owned(&state, order_id, query.owner_id).await?;

    let mut active: service_order::ActiveModel = existing.into();
    if let Some(client_id) = request.client_id {
        active.client_id = Set(Some(client_id));
    }
    if let Some(description) = request.description {
        active.description = Set(description);
    }
    if let Some(value) = request.value {
        if value <= Decimal::ZERO {
            return Err(validation_error_response("Order value must be positive"));
        }
        active.value = Set(value);
    }
    if let Some(execution_date) = request.execution_date {
        active.execution_date = Set(execution_date);
    }
    if let Some(status) = request.status.as_deref() {
        active.status = Set(parse_status(status).map_err(validation_error_response)?);
    }

    let updated = active.update(&state.db).await.map_err(db_error_response)?;
    info!("Service order {} updated", updated.id);
    state.invalidate_reports();
    Ok(Json(ApiResponse {
        data: ServiceOrderResponse::from(updated),
        message: "Service order updated successfully".to_string(),
        success: true,
    }))
}

/// Delete a service order
#[utoipa::path(
    delete,
    path = "/api/v1/service-orders/{order_id}",
    tag = "service-orders",
    params(
        ("order_id" = i32, Path, description = "Service order ID"),
        ("owner_id" = i32, Query, description = "Owner user ID"),
    ),
    responses(
        (status = 200, description = "Service order deleted", body = ApiResponse<String>),
        (status = 404, description = "Service order not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_service_order(
    Path(order_id): Path<i32>,
    Query(query): Query<OwnerQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ErrorResponse>)> {
    let result = service_order::Entity::delete_many()
        .filter(service_order::Column::Id.eq(order_id))
        .filter(service_order::Column::OwnerId.eq(query.owner_id))
        .exec(&state.db)
        .await
        .map_err(db_error_response)?;

    if result.rows_affected == 0 {
        return Err(not_found_response(
            "SERVICE_ORDER_NOT_FOUND",
            format!("Service order {} not found", order_id),
        ));
    }

    info!("Service order {} deleted", order_id);
    state.invalidate_reports();
    Ok(Json(ApiResponse {
        data: format!("Service order {} deleted", order_id),
        message: "Service order deleted successfully".to_string(),
        success: true,
    }))
}

/// Settle (mark paid) a service order
#[utoipa::path(
    post,
    path = "/api/v1/service-orders/{order_id}/settle",
    tag = "service-orders",
    params(
        ("order_id" = i32, Path, description = "Service order ID"),
        ("owner_id" = i32, Query, description = "Owner user ID"),
    ),
    request_body = SettleServiceOrderRequest,
    responses(
        (status = 200, description = "Service order settled", body = ApiResponse<ServiceOrderResponse>),
        (status = 404, description = "Service order not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn settle_service_order(
    Path(order_id): Path<i32>,
    Query(query): Query<OwnerQuery>,
    State(state): State<AppState>,
    Json(request): Json<SettleServiceOrderRequest>,
) -> Result<Json<ApiResponse<ServiceOrderResponse>>, (StatusCode, Json<ErrorResponse>)> {
    if let Some(paid_amount) = request.paid_amount {
        if paid_amount <= Decimal::ZERO {
            return Err(validation_error_response("Paid amount must be positive"));
        }
    }
    let existing = find_owned(&state, order_id, query.owner_id).await?;

    let mut active: service_order::ActiveModel = existing.into();
    active.settled = Set(true);
    active.settlement_date = Set(Some(
        request
            .settlement_date
            .unwrap_or_else(|| chrono::Utc::now().date_naive()),
    ));
    active.paid_amount = Set(request.paid_amount);

    let updated = active.update(&state.db).await.map_err(db_error_response)?;
    info!("Service order {} settled", updated.id);
    state.invalidate_reports();
    Ok(Json(ApiResponse {
        data: ServiceOrderResponse::from(updated),
        message: "Service order settled successfully".to_string(),
        success: true,
    }))
}

/// Revert settlement of a service order
#[utoipa::path(
    post,
    path = "/api/v1/service-orders/{order_id}/unsettle",
    tag = "service-orders",
    params(
        ("order_id" = i32, Path, description = "Service order ID"),
        ("owner_id" = i32, Query, description = "Owner user ID"),
    ),
    responses(
        (status = 200, description = "Settlement reverted", body = ApiResponse<ServiceOrderResponse>),
        (status = 404, description = "Service order not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn unsettle_service_order(
    Path(order_id): Path<i32>,
    Query(query): Query<OwnerQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ServiceOrderResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let existing = find_owned(&state, order_id, query.owner_id).await?;

    let mut active: service_order::ActiveModel = existing.into();
    active.settled = Set(false);
    active.settlement_date = Set(None);
    active.paid_amount = Set(None);

    let updated = active.update(&state.db).await.map_err(db_error_response)?;
    info!("Service order {} settlement reverted", updated.id);
    state.invalidate_reports();
    Ok(Json(ApiResponse {
        data: ServiceOrderResponse::from(updated),
        message: "Service order settlement reverted".to_string(),
        success: true,
    }))
}
