use crate::schemas::{
    db_error_response, not_found_response, ApiResponse, AppState, ErrorResponse, OwnerQuery,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use model::entities::client;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a client
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateClientRequest {
    /// Owner user ID
    pub owner_id: i32,
    /// Client name
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// Request body for updating a client
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateClientRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// Client response model
#[derive(Debug, Serialize, ToSchema)]
pub struct ClientResponse {
    pub id: i32,
    pub owner_id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

impl From<client::Model> for ClientResponse {
    fn from(model: client::Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            notes: model.notes,
        }
    }
}

/// Create a new client
#[utoipa::path(
    post,
    path = "/api/v1/clients",
    tag = "clients",
    request_body = CreateClientRequest,
    responses(
        (status = 201, description = "Client created", body = ApiResponse<ClientResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_client(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateClientRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<ClientResponse>>), (StatusCode, Json<ErrorResponse>)> {
    debug!("Creating client '{}' for owner {}", request.name, request.owner_id);

    let created = client::ActiveModel {
        owner_id: Set(request.owner_id),
        name: Set(request.name),
        email: Set(request.email),
        phone: Set(request.phone),
        notes: Set(request.notes),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(db_error_response)?;

    info!("Client created with ID: {}", created.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: ClientResponse::from(created),
            message: "Client created successfully".to_string(),
            success: true,
        }),
    ))
}

/// Get all clients of an owner
#[utoipa::path(
    get,
    path = "/api/v1/clients",
    tag = "clients",
    params(("owner_id" = i32, Query, description = "Owner user ID")),
    responses(
        (status = 200, description = "Clients retrieved", body = ApiResponse<Vec<ClientResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_clients(
    Query(query): Query<OwnerQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ClientResponse>>>, (StatusCode, Json<ErrorResponse>)> {
    let clients = client::Entity::find()
        .filter(client::Column::OwnerId.eq(query.owner_id))
        .all(&state.db)
        .await
        .map_err(db_error_response)?;

    debug!("Retrieved {} clients", clients.len());
    Ok(Json(ApiResponse {
        data: clients.into_iter().map(ClientResponse::from).collect(),
        message: "Clients retrieved successfully".to_string(),
        success: true,
    }))
}

/// Get a specific client
#[utoipa::path(
    get,
    path = "/api/v1/clients/{client_id}",
    tag = "clients",
    params(
        ("client_id" = i32, Path, description = "Client ID"),
        ("owner_id" = i32, Query, description = "Owner user ID"),
    ),
    responses(
        (status = 200, description = "Client retrieved", body = ApiResponse<ClientResponse>),
        (status = 404, description = "Client not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_client(
    Path(client_id): Path<i32>,
    Query(query): Query<OwnerQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ClientResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let found = client::Entity::find_by_id(client_id)
        .filter(client::Column::OwnerId.eq(query.owner_id))
        .one(&state.db)
        .await
        .map_err(db_error_response)?;

    match found {
        Some(model) => Ok(Json(ApiResponse {
            data: ClientResponse::from(model),
            message: "Client retrieved successfully".to_string(),
            success: true,
        })),
        None => {
            warn!("Client {} not found for owner {}", client_id, query.owner_id);
            Err(not_found_response(
                "CLIENT_NOT_FOUND",
                format!("Client {} not found", client_id),
            ))
        }
    }
}

/// Update a client
#[utoipa::path(
    put,
    path = "/api/v1/clients/{client_id}",
    tag = "clients",
    params(
        ("client_id" = i32, Path, description = "Client ID"),
        ("owner_id" = i32, Query, description = "Owner user ID"),
    ),
    request_body = UpdateClientRequest,
    responses(
        (status = 200, description = "Client updated", body = ApiResponse<ClientResponse>),
        (status = 404, description = "Client not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_client(
    Path(client_id): Path<i32>,
    Query(query): Query<OwnerQuery>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateClientRequest>>,
) -> Result<Json<ApiResponse<ClientResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let existing = client::Entity::find_by_id(client_id)
        .filter(client::Column::OwnerId.eq(query.owner_id))
        .one(&state.db)
        .await
        .map_err(db_error_response)?
        .ok_or_else(|| {
            not_found_response("CLIENT_NOT_FOUND", format!("Client {} not found", client_id))
        })?;

    let mut active: client::ActiveModel = existing.into();
    if let Some(name) = request.name {
        active.name = Set(name);
    }
    if let Some(email) = request.email {
        active.email = Set(Some(email));
    }
    if let Some(phone) = request.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(notes) = request.notes {
        active.notes = Set(Some(notes));
    }

    let updated = active.update(&state.db).await.map_err(db_error_response)?;
    info!("Client {} updated", updated.id);
    Ok(Json(ApiResponse {
        data: ClientResponse::from(updated),
        message: "Client updated successfully".to_string(),
        success: true,
    }))
}

/// Delete a client
#[utoipa::path(
    delete,
    path = "/api/v1/clients/{client_id}",
    tag = "clients",
    params(
        ("client_id" = i32, Path, description = "Client ID"),
        ("owner_id" = i32, Query, description = "Owner user ID"),
    ),
    responses(
        (status = 200, description = "Client deleted", body = ApiResponse<String>),
        (status = 404, description = "Client not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_client(
    Path(client_id): Path<i32>,
    Query(query): Query<OwnerQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ErrorResponse>)> {
    let result = client::Entity::delete_many()
        .filter(client::Column::Id.eq(client_id))
        .filter(client::Column::OwnerId.eq(query.owner_id))
        .exec(&state.db)
        .await
        .map_err(db_error_response)?;

    if result.rows_affected == 0 {
        warn!("Client {} not found for deletion", client_id);
        return Err(not_found_response(
            "CLIENT_NOT_FOUND",
            format!("Client {} not found", client_id),
        ));
    }

    info!("Client {} deleted", client_id);
    Ok(Json(ApiResponse {
        data: format!("Client {} deleted", client_id),
        message: "Client deleted successfully".to_string(),
        success: true,
    }))
}
