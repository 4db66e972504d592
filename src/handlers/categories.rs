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
use model::entities::{category, ledger_entry};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a category
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    /// Owner user ID
    pub owner_id: i32,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Hex color, e.g. "#ef4444"
    #[validate(length(min = 4, max = 9))]
    pub color: String,
    /// "revenue" or "expense"
    pub kind: String,
}

/// Request body for updating a category
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 4, max = 9))]
    pub color: Option<String>,
}

/// Category response model
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub owner_id: i32,
    pub name: String,
    pub color: String,
    pub kind: String,
}

impl From<category::Model> for CategoryResponse {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            name: model.name,
            color: model.color,
            kind: match model.kind {
                ledger_entry::EntryKind::Revenue => "revenue".to_string(),
                ledger_entry::EntryKind::Expense => "expense".to_string(),
            },
        }
    }
}

fn parse_kind(s: &str) -> Result<ledger_entry::EntryKind, String> {
    match s {
        "revenue" => Ok(ledger_entry::EntryKind::Revenue),
        "expense" => Ok(ledger_entry::EntryKind::Expense),
        other => Err(format!("Invalid category kind: {}", other)),
    }
}

/// Create a category
#[utoipa::path(
    post,
    path = "/api/v1/categories",
    tag = "categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_category(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateCategoryRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponse>>), (StatusCode, Json<ErrorResponse>)> {
    let kind = parse_kind(&request.kind).map_err(validation_error_response)?;

    let created = category::ActiveModel {
        owner_id: Set(request.owner_id),
        name: Set(request.name),
        color: Set(request.color),
        kind: Set(kind),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(db_error_response)?;

    info!("Category created with ID: {}", created.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: CategoryResponse::from(created),
            message: "Category created successfully".to_string(),
            success: true,
        }),
    ))
}

/// Get all categories of an owner, seeding the default set on first use
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    tag = "categories",
    params(("owner_id" = i32, Query, description = "Owner user ID")),
    responses(
        (status = 200, description = "Categories retrieved", body = ApiResponse<Vec<CategoryResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_categories(
    Query(query): Query<OwnerQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CategoryResponse>>>, (StatusCode, Json<ErrorResponse>)> {
    let mut categories = category::Entity::find()
        .filter(category::Column::OwnerId.eq(query.owner_id))
        .all(&state.db)
        .await
        .map_err(db_error_response)?;

    if categories.is_empty() {
        debug!("Seeding default categories for owner {}", query.owner_id);
        category::Entity::insert_many(category::default_set(query.owner_id))
            .exec(&state.db)
            .await
            .map_err(db_error_response)?;
        categories = category::Entity::find()
            .filter(category::Column::OwnerId.eq(query.owner_id))
            .all(&state.db)
            .await
            .map_err(db_error_response)?;
    }

    Ok(Json(ApiResponse {
        data: categories.into_iter().map(CategoryResponse::from).collect(),
        message: "Categories retrieved successfully".to_string(),
        success: true,
    }))
}

/// Update a category
#[utoipa::path(
    put,
    path = "/api/v1/categories/{category_id}",
    tag = "categories",
    params(
        ("category_id" = i32, Path, description = "Category ID"),
        ("owner_id" = i32, Query, description = "Owner user ID"),
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryResponse>),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_category(
    Path(category_id): Path<i32>,
    Query(query): Query<OwnerQuery>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateCategoryRequest>>,
) -> Result<Json<ApiResponse<CategoryResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let existing = category::Entity::find_by_id(category_id)
        .filter(category::Column::OwnerId.eq(query.owner_id))
        .one(&state.db)
        .await
        .map_err(db_error_response)?
        .ok_or_else(|| {
            warn!("Category {} not found for owner {}", category_id, query.owner_id);
            not_found_response(
                "CATEGORY_NOT_FOUND",
                format!("Category {} not found", category_id),
            )
        })?;

    let mut active: category::ActiveModel = existing.into();
    if let Some(name) = request.name {
        active.name = Set(name);
    }
    if let Some(color) = request.color {
        active.color = Set(color);
    }

    let updated = active.update(&state.db).await.map_err(db_error_response)?;
    info!("Category {} updated", updated.id);
    Ok(Json(ApiResponse {
        data: CategoryResponse::from(updated),
        message: "Category updated successfully".to_string(),
        success: true,
    }))
}

/// Delete a category. Entries pointing at it fall back to the
/// uncategorized bucket (FK set-null).
#[utoipa::path(
    delete,
    path = "/api/v1/categories/{category_id}",
    tag = "categories",
    params(
        ("category_id" = i32, Path, description = "Category ID"),
        ("owner_id" = i32, Query, description = "Owner user ID"),
    ),
    responses(
        (status = 200, description = "Category deleted", body = ApiResponse<String>),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_category(
    Path(category_id): Path<i32>,
    Query(query): Query<OwnerQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ErrorResponse>)> {
    let result = category::Entity::delete_many()
        .filter(category::Column::Id.eq(category_id))
        .filter(category::Column::OwnerId.eq(query.owner_id))
        .exec(&state.db)
        .await
        .map_err(db_error_response)?;

    if result.rows_affected == 0 {
        return Err(not_found_response(
            "CATEGORY_NOT_FOUND",
            format!("Category {} not found", category_id),
        ));
    }

    info!("Category {} deleted", category_id);
    state.invalidate_reports();
    Ok(Json(ApiResponse {
        data: format!("Category {} deleted", category_id),
        message: "Category deleted successfully".to_string(),
        success: true,
    }))
}
