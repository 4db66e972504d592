use axum::http::StatusCode;
use axum::response::Json;
use common::{FinancialSummary, MonthlyReport};
use compute::error::EngineError;
use moka::future::Cache;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Cache for the read-only summary and report endpoints
    pub cache: Cache<String, CachedData>,
}

impl AppState {
    /// Drops every cached summary/report. Called by mutation handlers
    /// so reads after a write never serve stale figures.
    pub fn invalidate_reports(&self) {
        self.cache.invalidate_all();
    }
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    Summary(FinancialSummary),
    Report(MonthlyReport),
}

/// API response wrapper
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Stable machine-readable error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

impl ErrorResponse {
    pub fn new(code: &str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
            success: false,
        }
    }
}

/// Maps an engine error to the HTTP error taxonomy: validation 400,
/// not-found 404 (with the caller's resource-specific code),
/// consistency 409, database 500.
pub fn engine_error_response(
    not_found_code: &str,
    err: EngineError,
) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        EngineError::Validation(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("VALIDATION_ERROR", msg)),
        ),
        EngineError::NotFound(msg) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(not_found_code, msg)),
        ),
        EngineError::Consistency(msg) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::new("INVALID_STATE", msg)),
        ),
        EngineError::Database(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("DATABASE_ERROR", e.to_string())),
        ),
    }
}

pub fn db_error_response(err: sea_orm::DbErr) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("DATABASE_ERROR", err.to_string())),
    )
}

pub fn not_found_response(code: &str, msg: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new(code, msg)))
}

pub fn validation_error_response(msg: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new("VALIDATION_ERROR", msg)),
    )
}

pub fn conflict_response(msg: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::CONFLICT,
        Json(ErrorResponse::new("INVALID_STATE", msg)),
    )
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Owner scoping for list/read endpoints.
#[derive(Debug, Deserialize, ToSchema)]
pub struct OwnerQuery {
    pub owner_id: i32,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::clients::create_client,
        crate::handlers::clients::get_clients,
        crate::handlers::clients::get_client,
        crate::handlers::clients::update_client,
        crate::handlers::clients::delete_client,
        crate::handlers::service_orders::create_service_order,
        crate::handlers::service_orders::get_service_orders,
        crate::handlers::service_orders::get_service_order,
        crate::handlers::service_orders::update_service_order,
        crate::handlers::service_orders::delete_service_order,
        crate::handlers::service_orders::settle_service_order,
        crate::handlers::service_orders::unsettle_service_order,
        crate::handlers::contracts::create_contract,
        crate::handlers::contracts::get_contracts,
        crate::handlers::contracts::get_contract,
        crate::handlers::contracts::get_contract_installments,
        crate::handlers::contracts::update_contract,
        crate::handlers::installments::create_installment,
        crate::handlers::installments::update_installment,
        crate::handlers::installments::delete_installment,
        crate::handlers::ledger_entries::create_ledger_entry,
        crate::handlers::ledger_entries::get_ledger_entries,
        crate::handlers::ledger_entries::get_ledger_entry,
        crate::handlers::ledger_entries::update_ledger_entry,
        crate::handlers::ledger_entries::delete_ledger_entry,
        crate::handlers::categories::create_category,
        crate::handlers::categories::get_categories,
        crate::handlers::categories::update_category,
        crate::handlers::categories::delete_category,
        crate::handlers::summary::get_summary,
        crate::handlers::reports::get_monthly_report,
        crate::handlers::reports::set_profit_goal,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            OwnerQuery,
            crate::handlers::clients::CreateClientRequest,
            crate::handlers::clients::UpdateClientRequest,
            crate::handlers::clients::ClientResponse,
            crate::handlers::service_orders::CreateServiceOrderRequest,
            crate::handlers::service_orders::UpdateServiceOrderRequest,
            crate::handlers::service_orders::SettleServiceOrderRequest,
            crate::handlers::service_orders::ServiceOrderResponse,
            crate::handlers::contracts::CreateContractRequest,
            crate::handlers::contracts::UpdateContractRequest,
            crate::handlers::contracts::ContractResponse,
            crate::handlers::contracts::CreateContractResponse,
            crate::handlers::installments::CreateInstallmentRequest,
            crate::handlers::installments::UpdateInstallmentRequest,
            crate::handlers::installments::InstallmentResponse,
            crate::handlers::ledger_entries::CreateLedgerEntryRequest,
            crate::handlers::ledger_entries::UpdateLedgerEntryRequest,
            crate::handlers::ledger_entries::LedgerEntryResponse,
            crate::handlers::categories::CreateCategoryRequest,
            crate::handlers::categories::UpdateCategoryRequest,
            crate::handlers::categories::CategoryResponse,
            crate::handlers::reports::SetProfitGoalRequest,
            crate::handlers::reports::ProfitGoalResponse,
            common::FinancialSummary,
            common::CategoryExpense,
            common::DateRange,
            common::MonthlyPoint,
            common::MonthlySeries,
            common::MonthStats,
            common::MonthlyDeltas,
            common::GoalComparison,
            common::MonthlyReport,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "clients", description = "Client records"),
        (name = "service-orders", description = "One-off service orders and settlement"),
        (name = "contracts", description = "Contracts and installment schedules"),
        (name = "installments", description = "Installment payment lifecycle"),
        (name = "ledger-entries", description = "Manual ledger entries"),
        (name = "categories", description = "Entry categories"),
        (name = "summary", description = "Financial reconciliation summary"),
        (name = "reports", description = "Monthly reports and profit goals"),
    ),
    info(
        title = "Servio API",
        description = "Service company back-office: contracts, installments and financial reconciliation",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
