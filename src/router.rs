use crate::handlers::{
    categories::{create_category, delete_category, get_categories, update_category},
    clients::{create_client, delete_client, get_client, get_clients, update_client},
    contracts::{
        create_contract, get_contract, get_contract_installments, get_contracts, update_contract,
    },
    health::health_check,
    installments::{create_installment, delete_installment, update_installment},
    ledger_entries::{
        create_ledger_entry, delete_ledger_entry, get_ledger_entries, get_ledger_entry,
        update_ledger_entry,
    },
    reports::{get_monthly_report, set_profit_goal},
    service_orders::{
        create_service_order, delete_service_order, get_service_order, get_service_orders,
        settle_service_order, unsettle_service_order, update_service_order,
    },
    summary::get_summary,
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Client CRUD routes
        .route("/api/v1/clients", post(create_client))
        .route("/api/v1/clients", get(get_clients))
        .route("/api/v1/clients/:client_id", get(get_client))
        .route("/api/v1/clients/:client_id", put(update_client))
        .route("/api/v1/clients/:client_id", delete(delete_client))
        // Service order routes
        .route("/api/v1/service-orders", post(create_service_order))
        .route("/api/v1/service-orders", get(get_service_orders))
        .route("/api/v1/service-orders/:order_id", get(get_service_order))
        .route("/api/v1/service-orders/:order_id", put(update_service_order))
        .route("/api/v1/service-orders/:order_id", delete(delete_service_order))
        .route("/api/v1/service-orders/:order_id/settle", post(settle_service_order))
        .route("/api/v1/service-orders/:order_id/unsettle", post(unsettle_service_order))
        // Contract routes (creation expands the installment schedule)
        .route("/api/v1/contracts", post(create_contract))
        .route("/api/v1/contracts", get(get_contracts))
        .route("/api/v1/contracts/:contract_id", get(get_contract))
        .route("/api/v1/contracts/:contract_id", put(update_contract))
        .route(
            "/api/v1/contracts/:contract_id/installments",
            get(get_contract_installments),
        )
        // Installment lifecycle routes
        .route("/api/v1/installments", post(create_installment))
        .route("/api/v1/installments/:installment_id", put(update_installment))
        .route("/api/v1/installments/:installment_id", delete(delete_installment))
        // Manual ledger entry routes
        .route("/api/v1/ledger-entries", post(create_ledger_entry))
        .route("/api/v1/ledger-entries", get(get_ledger_entries))
        .route("/api/v1/ledger-entries/:entry_id", get(get_ledger_entry))
        .route("/api/v1/ledger-entries/:entry_id", put(update_ledger_entry))
        .route("/api/v1/ledger-entries/:entry_id", delete(delete_ledger_entry))
        // Category routes
        .route("/api/v1/categories", post(create_category))
        .route("/api/v1/categories", get(get_categories))
        .route("/api/v1/categories/:category_id", put(update_category))
        .route("/api/v1/categories/:category_id", delete(delete_category))
        // Reconciliation and reporting
        .route("/api/v1/summary", get(get_summary))
        .route("/api/v1/reports/monthly", get(get_monthly_report))
        .route("/api/v1/profit-goals", put(set_profit_goal))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
