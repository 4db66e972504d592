#[cfg(test)]
mod tests {
    use crate::schemas::ApiDoc;
    use utoipa::OpenApi;

    #[test]
    fn test_openapi_schema_generation() {
        // Test that the OpenAPI schema can be generated without errors
        let openapi = ApiDoc::openapi();

        assert!(openapi.components.is_some());
        let components = openapi.components.as_ref().unwrap();

        assert!(components.schemas.contains_key("ErrorResponse"));
        assert!(components.schemas.contains_key("HealthResponse"));
        assert!(components.schemas.contains_key("FinancialSummary"));
        assert!(components.schemas.contains_key("MonthlyReport"));
        assert!(components.schemas.contains_key("CreateContractRequest"));
        assert!(components.schemas.contains_key("InstallmentResponse"));

        // Verify that the schema can be serialized to JSON without errors
        let json_result = serde_json::to_string(&openapi);
        assert!(json_result.is_ok());
    }

    #[test]
    fn test_error_response_schema_structure() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.as_ref().unwrap();
        let error_response_schema = components.schemas.get("ErrorResponse").unwrap();

        if let utoipa::openapi::RefOr::T(utoipa::openapi::schema::Schema::Object(obj)) =
            error_response_schema
        {
            let properties = &obj.properties;
            assert!(properties.contains_key("error"));
            assert!(properties.contains_key("code"));
            assert!(properties.contains_key("success"));
        } else {
            panic!("ErrorResponse should be an object schema");
        }
    }

    #[test]
    fn test_financial_summary_schema_structure() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.as_ref().unwrap();
        let summary_schema = components.schemas.get("FinancialSummary").unwrap();

        if let utoipa::openapi::RefOr::T(utoipa::openapi::schema::Schema::Object(obj)) =
            summary_schema
        {
            let properties = &obj.properties;
            assert!(properties.contains_key("total_revenue"));
            assert!(properties.contains_key("total_expense"));
            assert!(properties.contains_key("net_profit"));
            assert!(properties.contains_key("receivable"));
            assert!(properties.contains_key("payable"));
            assert!(properties.contains_key("contract_installments_pending"));
            assert!(properties.contains_key("expense_by_category"));
        } else {
            panic!("FinancialSummary should be an object schema");
        }
    }

    #[test]
    fn test_openapi_paths_cover_api_surface() {
        let openapi = ApiDoc::openapi();
        let paths = &openapi.paths.paths;

        assert!(paths.contains_key("/health"));
        assert!(paths.contains_key("/api/v1/clients"));
        assert!(paths.contains_key("/api/v1/service-orders"));
        assert!(paths.contains_key("/api/v1/service-orders/{order_id}/settle"));
        assert!(paths.contains_key("/api/v1/contracts"));
        assert!(paths.contains_key("/api/v1/contracts/{contract_id}/installments"));
        assert!(paths.contains_key("/api/v1/installments/{installment_id}"));
        assert!(paths.contains_key("/api/v1/ledger-entries"));
        assert!(paths.contains_key("/api/v1/categories"));
        assert!(paths.contains_key("/api/v1/summary"));
        assert!(paths.contains_key("/api/v1/reports/monthly"));
        assert!(paths.contains_key("/api/v1/profit-goals"));

        let health_path = paths.get("/health").unwrap();
        let health_get = health_path
            .operations
            .get(&utoipa::openapi::PathItemType::Get);
        assert!(health_get.is_some());

        let responses = &health_get.unwrap().responses;
        assert!(responses.responses.contains_key("200"));
        assert!(responses.responses.contains_key("500"));
    }

    #[test]
    fn test_all_error_responses_reference_correct_schema() {
        let openapi = ApiDoc::openapi();
        let openapi_json = serde_json::to_string(&openapi).unwrap();

        // Ensure no references to crate.schemas.ErrorResponse exist
        assert!(!openapi_json.contains("crate.schemas.ErrorResponse"));
        assert!(!openapi_json.contains("crate::schemas::ErrorResponse"));

        // Ensure proper ErrorResponse references exist
        assert!(openapi_json.contains("ErrorResponse"));
    }
}
