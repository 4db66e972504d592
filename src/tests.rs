#[cfg(test)]
mod integration_tests {
    use crate::test_utils::test_utils::setup_test_app;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use std::str::FromStr;

    // Owner ids seeded by setup_test_app_state.
    const OWNER: i32 = 1;
    const OTHER_OWNER: i32 = 2;

    fn dec(value: &Value) -> Decimal {
        Decimal::from_str(value.as_str().expect("expected decimal string")).unwrap()
    }

    async fn server() -> TestServer {
        TestServer::new(setup_test_app().await).unwrap()
    }

    async fn create_order(server: &TestServer, value: &str, date: &str, owner: i32) -> i64 {
        let response = server
            .post("/api/v1/service-orders")
            .json(&json!({
                "owner_id": owner,
                "description": "Field service",
                "value": value,
                "execution_date": date,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["data"]["id"].as_i64().unwrap()
    }

    async fn create_client(server: &TestServer, owner: i32) -> i64 {
        let response = server
            .post("/api/v1/clients")
            .json(&json!({ "owner_id": owner, "name": "Acme Ltda" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["data"]["id"].as_i64().unwrap()
    }

    /// Creates a 1200/12x100 contract starting 2024-01-15 with due day
    /// 10 and returns (contract_id, installment ids in sequence order).
    async fn create_standard_contract(server: &TestServer, owner: i32) -> (i64, Vec<i64>) {
        let response = server
            .post("/api/v1/contracts")
            .json(&json!({
                "owner_id": owner,
                "client_id": create_client(server, owner).await,
                "description": "Annual maintenance",
                "total_value": "1200.00",
                "installment_count": 12,
                "installment_value": "100.00",
                "due_day": 10,
                "start_date": "2024-01-15",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body = response.json::<Value>();
        let contract_id = body["data"]["contract"]["id"].as_i64().unwrap();
        assert_eq!(body["data"]["installments_created"], 12);

        let listing = server
            .get(&format!(
                "/api/v1/contracts/{}/installments?owner_id={}",
                contract_id, owner
            ))
            .await;
        listing.assert_status(StatusCode::OK);
        let ids = listing.json::<Value>()["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["id"].as_i64().unwrap())
            .collect();
        (contract_id, ids)
    }

    async fn pay_installment(server: &TestServer, id: i64, owner: i32, date: &str) -> Value {
        let response = server
            .put(&format!("/api/v1/installments/{}?owner_id={}", id, owner))
            .json(&json!({ "status": "paid", "payment_date": date }))
            .await;
        response.assert_status(StatusCode::OK);
        response.json::<Value>()
    }

    async fn summary(server: &TestServer, owner: i32) -> Value {
        let response = server
            .get(&format!("/api/v1/summary?owner_id={}", owner))
            .await;
        response.assert_status(StatusCode::OK);
        response.json::<Value>()["data"].clone()
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = server().await;
        let response = server.get("/health").await;
        response.assert_status(StatusCode::OK);
        assert_eq!(response.json::<Value>()["database"], "connected");
    }

    #[tokio::test]
    async fn test_client_crud() {
        let server = server().await;
        let client_id = create_client(&server, OWNER).await;

        let response = server
            .put(&format!("/api/v1/clients/{}?owner_id={}", client_id, OWNER))
            .json(&json!({ "email": "billing@acme.test" }))
            .await;
        response.assert_status(StatusCode::OK);
        assert_eq!(
            response.json::<Value>()["data"]["email"],
            "billing@acme.test"
        );

        let response = server
            .delete(&format!("/api/v1/clients/{}?owner_id={}", client_id, OWNER))
            .await;
        response.assert_status(StatusCode::OK);

        let response = server
            .get(&format!("/api/v1/clients/{}?owner_id={}", client_id, OWNER))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["code"], "CLIENT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_settled_order_summary_scenario() {
        let server = server().await;
        let order_id = create_order(&server, "500.00", "2024-03-10", OWNER).await;

        let response = server
            .post(&format!(
                "/api/v1/service-orders/{}/settle?owner_id={}",
                order_id, OWNER
            ))
            .json(&json!({ "settlement_date": "2024-03-12" }))
            .await;
        response.assert_status(StatusCode::OK);
        assert_eq!(response.json::<Value>()["data"]["settled"], true);

        let data = summary(&server, OWNER).await;
        assert_eq!(
            dec(&data["total_revenue"]),
            Decimal::from_str("500.00").unwrap()
        );
        assert_eq!(dec(&data["receivable"]), Decimal::ZERO);
        assert_eq!(
            dec(&data["net_profit"]),
            Decimal::from_str("500.00").unwrap()
        );
    }

    #[tokio::test]
    async fn test_unsettle_reverts_revenue() {
        let server = server().await;
        let order_id = create_order(&server, "500.00", "2024-03-10", OWNER).await;
        server
            .post(&format!(
                "/api/v1/service-orders/{}/settle?owner_id={}",
                order_id, OWNER
            ))
            .json(&json!({}))
            .await
            .assert_status(StatusCode::OK);
        server
            .post(&format!(
                "/api/v1/service-orders/{}/unsettle?owner_id={}",
                order_id, OWNER
            ))
            .await
            .assert_status(StatusCode::OK);

        let data = summary(&server, OWNER).await;
        assert_eq!(dec(&data["total_revenue"]), Decimal::ZERO);
        assert_eq!(
            dec(&data["receivable"]),
            Decimal::from_str("500.00").unwrap()
        );
    }

    #[tokio::test]
    async fn test_contract_schedule_generation() {
        let server = server().await;
        let (contract_id, ids) = create_standard_contract(&server, OWNER).await;
        assert_eq!(ids.len(), 12);

        let listing = server
            .get(&format!(
                "/api/v1/contracts/{}/installments?owner_id={}",
                contract_id, OWNER
            ))
            .await;
        let installments = listing.json::<Value>()["data"].as_array().unwrap().clone();

        // Sequence numbers 1..12, first due 2024-02-10, last 2025-01-10.
        for (i, inst) in installments.iter().enumerate() {
            assert_eq!(inst["sequence_number"], (i + 1) as i64);
            assert_eq!(dec(&inst["amount"]), Decimal::from_str("100.00").unwrap());
        }
        assert_eq!(installments[0]["due_date"], "2024-02-10");
        assert_eq!(installments[11]["due_date"], "2025-01-10");
    }

    #[tokio::test]
    async fn test_due_day_clamps_in_short_months() {
        let server = server().await;
        let client_id = create_client(&server, OWNER).await;
        let response = server
            .post("/api/v1/contracts")
            .json(&json!({
                "owner_id": OWNER,
                "client_id": client_id,
                "total_value": "300.00",
                "installment_count": 3,
                "installment_value": "100.00",
                "due_day": 31,
                "start_date": "2024-01-05",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let contract_id = response.json::<Value>()["data"]["contract"]["id"]
            .as_i64()
            .unwrap();

        let listing = server
            .get(&format!(
                "/api/v1/contracts/{}/installments?owner_id={}",
                contract_id, OWNER
            ))
            .await;
        let installments = listing.json::<Value>()["data"].as_array().unwrap().clone();
        // 2024 is a leap year: due day 31 in February lands on the 29th.
        assert_eq!(installments[0]["due_date"], "2024-02-29");
        assert_eq!(installments[1]["due_date"], "2024-03-31");
        assert_eq!(installments[2]["due_date"], "2024-04-30");
    }

    #[tokio::test]
    async fn test_invalid_contract_persists_nothing() {
        let server = server().await;
        let client_id = create_client(&server, OWNER).await;
        let response = server
            .post("/api/v1/contracts")
            .json(&json!({
                "owner_id": OWNER,
                "client_id": client_id,
                "total_value": "1200.00",
                "installment_count": 0,
                "installment_value": "100.00",
                "due_day": 10,
                "start_date": "2024-01-15",
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let listing = server
            .get(&format!("/api/v1/contracts?owner_id={}", OWNER))
            .await;
        assert!(listing.json::<Value>()["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_paying_installment_creates_derived_entry() {
        let server = server().await;
        let (contract_id, ids) = create_standard_contract(&server, OWNER).await;

        let body = pay_installment(&server, ids[0], OWNER, "2024-02-10").await;
        assert_eq!(body["data"]["status"], "paid");

        let entries = server
            .get(&format!("/api/v1/ledger-entries?owner_id={}", OWNER))
            .await
            .json::<Value>()["data"]
            .as_array()
            .unwrap()
            .clone();
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry["origin"], "contract");
        assert_eq!(entry["kind"], "revenue");
        assert_eq!(entry["reference_id"].as_i64().unwrap(), contract_id);
        assert_eq!(dec(&entry["amount"]), Decimal::from_str("100.00").unwrap());
        assert_eq!(entry["entry_date"], "2024-02-10");

        // The contract stays active with unpaid siblings.
        let contract = server
            .get(&format!(
                "/api/v1/contracts/{}?owner_id={}",
                contract_id, OWNER
            ))
            .await
            .json::<Value>()["data"]
            .clone();
        assert_eq!(contract["status"], "active");
    }

    #[tokio::test]
    async fn test_paying_last_installment_completes_contract() {
        let server = server().await;
        let (contract_id, ids) = create_standard_contract(&server, OWNER).await;

        for (i, id) in ids.iter().enumerate() {
            let body = pay_installment(&server, *id, OWNER, "2024-06-01").await;
            if i == ids.len() - 1 {
                assert_eq!(body["message"], "Installment paid; contract completed");
            } else {
                assert_eq!(body["message"], "Installment paid successfully");
            }
        }

        let contract = server
            .get(&format!(
                "/api/v1/contracts/{}?owner_id={}",
                contract_id, OWNER
            ))
            .await
            .json::<Value>()["data"]
            .clone();
        assert_eq!(contract["status"], "completed");
    }

    #[tokio::test]
    async fn test_no_double_count_of_contract_revenue() {
        let server = server().await;
        let client_id = create_client(&server, OWNER).await;
        let response = server
            .post("/api/v1/contracts")
            .json(&json!({
                "owner_id": OWNER,
                "client_id": client_id,
                "total_value": "1000.00",
                "installment_count": 2,
                "installment_value": "500.00",
                "due_day": 10,
                "start_date": "2024-01-15",
            }))
            .await;
        let contract_id = response.json::<Value>()["data"]["contract"]["id"]
            .as_i64()
            .unwrap();
        let ids: Vec<i64> = server
            .get(&format!(
                "/api/v1/contracts/{}/installments?owner_id={}",
                contract_id, OWNER
            ))
            .await
            .json::<Value>()["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["id"].as_i64().unwrap())
            .collect();

        for id in &ids {
            pay_installment(&server, *id, OWNER, "2024-03-01").await;
        }

        // Both installments collected and both derived entries written,
        // yet the contract's value appears exactly once.
        let data = summary(&server, OWNER).await;
        assert_eq!(
            dec(&data["total_revenue"]),
            Decimal::from_str("1000.00").unwrap()
        );
        assert_eq!(dec(&data["contract_installments_pending"]), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_paying_paid_installment_is_conflict() {
        let server = server().await;
        let (_, ids) = create_standard_contract(&server, OWNER).await;
        pay_installment(&server, ids[0], OWNER, "2024-02-10").await;

        let response = server
            .put(&format!(
                "/api/v1/installments/{}?owner_id={}",
                ids[0], OWNER
            ))
            .json(&json!({ "status": "paid", "payment_date": "2024-02-11" }))
            .await;
        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(response.json::<Value>()["code"], "INVALID_STATE");

        // Still exactly one derived entry.
        let entries = server
            .get(&format!("/api/v1/ledger-entries?owner_id={}", OWNER))
            .await
            .json::<Value>()["data"]
            .as_array()
            .unwrap()
            .len();
        assert_eq!(entries, 1);
    }

    #[tokio::test]
    async fn test_paying_cancelled_installment_is_conflict() {
        let server = server().await;
        let (_, ids) = create_standard_contract(&server, OWNER).await;

        server
            .put(&format!(
                "/api/v1/installments/{}?owner_id={}",
                ids[0], OWNER
            ))
            .json(&json!({ "status": "cancelled" }))
            .await
            .assert_status(StatusCode::OK);

        let response = server
            .put(&format!(
                "/api/v1/installments/{}?owner_id={}",
                ids[0], OWNER
            ))
            .json(&json!({ "status": "paid", "payment_date": "2024-02-10" }))
            .await;
        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_payment_requires_payment_date() {
        let server = server().await;
        let (_, ids) = create_standard_contract(&server, OWNER).await;

        let response = server
            .put(&format!(
                "/api/v1/installments/{}?owner_id={}",
                ids[0], OWNER
            ))
            .json(&json!({ "status": "paid" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_payment_rejects_non_positive_amount() {
        let server = server().await;
        let (_, ids) = create_standard_contract(&server, OWNER).await;

        let response = server
            .put(&format!(
                "/api/v1/installments/{}?owner_id={}",
                ids[0], OWNER
            ))
            .json(&json!({
                "status": "paid",
                "payment_date": "2024-02-10",
                "paid_amount": "-100.00",
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["code"], "VALIDATION_ERROR");

        // The rejected payment left no trace in the ledger or summary.
        let data = summary(&server, OWNER).await;
        assert_eq!(dec(&data["total_revenue"]), Decimal::from_str("1200.00").unwrap());
        let entries = server
            .get(&format!("/api/v1/ledger-entries?owner_id={}", OWNER))
            .await;
        assert!(entries.json::<Value>()["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_settlement_rejects_non_positive_amount() {
        let server = server().await;
        let order_id = create_order(&server, "500.00", "2024-03-10", OWNER).await;

        let response = server
            .post(&format!(
                "/api/v1/service-orders/{}/settle?owner_id={}",
                order_id, OWNER
            ))
            .json(&json!({ "paid_amount": "0.00" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["code"], "VALIDATION_ERROR");

        let data = summary(&server, OWNER).await;
        assert_eq!(dec(&data["total_revenue"]), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_overdue_is_not_settable() {
        let server = server().await;
        let (_, ids) = create_standard_contract(&server, OWNER).await;

        let response = server
            .put(&format!(
                "/api/v1/installments/{}?owner_id={}",
                ids[0], OWNER
            ))
            .json(&json!({ "status": "overdue" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_paid_installment_cannot_be_deleted() {
        let server = server().await;
        let (_, ids) = create_standard_contract(&server, OWNER).await;
        pay_installment(&server, ids[0], OWNER, "2024-02-10").await;

        let response = server
            .delete(&format!(
                "/api/v1/installments/{}?owner_id={}",
                ids[0], OWNER
            ))
            .await;
        response.assert_status(StatusCode::CONFLICT);

        // A pending sibling deletes fine.
        let response = server
            .delete(&format!(
                "/api/v1/installments/{}?owner_id={}",
                ids[1], OWNER
            ))
            .await;
        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_derived_entry_is_read_only() {
        let server = server().await;
        let (_, ids) = create_standard_contract(&server, OWNER).await;
        pay_installment(&server, ids[0], OWNER, "2024-02-10").await;

        let entry_id = server
            .get(&format!("/api/v1/ledger-entries?owner_id={}", OWNER))
            .await
            .json::<Value>()["data"][0]["id"]
            .as_i64()
            .unwrap();

        let response = server
            .put(&format!(
                "/api/v1/ledger-entries/{}?owner_id={}",
                entry_id, OWNER
            ))
            .json(&json!({ "description": "tampered" }))
            .await;
        response.assert_status(StatusCode::CONFLICT);

        let response = server
            .delete(&format!(
                "/api/v1/ledger-entries/{}?owner_id={}",
                entry_id, OWNER
            ))
            .await;
        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_manual_ledger_entry_crud() {
        let server = server().await;
        let response = server
            .post("/api/v1/ledger-entries")
            .json(&json!({
                "owner_id": OWNER,
                "kind": "expense",
                "description": "Fuel",
                "amount": "80.00",
                "entry_date": "2024-03-05",
                "status": "paid",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let entry_id = response.json::<Value>()["data"]["id"].as_i64().unwrap();
        assert_eq!(response.json::<Value>()["data"]["origin"], "manual");

        let data = summary(&server, OWNER).await;
        assert_eq!(
            dec(&data["total_expense"]),
            Decimal::from_str("80.00").unwrap()
        );

        let response = server
            .put(&format!(
                "/api/v1/ledger-entries/{}?owner_id={}",
                entry_id, OWNER
            ))
            .json(&json!({ "amount": "90.00" }))
            .await;
        response.assert_status(StatusCode::OK);

        let response = server
            .delete(&format!(
                "/api/v1/ledger-entries/{}?owner_id={}",
                entry_id, OWNER
            ))
            .await;
        response.assert_status(StatusCode::OK);
        let data = summary(&server, OWNER).await;
        assert_eq!(dec(&data["total_expense"]), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_ledger_entry_update_clears_fields_with_null() {
        let server = server().await;
        let response = server
            .post("/api/v1/ledger-entries")
            .json(&json!({
                "owner_id": OWNER,
                "kind": "expense",
                "description": "Fuel",
                "amount": "80.00",
                "entry_date": "2024-03-05",
                "status": "paid",
                "payment_date": "2024-03-05",
                "payment_method": "card",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let entry_id = response.json::<Value>()["data"]["id"].as_i64().unwrap();

        // Omitted fields are untouched, explicit nulls clear.
        let response = server
            .put(&format!(
                "/api/v1/ledger-entries/{}?owner_id={}",
                entry_id, OWNER
            ))
            .json(&json!({ "status": "pending", "payment_method": null }))
            .await;
        response.assert_status(StatusCode::OK);
        let data = response.json::<Value>()["data"].clone();
        assert_eq!(data["payment_method"], Value::Null);
        assert_eq!(data["payment_date"], "2024-03-05");

        let response = server
            .put(&format!(
                "/api/v1/ledger-entries/{}?owner_id={}",
                entry_id, OWNER
            ))
            .json(&json!({ "payment_date": null }))
            .await;
        response.assert_status(StatusCode::OK);
        assert_eq!(
            response.json::<Value>()["data"]["payment_date"],
            Value::Null
        );
    }

    #[tokio::test]
    async fn test_categories_seeded_on_first_list() {
        let server = server().await;
        let response = server
            .get(&format!("/api/v1/categories?owner_id={}", OWNER))
            .await;
        response.assert_status(StatusCode::OK);
        let categories = response.json::<Value>()["data"].as_array().unwrap().clone();
        assert_eq!(categories.len(), 7);

        // Second list does not re-seed.
        let response = server
            .get(&format!("/api/v1/categories?owner_id={}", OWNER))
            .await;
        assert_eq!(response.json::<Value>()["data"].as_array().unwrap().len(), 7);

        // The other owner gets an independent set.
        let response = server
            .get(&format!("/api/v1/categories?owner_id={}", OTHER_OWNER))
            .await;
        assert_eq!(response.json::<Value>()["data"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_owner_isolation() {
        let server = server().await;
        let order_id = create_order(&server, "999.00", "2024-03-10", OWNER).await;
        server
            .post(&format!(
                "/api/v1/service-orders/{}/settle?owner_id={}",
                order_id, OWNER
            ))
            .json(&json!({}))
            .await
            .assert_status(StatusCode::OK);

        // The other owner cannot see or touch the order.
        let response = server
            .get(&format!(
                "/api/v1/service-orders/{}?owner_id={}",
                order_id, OTHER_OWNER
            ))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        let response = server
            .delete(&format!(
                "/api/v1/service-orders/{}?owner_id={}",
                order_id, OTHER_OWNER
            ))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        let data = summary(&server, OTHER_OWNER).await;
        assert_eq!(dec(&data["total_revenue"]), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_monthly_report_endpoint() {
        let server = server().await;
        let order_id = create_order(&server, "400.00", "2024-03-08", OWNER).await;
        server
            .post(&format!(
                "/api/v1/service-orders/{}/settle?owner_id={}",
                order_id, OWNER
            ))
            .json(&json!({}))
            .await
            .assert_status(StatusCode::OK);
        // Previous month: one order, unsettled.
        create_order(&server, "150.00", "2024-02-20", OWNER).await;

        let response = server
            .get(&format!(
                "/api/v1/reports/monthly?owner_id={}&year=2024&month=3",
                OWNER
            ))
            .await;
        response.assert_status(StatusCode::OK);
        let report = response.json::<Value>()["data"].clone();
        assert_eq!(report["stats"]["order_count"], 1);
        assert_eq!(report["previous_stats"]["order_count"], 1);
        assert_eq!(
            dec(&report["deltas"]["billed_value"]),
            Decimal::from_str("250.00").unwrap()
        );
        assert_eq!(report["series"]["points"].as_array().unwrap().len(), 6);
        assert!(report["goal"].is_null());
    }

    #[tokio::test]
    async fn test_monthly_report_rejects_bad_month() {
        let server = server().await;
        let response = server
            .get(&format!(
                "/api/v1/reports/monthly?owner_id={}&year=2024&month=13",
                OWNER
            ))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_profit_goal_upsert_and_comparison() {
        let server = server().await;
        let order_id = create_order(&server, "800.00", "2024-03-08", OWNER).await;
        server
            .post(&format!(
                "/api/v1/service-orders/{}/settle?owner_id={}",
                order_id, OWNER
            ))
            .json(&json!({}))
            .await
            .assert_status(StatusCode::OK);

        let response = server
            .put("/api/v1/profit-goals")
            .json(&json!({
                "owner_id": OWNER,
                "year": 2024,
                "month": 3,
                "target_value": "1000.00",
            }))
            .await;
        response.assert_status(StatusCode::OK);
        let first_id = response.json::<Value>()["data"]["id"].as_i64().unwrap();

        // Second PUT updates in place.
        let response = server
            .put("/api/v1/profit-goals")
            .json(&json!({
                "owner_id": OWNER,
                "year": 2024,
                "month": 3,
                "target_value": "500.00",
            }))
            .await;
        response.assert_status(StatusCode::OK);
        assert_eq!(
            response.json::<Value>()["data"]["id"].as_i64().unwrap(),
            first_id
        );

        let report = server
            .get(&format!(
                "/api/v1/reports/monthly?owner_id={}&year=2024&month=3",
                OWNER
            ))
            .await
            .json::<Value>()["data"]
            .clone();
        let goal = &report["goal"];
        assert_eq!(
            dec(&goal["target_value"]),
            Decimal::from_str("500.00").unwrap()
        );
        assert_eq!(
            dec(&goal["net_profit"]),
            Decimal::from_str("800.00").unwrap()
        );
        assert_eq!(goal["attained"], true);
    }

    #[tokio::test]
    async fn test_independent_installment_lifecycle() {
        let server = server().await;
        let response = server
            .post("/api/v1/installments")
            .json(&json!({
                "owner_id": OWNER,
                "amount": "250.00",
                "due_date": "2024-04-15",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body = response.json::<Value>();
        let id = body["data"]["id"].as_i64().unwrap();
        assert!(body["data"]["contract_id"].is_null());

        pay_installment(&server, id, OWNER, "2024-04-15").await;

        // Independent installments are cash revenue but write no
        // derived ledger entry.
        let data = summary(&server, OWNER).await;
        assert_eq!(
            dec(&data["total_revenue"]),
            Decimal::from_str("250.00").unwrap()
        );
        let entries = server
            .get(&format!("/api/v1/ledger-entries?owner_id={}", OWNER))
            .await
            .json::<Value>()["data"]
            .as_array()
            .unwrap()
            .len();
        assert_eq!(entries, 0);
    }

    #[tokio::test]
    async fn test_manual_contract_completion_rejected() {
        let server = server().await;
        let (contract_id, _) = create_standard_contract(&server, OWNER).await;

        let response = server
            .put(&format!(
                "/api/v1/contracts/{}?owner_id={}",
                contract_id, OWNER
            ))
            .json(&json!({ "status": "completed" }))
            .await;
        response.assert_status(StatusCode::CONFLICT);

        let response = server
            .put(&format!(
                "/api/v1/contracts/{}?owner_id={}",
                contract_id, OWNER
            ))
            .json(&json!({ "status": "suspended" }))
            .await;
        response.assert_status(StatusCode::OK);
        assert_eq!(response.json::<Value>()["data"]["status"], "suspended");
    }
}
