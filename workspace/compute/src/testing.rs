//! Shared fixtures for engine tests: an in-memory database with
//! migrations applied plus builders for the record families the
//! engine reconciles.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use model::entities::{client, installment, ledger_entry, service_order, user};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, Set};

pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    db.execute_unprepared("PRAGMA foreign_keys = ON;")
        .await
        .expect("Failed to enable foreign keys");

    Migrator::up(&db, None).await.expect("Migrations failed.");
    db
}

pub async fn new_owner(db: &DatabaseConnection) -> user::Model {
    static OWNER_ID: AtomicU64 = AtomicU64::new(0);
    let n = OWNER_ID.fetch_add(1, Ordering::SeqCst);

    user::ActiveModel {
        username: Set(format!("owner_{}", n)),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create test owner")
}

pub async fn new_client(db: &DatabaseConnection, owner_id: i32) -> client::Model {
    static CLIENT_ID: AtomicU64 = AtomicU64::new(0);
    let n = CLIENT_ID.fetch_add(1, Ordering::SeqCst);

    client::ActiveModel {
        owner_id: Set(owner_id),
        name: Set(format!("Client {}", n)),
        email: Set(None),
        phone: Set(None),
        notes: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create test client")
}

pub async fn new_service_order(
    db: &DatabaseConnection,
    owner_id: i32,
    client_id: Option<i32>,
    value: Decimal,
    execution_date: NaiveDate,
    settled: bool,
) -> service_order::Model {
    service_order::ActiveModel {
        owner_id: Set(owner_id),
        client_id: Set(client_id),
        description: Set("Service order".to_string()),
        value: Set(value),
        execution_date: Set(execution_date),
        status: Set(if settled {
            service_order::OrderStatus::Completed
        } else {
            service_order::OrderStatus::Pending
        }),
        settled: Set(settled),
        settlement_date: Set(settled.then_some(execution_date)),
        paid_amount: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create test service order")
}

pub async fn new_independent_installment(
    db: &DatabaseConnection,
    owner_id: i32,
    amount: Decimal,
    due_date: NaiveDate,
    status: installment::InstallmentStatus,
) -> installment::Model {
    let paid = status == installment::InstallmentStatus::Paid;
    installment::ActiveModel {
        owner_id: Set(owner_id),
        contract_id: Set(None),
        sequence_number: Set(1),
        amount: Set(amount),
        due_date: Set(due_date),
        status: Set(status),
        payment_date: Set(paid.then_some(due_date)),
        paid_amount: Set(None),
        payment_method: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create test installment")
}

pub async fn new_ledger_entry(
    db: &DatabaseConnection,
    owner_id: i32,
    kind: ledger_entry::EntryKind,
    status: ledger_entry::EntryStatus,
    amount: Decimal,
    entry_date: NaiveDate,
    category_id: Option<i32>,
) -> ledger_entry::Model {
    let paid = status == ledger_entry::EntryStatus::Paid;
    ledger_entry::ActiveModel {
        owner_id: Set(owner_id),
        kind: Set(kind),
        category_id: Set(category_id),
        description: Set("Ledger entry".to_string()),
        amount: Set(amount),
        entry_date: Set(entry_date),
        status: Set(status),
        payment_date: Set(paid.then_some(entry_date)),
        payment_method: Set(None),
        origin: Set(ledger_entry::EntryOrigin::Manual),
        reference_id: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create test ledger entry")
}
