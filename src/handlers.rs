pub mod categories;
pub mod clients;
pub mod contracts;
pub mod health;
pub mod installments;
pub mod ledger_entries;
pub mod reports;
pub mod service_orders;
pub mod summary;
