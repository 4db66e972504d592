//! One adapter per record family, all exposing the same three
//! operations: paid-in-range, pending-in-range and month-bucketed
//! rows. The reconciliation engine and the monthly aggregator consume
//! these traits instead of the storage layer, so each family's
//! recognition policy lives in exactly one place:
//!
//! - service orders: cash, keyed on execution date;
//! - contracts: accrual, full total value once per active/completed
//!   contract, keyed on start date; the family's pending figure is the
//!   outstanding sum of its installments;
//! - independent installments: cash, keyed on due date;
//! - manual ledger entries: cash, keyed on entry date, revenue
//!   restricted to origin `manual`, expenses of any origin.
//!
//! Installments that belong to a contract never contribute to a paid
//! revenue figure: their cash is already recognized through the
//! contract's accrual value.

pub mod contracts;
pub mod installments;
pub mod ledger;
pub mod orders;

pub use contracts::ContractSource;
pub use installments::IndependentInstallmentSource;
pub use ledger::{ExpenseEntrySource, ManualRevenueSource};
pub use orders::ServiceOrderSource;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use common::{DateRange, MonthlyPoint};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Select};

use crate::error::Result;

/// A revenue-side record family.
#[async_trait]
pub trait RevenueSource: Send + Sync {
    /// Family name, used in logs.
    fn name(&self) -> &'static str;

    /// Revenue recognized for the owner within the range, under the
    /// family's own recognition basis (cash or accrual).
    async fn paid_in_range(
        &self,
        db: &DatabaseConnection,
        owner_id: i32,
        range: &DateRange,
    ) -> Result<Decimal>;

    /// Outstanding revenue within the range.
    async fn pending_in_range(
        &self,
        db: &DatabaseConnection,
        owner_id: i32,
        range: &DateRange,
    ) -> Result<Decimal>;

    /// Month-tagged rows for the union feeding the monthly series.
    /// Non-applicable figures are zero-filled.
    async fn monthly_rows(
        &self,
        db: &DatabaseConnection,
        owner_id: i32,
        range: &DateRange,
    ) -> Result<Vec<MonthlyPoint>>;
}

/// An expense-side record family.
#[async_trait]
pub trait ExpenseSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn paid_in_range(
        &self,
        db: &DatabaseConnection,
        owner_id: i32,
        range: &DateRange,
    ) -> Result<Decimal>;

    async fn pending_in_range(
        &self,
        db: &DatabaseConnection,
        owner_id: i32,
        range: &DateRange,
    ) -> Result<Decimal>;

    async fn monthly_rows(
        &self,
        db: &DatabaseConnection,
        owner_id: i32,
        range: &DateRange,
    ) -> Result<Vec<MonthlyPoint>>;
}

/// First day of the month the date falls in; every source tags its
/// rows with this before the union.
pub(crate) fn month_floor(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap()
}

/// Applies the source-specific date column to an optional range.
pub(crate) fn filter_range<E: EntityTrait, C: ColumnTrait>(
    mut query: Select<E>,
    column: C,
    range: &DateRange,
) -> Select<E> {
    if let Some(start) = range.start {
        query = query.filter(column.gte(start));
    }
    if let Some(end) = range.end {
        query = query.filter(column.lte(end));
    }
    query
}
