use std::collections::HashMap;

use async_trait::async_trait;
use common::{CategoryExpense, DateRange, MonthlyPoint, UNCATEGORIZED_COLOR, UNCATEGORIZED_NAME};
use model::entities::{category, ledger_entry};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::trace;

use super::{filter_range, month_floor, ExpenseSource, RevenueSource};
use crate::error::Result;

/// Manual-ledger revenue: cash basis, filtered on entry date,
/// restricted to origin `manual`. Entries derived from contracts
/// (origin `contract`) are excluded here: the cash they mirror is
/// already recognized through the contract's accrual figure.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManualRevenueSource;

async fn fetch_revenue(
    db: &DatabaseConnection,
    owner_id: i32,
    range: &DateRange,
) -> Result<Vec<ledger_entry::Model>> {
    let query = ledger_entry::Entity::find()
        .filter(ledger_entry::Column::OwnerId.eq(owner_id))
        .filter(ledger_entry::Column::Kind.eq(ledger_entry::EntryKind::Revenue))
        .filter(ledger_entry::Column::Origin.eq(ledger_entry::EntryOrigin::Manual));
    let entries = filter_range(query, ledger_entry::Column::EntryDate, range)
        .all(db)
        .await?;
    trace!(owner_id, count = entries.len(), "fetched manual revenue entries");
    Ok(entries)
}

#[async_trait]
impl RevenueSource for ManualRevenueSource {
    fn name(&self) -> &'static str {
        "manual_revenue"
    }

    async fn paid_in_range(
        &self,
        db: &DatabaseConnection,
        owner_id: i32,
        range: &DateRange,
    ) -> Result<Decimal> {
        let entries = fetch_revenue(db, owner_id, range).await?;
        Ok(entries
            .iter()
            .filter(|e| e.status == ledger_entry::EntryStatus::Paid)
            .map(|e| e.amount)
            .sum())
    }

    async fn pending_in_range(
        &self,
        db: &DatabaseConnection,
        owner_id: i32,
        range: &DateRange,
    ) -> Result<Decimal> {
        let entries = fetch_revenue(db, owner_id, range).await?;
        Ok(entries
            .iter()
            .filter(|e| e.status == ledger_entry::EntryStatus::Pending)
            .map(|e| e.amount)
            .sum())
    }

    async fn monthly_rows(
        &self,
        db: &DatabaseConnection,
        owner_id: i32,
        range: &DateRange,
    ) -> Result<Vec<MonthlyPoint>> {
        let entries = fetch_revenue(db, owner_id, range).await?;
        let mut rows = Vec::with_capacity(entries.len());
        for entry in &entries {
            let mut row = MonthlyPoint::zero(month_floor(entry.entry_date));
            match entry.status {
                ledger_entry::EntryStatus::Paid => row.paid_revenue = entry.amount,
                ledger_entry::EntryStatus::Pending => row.pending_revenue = entry.amount,
                ledger_entry::EntryStatus::Cancelled => continue,
            }
            rows.push(row);
        }
        Ok(rows)
    }
}

/// Expense entries of any origin: cash basis, filtered on entry date.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpenseEntrySource;

async fn fetch_expenses(
    db: &DatabaseConnection,
    owner_id: i32,
    range: &DateRange,
) -> Result<Vec<ledger_entry::Model>> {
    let query = ledger_entry::Entity::find()
        .filter(ledger_entry::Column::OwnerId.eq(owner_id))
        .filter(ledger_entry::Column::Kind.eq(ledger_entry::EntryKind::Expense));
    let entries = filter_range(query, ledger_entry::Column::EntryDate, range)
        .all(db)
        .await?;
    trace!(owner_id, count = entries.len(), "fetched expense entries");
    Ok(entries)
}

#[async_trait]
impl ExpenseSource for ExpenseEntrySource {
    fn name(&self) -> &'static str {
        "expense_entries"
    }

    async fn paid_in_range(
        &self,
        db: &DatabaseConnection,
        owner_id: i32,
        range: &DateRange,
    ) -> Result<Decimal> {
        let entries = fetch_expenses(db, owner_id, range).await?;
        Ok(entries
            .iter()
            .filter(|e| e.status == ledger_entry::EntryStatus::Paid)
            .map(|e| e.amount)
            .sum())
    }

    async fn pending_in_range(
        &self,
        db: &DatabaseConnection,
        owner_id: i32,
        range: &DateRange,
    ) -> Result<Decimal> {
        let entries = fetch_expenses(db, owner_id, range).await?;
        Ok(entries
            .iter()
            .filter(|e| e.status == ledger_entry::EntryStatus::Pending)
            .map(|e| e.amount)
            .sum())
    }

    async fn monthly_rows(
        &self,
        db: &DatabaseConnection,
        owner_id: i32,
        range: &DateRange,
    ) -> Result<Vec<MonthlyPoint>> {
        let entries = fetch_expenses(db, owner_id, range).await?;
        let mut rows = Vec::with_capacity(entries.len());
        for entry in &entries {
            let mut row = MonthlyPoint::zero(month_floor(entry.entry_date));
            match entry.status {
                ledger_entry::EntryStatus::Paid => row.paid_expense = entry.amount,
                ledger_entry::EntryStatus::Pending => row.pending_expense = entry.amount,
                ledger_entry::EntryStatus::Cancelled => continue,
            }
            rows.push(row);
        }
        Ok(rows)
    }
}

impl ExpenseEntrySource {
    /// Paid expenses grouped by category, largest first. Entries
    /// without a category land in the gray "Uncategorized" bucket.
    pub async fn breakdown_by_category(
        &self,
        db: &DatabaseConnection,
        owner_id: i32,
        range: &DateRange,
    ) -> Result<Vec<CategoryExpense>> {
        let entries = fetch_expenses(db, owner_id, range).await?;
        let categories: HashMap<i32, category::Model> = category::Entity::find()
            .filter(category::Column::OwnerId.eq(owner_id))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let mut totals: HashMap<Option<i32>, Decimal> = HashMap::new();
        for entry in entries
            .iter()
            .filter(|e| e.status == ledger_entry::EntryStatus::Paid)
        {
            // An id pointing at a foreign or deleted category falls back
            // to the uncategorized bucket.
            let key = entry.category_id.filter(|id| categories.contains_key(id));
            *totals.entry(key).or_insert(Decimal::ZERO) += entry.amount;
        }

        let mut breakdown: Vec<CategoryExpense> = totals
            .into_iter()
            .map(|(key, total)| match key.and_then(|id| categories.get(&id)) {
                Some(cat) => CategoryExpense {
                    category_id: Some(cat.id),
                    name: cat.name.clone(),
                    color: cat.color.clone(),
                    total,
                },
                None => CategoryExpense {
                    category_id: None,
                    name: UNCATEGORIZED_NAME.to_string(),
                    color: UNCATEGORIZED_COLOR.to_string(),
                    total,
                },
            })
            .collect();
        breakdown.sort_by(|a, b| b.total.cmp(&a.total));
        Ok(breakdown)
    }
}
