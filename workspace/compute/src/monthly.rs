//! Calendar-month aggregation: the trend series behind the dashboard
//! chart and the exportable monthly report.
//!
//! The series is built by unioning month-tagged rows from every record
//! family first and grouping second, so each family buckets on its own
//! date field (execution date for orders, start date for contract
//! accrual, due date for installments, entry date for ledger entries).

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use common::{DateRange, GoalComparison, MonthStats, MonthlyDeltas, MonthlyPoint, MonthlyReport, MonthlySeries};
use model::entities::{installment, ledger_entry, profit_goal, service_order};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::{debug, instrument};

use crate::error::{EngineError, Result};
use crate::source::{month_floor, ExpenseEntrySource};
use crate::summary::SummaryEngine;

/// Number of trailing months shown in the report's trend series.
const SERIES_MONTHS: u32 = 6;

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

fn next_month(date: NaiveDate) -> NaiveDate {
    let (y, m) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1).unwrap_or(date)
}

/// A closed range covering `count` calendar months, ending with the
/// month containing `end`.
pub fn trailing_months(year: i32, month: u32, count: u32) -> Result<DateRange> {
    if !(1..=12).contains(&month) {
        return Err(EngineError::Validation(format!(
            "month must be 1-12, got {month}"
        )));
    }
    let end = DateRange::month(year, month).end;
    let mut y = year;
    let mut m = month;
    for _ in 1..count.max(1) {
        let (py, pm) = previous_month(y, m);
        y = py;
        m = pm;
    }
    Ok(DateRange::new(NaiveDate::from_ymd_opt(y, m, 1), end))
}

/// Builds the month-bucketed series for the range. When both bounds are
/// set, months without activity are emitted as zero points so the
/// series has no gaps; open ranges only contain months with data.
#[instrument(skip(db))]
pub async fn monthly_series(
    db: &DatabaseConnection,
    owner_id: i32,
    range: &DateRange,
) -> Result<MonthlySeries> {
    let rows = SummaryEngine::new().monthly_rows(db, owner_id, range).await?;
    debug!(rows = rows.len(), "unioned monthly rows");

    let mut buckets: BTreeMap<NaiveDate, MonthlyPoint> = BTreeMap::new();
    if let (Some(start), Some(end)) = (range.start, range.end) {
        let mut cursor = month_floor(start);
        let last = month_floor(end);
        while cursor <= last {
            buckets.insert(cursor, MonthlyPoint::zero(cursor));
            cursor = next_month(cursor);
        }
    }

    for row in rows {
        let bucket = buckets
            .entry(row.month)
            .or_insert_with(|| MonthlyPoint::zero(row.month));
        bucket.paid_revenue += row.paid_revenue;
        bucket.pending_revenue += row.pending_revenue;
        bucket.paid_expense += row.paid_expense;
        bucket.pending_expense += row.pending_expense;
    }

    Ok(MonthlySeries::new(buckets.into_values().collect()))
}

/// Operational figures for one calendar month: order volume keyed on
/// execution date, plus the cash actually collected in the month from
/// any family.
#[instrument(skip(db))]
pub async fn month_stats(
    db: &DatabaseConnection,
    owner_id: i32,
    year: i32,
    month: u32,
) -> Result<MonthStats> {
    let range = DateRange::month(year, month);
    let (Some(start), Some(end)) = (range.start, range.end) else {
        return Err(EngineError::Validation(format!(
            "invalid month {year}-{month:02}"
        )));
    };

    let orders = service_order::Entity::find()
        .filter(service_order::Column::OwnerId.eq(owner_id))
        .filter(service_order::Column::ExecutionDate.between(start, end))
        .all(db)
        .await?;

    let order_count = orders.len() as i64;
    let completed_order_count = orders
        .iter()
        .filter(|o| o.status == service_order::OrderStatus::Completed)
        .count() as i64;
    let billed_value = orders.iter().map(|o| o.value).sum::<Decimal>();
    let distinct_clients = {
        let mut ids: Vec<i32> = orders.iter().filter_map(|o| o.client_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len() as i64
    };

    let mut collected_value = orders
        .iter()
        .filter(|o| o.settled)
        .map(|o| o.collected_value())
        .sum::<Decimal>();

    // Installment cash is keyed on when it was actually paid, not on
    // the schedule. Contract installments count here: this is the
    // collection view, not revenue recognition.
    let paid_installments = installment::Entity::find()
        .filter(installment::Column::OwnerId.eq(owner_id))
        .filter(installment::Column::Status.eq(installment::InstallmentStatus::Paid))
        .filter(installment::Column::PaymentDate.between(start, end))
        .all(db)
        .await?;
    collected_value += paid_installments
        .iter()
        .map(|i| i.collected_amount())
        .sum::<Decimal>();

    let manual_revenue = ledger_entry::Entity::find()
        .filter(ledger_entry::Column::OwnerId.eq(owner_id))
        .filter(ledger_entry::Column::Kind.eq(ledger_entry::EntryKind::Revenue))
        .filter(ledger_entry::Column::Origin.eq(ledger_entry::EntryOrigin::Manual))
        .filter(ledger_entry::Column::Status.eq(ledger_entry::EntryStatus::Paid))
        .filter(ledger_entry::Column::EntryDate.between(start, end))
        .all(db)
        .await?;
    collected_value += manual_revenue.iter().map(|e| e.amount).sum::<Decimal>();

    Ok(MonthStats {
        order_count,
        completed_order_count,
        billed_value,
        collected_value,
        distinct_clients,
    })
}

/// Assembles the exportable report for one month: stats with deltas
/// against the previous month, a six-month trend series ending at the
/// report month, the month's paid-expense breakdown, and the profit
/// goal comparison when a target exists.
#[instrument(skip(db))]
pub async fn monthly_report(
    db: &DatabaseConnection,
    owner_id: i32,
    year: i32,
    month: u32,
) -> Result<MonthlyReport> {
    let stats = month_stats(db, owner_id, year, month).await?;
    let (prev_year, prev_month) = previous_month(year, month);
    let previous_stats = month_stats(db, owner_id, prev_year, prev_month).await?;
    let deltas = MonthlyDeltas::between(&stats, &previous_stats);

    let series_range = trailing_months(year, month, SERIES_MONTHS)?;
    let series = monthly_series(db, owner_id, &series_range).await?;

    let month_range = DateRange::month(year, month);
    let expense_by_category = ExpenseEntrySource
        .breakdown_by_category(db, owner_id, &month_range)
        .await?;

    let goal = profit_goal::Entity::find()
        .filter(profit_goal::Column::OwnerId.eq(owner_id))
        .filter(profit_goal::Column::Year.eq(year))
        .filter(profit_goal::Column::Month.eq(month as i32))
        .one(db)
        .await?;
    let goal = match goal {
        Some(g) => {
            let summary = SummaryEngine::new()
                .summary(db, owner_id, &month_range)
                .await?;
            Some(GoalComparison {
                target_value: g.target_value,
                net_profit: summary.net_profit,
                difference: summary.net_profit - g.target_value,
                attained: summary.net_profit >= g.target_value,
            })
        }
        None => None,
    };

    Ok(MonthlyReport {
        year,
        month,
        stats,
        previous_stats,
        deltas,
        series,
        expense_by_category,
        goal,
    })
}
