use async_trait::async_trait;
use common::{DateRange, MonthlyPoint};
use model::entities::installment;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::trace;

use super::{filter_range, month_floor, RevenueSource};
use crate::error::Result;

/// Installments without a parent contract, billed standalone. Plain
/// cash basis: paid ones count their collected amount, pending and
/// overdue ones are outstanding. Filtered on due date.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndependentInstallmentSource;

async fn fetch(
    db: &DatabaseConnection,
    owner_id: i32,
    range: &DateRange,
) -> Result<Vec<installment::Model>> {
    let query = installment::Entity::find()
        .filter(installment::Column::OwnerId.eq(owner_id))
        .filter(installment::Column::ContractId.is_null());
    let installments = filter_range(query, installment::Column::DueDate, range)
        .all(db)
        .await?;
    trace!(owner_id, count = installments.len(), "fetched independent installments");
    Ok(installments)
}

fn is_outstanding(i: &installment::Model) -> bool {
    matches!(
        i.status,
        installment::InstallmentStatus::Pending | installment::InstallmentStatus::Overdue
    )
}

#[async_trait]
impl RevenueSource for IndependentInstallmentSource {
    fn name(&self) -> &'static str {
        "independent_installments"
    }

    async fn paid_in_range(
        &self,
        db: &DatabaseConnection,
        owner_id: i32,
        range: &DateRange,
    ) -> Result<Decimal> {
        let installments = fetch(db, owner_id, range).await?;
        Ok(installments
            .iter()
            .filter(|i| i.status == installment::InstallmentStatus::Paid)
            .map(|i| i.collected_amount())
            .sum())
    }

    async fn pending_in_range(
        &self,
        db: &DatabaseConnection,
        owner_id: i32,
        range: &DateRange,
    ) -> Result<Decimal> {
        let installments = fetch(db, owner_id, range).await?;
        Ok(installments
            .iter()
            .filter(|i| is_outstanding(i))
            .map(|i| i.amount)
            .sum())
    }

    async fn monthly_rows(
        &self,
        db: &DatabaseConnection,
        owner_id: i32,
        range: &DateRange,
    ) -> Result<Vec<MonthlyPoint>> {
        let installments = fetch(db, owner_id, range).await?;
        let mut rows = Vec::with_capacity(installments.len());
        for i in &installments {
            let mut row = MonthlyPoint::zero(month_floor(i.due_date));
            match i.status {
                installment::InstallmentStatus::Paid => row.paid_revenue = i.collected_amount(),
                installment::InstallmentStatus::Pending
                | installment::InstallmentStatus::Overdue => row.pending_revenue = i.amount,
                installment::InstallmentStatus::Cancelled => continue,
            }
            rows.push(row);
        }
        Ok(rows)
    }
}
