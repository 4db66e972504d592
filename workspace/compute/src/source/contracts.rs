use async_trait::async_trait;
use common::{DateRange, MonthlyPoint};
use model::entities::{contract, installment};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::trace;

use super::{filter_range, month_floor, RevenueSource};
use crate::error::Result;

/// The contract family: accrual recognition, filtered on start date.
///
/// A contract in status active or completed recognizes its full
/// `total_value` exactly once, regardless of how many installments
/// have been collected. The family's pending figure is the
/// outstanding sum of the installments under its contracts (filtered
/// on due date), tracked for cash-collection visibility.
///
/// The installments' own paid amounts are deliberately absent from
/// every figure here: adding them next to the accrual value is the
/// double count this adapter exists to prevent.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContractSource;

async fn recognized_contracts(
    db: &DatabaseConnection,
    owner_id: i32,
    range: &DateRange,
) -> Result<Vec<contract::Model>> {
    let query = contract::Entity::find()
        .filter(contract::Column::OwnerId.eq(owner_id))
        .filter(
            contract::Column::Status.is_in([
                contract::ContractStatus::Active,
                contract::ContractStatus::Completed,
            ]),
        );
    let contracts = filter_range(query, contract::Column::StartDate, range)
        .all(db)
        .await?;
    trace!(owner_id, count = contracts.len(), "fetched recognized contracts");
    Ok(contracts)
}

async fn outstanding_installments(
    db: &DatabaseConnection,
    owner_id: i32,
    range: &DateRange,
) -> Result<Vec<installment::Model>> {
    let query = installment::Entity::find()
        .filter(installment::Column::OwnerId.eq(owner_id))
        .filter(installment::Column::ContractId.is_not_null())
        .filter(
            installment::Column::Status.is_in([
                installment::InstallmentStatus::Pending,
                installment::InstallmentStatus::Overdue,
            ]),
        );
    Ok(filter_range(query, installment::Column::DueDate, range)
        .all(db)
        .await?)
}

#[async_trait]
impl RevenueSource for ContractSource {
    fn name(&self) -> &'static str {
        "contracts"
    }

    async fn paid_in_range(
        &self,
        db: &DatabaseConnection,
        owner_id: i32,
        range: &DateRange,
    ) -> Result<Decimal> {
        let contracts = recognized_contracts(db, owner_id, range).await?;
        Ok(contracts.iter().map(|c| c.total_value).sum())
    }

    async fn pending_in_range(
        &self,
        db: &DatabaseConnection,
        owner_id: i32,
        range: &DateRange,
    ) -> Result<Decimal> {
        let installments = outstanding_installments(db, owner_id, range).await?;
        Ok(installments.iter().map(|i| i.amount).sum())
    }

    async fn monthly_rows(
        &self,
        db: &DatabaseConnection,
        owner_id: i32,
        range: &DateRange,
    ) -> Result<Vec<MonthlyPoint>> {
        let contracts = recognized_contracts(db, owner_id, range).await?;
        let installments = outstanding_installments(db, owner_id, range).await?;

        let mut rows = Vec::with_capacity(contracts.len() + installments.len());
        for contract in &contracts {
            let mut row = MonthlyPoint::zero(month_floor(contract.start_date));
            row.paid_revenue = contract.total_value;
            rows.push(row);
        }
        for installment in &installments {
            let mut row = MonthlyPoint::zero(month_floor(installment.due_date));
            row.pending_revenue = installment.amount;
            rows.push(row);
        }
        Ok(rows)
    }
}
