use async_trait::async_trait;
use common::{DateRange, MonthlyPoint};
use model::entities::service_order;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::trace;

use super::{filter_range, month_floor, RevenueSource};
use crate::error::Result;

/// Service orders: cash basis, filtered on execution date. A settled
/// order counts its paid amount (falling back to the nominal value);
/// an unsettled, non-cancelled order is outstanding at its nominal
/// value.
#[derive(Debug, Default, Clone, Copy)]
pub struct ServiceOrderSource;

async fn fetch(
    db: &DatabaseConnection,
    owner_id: i32,
    range: &DateRange,
) -> Result<Vec<service_order::Model>> {
    let query = service_order::Entity::find()
        .filter(service_order::Column::OwnerId.eq(owner_id));
    let orders = filter_range(query, service_order::Column::ExecutionDate, range)
        .all(db)
        .await?;
    trace!(owner_id, count = orders.len(), "fetched service orders");
    Ok(orders)
}

fn is_outstanding(order: &service_order::Model) -> bool {
    !order.settled && order.status != service_order::OrderStatus::Cancelled
}

#[async_trait]
impl RevenueSource for ServiceOrderSource {
    fn name(&self) -> &'static str {
        "service_orders"
    }

    async fn paid_in_range(
        &self,
        db: &DatabaseConnection,
        owner_id: i32,
        range: &DateRange,
    ) -> Result<Decimal> {
        let orders = fetch(db, owner_id, range).await?;
        Ok(orders
            .iter()
            .filter(|o| o.settled)
            .map(|o| o.collected_value())
            .sum())
    }

    async fn pending_in_range(
        &self,
        db: &DatabaseConnection,
        owner_id: i32,
        range: &DateRange,
    ) -> Result<Decimal> {
        let orders = fetch(db, owner_id, range).await?;
        Ok(orders
            .iter()
            .filter(|o| is_outstanding(o))
            .map(|o| o.value)
            .sum())
    }

    async fn monthly_rows(
        &self,
        db: &DatabaseConnection,
        owner_id: i32,
        range: &DateRange,
    ) -> Result<Vec<MonthlyPoint>> {
        let orders = fetch(db, owner_id, range).await?;
        let mut rows = Vec::with_capacity(orders.len());
        for order in &orders {
            let mut row = MonthlyPoint::zero(month_floor(order.execution_date));
            if order.settled {
                row.paid_revenue = order.collected_value();
            } else if is_outstanding(order) {
                row.pending_revenue = order.value;
            } else {
                continue; // cancelled and never settled
            }
            rows.push(row);
        }
        Ok(rows)
    }
}
