use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{client, user};

/// Lifecycle status of a service order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum OrderStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// An atomic, non-recurring billable unit of work.
///
/// Settlement is independent of the lifecycle status:
/// `settled` marks the order as paid, with an optional settlement date
/// and paid amount. When no paid amount is recorded the order's nominal
/// value is what was collected.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "service_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_id: i32,
    pub client_id: Option<i32>,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub value: Decimal,
    /// The date the work is (or was) executed; summaries filter on it.
    pub execution_date: NaiveDate,
    pub status: OrderStatus,
    /// Whether the order has been paid.
    #[sea_orm(default_value = "false")]
    pub settled: bool,
    pub settlement_date: Option<NaiveDate>,
    /// Amount actually collected. Defaults to `value` when unset.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))", nullable)]
    pub paid_amount: Option<Decimal>,
}

impl Model {
    /// The cash value of a settled order: the recorded paid amount, or
    /// the nominal value when none was recorded.
    pub fn collected_value(&self) -> Decimal {
        self.paid_amount.unwrap_or(self.value)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::OwnerId",
        to = "user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(
        belongs_to = "client::Entity",
        from = "Column::ClientId",
        to = "client::Column::Id",
        on_delete = "SetNull"
    )]
    Client,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
