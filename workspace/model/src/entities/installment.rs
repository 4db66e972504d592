use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{contract, user};

/// Stored payment status of an installment.
///
/// `Overdue` is a derived state: an installment whose stored status is
/// `Pending` with a due date in the past is overdue regardless of what
/// the column says. Consumers must go through
/// `Model::effective_status` instead of branching on the raw column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum InstallmentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "overdue")]
    Overdue,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// One scheduled payment obligation.
///
/// Installments generated from a contract carry `contract_id` and a
/// `sequence_number` unique within that contract; the contract
/// exclusively owns them (cascade delete). An installment without a
/// contract is "independent": billed standalone and recognized on a
/// cash basis by the reconciliation engine.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "installments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_id: i32,
    pub contract_id: Option<i32>,
    /// 1..N within the owning contract.
    pub sequence_number: i32,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub status: InstallmentStatus,
    pub payment_date: Option<NaiveDate>,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))", nullable)]
    pub paid_amount: Option<Decimal>,
    pub payment_method: Option<String>,
}

impl Model {
    /// Resolves the observed status, materializing `Overdue` for
    /// pending installments whose due date has passed.
    pub fn effective_status(&self, today: NaiveDate) -> InstallmentStatus {
        match self.status {
            InstallmentStatus::Pending if self.due_date < today => InstallmentStatus::Overdue,
            other => other,
        }
    }

    /// The amount collected for a paid installment, falling back to
    /// the scheduled amount when none was recorded.
    pub fn collected_amount(&self) -> Decimal {
        self.paid_amount.unwrap_or(self.amount)
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
        belongs_to = "contract::Entity",
        from = "Column::ContractId",
        to = "contract::Column::Id",
        on_delete = "Cascade"
    )]
    Contract,
}

impl Related<contract::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contract.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
