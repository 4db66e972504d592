use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::user;

/// A user-settable profit target for one calendar month, compared
/// against net profit in the monthly report. Unique per
/// `(owner, year, month)`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "profit_goals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_id: i32,
    pub year: i32,
    /// 1-12.
    pub month: i32,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub target_value: Decimal,
    pub notes: Option<String>,
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
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
