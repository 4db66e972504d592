use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::ledger_entry::EntryKind;
use super::user;

/// A named, colored classification for ledger entries, scoped to one
/// kind (revenue or expense) and one owner.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_id: i32,
    pub name: String,
    /// Hex color used by dashboards, e.g. "#ef4444".
    pub color: String,
    pub kind: EntryKind,
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
    #[sea_orm(has_many = "super::ledger_entry::Entity")]
    LedgerEntry,
}

impl Related<super::ledger_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Default categories seeded for an owner who has none yet.
pub fn default_set(owner_id: i32) -> Vec<ActiveModel> {
    let defaults = [
        ("Services", "#22c55e", EntryKind::Revenue),
        ("Contracts", "#3b82f6", EntryKind::Revenue),
        ("Other income", "#a855f7", EntryKind::Revenue),
        ("Supplies", "#f97316", EntryKind::Expense),
        ("Payroll", "#ef4444", EntryKind::Expense),
        ("Transport", "#eab308", EntryKind::Expense),
        ("Other expenses", "#9ca3af", EntryKind::Expense),
    ];

    defaults
        .into_iter()
        .map(|(name, color, kind)| ActiveModel {
            owner_id: Set(owner_id),
            name: Set(name.to_string()),
            color: Set(color.to_string()),
            kind: Set(kind),
            ..Default::default()
        })
        .collect()
}
