//! Root for all SeaORM entity modules of the back-office data model.
//! Five record families feed the financial engine: service orders,
//! contracts, installments, ledger entries and categories. Every record
//! is scoped to a single owning user.

pub mod category;
pub mod client;
pub mod contract;
pub mod installment;
pub mod ledger_entry;
pub mod profit_goal;
pub mod service_order;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::category::Entity as Category;
    pub use super::client::Entity as Client;
    pub use super::contract::Entity as Contract;
    pub use super::installment::Entity as Installment;
    pub use super::ledger_entry::Entity as LedgerEntry;
    pub use super::profit_goal::Entity as ProfitGoal;
    pub use super::service_order::Entity as ServiceOrder;
    pub use super::user::Entity as User;
}
