use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Point-in-time financial summary over an optional date range,
/// reconciled across service orders, contracts, installments and
/// manual ledger entries.
///
/// Contract revenue is accrual (full total value once per contract);
/// everything else is cash. Installments under a contract never add to
/// `total_revenue` on top of the contract's accrual figure; their
/// outstanding sum appears only inside `receivable` and as the
/// informational `contract_installments_pending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FinancialSummary {
    /// Settled orders + contract accrual + paid independent
    /// installments + paid manual revenue.
    pub total_revenue: Decimal,
    /// Paid expense entries of any origin.
    pub total_expense: Decimal,
    /// `total_revenue - total_expense`.
    pub net_profit: Decimal,
    /// Unsettled orders + pending contract installments + pending
    /// manual revenue.
    pub receivable: Decimal,
    /// Pending expense entries.
    pub payable: Decimal,
    /// Outstanding installments under contracts, for cash-collection
    /// visibility. Already part of `receivable`.
    pub contract_installments_pending: Decimal,
    /// Paid expenses grouped by category.
    pub expense_by_category: Vec<CategoryExpense>,
}

/// One bucket of the paid-expense breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryExpense {
    /// None for the "Uncategorized" bucket.
    pub category_id: Option<i32>,
    pub name: String,
    pub color: String,
    pub total: Decimal,
}
