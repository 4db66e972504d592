use common::{DateRange, FinancialSummary};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::source::{
    ContractSource, ExpenseEntrySource, ExpenseSource, IndependentInstallmentSource,
    ManualRevenueSource, RevenueSource, ServiceOrderSource,
};

/// The reconciliation engine: combines the four record families into
/// one point-in-time summary. Read-only and idempotent; callers may
/// re-request at any time.
#[derive(Debug, Default)]
pub struct SummaryEngine {
    orders: ServiceOrderSource,
    contracts: ContractSource,
    independents: IndependentInstallmentSource,
    manual_revenue: ManualRevenueSource,
    expenses: ExpenseEntrySource,
}

impl SummaryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn revenue_sources(&self) -> [&dyn RevenueSource; 4] {
        [
            &self.orders,
            &self.contracts,
            &self.independents,
            &self.manual_revenue,
        ]
    }

    /// Computes the financial summary for the owner over an optional
    /// date range.
    ///
    /// Revenue is the sum of every revenue family's recognized figure;
    /// the contract adapter recognizes accrual totals and keeps its
    /// installments' cash out, which is what prevents a contract's
    /// money from counting twice. Receivable follows the collection
    /// view: unsettled orders, outstanding contract installments and
    /// pending manual revenue. Outstanding independent installments
    /// appear in the monthly pending figures but not in receivable.
    #[instrument(skip(self, db), fields(owner_id = owner_id))]
    pub async fn summary(
        &self,
        db: &DatabaseConnection,
        owner_id: i32,
        range: &DateRange,
    ) -> Result<FinancialSummary> {
        let mut total_revenue = Decimal::ZERO;
        for source in self.revenue_sources() {
            let paid = source.paid_in_range(db, owner_id, range).await?;
            debug!(source = source.name(), %paid, "revenue source contribution");
            total_revenue += paid;
        }

        let orders_pending = self.orders.pending_in_range(db, owner_id, range).await?;
        let contract_installments_pending =
            self.contracts.pending_in_range(db, owner_id, range).await?;
        let manual_pending = self
            .manual_revenue
            .pending_in_range(db, owner_id, range)
            .await?;
        let receivable = orders_pending + contract_installments_pending + manual_pending;

        let total_expense = self.expenses.paid_in_range(db, owner_id, range).await?;
        let payable = self.expenses.pending_in_range(db, owner_id, range).await?;
        let expense_by_category = self
            .expenses
            .breakdown_by_category(db, owner_id, range)
            .await?;

        Ok(FinancialSummary {
            total_revenue,
            total_expense,
            net_profit: total_revenue - total_expense,
            receivable,
            payable,
            contract_installments_pending,
            expense_by_category,
        })
    }

    /// The union of month-tagged rows from every source, revenue and
    /// expense alike. Rows are unioned before any grouping so each
    /// family's month bucket comes from its own date field.
    pub(crate) async fn monthly_rows(
        &self,
        db: &DatabaseConnection,
        owner_id: i32,
        range: &DateRange,
    ) -> Result<Vec<common::MonthlyPoint>> {
        let mut rows = Vec::new();
        for source in self.revenue_sources() {
            rows.extend(source.monthly_rows(db, owner_id, range).await?);
        }
        rows.extend(self.expenses.monthly_rows(db, owner_id, range).await?);
        Ok(rows)
    }
}
