use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::CategoryExpense;

/// One calendar-month bucket of the trend series. Each of the four
/// figures is the sum of the matching rows from every source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyPoint {
    /// First day of the bucket's month.
    pub month: NaiveDate,
    pub paid_revenue: Decimal,
    pub pending_revenue: Decimal,
    pub paid_expense: Decimal,
    pub pending_expense: Decimal,
}

impl MonthlyPoint {
    pub fn zero(month: NaiveDate) -> Self {
        Self {
            month,
            paid_revenue: Decimal::ZERO,
            pending_revenue: Decimal::ZERO,
            paid_expense: Decimal::ZERO,
            pending_expense: Decimal::ZERO,
        }
    }
}

/// Calendar-month bucketed series, ordered by month ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlySeries {
    pub points: Vec<MonthlyPoint>,
}

impl MonthlySeries {
    pub fn new(points: Vec<MonthlyPoint>) -> Self {
        Self { points }
    }
}

/// Operational figures for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthStats {
    pub order_count: i64,
    pub completed_order_count: i64,
    /// Sum of order values executed in the month.
    pub billed_value: Decimal,
    /// Cash actually received in the month: settled orders + paid
    /// installments + paid manual revenue.
    pub collected_value: Decimal,
    pub distinct_clients: i64,
}

/// Current month minus previous month, figure by figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyDeltas {
    pub order_count: i64,
    pub completed_order_count: i64,
    pub billed_value: Decimal,
    pub collected_value: Decimal,
    pub distinct_clients: i64,
}

impl MonthlyDeltas {
    pub fn between(current: &MonthStats, previous: &MonthStats) -> Self {
        Self {
            order_count: current.order_count - previous.order_count,
            completed_order_count: current.completed_order_count
                - previous.completed_order_count,
            billed_value: current.billed_value - previous.billed_value,
            collected_value: current.collected_value - previous.collected_value,
            distinct_clients: current.distinct_clients - previous.distinct_clients,
        }
    }
}

/// Net profit for the month measured against the owner's target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GoalComparison {
    pub target_value: Decimal,
    pub net_profit: Decimal,
    /// `net_profit - target_value`.
    pub difference: Decimal,
    pub attained: bool,
}

/// Exportable monthly report: the trend series, the month's expense
/// breakdown, operational stats vs the previous month, and the profit
/// goal comparison when a target is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub stats: MonthStats,
    pub previous_stats: MonthStats,
    pub deltas: MonthlyDeltas,
    pub series: MonthlySeries,
    pub expense_by_category: Vec<CategoryExpense>,
    pub goal: Option<GoalComparison>,
}
