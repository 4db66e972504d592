//! Transport-layer types shared between the compute crate and the API
//! surface. These structs are the response payloads of the financial
//! summary and monthly report endpoints, so handlers can serialize the
//! engine's output without duplicating shapes.

mod monthly;
mod summary;

pub use monthly::{
    GoalComparison, MonthStats, MonthlyDeltas, MonthlyPoint, MonthlyReport, MonthlySeries,
};
pub use summary::{CategoryExpense, FinancialSummary};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fallback label and color for paid expenses without a category.
pub const UNCATEGORIZED_NAME: &str = "Uncategorized";
pub const UNCATEGORIZED_COLOR: &str = "#9ca3af";

/// An optional date window. Either bound may be open; a missing bound
/// means unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// A closed range covering one calendar month.
    pub fn month(year: i32, month: u32) -> Self {
        let start = NaiveDate::from_ymd_opt(year, month, 1);
        let end = start.and_then(|d| {
            let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
            NaiveDate::from_ymd_opt(ny, nm, 1).and_then(|n| n.pred_opt()).or(Some(d))
        });
        Self { start, end }
    }

}
