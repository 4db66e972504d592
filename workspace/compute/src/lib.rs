//! The financial engine: installment schedule generation, the
//! installment payment state machine, the four-source reconciliation
//! of the financial summary, and the calendar-month aggregator.
//!
//! Handlers consume this crate through [`schedule`], [`payment`],
//! [`summary::SummaryEngine`] and [`monthly`]; the per-record-family
//! adapters in [`source`] are the only place that knows how each
//! family maps onto revenue and expense figures, so the no-double-count
//! rule for contract installments is enforced once, centrally.

pub mod error;
pub mod monthly;
pub mod payment;
pub mod schedule;
pub mod source;
pub mod summary;

#[cfg(test)]
pub(crate) mod testing;
