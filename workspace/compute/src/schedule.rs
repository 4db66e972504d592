use chrono::{Datelike, NaiveDate};
use model::entities::{contract, installment};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait};
use tracing::{debug, instrument, warn};

use crate::error::{EngineError, Result};

/// Returns the number of days in the given month using chrono.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month_year = year + (month / 12) as i32;
    let next_month = (month % 12) + 1;

    // Last day of the current month is the day before the first of the next.
    let first_day_next_month = NaiveDate::from_ymd_opt(next_month_year, next_month, 1).unwrap();
    first_day_next_month.pred_opt().unwrap().day()
}

/// Due date of installment `sequence_number` (1..N) for a contract
/// starting at `start_date` with the given nominal due day.
///
/// Calendar-month arithmetic: installment i falls in
/// `start month + i`, rolling over year boundaries. The day is clamped
/// to the last valid day of the target month, so due day 31 applied to
/// February yields Feb 28/29, never a date in March.
pub fn installment_due_date(start_date: NaiveDate, due_day: u32, sequence_number: u32) -> NaiveDate {
    let months = start_date.year() * 12 + start_date.month0() as i32 + sequence_number as i32;
    let year = months.div_euclid(12);
    let month = months.rem_euclid(12) as u32 + 1;
    let day = due_day.min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Parameters for a new contract, validated before anything is
/// persisted.
#[derive(Debug, Clone)]
pub struct NewContract {
    pub owner_id: i32,
    pub client_id: i32,
    pub description: Option<String>,
    pub total_value: Decimal,
    pub installment_count: i32,
    pub installment_value: Decimal,
    pub due_day: i32,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl NewContract {
    fn validate(&self) -> Result<()> {
        if self.installment_count < 1 {
            return Err(EngineError::Validation(
                "installment_count must be at least 1".to_string(),
            ));
        }
        if !(1..=31).contains(&self.due_day) {
            return Err(EngineError::Validation(
                "due_day must be between 1 and 31".to_string(),
            ));
        }
        if self.total_value <= Decimal::ZERO {
            return Err(EngineError::Validation(
                "total_value must be positive".to_string(),
            ));
        }
        if self.installment_value <= Decimal::ZERO {
            return Err(EngineError::Validation(
                "installment_value must be positive".to_string(),
            ));
        }

        // Revenue recognition assumes this relation; warn when it drifts
        // by more than a rounding unit.
        let expected = self.installment_value * Decimal::from(self.installment_count);
        if (expected - self.total_value).abs() > Decimal::ONE {
            warn!(
                total_value = %self.total_value,
                expected = %expected,
                "contract total_value does not match installment_count x installment_value"
            );
        }

        Ok(())
    }
}

/// Creates the contract and expands it into its installment schedule:
/// `installment_count` installments numbered 1..N, status pending,
/// each valued at `installment_value`, due dates strictly increasing.
///
/// The contract insert and the batch of installment inserts share one
/// transaction; a rejected contract persists nothing.
#[instrument(skip(db, new), fields(owner_id = new.owner_id, client_id = new.client_id))]
pub async fn create_contract(
    db: &DatabaseConnection,
    new: NewContract,
) -> Result<(contract::Model, Vec<installment::Model>)> {
    new.validate()?;

    let txn = db.begin().await?;

    let created = contract::ActiveModel {
        owner_id: Set(new.owner_id),
        client_id: Set(new.client_id),
        description: Set(new.description.clone()),
        total_value: Set(new.total_value),
        installment_count: Set(new.installment_count),
        installment_value: Set(new.installment_value),
        due_day: Set(new.due_day),
        start_date: Set(new.start_date),
        end_date: Set(new.end_date),
        status: Set(contract::ContractStatus::Active),
        notes: Set(new.notes.clone()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut installments = Vec::with_capacity(new.installment_count as usize);
    for sequence in 1..=new.installment_count {
        let due_date = installment_due_date(new.start_date, new.due_day as u32, sequence as u32);
        let row = installment::ActiveModel {
            owner_id: Set(new.owner_id),
            contract_id: Set(Some(created.id)),
            sequence_number: Set(sequence),
            amount: Set(new.installment_value),
            due_date: Set(due_date),
            status: Set(installment::InstallmentStatus::Pending),
            payment_date: Set(None),
            paid_amount: Set(None),
            payment_method: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        installments.push(row);
    }

    txn.commit().await?;

    debug!(
        contract_id = created.id,
        installments = installments.len(),
        "created contract with installment schedule"
    );

    Ok((created, installments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use model::entities::prelude::{Contract, Installment};
    use sea_orm::EntityTrait;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn due_day_clamps_to_february() {
        // Contract starting in January with due day 31: the first
        // installment lands on the last day of February.
        assert_eq!(
            installment_due_date(date(2023, 1, 5), 31, 1),
            date(2023, 2, 28)
        );
        assert_eq!(
            installment_due_date(date(2024, 1, 5), 31, 1),
            date(2024, 2, 29)
        );
    }

    #[test]
    fn due_dates_roll_over_year_boundary() {
        assert_eq!(
            installment_due_date(date(2024, 11, 20), 15, 2),
            date(2025, 1, 15)
        );
        assert_eq!(
            installment_due_date(date(2024, 1, 15), 10, 12),
            date(2025, 1, 10)
        );
    }

    #[test]
    fn due_dates_strictly_increase() {
        let start = date(2024, 1, 31);
        let mut previous = start;
        for seq in 1..=24 {
            let due = installment_due_date(start, 31, seq);
            assert!(due > previous, "installment {} not after {}", seq, previous);
            previous = due;
        }
    }

    #[tokio::test]
    async fn schedule_scenario_1200_over_12_months() {
        let db = testing::setup_db().await;
        let owner = testing::new_owner(&db).await;
        let client = testing::new_client(&db, owner.id).await;

        let (contract, installments) = create_contract(
            &db,
            NewContract {
                owner_id: owner.id,
                client_id: client.id,
                description: Some("Monthly maintenance".to_string()),
                total_value: Decimal::new(120000, 2),
                installment_count: 12,
                installment_value: Decimal::new(10000, 2),
                due_day: 10,
                start_date: date(2024, 1, 15),
                end_date: None,
                notes: None,
            },
        )
        .await
        .expect("contract creation failed");

        assert_eq!(contract.status, contract::ContractStatus::Active);
        assert_eq!(installments.len(), 12);

        let sequences: Vec<i32> = installments.iter().map(|i| i.sequence_number).collect();
        assert_eq!(sequences, (1..=12).collect::<Vec<i32>>());

        assert_eq!(installments[0].due_date, date(2024, 2, 10));
        assert_eq!(installments[11].due_date, date(2025, 1, 10));

        let total: Decimal = installments.iter().map(|i| i.amount).sum();
        assert_eq!(total, contract.total_value);
    }

    #[tokio::test]
    async fn rejected_contract_persists_nothing() {
        let db = testing::setup_db().await;
        let owner = testing::new_owner(&db).await;
        let client = testing::new_client(&db, owner.id).await;

        let result = create_contract(
            &db,
            NewContract {
                owner_id: owner.id,
                client_id: client.id,
                description: None,
                total_value: Decimal::new(120000, 2),
                installment_count: 0,
                installment_value: Decimal::new(10000, 2),
                due_day: 10,
                start_date: date(2024, 1, 15),
                end_date: None,
                notes: None,
            },
        )
        .await;

        assert!(matches!(result, Err(EngineError::Validation(_))));
        assert!(Contract::find().all(&db).await.unwrap().is_empty());
        assert!(Installment::find().all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn due_day_out_of_range_is_rejected() {
        let db = testing::setup_db().await;
        let owner = testing::new_owner(&db).await;
        let client = testing::new_client(&db, owner.id).await;

        let result = create_contract(
            &db,
            NewContract {
                owner_id: owner.id,
                client_id: client.id,
                description: None,
                total_value: Decimal::new(60000, 2),
                installment_count: 6,
                installment_value: Decimal::new(10000, 2),
                due_day: 32,
                start_date: date(2024, 1, 15),
                end_date: None,
                notes: None,
            },
        )
        .await;

        assert!(matches!(result, Err(EngineError::Validation(_))));
    }
}
