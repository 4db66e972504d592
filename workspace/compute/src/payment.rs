use chrono::NaiveDate;
use model::entities::{contract, installment, ledger_entry};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, Set, TransactionTrait,
};
use tracing::{debug, info, instrument};

use crate::error::{EngineError, Result};

/// Payment data for a `pending|overdue -> paid` transition.
#[derive(Debug, Clone)]
pub struct PaymentDetails {
    pub payment_date: NaiveDate,
    /// Defaults to the scheduled installment amount.
    pub paid_amount: Option<Decimal>,
    pub payment_method: Option<String>,
}

/// Result of a payment transition.
#[derive(Debug)]
pub struct PaymentOutcome {
    pub installment: installment::Model,
    /// The derived revenue entry, present for contract installments.
    pub ledger_entry: Option<ledger_entry::Model>,
    /// True when this payment left the parent contract completed.
    pub contract_completed: bool,
}

/// Marks an installment paid, with the two cascading side effects of
/// the transition performed in the same transaction:
///
/// 1. the installment's payment fields are written;
/// 2. for contract installments, exactly one derived ledger entry
///    (kind revenue, origin contract, back-referencing the contract)
///    is inserted so the cash shows in the ledger view without being
///    editable as a manual entry;
/// 3. the parent contract is scanned and set to completed when every
///    sibling installment is now paid. A full scan, not a counter:
///    siblings can have been deleted or cancelled independently.
///
/// Independent installments get no derived entry; the reconciliation
/// engine already counts their cash directly, and a ledger copy would
/// show the same money twice in the manual ledger.
///
/// Paying an installment that is already paid or cancelled is a
/// consistency error (a repeated payment would duplicate the derived
/// entry).
#[instrument(skip(db, details), fields(owner_id = owner_id, installment_id = installment_id))]
pub async fn pay_installment(
    db: &DatabaseConnection,
    owner_id: i32,
    installment_id: i32,
    details: PaymentDetails,
) -> Result<PaymentOutcome> {
    let target = installment::Entity::find_by_id(installment_id)
        .filter(installment::Column::OwnerId.eq(owner_id))
        .one(db)
        .await?
        .ok_or_else(|| {
            EngineError::NotFound(format!("Installment with id {} does not exist", installment_id))
        })?;

    match target.status {
        installment::InstallmentStatus::Paid => {
            return Err(EngineError::Consistency(format!(
                "Installment {} is already paid",
                installment_id
            )));
        }
        installment::InstallmentStatus::Cancelled => {
            return Err(EngineError::Consistency(format!(
                "Installment {} is cancelled and cannot be paid",
                installment_id
            )));
        }
        installment::InstallmentStatus::Pending | installment::InstallmentStatus::Overdue => {}
    }

    let paid_amount = details.paid_amount.unwrap_or(target.amount);
    if paid_amount <= Decimal::ZERO {
        return Err(EngineError::Validation(
            "Paid amount must be positive".to_string(),
        ));
    }
    let contract_id = target.contract_id;
    let sequence_number = target.sequence_number;

    let txn = db.begin().await?;

    let mut active = target.into_active_model();
    active.status = Set(installment::InstallmentStatus::Paid);
    active.payment_date = Set(Some(details.payment_date));
    active.paid_amount = Set(Some(paid_amount));
    active.payment_method = Set(details.payment_method.clone());
    let paid = active.update(&txn).await?;

    let mut derived_entry = None;
    let mut contract_completed = false;

    if let Some(contract_id) = contract_id {
        let parent = contract::Entity::find_by_id(contract_id)
            .filter(contract::Column::OwnerId.eq(owner_id))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                EngineError::NotFound(format!("Contract with id {} does not exist", contract_id))
            })?;

        let entry = ledger_entry::ActiveModel {
            owner_id: Set(owner_id),
            kind: Set(ledger_entry::EntryKind::Revenue),
            category_id: Set(None),
            description: Set(format!(
                "Contract #{} installment {}/{}",
                contract_id, sequence_number, parent.installment_count
            )),
            amount: Set(paid_amount),
            entry_date: Set(details.payment_date),
            status: Set(ledger_entry::EntryStatus::Paid),
            payment_date: Set(Some(details.payment_date)),
            payment_method: Set(details.payment_method),
            origin: Set(ledger_entry::EntryOrigin::Contract),
            reference_id: Set(Some(contract_id)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        derived_entry = Some(entry);

        let siblings = installment::Entity::find()
            .filter(installment::Column::ContractId.eq(contract_id))
            .all(&txn)
            .await?;
        let all_paid = siblings
            .iter()
            .all(|i| i.status == installment::InstallmentStatus::Paid);

        if all_paid && parent.status != contract::ContractStatus::Completed {
            let mut parent_active = parent.into_active_model();
            parent_active.status = Set(contract::ContractStatus::Completed);
            parent_active.update(&txn).await?;
            contract_completed = true;
            info!(contract_id, "all installments paid, contract completed");
        }
    }

    txn.commit().await?;

    debug!(
        installment_id,
        %paid_amount,
        contract_completed,
        "installment marked paid"
    );

    Ok(PaymentOutcome {
        installment: paid,
        ledger_entry: derived_entry,
        contract_completed,
    })
}

/// Status-only transition to `pending` or `cancelled`. Never creates
/// or retracts the derived ledger entry: reversing a payment leaves
/// the entry in place (see delete protection below).
#[instrument(skip(db), fields(owner_id = owner_id, installment_id = installment_id))]
pub async fn set_installment_status(
    db: &DatabaseConnection,
    owner_id: i32,
    installment_id: i32,
    status: installment::InstallmentStatus,
) -> Result<installment::Model> {
    if !matches!(
        status,
        installment::InstallmentStatus::Pending | installment::InstallmentStatus::Cancelled
    ) {
        return Err(EngineError::Validation(format!(
            "Status-only transitions may only target pending or cancelled, got {:?}",
            status
        )));
    }

    let target = installment::Entity::find_by_id(installment_id)
        .filter(installment::Column::OwnerId.eq(owner_id))
        .one(db)
        .await?
        .ok_or_else(|| {
            EngineError::NotFound(format!("Installment with id {} does not exist", installment_id))
        })?;

    let mut active = target.into_active_model();
    active.status = Set(status);
    Ok(active.update(db).await?)
}

/// Deletes an installment. Rejected while the installment is paid:
/// deleting it would silently orphan the derived ledger entry created
/// at payment time.
#[instrument(skip(db), fields(owner_id = owner_id, installment_id = installment_id))]
pub async fn delete_installment(
    db: &DatabaseConnection,
    owner_id: i32,
    installment_id: i32,
) -> Result<()> {
    let target = installment::Entity::find_by_id(installment_id)
        .filter(installment::Column::OwnerId.eq(owner_id))
        .one(db)
        .await?
        .ok_or_else(|| {
            EngineError::NotFound(format!("Installment with id {} does not exist", installment_id))
        })?;

    if target.status == installment::InstallmentStatus::Paid {
        return Err(EngineError::Consistency(format!(
            "Installment {} is paid and cannot be deleted",
            installment_id
        )));
    }

    target.delete(db).await?;
    Ok(())
}
