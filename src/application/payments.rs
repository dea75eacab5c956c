use crate::domain::job::{Job, JobId};
use crate::domain::money::Amount;
use crate::domain::ports::{JobFilter, StoreHandle, StoreTransaction};
use crate::domain::profile::{Profile, ProfileId};
use crate::error::{PaymentError, Result};
use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Fraction of the total unpaid job price a client may deposit in one call.
const DEPOSIT_CAP_RATIO: Decimal = dec!(0.25);

/// The three rows mutated by a successful payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentReceipt {
    pub job: Job,
    pub client: Profile,
    pub contractor: Profile,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepositReceipt {
    pub profile: Profile,
}

/// The money-movement core: pays jobs and deposits client funds.
///
/// Every operation runs inside one storage transaction; any failure rolls it
/// back and re-raises the originating error, so partial writes are never
/// observable. The engine holds no state of its own and is freely shared.
pub struct PaymentEngine {
    store: StoreHandle,
}

impl PaymentEngine {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Pays an unpaid job owned by `client_id`: debits the client, credits
    /// the contractor and marks the job paid, atomically.
    ///
    /// Fails with [`PaymentError::JobNotFound`] when the job does not exist,
    /// is already paid, or belongs to another client, and with
    /// [`PaymentError::InsufficientBalance`] when the client cannot cover the
    /// price. The unpaid-and-owned check shares the transaction with the
    /// writes, so two racing payments of one job cannot both succeed.
    pub async fn pay_for_job(&self, client_id: ProfileId, job_id: JobId) -> Result<PaymentReceipt> {
        let mut txn = self.store.begin().await?;
        match Self::pay_in_txn(txn.as_mut(), client_id, job_id).await {
            Ok(receipt) => {
                txn.commit().await?;
                info!(client_id, job_id, price = %receipt.job.price, "job paid");
                Ok(receipt)
            }
            Err(err) => {
                // The caller gets the originating error even if the rollback
                // itself fails; dropping the handle discards staged writes.
                if let Err(rollback_err) = txn.rollback().await {
                    warn!(client_id, job_id, error = %rollback_err, "rollback failed");
                }
                debug!(client_id, job_id, error = %err, "payment rolled back");
                Err(err)
            }
        }
    }

    async fn pay_in_txn(
        txn: &mut dyn StoreTransaction,
        client_id: ProfileId,
        job_id: JobId,
    ) -> Result<PaymentReceipt> {
        let mut job = txn
            .find_jobs(&JobFilter {
                id: Some(job_id),
                paid: Some(false),
                client_id: Some(client_id),
                ..Default::default()
            })
            .await?
            .into_iter()
            .next()
            .ok_or(PaymentError::JobNotFound)?;

        let contract = txn.contract_by_id(job.contract_id).await?.ok_or_else(|| {
            PaymentError::storage(format!(
                "job {} references missing contract {}",
                job.id, job.contract_id
            ))
        })?;
        let mut client = txn.profile_by_id(client_id).await?.ok_or_else(|| {
            PaymentError::storage(format!(
                "contract {} references missing client {client_id}",
                contract.id
            ))
        })?;
        let mut contractor = txn
            .profile_by_id(contract.contractor_id)
            .await?
            .ok_or_else(|| {
                PaymentError::storage(format!(
                    "contract {} references missing contractor {}",
                    contract.id, contract.contractor_id
                ))
            })?;

        client.debit(job.price)?;
        contractor.credit(job.price);
        job.mark_paid(Utc::now())?;

        txn.update_profile(client.clone()).await?;
        txn.update_profile(contractor.clone()).await?;
        txn.update_job(job.clone()).await?;

        Ok(PaymentReceipt {
            job,
            client,
            contractor,
        })
    }

    /// Deposits `amount` into a client's balance, capped at 25% of the
    /// client's total unpaid job price. An amount exactly at the cap passes.
    ///
    /// Fails with [`PaymentError::InvalidUserType`] when the profile is
    /// missing or not a client, and with
    /// [`PaymentError::DepositLimitExceeded`] (carrying the computed cap)
    /// when over the limit. The cap is computed against unpaid totals read in
    /// the same transaction as the balance write, so racing deposits cannot
    /// both pass against a stale total.
    pub async fn deposit_balance(
        &self,
        user_id: ProfileId,
        amount: Amount,
    ) -> Result<DepositReceipt> {
        let mut txn = self.store.begin().await?;
        match Self::deposit_in_txn(txn.as_mut(), user_id, amount).await {
            Ok(receipt) => {
                txn.commit().await?;
                info!(user_id, %amount, balance = %receipt.profile.balance, "deposit accepted");
                Ok(receipt)
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!(user_id, error = %rollback_err, "rollback failed");
                }
                debug!(user_id, %amount, error = %err, "deposit rolled back");
                Err(err)
            }
        }
    }

    async fn deposit_in_txn(
        txn: &mut dyn StoreTransaction,
        user_id: ProfileId,
        amount: Amount,
    ) -> Result<DepositReceipt> {
        let mut profile = txn
            .profile_by_id(user_id)
            .await?
            .filter(Profile::is_client)
            .ok_or(PaymentError::InvalidUserType)?;

        let unpaid = txn
            .find_jobs(&JobFilter {
                paid: Some(false),
                client_id: Some(user_id),
                ..Default::default()
            })
            .await?;
        let total_unpaid: Decimal = unpaid.iter().map(|job| job.price.value()).sum();
        // The cap is money, so truncate it to cent precision; truncation
        // keeps it at or below exactly 25% of the unpaid total.
        let max_deposit = (total_unpaid * DEPOSIT_CAP_RATIO)
            .round_dp_with_strategy(2, RoundingStrategy::ToZero);

        if amount.value() > max_deposit {
            return Err(PaymentError::DepositLimitExceeded { max_deposit });
        }

        profile.credit(amount);
        txn.update_profile(profile.clone()).await?;

        Ok(DepositReceipt { profile })
    }
}
