use super::contract::ContractId;
use super::money::Amount;
use crate::error::{PaymentError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type JobId = u32;

/// A unit of billable work under a contract.
///
/// `payment_date` is set exactly once, at the moment `paid` flips to true;
/// the pair moves together and only through [`Job::mark_paid`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub description: String,
    pub price: Amount,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub payment_date: Option<DateTime<Utc>>,
    pub contract_id: ContractId,
}

impl Job {
    /// Flips the job to paid, recording when. Fails if the job was already
    /// paid so a double payment can never slip through this type.
    pub fn mark_paid(&mut self, at: DateTime<Utc>) -> Result<()> {
        if self.paid {
            return Err(PaymentError::JobNotFound);
        }
        self.paid = true;
        self.payment_date = Some(at);
        Ok(())
    }
}
