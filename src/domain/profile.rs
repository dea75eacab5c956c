use super::money::{Amount, Balance};
use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};

pub type ProfileId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileType {
    Client,
    Contractor,
}

/// An account on the marketplace, either a client (pays for jobs) or a
/// contractor (is paid for jobs).
///
/// Profiles are provisioned externally; the engines only ever move the
/// balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub first_name: String,
    pub last_name: String,
    pub profession: String,
    pub balance: Balance,
    pub r#type: ProfileType,
}

impl Profile {
    pub fn is_client(&self) -> bool {
        self.r#type == ProfileType::Client
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Removes `amount` from the balance, refusing to go below zero.
    pub fn debit(&mut self, amount: Amount) -> Result<()> {
        if self.balance.value() < amount.value() {
            return Err(PaymentError::InsufficientBalance);
        }
        self.balance -= amount.into();
        Ok(())
    }

    /// Adds `amount` to the balance.
    pub fn credit(&mut self, amount: Amount) {
        self.balance += amount.into();
    }
}
