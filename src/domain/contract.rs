use super::profile::ProfileId;
use serde::{Deserialize, Serialize};

pub type ContractId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    New,
    InProgress,
    Terminated,
}

/// An agreement binding one client and one contractor.
///
/// Contracts are created and transitioned externally; the core only reads
/// them to resolve job ownership and the paying/paid parties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: ContractId,
    pub terms: String,
    pub status: ContractStatus,
    pub client_id: ProfileId,
    pub contractor_id: ProfileId,
}

impl Contract {
    /// A contract participates in reporting only while in progress.
    pub fn is_active(&self) -> bool {
        self.status == ContractStatus::InProgress
    }

    pub fn has_party(&self, profile_id: ProfileId) -> bool {
        self.client_id == profile_id || self.contractor_id == profile_id
    }
}
