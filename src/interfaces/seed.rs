use crate::domain::contract::Contract;
use crate::domain::job::Job;
use crate::domain::profile::Profile;
use crate::error::Result;
use crate::infrastructure::in_memory::InMemoryStore;
use serde::Deserialize;
use std::io::Read;

/// A complete marketplace dataset, deserialized from a JSON seed file.
///
/// Used by the demo binary and integration tests; account provisioning and
/// job posting are external collaborators in production.
#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub contracts: Vec<Contract>,
    #[serde(default)]
    pub jobs: Vec<Job>,
}

impl SeedData {
    /// Reads seed data from any `Read` source (e.g. File, Stdin).
    pub fn from_reader(source: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(source)?)
    }

    /// Loads every row into the store.
    pub async fn apply(self, store: &InMemoryStore) {
        for profile in self.profiles {
            store.insert_profile(profile).await;
        }
        for contract in self.contracts {
            store.insert_contract(contract).await;
        }
        for job in self.jobs {
            store.insert_job(job).await;
        }
    }
}
