use crate::domain::contract::{Contract, ContractId};
use crate::domain::job::Job;
use crate::domain::ports::{ContractFilter, JobFilter, StoreHandle};
use crate::domain::profile::ProfileId;
use crate::error::Result;

/// Read-only lookups scoped to one profile: their contracts and their
/// outstanding jobs. Pure snapshot reads, no domain-error cases.
pub struct Listings {
    store: StoreHandle,
}

impl Listings {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Unpaid jobs under in-progress contracts where the profile is either
    /// the client or the contractor.
    pub async fn unpaid_jobs_for(&self, profile_id: ProfileId) -> Result<Vec<Job>> {
        let view = self.store.snapshot().await?;
        view.find_jobs(&JobFilter {
            paid: Some(false),
            either_party: Some(profile_id),
            contract_active: true,
            ..Default::default()
        })
        .await
    }

    /// A contract by id, visible only to its parties regardless of status.
    pub async fn contract_for(
        &self,
        contract_id: ContractId,
        profile_id: ProfileId,
    ) -> Result<Option<Contract>> {
        let view = self.store.snapshot().await?;
        Ok(view
            .find_contracts(&ContractFilter {
                id: Some(contract_id),
                either_party: Some(profile_id),
                active: false,
            })
            .await?
            .into_iter()
            .next())
    }

    /// All in-progress contracts where the profile is a party.
    pub async fn contracts_for(&self, profile_id: ProfileId) -> Result<Vec<Contract>> {
        let view = self.store.snapshot().await?;
        view.find_contracts(&ContractFilter {
            either_party: Some(profile_id),
            active: true,
            ..Default::default()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contract::ContractStatus;
    use crate::domain::money::Balance;
    use crate::domain::profile::{Profile, ProfileType};
    use crate::infrastructure::in_memory::InMemoryStore;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    async fn seeded() -> Listings {
        let store = Arc::new(InMemoryStore::new());
        for (id, r#type) in [(1, ProfileType::Client), (2, ProfileType::Contractor)] {
            store
                .insert_profile(Profile {
                    id,
                    first_name: "A".into(),
                    last_name: "B".into(),
                    profession: "C".into(),
                    balance: Balance::ZERO,
                    r#type,
                })
                .await;
        }
        for (id, status) in [
            (1, ContractStatus::InProgress),
            (2, ContractStatus::Terminated),
        ] {
            store
                .insert_contract(Contract {
                    id,
                    terms: "terms".into(),
                    status,
                    client_id: 1,
                    contractor_id: 2,
                })
                .await;
        }
        for (id, contract_id, paid) in [(1, 1, false), (2, 1, true), (3, 2, false)] {
            store
                .insert_job(Job {
                    id,
                    description: "work".into(),
                    price: dec!(10.00).try_into().unwrap(),
                    paid,
                    payment_date: None,
                    contract_id,
                })
                .await;
        }
        Listings::new(store)
    }

    #[tokio::test]
    async fn test_unpaid_jobs_require_active_contract() {
        let listings = seeded().await;
        // Job 2 is paid, job 3 sits under a terminated contract
        let jobs = listings.unpaid_jobs_for(1).await.unwrap();
        assert_eq!(jobs.iter().map(|j| j.id).collect::<Vec<_>>(), vec![1]);

        // Contractor side sees the same job
        let jobs = listings.unpaid_jobs_for(2).await.unwrap();
        assert_eq!(jobs.iter().map(|j| j.id).collect::<Vec<_>>(), vec![1]);
    }

    #[tokio::test]
    async fn test_contract_visibility_is_scoped_to_parties() {
        let listings = seeded().await;
        assert!(listings.contract_for(1, 1).await.unwrap().is_some());
        // Terminated contracts are still visible by id to their parties
        assert!(listings.contract_for(2, 1).await.unwrap().is_some());
        // A stranger sees nothing
        assert!(listings.contract_for(1, 42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_contracts_for_lists_active_only() {
        let listings = seeded().await;
        let contracts = listings.contracts_for(2).await.unwrap();
        assert_eq!(contracts.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1]);
    }
}
