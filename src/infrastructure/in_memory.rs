use crate::domain::contract::{Contract, ContractId};
use crate::domain::job::{Job, JobId};
use crate::domain::ports::{
    ContractFilter, JobFilter, MarketplaceStore, StoreReader, StoreTransaction,
};
use crate::domain::profile::{Profile, ProfileId};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// The committed tables. Cheap to clone, which is what snapshots and
/// transaction working copies are.
#[derive(Debug, Default, Clone)]
struct DataSet {
    profiles: HashMap<ProfileId, Profile>,
    contracts: HashMap<ContractId, Contract>,
    jobs: HashMap<JobId, Job>,
}

impl DataSet {
    fn job_matches(&self, job: &Job, filter: &JobFilter) -> bool {
        if let Some(id) = filter.id
            && job.id != id
        {
            return false;
        }
        if let Some(paid) = filter.paid
            && job.paid != paid
        {
            return false;
        }
        if let Some((start, end)) = filter.paid_between {
            match job.payment_date {
                Some(at) if at >= start && at <= end => {}
                _ => return false,
            }
        }
        // Contract-level conditions: the join. A job whose contract row is
        // missing matches nothing that constrains the contract.
        if filter.client_id.is_some() || filter.either_party.is_some() || filter.contract_active {
            let Some(contract) = self.contracts.get(&job.contract_id) else {
                return false;
            };
            if let Some(client_id) = filter.client_id
                && contract.client_id != client_id
            {
                return false;
            }
            if let Some(party) = filter.either_party
                && !contract.has_party(party)
            {
                return false;
            }
            if filter.contract_active && !contract.is_active() {
                return false;
            }
        }
        true
    }

    fn jobs_matching(&self, filter: &JobFilter) -> Vec<Job> {
        let mut jobs: Vec<Job> = self
            .jobs
            .values()
            .filter(|job| self.job_matches(job, filter))
            .cloned()
            .collect();
        jobs.sort_by_key(|job| job.id);
        jobs
    }

    fn contracts_matching(&self, filter: &ContractFilter) -> Vec<Contract> {
        let mut contracts: Vec<Contract> = self
            .contracts
            .values()
            .filter(|contract| {
                if let Some(id) = filter.id
                    && contract.id != id
                {
                    return false;
                }
                if let Some(party) = filter.either_party
                    && !contract.has_party(party)
                {
                    return false;
                }
                if filter.active && !contract.is_active() {
                    return false;
                }
                true
            })
            .cloned()
            .collect();
        contracts.sort_by_key(|contract| contract.id);
        contracts
    }
}

/// In-memory marketplace store.
///
/// Committed state lives behind an `Arc<tokio::sync::Mutex<_>>`. A write
/// transaction takes the owned lock for its whole lifetime and stages its
/// writes on a working copy, so writers serialize and readers only ever see
/// committed state. That is stricter than the required read-committed
/// isolation, which is fine for a reference backend.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    data: Arc<Mutex<DataSet>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_profile(&self, profile: Profile) {
        self.data.lock().await.profiles.insert(profile.id, profile);
    }

    pub async fn insert_contract(&self, contract: Contract) {
        self.data
            .lock()
            .await
            .contracts
            .insert(contract.id, contract);
    }

    pub async fn insert_job(&self, job: Job) {
        self.data.lock().await.jobs.insert(job.id, job);
    }
}

#[async_trait]
impl MarketplaceStore for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>> {
        let guard = Arc::clone(&self.data).lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(InMemoryTransaction { guard, working }))
    }

    async fn snapshot(&self) -> Result<Box<dyn StoreReader>> {
        let data = self.data.lock().await.clone();
        Ok(Box::new(InMemorySnapshot { data }))
    }
}

/// A transaction over the in-memory store. Holds the store lock; writes go
/// to `working` and replace the committed state only on commit.
pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<DataSet>,
    working: DataSet,
}

#[async_trait]
impl StoreReader for InMemoryTransaction {
    async fn profile_by_id(&self, id: ProfileId) -> Result<Option<Profile>> {
        Ok(self.working.profiles.get(&id).cloned())
    }

    async fn contract_by_id(&self, id: ContractId) -> Result<Option<Contract>> {
        Ok(self.working.contracts.get(&id).cloned())
    }

    async fn find_contracts(&self, filter: &ContractFilter) -> Result<Vec<Contract>> {
        Ok(self.working.contracts_matching(filter))
    }

    async fn find_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        Ok(self.working.jobs_matching(filter))
    }
}

#[async_trait]
impl StoreTransaction for InMemoryTransaction {
    async fn update_profile(&mut self, profile: Profile) -> Result<()> {
        if !self.working.profiles.contains_key(&profile.id) {
            return Err(PaymentError::storage(format!(
                "update of missing profile {}",
                profile.id
            )));
        }
        self.working.profiles.insert(profile.id, profile);
        Ok(())
    }

    async fn update_job(&mut self, job: Job) -> Result<()> {
        if !self.working.jobs.contains_key(&job.id) {
            return Err(PaymentError::storage(format!(
                "update of missing job {}",
                job.id
            )));
        }
        self.working.jobs.insert(job.id, job);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let InMemoryTransaction { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        // Dropping the working copy and the lock is the rollback.
        Ok(())
    }
}

/// A point-in-time clone of committed state.
pub struct InMemorySnapshot {
    data: DataSet,
}

#[async_trait]
impl StoreReader for InMemorySnapshot {
    async fn profile_by_id(&self, id: ProfileId) -> Result<Option<Profile>> {
        Ok(self.data.profiles.get(&id).cloned())
    }

    async fn contract_by_id(&self, id: ContractId) -> Result<Option<Contract>> {
        Ok(self.data.contracts.get(&id).cloned())
    }

    async fn find_contracts(&self, filter: &ContractFilter) -> Result<Vec<Contract>> {
        Ok(self.data.contracts_matching(filter))
    }

    async fn find_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        Ok(self.data.jobs_matching(filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contract::ContractStatus;
    use crate::domain::money::Balance;
    use crate::domain::profile::ProfileType;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn profile(id: ProfileId) -> Profile {
        Profile {
            id,
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            profession: "Programmer".into(),
            balance: Balance::new(dec!(50.00)),
            r#type: ProfileType::Client,
        }
    }

    fn contract(id: ContractId, client_id: ProfileId, status: ContractStatus) -> Contract {
        Contract {
            id,
            terms: "terms".into(),
            status,
            client_id,
            contractor_id: 99,
        }
    }

    fn job(id: JobId, contract_id: ContractId, paid: bool) -> Job {
        Job {
            id,
            description: "work".into(),
            price: dec!(10.00).try_into().unwrap(),
            paid,
            payment_date: paid.then(Utc::now),
            contract_id,
        }
    }

    async fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.insert_profile(profile(1)).await;
        store
            .insert_contract(contract(1, 1, ContractStatus::InProgress))
            .await;
        store
            .insert_contract(contract(2, 1, ContractStatus::Terminated))
            .await;
        store.insert_job(job(1, 1, false)).await;
        store.insert_job(job(2, 1, true)).await;
        store.insert_job(job(3, 2, false)).await;
        store
    }

    #[tokio::test]
    async fn test_job_filter_joins_through_contract() {
        let store = seeded().await;
        let view = store.snapshot().await.unwrap();

        let unpaid_for_client = view
            .find_jobs(&JobFilter {
                paid: Some(false),
                client_id: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(
            unpaid_for_client.iter().map(|j| j.id).collect::<Vec<_>>(),
            vec![1, 3]
        );

        let active_only = view
            .find_jobs(&JobFilter {
                paid: Some(false),
                client_id: Some(1),
                contract_active: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(active_only.iter().map(|j| j.id).collect::<Vec<_>>(), vec![1]);

        let other_client = view
            .find_jobs(&JobFilter {
                client_id: Some(42),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(other_client.is_empty());
    }

    #[tokio::test]
    async fn test_writes_invisible_until_commit() {
        let store = seeded().await;

        let mut txn = store.begin().await.unwrap();
        let mut updated = txn.profile_by_id(1).await.unwrap().unwrap();
        updated.balance = Balance::new(dec!(999.00));
        txn.update_profile(updated).await.unwrap();

        // The transaction reads its own write
        let staged = txn.profile_by_id(1).await.unwrap().unwrap();
        assert_eq!(staged.balance, Balance::new(dec!(999.00)));

        txn.commit().await.unwrap();

        let view = store.snapshot().await.unwrap();
        let committed = view.profile_by_id(1).await.unwrap().unwrap();
        assert_eq!(committed.balance, Balance::new(dec!(999.00)));
    }

    #[tokio::test]
    async fn test_rollback_discards_staged_writes() {
        let store = seeded().await;

        let mut txn = store.begin().await.unwrap();
        let mut updated = txn.profile_by_id(1).await.unwrap().unwrap();
        updated.balance = Balance::new(dec!(0.00));
        txn.update_profile(updated).await.unwrap();
        txn.rollback().await.unwrap();

        let view = store.snapshot().await.unwrap();
        let committed = view.profile_by_id(1).await.unwrap().unwrap();
        assert_eq!(committed.balance, Balance::new(dec!(50.00)));
    }

    #[tokio::test]
    async fn test_snapshot_does_not_observe_later_commits() {
        let store = seeded().await;
        let before = store.snapshot().await.unwrap();

        let mut txn = store.begin().await.unwrap();
        let mut updated = txn.profile_by_id(1).await.unwrap().unwrap();
        updated.balance = Balance::new(dec!(1.00));
        txn.update_profile(updated).await.unwrap();
        txn.commit().await.unwrap();

        let stale = before.profile_by_id(1).await.unwrap().unwrap();
        assert_eq!(stale.balance, Balance::new(dec!(50.00)));
    }

    #[tokio::test]
    async fn test_update_of_missing_row_is_storage_failure() {
        let store = seeded().await;
        let mut txn = store.begin().await.unwrap();

        let ghost = profile(77);
        let result = txn.update_profile(ghost).await;
        assert!(matches!(result, Err(PaymentError::Storage(_))));
    }

    #[tokio::test]
    async fn test_contract_filter() {
        let store = seeded().await;
        let view = store.snapshot().await.unwrap();

        let active = view
            .find_contracts(&ContractFilter {
                either_party: Some(1),
                active: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(active.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1]);

        let by_id = view
            .find_contracts(&ContractFilter {
                id: Some(2),
                either_party: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].status, ContractStatus::Terminated);
    }
}
