//! Storage ports consumed by the engines.
//!
//! Queries are expressed as typed filters rather than ad-hoc predicates so
//! every join condition (ownership pushed through the contract, paid flag,
//! payment-date window) is visible at the call site. Implementations decide
//! how the filter is evaluated; they never interpret domain rules.

use super::contract::{Contract, ContractId};
use super::job::{Job, JobId};
use super::profile::{Profile, ProfileId};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Predicate over jobs, with contract-level conditions resolved through each
/// job's owning contract.
#[derive(Debug, Default, Clone)]
pub struct JobFilter {
    pub id: Option<JobId>,
    pub paid: Option<bool>,
    /// Owning contract's client must be this profile.
    pub client_id: Option<ProfileId>,
    /// Owning contract must list this profile as client or contractor.
    pub either_party: Option<ProfileId>,
    /// Owning contract must be in progress.
    pub contract_active: bool,
    /// Inclusive payment-date window; only meaningful for paid jobs.
    pub paid_between: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

#[derive(Debug, Default, Clone)]
pub struct ContractFilter {
    pub id: Option<ContractId>,
    pub either_party: Option<ProfileId>,
    pub active: bool,
}

/// Read operations, available both inside a transaction and on a snapshot.
#[async_trait]
pub trait StoreReader: Send {
    async fn profile_by_id(&self, id: ProfileId) -> Result<Option<Profile>>;

    async fn contract_by_id(&self, id: ContractId) -> Result<Option<Contract>>;

    async fn find_contracts(&self, filter: &ContractFilter) -> Result<Vec<Contract>>;

    async fn find_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>>;
}

/// A scoped atomic transaction.
///
/// Reads observe this transaction's own staged writes layered over committed
/// state. Nothing becomes visible to other readers until `commit`; dropping
/// the handle without committing discards all staged writes.
#[async_trait]
pub trait StoreTransaction: StoreReader + Sync {
    async fn update_profile(&mut self, profile: Profile) -> Result<()>;

    async fn update_job(&mut self, job: Job) -> Result<()>;

    async fn commit(self: Box<Self>) -> Result<()>;

    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Entry point to storage: write transactions and consistent read snapshots.
#[async_trait]
pub trait MarketplaceStore: Send + Sync {
    /// Opens a transaction. Concurrent transactions racing on the same rows
    /// must serialize such that the loser observes the winner's committed
    /// writes (at least read-committed isolation).
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>>;

    /// A consistent view of committed state, for read-only operations.
    /// Uncommitted writes of open transactions are never visible.
    async fn snapshot(&self) -> Result<Box<dyn StoreReader>>;
}

/// Shared handle the engines receive via dependency injection.
pub type StoreHandle = Arc<dyn MarketplaceStore>;
