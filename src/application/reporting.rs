use crate::domain::contract::Contract;
use crate::domain::job::Job;
use crate::domain::ports::{JobFilter, StoreHandle, StoreReader};
use crate::domain::profile::ProfileId;
use crate::error::{PaymentError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// How many clients `best_clients` returns when no limit is given.
pub const DEFAULT_BEST_CLIENTS_LIMIT: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionEarnings {
    pub profession: String,
    pub total_earned: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSpending {
    pub id: ProfileId,
    pub full_name: String,
    pub paid: Decimal,
}

/// Read-only aggregation over paid jobs.
///
/// Each report reads from a single committed snapshot, so a half-finished
/// payment can never skew the totals and repeated calls over unchanged data
/// return identical results.
pub struct ReportingEngine {
    store: StoreHandle,
}

impl ReportingEngine {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// The profession that earned the most across jobs paid within
    /// `[start, end]` (inclusive) under in-progress contracts, or `None`
    /// when no job matches. Ties break toward the lexicographically smaller
    /// profession name so the result is deterministic.
    pub async fn best_profession(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<ProfessionEarnings>> {
        let view = self.store.snapshot().await?;
        let paid_jobs = Self::paid_jobs_with_contracts(view.as_ref(), start, end).await?;

        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        for (job, contract) in paid_jobs {
            let contractor = view
                .profile_by_id(contract.contractor_id)
                .await?
                .ok_or_else(|| {
                    PaymentError::storage(format!(
                        "contract {} references missing contractor {}",
                        contract.id, contract.contractor_id
                    ))
                })?;
            *totals.entry(contractor.profession).or_default() += job.price.value();
        }
        debug!(professions = totals.len(), "best profession aggregated");

        // Ascending name order plus a strict comparison: equal totals keep
        // the earlier (smaller) profession name.
        let mut best: Option<ProfessionEarnings> = None;
        for (profession, total_earned) in totals {
            if best.as_ref().is_none_or(|b| total_earned > b.total_earned) {
                best = Some(ProfessionEarnings {
                    profession,
                    total_earned,
                });
            }
        }
        Ok(best)
    }

    /// The clients who paid the most across jobs paid within `[start, end]`
    /// (inclusive) under in-progress contracts, ordered by total paid
    /// descending with client id ascending as tie-break, truncated to
    /// `limit` (default [`DEFAULT_BEST_CLIENTS_LIMIT`]).
    pub async fn best_clients(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: Option<usize>,
    ) -> Result<Vec<ClientSpending>> {
        let view = self.store.snapshot().await?;
        let paid_jobs = Self::paid_jobs_with_contracts(view.as_ref(), start, end).await?;

        let mut totals: BTreeMap<ProfileId, Decimal> = BTreeMap::new();
        for (job, contract) in paid_jobs {
            *totals.entry(contract.client_id).or_default() += job.price.value();
        }

        let mut rows = Vec::with_capacity(totals.len());
        for (client_id, paid) in totals {
            let client = view.profile_by_id(client_id).await?.ok_or_else(|| {
                PaymentError::storage(format!("paid job references missing client {client_id}"))
            })?;
            rows.push(ClientSpending {
                id: client_id,
                full_name: client.full_name(),
                paid,
            });
        }

        rows.sort_by(|a, b| b.paid.cmp(&a.paid).then(a.id.cmp(&b.id)));
        rows.truncate(limit.unwrap_or(DEFAULT_BEST_CLIENTS_LIMIT));
        debug!(clients = rows.len(), "best clients aggregated");
        Ok(rows)
    }

    /// Paid jobs in the window, each paired with its in-progress contract.
    async fn paid_jobs_with_contracts(
        view: &dyn StoreReader,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<(Job, Contract)>> {
        let jobs = view
            .find_jobs(&JobFilter {
                paid: Some(true),
                contract_active: true,
                paid_between: Some((start, end)),
                ..Default::default()
            })
            .await?;

        let mut pairs = Vec::with_capacity(jobs.len());
        for job in jobs {
            let contract = view.contract_by_id(job.contract_id).await?.ok_or_else(|| {
                PaymentError::storage(format!(
                    "job {} references missing contract {}",
                    job.id, job.contract_id
                ))
            })?;
            pairs.push((job, contract));
        }
        Ok(pairs)
    }
}
