#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use gigpay::domain::contract::{Contract, ContractId, ContractStatus};
use gigpay::domain::job::{Job, JobId};
use gigpay::domain::money::Balance;
use gigpay::domain::profile::{Profile, ProfileId, ProfileType};
use gigpay::infrastructure::in_memory::InMemoryStore;
use rust_decimal::Decimal;
use std::sync::Arc;

pub fn client(id: ProfileId, name: (&str, &str), balance: Decimal) -> Profile {
    Profile {
        id,
        first_name: name.0.into(),
        last_name: name.1.into(),
        profession: "Manager".into(),
        balance: Balance::new(balance),
        r#type: ProfileType::Client,
    }
}

pub fn contractor(id: ProfileId, profession: &str, balance: Decimal) -> Profile {
    Profile {
        id,
        first_name: "John".into(),
        last_name: "Snow".into(),
        profession: profession.into(),
        balance: Balance::new(balance),
        r#type: ProfileType::Contractor,
    }
}

pub fn contract(
    id: ContractId,
    client_id: ProfileId,
    contractor_id: ProfileId,
    status: ContractStatus,
) -> Contract {
    Contract {
        id,
        terms: "bla bla bla".into(),
        status,
        client_id,
        contractor_id,
    }
}

pub fn unpaid_job(id: JobId, contract_id: ContractId, price: Decimal) -> Job {
    Job {
        id,
        description: "work".into(),
        price: price.try_into().expect("positive test price"),
        paid: false,
        payment_date: None,
        contract_id,
    }
}

pub fn paid_job(id: JobId, contract_id: ContractId, price: Decimal, at: DateTime<Utc>) -> Job {
    Job {
        id,
        description: "work".into(),
        price: price.try_into().expect("positive test price"),
        paid: true,
        payment_date: Some(at),
        contract_id,
    }
}

pub fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

pub async fn store_with(
    profiles: Vec<Profile>,
    contracts: Vec<Contract>,
    jobs: Vec<Job>,
) -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    for profile in profiles {
        store.insert_profile(profile).await;
    }
    for contract in contracts {
        store.insert_contract(contract).await;
    }
    for job in jobs {
        store.insert_job(job).await;
    }
    store
}
