use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use gigpay::application::listings::Listings;
use gigpay::application::payments::PaymentEngine;
use gigpay::application::reporting::ReportingEngine;
use gigpay::domain::money::Amount;
use gigpay::domain::ports::StoreHandle;
use gigpay::infrastructure::in_memory::InMemoryStore;
use gigpay::interfaces::seed::SeedData;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON seed file with profiles, contracts and jobs
    seed: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pay an unpaid job on behalf of a client
    Pay {
        #[arg(long)]
        client: u32,
        #[arg(long)]
        job: u32,
    },
    /// Deposit funds into a client balance (capped at 25% of unpaid jobs)
    Deposit {
        #[arg(long)]
        user: u32,
        #[arg(long)]
        amount: Decimal,
    },
    /// Unpaid jobs under active contracts for a profile
    UnpaidJobs {
        #[arg(long)]
        profile: u32,
    },
    /// Active contracts for a profile
    Contracts {
        #[arg(long)]
        profile: u32,
    },
    /// Highest-earning profession over a date range
    BestProfession {
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
    },
    /// Top-paying clients over a date range
    BestClients {
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        #[arg(long)]
        limit: Option<usize>,
    },
}

/// Widens a date pair to an inclusive timestamp range covering both days.
fn day_range(start: NaiveDate, end: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let end_of_day =
        NaiveTime::from_hms_milli_opt(23, 59, 59, 999).expect("23:59:59.999 is a valid time");
    (
        start.and_time(NaiveTime::MIN).and_utc(),
        end.and_time(end_of_day).and_utc(),
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let file = File::open(&cli.seed).into_diagnostic()?;
    let seed = SeedData::from_reader(file).into_diagnostic()?;
    let store = Arc::new(InMemoryStore::new());
    seed.apply(&store).await;
    let store: StoreHandle = store;

    let output = match cli.command {
        Command::Pay { client, job } => {
            let receipt = PaymentEngine::new(store)
                .pay_for_job(client, job)
                .await
                .into_diagnostic()?;
            serde_json::to_value(receipt).into_diagnostic()?
        }
        Command::Deposit { user, amount } => {
            let amount = Amount::new(amount).into_diagnostic()?;
            let receipt = PaymentEngine::new(store)
                .deposit_balance(user, amount)
                .await
                .into_diagnostic()?;
            serde_json::to_value(receipt).into_diagnostic()?
        }
        Command::UnpaidJobs { profile } => {
            let jobs = Listings::new(store)
                .unpaid_jobs_for(profile)
                .await
                .into_diagnostic()?;
            serde_json::to_value(jobs).into_diagnostic()?
        }
        Command::Contracts { profile } => {
            let contracts = Listings::new(store)
                .contracts_for(profile)
                .await
                .into_diagnostic()?;
            serde_json::to_value(contracts).into_diagnostic()?
        }
        Command::BestProfession { start, end } => {
            let (start, end) = day_range(start, end);
            let report = ReportingEngine::new(store)
                .best_profession(start, end)
                .await
                .into_diagnostic()?;
            serde_json::to_value(report).into_diagnostic()?
        }
        Command::BestClients { start, end, limit } => {
            let (start, end) = day_range(start, end);
            let report = ReportingEngine::new(store)
                .best_clients(start, end, limit)
                .await
                .into_diagnostic()?;
            serde_json::to_value(report).into_diagnostic()?
        }
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&output).into_diagnostic()?
    );
    Ok(())
}
