//! Money-movement and reporting core for a freelance marketplace.
//!
//! Profiles hold balances, contracts bind a client to a contractor, and jobs
//! under a contract carry a price and a paid flag. The crate's job is moving
//! money without creating or destroying any: paying a job debits the client
//! and credits the contractor atomically, deposits are capped at 25% of the
//! client's unpaid job total, and reports aggregate paid jobs from a
//! consistent snapshot.
//!
//! HTTP routing, authentication and input validation are external callers of
//! the [`application`] engines.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
