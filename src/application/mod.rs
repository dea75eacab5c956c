//! Application layer: the engines orchestrating storage transactions.
//!
//! `PaymentEngine` owns the two money-moving operations, `ReportingEngine`
//! the aggregations and `Listings` the per-profile lookups. All three receive
//! the store handle via dependency injection; none keeps state of its own.

pub mod listings;
pub mod payments;
pub mod reporting;
