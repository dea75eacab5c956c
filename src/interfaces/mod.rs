//! Adapters at the edges of the core.

pub mod seed;
