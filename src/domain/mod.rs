//! Domain layer: entities, money value objects and storage ports.

pub mod contract;
pub mod job;
pub mod money;
pub mod ports;
pub mod profile;
