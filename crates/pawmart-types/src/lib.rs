//! pawmart-types: domain documents and the store port shared across crates.

pub mod domain;
pub mod ports;
