//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates. Host applications can depend on `mcc-workspace` with the
//! default `service` feature and reach the whole core through the
//! `core-service` facade without wiring each crate individually.

#[cfg(feature = "service")]
pub use core_service;
