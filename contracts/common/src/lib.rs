//! # Multivault Common
//!
//! Shared building blocks for the Strategy and EMP contracts:
//!
//! - [`types`]: the utilization table records both contracts store and
//!   exchange.
//! - [`math`]: 18-decimal fixed-point helpers and decimal normalization.
//! - [`interfaces`]: typed clients for the external collaborators (value
//!   feed, asset handler) and for the Strategy surface the EMP consumes.
//! - `testutils`: in-process test doubles for the collaborators, compiled only
//!   for tests or with the `testutils` feature.

#![no_std]

pub mod interfaces;
pub mod math;
pub mod types;

#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

pub use math::ONE;
pub use types::{StrategyAllocation, UtilizationEntry, UtilizationParams};
