//! Common test utilities and helpers
//!
//! This module provides shared test infrastructure including:
//! - Migration directory fixtures
//! - A mock applied-state source standing in for the shards

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
