//! Test utilities.
//!
//! This module provides:
//! - Test data factories for creating valid test fixtures
//! - In-memory repository implementations for mocking persistence
//! - A manual clock and a fast password scheme
//! - `TestAppStateBuilder` for HTTP-level tests

mod app_state_builder;
mod auth_mocks;

pub use app_state_builder::*;
pub use auth_mocks::*;
pub use factories::*;
