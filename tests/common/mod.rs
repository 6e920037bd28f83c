//! Common test utilities for integration tests.
//!
//! Provides factory functions for seeding word pools and a store wrapper
//! whose writes can be made to fail on demand.

pub mod fixtures;
