//! Shared test helpers for `mailbridge-core` integration tests.
//!
//! These helpers provide an in-memory adapter so contract-level tests can
//! focus on behaviour instead of HTTP plumbing.

pub mod adapter;
