//! Platform registry and contract-level helpers

pub mod enumerate;
pub mod registry;
