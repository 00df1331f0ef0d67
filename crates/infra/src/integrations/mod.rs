//! External service integrations

pub mod email;
