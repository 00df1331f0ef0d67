//! Domain constants
//!
//! Centralized defaults shared by the adapters and configuration.

// Pagination bounds
pub const MIN_PAGE_SIZE: u32 = 1;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_PAGE_SIZE: u32 = 25;

// HTTP transport defaults
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CALL_BUDGET_SECS: u64 = 120;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_BACKOFF_MS: u64 = 250;
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 10_000;
pub const DEFAULT_USER_AGENT: &str = concat!("mailbridge/", env!("CARGO_PKG_VERSION"));

// Upper bound on pages fetched by the enumerate helpers
pub const MAX_ENUMERATION_PAGES: usize = 10_000;

// Remote error bodies are truncated to this many characters in messages
pub const MAX_ERROR_BODY_CHARS: usize = 512;
