//! Connection test results

use serde::{Deserialize, Serialize};

#[cfg(feature = "ts-gen")]
use ts_rs::TS;

/// Account metadata reported by a successful connection test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct AccountInfo {
    pub account_id: Option<String>,
    pub account_name: Option<String>,
    pub email: Option<String>,
    pub plan: Option<String>,
}

/// Outcome of a side-effect-free credential check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct ConnectionTestResult {
    pub success: bool,
    pub message: String,
    pub account: Option<AccountInfo>,
}

impl ConnectionTestResult {
    pub fn connected(message: impl Into<String>, account: AccountInfo) -> Self {
        Self { success: true, message: message.into(), account: Some(account) }
    }

    /// The remote service was reachable but refused the credentials.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into(), account: None }
    }
}
