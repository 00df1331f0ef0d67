//! Credential types
//!
//! Secret values are wrapped in [`SecretValue`], which redacts itself in
//! `Debug`/`Display` output and zeroes its memory on drop. Credentials are
//! deserializable (from config or request payloads) but never serializable.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Secret string that never prints its contents.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretValue(String);

impl SecretValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the inner value.
    ///
    /// The exposed value must not be stored or logged; use it only to build
    /// the outgoing request.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// True when the value is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretValue(***)")
    }
}

impl fmt::Display for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***")
    }
}

/// Credential field name → secret value for one platform account.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PlatformCredentials {
    fields: BTreeMap<String, SecretValue>,
}

impl PlatformCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), SecretValue::new(value));
    }

    pub fn get(&self, field: &str) -> Option<&SecretValue> {
        self.fields.get(field)
    }

    /// Exposed value of a field, if present and not blank.
    pub fn expose(&self, field: &str) -> Option<&str> {
        self.fields.get(field).filter(|value| !value.is_blank()).map(|value| value.expose().trim())
    }

    /// True when the field is present with a non-blank value.
    pub fn has_value(&self, field: &str) -> bool {
        self.expose(field).is_some()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Debug for PlatformCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformCredentials")
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<K, V> FromIterator<(K, V)> for PlatformCredentials
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut credentials = Self::new();
        for (field, value) in iter {
            credentials.insert(field, value);
        }
        credentials
    }
}

impl From<HashMap<String, String>> for PlatformCredentials {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl<'de> Deserialize<'de> for PlatformCredentials {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}

/// Expected shape of a credential value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialFormat {
    ApiKey,
    OauthToken,
    AccountId,
    Url,
    Text,
}

/// Static descriptor for one credential field of a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CredentialField {
    /// Key expected in [`PlatformCredentials`].
    pub field: &'static str,
    /// Human label for onboarding forms.
    pub label: &'static str,
    /// Whether the value must be masked in the UI.
    pub secret: bool,
    pub required: bool,
    pub format: CredentialFormat,
}

impl CredentialField {
    /// Required secret field.
    pub const fn secret(
        field: &'static str,
        label: &'static str,
        format: CredentialFormat,
    ) -> Self {
        Self { field, label, secret: true, required: true, format }
    }

    /// Required non-secret field.
    pub const fn plain(field: &'static str, label: &'static str, format: CredentialFormat) -> Self {
        Self { field, label, secret: false, required: true, format }
    }

    /// Mark the field as optional.
    pub const fn optional(self) -> Self {
        Self { required: false, ..self }
    }
}
