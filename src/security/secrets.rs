//! Sensitive configuration values.
//!
//! Registry passwords travel through the configure cycle inside a
//! [`SecretValue`]. The wrapper makes accidental disclosure hard:
//!
//! - `Debug` and `Display` print `[REDACTED]`
//! - serializing writes `"[REDACTED]"`, so printed configuration never carries the value
//! - memory is zeroed when the value is dropped (using zeroize, `secrets` feature)

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
#[cfg(feature = "secrets")]
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Placeholder emitted wherever a secret would otherwise be shown.
pub const REDACTED: &str = "[REDACTED]";

/// A secret value that is zeroed on drop.
#[cfg(feature = "secrets")]
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretValue {
    value: String,
}

#[cfg(not(feature = "secrets"))]
#[derive(Clone)]
pub struct SecretValue {
    value: String,
}

impl SecretValue {
    /// Create a new secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }

    /// Get the secret value.
    ///
    /// Note: Use sparingly and ensure the value is not logged.
    pub fn expose(&self) -> &str {
        &self.value
    }

    /// Get the length of the secret.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Check if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

// Prevent accidental logging of secrets
impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretValue({REDACTED})")
    }
}

impl fmt::Display for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Serialize for SecretValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

impl From<String> for SecretValue {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
