//! Configuration validation.
//!
//! Turns a [`RawConfig`] into a [`CanonicalConfig`]:
//! - an absent `buildkit_host` becomes [`DEFAULT_BUILDKIT_HOST`]; a supplied
//!   one is passed through untouched (no trimming, no scheme check)
//! - every `registry_auth` block must carry `address`, `username` and
//!   `password`. The first incomplete block stops validation with a single
//!   [`DiagnosticKind::InvalidRegistryAuth`] error; later blocks are not
//!   inspected.

use std::fmt;

use serde::Serialize;

use super::canonical::{CanonicalConfig, RegistryAuth, DEFAULT_BUILDKIT_HOST};
use super::raw::{RawConfig, RawRegistryAuth};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, does not stop the configure cycle
    Warning,
    /// Stops the configure cycle
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("Warning"),
            Self::Error => f.write_str("Error"),
        }
    }
}

/// Kinds of validation problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A `registry_auth` block is missing `address`, `username` or `password`.
    InvalidRegistryAuth,
}

impl DiagnosticKind {
    /// Short summary shown to the user.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::InvalidRegistryAuth => "Invalid Registry Auth Configuration",
        }
    }

    /// Longer explanation shown to the user.
    pub fn detail(&self) -> &'static str {
        match self {
            Self::InvalidRegistryAuth => {
                "All fields (address, username, password) must be provided for each registry_auth block."
            }
        }
    }
}

/// A structured problem report surfaced to the host.
///
/// Diagnostics never carry configuration values, so a secret cannot leak
/// through them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub summary: String,
    pub detail: String,
}

impl Diagnostic {
    /// Create an error diagnostic with the kind's standard wording.
    pub fn error(kind: DiagnosticKind) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            summary: kind.summary().to_string(),
            detail: kind.detail().to_string(),
        }
    }

    /// Check if this diagnostic stops the configure cycle.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.summary, self.detail)
    }
}

/// Ordered collection of diagnostics from one configure cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Append an error diagnostic of the given kind.
    pub fn add_error(&mut self, kind: DiagnosticKind) {
        self.push(Diagnostic::error(kind));
    }

    /// Check if any diagnostic is an error.
    pub fn has_error(&self) -> bool {
        self.entries.iter().any(Diagnostic::is_error)
    }

    /// Number of diagnostics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no diagnostics.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the diagnostics in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Get the diagnostics as a slice.
    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.entries
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        Self { entries: vec![diagnostic] }
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

/// Validate a raw configuration.
///
/// Returns the canonical configuration, or the diagnostics that prevented
/// building one. An `Err` is never empty.
pub fn validate(raw: &RawConfig) -> Result<CanonicalConfig, Diagnostics> {
    let buildkit_host =
        raw.buildkit_host.clone().unwrap_or_else(|| DEFAULT_BUILDKIT_HOST.to_string());

    let blocks = raw.registry_auth.as_deref().unwrap_or_default();
    tracing::debug!(
        buildkit_host = %buildkit_host,
        registry_auth = blocks.len(),
        "Validating provider configuration"
    );

    let mut registry_auth = Vec::with_capacity(blocks.len());
    for (index, block) in blocks.iter().enumerate() {
        let Some(auth) = complete_auth(block) else {
            tracing::debug!(index, "Incomplete registry_auth block");
            return Err(Diagnostic::error(DiagnosticKind::InvalidRegistryAuth).into());
        };
        registry_auth.push(auth);
    }

    Ok(CanonicalConfig::new(buildkit_host, registry_auth))
}

fn complete_auth(block: &RawRegistryAuth) -> Option<RegistryAuth> {
    match (&block.address, &block.username, &block.password) {
        (Some(address), Some(username), Some(password)) => {
            Some(RegistryAuth::new(address.clone(), username.clone(), password.clone()))
        }
        _ => None,
    }
}
