//! Capability categories and interfaces.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::CanonicalConfig;

/// Category of a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    /// Managed object with a create/read/update/delete lifecycle.
    Resource,
    /// Read-only lookup.
    DataSource,
    /// Pure callable function.
    Function,
}

impl CapabilityKind {
    /// Every category, in enumeration order.
    pub const ALL: [Self; 3] = [Self::Resource, Self::DataSource, Self::Function];

    /// Get the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Resource => "Resource",
            Self::DataSource => "Data Source",
            Self::Function => "Function",
        }
    }

    /// Plural label used when listing a category.
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Resource => "Resources",
            Self::DataSource => "Data Sources",
            Self::Function => "Functions",
        }
    }
}

impl std::fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Behaviour shared by every capability instance.
///
/// A freshly created instance is not usable until the host has injected the
/// canonical configuration through [`Capability::configure`].
pub trait Capability: Send + Sync {
    /// Type name the capability is registered under.
    fn type_name(&self) -> &str;

    /// Receive the shared, read-only provider configuration.
    fn configure(&mut self, config: Arc<CanonicalConfig>);
}

/// A managed resource.
pub trait Resource: Capability {}

/// A read-only data source.
pub trait DataSource: Capability {}

/// A provider-defined function.
pub trait Function: Capability {}
