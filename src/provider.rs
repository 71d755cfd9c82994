//! Provider lifecycle entry points.
//!
//! [`Provider`] is what a host plugin runtime talks to. It answers metadata
//! and schema requests, runs the configure cycle and enumerates the
//! registered capabilities. It holds no configuration itself: the canonical
//! configuration is handed back to the host, which passes it to every
//! capability it instantiates.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::config::{provider_schema, validate, CanonicalConfig, ConfigSchema, Diagnostics, RawConfig};
use crate::error::ProviderResult;
use crate::registry::{
    CapabilityRegistry, DataSourceDescriptor, FunctionDescriptor, ResourceDescriptor,
};

/// Type name reported to the host.
pub const TYPE_NAME: &str = "buildkit";

/// Identity reported in response to a metadata request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderMetadata {
    pub type_name: String,
    pub version: String,
}

/// The BuildKit provider.
#[derive(Debug, Clone)]
pub struct Provider {
    version: String,
    registry: CapabilityRegistry,
}

/// Build a provider factory for the given version.
///
/// Host runtimes take a zero-argument constructor; each call yields a fresh
/// provider carrying the same version.
pub fn factory(version: impl Into<String>) -> impl Fn() -> Provider + Send + Sync + 'static {
    let version = version.into();
    move || Provider::new(version.clone())
}

impl Provider {
    /// Create a provider with the built-in capability registry.
    pub fn new(version: impl Into<String>) -> Self {
        Self::with_registry(version, CapabilityRegistry::builtin())
    }

    /// Create a provider with a custom capability registry.
    pub fn with_registry(version: impl Into<String>, registry: CapabilityRegistry) -> Self {
        Self { version: version.into(), registry }
    }

    /// Provider type name and version.
    pub fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata { type_name: TYPE_NAME.to_string(), version: self.version.clone() }
    }

    /// Provider version given at construction.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Configuration schema.
    pub fn schema(&self) -> &'static ConfigSchema {
        provider_schema()
    }

    /// Run the configure cycle.
    ///
    /// On success the returned configuration is meant to be shared with
    /// every capability the host instantiates. Any diagnostic means the cycle
    /// must stop.
    pub fn configure(&self, raw: &RawConfig) -> Result<Arc<CanonicalConfig>, Diagnostics> {
        match validate(raw) {
            Ok(config) => {
                tracing::info!(
                    buildkit_host = %config.buildkit_host(),
                    registry_auth = config.registry_auth().len(),
                    "Provider configured"
                );
                Ok(Arc::new(config))
            }
            Err(diagnostics) => {
                for diagnostic in &diagnostics {
                    tracing::warn!(
                        severity = %diagnostic.severity,
                        summary = %diagnostic.summary,
                        "Provider configuration rejected"
                    );
                }
                Err(diagnostics)
            }
        }
    }

    /// Load a configuration file and run the configure cycle on it.
    pub fn configure_file(&self, path: &Path) -> ProviderResult<Arc<CanonicalConfig>> {
        let raw = RawConfig::from_file(path)?;
        Ok(self.configure(&raw)?)
    }

    /// The capability registry.
    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Resource factories.
    pub fn resources(&self) -> &[ResourceDescriptor] {
        self.registry.resources()
    }

    /// Data source factories.
    pub fn data_sources(&self) -> &[DataSourceDescriptor] {
        self.registry.data_sources()
    }

    /// Function factories.
    pub fn functions(&self) -> &[FunctionDescriptor] {
        self.registry.functions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DiagnosticKind, RawRegistryAuth};
    use crate::error::ProviderError;

    #[test]
    fn test_metadata() {
        let provider = Provider::new("1.2.3");
        assert_eq!(
            provider.metadata(),
            ProviderMetadata { type_name: "buildkit".to_string(), version: "1.2.3".to_string() }
        );
    }

    #[test]
    fn test_factory_yields_fresh_providers() {
        let make = factory("dev");
        let first = make();
        let second = make();
        assert_eq!(first.version(), "dev");
        assert_eq!(second.metadata(), first.metadata());
    }

    #[test]
    fn test_schema_is_provider_schema() {
        let provider = Provider::new("test");
        assert!(std::ptr::eq(provider.schema(), provider_schema()));
    }

    #[test]
    fn test_configure_success() {
        let provider = Provider::new("test");
        let raw = RawConfig::new().with_registry_auth(RawRegistryAuth::new("a", "u", "p"));
        let config = provider.configure(&raw).unwrap();
        assert!(config.uses_default_host());
        assert_eq!(config.registry_auth().len(), 1);
    }

    #[test]
    fn test_configure_rejected() {
        let provider = Provider::new("test");
        let raw = RawConfig::new().with_registry_auth(RawRegistryAuth::default());
        let diagnostics = provider.configure(&raw).unwrap_err();
        assert_eq!(diagnostics.as_slice()[0].kind, DiagnosticKind::InvalidRegistryAuth);
    }

    #[test]
    fn test_configure_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("provider.json");
        std::fs::write(&path, r#"{"registry_auth": [{"address": "a", "username": "u"}]}"#).unwrap();

        let provider = Provider::new("test");
        let err = provider.configure_file(&path).unwrap_err();
        assert!(matches!(err, ProviderError::Rejected(ref d) if d.len() == 1));
    }

    #[test]
    fn test_capability_enumeration_empty() {
        let provider = Provider::new("test");
        assert!(provider.resources().is_empty());
        assert!(provider.data_sources().is_empty());
        assert!(provider.functions().is_empty());
        assert!(provider.registry().is_empty());
    }
}
