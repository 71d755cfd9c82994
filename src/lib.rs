//! # BuildKit Provider
//!
//! Configuration schema, validation and capability registry for a BuildKit
//! provider plugin.
//!
//! A host plugin runtime drives the provider through a fixed lifecycle:
//!
//! 1. **Metadata**: type name (`buildkit`) and version
//! 2. **Schema**: the shape of the configuration block
//! 3. **Configure**: raw configuration in, immutable [`CanonicalConfig`] or
//!    [`Diagnostics`] out
//! 4. **Capabilities**: ordered resource, data source and function factories,
//!    each instantiated with the shared canonical configuration
//!
//! ## Quick Start
//!
//! ```
//! use buildkit_provider::{Provider, RawConfig, RawRegistryAuth};
//!
//! let provider = Provider::new("0.1.0");
//! let raw = RawConfig::new().with_registry_auth(RawRegistryAuth::new("ghcr.io", "octocat", "token"));
//! let config = provider.configure(&raw).unwrap();
//! assert_eq!(config.buildkit_host(), "unix:///var/run/buildkit/buildkitd.sock");
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::uninlined_format_args)]

pub mod config;
pub mod error;
pub mod provider;
pub mod registry;
pub mod security;

pub use config::{
    provider_schema, validate, CanonicalConfig, ConfigFormat, ConfigSchema, Diagnostic,
    DiagnosticKind, Diagnostics, RawConfig, RawRegistryAuth, RegistryAuth, Severity,
    DEFAULT_BUILDKIT_HOST,
};
pub use error::{ProviderError, ProviderResult};
pub use provider::{Provider, ProviderMetadata, TYPE_NAME};
pub use registry::{
    Capability, CapabilityDescriptor, CapabilityKind, CapabilityRegistry, DataSource, Function,
    Resource,
};
pub use security::SecretValue;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Binary name
pub const APP_NAME: &str = "buildkit-provider";
