//! Provider configuration.
//!
//! The configure cycle runs in three steps:
//!
//! 1. The host reads the [`ConfigSchema`] to check the surface shape of the
//!    user's configuration block.
//! 2. The block is decoded into a [`RawConfig`] (TOML, JSON or YAML).
//! 3. [`validate`] applies defaults and checks every `registry_auth` block,
//!    producing an immutable [`CanonicalConfig`] or [`Diagnostics`].
//!
//! # Example Configuration
//!
//! ```toml
//! buildkit_host = "tcp://buildkitd:1234"
//!
//! [[registry_auth]]
//! address = "ghcr.io"
//! username = "octocat"
//! password = "ghp_..."
//! ```

mod canonical;
mod raw;
mod schema;
mod validation;

pub use canonical::{CanonicalConfig, RegistryAuth, DEFAULT_BUILDKIT_HOST};
pub use raw::{ConfigFormat, RawConfig, RawRegistryAuth, CONFIG_DIR_NAME, LOCAL_CONFIG_FILE};
pub use schema::{
    provider_schema, Attribute, AttributeType, ConfigSchema, NestedObject, Presence,
    BUILDKIT_HOST, REGISTRY_AUTH,
};
pub use validation::{validate, Diagnostic, DiagnosticKind, Diagnostics, Severity};
