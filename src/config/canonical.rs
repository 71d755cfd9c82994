//! Validated provider configuration.

use serde::Serialize;

use crate::security::SecretValue;

/// Daemon address used when `buildkit_host` is not configured.
pub const DEFAULT_BUILDKIT_HOST: &str = "unix:///var/run/buildkit/buildkitd.sock";

/// Validated, defaulted provider configuration.
///
/// Only the validator constructs this type. Once built it is never mutated;
/// the host shares it (usually behind an `Arc`) with every capability it
/// instantiates.
#[derive(Debug, Clone, Serialize)]
pub struct CanonicalConfig {
    buildkit_host: String,
    registry_auth: Vec<RegistryAuth>,
}

/// Credentials for a single container registry.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryAuth {
    address: String,
    username: String,
    password: SecretValue,
}

impl CanonicalConfig {
    pub(crate) fn new(buildkit_host: String, registry_auth: Vec<RegistryAuth>) -> Self {
        Self { buildkit_host, registry_auth }
    }

    /// Address of the BuildKit daemon.
    pub fn buildkit_host(&self) -> &str {
        &self.buildkit_host
    }

    /// Registry credentials in the order they were supplied.
    pub fn registry_auth(&self) -> &[RegistryAuth] {
        &self.registry_auth
    }

    /// Credentials for a registry address, first match wins.
    pub fn auth_for(&self, address: &str) -> Option<&RegistryAuth> {
        self.registry_auth.iter().find(|a| a.address == address)
    }

    /// Check if `buildkit_host` is the built-in default.
    pub fn uses_default_host(&self) -> bool {
        self.buildkit_host == DEFAULT_BUILDKIT_HOST
    }
}

impl RegistryAuth {
    pub(crate) fn new(address: String, username: String, password: SecretValue) -> Self {
        Self { address, username, password }
    }

    /// Registry address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Registry username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Registry password.
    pub fn password(&self) -> &SecretValue {
        &self.password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CanonicalConfig {
        CanonicalConfig::new(
            "tcp://buildkitd:1234".to_string(),
            vec![
                RegistryAuth::new(
                    "ghcr.io".to_string(),
                    "octocat".to_string(),
                    SecretValue::new("ghp_token"),
                ),
                RegistryAuth::new(
                    "ghcr.io".to_string(),
                    "second".to_string(),
                    SecretValue::new("other"),
                ),
            ],
        )
    }

    #[test]
    fn test_accessors() {
        let config = sample();
        assert_eq!(config.buildkit_host(), "tcp://buildkitd:1234");
        assert!(!config.uses_default_host());
        assert_eq!(config.registry_auth().len(), 2);
        assert_eq!(config.registry_auth()[0].password().expose(), "ghp_token");
    }

    #[test]
    fn test_auth_for_first_match() {
        let config = sample();
        assert_eq!(config.auth_for("ghcr.io").unwrap().username(), "octocat");
        assert!(config.auth_for("docker.io").is_none());
    }

    #[test]
    fn test_password_never_rendered() {
        let config = sample();
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("ghp_token"));

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("ghp_token"));
        assert!(json.contains("\"password\":\"[REDACTED]\""));
        assert!(json.contains("\"username\":\"octocat\""));
    }
}
