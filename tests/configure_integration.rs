//! Integration tests for the provider configure cycle.
//!
//! Drives the provider the way a host runtime does: schema, configure,
//! then capability instantiation with the shared configuration.

use std::sync::{Arc, Mutex};
use std::thread;

use buildkit_provider::registry::CapabilityRegistry;
use buildkit_provider::{
    Capability, CanonicalConfig, DiagnosticKind, Provider, RawConfig, RawRegistryAuth, Resource,
    DEFAULT_BUILDKIT_HOST,
};

fn provider() -> Provider {
    Provider::new("0.0.0-test")
}

#[test]
fn test_default_substitution() {
    let config = provider().configure(&RawConfig::new()).unwrap();
    assert_eq!(config.buildkit_host(), "unix:///var/run/buildkit/buildkitd.sock");
    assert_eq!(DEFAULT_BUILDKIT_HOST, "unix:///var/run/buildkit/buildkitd.sock");
}

#[test]
fn test_pass_through() {
    let raw = RawConfig::from_toml(r#"buildkit_host = "tcp://host:1234""#).unwrap();
    let config = provider().configure(&raw).unwrap();
    assert_eq!(config.buildkit_host(), "tcp://host:1234");
}

#[test]
fn test_complete_entry_accepted() {
    let raw = RawConfig::from_json(
        r#"{"registry_auth": [{"address": "a", "username": "u", "password": "p"}]}"#,
    )
    .unwrap();
    let config = provider().configure(&raw).unwrap();

    assert_eq!(config.registry_auth().len(), 1);
    assert_eq!(config.registry_auth()[0].address(), "a");
    assert_eq!(config.registry_auth()[0].username(), "u");
    assert_eq!(config.registry_auth()[0].password().expose(), "p");
}

#[test]
fn test_incomplete_entry_rejected() {
    let raw = RawConfig::from_yaml("registry_auth:\n  - address: a\n    username: u\n").unwrap();
    let diagnostics = provider().configure(&raw).unwrap_err();

    assert!(diagnostics.has_error());
    assert!(diagnostics.iter().all(|d| d.kind == DiagnosticKind::InvalidRegistryAuth));
}

#[test]
fn test_fail_fast_ordering() {
    let raw = RawConfig::new()
        .with_registry_auth(RawRegistryAuth { password: None, ..RawRegistryAuth::new("a", "u", "p") })
        .with_registry_auth(RawRegistryAuth { username: None, ..RawRegistryAuth::new("b", "u", "p") });
    let diagnostics = provider().configure(&raw).unwrap_err();
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn test_empty_list_idempotence() {
    for raw in [
        RawConfig::new(),
        RawConfig::from_toml("registry_auth = []").unwrap(),
        RawConfig::from_json(r#"{"registry_auth": null}"#).unwrap(),
    ] {
        let config = provider().configure(&raw).unwrap();
        assert!(config.registry_auth().is_empty());
    }
}

#[test]
fn test_registry_emptiness() {
    let provider = provider();
    assert_eq!(provider.resources().len(), 0);
    assert_eq!(provider.data_sources().len(), 0);
    assert_eq!(provider.functions().len(), 0);
}

#[test]
fn test_formats_agree() {
    let toml = RawConfig::from_toml(
        "buildkit_host = \"tcp://x:1\"\n[[registry_auth]]\naddress = \"a\"\nusername = \"u\"\npassword = \"p\"\n",
    )
    .unwrap();
    let json = RawConfig::from_json(
        r#"{"buildkit_host": "tcp://x:1", "registry_auth": [{"address": "a", "username": "u", "password": "p"}]}"#,
    )
    .unwrap();
    let yaml = RawConfig::from_yaml(
        "buildkit_host: tcp://x:1\nregistry_auth:\n  - {address: a, username: u, password: p}\n",
    )
    .unwrap();

    let rendered: Vec<String> = [toml, json, yaml]
        .iter()
        .map(|raw| serde_json::to_string(provider().configure(raw).unwrap().as_ref()).unwrap())
        .collect();
    assert_eq!(rendered[0], rendered[1]);
    assert_eq!(rendered[1], rendered[2]);
}

// ============================================================================
// Capability instantiation
// ============================================================================

struct ImageResource {
    seen_hosts: Arc<Mutex<Vec<String>>>,
    config: Option<Arc<CanonicalConfig>>,
}

impl Capability for ImageResource {
    fn type_name(&self) -> &str {
        "buildkit_image"
    }

    fn configure(&mut self, config: Arc<CanonicalConfig>) {
        self.seen_hosts.lock().unwrap().push(config.buildkit_host().to_string());
        self.config = Some(config);
    }
}

impl Resource for ImageResource {}

#[test]
fn test_capabilities_share_one_config() {
    let seen_hosts = Arc::new(Mutex::new(Vec::new()));
    let factory_hosts = Arc::clone(&seen_hosts);
    let registry = CapabilityRegistry::builder()
        .resource("buildkit_image", move || ImageResource {
            seen_hosts: Arc::clone(&factory_hosts),
            config: None,
        })
        .build();
    let provider = Provider::with_registry("0.0.0-test", registry);

    let config = provider.configure(&RawConfig::new().with_buildkit_host("tcp://shared:1")).unwrap();
    let descriptor = &provider.resources()[0];
    let first = descriptor.instantiate(&config);
    let second = descriptor.instantiate(&config);

    assert_eq!(first.type_name(), "buildkit_image");
    assert_eq!(second.type_name(), "buildkit_image");
    assert_eq!(*seen_hosts.lock().unwrap(), vec!["tcp://shared:1", "tcp://shared:1"]);
    // The caller's handle plus one per instance.
    assert_eq!(Arc::strong_count(&config), 3);
}

#[test]
fn test_concurrent_configure() {
    let provider = Arc::new(provider());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let provider = Arc::clone(&provider);
            thread::spawn(move || {
                let raw = RawConfig::new()
                    .with_buildkit_host(format!("tcp://worker-{i}:1234"))
                    .with_registry_auth(RawRegistryAuth::new(format!("r{i}"), "u", "p"));
                provider.configure(&raw).unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let config = handle.join().unwrap();
        assert_eq!(config.buildkit_host(), format!("tcp://worker-{i}:1234"));
        assert_eq!(config.registry_auth()[0].address(), format!("r{i}"));
    }
}
