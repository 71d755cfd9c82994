//! Provider configuration schema.
//!
//! The schema is static metadata the host uses to check the surface shape of
//! a configuration block (key names, types, required and sensitive markers)
//! before handing the raw values to the validator.

use once_cell::sync::Lazy;
use serde::Serialize;

use super::canonical::DEFAULT_BUILDKIT_HOST;

/// Name of the daemon address attribute.
pub const BUILDKIT_HOST: &str = "buildkit_host";

/// Name of the registry credentials list attribute.
pub const REGISTRY_AUTH: &str = "registry_auth";

static SCHEMA: Lazy<ConfigSchema> = Lazy::new(build_schema);

/// Get the provider configuration schema.
pub fn provider_schema() -> &'static ConfigSchema {
    &SCHEMA
}

/// Value type of a schema attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    /// A single string value.
    String,
    /// An ordered list of nested objects.
    ListNested,
}

/// Whether a value must be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    /// The key must be present.
    Required,
    /// The key may be omitted.
    Optional,
}

/// A single configuration attribute.
#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    /// Attribute key.
    pub name: &'static str,
    /// Value type.
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    /// Required or optional.
    pub presence: Presence,
    /// Value must never be logged or echoed.
    pub sensitive: bool,
    /// Human-readable description.
    pub description: String,
    /// Element shape for `ListNested` attributes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested: Option<NestedObject>,
}

/// Shape of each element of a nested list attribute.
#[derive(Debug, Clone, Serialize)]
pub struct NestedObject {
    /// Attributes of the nested object, in declaration order.
    pub attributes: Vec<Attribute>,
}

/// Top-level configuration schema.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSchema {
    /// Top-level attributes, in declaration order.
    pub attributes: Vec<Attribute>,
}

impl Attribute {
    /// Create an optional, non-sensitive string attribute.
    pub fn string(name: &'static str, description: impl Into<String>) -> Self {
        Self {
            name,
            attribute_type: AttributeType::String,
            presence: Presence::Optional,
            sensitive: false,
            description: description.into(),
            nested: None,
        }
    }

    /// Create an optional list-of-objects attribute.
    pub fn list_nested(
        name: &'static str,
        description: impl Into<String>,
        attributes: Vec<Attribute>,
    ) -> Self {
        Self {
            name,
            attribute_type: AttributeType::ListNested,
            presence: Presence::Optional,
            sensitive: false,
            description: description.into(),
            nested: Some(NestedObject { attributes }),
        }
    }

    /// Mark the attribute as required.
    pub fn required(mut self) -> Self {
        self.presence = Presence::Required;
        self
    }

    /// Mark the attribute as sensitive.
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Check if the attribute is required.
    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }
}

impl NestedObject {
    /// Find a nested attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

impl ConfigSchema {
    /// Find a top-level attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Dotted paths of every sensitive attribute, e.g. `registry_auth.password`.
    pub fn sensitive_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        for attribute in &self.attributes {
            if attribute.sensitive {
                paths.push(attribute.name.to_string());
            }
            if let Some(nested) = &attribute.nested {
                paths.extend(
                    nested
                        .attributes
                        .iter()
                        .filter(|a| a.sensitive)
                        .map(|a| format!("{}.{}", attribute.name, a.name)),
                );
            }
        }
        paths
    }
}

fn build_schema() -> ConfigSchema {
    ConfigSchema {
        attributes: vec![
            Attribute::string(
                BUILDKIT_HOST,
                format!("The address of the BuildKit daemon. Defaults to '{DEFAULT_BUILDKIT_HOST}'."),
            ),
            Attribute::list_nested(
                REGISTRY_AUTH,
                "Authentication configuration for Docker registries.",
                vec![
                    Attribute::string("address", "The address of the Docker registry.").required(),
                    Attribute::string("username", "The username for the Docker registry.")
                        .required(),
                    Attribute::string("password", "The password for the Docker registry.")
                        .required()
                        .sensitive(),
                ],
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buildkit_host_is_optional_string() {
        let attr = provider_schema().attribute(BUILDKIT_HOST).unwrap();
        assert_eq!(attr.attribute_type, AttributeType::String);
        assert!(!attr.is_required());
        assert!(!attr.sensitive);
        assert!(attr.description.contains("unix:///var/run/buildkit/buildkitd.sock"));
    }

    #[test]
    fn test_registry_auth_nested_fields() {
        let attr = provider_schema().attribute(REGISTRY_AUTH).unwrap();
        assert_eq!(attr.attribute_type, AttributeType::ListNested);
        assert!(!attr.is_required());

        let nested = attr.nested.as_ref().unwrap();
        let names: Vec<_> = nested.attributes.iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["address", "username", "password"]);
        assert!(nested.attributes.iter().all(Attribute::is_required));
        assert!(nested.attribute("password").unwrap().sensitive);
        assert!(!nested.attribute("username").unwrap().sensitive);
    }

    #[test]
    fn test_sensitive_paths() {
        assert_eq!(provider_schema().sensitive_paths(), vec!["registry_auth.password"]);
    }

    #[test]
    fn test_unknown_attribute() {
        assert!(provider_schema().attribute("buildkit_port").is_none());
    }

    #[test]
    fn test_schema_is_shared() {
        assert!(std::ptr::eq(provider_schema(), provider_schema()));
    }

    #[test]
    fn test_schema_serialization() {
        let json = serde_json::to_value(provider_schema()).unwrap();
        assert_eq!(json["attributes"][0]["name"], "buildkit_host");
        assert_eq!(json["attributes"][0]["presence"], "optional");
        assert!(json["attributes"][0].get("nested").is_none());
        assert_eq!(json["attributes"][1]["type"], "list_nested");
        assert_eq!(json["attributes"][1]["nested"]["attributes"][2]["sensitive"], true);

        let toml_str = toml::to_string_pretty(provider_schema()).unwrap();
        assert!(toml_str.contains("[[attributes]]"));
        assert!(toml_str.contains("registry_auth"));
    }
}
