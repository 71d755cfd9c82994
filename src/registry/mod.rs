//! Capability registry.
//!
//! The registry tells the host which operations the provider offers. It holds
//! one ordered list of factories per [`CapabilityKind`]; each list may be
//! empty, which is the normal state until capabilities are implemented.
//!
//! The registry is assembled once with [`RegistryBuilder`] and is read-only
//! afterwards, so it can be shared across threads without locking. It does
//! no validation, caching or deduplication.

mod types;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::config::CanonicalConfig;

pub use types::{Capability, CapabilityKind, DataSource, Function, Resource};

/// Zero-argument factory producing an unconfigured capability instance.
pub type Factory<T> = Arc<dyn Fn() -> Box<T> + Send + Sync>;

/// A named, categorized capability factory.
pub struct CapabilityDescriptor<T: ?Sized> {
    name: String,
    kind: CapabilityKind,
    factory: Factory<T>,
}

impl<T: ?Sized + Capability> CapabilityDescriptor<T> {
    fn new(name: impl Into<String>, kind: CapabilityKind, factory: Factory<T>) -> Self {
        Self { name: name.into(), kind, factory }
    }

    /// Registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Category.
    pub fn kind(&self) -> CapabilityKind {
        self.kind
    }

    /// Invoke the factory without configuring the instance.
    pub fn create(&self) -> Box<T> {
        (self.factory)()
    }

    /// Invoke the factory and inject the canonical configuration.
    pub fn instantiate(&self, config: &Arc<CanonicalConfig>) -> Box<T> {
        let mut capability = self.create();
        capability.configure(Arc::clone(config));
        tracing::debug!(capability = %self.name, kind = %self.kind, "Instantiated capability");
        capability
    }
}

impl<T: ?Sized> Clone for CapabilityDescriptor<T> {
    fn clone(&self) -> Self {
        Self { name: self.name.clone(), kind: self.kind, factory: Arc::clone(&self.factory) }
    }
}

impl<T: ?Sized> fmt::Debug for CapabilityDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Resource factory entry.
pub type ResourceDescriptor = CapabilityDescriptor<dyn Resource>;

/// Data source factory entry.
pub type DataSourceDescriptor = CapabilityDescriptor<dyn DataSource>;

/// Function factory entry.
pub type FunctionDescriptor = CapabilityDescriptor<dyn Function>;

/// Registered capability factories, one ordered list per category.
#[derive(Clone, Default)]
pub struct CapabilityRegistry {
    resources: Vec<ResourceDescriptor>,
    data_sources: Vec<DataSourceDescriptor>,
    functions: Vec<FunctionDescriptor>,
}

impl fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("resources", &self.resources.len())
            .field("data_sources", &self.data_sources.len())
            .field("functions", &self.functions.len())
            .finish()
    }
}

/// Names registered in one category, for listing.
#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub kind: CapabilityKind,
    pub names: Vec<String>,
}

impl CapabilityRegistry {
    /// Create a registry with nothing registered.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Start assembling a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// The capabilities this provider ships. No capability is implemented
    /// yet, so every category is empty.
    pub fn builtin() -> Self {
        Self::builder().build()
    }

    /// Resource factories in registration order.
    pub fn resources(&self) -> &[ResourceDescriptor] {
        &self.resources
    }

    /// Data source factories in registration order.
    pub fn data_sources(&self) -> &[DataSourceDescriptor] {
        &self.data_sources
    }

    /// Function factories in registration order.
    pub fn functions(&self) -> &[FunctionDescriptor] {
        &self.functions
    }

    /// Registered names for a category, in order.
    pub fn names(&self, kind: CapabilityKind) -> Vec<&str> {
        match kind {
            CapabilityKind::Resource => self.resources.iter().map(|d| d.name()).collect(),
            CapabilityKind::DataSource => self.data_sources.iter().map(|d| d.name()).collect(),
            CapabilityKind::Function => self.functions.iter().map(|d| d.name()).collect(),
        }
    }

    /// Number of factories registered for a category.
    pub fn count(&self, kind: CapabilityKind) -> usize {
        match kind {
            CapabilityKind::Resource => self.resources.len(),
            CapabilityKind::DataSource => self.data_sources.len(),
            CapabilityKind::Function => self.functions.len(),
        }
    }

    /// Total number of registered factories.
    pub fn len(&self) -> usize {
        CapabilityKind::ALL.iter().map(|k| self.count(*k)).sum()
    }

    /// Check if nothing is registered in any category.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Per-category listing, in [`CapabilityKind::ALL`] order.
    pub fn summary(&self) -> Vec<CategorySummary> {
        CapabilityKind::ALL
            .iter()
            .map(|kind| CategorySummary {
                kind: *kind,
                names: self.names(*kind).into_iter().map(str::to_string).collect(),
            })
            .collect()
    }
}

/// Builder for [`CapabilityRegistry`].
#[derive(Default)]
pub struct RegistryBuilder {
    registry: CapabilityRegistry,
}

impl RegistryBuilder {
    /// Register a resource factory.
    pub fn resource<F, R>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: Resource + 'static,
    {
        let factory: Factory<dyn Resource> =
            Arc::new(move || -> Box<dyn Resource> { Box::new(factory()) });
        self.registry.resources.push(CapabilityDescriptor::new(
            name,
            CapabilityKind::Resource,
            factory,
        ));
        self
    }

    /// Register a data source factory.
    pub fn data_source<F, D>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> D + Send + Sync + 'static,
        D: DataSource + 'static,
    {
        let factory: Factory<dyn DataSource> =
            Arc::new(move || -> Box<dyn DataSource> { Box::new(factory()) });
        self.registry.data_sources.push(CapabilityDescriptor::new(
            name,
            CapabilityKind::DataSource,
            factory,
        ));
        self
    }

    /// Register a function factory.
    pub fn function<F, G>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> G + Send + Sync + 'static,
        G: Function + 'static,
    {
        let factory: Factory<dyn Function> =
            Arc::new(move || -> Box<dyn Function> { Box::new(factory()) });
        self.registry.functions.push(CapabilityDescriptor::new(
            name,
            CapabilityKind::Function,
            factory,
        ));
        self
    }

    /// Finish assembling the registry.
    pub fn build(self) -> CapabilityRegistry {
        let registry = self.registry;
        tracing::debug!(
            resources = registry.resources.len(),
            data_sources = registry.data_sources.len(),
            functions = registry.functions.len(),
            "Capability registry built"
        );
        registry
    }
}
