//! Service packages - the registration contract between plugins and the host
//!
//! A plugin groups its resource and data source types by cloud service. Each
//! group is a [`ServicePackage`] exposing four tables of factories. SDK-style
//! entries are named by the table; framework-style entries are named by the
//! handler they construct. The host folds all packages into a [`Registry`]
//! and looks handlers up by type name.
//!
//! Handlers are generic over `C`, the connection object the plugin hands to
//! every operation (API clients, region, ...).

use std::collections::{BTreeMap, BTreeSet};

use crate::provider::{BoxFuture, ProviderResult};
use crate::resource::{Resource, State};
use crate::schema::ResourceSchema;

/// CRUD operations for one managed resource type
pub trait ResourceHandler<C>: Send + Sync {
    /// Type name reported by the handler itself.
    ///
    /// Required for framework-style registrations, ignored for SDK-style ones.
    fn type_name(&self) -> Option<&'static str> {
        None
    }

    fn schema(&self) -> ResourceSchema;

    /// Refresh `prior` from the remote API. Returns `State::not_found` when gone.
    fn read<'a>(&'a self, conn: &'a C, prior: &'a State) -> BoxFuture<'a, ProviderResult<State>>;

    fn create<'a>(
        &'a self,
        conn: &'a C,
        resource: &'a Resource,
    ) -> BoxFuture<'a, ProviderResult<State>>;

    fn update<'a>(
        &'a self,
        conn: &'a C,
        from: &'a State,
        to: &'a Resource,
    ) -> BoxFuture<'a, ProviderResult<State>>;

    fn delete<'a>(&'a self, conn: &'a C, state: &'a State) -> BoxFuture<'a, ProviderResult<()>>;
}

/// Read-only lookup for one data source type
pub trait DataSourceHandler<C>: Send + Sync {
    /// See [`ResourceHandler::type_name`]
    fn type_name(&self) -> Option<&'static str> {
        None
    }

    fn schema(&self) -> ResourceSchema;

    fn read<'a>(&'a self, conn: &'a C, config: &'a Resource)
    -> BoxFuture<'a, ProviderResult<State>>;
}

pub type ResourceFactory<C> = fn() -> Box<dyn ResourceHandler<C>>;
pub type DataSourceFactory<C> = fn() -> Box<dyn DataSourceHandler<C>>;

/// Framework-style resource registration; the handler names itself
pub struct FrameworkResource<C> {
    pub factory: ResourceFactory<C>,
}

/// SDK-style resource registration
pub struct SdkResource<C> {
    pub factory: ResourceFactory<C>,
    pub type_name: &'static str,
}

/// Framework-style data source registration; the handler names itself
pub struct FrameworkDataSource<C> {
    pub factory: DataSourceFactory<C>,
}

/// SDK-style data source registration
pub struct SdkDataSource<C> {
    pub factory: DataSourceFactory<C>,
    pub type_name: &'static str,
}

/// Registration table for one cloud service
pub trait ServicePackage<C>: Send + Sync {
    fn framework_data_sources(&self) -> Vec<FrameworkDataSource<C>>;

    fn framework_resources(&self) -> Vec<FrameworkResource<C>>;

    fn sdk_data_sources(&self) -> Vec<SdkDataSource<C>>;

    fn sdk_resources(&self) -> Vec<SdkResource<C>>;

    /// Short service name (e.g., "medialive")
    fn service_package_name(&self) -> &'static str;
}

/// Registry error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("resource type '{type_name}' registered by both '{first}' and '{second}'")]
    DuplicateResource {
        type_name: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("data source type '{type_name}' registered by both '{first}' and '{second}'")]
    DuplicateDataSource {
        type_name: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("framework {kind} registered by '{service}' does not report a type name")]
    MissingTypeName {
        service: &'static str,
        kind: &'static str,
    },
}

struct Registered<H> {
    service: &'static str,
    handler: H,
}

/// All handlers known to the host, keyed by type name
pub struct Registry<C> {
    resources: BTreeMap<String, Registered<Box<dyn ResourceHandler<C>>>>,
    data_sources: BTreeMap<String, Registered<Box<dyn DataSourceHandler<C>>>>,
}

impl<C> Default for Registry<C> {
    fn default() -> Self {
        Self {
            resources: BTreeMap::new(),
            data_sources: BTreeMap::new(),
        }
    }
}

impl<C> Registry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from many service packages
    pub fn from_packages(packages: &[Box<dyn ServicePackage<C>>]) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for package in packages {
            registry.register(package.as_ref())?;
        }
        Ok(registry)
    }

    /// Register every entry of a service package.
    ///
    /// Either all entries are added or, on error, none are.
    pub fn register(&mut self, package: &dyn ServicePackage<C>) -> Result<(), RegistryError> {
        let service = package.service_package_name();

        let mut resources: Vec<(String, Box<dyn ResourceHandler<C>>)> = Vec::new();
        for entry in package.framework_resources() {
            let handler = (entry.factory)();
            let type_name = handler.type_name().ok_or(RegistryError::MissingTypeName {
                service,
                kind: "resource",
            })?;
            resources.push((type_name.to_string(), handler));
        }
        for entry in package.sdk_resources() {
            resources.push((entry.type_name.to_string(), (entry.factory)()));
        }

        let mut data_sources: Vec<(String, Box<dyn DataSourceHandler<C>>)> = Vec::new();
        for entry in package.framework_data_sources() {
            let handler = (entry.factory)();
            let type_name = handler.type_name().ok_or(RegistryError::MissingTypeName {
                service,
                kind: "data source",
            })?;
            data_sources.push((type_name.to_string(), handler));
        }
        for entry in package.sdk_data_sources() {
            data_sources.push((entry.type_name.to_string(), (entry.factory)()));
        }

        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for (type_name, _) in &resources {
            if let Some(existing) = self.resources.get(type_name) {
                return Err(RegistryError::DuplicateResource {
                    type_name: type_name.clone(),
                    first: existing.service,
                    second: service,
                });
            }
            if !seen.insert(type_name.as_str()) {
                return Err(RegistryError::DuplicateResource {
                    type_name: type_name.clone(),
                    first: service,
                    second: service,
                });
            }
        }
        seen.clear();
        for (type_name, _) in &data_sources {
            if let Some(existing) = self.data_sources.get(type_name) {
                return Err(RegistryError::DuplicateDataSource {
                    type_name: type_name.clone(),
                    first: existing.service,
                    second: service,
                });
            }
            if !seen.insert(type_name.as_str()) {
                return Err(RegistryError::DuplicateDataSource {
                    type_name: type_name.clone(),
                    first: service,
                    second: service,
                });
            }
        }

        for (type_name, handler) in resources {
            self.resources
                .insert(type_name, Registered { service, handler });
        }
        for (type_name, handler) in data_sources {
            self.data_sources
                .insert(type_name, Registered { service, handler });
        }

        Ok(())
    }

    pub fn resource(&self, type_name: &str) -> Option<&dyn ResourceHandler<C>> {
        self.resources.get(type_name).map(|r| r.handler.as_ref())
    }

    pub fn data_source(&self, type_name: &str) -> Option<&dyn DataSourceHandler<C>> {
        self.data_sources.get(type_name).map(|r| r.handler.as_ref())
    }

    /// Resource type names in sorted order
    pub fn resource_type_names(&self) -> Vec<&str> {
        self.resources.keys().map(String::as_str).collect()
    }

    /// Data source type names in sorted order
    pub fn data_source_type_names(&self) -> Vec<&str> {
        self.data_sources.keys().map(String::as_str).collect()
    }

    /// Name of the service package that registered a resource or data source type
    pub fn service_of(&self, type_name: &str) -> Option<&'static str> {
        self.resources
            .get(type_name)
            .map(|r| r.service)
            .or_else(|| self.data_sources.get(type_name).map(|r| r.service))
    }
}
