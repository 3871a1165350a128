//! Framework configuration is based on an [ApplicationConfigProvider] registered in the root
//! registry, which is later used to retrieve [ApplicationConfig].
//! [Application](crate::application::Application) uses this config to configure itself, and
//! registers it in the root registry, so it can also be injected into any runner.
//!
//! By default, the config is created with opinionated default values, which can then be overwritten
//! by environment variables prefixed with `SCOPED_INJECT_` or `scoped-inject.json` file. To provide
//! your own config, register an [ApplicationConfigProvider] before running the application.

use config::{Config, ConfigError, Environment, File};
#[cfg(test)]
use mockall::automock;
use scoped_inject::injectable;
use scoped_inject::instance::{ErrorPtr, InstancePtr};
use scoped_inject::registry::{tag, TypeRegistry};
use serde::Deserialize;
use std::error::Error;
use tracing::debug;

const CONFIG_ENV_PREFIX: &str = "SCOPED_INJECT";

/// Name of the default config file.
pub const CONFIG_FILE: &str = "scoped-inject.json";

#[cfg(feature = "threadsafe")]
fn convert_error<E: Error + Send + Sync + 'static>(error: E) -> ErrorPtr {
    InstancePtr::new(error) as ErrorPtr
}

#[cfg(not(feature = "threadsafe"))]
fn convert_error<E: Error + 'static>(error: E) -> ErrorPtr {
    InstancePtr::new(error) as ErrorPtr
}

/// Framework configuration which can be provided by an [ApplicationConfigProvider].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApplicationConfig {
    /// Should a default tracing logger be installed in the scope of the application.
    pub install_tracing_logger: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            install_tracing_logger: true,
        }
    }
}

impl From<OptionalApplicationConfig> for ApplicationConfig {
    fn from(value: OptionalApplicationConfig) -> Self {
        let default = Self::default();
        Self {
            install_tracing_logger: value
                .install_tracing_logger
                .unwrap_or(default.install_tracing_logger),
        }
    }
}

impl ApplicationConfig {
    fn init_from_environment() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(CONFIG_ENV_PREFIX))
            .build()
            .and_then(|config| config.try_deserialize::<OptionalApplicationConfig>())
            .map(|config| config.into())
    }
}

/// Provider for [ApplicationConfig]. The provider registered in the application root registry will
/// be used to retrieve application configuration.
#[injectable]
#[cfg_attr(test, automock)]
pub trait ApplicationConfigProvider {
    fn config(&self) -> Result<ApplicationConfig, ErrorPtr>;
}

/// Interface type under which config providers are registered.
#[cfg(feature = "threadsafe")]
pub type DynApplicationConfigProvider = dyn ApplicationConfigProvider + Send + Sync;

/// Interface type under which config providers are registered.
#[cfg(not(feature = "threadsafe"))]
pub type DynApplicationConfigProvider = dyn ApplicationConfigProvider;

pub type ApplicationConfigProviderPtr = InstancePtr<DynApplicationConfigProvider>;

struct DefaultApplicationConfigProvider {
    // cached init result
    config: Result<ApplicationConfig, ErrorPtr>,
}

impl DefaultApplicationConfigProvider {
    fn new() -> Self {
        Self {
            config: ApplicationConfig::init_from_environment().map_err(convert_error),
        }
    }
}

impl ApplicationConfigProvider for DefaultApplicationConfigProvider {
    fn config(&self) -> Result<ApplicationConfig, ErrorPtr> {
        self.config.clone()
    }
}

/// Returns the config provider visible from given registry. If there is none, a default one is
/// registered in the registry first.
pub fn config_provider(registry: &TypeRegistry) -> ApplicationConfigProviderPtr {
    if let Some(provider) = registry.get::<ApplicationConfigProviderPtr>() {
        return provider;
    }

    debug!("Registering default application config provider.");

    let provider: ApplicationConfigProviderPtr =
        InstancePtr::new(DefaultApplicationConfigProvider::new());
    registry.register(provider.clone(), tag::<DynApplicationConfigProvider>());
    provider
}

#[derive(Deserialize)]
struct OptionalApplicationConfig {
    install_tracing_logger: Option<bool>,
}
