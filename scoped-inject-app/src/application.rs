//! Core application framework functionality.

use crate::config::{config_provider, ApplicationConfig};
use crate::runner::{ApplicationRunner, RunnerName};
use derive_more::Constructor;
use itertools::Itertools;
use scoped_inject::instance::ErrorPtr;
use scoped_inject::registry::{tag, TypeRegistry};
use scoped_inject::InjectionError;
use std::cmp::Reverse;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Error, Debug)]
pub enum ApplicationError {
    #[error("Error retrieving application config: {0}")]
    ConfigError(ErrorPtr),
    #[error("Cannot inject arguments for runner '{name}': {source}")]
    RunnerInjectionError {
        name: String,
        source: InjectionError,
    },
    #[error("Runner error: {0}")]
    RunnerError(ErrorPtr),
}

/// Main entrypoint for the application. Bootstraps the application and runs
/// [ApplicationRunners](ApplicationRunner).
///
/// All runners share the application root registry, but each one is run within its own child
/// registry, which additionally contains the [RunnerName]. Anything registered in the root registry
/// before running is visible to all runners.
#[derive(Constructor)]
pub struct Application {
    registry: TypeRegistry,
    runners: Vec<ApplicationRunner>,
}

impl Application {
    /// Creates an application with a fresh root registry and no runners.
    pub fn create_default() -> Self {
        Self::new(TypeRegistry::new_root(), vec![])
    }

    pub fn with_runner(mut self, runner: ApplicationRunner) -> Self {
        self.runners.push(runner);
        self
    }

    /// The application root registry.
    #[inline]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Runs all runners in the order of descending priority. Runners with equal priority are run in
    /// the order they were added. Stops on first error.
    pub fn run(&self) -> Result<(), ApplicationError> {
        let config = config_provider(&self.registry)
            .config()
            .map_err(ApplicationError::ConfigError)?;

        if config.install_tracing_logger {
            install_tracing_logger();
        }

        self.registry.register(config, tag::<ApplicationConfig>());

        info!("Running application runners...");

        for runner in self
            .runners
            .iter()
            .sorted_by_key(|runner| Reverse(runner.priority()))
        {
            debug!(
                name = runner.name(),
                priority = runner.priority(),
                "Running runner."
            );

            let scope = self.registry.new_child();
            scope.register(RunnerName::new(runner.name().to_string()), tag::<RunnerName>());

            runner
                .run(&scope)
                .map_err(|source| ApplicationError::RunnerInjectionError {
                    name: runner.name().to_string(),
                    source,
                })?
                .map_err(ApplicationError::RunnerError)?;
        }

        Ok(())
    }
}

fn install_tracing_logger() {
    if let Err(error) = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
    {
        debug!(%error, "Tracing logger already installed.");
    }
}
