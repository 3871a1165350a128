//! Runners executing actual application logic.

use derive_more::Constructor;
use scoped_inject::instance::ErrorPtr;
use scoped_inject::prepared::{IntoPrepared, PreparedFunction};
use scoped_inject::registry::TypeRegistry;
use scoped_inject::{InjectionError, PrepareError};

/// Result of running application logic.
pub type RunnerResult = Result<(), ErrorPtr>;

/// Name of the currently executing runner. Available for injection in every runner.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Constructor)]
pub struct RunnerName(pub String);

/// Runs application logic, in the form of a prepared function. Runners are run by the
/// [Application](crate::application::Application), each with its own child registry.
#[derive(Clone, Debug)]
pub struct ApplicationRunner {
    name: String,
    priority: i8,
    function: PreparedFunction<RunnerResult>,
}

impl ApplicationRunner {
    /// Prepares given function as a runner with the default priority.
    pub fn new<Args, F: IntoPrepared<Args, RunnerResult>>(
        name: impl Into<String>,
        function: F,
    ) -> Result<Self, PrepareError> {
        function
            .into_prepared()
            .map(|function| Self::from_prepared(name, function))
    }

    pub fn from_prepared(name: impl Into<String>, function: PreparedFunction<RunnerResult>) -> Self {
        Self {
            name: name.into(),
            priority: 0,
            function,
        }
    }

    /// Sets the priority for this runner. Higher priorities get run first. Default 0.
    pub fn with_priority(mut self, priority: i8) -> Self {
        self.priority = priority;
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn priority(&self) -> i8 {
        self.priority
    }

    /// Runs the application code with arguments injected from given registry.
    pub fn run(&self, registry: &TypeRegistry) -> Result<RunnerResult, InjectionError> {
        self.function.invoke(registry)
    }
}

#[cfg(test)]
mod tests {
    use crate::runner::{ApplicationRunner, RunnerResult};
    use scoped_inject::registry::{tag, TypeRegistry};
    use scoped_inject::PrepareError;

    #[test]
    fn should_run_prepared_function() {
        let runner =
            ApplicationRunner::new("test", |value: i32| -> RunnerResult {
                assert_eq!(value, 5);
                Ok(())
            })
            .unwrap()
            .with_priority(3);

        let registry = TypeRegistry::new_root();
        registry.register(5, tag::<i32>());

        assert_eq!(runner.name(), "test");
        assert_eq!(runner.priority(), 3);
        assert!(runner.run(&registry).unwrap().is_ok());
    }

    #[test]
    fn should_reject_runner_without_parameters() {
        assert_eq!(
            ApplicationRunner::new("test", || -> RunnerResult { Ok(()) }).unwrap_err(),
            PrepareError::NoParameters
        );
    }
}
