use crate::type_identity::TypeIdentity;
use thiserror::Error;

/// Errors related to preparing functions for injection.
#[derive(Error, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum PrepareError {
    #[error("Cannot prepare a function without parameters - there is nothing to inject.")]
    NoParameters,
}

/// Errors related to invoking prepared functions.
#[derive(Error, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum InjectionError {
    #[error("A value for '{identity}' (parameter {position}) is not registered in the type registry.")]
    UnresolvedBinding {
        identity: TypeIdentity,
        position: usize,
    },
    #[error("Instance registered for '{0}' cannot be cast to the requested type.")]
    IncompatibleInstance(TypeIdentity),
}
