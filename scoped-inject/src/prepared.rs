//! Functions prepared for injection. Preparation captures the parameter types of a function once,
//! so the resulting [PreparedFunction] can be invoked with any [TypeRegistry] without inspecting the
//! signature again:
//!
//! ```
//! use scoped_inject::instance::InstancePtr;
//! use scoped_inject::prepared::prepare;
//! use scoped_inject::registry::{tag, TypeRegistry};
//!
//! struct Database {
//!     url: String,
//! }
//!
//! // preparation doesn't need a registry
//! let prepared = prepare(|database: InstancePtr<Database>, user: String| {
//!     format!("{}@{}", user, database.url)
//! })
//! .unwrap();
//!
//! let registry = TypeRegistry::new_root();
//! registry.register(
//!     InstancePtr::new(Database {
//!         url: "localhost".to_string(),
//!     }),
//!     tag::<Database>(),
//! );
//!
//! let request = registry.new_child();
//! request.register("admin".to_string(), tag::<String>());
//!
//! assert_eq!(prepared.invoke(&request).unwrap(), "admin@localhost");
//! ```
//!
//! Any `Fn` with up to 12 parameters can be prepared, as long as all parameter types are
//! [Resolvable]. Multiple results are returned as tuples, in declaration order.

use crate::error::{InjectionError, PrepareError};
use crate::instance::{Instance, InstanceAnyPtr, InstancePtr};
use crate::registry::TypeRegistry;
use crate::type_identity::TypeIdentity;
use derivative::Derivative;
use itertools::Itertools;
use tracing::debug;

/// Type-erased function call: receives resolved arguments in parameter order.
#[cfg(not(feature = "threadsafe"))]
pub type Invoker<R> = InstancePtr<dyn Fn(&[InstanceAnyPtr]) -> Result<R, InjectionError>>;
/// Type-erased function call: receives resolved arguments in parameter order.
#[cfg(feature = "threadsafe")]
pub type Invoker<R> =
    InstancePtr<dyn Fn(&[InstanceAnyPtr]) -> Result<R, InjectionError> + Send + Sync>;

/// Types which can be injected as function parameters. Each parameter is resolved by its own
/// type, so registered instances are cloned on injection - register an
/// [InstancePtr](crate::instance::InstancePtr) to share a single instance.
pub trait Resolvable: Sized + 'static {
    /// The identity this type is resolved by.
    fn identity() -> TypeIdentity;

    /// Extracts a value from a type-erased instance.
    fn from_instance(instance: &InstanceAnyPtr) -> Option<Self>;
}

impl<T: Clone + Instance> Resolvable for T {
    #[inline]
    fn identity() -> TypeIdentity {
        TypeIdentity::of::<T>()
    }

    #[inline]
    fn from_instance(instance: &InstanceAnyPtr) -> Option<Self> {
        instance.downcast_ref::<T>().cloned()
    }
}

/// A function with its parameter types captured, ready to be invoked with values from a
/// [TypeRegistry]. `R` is the function result.
#[derive(Derivative)]
#[derivative(Debug(bound = ""), Clone(bound = ""))]
pub struct PreparedFunction<R> {
    parameter_types: Vec<TypeIdentity>,
    #[derivative(Debug = "ignore")]
    invoker: Invoker<R>,
}

impl<R> PreparedFunction<R> {
    /// Creates a prepared function from an explicit signature and a type-erased invoker. The
    /// invoker will receive one instance per parameter type, in the same order.
    pub fn from_parts(
        parameter_types: Vec<TypeIdentity>,
        invoker: Invoker<R>,
    ) -> Result<Self, PrepareError> {
        if parameter_types.is_empty() {
            return Err(PrepareError::NoParameters);
        }

        Ok(Self {
            parameter_types,
            invoker,
        })
    }

    /// Parameter types in declaration order.
    #[inline]
    pub fn parameter_types(&self) -> &[TypeIdentity] {
        &self.parameter_types
    }

    /// Resolves all parameters from given registry and calls the function. The function is not
    /// called if any parameter cannot be resolved.
    pub fn invoke(&self, registry: &TypeRegistry) -> Result<R, InjectionError> {
        let arguments: Vec<InstanceAnyPtr> = self
            .parameter_types
            .iter()
            .enumerate()
            .map(|(position, identity)| {
                registry.resolve(*identity).ok_or_else(|| {
                    debug!(%identity, position, "Missing binding for parameter.");
                    InjectionError::UnresolvedBinding {
                        identity: *identity,
                        position,
                    }
                })
            })
            .try_collect()?;

        (self.invoker)(&arguments)
    }
}

/// Conversion of functions into [PreparedFunction]s. Implemented for all `Fn`s whose parameters
/// are [Resolvable]; `Args` is a tuple of the parameter types.
pub trait IntoPrepared<Args, R> {
    fn into_prepared(self) -> Result<PreparedFunction<R>, PrepareError>;
}

/// Prepares given function for injection. Functions without parameters are rejected, since there is
/// nothing to inject.
///
/// Only callables can be prepared:
///
/// ```compile_fail
/// use scoped_inject::prepared::prepare;
///
/// let prepared = prepare(1234);
/// ```
///
/// Every parameter needs to be [Resolvable]:
///
/// ```compile_fail
/// use scoped_inject::prepared::prepare;
///
/// struct NotCloneable;
///
/// let prepared = prepare(|_: NotCloneable| {});
/// ```
///
/// Variadic functions are not supported:
///
/// ```compile_fail
/// use scoped_inject::prepared::prepare;
///
/// extern "C" {
///     fn printf(format: *const u8, ...) -> i32;
/// }
///
/// let prepared = prepare(printf);
/// ```
#[inline]
pub fn prepare<Args, R, F: IntoPrepared<Args, R>>(
    function: F,
) -> Result<PreparedFunction<R>, PrepareError> {
    function.into_prepared()
}

fn next_argument<'a, T: Resolvable>(
    arguments: &mut impl Iterator<Item = &'a InstanceAnyPtr>,
) -> Result<T, InjectionError> {
    arguments
        .next()
        .and_then(T::from_instance)
        .ok_or_else(|| InjectionError::IncompatibleInstance(T::identity()))
}

macro_rules! impl_into_prepared {
    ($($param:ident),*) => {
        impl<F, R, $($param,)*> IntoPrepared<($($param,)*), R> for F
        where
            F: Fn($($param),*) -> R + Instance,
            $($param: Resolvable,)*
        {
            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn into_prepared(self) -> Result<PreparedFunction<R>, PrepareError> {
                let invoker = move |arguments: &[InstanceAnyPtr]| -> Result<R, InjectionError> {
                    let mut arguments = arguments.iter();
                    $(
                        let $param = next_argument::<$param>(&mut arguments)?;
                    )*

                    Ok(self($($param),*))
                };

                PreparedFunction::from_parts(
                    vec![$(<$param as Resolvable>::identity()),*],
                    InstancePtr::new(invoker),
                )
            }
        }
    };
}

impl_into_prepared!();
impl_into_prepared!(A1);
impl_into_prepared!(A1, A2);
impl_into_prepared!(A1, A2, A3);
impl_into_prepared!(A1, A2, A3, A4);
impl_into_prepared!(A1, A2, A3, A4, A5);
impl_into_prepared!(A1, A2, A3, A4, A5, A6);
impl_into_prepared!(A1, A2, A3, A4, A5, A6, A7);
impl_into_prepared!(A1, A2, A3, A4, A5, A6, A7, A8);
impl_into_prepared!(A1, A2, A3, A4, A5, A6, A7, A8, A9);
impl_into_prepared!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10);
impl_into_prepared!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11);
impl_into_prepared!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11, A12);
