use std::any::Any;
use std::error::Error;
#[cfg(not(feature = "threadsafe"))]
use std::rc::Rc;
#[cfg(feature = "threadsafe")]
use std::sync::Arc;

#[cfg(not(feature = "threadsafe"))]
pub type InstancePtr<T> = Rc<T>;
#[cfg(feature = "threadsafe")]
pub type InstancePtr<T> = Arc<T>;

#[cfg(not(feature = "threadsafe"))]
pub type InstanceAnyPtr = InstancePtr<dyn Any + 'static>;
#[cfg(feature = "threadsafe")]
pub type InstanceAnyPtr = InstancePtr<dyn Any + Send + Sync + 'static>;

#[cfg(not(feature = "threadsafe"))]
pub type ErrorPtr = InstancePtr<dyn Error + 'static>;
#[cfg(feature = "threadsafe")]
pub type ErrorPtr = InstancePtr<dyn Error + Send + Sync + 'static>;

/// Marker for types which can be stored in a registry. With the `threadsafe` feature, instances
/// need to be `Send + Sync`.
#[cfg(not(feature = "threadsafe"))]
pub trait Instance: Any {}

/// Marker for types which can be stored in a registry. With the `threadsafe` feature, instances
/// need to be `Send + Sync`.
#[cfg(feature = "threadsafe")]
pub trait Instance: Any + Send + Sync {}

#[cfg(not(feature = "threadsafe"))]
impl<T: Any + ?Sized> Instance for T {}

#[cfg(feature = "threadsafe")]
impl<T: Any + Send + Sync + ?Sized> Instance for T {}
