//! Type-based dependency injection with hierarchical registries.
//!
//! Values are registered in a [TypeRegistry](registry::TypeRegistry) under a type identity
//! inferred from a [type tag](registry::tag). Ordinary functions are then
//! [prepared](prepared::prepare) once and invoked any number of times against any registry, with
//! their arguments resolved by declared parameter type:
//!
//! ```
//! use scoped_inject::prepared::prepare;
//! use scoped_inject::registry::{tag, TypeRegistry};
//!
//! let registry = TypeRegistry::new_root();
//! registry.register("abc".to_string(), tag::<String>());
//!
//! let prepared = prepare(|value: String| value.len()).unwrap();
//! assert_eq!(prepared.invoke(&registry).unwrap(), 3);
//! ```
//!
//! Registries form a tree: a [child](registry::TypeRegistry::new_child) sees all values of its
//! ancestors and can shadow them, which makes it easy to model scopes, e.g. a global registry with
//! per-request children.
//!
//! ### Features
//!
//! * `threadsafe` - use threadsafe pointers and `Send + Sync` trait bounds
//! * `derive` - enable the [injectable] attribute for interface traits

extern crate self as scoped_inject;

mod error;
pub mod instance;
pub mod prepared;
pub mod registry;
pub mod type_identity;

pub use error::{InjectionError, PrepareError};

#[cfg(feature = "derive")]
pub use scoped_inject_derive::injectable;
