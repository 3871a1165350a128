//! A [TypeRegistry] maps [type identities](TypeIdentity) to instances. Registries form a tree:
//! each one can have a parent, which is consulted when a type is not bound locally. This makes it
//! possible to model scopes, e.g. a web server might keep a global registry with all of its
//! singletons and create a child registry per request, holding request-specific values.
//!
//! ## Exposure inference
//!
//! Values are registered together with a [TypeTag], which tells the registry which type the value
//! should be visible as. The resulting binding depends on both the tag and the value, see
//! [Expose]:
//!
//! * an interface tag (`dyn Trait` of a trait marked with `#[injectable]`) exposes the value as
//!   `InstancePtr<dyn Trait>`, regardless if the value is passed directly or as an [InstancePtr]
//! * a concrete tag `T` with an `InstancePtr<T>` value exposes the value as `InstancePtr<T>`, so
//!   every lookup shares the same instance
//! * a concrete tag `T` with a `T` value exposes the value as `T`, so every lookup gets a clone
//!
//! Registering a pointer and requesting a plain value (or the other way around) is a mismatch and
//! results in nothing being found.
//!
//! ## Concurrency
//!
//! Bindings are guarded by a read-write lock, so registering and resolving can happen
//! concurrently. With the `threadsafe` feature, registries are `Send + Sync`.

use crate::instance::{Instance, InstanceAnyPtr, InstancePtr};
use crate::prepared::Resolvable;
use crate::type_identity::TypeIdentity;
use fxhash::FxHashMap;
use std::any::type_name;
use std::fmt::{Debug, Formatter};
use std::iter;
use std::marker::PhantomData;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, trace};

/// Type-only marker telling a registry under which type a value should be exposed. Use [tag] to
/// create one.
pub struct TypeTag<T: ?Sized>(PhantomData<fn() -> *const T>);

impl<T: ?Sized> Clone for TypeTag<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for TypeTag<T> {}

impl<T: ?Sized> Debug for TypeTag<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "TypeTag<{}>", type_name::<T>())
    }
}

/// Creates a [TypeTag] for `T`.
#[inline]
pub fn tag<T: ?Sized>() -> TypeTag<T> {
    TypeTag(PhantomData)
}

/// Exposure inference for a tag type (`Self`) and a registered value type `V`. Interface tags get
/// their implementations from the `#[injectable]` attribute.
pub trait Expose<V> {
    /// The type under which the value will be visible.
    type Exposed: Instance;

    fn expose(value: V) -> Self::Exposed;
}

impl<T: Instance> Expose<T> for T {
    type Exposed = T;

    #[inline]
    fn expose(value: T) -> Self::Exposed {
        value
    }
}

impl<T: Instance + ?Sized> Expose<InstancePtr<T>> for T {
    type Exposed = InstancePtr<T>;

    #[inline]
    fn expose(value: InstancePtr<T>) -> Self::Exposed {
        value
    }
}

#[derive(Clone, Debug)]
enum Binding {
    Instance(InstanceAnyPtr),
    // resolved to the registry holding the binding
    Registry,
}

#[derive(Debug)]
struct RegistryNode {
    bindings: RwLock<FxHashMap<TypeIdentity, Binding>>,
    parent: Option<TypeRegistry>,
}

/// Scoped mapping between types and their instances. Cloning a registry creates a new handle to
/// the same bindings.
///
/// Every registry binds [TypeRegistry] to itself on construction, so prepared functions can
/// request the registry they are invoked with (the nearest one, in case of child registries).
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    node: InstancePtr<RegistryNode>,
}

impl TypeRegistry {
    /// Creates a new registry without a parent.
    pub fn new_root() -> Self {
        Self::with_parent(None)
    }

    /// Creates a child registry. The child sees all bindings of its ancestors, unless they are
    /// shadowed by its own. Registering values in the child never affects the parent.
    pub fn new_child(&self) -> Self {
        trace!("Creating child registry.");
        Self::with_parent(Some(self.clone()))
    }

    fn with_parent(parent: Option<TypeRegistry>) -> Self {
        let registry = Self {
            node: InstancePtr::new(RegistryNode {
                bindings: Default::default(),
                parent,
            }),
        };

        registry.register_self();
        registry
    }

    fn register_self(&self) {
        self.bind(TypeIdentity::of::<TypeRegistry>(), Binding::Registry);
    }

    /// Registers given value under the type inferred from the tag and the value type. Please see
    /// the module documentation for the inference rules. Any existing binding for the same type
    /// in this registry is replaced.
    ///
    /// ```
    /// use scoped_inject::instance::InstancePtr;
    /// use scoped_inject::registry::{tag, TypeRegistry};
    ///
    /// let registry = TypeRegistry::new_root();
    /// registry.register(1234, tag::<i32>());
    /// registry.register(InstancePtr::new(5678u64), tag::<u64>());
    ///
    /// assert_eq!(registry.get::<i32>(), Some(1234));
    /// assert_eq!(registry.get::<u64>(), None);
    /// assert_eq!(registry.get::<InstancePtr<u64>>().as_deref(), Some(&5678));
    /// ```
    ///
    /// The tag needs to be a [TypeTag]:
    ///
    /// ```compile_fail
    /// use scoped_inject::registry::TypeRegistry;
    ///
    /// let registry = TypeRegistry::new_root();
    /// registry.register(5, 5);
    /// ```
    ///
    /// Traits can only be used as tags when marked as `#[injectable]`:
    ///
    /// ```compile_fail
    /// use scoped_inject::registry::{tag, TypeRegistry};
    ///
    /// let registry = TypeRegistry::new_root();
    /// registry.register(5, tag::<dyn std::fmt::Debug + Send + Sync>());
    /// ```
    pub fn register<V, T: Expose<V> + ?Sized>(&self, value: V, _tag: TypeTag<T>) {
        let identity = TypeIdentity::of::<T::Exposed>();
        trace!(%identity, "Registering instance.");

        let instance = InstancePtr::new(T::expose(value)) as InstanceAnyPtr;
        self.bind(identity, Binding::Instance(instance));
    }

    fn bind(&self, identity: TypeIdentity, binding: Binding) {
        let mut bindings = self
            .node
            .bindings
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if bindings.insert(identity, binding).is_some() {
            debug!(%identity, "Replaced existing binding.");
        }
    }

    /// Returns the instance bound to given type in this registry or, if missing, in the nearest
    /// ancestor.
    pub fn resolve(&self, identity: TypeIdentity) -> Option<InstanceAnyPtr> {
        self.ancestors()
            .find_map(|registry| registry.own_instance(identity))
    }

    /// Typesafe version of [TypeRegistry::resolve].
    #[inline]
    pub fn get<T: Resolvable>(&self) -> Option<T> {
        self.resolve(T::identity())
            .as_ref()
            .and_then(T::from_instance)
    }

    /// Checks if given type is bound in this registry or any of its ancestors.
    pub fn is_registered(&self, identity: TypeIdentity) -> bool {
        self.ancestors()
            .any(|registry| registry.has_own_binding(identity))
    }

    #[inline]
    pub fn parent(&self) -> Option<&TypeRegistry> {
        self.node.parent.as_ref()
    }

    /// Checks if both handles point to the same registry.
    #[inline]
    pub fn ptr_eq(&self, other: &TypeRegistry) -> bool {
        InstancePtr::ptr_eq(&self.node, &other.node)
    }

    // this registry first, then the parent chain up to the root
    fn ancestors(&self) -> impl Iterator<Item = &TypeRegistry> {
        iter::successors(Some(self), |registry| registry.parent())
    }

    fn has_own_binding(&self, identity: TypeIdentity) -> bool {
        self.node
            .bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&identity)
    }

    fn own_instance(&self, identity: TypeIdentity) -> Option<InstanceAnyPtr> {
        let bindings = self
            .node
            .bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let instance = bindings.get(&identity).map(|binding| match binding {
            Binding::Instance(instance) => instance.clone(),
            Binding::Registry => InstancePtr::new(self.clone()) as InstanceAnyPtr,
        });
        instance
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new_root()
    }
}

#[cfg(test)]
mod tests {
    use crate::instance::InstancePtr;
    use crate::registry::{tag, TypeRegistry};
    use crate::type_identity::TypeIdentity;
    use std::sync::Mutex;

    #[derive(Clone, Debug, Eq, PartialEq)]
    struct SomeType {
        stuff: String,
    }

    #[test]
    fn should_register_value() {
        let registry = TypeRegistry::new_root();
        registry.register("abc".to_string(), tag::<String>());

        assert_eq!(registry.get::<String>().as_deref(), Some("abc"));
    }

    #[test]
    fn should_register_pointer() {
        let registry = TypeRegistry::new_root();
        let value = InstancePtr::new(SomeType {
            stuff: "foo".to_string(),
        });
        registry.register(value.clone(), tag::<SomeType>());

        let resolved = registry.get::<InstancePtr<SomeType>>().unwrap();
        assert!(InstancePtr::ptr_eq(&value, &resolved));
    }

    #[test]
    fn should_share_pointer_mutations() {
        let registry = TypeRegistry::new_root();
        registry.register(
            InstancePtr::new(Mutex::new(SomeType {
                stuff: "bar".to_string(),
            })),
            tag::<Mutex<SomeType>>(),
        );

        {
            let value = registry.get::<InstancePtr<Mutex<SomeType>>>().unwrap();
            let mut value = value.lock().unwrap();
            assert_eq!(value.stuff, "bar");
            value.stuff = "thing".to_string();
        }

        let value = registry.get::<InstancePtr<Mutex<SomeType>>>().unwrap();
        assert_eq!(value.lock().unwrap().stuff, "thing");
    }

    #[test]
    fn should_not_mix_pointers_and_values() {
        let registry = TypeRegistry::new_root();
        registry.register(
            InstancePtr::new(SomeType {
                stuff: "pointer".to_string(),
            }),
            tag::<SomeType>(),
        );
        registry.register(1, tag::<i32>());

        assert!(registry.get::<SomeType>().is_none());
        assert!(registry.get::<InstancePtr<i32>>().is_none());
    }

    #[test]
    fn should_override_registration() {
        let registry = TypeRegistry::new_root();
        registry.register("foo".to_string(), tag::<String>());
        registry.register("bar".to_string(), tag::<String>());

        assert_eq!(registry.get::<String>().as_deref(), Some("bar"));
    }

    #[test]
    fn should_not_resolve_missing_type() {
        let registry = TypeRegistry::new_root();
        assert!(registry.resolve(TypeIdentity::of::<String>()).is_none());
        assert!(!registry.is_registered(TypeIdentity::of::<String>()));
    }

    #[test]
    fn should_inherit_from_ancestors() {
        let parent = TypeRegistry::new_root();
        let child = parent.new_child();
        let grandchild = child.new_child();
        parent.register("parent".to_string(), tag::<String>());

        assert_eq!(child.get::<String>().as_deref(), Some("parent"));
        assert_eq!(grandchild.get::<String>().as_deref(), Some("parent"));
        assert!(grandchild.is_registered(TypeIdentity::of::<String>()));
    }

    #[test]
    fn should_check_registration_along_ancestors() {
        let root = TypeRegistry::new_root();
        let child = root.new_child();
        let grandchild = child.new_child();
        child.register(1u8, tag::<u8>());

        assert!(grandchild.is_registered(TypeIdentity::of::<u8>()));
        assert!(child.is_registered(TypeIdentity::of::<u8>()));
        assert!(!root.is_registered(TypeIdentity::of::<u8>()));
        assert!(root.is_registered(TypeIdentity::of::<TypeRegistry>()));
        assert_eq!(grandchild.get::<u8>(), Some(1));
        assert!(root.get::<u8>().is_none());
    }

    #[test]
    fn should_not_propagate_to_parent() {
        let parent = TypeRegistry::new_root();
        let child = parent.new_child();
        let grandchild = child.new_child();
        child.register("child".to_string(), tag::<String>());

        assert!(parent.get::<String>().is_none());
        assert_eq!(grandchild.get::<String>().as_deref(), Some("child"));
    }

    #[test]
    fn should_shadow_parent_bindings() {
        let parent = TypeRegistry::new_root();
        let child = parent.new_child();
        let grandchild = child.new_child();
        parent.register("parent".to_string(), tag::<String>());
        child.register("child".to_string(), tag::<String>());

        assert_eq!(parent.get::<String>().as_deref(), Some("parent"));
        assert_eq!(child.get::<String>().as_deref(), Some("child"));
        assert_eq!(grandchild.get::<String>().as_deref(), Some("child"));
    }

    #[test]
    fn should_resolve_nearest_registry() {
        let parent = TypeRegistry::new_root();
        let child = parent.new_child();

        assert!(parent.get::<TypeRegistry>().unwrap().ptr_eq(&parent));
        assert!(child.get::<TypeRegistry>().unwrap().ptr_eq(&child));
        assert!(child.parent().unwrap().ptr_eq(&parent));
        assert!(parent.parent().is_none());
    }

    #[cfg(feature = "threadsafe")]
    #[test]
    fn should_resolve_concurrently() {
        let registry = TypeRegistry::new_root();
        registry.register("shared".to_string(), tag::<String>());
        registry.register(42usize, tag::<usize>());
        let child = registry.new_child();

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..1000 {
                        assert_eq!(child.get::<String>().as_deref(), Some("shared"));
                        assert_eq!(child.get::<usize>(), Some(42));
                    }
                });
            }
        });
    }

    #[cfg(feature = "threadsafe")]
    #[test]
    fn should_register_while_resolving() {
        let registry = TypeRegistry::new_root();
        registry.register(0usize, tag::<usize>());

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for value in 1..=1000usize {
                    registry.register(value, tag::<usize>());
                }
            });

            for _ in 0..4 {
                scope.spawn(|| {
                    let mut last = 0;
                    for _ in 0..1000 {
                        let value = registry.get::<usize>().unwrap();
                        assert!(value >= last);
                        last = value;
                    }
                });
            }
        });

        assert_eq!(registry.get::<usize>(), Some(1000));
    }
}
