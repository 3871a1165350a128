//! Opaque identity of a type, used as the key of registry bindings.

use std::any::{type_name, TypeId};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// Uniquely identifies a type, including unsized `dyn Trait` types. Two identities are equal iff
/// they denote the same type. The type name is kept only for diagnostics.
#[derive(Clone, Copy, Debug)]
pub struct TypeIdentity {
    type_id: TypeId,
    name: &'static str,
}

impl TypeIdentity {
    /// Returns the identity of `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// The underlying [TypeId].
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Human-readable name of the type. Not guaranteed to be unique or stable.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeIdentity {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeIdentity {}

impl Hash for TypeIdentity {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl PartialOrd for TypeIdentity {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeIdentity {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.type_id.cmp(&other.type_id)
    }
}

impl Display for TypeIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}
