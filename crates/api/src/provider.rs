//! Collaborator traits for the program model.
//!
//! These traits abstract away the data source, allowing the hierarchy
//! engine to work with an index, an in-memory snapshot, or mock
//! implementations.

use std::sync::Arc;

use crate::models::{MethodInfo, SearchScope, TypeInfo, TypeRef};

/// Provides type information by FQN.
pub trait TypeProvider: Send + Sync {
    /// Get type info for a fully qualified name, as visible from `scope`.
    ///
    /// Returns `None` if the type is not found.
    fn get_type_info(&self, fqn: &str, scope: &SearchScope) -> Option<Arc<TypeInfo>>;
}

/// Provides the declared (syntactic) supertypes of a type.
pub trait InheritanceProvider: Send + Sync {
    /// The `extends` clause of a class, or the base type of an anonymous class.
    ///
    /// Returns `None` for classes without an explicit superclass and for interfaces.
    fn get_superclass(&self, fqn: &str) -> Option<TypeRef>;

    /// The `implements` clause of a class, or the `extends` clause of an interface.
    fn get_interfaces(&self, fqn: &str) -> Vec<TypeRef>;
}

/// Provides the methods declared directly in a type.
pub trait MemberProvider: Send + Sync {
    /// All methods and constructors declared in the type, in declaration order.
    ///
    /// Does NOT search the inheritance hierarchy.
    fn get_methods(&self, type_fqn: &str) -> Vec<Arc<MethodInfo>>;

    /// Declared methods with the given simple name.
    fn get_methods_by_name(&self, type_fqn: &str, name: &str) -> Vec<Arc<MethodInfo>> {
        self.get_methods(type_fqn)
            .into_iter()
            .filter(|m| m.name == name)
            .collect()
    }
}

/// Exposes the structural modification stamp of the program model.
pub trait ModificationTracker: Send + Sync {
    /// Monotonically increasing counter, advanced on every declaration-affecting change.
    fn modification_count(&self) -> u64;
}

/// The combined program model interface consumed by the hierarchy engine.
pub trait ProgramModel:
    TypeProvider + InheritanceProvider + MemberProvider + ModificationTracker
{
}

// Blanket implementation: any type implementing all four traits is a ProgramModel
impl<T> ProgramModel for T where
    T: TypeProvider + InheritanceProvider + MemberProvider + ModificationTracker
{
}
