//! Resolution of named permissions to predicate instances.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::access::{PermissionError, PermissionResult};
use crate::builtin::{AllowAny, IsAdminUser, IsAuthenticated, IsSuperUser};
use crate::chain::PermissionChain;
use crate::predicate::Permission;

/// Factory producing a fresh predicate instance for a registered name.
pub type PermissionFactory = Arc<dyn Fn() -> Arc<dyn Permission> + Send + Sync>;

/// Reference to a permission as declared at tool registration.
///
/// Either a name resolved through the [`PermissionResolver`], or an already
/// constructed predicate carrying configuration (for example
/// `IsResourceOwner::new("author")`).
#[derive(Clone)]
pub enum PermissionSpec {
    /// A globally known permission, resolved by name.
    Named(String),
    /// A concrete predicate instance.
    Instance(Arc<dyn Permission>),
}

impl fmt::Debug for PermissionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Instance(permission) => {
                f.debug_tuple("Instance").field(&permission.label()).finish()
            }
        }
    }
}

impl From<&str> for PermissionSpec {
    fn from(name: &str) -> Self {
        Self::Named(name.to_owned())
    }
}

impl From<String> for PermissionSpec {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<Arc<dyn Permission>> for PermissionSpec {
    fn from(permission: Arc<dyn Permission>) -> Self {
        Self::Instance(permission)
    }
}

impl PermissionSpec {
    /// Wraps a concrete predicate as a spec.
    #[must_use]
    pub fn instance<P>(permission: P) -> Self
    where
        P: Permission + 'static,
    {
        Self::Instance(Arc::new(permission))
    }
}

/// Table mapping permission names to predicate factories.
///
/// Populated with the zero-configuration built-ins; predicates that need
/// constructor arguments (`HasApiKey`, `IsResourceOwner`) are declared as
/// instances or registered under an application-chosen name. Resolution is
/// performed eagerly at tool registration so a dangling name fails startup
/// rather than the first invocation.
#[derive(Clone)]
pub struct PermissionResolver {
    factories: BTreeMap<String, PermissionFactory>,
}

impl fmt::Debug for PermissionResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&String> = self.factories.keys().collect();
        f.debug_struct("PermissionResolver")
            .field("registered", &names)
            .finish()
    }
}

impl PermissionResolver {
    /// Creates an empty resolver with no registered names.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Creates a resolver preloaded with the built-in predicates.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut resolver = Self::empty();
        resolver.register("AllowAny", || Arc::new(AllowAny));
        resolver.register("IsAuthenticated", || Arc::new(IsAuthenticated));
        resolver.register("IsAdminUser", || Arc::new(IsAdminUser));
        resolver.register("IsSuperUser", || Arc::new(IsSuperUser));
        resolver
    }

    /// Registers a factory under the supplied name, replacing any previous
    /// registration of that name.
    pub fn register<F, P>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Arc<P> + Send + Sync + 'static,
        P: Permission + 'static,
    {
        self.factories.insert(
            name.into(),
            Arc::new(move || factory() as Arc<dyn Permission>),
        );
    }

    /// Returns `true` when the name has a registered factory.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Resolves a single spec into a predicate instance.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::UnknownPermission`] for a name with no
    /// registered factory.
    pub fn resolve(&self, spec: &PermissionSpec) -> PermissionResult<Arc<dyn Permission>> {
        match spec {
            PermissionSpec::Instance(permission) => Ok(Arc::clone(permission)),
            PermissionSpec::Named(name) => match self.factories.get(name) {
                Some(factory) => Ok(factory()),
                None => Err(PermissionError::UnknownPermission { name: name.clone() }),
            },
        }
    }

    /// Resolves an ordered spec list into a [`PermissionChain`].
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::UnknownPermission`] on the first unresolved
    /// name; resolution order matches declaration order.
    pub fn resolve_all(&self, specs: &[PermissionSpec]) -> PermissionResult<PermissionChain> {
        let mut permissions = Vec::with_capacity(specs.len());
        for spec in specs {
            permissions.push(self.resolve(spec)?);
        }
        Ok(PermissionChain::new(permissions))
    }
}

impl Default for PermissionResolver {
    fn default() -> Self {
        Self::with_builtins()
    }
}
