//! The `Container`: a name-keyed service registry with a memoizing
//! read-mode resolver and a factory-style invoke path.

use std::any::{type_name, Any};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use crate::binder::{BoundArgs, Signature, TypeCatalog};
use crate::core::{AnyService, Args, Loader};
use crate::error::DiError;
use crate::import::{DefinitionSource, FileSource};

struct ContainerInner {
  /// Service name to loader. Grows through `register`, never shrinks.
  services: DashMap<String, Loader>,
  /// Service name to resolved value. Populated by read-mode access only.
  instances: DashMap<String, Arc<AnyService>>,
  /// Class name to blueprint, shared with duplicates.
  types: Arc<TypeCatalog>,
}

/// A name-keyed, lazily-resolving dependency injection container.
///
/// Services are registered as [`Loader`]s and produced on first use.
/// Read-mode access ([`Container::get`]) memoizes: the first resolution is
/// cached and every later access returns the same value. Invoke-mode
/// access ([`Container::call`]) constructs fresh every call, so one
/// registry serves both singleton and factory lifetimes.
///
/// `Clone` is cheap and yields a handle to the *same* container; this is
/// what constructors receive through the reserved `di` argument. An
/// independent container with its own singleton lifetimes comes from
/// [`Container::duplicate`].
#[derive(Clone, Default)]
pub struct Container {
  inner: Arc<ContainerInner>,
}

impl Default for ContainerInner {
  fn default() -> Self {
    Self {
      services: DashMap::new(),
      instances: DashMap::new(),
      types: Arc::new(TypeCatalog::default()),
    }
  }
}

impl Container {
  /// Creates an empty container.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a container from an explicit set of definitions.
  pub fn with_definitions<I>(definitions: I) -> Result<Self, DiError>
  where
    I: IntoIterator<Item = (String, Loader)>,
  {
    let di = Self::new();
    for (name, loader) in definitions {
      di.register(name, loader)?;
    }
    Ok(di)
  }

  /// Creates a container by importing a definition file.
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DiError> {
    let di = Self::new();
    di.import(path)?;
    Ok(di)
  }

  // --- Registration ---

  /// Registers a loader under `name`.
  ///
  /// Fails with [`DiError::DuplicateService`] if the name is taken; an
  /// existing registration is never overwritten.
  pub fn register(&self, name: impl Into<String>, loader: Loader) -> Result<(), DiError> {
    let name = name.into();
    match self.inner.services.entry(name.clone()) {
      Entry::Occupied(_) => Err(DiError::DuplicateService(name)),
      Entry::Vacant(slot) => {
        slot.insert(loader);
        debug!(service = name.as_str(), "registered");
        Ok(())
      }
    }
  }

  /// Registers every entry of a definition file. See the `import` module
  /// for the file format.
  pub fn import(&self, path: impl AsRef<Path>) -> Result<(), DiError> {
    self.import_from(&FileSource::new(path))
  }

  /// Registers every entry produced by a definition source.
  pub fn import_from(&self, source: &dyn DefinitionSource) -> Result<(), DiError> {
    let definitions = source.definitions()?;
    debug!(count = definitions.len(), "importing definitions");
    for (name, loader) in definitions {
      self.register(name, loader)?;
    }
    Ok(())
  }

  /// Records a constructor blueprint for `class`, making it available to
  /// [`Loader::class`] and [`Loader::class_with`] registrations on this
  /// container and its duplicates. Redefining a class replaces the
  /// previous blueprint.
  pub fn define<T, F>(&self, class: &str, signature: Signature, construct: F)
  where
    T: Any + Send + Sync,
    F: Fn(&BoundArgs) -> Result<T, DiError> + Send + Sync + 'static,
  {
    self
      .inner
      .types
      .define(class, signature, TypeCatalog::wrap(construct));
  }

  // --- Resolution ---

  /// Read-mode access: resolves `name`, building it on first use and
  /// returning the cached value afterwards.
  ///
  /// The cache is only written after construction fully succeeds, so a
  /// failed resolution leaves no trace and can be retried.
  pub fn get(&self, name: &str) -> Result<Arc<AnyService>, DiError> {
    if let Some(hit) = self.inner.instances.get(name) {
      return Ok(Arc::clone(hit.value()));
    }

    let value = match self.loader(name)? {
      Loader::Constant(constant) => constant.value(),
      Loader::Instance(object) => object,
      Loader::ClassWithArgs { class, args } => self.inner.types.bind(self, &class, &args)?,
      Loader::Class(_) | Loader::Factory(_) => self.call(name, &Args::new())?,
    };

    debug!(service = name, "resolved");
    // Two racing resolvers both construct; the first insert wins and both
    // callers observe the cached value.
    let cached = self
      .inner
      .instances
      .entry(name.to_owned())
      .or_insert(value);
    Ok(Arc::clone(cached.value()))
  }

  /// Invoke-mode access: produces a fresh value on every call, never
  /// consulting or populating the cache.
  ///
  /// Class references bind the caller's arguments; classes registered
  /// with preset arguments ignore the caller's bag entirely; factories
  /// receive the container and the bag. Constants and instances fail with
  /// [`DiError::NotInvocable`].
  pub fn call(&self, name: &str, args: &Args) -> Result<Arc<AnyService>, DiError> {
    match self.loader(name)? {
      Loader::ClassWithArgs { class, args: preset } => {
        self.inner.types.bind(self, &class, &preset)
      }
      Loader::Class(class) => self.inner.types.bind(self, &class, args),
      Loader::Factory(factory) => factory(self, args),
      Loader::Constant(_) | Loader::Instance(_) => Err(DiError::NotInvocable(name.to_owned())),
    }
  }

  /// Read-mode access downcast to a concrete type.
  pub fn get_as<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, DiError> {
    self
      .get(name)?
      .downcast::<T>()
      .map_err(|_| DiError::ServiceType {
        service: name.to_owned(),
        expected: type_name::<T>(),
      })
  }

  /// Invoke-mode access downcast to a concrete type.
  pub fn call_as<T: Any + Send + Sync>(&self, name: &str, args: &Args) -> Result<Arc<T>, DiError> {
    self
      .call(name, args)?
      .downcast::<T>()
      .map_err(|_| DiError::ServiceType {
        service: name.to_owned(),
        expected: type_name::<T>(),
      })
  }

  // --- Registry facade ---

  /// Whether `name` is registered. Cache state is irrelevant.
  pub fn has(&self, name: &str) -> bool {
    self.inner.services.contains_key(name)
  }

  /// Property-style assignment. Always fails: the registry only grows
  /// through [`Container::register`] and [`Container::import`].
  pub fn assign(&self, _name: &str, _value: Arc<AnyService>) -> Result<(), DiError> {
    Err(DiError::ReadOnlyRegistry)
  }

  /// Property-style removal. Always fails: registrations live as long as
  /// the container.
  pub fn unregister(&self, _name: &str) -> Result<(), DiError> {
    Err(DiError::ReadOnlyRegistry)
  }

  // --- Lifecycle ---

  /// Creates an independent container over the same recipes.
  ///
  /// The registry is value-copied as of this moment (later registrations
  /// on either container stay private to it), the instance cache starts
  /// empty so the duplicate gets its own singleton lifetimes, and the
  /// blueprint catalog is shared.
  pub fn duplicate(&self) -> Self {
    let services = DashMap::with_capacity(self.inner.services.len());
    for entry in self.inner.services.iter() {
      services.insert(entry.key().clone(), entry.value().clone());
    }
    Self {
      inner: Arc::new(ContainerInner {
        services,
        instances: DashMap::new(),
        types: Arc::clone(&self.inner.types),
      }),
    }
  }

  fn loader(&self, name: &str) -> Result<Loader, DiError> {
    // Cloned out so no map guard is held while constructing; loaders are
    // Arc-backed and cheap to copy.
    self
      .inner
      .services
      .get(name)
      .map(|entry| entry.value().clone())
      .ok_or_else(|| DiError::ServiceNotFound(name.to_owned()))
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Container")
      .field("services", &self.inner.services.len())
      .field("instances", &self.inner.instances.len())
      .finish()
  }
}
