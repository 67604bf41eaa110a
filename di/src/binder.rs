//! Constructor signatures, blueprints, and the argument binder.
//!
//! Rust has no runtime constructor reflection, so the catalog here plays
//! the class table: [`crate::Container::define`] records, per class name,
//! an ordered parameter list and a construct closure. Binding walks that
//! list, matches the supplied bag strictly by parameter name, applies
//! defaults, and hands the resulting positional values to the closure.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::container::Container;
use crate::core::{AnyService, Args};
use crate::error::DiError;

/// One constructor parameter, in declared order.
#[derive(Clone)]
pub struct Param {
  name: String,
  default: Option<Arc<AnyService>>,
  aliased: bool,
}

impl Param {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn is_optional(&self) -> bool {
    self.default.is_some()
  }

  /// Whether the parameter expects a [`crate::Shared`] cell it will
  /// mutate in place.
  pub fn is_aliased(&self) -> bool {
    self.aliased
  }
}

impl fmt::Debug for Param {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Param({}", self.name)?;
    if self.default.is_some() {
      f.write_str(", optional")?;
    }
    if self.aliased {
      f.write_str(", aliased")?;
    }
    f.write_str(")")
  }
}

/// The ordered parameter list of a class constructor.
///
/// Parameter order is authoritative for positional construction no matter
/// what order arguments are supplied in. An empty signature means the
/// class takes no constructor arguments.
#[derive(Default, Clone)]
pub struct Signature {
  params: Vec<Param>,
}

impl Signature {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends a required parameter.
  pub fn required(mut self, name: impl Into<String>) -> Self {
    self.params.push(Param {
      name: name.into(),
      default: None,
      aliased: false,
    });
    self
  }

  /// Appends a parameter with a default used when no argument matches.
  ///
  /// The default is stored once; every construction that falls back to it
  /// receives the same shared value.
  pub fn optional<T: Any + Send + Sync>(mut self, name: impl Into<String>, default: T) -> Self {
    self.params.push(Param {
      name: name.into(),
      default: Some(Arc::new(default)),
      aliased: false,
    });
    self
  }

  /// Appends a required parameter taken by mutable alias. The matching
  /// argument should be a [`crate::Shared`] cell; the constructor's
  /// mutations stay visible to the caller.
  pub fn aliased(mut self, name: impl Into<String>) -> Self {
    self.params.push(Param {
      name: name.into(),
      default: None,
      aliased: true,
    });
    self
  }

  pub fn params(&self) -> &[Param] {
    &self.params
  }
}

impl fmt::Debug for Signature {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(self.params.iter()).finish()
  }
}

pub(crate) type ConstructFn =
  Arc<dyn Fn(&BoundArgs) -> Result<Arc<AnyService>, DiError> + Send + Sync>;

/// A registered constructor: signature plus construct closure.
#[derive(Clone)]
pub(crate) struct Blueprint {
  signature: Arc<Signature>,
  construct: ConstructFn,
}

/// The positional argument list the binder produced, with the signature
/// kept alongside so constructors can extract values by parameter name.
pub struct BoundArgs {
  class: String,
  signature: Arc<Signature>,
  values: Vec<Arc<AnyService>>,
}

impl BoundArgs {
  /// Extracts a by-value parameter, cloning the stored value out.
  pub fn get<T: Any + Send + Sync + Clone>(&self, name: &str) -> Result<T, DiError> {
    self
      .value(name)?
      .downcast_ref::<T>()
      .cloned()
      .ok_or_else(|| DiError::ArgumentType {
        class: self.class.clone(),
        param: name.to_owned(),
        expected: type_name::<T>(),
      })
  }

  /// Extracts a parameter as the aliasing `Arc` itself, without cloning
  /// the payload. This is how aliased [`crate::Shared`] cells and other
  /// shared objects are taken.
  pub fn shared<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, DiError> {
    Arc::clone(self.value(name)?)
      .downcast::<T>()
      .map_err(|_| DiError::ArgumentType {
        class: self.class.clone(),
        param: name.to_owned(),
        expected: type_name::<T>(),
      })
  }

  /// The container injected under the reserved `di` key. The signature
  /// must declare a parameter named `di` for the key to be bound.
  pub fn di(&self) -> Result<Container, DiError> {
    self.get::<Container>("di")
  }

  /// Positional access, in signature order.
  pub fn at(&self, index: usize) -> Option<&Arc<AnyService>> {
    self.values.get(index)
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  fn value(&self, name: &str) -> Result<&Arc<AnyService>, DiError> {
    let index = self
      .signature
      .params()
      .iter()
      .position(|param| param.name() == name)
      .ok_or_else(|| DiError::MissingArgument {
        class: self.class.clone(),
        param: name.to_owned(),
      })?;
    Ok(&self.values[index])
  }
}

/// Class name to blueprint. Shared between a container and its duplicates
/// the way a class table is shared by everything in a process.
#[derive(Default)]
pub(crate) struct TypeCatalog {
  blueprints: DashMap<String, Blueprint>,
}

impl TypeCatalog {
  /// Records a blueprint. Redefining a class replaces the previous entry.
  pub(crate) fn define(&self, class: &str, signature: Signature, construct: ConstructFn) {
    debug!(class, "blueprint defined");
    self.blueprints.insert(
      class.to_owned(),
      Blueprint {
        signature: Arc::new(signature),
        construct,
      },
    );
  }

  pub(crate) fn wrap<T, F>(construct: F) -> ConstructFn
  where
    T: Any + Send + Sync,
    F: Fn(&BoundArgs) -> Result<T, DiError> + Send + Sync + 'static,
  {
    Arc::new(move |args| construct(args).map(|value| Arc::new(value) as Arc<AnyService>))
  }

  /// Builds an instance of `class` from a flat bag of named arguments.
  ///
  /// The resolving container is injected into the bag under the reserved
  /// `di` key, overwriting any caller-supplied entry, before matching.
  /// Entries matching no parameter are silently ignored.
  pub(crate) fn bind(
    &self,
    di: &Container,
    class: &str,
    supplied: &Args,
  ) -> Result<Arc<AnyService>, DiError> {
    let blueprint = self
      .blueprints
      .get(class)
      .map(|entry| entry.value().clone())
      .ok_or_else(|| DiError::UnknownClass(class.to_owned()))?;

    let mut named = supplied.clone();
    named.insert("di", di.clone());

    let params = blueprint.signature.params();
    let mut values = Vec::with_capacity(params.len());
    for param in params {
      if let Some(value) = named.value(param.name()) {
        // Forwarding the Arc keeps aliased cells live for the caller.
        values.push(Arc::clone(value));
      } else if let Some(default) = &param.default {
        values.push(Arc::clone(default));
      } else {
        return Err(DiError::MissingArgument {
          class: class.to_owned(),
          param: param.name().to_owned(),
        });
      }
    }

    debug!(class, args = values.len(), "constructing");
    (blueprint.construct)(&BoundArgs {
      class: class.to_owned(),
      signature: Arc::clone(&blueprint.signature),
      values,
    })
  }
}
