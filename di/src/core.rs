//! Core data model: the loader union, the constant wrapper, argument bags,
//! and the shared mutable cell used for by-reference parameters.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::container::Container;
use crate::error::DiError;

/// The type-erased form every service value takes inside the container.
pub type AnyService = dyn Any + Send + Sync;

/// A factory closure bound to the container that invokes it.
///
/// `Arc` rather than `Box` so a registry value-copy made by
/// [`Container::duplicate`] shares the closure instead of requiring it to
/// be re-evaluated.
pub type FactoryFn =
  Arc<dyn Fn(&Container, &Args) -> Result<Arc<AnyService>, DiError> + Send + Sync>;

/// An immutable value holder marking a registered value as a literal.
///
/// Registering a `Constant` says "hand this back verbatim", as opposed to
/// an instance (an object to share) or a class name (a recipe to run).
#[derive(Clone)]
pub struct Constant {
  value: Arc<AnyService>,
}

impl Constant {
  pub fn new<T: Any + Send + Sync>(value: T) -> Self {
    Self {
      value: Arc::new(value),
    }
  }

  /// Wraps an already type-erased value.
  pub fn from_value(value: Arc<AnyService>) -> Self {
    Self { value }
  }

  /// The held value. Cloning the `Arc`, never the payload.
  pub fn value(&self) -> Arc<AnyService> {
    Arc::clone(&self.value)
  }
}

impl fmt::Debug for Constant {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Constant(..)")
  }
}

/// How to produce a service. The variant is fixed at registration time and
/// never changes afterwards.
#[derive(Clone)]
pub enum Loader {
  /// A literal value, returned verbatim and never re-evaluated.
  Constant(Constant),
  /// A pre-built object, returned as-is and never autowired.
  Instance(Arc<AnyService>),
  /// A class name; constructor arguments are supplied at access time.
  Class(String),
  /// A class name plus a preset argument bag embedded at registration.
  ClassWithArgs { class: String, args: Args },
  /// A callable invoked with the container and the caller's arguments.
  Factory(FactoryFn),
}

impl Loader {
  /// A literal value to return verbatim.
  pub fn constant<T: Any + Send + Sync>(value: T) -> Self {
    Loader::Constant(Constant::new(value))
  }

  /// A pre-built object to share as-is.
  pub fn instance<T: Any + Send + Sync>(value: T) -> Self {
    Loader::Instance(Arc::new(value))
  }

  /// A class reference resolved through the blueprint catalog.
  pub fn class(name: impl Into<String>) -> Self {
    Loader::Class(name.into())
  }

  /// A class reference with constructor arguments fixed now.
  pub fn class_with(name: impl Into<String>, args: Args) -> Self {
    Loader::ClassWithArgs {
      class: name.into(),
      args,
    }
  }

  /// A factory closure. The closure receives the invoking container and
  /// the caller-supplied arguments, and produces a fresh value per call.
  pub fn factory<T, F>(f: F) -> Self
  where
    T: Any + Send + Sync,
    F: Fn(&Container, &Args) -> Result<T, DiError> + Send + Sync + 'static,
  {
    Loader::Factory(Arc::new(move |di, args| {
      f(di, args).map(|value| Arc::new(value) as Arc<AnyService>)
    }))
  }
}

impl From<Constant> for Loader {
  fn from(constant: Constant) -> Self {
    Loader::Constant(constant)
  }
}

impl fmt::Debug for Loader {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Loader::Constant(_) => f.write_str("Loader::Constant(..)"),
      Loader::Instance(_) => f.write_str("Loader::Instance(..)"),
      Loader::Class(name) => write!(f, "Loader::Class({name})"),
      Loader::ClassWithArgs { class, args } => {
        write!(f, "Loader::ClassWithArgs({class}, {} args)", args.len())
      }
      Loader::Factory(_) => f.write_str("Loader::Factory(..)"),
    }
  }
}

/// A flat bag of named arguments for constructor matching.
///
/// Values are stored type-erased; store exactly the type the blueprint
/// extracts ([`crate::args!`] and [`Args::insert_str`] help with the
/// common cases).
#[derive(Default, Clone)]
pub struct Args {
  entries: HashMap<String, Arc<AnyService>>,
}

impl Args {
  pub fn new() -> Self {
    Self::default()
  }

  /// Stores `value` under `name`, replacing any previous entry.
  pub fn insert<T: Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) {
    self.entries.insert(name.into(), Arc::new(value));
  }

  /// Stores a string argument as an owned `String`.
  pub fn insert_str(&mut self, name: impl Into<String>, value: &str) {
    self.insert(name, value.to_owned());
  }

  /// Stores an already type-erased value.
  pub fn insert_value(&mut self, name: impl Into<String>, value: Arc<AnyService>) {
    self.entries.insert(name.into(), value);
  }

  pub fn value(&self, name: &str) -> Option<&Arc<AnyService>> {
    self.entries.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.entries.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl fmt::Debug for Args {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set().entries(self.entries.keys()).finish()
  }
}

/// A shared mutable cell for arguments a constructor mutates in place.
///
/// Cloning aliases the same cell, so a mutation made during construction
/// is visible to the caller's own copy of the argument.
pub struct Shared<T> {
  cell: Arc<Mutex<T>>,
}

impl<T> Shared<T> {
  pub fn new(value: T) -> Self {
    Self {
      cell: Arc::new(Mutex::new(value)),
    }
  }

  pub fn lock(&self) -> MutexGuard<'_, T> {
    self.cell.lock()
  }

  pub fn set(&self, value: T) {
    *self.cell.lock() = value;
  }
}

impl<T: Clone> Shared<T> {
  /// A copy of the current value.
  pub fn get(&self) -> T {
    self.cell.lock().clone()
  }
}

impl<T> Clone for Shared<T> {
  fn clone(&self) -> Self {
    Self {
      cell: Arc::clone(&self.cell),
    }
  }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Shared({:?})", &*self.cell.lock())
  }
}
