//! Error types for registration, resolution, and definition import.

use std::path::PathBuf;

use thiserror::Error;

/// Every failure the container can surface.
///
/// All of these are raised synchronously at the point of violation and are
/// never retried or recovered internally. A failed read-mode resolution
/// leaves nothing behind in the instance cache.
#[derive(Debug, Error)]
pub enum DiError {
  /// A name was registered twice. Registration never overwrites.
  #[error("the service '{0}' is already registered")]
  DuplicateService(String),

  /// A definition file entry could not be classified as any loader shape.
  #[error("incorrect loader format for '{service}': {detail}")]
  InvalidLoader { service: String, detail: String },

  /// The requested name is not present in the registry.
  #[error("service '{0}' does not exist")]
  ServiceNotFound(String),

  /// A constructor parameter had neither a supplied argument nor a default.
  #[error("too few arguments for {class}: parameter '{param}' is not set")]
  MissingArgument { class: String, param: String },

  /// Invoke-mode access to a constant or pre-built instance.
  #[error("service '{0}' cannot be invoked")]
  NotInvocable(String),

  /// Property-style assignment or removal on the registry.
  #[error("the service registry is read-only")]
  ReadOnlyRegistry,

  /// The definition resource does not exist or is not a regular file.
  #[error("definition file `{}` not found", .0.display())]
  ResourceNotFound(PathBuf),

  /// The definition resource exists but could not be parsed.
  #[error("failed to parse definition file `{}`", .path.display())]
  MalformedResource {
    path: PathBuf,
    #[source]
    source: serde_yaml::Error,
  },

  /// A loader names a class with no blueprint in the catalog.
  #[error("no blueprint defined for class '{0}'")]
  UnknownClass(String),

  /// A bound argument did not hold the type the constructor asked for.
  #[error("argument '{param}' of {class} is not a {expected}")]
  ArgumentType {
    class: String,
    param: String,
    expected: &'static str,
  },

  /// A resolved service did not hold the type the caller asked for.
  #[error("service '{service}' is not a {expected}")]
  ServiceType {
    service: String,
    expected: &'static str,
  },
}
