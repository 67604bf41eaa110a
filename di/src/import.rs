//! Definition import: loading a set of service definitions from a file.
//!
//! A definition file is a YAML mapping of service name to loader spec:
//!
//! ```yaml
//! # class reference, arguments supplied at access time
//! database: Database
//!
//! # class with preset arguments, mapping form
//! logger:
//!   class: Logger
//!   args: { level: info }
//!
//! # class with preset arguments, sequence form
//! pool: [ Pool, { size: 8 } ]
//!
//! # literal values, returned verbatim
//! app_name: { constant: tether }
//! limits: { constant: { max_connections: 64 } }
//! ```
//!
//! Scalar arguments and constants convert to native `String`, `bool`,
//! `i64`, or `f64`; null and composite values stay [`serde_yaml::Value`].
//! Anything that fits none of the shapes above fails with
//! [`DiError::InvalidLoader`].

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use serde_yaml::Value;

use crate::core::{AnyService, Args, Constant, Loader};
use crate::error::DiError;

/// The external collaborator contract: anything that can produce a set of
/// named loaders for bulk registration.
pub trait DefinitionSource {
  fn definitions(&self) -> Result<Vec<(String, Loader)>, DiError>;
}

/// A definition source backed by a YAML file on disk.
pub struct FileSource {
  path: PathBuf,
}

impl FileSource {
  pub fn new(path: impl AsRef<Path>) -> Self {
    Self {
      path: path.as_ref().to_path_buf(),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl DefinitionSource for FileSource {
  fn definitions(&self) -> Result<Vec<(String, Loader)>, DiError> {
    if !self.path.is_file() {
      return Err(DiError::ResourceNotFound(self.path.clone()));
    }
    let text = fs::read_to_string(&self.path)
      .map_err(|_| DiError::ResourceNotFound(self.path.clone()))?;
    let raw: HashMap<String, Value> =
      serde_yaml::from_str(&text).map_err(|source| DiError::MalformedResource {
        path: self.path.clone(),
        source,
      })?;

    let mut definitions = Vec::with_capacity(raw.len());
    for (name, spec) in raw {
      let loader = classify(&name, spec)?;
      definitions.push((name, loader));
    }
    Ok(definitions)
  }
}

/// The mapping form of a class loader: `{ class: Name, args: {...} }`.
#[derive(Deserialize)]
struct ClassSpec {
  class: String,
  #[serde(default)]
  args: HashMap<String, Value>,
}

/// The literal form: `{ constant: <any value> }`.
#[derive(Deserialize)]
struct ConstantSpec {
  constant: Value,
}

/// Classifies one file entry into a loader, structurally, the same way
/// registration fixes a loader's variant once.
fn classify(name: &str, spec: Value) -> Result<Loader, DiError> {
  match spec {
    Value::String(class) => Ok(Loader::Class(class)),
    Value::Mapping(_) => {
      if let Ok(spec) = serde_yaml::from_value::<ConstantSpec>(spec.clone()) {
        return Ok(Loader::Constant(Constant::from_value(to_service_value(
          spec.constant,
        ))));
      }
      match serde_yaml::from_value::<ClassSpec>(spec) {
        Ok(spec) => Ok(Loader::ClassWithArgs {
          class: spec.class,
          args: to_args(spec.args),
        }),
        Err(_) => Err(invalid(name, "mapping must carry a 'class' or 'constant' key")),
      }
    }
    Value::Sequence(mut items) => {
      if items.is_empty() {
        return Err(invalid(name, "sequence loader is empty"));
      }
      let rest = items.split_off(1);
      let class = match items.into_iter().next() {
        Some(Value::String(class)) => class,
        _ => return Err(invalid(name, "sequence loader must start with a class name")),
      };
      let mut args = HashMap::new();
      for item in rest {
        match item {
          Value::Mapping(map) => {
            for (key, value) in map {
              let key = match key {
                Value::String(key) => key,
                other => {
                  return Err(invalid(
                    name,
                    &format!("argument name must be a string, got {other:?}"),
                  ))
                }
              };
              args.insert(key, value);
            }
          }
          other => {
            return Err(invalid(
              name,
              &format!("sequence loader entries must be argument mappings, got {other:?}"),
            ))
          }
        }
      }
      Ok(Loader::ClassWithArgs {
        class,
        args: to_args(args),
      })
    }
    other => Err(invalid(
      name,
      &format!("expected a class name, sequence, or mapping, got {other:?}"),
    )),
  }
}

fn invalid(name: &str, detail: &str) -> DiError {
  DiError::InvalidLoader {
    service: name.to_owned(),
    detail: detail.to_owned(),
  }
}

fn to_args(raw: HashMap<String, Value>) -> Args {
  let mut args = Args::new();
  for (name, value) in raw {
    args.insert_value(name, to_service_value(value));
  }
  args
}

/// Converts a parsed YAML value into a container value. Scalars become
/// native types so blueprints can extract them directly; everything else
/// stays a [`Value`].
fn to_service_value(value: Value) -> Arc<AnyService> {
  match value {
    Value::String(text) => Arc::new(text),
    Value::Bool(flag) => Arc::new(flag),
    Value::Number(number) => {
      if let Some(int) = number.as_i64() {
        Arc::new(int)
      } else if let Some(float) = number.as_f64() {
        Arc::new(float)
      } else {
        Arc::new(Value::Number(number))
      }
    }
    other => Arc::new(other),
  }
}
