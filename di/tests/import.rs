use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use serde_yaml::Value;
use tether_di::{args, Args, Container, DiError, Loader, Signature};

// --- Test Fixtures ---

struct Logger {
  level: String,
}

struct Pool {
  size: i64,
}

fn define_classes(di: &Container) {
  di.define::<Logger, _>(
    "Logger",
    Signature::new().optional("level", String::from("warn")),
    |args| {
      Ok(Logger {
        level: args.get("level")?,
      })
    },
  );
  di.define::<Pool, _>("Pool", Signature::new().required("size"), |args| {
    Ok(Pool {
      size: args.get("size")?,
    })
  });
}

fn write_definitions(content: &str) -> (tempfile::TempDir, PathBuf) {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("services.yaml");
  fs::write(&path, content).unwrap();
  (dir, path)
}

// --- Happy path ---

#[test]
fn test_import_registers_every_loader_shape() {
  // Arrange
  let (_dir, path) = write_definitions(
    r#"
app_name: { constant: tether }
retries: { constant: 3 }
limits: { constant: { max: 64 } }
logger:
  class: Logger
  args: { level: info }
pool: [ Pool, { size: 8 } ]
"#,
  );
  let di = Container::new();
  define_classes(&di);

  // Act
  di.import(&path).unwrap();

  // Assert: constants convert scalars to native types.
  assert_eq!(*di.get_as::<String>("app_name").unwrap(), "tether");
  assert_eq!(*di.get_as::<i64>("retries").unwrap(), 3);
  assert!(matches!(
    &*di.get_as::<Value>("limits").unwrap(),
    Value::Mapping(_)
  ));

  // Mapping-form class loader carries its preset arguments.
  let logger = di.get_as::<Logger>("logger").unwrap();
  assert_eq!(logger.level, "info");

  // Sequence-form class loader does too, and presets win over callers.
  let pool = di.call_as::<Pool>("pool", &args! { "size" => 999_i64 }).unwrap();
  assert_eq!(pool.size, 8);
}

#[test]
fn test_from_file_builds_a_working_container() {
  // Arrange
  let (_dir, path) = write_definitions("greeting: { constant: hello }\n");

  // Act
  let di = Container::from_file(&path).unwrap();

  // Assert
  assert_eq!(*di.get_as::<String>("greeting").unwrap(), "hello");
}

#[test]
fn test_imported_class_reference_binds_at_access_time() {
  // Arrange
  let (_dir, path) = write_definitions("log: Logger\n");
  let di = Container::new();
  define_classes(&di);
  di.import(&path).unwrap();

  // Act: bare-string loaders take caller arguments per invocation.
  let debug = di
    .call_as::<Logger>("log", &args! { "level" => String::from("debug") })
    .unwrap();
  let fallback = di.call_as::<Logger>("log", &Args::new()).unwrap();

  // Assert
  assert_eq!(debug.level, "debug");
  assert_eq!(fallback.level, "warn");
}

// --- Failure paths ---

#[test]
fn test_import_of_missing_file_fails() {
  let di = Container::new();

  let err = di.import("/definitely/not/here.yaml").unwrap_err();

  assert!(matches!(err, DiError::ResourceNotFound(_)));
}

#[test]
fn test_import_of_unparsable_file_fails() {
  // Arrange: a top-level sequence is not a name-to-loader mapping.
  let (_dir, path) = write_definitions("- a\n- b\n");
  let di = Container::new();

  // Act
  let err = di.import(&path).unwrap_err();

  // Assert
  assert!(matches!(err, DiError::MalformedResource { .. }));
}

#[test]
fn test_bare_scalar_loader_is_rejected() {
  // Arrange: a number can never be a loader; literals need `constant:`.
  let (_dir, path) = write_definitions("answer: 42\n");
  let di = Container::new();

  // Act
  let err = di.import(&path).unwrap_err();

  // Assert
  assert!(matches!(err, DiError::InvalidLoader { service, .. } if service == "answer"));
}

#[test]
fn test_empty_sequence_loader_is_rejected() {
  let (_dir, path) = write_definitions("broken: []\n");
  let di = Container::new();

  let err = di.import(&path).unwrap_err();

  assert!(matches!(err, DiError::InvalidLoader { service, .. } if service == "broken"));
}

#[test]
fn test_unrecognized_mapping_loader_is_rejected() {
  let (_dir, path) = write_definitions("odd: { neither: 1, nor: 2 }\n");
  let di = Container::new();

  let err = di.import(&path).unwrap_err();

  assert!(matches!(err, DiError::InvalidLoader { service, .. } if service == "odd"));
}

#[test]
fn test_import_collides_with_existing_registration() {
  // Arrange
  let (_dir, path) = write_definitions("taken: { constant: 2 }\n");
  let di = Container::new();
  di.register("taken", Loader::constant(1_i64)).unwrap();

  // Act
  let err = di.import(&path).unwrap_err();

  // Assert: imports pass through `register`, so collisions fail the same
  // way and the original registration survives.
  assert!(matches!(err, DiError::DuplicateService(name) if name == "taken"));
  assert_eq!(*di.get_as::<i64>("taken").unwrap(), 1);
}
