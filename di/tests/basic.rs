use std::sync::Arc;

use pretty_assertions::assert_eq;
use tether_di::{args, resolve, Container, DiError, Loader};

// --- Test Fixtures ---

#[derive(Debug, PartialEq, Eq)]
struct AppSettings {
  env: String,
}

// --- Registration ---

#[test]
fn test_register_and_has() {
  // Arrange
  let di = Container::new();

  // Act
  di.register("settings", Loader::constant(AppSettings { env: "prod".into() }))
    .unwrap();

  // Assert: presence checks registry membership, not the cache.
  assert!(di.has("settings"));
  assert!(!di.has("missing"));
}

#[test]
fn test_duplicate_registration_fails_for_any_loader_shape() {
  // Arrange
  let di = Container::new();
  di.register("service", Loader::constant(1_i32)).unwrap();

  // Act: a second registration under the same name, with a different
  // loader shape, must fail and must not overwrite.
  let err = di
    .register("service", Loader::class("SomethingElse"))
    .unwrap_err();

  // Assert
  assert!(matches!(err, DiError::DuplicateService(name) if name == "service"));
  assert_eq!(*di.get_as::<i32>("service").unwrap(), 1);
}

#[test]
fn test_bulk_construction_from_definitions() {
  // Arrange & Act
  let di = Container::with_definitions([
    ("a".to_string(), Loader::constant(10_i32)),
    ("b".to_string(), Loader::constant(20_i32)),
  ])
  .unwrap();

  // Assert
  assert_eq!(*di.get_as::<i32>("a").unwrap(), 10);
  assert_eq!(*di.get_as::<i32>("b").unwrap(), 20);
}

#[test]
fn test_bulk_construction_rejects_colliding_names() {
  let result = Container::with_definitions([
    ("dup".to_string(), Loader::constant(1_i32)),
    ("dup".to_string(), Loader::constant(2_i32)),
  ]);

  assert!(matches!(result, Err(DiError::DuplicateService(_))));
}

// --- Read-mode access ---

#[test]
fn test_constant_resolves_to_identical_value_every_time() {
  // Arrange
  let di = Container::new();
  di.register("settings", Loader::constant(AppSettings { env: "prod".into() }))
    .unwrap();

  // Act
  let first = di.get_as::<AppSettings>("settings").unwrap();
  let second = di.get_as::<AppSettings>("settings").unwrap();

  // Assert: same value, same instance.
  assert_eq!(first.env, "prod");
  assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_instance_is_returned_as_is() {
  // Arrange
  let di = Container::new();
  di.register("prebuilt", Loader::instance(AppSettings { env: "staging".into() }))
    .unwrap();

  // Act
  let first = di.get_as::<AppSettings>("prebuilt").unwrap();
  let second = di.get_as::<AppSettings>("prebuilt").unwrap();

  // Assert
  assert_eq!(*first, AppSettings { env: "staging".into() });
  assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_get_fails_for_unknown_name() {
  let di = Container::new();

  assert!(matches!(
    di.get("nothing_here"),
    Err(DiError::ServiceNotFound(name)) if name == "nothing_here"
  ));
}

#[test]
fn test_get_as_fails_on_type_mismatch() {
  // Arrange
  let di = Container::new();
  di.register("number", Loader::constant(7_i32)).unwrap();

  // Act
  let err = di.get_as::<String>("number").unwrap_err();

  // Assert
  assert!(matches!(err, DiError::ServiceType { service, .. } if service == "number"));
}

// --- Invoke-mode access ---

#[test]
fn test_constants_and_instances_cannot_be_invoked() {
  // Arrange
  let di = Container::new();
  di.register("value", Loader::constant(1_i32)).unwrap();
  di.register("object", Loader::instance(AppSettings { env: "dev".into() }))
    .unwrap();

  // Act & Assert
  assert!(matches!(
    di.call("value", &args! {}),
    Err(DiError::NotInvocable(name)) if name == "value"
  ));
  assert!(matches!(
    di.call("object", &args! {}),
    Err(DiError::NotInvocable(name)) if name == "object"
  ));
}

#[test]
fn test_call_fails_for_unknown_name() {
  let di = Container::new();

  assert!(matches!(
    di.call("nothing_here", &args! {}),
    Err(DiError::ServiceNotFound(_))
  ));
}

// --- Read-only registry surface ---

#[test]
fn test_property_style_mutation_is_rejected() {
  // Arrange
  let di = Container::new();
  di.register("locked", Loader::constant(1_i32)).unwrap();

  // Act & Assert: neither assignment nor removal is possible, whether or
  // not the name exists.
  assert!(matches!(
    di.assign("locked", Arc::new(2_i32)).unwrap_err(),
    DiError::ReadOnlyRegistry
  ));
  assert!(matches!(
    di.assign("fresh", Arc::new(3_i32)).unwrap_err(),
    DiError::ReadOnlyRegistry
  ));
  assert!(matches!(
    di.unregister("locked").unwrap_err(),
    DiError::ReadOnlyRegistry
  ));
  assert!(di.has("locked"));
  assert!(!di.has("fresh"));
}

// --- Macro sugar ---

#[test]
fn test_resolve_macro_returns_typed_service() {
  // Arrange
  let di = Container::new();
  di.register("greeting", Loader::constant(String::from("hello")))
    .unwrap();

  // Act
  let greeting = resolve!(di, String, "greeting");

  // Assert
  assert_eq!(*greeting, "hello");
}

#[test]
#[should_panic(expected = "failed to resolve required service")]
fn test_resolve_macro_panics_on_missing_service() {
  let di = Container::new();
  let _ = resolve!(di, String, "absent");
}
