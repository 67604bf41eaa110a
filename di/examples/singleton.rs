use std::sync::Arc;

use tether_di::{Container, DiError, Loader};

// A simple service holding application settings.
struct Settings {
  env: String,
}

fn main() -> Result<(), DiError> {
  let di = Container::new();

  // --- Constant and instance registration ---
  di.register("motd", Loader::constant(String::from("welcome aboard")))?;
  di.register("settings", Loader::instance(Settings { env: "prod".into() }))?;

  // --- Read-mode access: build once, share forever ---
  let s1 = di.get_as::<Settings>("settings")?;
  let s2 = di.get_as::<Settings>("settings")?;
  println!("settings.env = {}", s1.env);
  assert!(
    Arc::ptr_eq(&s1, &s2),
    "read-mode accesses should share one instance"
  );
  println!("Both accesses returned the same instance, as expected.");

  let motd = di.get_as::<String>("motd")?;
  println!("motd = {motd}");

  // --- Duplication: same recipes, fresh singleton lifetimes ---
  let copy = di.duplicate();
  let s3 = copy.get_as::<Settings>("settings")?;
  assert!(
    Arc::ptr_eq(&s1, &s3),
    "a pre-built instance is the recipe itself, so duplicates share it"
  );

  let m2 = copy.get_as::<String>("motd")?;
  println!("duplicate motd = {m2}");
  Ok(())
}
