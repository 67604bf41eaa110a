use std::fs;

use tether_di::{Container, DiError, Signature};

struct Logger {
  level: String,
}

fn main() -> Result<(), DiError> {
  // A definition file maps service names to loader specs.
  let dir = tempfile::tempdir().expect("temp dir");
  let path = dir.path().join("services.yaml");
  fs::write(
    &path,
    r#"
app_name: { constant: tether-demo }
logger:
  class: Logger
  args: { level: debug }
"#,
  )
  .expect("write definitions");

  let di = Container::new();
  di.define::<Logger, _>(
    "Logger",
    Signature::new().optional("level", String::from("warn")),
    |args| {
      Ok(Logger {
        level: args.get("level")?,
      })
    },
  );

  // Import registers every entry; collisions fail like direct registration.
  di.import(&path)?;

  let name = di.get_as::<String>("app_name")?;
  let logger = di.get_as::<Logger>("logger")?;
  println!("{} logging at '{}'", name, logger.level);
  assert_eq!(logger.level, "debug");
  Ok(())
}
