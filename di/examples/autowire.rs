use std::sync::Arc;

use tether_di::{args, Container, DiError, Loader, Signature};

struct Database {
  dsn: String,
  pool: usize,
}

struct UserRepo {
  db: Arc<Database>,
}

impl UserRepo {
  fn describe(&self) -> String {
    format!("users via {} ({} connections)", self.db.dsn, self.db.pool)
  }
}

fn main() -> Result<(), DiError> {
  let di = Container::new();

  // --- Blueprints: the constructor metadata the binder works from ---
  di.define::<Database, _>(
    "Database",
    Signature::new().required("dsn").optional("pool", 4_usize),
    |args| {
      Ok(Database {
        dsn: args.get("dsn")?,
        pool: args.get("pool")?,
      })
    },
  );

  // Declaring a parameter named `di` receives the container itself, so a
  // constructor can resolve its own dependencies.
  di.define::<UserRepo, _>("UserRepo", Signature::new().required("di"), |args| {
    let di = args.di()?;
    Ok(UserRepo {
      db: di.get_as::<Database>("database")?,
    })
  });

  // --- Registration ---
  di.register(
    "database",
    Loader::class_with("Database", args! { "dsn" => String::from("postgres://localhost/app") }),
  )?;
  di.register("users", Loader::class("UserRepo"))?;

  // --- Resolution ---
  let users = di.get_as::<UserRepo>("users")?;
  println!("{}", users.describe());

  // The repo's database is the same singleton the container serves.
  let db = di.get_as::<Database>("database")?;
  assert!(Arc::ptr_eq(&users.db, &db));

  // A missing required argument fails, naming the parameter.
  di.register("bare_db", Loader::class("Database"))?;
  match di.get("bare_db") {
    Err(err) => println!("as expected: {err}"),
    Ok(_) => panic!("bare_db should be missing its dsn"),
  }
  Ok(())
}
