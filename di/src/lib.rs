//! # Tether DI
//!
//! A name-keyed, lazily-resolving dependency injection container.
//!
//! Services are registered under names as [`Loader`]s: literal values,
//! pre-built objects, class references, class references with preset
//! constructor arguments, or factory closures. Nothing is built until it
//! is first asked for.
//!
//! ## Core Concepts
//!
//! - **Read-mode access** ([`Container::get`]): singleton semantics. The
//!   first access constructs the service, every later access returns the
//!   same cached value.
//! - **Invoke-mode access** ([`Container::call`]): factory semantics. A
//!   fresh value is produced per call from the caller's arguments, and
//!   nothing is cached.
//! - **Autowiring**: class loaders are built through registered
//!   blueprints ([`Container::define`]). The binder matches a flat bag of
//!   named arguments against the blueprint's ordered parameter list,
//!   applies defaults, and injects the container itself under the
//!   reserved `di` argument so constructors can resolve further services.
//! - **Duplication** ([`Container::duplicate`]): an independent container
//!   over the same recipes with its own singleton lifetimes.
//!
//! ## Quick Start
//!
//! ```
//! use tether_di::{args, Container, DiError, Loader, Signature};
//!
//! struct Database {
//!   dsn: String,
//!   pool: usize,
//! }
//!
//! fn main() -> Result<(), DiError> {
//!   let di = Container::new();
//!
//!   // Teach the container how to build a Database.
//!   di.define::<Database, _>(
//!     "Database",
//!     Signature::new().required("dsn").optional("pool", 4_usize),
//!     |args| {
//!       Ok(Database {
//!         dsn: args.get("dsn")?,
//!         pool: args.get("pool")?,
//!       })
//!     },
//!   );
//!
//!   // Register it under a name with preset arguments.
//!   di.register(
//!     "database",
//!     Loader::class_with(
//!       "Database",
//!       args! { "dsn" => String::from("postgres://localhost/app") },
//!     ),
//!   )?;
//!
//!   // First access constructs; later accesses share the same instance.
//!   let db = di.get_as::<Database>("database")?;
//!   assert_eq!(db.dsn, "postgres://localhost/app");
//!   assert_eq!(db.pool, 4);
//!   assert!(std::sync::Arc::ptr_eq(&db, &di.get_as::<Database>("database")?));
//!   Ok(())
//! }
//! ```

mod binder;
mod container;
mod core;
mod error;
mod import;
mod macros;

pub use binder::{BoundArgs, Param, Signature};
pub use container::Container;
pub use crate::core::{AnyService, Args, Constant, FactoryFn, Loader, Shared};
pub use error::DiError;
pub use import::{DefinitionSource, FileSource};
