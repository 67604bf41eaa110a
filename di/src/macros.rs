//! Public macros for building argument bags and resolving services.

/// Builds an [`crate::Args`] bag from `name => value` pairs.
///
/// Values are stored as the exact type given, which is the type the
/// matching blueprint must extract: pass `String::from("...")` rather
/// than a bare literal when the constructor wants a `String`.
///
/// # Examples
///
/// ```
/// use tether_di::args;
///
/// let args = args! {
///   "dsn" => String::from("postgres://localhost/app"),
///   "pool" => 8_usize,
/// };
/// assert_eq!(args.len(), 2);
/// ```
#[macro_export]
macro_rules! args {
  () => { $crate::Args::new() };
  ($($name:expr => $value:expr),+ $(,)?) => {{
    let mut args = $crate::Args::new();
    $( args.insert($name, $value); )+
    args
  }};
}

/// Resolves a service from a container, panicking if it is missing or of
/// the wrong type.
///
/// This is sugar over [`crate::Container::get_as`] for call sites where a
/// missing dependency is unrecoverable. For a non-panicking version, use
/// `get_as` directly.
///
/// # Panics
///
/// Panics if the service is not registered, fails to construct, or does
/// not hold the requested type.
///
/// # Examples
///
/// ```
/// use tether_di::{resolve, Container, Loader};
///
/// let di = Container::new();
/// di.register("greeting", Loader::constant(String::from("hello"))).unwrap();
///
/// let greeting = resolve!(di, String, "greeting");
/// assert_eq!(*greeting, "hello");
/// ```
#[macro_export]
macro_rules! resolve {
  ($di:expr, $type:ty, $name:expr) => {
    $di.get_as::<$type>($name).unwrap_or_else(|err| {
      panic!(
        "failed to resolve required service '{}' as {}: {}",
        $name,
        std::any::type_name::<$type>(),
        err
      )
    })
  };
}
