use std::sync::Arc;

use tether_di::{args, Container, DiError, Loader};

struct Job {
  queue: String,
  payload: String,
}

fn main() -> Result<(), DiError> {
  let di = Container::new();

  di.register("default_queue", Loader::constant(String::from("background")))?;

  // A factory closure receives the container and the caller's arguments,
  // and produces a fresh value on every invocation.
  di.register(
    "job",
    Loader::factory(|di, args| {
      let queue = match args.value("queue") {
        Some(value) => value
          .downcast_ref::<String>()
          .cloned()
          .unwrap_or_default(),
        None => di.get_as::<String>("default_queue")?.as_ref().clone(),
      };
      let payload = match args.value("payload") {
        Some(value) => value.downcast_ref::<String>().cloned().unwrap_or_default(),
        None => String::new(),
      };
      Ok(Job { queue, payload })
    }),
  )?;

  // --- Invoke-mode access: factory semantics ---
  let a = di.call_as::<Job>("job", &args! { "payload" => String::from("send-email") })?;
  let b = di.call_as::<Job>(
    "job",
    &args! {
      "queue" => String::from("critical"),
      "payload" => String::from("rotate-keys"),
    },
  )?;

  println!("job a: {} on '{}'", a.payload, a.queue);
  println!("job b: {} on '{}'", b.payload, b.queue);
  assert_eq!(a.queue, "background");
  assert_eq!(b.queue, "critical");
  assert!(
    !Arc::ptr_eq(&a, &b),
    "invoke-mode results are independently constructed"
  );

  // --- Read-mode access to the same service: singleton semantics ---
  let s1 = di.get_as::<Job>("job")?;
  let s2 = di.get_as::<Job>("job")?;
  assert!(Arc::ptr_eq(&s1, &s2));
  println!("read-mode job shares one instance; invoke-mode never does.");
  Ok(())
}
