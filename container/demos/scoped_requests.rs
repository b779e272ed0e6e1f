use fibre_container::{injectable, resolve, Container};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

struct Database;
injectable!(Database);

static NEXT_REQUEST: AtomicU64 = AtomicU64::new(1);

struct RequestContext {
  id: u64,
}
injectable!(RequestContext = RequestContext {
  id: NEXT_REQUEST.fetch_add(1, Ordering::Relaxed)
});

struct Handler {
  db: Arc<Database>,
  ctx: Arc<RequestContext>,
}
injectable!(Handler { db: Database, ctx: RequestContext });

fn main() -> fibre_container::Result<()> {
  // RUST_LOG=fibre_container=trace shows registration and cache events.
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let container = Container::new();
  container.singleton_type::<Database>()?;
  container.scoped_type::<RequestContext>()?;
  container.transient_type::<Handler>()?;

  for _ in 0..3 {
    // Each incoming unit of work starts a new scope.
    container.begin_scope();

    let first = resolve!(container, Handler)?;
    let second = resolve!(container, Handler)?;

    println!(
      "scope {}: request {} (shared within scope: {}, db shared: {})",
      container.scope_generation(),
      first.ctx.id,
      Arc::ptr_eq(&first.ctx, &second.ctx),
      Arc::ptr_eq(&first.db, &second.db),
    );
  }
  Ok(())
}
