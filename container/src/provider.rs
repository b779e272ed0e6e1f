//! Service providers: grouped registration with a separate boot phase.

use crate::container::Container;
use crate::error::Result;
use tracing::debug;

/// A unit of bootstrap work.
///
/// `register` only adds services to the container. `boot` runs after every
/// provider has registered, so it may resolve services from other providers.
pub trait ServiceProvider: Send + Sync {
  /// Name used in log events.
  fn name(&self) -> &str {
    "anonymous"
  }

  /// Providers returning `true` register and boot ahead of all others.
  fn runs_before_bootstrapping(&self) -> bool {
    false
  }

  fn register(&self, container: &Container) -> Result<()>;

  fn boot(&self, _container: &Container) -> Result<()> {
    Ok(())
  }
}

/// Eager providers first, each group in the order given.
fn bootstrap_order(providers: &[Box<dyn ServiceProvider>]) -> Vec<&dyn ServiceProvider> {
  let (eager, rest): (Vec<_>, Vec<_>) = providers
    .iter()
    .map(|p| &**p)
    .partition(|p| p.runs_before_bootstrapping());
  eager.into_iter().chain(rest).collect()
}

pub(crate) fn bootstrap(
  container: &Container,
  providers: &[Box<dyn ServiceProvider>],
) -> Result<()> {
  let ordered = bootstrap_order(providers);

  for provider in &ordered {
    debug!(container = %container.name(), provider = provider.name(), "registering provider");
    provider.register(container)?;
  }
  for provider in &ordered {
    debug!(container = %container.name(), provider = provider.name(), "booting provider");
    provider.boot(container)?;
  }
  Ok(())
}
