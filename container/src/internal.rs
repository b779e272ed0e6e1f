//! Core, non-public data structures for the container.

use crate::error::{ContainerError, Result};
use crate::factory::Factory;
use crate::id::ServiceId;
use crate::instance::Instance;
use crate::lifetime::{EntryKind, Lifetime};
use once_cell::sync::OnceCell;
use std::cell::RefCell;
use std::sync::Arc;

thread_local! {
  // Services currently being resolved on this thread, outermost first. Keyed
  // by container so that separate containers never see each other's frames.
  static RESOLVING_STACK: RefCell<Vec<(u64, ServiceId)>> = const { RefCell::new(Vec::new()) };
}

/// An RAII guard marking a service as "being resolved" on this thread.
///
/// Entering a service already on the stack is a cycle; the error carries the
/// path from the first occurrence back to the repeated service. Dropping the
/// guard pops the frame.
pub(crate) struct ResolutionGuard {
  container: u64,
}

impl ResolutionGuard {
  pub(crate) fn enter(container: u64, id: &ServiceId, max_depth: usize) -> Result<Self> {
    RESOLVING_STACK.with(|stack| {
      let mut stack = stack.borrow_mut();
      let frames = stack.iter().filter(|(c, _)| *c == container);

      let mut depth = 0;
      let mut cycle_start = None;
      for (pos, (_, frame)) in frames.enumerate() {
        depth = pos + 1;
        if cycle_start.is_none() && frame == id {
          cycle_start = Some(pos);
        }
      }

      if let Some(start) = cycle_start {
        let mut path: Vec<ServiceId> = stack
          .iter()
          .filter(|(c, _)| *c == container)
          .skip(start)
          .map(|(_, frame)| frame.clone())
          .collect();
        path.push(id.clone());
        return Err(ContainerError::CyclicDependency { path });
      }
      if depth >= max_depth {
        return Err(ContainerError::ResolutionDepthExceeded {
          id: id.clone(),
          limit: max_depth,
        });
      }

      stack.push((container, id.clone()));
      Ok(Self { container })
    })
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING_STACK.with(|stack| {
      let mut stack = stack.borrow_mut();
      if let Some(pos) = stack.iter().rposition(|(c, _)| *c == self.container) {
        stack.remove(pos);
      }
    });
  }
}

/// A registration entry. One per identifier, so the lifecycle partitions are
/// mutually exclusive by construction.
#[derive(Clone)]
pub(crate) enum Provider {
  Instance(Instance),
  Binding(Arc<Factory>),
  Transient(Arc<Factory>),
  Singleton {
    cell: Arc<OnceCell<Instance>>,
    factory: Arc<Factory>,
  },
  Scoped(Arc<Factory>),
}

impl Provider {
  pub(crate) fn with_lifetime(lifetime: Lifetime, factory: Factory) -> Self {
    let factory = Arc::new(factory);
    match lifetime {
      Lifetime::Binding => Provider::Binding(factory),
      Lifetime::Transient => Provider::Transient(factory),
      Lifetime::Singleton => Provider::Singleton {
        cell: Arc::new(OnceCell::new()),
        factory,
      },
      Lifetime::Scoped => Provider::Scoped(factory),
    }
  }

  pub(crate) fn kind(&self) -> EntryKind {
    match self {
      Provider::Instance(_) => EntryKind::Instance,
      Provider::Binding(_) => EntryKind::Binding,
      Provider::Transient(_) => EntryKind::Transient,
      Provider::Singleton { .. } => EntryKind::Singleton,
      Provider::Scoped(_) => EntryKind::Scoped,
    }
  }
}
