//! The main `Container` struct: registry, resolver and scope controller.

use crate::config::{ContainerConfig, DEFAULT_MAX_RESOLUTION_DEPTH};
use crate::contextual::ContextualBindingBuilder;
use crate::error::{ContainerError, Result};
use crate::factory::{Arguments, Constructor, Factory, Injectable};
use crate::id::{ServiceId, Token};
use crate::instance::Instance;
use crate::internal::{Provider, ResolutionGuard};
use crate::lifetime::{EntryKind, Lifetime};
use crate::provider::{self, ServiceProvider};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(1);

/// The service container.
///
/// Holds one registration per identifier (binding, transient, singleton,
/// scoped or raw instance), an alias table and a table of contextual
/// overrides. All methods take `&self`; the container is `Send + Sync` and is
/// meant to be shared behind an `Arc` or a reference.
pub struct Container {
  id: u64,
  name: String,
  max_depth: usize,
  providers: DashMap<ServiceId, Provider>,
  aliases: DashMap<ServiceId, ServiceId>,
  contextual: DashMap<(String, ServiceId), ServiceId>,
  scoped: DashMap<ServiceId, Arc<OnceCell<Instance>>>,
  generation: AtomicU64,
}

impl Default for Container {
  fn default() -> Self {
    Self::with_config(&ContainerConfig::default())
  }
}

impl Container {
  /// Creates a new, empty `Container`.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates an empty container named and limited by `config`.
  ///
  /// Aliases and contextual overrides in the config refer to services that
  /// do not exist yet; install them with [`Container::apply_config`] once
  /// registration is done.
  pub fn with_config(config: &ContainerConfig) -> Self {
    let max_depth = if config.max_resolution_depth == 0 {
      DEFAULT_MAX_RESOLUTION_DEPTH
    } else {
      config.max_resolution_depth
    };
    Self {
      id: NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed),
      name: config.name.clone(),
      max_depth,
      providers: DashMap::new(),
      aliases: DashMap::new(),
      contextual: DashMap::new(),
      scoped: DashMap::new(),
      generation: AtomicU64::new(0),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  // --- PRIVATE HELPERS ---

  fn insert(&self, id: ServiceId, provider: Provider) -> Result<()> {
    match self.providers.entry(id) {
      Entry::Occupied(existing) => Err(ContainerError::DuplicateRegistration {
        id: existing.key().clone(),
        existing: existing.get().kind(),
      }),
      Entry::Vacant(slot) => {
        debug!(
          container = %self.name,
          id = %slot.key(),
          kind = ?provider.kind(),
          "registered service"
        );
        slot.insert(provider);
        Ok(())
      }
    }
  }

  fn enter(&self, id: &ServiceId) -> Result<ResolutionGuard> {
    ResolutionGuard::enter(self.id, id, self.max_depth)
  }

  fn make_id(&self, id: &ServiceId) -> Result<Instance> {
    // Clone the entry out so no map guard is held while a factory runs.
    let provider = self.providers.get(id).map(|p| p.value().clone());

    let Some(provider) = provider else {
      let target = self.aliases.get(id).map(|t| t.value().clone());
      return match target {
        Some(target) => {
          let _guard = self.enter(id)?;
          self.make_id(&target)
        }
        None => Err(ContainerError::UnknownService { id: id.clone() }),
      };
    };

    match provider {
      Provider::Instance(value) => Ok(value),
      Provider::Singleton { cell, factory } => {
        if let Some(value) = cell.get() {
          return Ok(value.clone());
        }
        let _guard = self.enter(id)?;
        cell
          .get_or_try_init(|| {
            trace!(container = %self.name, id = %id, "populating singleton");
            self.invoke(id, &factory)
          })
          .cloned()
      }
      Provider::Scoped(factory) => {
        let cell = self.scoped.entry(id.clone()).or_default().value().clone();
        if let Some(value) = cell.get() {
          return Ok(value.clone());
        }
        let _guard = self.enter(id)?;
        cell
          .get_or_try_init(|| {
            trace!(container = %self.name, id = %id, "populating scoped instance");
            self.invoke(id, &factory)
          })
          .cloned()
      }
      Provider::Transient(factory) | Provider::Binding(factory) => {
        let _guard = self.enter(id)?;
        self.invoke(id, &factory)
      }
    }
  }

  fn invoke(&self, id: &ServiceId, factory: &Factory) -> Result<Instance> {
    match factory {
      Factory::Callable(f) => f(self),
      Factory::Constructor(ctor) => {
        trace!(container = %self.name, id = %id, concrete = ctor.concrete(), "building");
        self.build(ctor)
      }
    }
  }

  fn build(&self, ctor: &Constructor) -> Result<Instance> {
    // Untyped parameters fail the build before any dependency is resolved.
    if let Some(param) = ctor
      .parameters()
      .iter()
      .find(|p| !p.is_variadic() && p.declared_type().is_none())
    {
      return Err(ContainerError::MissingTypeAnnotation {
        concrete: ctor.concrete().to_owned(),
        parameter: param.name().to_owned(),
      });
    }

    let mut args = Arguments::with_capacity(ctor.parameters().len());
    for param in ctor.parameters() {
      let Some(declared) = param.declared_type().filter(|_| !param.is_variadic()) else {
        continue;
      };
      let target = self
        .contextual_target(ctor.concrete(), declared)
        .unwrap_or_else(|| declared.clone());
      let value = self.make_id(&target)?;
      args.insert(param.name(), target, value);
    }
    ctor.build(&args)
  }

  fn contextual_target(&self, concrete: &str, needs: &ServiceId) -> Option<ServiceId> {
    if self.contextual.is_empty() {
      return None;
    }
    self
      .contextual
      .get(&(concrete.to_owned(), needs.clone()))
      .map(|t| t.value().clone())
  }

  pub(crate) fn add_contextual(&self, concrete: String, needs: ServiceId, give: ServiceId) {
    debug!(
      container = %self.name,
      concrete = %concrete,
      needs = %needs,
      give = %give,
      "installed contextual binding"
    );
    self.contextual.insert((concrete, needs), give);
  }

  // --- PUBLIC API ---

  // --- Registration ---

  /// Registers `factory` under `id` with the given lifecycle.
  ///
  /// Fails with `DuplicateRegistration` if `id` is already taken by any kind
  /// of registration, and with `InvalidFactory` if a constructor descriptor
  /// is malformed. The existing registration is left untouched on failure.
  pub fn register(
    &self,
    lifetime: Lifetime,
    id: impl Into<ServiceId>,
    factory: impl Into<Factory>,
  ) -> Result<()> {
    let id = id.into();
    id.validate()?;
    let factory = factory.into();
    if let Factory::Constructor(ctor) = &factory {
      ctor
        .validate()
        .map_err(|reason| ContainerError::InvalidFactory {
          id: id.clone(),
          reason,
        })?;
    }
    self.insert(id, Provider::with_lifetime(lifetime, factory))
  }

  pub fn bind(&self, id: impl Into<ServiceId>, factory: impl Into<Factory>) -> Result<()> {
    self.register(Lifetime::Binding, id, factory)
  }

  pub fn transient(&self, id: impl Into<ServiceId>, factory: impl Into<Factory>) -> Result<()> {
    self.register(Lifetime::Transient, id, factory)
  }

  pub fn singleton(&self, id: impl Into<ServiceId>, factory: impl Into<Factory>) -> Result<()> {
    self.register(Lifetime::Singleton, id, factory)
  }

  pub fn scoped(&self, id: impl Into<ServiceId>, factory: impl Into<Factory>) -> Result<()> {
    self.register(Lifetime::Scoped, id, factory)
  }

  // --- Closure Registration ---
  pub fn transient_fn<T: Any + Send + Sync>(
    &self,
    id: impl Into<ServiceId>,
    factory: impl Fn(&Container) -> Result<T> + Send + Sync + 'static,
  ) -> Result<()> {
    self.transient(id, Factory::callable(factory))
  }

  pub fn singleton_fn<T: Any + Send + Sync>(
    &self,
    id: impl Into<ServiceId>,
    factory: impl Fn(&Container) -> Result<T> + Send + Sync + 'static,
  ) -> Result<()> {
    self.singleton(id, Factory::callable(factory))
  }

  pub fn scoped_fn<T: Any + Send + Sync>(
    &self,
    id: impl Into<ServiceId>,
    factory: impl Fn(&Container) -> Result<T> + Send + Sync + 'static,
  ) -> Result<()> {
    self.scoped(id, Factory::callable(factory))
  }

  // --- Type Registration ---
  // Registered under the unqualified type name, e.g. `"Logger"`.
  pub fn transient_type<T: Injectable>(&self) -> Result<()> {
    self.transient(ServiceId::of::<T>(), Factory::of::<T>())
  }

  pub fn singleton_type<T: Injectable>(&self) -> Result<()> {
    self.singleton(ServiceId::of::<T>(), Factory::of::<T>())
  }

  pub fn scoped_type<T: Injectable>(&self) -> Result<()> {
    self.scoped(ServiceId::of::<T>(), Factory::of::<T>())
  }

  // --- Instance Registration ---

  /// Registers a pre-built value, returned as-is by every `make`.
  pub fn instance<T: Any + Send + Sync>(&self, id: impl Into<ServiceId>, value: T) -> Result<()> {
    self.instance_raw(id, Instance::new(value))
  }

  /// Registers an already shared value, which may be a trait object.
  pub fn instance_arc<T: ?Sized + Any + Send + Sync>(
    &self,
    id: impl Into<ServiceId>,
    value: Arc<T>,
  ) -> Result<()> {
    self.instance_raw(id, Instance::from_arc(value))
  }

  pub fn instance_raw(&self, id: impl Into<ServiceId>, value: Instance) -> Result<()> {
    let id = id.into();
    id.validate()?;
    self.insert(id, Provider::Instance(value))
  }

  // --- Aliases ---

  /// Makes `alias` resolve to whatever `id` resolves to.
  pub fn alias(&self, id: impl Into<ServiceId>, alias: impl Into<ServiceId>) -> Result<()> {
    let id = id.into();
    let alias = alias.into();
    alias.validate()?;
    if !self.has(&id)? {
      return Err(ContainerError::UnknownService { id });
    }
    match self.aliases.entry(alias) {
      Entry::Occupied(existing) => Err(ContainerError::DuplicateAlias {
        alias: existing.key().clone(),
      }),
      Entry::Vacant(slot) => {
        debug!(container = %self.name, alias = %slot.key(), target = %id, "registered alias");
        slot.insert(id);
        Ok(())
      }
    }
  }

  pub fn is_alias(&self, name: &str) -> bool {
    self.aliases.contains_key(name)
  }

  pub fn alias_target(&self, name: &str) -> Option<ServiceId> {
    self.aliases.get(name).map(|t| t.value().clone())
  }

  // --- Contextual Bindings ---

  /// Starts a contextual override for the constructor of `T`.
  ///
  /// ```
  /// # use fibre_container::{Container, injectable};
  /// # use std::sync::Arc;
  /// struct Disk;
  /// struct Memory;
  /// struct Cache { store: Arc<Disk> }
  /// injectable!(Cache { store: Disk });
  ///
  /// let c = Container::new();
  /// c.when::<Cache>().needs("Disk").give("Memory").unwrap();
  /// ```
  pub fn when<T: Injectable>(&self) -> ContextualBindingBuilder<'_> {
    ContextualBindingBuilder::new(self, T::concrete_name())
  }

  /// Starts a contextual override keyed by a constructor's concrete name.
  pub fn when_named(&self, concrete: impl Into<String>) -> ContextualBindingBuilder<'_> {
    ContextualBindingBuilder::new(self, concrete.into())
  }

  // --- Introspection ---

  /// Returns `true` if `id` has a registration of any kind. Aliases are not
  /// registrations.
  pub fn has(&self, id: impl Into<ServiceId>) -> Result<bool> {
    let id = id.into();
    id.validate()?;
    Ok(self.providers.contains_key(&id))
  }

  /// The kind of registration stored under `id`, if any.
  pub fn bound(&self, id: &str) -> Option<EntryKind> {
    self.providers.get(id).map(|p| p.kind())
  }

  /// Number of registrations, aliases excluded.
  pub fn len(&self) -> usize {
    self.providers.len()
  }

  pub fn is_empty(&self) -> bool {
    self.providers.is_empty()
  }

  /// Removes the registration under `id` along with any cached value.
  ///
  /// Aliases pointing at `id` are kept and fail with `UnknownService` until
  /// `id` is registered again. Returns `true` if something was removed.
  pub fn forget(&self, id: &str) -> bool {
    self.scoped.remove(id);
    let removed = self.providers.remove(id).is_some();
    if removed {
      debug!(container = %self.name, id, "forgot service");
    }
    removed
  }

  // --- Resolution ---

  /// Resolves `id` into a value.
  ///
  /// Raw instances are returned directly; singletons and scoped services are
  /// built once and cached; transients and bindings are built every time;
  /// aliases resolve their target. Constructor parameters are resolved
  /// recursively, honouring contextual overrides.
  pub fn make(&self, id: impl Into<ServiceId>) -> Result<Instance> {
    let id = id.into();
    id.validate()?;
    self.make_id(&id)
  }

  /// Resolves `id` and downcasts the value to `T`.
  pub fn resolve<T: ?Sized + Any + Send + Sync>(&self, id: impl Into<ServiceId>) -> Result<Arc<T>> {
    let id = id.into();
    self
      .make(id.clone())?
      .downcast::<T>()
      .ok_or_else(|| ContainerError::TypeMismatch {
        id,
        expected: std::any::type_name::<T>(),
      })
  }

  /// Resolves the service behind a typed token.
  pub fn get<T: ?Sized + Any + Send + Sync>(&self, token: &Token<T>) -> Result<Arc<T>> {
    self.resolve::<T>(token.id().clone())
  }

  // --- Scopes ---

  /// Starts a new scope, discarding every scoped instance of the previous one.
  ///
  /// Singletons, raw instances and registrations are not affected. Must not
  /// run concurrently with resolution belonging to the scope being closed.
  pub fn begin_scope(&self) {
    self.scoped.clear();
    let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
    debug!(container = %self.name, generation, "began scope");
  }

  /// Number of times `begin_scope` has been called.
  pub fn scope_generation(&self) -> u64 {
    self.generation.load(Ordering::Acquire)
  }

  // --- Bootstrap ---

  /// Installs the aliases and contextual overrides listed in `config`.
  pub fn apply_config(&self, config: &ContainerConfig) -> Result<()> {
    for (alias, target) in &config.aliases {
      self.alias(target.as_str(), alias.as_str())?;
    }
    for rule in &config.contextual {
      self
        .when_named(rule.when.as_str())
        .needs(rule.needs.as_str())
        .give(rule.give.as_str())?;
    }
    Ok(())
  }

  /// Registers every provider, then boots them, in bootstrap order.
  pub fn bootstrap(&self, providers: &[Box<dyn ServiceProvider>]) -> Result<()> {
    provider::bootstrap(self, providers)
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Container")
      .field("name", &self.name)
      .field("services", &self.providers.len())
      .field("aliases", &self.aliases.len())
      .field("scope_generation", &self.scope_generation())
      .finish()
  }
}
