//! # Fibre Container
//!
//! A thread-safe service container with explicit lifecycles, constructor
//! injection, aliases, contextual bindings and request scopes.
//!
//! ## Core Concepts
//!
//! - **Container**: the registry of services. Construct one per application
//!   (or per test) and pass it around; there is no hidden global.
//! - **Identifiers**: services are keyed by strings such as `"Logger"`.
//!   [`Token<T>`] pairs an identifier with the Rust type stored under it.
//! - **Lifecycles**: bindings and transients are built on every resolution,
//!   singletons once per container, scoped services once per scope, and raw
//!   instances are never built at all.
//! - **Constructors**: a type describes its constructor parameters through
//!   [`Injectable`] (or the [`injectable!`] macro). Each parameter names the
//!   identifier it is resolved from, and contextual bindings can redirect a
//!   single parameter of a single type.
//! - **Scopes**: [`Container::begin_scope`] drops every scoped instance; call
//!   it at the start of each unit of work.
//!
//! Every operation returns a [`Result`]. Duplicate registrations, unknown
//! services, untyped parameters and dependency cycles are reported as
//! [`ContainerError`]s rather than panics.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_container::{injectable, Container};
//! use std::sync::Arc;
//!
//! struct Logger;
//! injectable!(Logger);
//!
//! struct Service {
//!   logger: Arc<Logger>,
//! }
//! injectable!(Service { logger: Logger });
//!
//! # fn main() -> fibre_container::Result<()> {
//! let container = Container::new();
//! container.singleton_type::<Logger>()?;
//! container.transient_type::<Service>()?;
//! container.alias("Logger", "log")?;
//!
//! let first = container.resolve::<Service>("Service")?;
//! let second = container.resolve::<Service>("Service")?;
//!
//! // Two services, one shared logger.
//! assert!(!Arc::ptr_eq(&first, &second));
//! assert!(Arc::ptr_eq(&first.logger, &second.logger));
//! assert!(Arc::ptr_eq(&first.logger, &container.resolve::<Logger>("log")?));
//! # Ok(())
//! # }
//! ```

mod config;
mod container;
mod contextual;
mod error;
mod factory;
mod id;
mod instance;
mod internal;
mod lifetime;
mod macros;
mod provider;

pub use config::{ContainerConfig, ContextualRule, DEFAULT_MAX_RESOLUTION_DEPTH};
pub use container::Container;
pub use contextual::{ContextualBindingBuilder, ContextualNeeds};
pub use error::{BoxError, ContainerError, Result};
pub use factory::{Arguments, Constructor, Factory, Injectable, Parameter};
pub use id::{short_type_name, ServiceId, Token};
pub use instance::Instance;
pub use lifetime::{EntryKind, Lifetime};
pub use provider::ServiceProvider;
