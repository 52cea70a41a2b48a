//! Component registry and instance factory.
//!
//! Every compiled-in component (reader, filter, learner, evaluator) registers
//! itself into a [`Registry`] together with a declarative description of its
//! constructor parameters. Pipelines are then assembled from textual
//! configuration without any component knowing another's concrete type.
//!
//! # Architecture
//!
//! ```text
//! [ParamDescriptor]* ──► [ComponentDescriptor] ──► Registry::register
//!                                                      │
//! (name, category, raw params) ──► factory::create ────┘──► ComponentHandle
//! ```
//!
//! # Design
//!
//! - **Explicit init order** — the registry is an ordinary value populated by
//!   an explicit start-up step ([`crate::components::register_builtins`]),
//!   never by load-time side effects. After start-up it is only read.
//! - **Declarative schemas** — each component ships a static
//!   [`ParamDescriptor`] table; the registry can render the whole catalog as
//!   JSON declarations for external tooling.
//! - **Recursive construction** — a parameter may itself be a component
//!   (`ParamKind::Component`); the factory resolves it through the same
//!   registry before invoking the outer constructor.

pub mod catalog;
pub mod declaration;
pub mod error;
pub mod factory;
pub mod param;

pub use catalog::{Category, ComponentDescriptor, ComponentFactory, Registry};
pub use declaration::ComponentDeclaration;
pub use error::{RegistryError, RegistryResult};
pub use factory::{create, ComponentSpec, RawParams, RawValue};
pub use param::{DefaultValue, ParamDescriptor, ParamKind, ParamSet, ParamValue};
