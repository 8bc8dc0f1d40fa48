//! # Routebind
//!
//! Declarative controller routing for Rust web applications: describe a
//! controller once (a root mount path, named handler methods carrying route
//! or middleware annotations, optionally a parent to inherit from) and bind
//! the whole set onto a host router in one synchronous pass at bootstrap.
//!
//! ## Features
//!
//! - **Declarative descriptors**: routing metadata lives in an explicit
//!   [`ControllerDef`] built with plain registration calls, not in ad-hoc
//!   attributes on runtime objects
//! - **Controller inheritance**: descriptors form an ancestor chain; an
//!   explicit collector walks it, de-duplicating inherited methods with a
//!   documented, deterministic order
//! - **Host-agnostic binding**: the binder talks to any router through the
//!   [`MountPoint`]/[`SubRouter`] traits; an axum adapter ships in
//!   [`adapter::axum`]
//! - **Fail-fast configuration errors**: a controller with a missing or
//!   malformed root path aborts the whole binding pass before anything is
//!   mounted for it
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use routebind::adapter::axum::{AxumApp, AxumControllerDef, Endpoint};
//! use routebind::bind_controllers;
//!
//! #[derive(Default)]
//! struct UserController;
//!
//! impl UserController {
//!     async fn list(self: Arc<Self>) -> &'static str {
//!         "[]"
//!     }
//! }
//!
//! fn main() -> routebind::Result<()> {
//!     let users = AxumControllerDef::<UserController>::new("UserController")
//!         .root("/users")
//!         .route("list", "/", |controller: &Arc<UserController>| {
//!             let controller = controller.clone();
//!             Endpoint::new(move || async move { controller.list().await })
//!         });
//!
//!     let mut app = AxumApp::new();
//!     bind_controllers(&mut app, &[&users])?;
//!
//!     // Hand the composed router to axum::serve.
//!     let _router = app.into_router();
//!     Ok(())
//! }
//! ```
//!
//! Binding is strictly a bootstrap operation: it runs synchronously, before
//! any request traffic, and mutates the host's routing table without
//! locking. Handlers themselves may be asynchronous; that concurrency
//! belongs entirely to the host framework.

pub mod adapter;
pub mod binder;
pub mod controller;
pub mod error;
pub mod metadata;

// Re-export core types
pub use binder::{Bindable, MountPoint, SubRouter, bind_controllers};
pub use controller::{AnnotationKind, ControllerDef};
pub use error::{BindError, Result};
pub use metadata::{RouteMeta, Verb};

// Re-export commonly used types from dependencies
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use routebind::prelude::*;
/// ```
pub mod prelude {
    pub use crate::adapter::axum::{AxumApp, AxumControllerDef, AxumRouter, Endpoint, Middleware};
    pub use crate::binder::{Bindable, MountPoint, SubRouter, bind_controllers};
    pub use crate::controller::{AnnotationKind, ControllerDef};
    pub use crate::error::{BindError, Result};
    pub use crate::metadata::{RouteMeta, Verb};
}
