//! Axum host adapter.
//!
//! Controllers bound through [`AxumApp`] end up as ordinary `axum::Router`
//! routes: each controller becomes a nested router under its root path,
//! route methods become method-filtered services, and middleware methods
//! become tower layers over every route in the nest.

use std::convert::Infallible;
use std::mem;

use axum::Router;
use axum::extract::Request;
use axum::handler::Handler;
use axum::response::{IntoResponse, Response};
use axum::routing::{self, MethodFilter, Route};
use tower::util::BoxCloneSyncService;
use tower::{Layer, Service};

use crate::binder::{MountPoint, SubRouter};
use crate::controller::ControllerDef;
use crate::error::{BindError, Result};
use crate::metadata::Verb;

/// Controller descriptor bound to the axum handler types.
pub type AxumControllerDef<C> = ControllerDef<C, Endpoint, Middleware>;

/// A type-erased route handler.
///
/// Erasure keeps [`ControllerDef`] method entries homogeneous: any axum
/// handler, whatever its extractor signature, boxes down to the same service
/// type.
#[derive(Clone)]
pub struct Endpoint(BoxCloneSyncService<Request, Response, Infallible>);

impl Endpoint {
    pub fn new<H, T>(handler: H) -> Self
    where
        H: Handler<T, ()> + Clone + Send + Sync + 'static,
        T: 'static,
    {
        Self(BoxCloneSyncService::new(handler.with_state(())))
    }
}

/// A type-erased middleware registration, applied to the controller's
/// sub-router as a tower layer.
pub struct Middleware(Box<dyn FnOnce(Router) -> Router + Send>);

impl Middleware {
    /// Wraps any layer accepted by `Router::layer`, most usefully
    /// `axum::middleware::from_fn`.
    pub fn layer<L>(layer: L) -> Self
    where
        L: Layer<Route> + Clone + Send + Sync + 'static,
        L::Service: Service<Request> + Clone + Send + Sync + 'static,
        <L::Service as Service<Request>>::Response: IntoResponse + 'static,
        <L::Service as Service<Request>>::Error: Into<Infallible> + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        Self(Box::new(move |router| router.layer(layer)))
    }
}

/// Sub-router scoped to one controller.
#[derive(Default)]
pub struct AxumRouter {
    router: Router,
    middleware: Vec<Middleware>,
}

impl AxumRouter {
    /// Collapses into a plain `axum::Router`, applying buffered middleware.
    ///
    /// Layers are applied in reverse registration order so the
    /// first-registered middleware ends up outermost and runs first, the
    /// order `use` implies on routers that execute middleware in
    /// registration order.
    fn into_router(self) -> Router {
        let mut router = self.router;
        for middleware in self.middleware.into_iter().rev() {
            router = (middleware.0)(router);
        }
        router
    }
}

impl SubRouter for AxumRouter {
    type Endpoint = Endpoint;
    type Middleware = Middleware;

    fn install_middleware(&mut self, handler: Middleware) {
        // Buffered: axum layers only wrap routes that already exist, and the
        // binder installs middleware before any route. Application is
        // deferred to mount time in into_router.
        self.middleware.push(handler);
    }

    fn install_route(&mut self, verb: &Verb, path: &str, handler: Endpoint) -> Result<()> {
        let method_router = match verb.as_str() {
            "all" => routing::any_service(handler.0),
            other => {
                let filter = method_filter(other).ok_or_else(|| BindError::UnsupportedVerb {
                    verb: other.to_owned(),
                    path: path.to_owned(),
                })?;
                routing::on_service(filter, handler.0)
            }
        };
        self.router = mem::take(&mut self.router).route(path, method_router);
        Ok(())
    }
}

fn method_filter(verb: &str) -> Option<MethodFilter> {
    match verb {
        "get" => Some(MethodFilter::GET),
        "post" => Some(MethodFilter::POST),
        "put" => Some(MethodFilter::PUT),
        "delete" => Some(MethodFilter::DELETE),
        "patch" => Some(MethodFilter::PATCH),
        "head" => Some(MethodFilter::HEAD),
        "options" => Some(MethodFilter::OPTIONS),
        "trace" => Some(MethodFilter::TRACE),
        "connect" => Some(MethodFilter::CONNECT),
        _ => None,
    }
}

/// Host application wrapper implementing [`MountPoint`] over `axum::Router`.
#[derive(Default)]
pub struct AxumApp {
    router: Router,
}

impl AxumApp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands the composed router back for serving.
    pub fn into_router(self) -> Router {
        self.router
    }
}

impl MountPoint for AxumApp {
    type Router = AxumRouter;

    fn sub_router(&self) -> AxumRouter {
        AxumRouter::default()
    }

    fn mount(&mut self, root: &str, router: AxumRouter) {
        let sub = router.into_router();
        let app = mem::take(&mut self.router);
        // axum forbids nesting at the bare root path.
        self.router = if root == "/" {
            app.merge(sub)
        } else {
            app.nest(root, sub)
        };
    }
}
