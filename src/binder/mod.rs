//! The binding pass: wires controller descriptors onto a host application.
//!
//! The host stays an opaque collaborator behind two small traits. A
//! [`MountPoint`] hands out fresh sub-routers and mounts them under a root
//! path; a [`SubRouter`] accepts middleware and per-verb route
//! registrations. Everything about path matching, parameter extraction and
//! middleware short-circuiting belongs to the host.

use std::sync::Arc;

use tracing::debug;

use crate::controller::{AnnotationKind, ControllerDef};
use crate::error::{BindError, Result};
use crate::metadata::Verb;

/// A router scoped to one controller, eventually mounted under the
/// controller's root path.
pub trait SubRouter {
    type Endpoint;
    type Middleware;

    /// Registers unconditional middleware, applying to every request under
    /// the controller's root.
    fn install_middleware(&mut self, handler: Self::Middleware);

    /// Registers a handler for one path and verb. Fails when the host cannot
    /// express the verb.
    fn install_route(&mut self, verb: &Verb, path: &str, handler: Self::Endpoint) -> Result<()>;
}

/// A host application capable of mounting sub-routers.
pub trait MountPoint {
    type Router: SubRouter;

    /// A fresh sub-router, scoped to nothing yet.
    fn sub_router(&self) -> Self::Router;

    /// Mounts a sub-router under the given root path.
    fn mount(&mut self, root: &str, router: Self::Router);
}

/// Object-safe surface of a controller descriptor, so heterogeneous
/// controller lists can be bound in one call.
pub trait Bindable<E, M> {
    fn controller_name(&self) -> &'static str;

    /// The controller's root path, validated: present and starting with a
    /// forward slash.
    fn validated_root(&self) -> Result<&str>;

    /// Instantiates the controller once and installs its middleware and
    /// route methods on the sub-router, middleware strictly first.
    fn bind(&self, router: &mut dyn SubRouter<Endpoint = E, Middleware = M>) -> Result<()>;
}

impl<C, E, M> Bindable<E, M> for ControllerDef<C, E, M>
where
    C: Default,
{
    fn controller_name(&self) -> &'static str {
        self.name()
    }

    fn validated_root(&self) -> Result<&str> {
        match self.root_path() {
            None => Err(BindError::MissingRootPath {
                controller: self.name(),
            }),
            Some(path) if !path.starts_with('/') => Err(BindError::InvalidRootPath {
                controller: self.name(),
                path: path.to_owned(),
            }),
            Some(path) => Ok(path),
        }
    }

    fn bind(&self, router: &mut dyn SubRouter<Endpoint = E, Middleware = M>) -> Result<()> {
        let instance = Arc::new(C::default());

        for name in self.annotated_method_names(AnnotationKind::Middleware) {
            if let Some(bind) = self.middleware_binding(name) {
                router.install_middleware(bind(&instance));
            }
        }

        for name in self.annotated_method_names(AnnotationKind::Route) {
            // Both lookups resolve for any collected name: collection implies
            // an annotated entry exists somewhere along the chain.
            let (Some(meta), Some(bind)) = (self.route_meta(name), self.endpoint_binding(name))
            else {
                continue;
            };
            router.install_route(meta.verb(), meta.path(), bind(&instance))?;
        }

        Ok(())
    }
}

/// Binds controllers onto the host application, in the order given.
///
/// For each controller: a fresh sub-router is created, the controller type
/// is instantiated once, middleware methods are installed in collected
/// order, route methods after them, and the sub-router is mounted at the
/// controller's root path.
///
/// A controller without a valid root path (missing, or not starting with
/// `/`) aborts the whole pass; controllers after it are not bound. The
/// operation is not idempotent: calling it twice mounts duplicate
/// sub-routers.
pub fn bind_controllers<A>(
    app: &mut A,
    controllers: &[&dyn Bindable<
        <A::Router as SubRouter>::Endpoint,
        <A::Router as SubRouter>::Middleware,
    >],
) -> Result<()>
where
    A: MountPoint,
{
    for controller in controllers {
        let mut router = app.sub_router();
        let root = controller.validated_root()?.to_owned();
        controller.bind(&mut router)?;
        app.mount(&root, router);
        debug!(
            controller = controller.controller_name(),
            root = %root,
            "controller mounted"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Debug, PartialEq)]
    enum Installed {
        Middleware(String),
        Route {
            verb: String,
            path: String,
            label: String,
        },
    }

    #[derive(Default)]
    struct RecordingRouter {
        installed: Vec<Installed>,
    }

    impl SubRouter for RecordingRouter {
        type Endpoint = String;
        type Middleware = String;

        fn install_middleware(&mut self, handler: String) {
            self.installed.push(Installed::Middleware(handler));
        }

        fn install_route(&mut self, verb: &Verb, path: &str, handler: String) -> Result<()> {
            self.installed.push(Installed::Route {
                verb: verb.as_str().to_owned(),
                path: path.to_owned(),
                label: handler,
            });
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingApp {
        mounts: Vec<(String, RecordingRouter)>,
    }

    impl MountPoint for RecordingApp {
        type Router = RecordingRouter;

        fn sub_router(&self) -> RecordingRouter {
            RecordingRouter::default()
        }

        fn mount(&mut self, root: &str, router: RecordingRouter) {
            self.mounts.push((root.to_owned(), router));
        }
    }

    #[derive(Default)]
    struct Greeter;

    type Def = ControllerDef<Greeter, String, String>;

    #[test]
    fn test_bind_mounts_router_at_root_path() {
        let def = Def::new("Greeter")
            .root("/greet")
            .route("hello", "/hello", |_g: &Arc<Greeter>| "hello".to_owned());

        let mut app = RecordingApp::default();
        bind_controllers(&mut app, &[&def]).unwrap();

        assert_eq!(app.mounts.len(), 1);
        let (root, router) = &app.mounts[0];
        assert_eq!(root, "/greet");
        assert_eq!(
            router.installed,
            vec![Installed::Route {
                verb: "get".to_owned(),
                path: "/hello".to_owned(),
                label: "hello".to_owned(),
            }]
        );
    }

    #[test]
    fn test_middleware_installs_strictly_before_routes() {
        let def = Def::new("Greeter")
            .root("/greet")
            .route("hello", "/hello", |_g: &Arc<Greeter>| "hello".to_owned())
            .middleware("log", |_g: &Arc<Greeter>| "log".to_owned())
            .route_with_verb("create", "/", "POST", |_g: &Arc<Greeter>| {
                "create".to_owned()
            })
            .middleware("auth", |_g: &Arc<Greeter>| "auth".to_owned());

        let mut app = RecordingApp::default();
        bind_controllers(&mut app, &[&def]).unwrap();

        let (_, router) = &app.mounts[0];
        assert_eq!(
            router.installed,
            vec![
                Installed::Middleware("log".to_owned()),
                Installed::Middleware("auth".to_owned()),
                Installed::Route {
                    verb: "get".to_owned(),
                    path: "/hello".to_owned(),
                    label: "hello".to_owned(),
                },
                Installed::Route {
                    verb: "post".to_owned(),
                    path: "/".to_owned(),
                    label: "create".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn test_missing_root_aborts_without_mounting() {
        let bad = Def::new("Bad").route("hello", "/", |_g: &Arc<Greeter>| "hello".to_owned());
        let good = Def::new("Good")
            .root("/good")
            .route("hello", "/", |_g: &Arc<Greeter>| "hello".to_owned());

        let mut app = RecordingApp::default();
        let err = bind_controllers(&mut app, &[&bad, &good]).unwrap_err();

        assert!(matches!(
            err,
            BindError::MissingRootPath { controller: "Bad" }
        ));
        // The failure is not per-controller isolated: nothing is mounted,
        // including the valid controller listed after the malformed one.
        assert!(app.mounts.is_empty());
    }

    #[test]
    fn test_root_without_leading_slash_is_rejected() {
        let def = Def::new("Bad")
            .root("greet")
            .route("hello", "/", |_g: &Arc<Greeter>| "hello".to_owned());

        let mut app = RecordingApp::default();
        let err = bind_controllers(&mut app, &[&def]).unwrap_err();

        match err {
            BindError::InvalidRootPath { controller, path } => {
                assert_eq!(controller, "Bad");
                assert_eq!(path, "greet");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(app.mounts.is_empty());
    }

    #[test]
    fn test_controllers_bind_in_caller_order() {
        let first = Def::new("First").root("/first");
        let second = Def::new("Second").root("/second");

        let mut app = RecordingApp::default();
        bind_controllers(&mut app, &[&first, &second]).unwrap();

        let roots: Vec<&str> = app.mounts.iter().map(|(root, _)| root.as_str()).collect();
        assert_eq!(roots, vec!["/first", "/second"]);
    }

    #[test]
    fn test_binding_twice_mounts_duplicates() {
        let def = Def::new("Greeter").root("/greet");

        let mut app = RecordingApp::default();
        bind_controllers(&mut app, &[&def]).unwrap();
        bind_controllers(&mut app, &[&def]).unwrap();

        assert_eq!(app.mounts.len(), 2);
    }

    #[test]
    fn test_instance_created_once_and_shared_across_methods() {
        static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

        struct Counted;

        impl Default for Counted {
            fn default() -> Self {
                CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
                Self
            }
        }

        let def: ControllerDef<Counted, String, String> = ControllerDef::new("Counted")
            .root("/counted")
            .middleware("log", |c: &Arc<Counted>| format!("{:p}", Arc::as_ptr(c)))
            .route("a", "/a", |c: &Arc<Counted>| format!("{:p}", Arc::as_ptr(c)))
            .route("b", "/b", |c: &Arc<Counted>| format!("{:p}", Arc::as_ptr(c)));

        let mut app = RecordingApp::default();
        bind_controllers(&mut app, &[&def]).unwrap();

        assert_eq!(CONSTRUCTED.load(Ordering::SeqCst), 1);
        let (_, router) = &app.mounts[0];
        let labels: Vec<&str> = router
            .installed
            .iter()
            .map(|entry| match entry {
                Installed::Middleware(label) => label.as_str(),
                Installed::Route { label, .. } => label.as_str(),
            })
            .collect();
        assert!(labels.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn test_inherited_middleware_bound_with_override_implementation() {
        let parent: Def =
            Def::new("Base").middleware("audit", |_g: &Arc<Greeter>| "base audit".to_owned());
        let child = Def::new("Derived")
            .root("/derived")
            .middleware_handler("audit", |_g: &Arc<Greeter>| "derived audit".to_owned())
            .extends(parent);

        let mut app = RecordingApp::default();
        bind_controllers(&mut app, &[&child]).unwrap();

        let (_, router) = &app.mounts[0];
        assert_eq!(
            router.installed,
            vec![Installed::Middleware("derived audit".to_owned())]
        );
    }

    #[test]
    fn test_route_kind_override_unbinds_inherited_middleware() {
        let parent: Def =
            Def::new("Base").middleware("audit", |_g: &Arc<Greeter>| "base audit".to_owned());
        let child = Def::new("Derived")
            .root("/derived")
            .handler("audit", |_g: &Arc<Greeter>| "derived route".to_owned())
            .extends(parent);

        let mut app = RecordingApp::default();
        bind_controllers(&mut app, &[&child]).unwrap();

        // The child shadows the name with a route-kind entry: the ancestor's
        // middleware implementation is not bound in its place, and the entry
        // carries no route annotation so nothing else is installed either.
        let (_, router) = &app.mounts[0];
        assert!(router.installed.is_empty());
    }

    #[test]
    fn test_inherited_method_bound_once_with_override_implementation() {
        let parent: Def = Def::new("Base")
            .middleware("audit", |_g: &Arc<Greeter>| "base audit".to_owned())
            .route("list", "/list", |_g: &Arc<Greeter>| "base list".to_owned());
        let child = Def::new("Derived")
            .root("/derived")
            .handler("list", |_g: &Arc<Greeter>| "derived list".to_owned())
            .extends(parent);

        let mut app = RecordingApp::default();
        bind_controllers(&mut app, &[&child]).unwrap();

        let (_, router) = &app.mounts[0];
        assert_eq!(
            router.installed,
            vec![
                Installed::Middleware("base audit".to_owned()),
                Installed::Route {
                    verb: "get".to_owned(),
                    path: "/list".to_owned(),
                    label: "derived list".to_owned(),
                },
            ]
        );
    }
}
