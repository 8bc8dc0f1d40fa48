//! Controller descriptors: the declarative registry of routing metadata.
//!
//! A [`ControllerDef`] is built once at application-module initialization
//! time and records everything the binder needs later: the controller's root
//! mount path, its named handler methods with their route or middleware
//! annotations, and an optional parent descriptor to inherit methods from.
//! The descriptor is an explicit side-table; nothing is stamped onto runtime
//! objects and nothing is registered globally.

use std::collections::HashSet;
use std::sync::Arc;

use crate::metadata::{RouteMeta, Verb};

/// Which annotation a collection pass looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    Route,
    Middleware,
}

pub(crate) type BindFn<C, H> = Arc<dyn Fn(&Arc<C>) -> H + Send + Sync>;

enum MethodBinding<C, E, M> {
    Endpoint(BindFn<C, E>),
    Middleware(BindFn<C, M>),
}

struct MethodDef<C, E, M> {
    name: &'static str,
    route: Option<RouteMeta>,
    middleware: bool,
    binding: MethodBinding<C, E, M>,
}

impl<C, E, M> MethodDef<C, E, M> {
    fn carries(&self, kind: AnnotationKind) -> bool {
        match kind {
            AnnotationKind::Route => self.route.is_some(),
            AnnotationKind::Middleware => self.middleware,
        }
    }
}

/// Declarative description of one controller.
///
/// `C` is the controller state type, instantiated once per binding call via
/// [`Default`]. `E` and `M` are the host router's endpoint and middleware
/// handler types; they stay generic here so descriptors never depend on a
/// concrete host. Handler closures receive the shared instance and return a
/// host handler bound to it.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use routebind::ControllerDef;
///
/// #[derive(Default)]
/// struct Api;
///
/// let def: ControllerDef<Api, &'static str, &'static str> = ControllerDef::new("Api")
///     .root("/api")
///     .route("status", "/status", |_api: &Arc<Api>| "status handler");
///
/// assert_eq!(def.root_path(), Some("/api"));
/// ```
pub struct ControllerDef<C, E, M> {
    name: &'static str,
    root: Option<String>,
    methods: Vec<MethodDef<C, E, M>>,
    parent: Option<Box<ControllerDef<C, E, M>>>,
}

impl<C, E, M> ControllerDef<C, E, M> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            root: None,
            methods: Vec::new(),
            parent: None,
        }
    }

    /// Declares the root path this controller mounts under.
    ///
    /// Stored verbatim; the binder validates the leading forward slash when
    /// the controller is actually bound, not here.
    pub fn root(mut self, path: impl Into<String>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Declares a route method with the default `get` verb.
    pub fn route<F>(self, name: &'static str, path: impl Into<String>, bind: F) -> Self
    where
        F: Fn(&Arc<C>) -> E + Send + Sync + 'static,
    {
        self.route_entry(name, RouteMeta::new(path), bind)
    }

    /// Declares a route method with an explicit verb (case-insensitive).
    pub fn route_with_verb<F>(
        self,
        name: &'static str,
        path: impl Into<String>,
        verb: impl Into<Verb>,
        bind: F,
    ) -> Self
    where
        F: Fn(&Arc<C>) -> E + Send + Sync + 'static,
    {
        self.route_entry(name, RouteMeta::with_verb(path, verb), bind)
    }

    fn route_entry<F>(mut self, name: &'static str, meta: RouteMeta, bind: F) -> Self
    where
        F: Fn(&Arc<C>) -> E + Send + Sync + 'static,
    {
        self.methods.push(MethodDef {
            name,
            route: Some(meta),
            middleware: false,
            binding: MethodBinding::Endpoint(Arc::new(bind)),
        });
        self
    }

    /// Declares a middleware method: no path or verb, applies to every
    /// request under the controller's root.
    pub fn middleware<F>(mut self, name: &'static str, bind: F) -> Self
    where
        F: Fn(&Arc<C>) -> M + Send + Sync + 'static,
    {
        self.methods.push(MethodDef {
            name,
            route: None,
            middleware: true,
            binding: MethodBinding::Middleware(Arc::new(bind)),
        });
        self
    }

    /// Declares an unannotated route method entry.
    ///
    /// This is the override case: a controller extending a parent can
    /// replace the implementation of an inherited route method without
    /// repeating its route annotation. The route metadata is still found on
    /// the parent; the implementation bound is this one. Overriding an
    /// inherited *middleware* method goes through
    /// [`middleware_handler`](Self::middleware_handler) instead; a
    /// route-typed entry shadows a same-named inherited middleware method
    /// rather than binding the ancestor's implementation.
    pub fn handler<F>(mut self, name: &'static str, bind: F) -> Self
    where
        F: Fn(&Arc<C>) -> E + Send + Sync + 'static,
    {
        self.methods.push(MethodDef {
            name,
            route: None,
            middleware: false,
            binding: MethodBinding::Endpoint(Arc::new(bind)),
        });
        self
    }

    /// Declares an unannotated middleware method entry: the middleware
    /// counterpart of [`handler`](Self::handler), overriding an inherited
    /// middleware implementation without repeating its annotation.
    pub fn middleware_handler<F>(mut self, name: &'static str, bind: F) -> Self
    where
        F: Fn(&Arc<C>) -> M + Send + Sync + 'static,
    {
        self.methods.push(MethodDef {
            name,
            route: None,
            middleware: false,
            binding: MethodBinding::Middleware(Arc::new(bind)),
        });
        self
    }

    /// Sets the parent descriptor this controller inherits methods from.
    ///
    /// The ancestor chain is walked by the collector; a missing parent is
    /// the sentinel terminating traversal.
    pub fn extends(mut self, parent: ControllerDef<C, E, M>) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The effective root path: this controller's own, or the nearest
    /// ancestor's when not declared locally.
    pub fn root_path(&self) -> Option<&str> {
        self.root
            .as_deref()
            .or_else(|| self.parent.as_ref().and_then(|p| p.root_path()))
    }

    /// Collects the names of methods carrying the given annotation, across
    /// this controller and all its ancestors.
    ///
    /// The returned list is de-duplicated keeping the first occurrence, so a
    /// name appears exactly once even when several levels of the chain
    /// annotate a same-named method. Order is deterministic: declaration
    /// order within a level, most-derived level first.
    pub fn annotated_method_names(&self, kind: AnnotationKind) -> Vec<&'static str> {
        let mut names = Vec::new();
        self.collect_annotated(kind, &mut names);

        let mut seen = HashSet::new();
        names.retain(|name| seen.insert(*name));
        names
    }

    fn collect_annotated(&self, kind: AnnotationKind, acc: &mut Vec<&'static str>) {
        for method in &self.methods {
            if method.carries(kind) {
                acc.push(method.name);
            }
        }
        if let Some(parent) = &self.parent {
            parent.collect_annotated(kind, acc);
        }
    }

    /// Route metadata for a collected method name: the nearest entry along
    /// the chain that actually carries it. An unannotated override therefore
    /// keeps the metadata declared on its ancestor.
    pub fn route_meta(&self, name: &str) -> Option<&RouteMeta> {
        self.methods
            .iter()
            .find_map(|m| (m.name == name).then_some(m.route.as_ref()).flatten())
            .or_else(|| self.parent.as_ref().and_then(|p| p.route_meta(name)))
    }

    /// Whether the named method carries the middleware flag anywhere along
    /// the chain.
    pub fn is_middleware(&self, name: &str) -> bool {
        self.methods.iter().any(|m| m.name == name && m.middleware)
            || self
                .parent
                .as_ref()
                .is_some_and(|p| p.is_middleware(name))
    }

    /// Nearest endpoint implementation for a name, most-derived level first.
    ///
    /// Resolution is by name before kind: the nearest level declaring the
    /// name at all settles it. A level carrying the name only as middleware
    /// shadows any inherited route implementation instead of falling through
    /// to an ancestor the override was meant to replace.
    pub(crate) fn endpoint_binding(&self, name: &str) -> Option<&BindFn<C, E>> {
        let mut shadowed = false;
        for method in &self.methods {
            if method.name != name {
                continue;
            }
            match &method.binding {
                MethodBinding::Endpoint(bind) => return Some(bind),
                MethodBinding::Middleware(_) => shadowed = true,
            }
        }
        if shadowed {
            return None;
        }
        self.parent.as_ref().and_then(|p| p.endpoint_binding(name))
    }

    /// Nearest middleware implementation for a name, most-derived level
    /// first, with the same name-before-kind shadowing rule as
    /// [`endpoint_binding`](Self::endpoint_binding).
    pub(crate) fn middleware_binding(&self, name: &str) -> Option<&BindFn<C, M>> {
        let mut shadowed = false;
        for method in &self.methods {
            if method.name != name {
                continue;
            }
            match &method.binding {
                MethodBinding::Middleware(bind) => return Some(bind),
                MethodBinding::Endpoint(_) => shadowed = true,
            }
        }
        if shadowed {
            return None;
        }
        self.parent
            .as_ref()
            .and_then(|p| p.middleware_binding(name))
    }
}
