use std::fmt;

/// Case-insensitive HTTP method name.
///
/// Verbs are lower-cased when constructed and default to `get` when a route
/// declaration omits them. Construction never fails: the verb set a host
/// router actually supports is only known to its adapter, which rejects
/// verbs it cannot express at bind time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Verb(String);

impl Verb {
    pub fn new(verb: impl AsRef<str>) -> Self {
        Self(verb.as_ref().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Verb {
    fn default() -> Self {
        Self("get".to_string())
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Verb {
    fn from(verb: &str) -> Self {
        Self::new(verb)
    }
}

impl From<String> for Verb {
    fn from(verb: String) -> Self {
        Self::new(verb)
    }
}

/// Route annotation attached to a controller method: a path plus an HTTP
/// verb.
///
/// The path is kept verbatim. No normalization or validation happens here:
/// trailing slashes, parameter syntax and pattern semantics are all owned by
/// the host router the controller is eventually bound onto.
#[derive(Debug, Clone)]
pub struct RouteMeta {
    path: String,
    verb: Verb,
}

impl RouteMeta {
    /// Route with the default `get` verb.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            verb: Verb::default(),
        }
    }

    pub fn with_verb(path: impl Into<String>, verb: impl Into<Verb>) -> Self {
        Self {
            path: path.into(),
            verb: verb.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn verb(&self) -> &Verb {
        &self.verb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_is_lower_cased() {
        assert_eq!(Verb::new("PUT").as_str(), "put");
        assert_eq!(Verb::new("Patch").as_str(), "patch");
        assert_eq!(Verb::new("m-search").as_str(), "m-search");
    }

    #[test]
    fn test_verb_defaults_to_get() {
        assert_eq!(Verb::default().as_str(), "get");
    }

    #[test]
    fn test_route_meta_keeps_path_verbatim() {
        let meta = RouteMeta::new("/users/{id}/");
        assert_eq!(meta.path(), "/users/{id}/");
        assert_eq!(meta.verb().as_str(), "get");
    }

    #[test]
    fn test_route_meta_with_explicit_verb() {
        let meta = RouteMeta::with_verb("/users", "POST");
        assert_eq!(meta.path(), "/users");
        assert_eq!(meta.verb().as_str(), "post");
    }
}
