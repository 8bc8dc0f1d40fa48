use thiserror::Error;

pub type Result<T> = std::result::Result<T, BindError>;

/// Configuration errors raised while binding controllers onto a host
/// application.
///
/// All variants are raised synchronously during the binding pass, before any
/// request traffic; none are recoverable or retried. A failing controller
/// aborts the binding of every controller after it.
#[derive(Debug, Error)]
pub enum BindError {
    #[error(
        "controller `{controller}` has no root path; declare one starting with a forward slash (eg. \"/\" or \"/users\")"
    )]
    MissingRootPath { controller: &'static str },

    #[error("controller `{controller}` root path `{path}` must start with a forward slash")]
    InvalidRootPath {
        controller: &'static str,
        path: String,
    },

    #[error("HTTP verb `{verb}` for route `{path}` is not supported by the host router")]
    UnsupportedVerb { verb: String, path: String },
}
