//! Host router adapters.
//!
//! The binder only speaks [`MountPoint`](crate::binder::MountPoint) and
//! [`SubRouter`](crate::binder::SubRouter); adapters implement those traits
//! for a concrete web framework.

pub mod axum;
