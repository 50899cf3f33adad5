//! Pure domain types and algorithms for the ingress translation pipeline.
//!
//! This crate has no dependency on `kube` or any cluster client: it models
//! the runway-facing configuration vocabulary (listeners, routes, matches),
//! the annotation accessor, TLS materialization, and hostname matching as
//! plain data and pure functions so they can be unit tested without a
//! cluster.
#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod annotations;
pub mod config;
pub mod filters;
pub mod hostname;
pub mod reload;
pub mod tls;
pub mod validate;

pub use annotations::Annotations;
pub use config::{Backend, Certificate, Config, HeaderTransform, Listener, Route, Transform};
pub use reload::ReloadSink;
pub use tls::{TlsError, TlsMaterializer};
pub use validate::{ConfigValidator, StructuralValidator, ValidationError};
