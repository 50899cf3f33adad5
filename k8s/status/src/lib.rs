//! Status Updater (component F): writes Accepted conditions and
//! LoadBalancer ingress addresses to the cluster. All writes are
//! idempotent status-subresource patches and never abort a reconcile on
//! failure (§7).
#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod condition;
pub mod error;
pub mod httproute;
pub mod index;
pub mod ingress;

pub use error::StatusUpdateError;
pub use httproute::ParentRefKey;
pub use index::{AcceptedStatus, Update};
