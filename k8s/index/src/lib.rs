//! The watch-driven half of the pipeline: the resource store (A), the
//! ownership/claim rules feeding the reconcilers (D), and the translator
//! (E). Status writing (F) and orchestration (G) live in sibling crates.
#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod claim;
pub mod reconcile;
pub mod store;
pub mod translate;

pub use reconcile::{ClusterIndex, Index, ReconcileMetrics, ReloadTrigger};
pub use store::ResourceStore;
pub use translate::{translate, Translation};
