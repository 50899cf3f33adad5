//! Re-exports of the generated Kubernetes and Gateway API wire types this
//! controller watches, plus the controller's own configuration record.
//! Nothing here is hand-rolled CRD schema — it is aggregation only.
#![deny(rust_2018_idioms)]

/// Flattened re-export of the gateway.networking.k8s.io/v1 (GA) types.
pub mod gateway {
    pub use gateway_api::apis::experimental::gatewayclasses::*;
    pub use gateway_api::apis::experimental::gateways::*;
    pub use gateway_api::apis::experimental::httproutes::*;
}

/// Flattened re-export of the gateway.networking.k8s.io/v1beta1 types.
pub mod gateway_beta {
    pub use gateway_api::apis::experimental::referencegrants::*;
}

pub use k8s_openapi::api::core::v1::{Secret, Service};
pub use k8s_openapi::api::discovery::v1::EndpointSlice;
pub use k8s_openapi::api::networking::v1::Ingress;

pub use kube::{Api, Client, Resource, ResourceExt};

pub mod settings;

pub use settings::ControllerConfig;
