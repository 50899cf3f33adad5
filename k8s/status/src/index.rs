//! Pure status-update vocabulary shared between the orchestrator (producer)
//! and `ridgeway-ingress-k8s-status-controller` (consumer). Kept here,
//! rather than in the controller crate, so neither side needs to depend on
//! the other's I/O.

use crate::httproute::ParentRefKey;

#[derive(Clone, Debug)]
pub struct AcceptedStatus {
    pub observed_generation: i64,
    pub accepted: bool,
    pub reason: String,
    pub message: String,
}

#[derive(Debug)]
pub enum Update {
    Ingress {
        namespace: String,
        name: String,
        publish_address: String,
    },
    GatewayClass {
        name: String,
        status: AcceptedStatus,
    },
    Gateway {
        namespace: String,
        name: String,
        status: AcceptedStatus,
    },
    HttpRoute {
        namespace: String,
        name: String,
        parent: ParentRefKey,
        controller_name: String,
        status: AcceptedStatus,
    },
}
