//! CLI / environment configuration and the top-level wiring, grounded on
//! the teacher's `runtime/src/args.rs`: one `Args` struct parsed once,
//! converted into the immutable settings record handed to the store and
//! translator, then `kubert::Runtime::builder()` wires watches, the admin
//! server, and the lease.

use crate::controller::{Controller, DebounceTrigger, LeaseLeadershipGate};
use crate::lease;
use crate::metrics::Metrics;
use anyhow::{Context, Result};
use clap::Parser;
use kube::runtime::watcher;
use prometheus_client::registry::Registry;
use ridgeway_ingress_core::config::Config;
use ridgeway_ingress_core::validate::StructuralValidator;
use ridgeway_ingress_core::ReloadSink;
use ridgeway_ingress_k8s_api::{gateway, gateway_beta, ControllerConfig, EndpointSlice, Ingress, Secret, Service};
use ridgeway_ingress_k8s_index::{ClusterIndex, Index, ResourceStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info_span, Instrument};

const LEASE_NAME: &str = "ridgeway-ingress-write";

#[derive(Debug, Parser)]
#[clap(name = "ridgeway-ingress", about = "A Kubernetes ingress controller")]
pub struct Args {
    #[clap(long, default_value = "info,ridgeway=debug", env = "RIDGEWAY_LOG")]
    log_level: kubert::LogFilter,

    #[clap(long, default_value = "plain")]
    log_format: kubert::LogFormat,

    #[clap(flatten)]
    client: kubert::ClientArgs,

    #[clap(flatten)]
    admin: kubert::AdminArgs,

    /// The ingress class this controller claims, matched against
    /// `spec.ingressClassName` or the legacy annotation.
    #[clap(long, default_value = "ridgeway", env = "RIDGEWAY_INGRESS_CLASS")]
    ingress_class: String,

    /// The controller name matched against a GatewayClass's
    /// `spec.controllerName`.
    #[clap(long, default_value = "ridgeway.io/ingress-controller", env = "RIDGEWAY_CONTROLLER_NAME")]
    controller_name: String,

    /// Claim Ingresses that declare neither a class field nor the legacy
    /// annotation.
    #[clap(long, env = "RIDGEWAY_WATCH_WITHOUT_CLASS")]
    watch_without_class: bool,

    #[clap(long, env = "RIDGEWAY_DISABLE_INGRESS")]
    disable_ingress: bool,

    #[clap(long, env = "RIDGEWAY_DISABLE_GATEWAY_API")]
    disable_gateway_api: bool,

    #[clap(long, default_value = "100", env = "RIDGEWAY_DEBOUNCE_DELAY_MS")]
    debounce_delay_ms: u64,

    /// IP or hostname published in Ingress LoadBalancer status.
    #[clap(long, default_value = "", env = "RIDGEWAY_PUBLISH_ADDRESS")]
    publish_address: String,

    #[clap(long, default_value = "8080")]
    default_http_port: u16,

    #[clap(long, default_value = "8443")]
    default_https_port: u16,

    #[clap(long, default_value = "ridgeway-system", env = "RIDGEWAY_NAMESPACE")]
    namespace: String,
}

impl Args {
    pub async fn parse_and_run(sink: Arc<dyn ReloadSink>) -> Result<()> {
        Self::parse().run(sink).await
    }

    pub async fn run(self, sink: Arc<dyn ReloadSink>) -> Result<()> {
        let Self {
            log_level,
            log_format,
            client,
            admin,
            ingress_class,
            controller_name,
            watch_without_class,
            disable_ingress,
            disable_gateway_api,
            debounce_delay_ms,
            publish_address,
            default_http_port,
            default_https_port,
            namespace,
        } = self;

        let cfg = Arc::new(ControllerConfig {
            ingress_class,
            controller_name: controller_name.clone(),
            watch_namespaces: Vec::new(),
            watch_without_class,
            enable_ingress: !disable_ingress,
            enable_gateway_api: !disable_gateway_api,
            debounce_delay: Duration::from_millis(debounce_delay_ms),
            base_config: Config::default(),
            publish_address,
            default_http_port,
            default_https_port,
        });

        let mut prom = Registry::default();
        let metrics = Metrics::register(&mut prom);

        let mut runtime = kubert::Runtime::builder()
            .with_log(log_level, log_format)
            .with_admin(admin.into_builder().with_prometheus(prom))
            .with_client(client)
            .build()
            .await
            .context("failed to initialize kubert runtime")?;

        let hostname = std::env::var("HOSTNAME").unwrap_or_else(|_| "ridgeway-ingress".to_string());
        let claims = lease::init(runtime.client(), &namespace, LEASE_NAME, &hostname).await?;
        let leadership = Arc::new(LeaseLeadershipGate::new(claims, hostname));

        let store = ResourceStore::new();
        let trigger = DebounceTrigger::new();
        let (status_tx, status_controller) = ridgeway_ingress_k8s_status_controller::Controller::new(
            runtime.client(),
            Arc::new(metrics.clone()),
        );

        let index = Index::new(store.clone(), cfg.clone(), trigger.clone(), Arc::new(metrics.clone()));
        let cluster_index = ClusterIndex::new(store.clone(), cfg.clone(), trigger.clone(), Arc::new(metrics.clone()));

        let ingresses = runtime.watch_all::<Ingress>(watcher::Config::default());
        tokio::spawn(kubert::index::namespaced(index.clone(), ingresses).instrument(info_span!("ingresses")));

        let services = runtime.watch_all::<Service>(watcher::Config::default());
        tokio::spawn(kubert::index::namespaced(index.clone(), services).instrument(info_span!("services")));

        let endpoint_slices = runtime.watch_all::<EndpointSlice>(watcher::Config::default());
        tokio::spawn(kubert::index::namespaced(index.clone(), endpoint_slices).instrument(info_span!("endpointslices")));

        let secrets = runtime.watch_all::<Secret>(watcher::Config::default());
        tokio::spawn(kubert::index::namespaced(index.clone(), secrets).instrument(info_span!("secrets")));

        if cfg.enable_gateway_api {
            let gateway_classes = runtime.watch_all::<gateway::GatewayClass>(watcher::Config::default());
            tokio::spawn(kubert::index::cluster(cluster_index, gateway_classes).instrument(info_span!("gatewayclasses")));

            let gateways = runtime.watch_all::<gateway::Gateway>(watcher::Config::default());
            tokio::spawn(kubert::index::namespaced(index.clone(), gateways).instrument(info_span!("gateways")));

            let http_routes = runtime.watch_all::<gateway::HTTPRoute>(watcher::Config::default());
            tokio::spawn(kubert::index::namespaced(index.clone(), http_routes).instrument(info_span!("httproutes")));

            let reference_grants = runtime.watch_all::<gateway_beta::ReferenceGrant>(watcher::Config::default());
            tokio::spawn(kubert::index::namespaced(index.clone(), reference_grants).instrument(info_span!("referencegrants")));
        }

        tokio::spawn(status_controller.run().instrument(info_span!("status_controller")));

        let controller = Arc::new(Controller::new(
            store,
            cfg,
            Arc::new(StructuralValidator),
            sink,
            trigger,
            leadership,
            metrics,
            status_tx,
        ));
        tokio::spawn({
            let controller = controller.clone();
            async move { controller.run_reload_loop().await }.instrument(info_span!("reload_loop"))
        });

        if runtime.run().await.is_err() {
            anyhow::bail!("aborted");
        }
        Ok(())
    }
}
