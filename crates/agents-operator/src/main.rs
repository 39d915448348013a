//! agents-operator - APM agent injection webhook

use std::sync::Arc;

use axum_server::tls_rustls::RustlsConfig;
use clap::Parser;
use kube::{Client, CustomResourceExt};
use tracing::info;

use agents_common::crd::Instrumentation;
use agents_common::telemetry::{init_telemetry, TelemetryConfig};
use agents_common::OPERATOR_NAME;
use agents_inject::{InjectorRegistry, PodMutator};
use agents_operator::{webhook_router, Cli, KubeInstrumentationSource, WebhookState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = rustls::crypto::aws_lc_rs::default_provider().install_default() {
        eprintln!("CRITICAL: Failed to install aws-lc-rs crypto provider: {:?}", e);
        std::process::exit(1);
    }

    let cli = Cli::parse();

    if cli.crd {
        let crd = serde_yaml::to_string(&Instrumentation::crd())
            .map_err(|e| anyhow::anyhow!("Failed to serialize CRD: {}", e))?;
        println!("{crd}");
        return Ok(());
    }

    init_telemetry(TelemetryConfig {
        service_name: OPERATOR_NAME.to_string(),
        log_format: cli.log_format,
        otlp_endpoint: cli.otlp_endpoint.clone(),
    })?;

    let registry = InjectorRegistry::builtin()?;
    info!(
        languages = ?registry.languages().collect::<Vec<_>>(),
        "Registered injectors"
    );
    let mutator = PodMutator::new(Arc::new(registry));

    let client = Client::try_default()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create Kubernetes client: {}", e))?;
    let source = KubeInstrumentationSource::new(client, cli.instrumentation_namespace.clone());
    let state = Arc::new(WebhookState::new(Arc::new(source), mutator));

    let tls_config = RustlsConfig::from_pem_file(&cli.tls_cert, &cli.tls_key)
        .await
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load TLS material ({}, {}): {}",
                cli.tls_cert.display(),
                cli.tls_key.display(),
                e
            )
        })?;

    info!(
        addr = %cli.bind_addr,
        component = OPERATOR_NAME,
        instrumentation_namespace = cli.instrumentation_namespace.as_deref().unwrap_or("<pod namespace>"),
        "Starting admission webhook"
    );

    axum_server::bind_rustls(cli.bind_addr, tls_config)
        .serve(webhook_router(state).into_make_service())
        .await
        .map_err(|e| anyhow::anyhow!("Webhook server error: {}", e))?;

    Ok(())
}
