//! Runtime configuration from flags and environment

use std::net::SocketAddr;
use std::path::PathBuf;

use agents_common::telemetry::LogFormat;
use agents_common::DEFAULT_WEBHOOK_ADDR;
use clap::Parser;

/// agents-operator - inject APM agents into Pods at admission time
#[derive(Parser, Debug, Clone)]
#[command(name = "agents-operator", version, about, long_about = None)]
pub struct Cli {
    /// Print the Instrumentation CRD manifest and exit
    #[arg(long)]
    pub crd: bool,

    /// Address the HTTPS webhook server listens on
    #[arg(long, env = "WEBHOOK_BIND_ADDR", default_value = DEFAULT_WEBHOOK_ADDR)]
    pub bind_addr: SocketAddr,

    /// PEM certificate presented to the API server
    #[arg(
        long,
        env = "WEBHOOK_TLS_CERT",
        default_value = "/tmp/k8s-webhook-server/serving-certs/tls.crt"
    )]
    pub tls_cert: PathBuf,

    /// PEM private key for the certificate
    #[arg(
        long,
        env = "WEBHOOK_TLS_KEY",
        default_value = "/tmp/k8s-webhook-server/serving-certs/tls.key"
    )]
    pub tls_key: PathBuf,

    /// Read Instrumentations from this namespace (each Pod's own namespace when unset)
    #[arg(long, env = "INSTRUMENTATION_NAMESPACE")]
    pub instrumentation_namespace: Option<String>,

    /// Log output format: json or text
    #[arg(long, env = "LOG_FORMAT", default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,

    /// OTLP gRPC endpoint for span export (logs only when unset)
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}
