//! ethsig daemon (ethsigd)
//!
//! Verifies Ethereum personal-sign message signatures over a small REST API
//! and bundles a local signing toolkit for development flows.
//!
//! ## Endpoints
//!
//! - `POST /verify-signature` — recover the signer of a personal-sign signature
//! - `GET /health` — liveness probe
//! - `GET /api` — capability description
//! - `GET /metrics` — Prometheus metrics
//!
//! ## Usage
//!
//! ```bash
//! # Run the verification API with defaults
//! ethsigd run
//!
//! # Custom bind address and frontend origin
//! ethsigd run --listen-addr 0.0.0.0:5000 --frontend-origin https://app.example.com
//!
//! # Sign a message with an ephemeral key and record it
//! ethsigd sign --message "hello world" --history-file ./history.json
//!
//! # One-shot local verification
//! ethsigd verify --message "hello world" --signature 0x...
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use ethsig_api::{start_server, ApiServerConfig};
use ethsig_operations::{
    apply_env_overrides, init_logging, load_config, validate_config, MetricsRegistry,
    ServiceConfig, SignalHandler,
};
use ethsig_signer::{
    ConfiguredKey, HistoryEntry, HistoryStore, JsonFileHistory, SignerChain,
};
use ethsig_verify::verify_message;

#[derive(Parser)]
#[command(name = "ethsigd")]
#[command(about = "Ethereum personal-sign verification service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the verification API server
    Run(RunArgs),
    /// Sign a message with the local strategy chain
    Sign(SignArgs),
    /// Verify a message/signature pair locally
    Verify(VerifyArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Config YAML path (defaults are used if the file does not exist)
    #[arg(long, default_value = "ethsig.yaml")]
    config: PathBuf,

    /// Bind address override
    #[arg(long)]
    listen_addr: Option<String>,

    /// Allowed CORS origin override
    #[arg(long)]
    frontend_origin: Option<String>,

    /// Log level override
    #[arg(long)]
    log_level: Option<String>,

    /// Disable the Prometheus metrics endpoint
    #[arg(long)]
    disable_metrics: bool,
}

#[derive(Args)]
struct SignArgs {
    /// Message to sign
    #[arg(long)]
    message: String,

    /// Hex-encoded signing key (falls back to ETHSIG_SIGNING_KEY, then an
    /// ephemeral key)
    #[arg(long)]
    key: Option<String>,

    /// JSON file to append the signed record to
    #[arg(long)]
    history_file: Option<PathBuf>,
}

#[derive(Args)]
struct VerifyArgs {
    /// Message the signature claims to cover
    #[arg(long)]
    message: String,

    /// Hex-encoded 65-byte signature
    #[arg(long)]
    signature: String,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Sign(args) => sign(args),
        Commands::Verify(args) => verify(args),
    }
}

/// Resolve configuration from: defaults < YAML < env vars < CLI flags.
fn resolve_config(args: &RunArgs) -> ServiceConfig {
    let mut config = if args.config.exists() {
        load_config(&args.config).expect("invalid config file")
    } else {
        ServiceConfig::default()
    };

    apply_env_overrides(&mut config);

    if let Some(ref v) = args.listen_addr {
        config.server.listen_addr = v.clone();
    }
    if let Some(ref v) = args.frontend_origin {
        config.cors.allowed_origin = v.clone();
    }
    if let Some(ref v) = args.log_level {
        config.observability.log_level = v.clone();
    }
    if args.disable_metrics {
        config.observability.metrics_enabled = false;
    }

    validate_config(&config).expect("invalid config");
    config
}

fn run(args: RunArgs) {
    let config_source = if args.config.exists() {
        args.config.display().to_string()
    } else {
        "built-in defaults".to_string()
    };
    let config = resolve_config(&args);
    init_logging(
        &config.observability.log_level,
        &config.observability.log_format,
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    runtime.block_on(async move {
        tracing::info!("=== ethsig verification service ===");
        tracing::info!("Configuration source: {}", config_source);
        tracing::info!("  - Listen address: {}", config.server.listen_addr);
        tracing::info!("  - Allowed origin: {}", config.cors.allowed_origin);
        tracing::info!(
            "  - Message limit: {} chars",
            config.verification.max_message_chars
        );
        tracing::info!("  - Metrics: {}", config.observability.metrics_enabled);
        tracing::info!(
            "  - Rate limit (advisory): {} requests / {} ms",
            config.rate_limit.max_requests,
            config.rate_limit.window_ms
        );

        let metrics = Arc::new(MetricsRegistry::new());
        let server_config =
            ApiServerConfig::from_service_config(&config).expect("invalid server config");

        let mut handle = start_server(server_config, Arc::clone(&metrics))
            .await
            .expect("failed to start API server");

        tracing::info!("Health check: http://{}/health", handle.local_addr());
        tracing::info!("API info:     http://{}/api", handle.local_addr());

        let signals = SignalHandler::new();
        signals.start();
        let mut shutdown = signals.subscribe();
        let _ = shutdown.changed().await;

        tracing::info!("Shutting down...");
        handle.stop();
        let timeout = Duration::from_secs(config.operations.shutdown_timeout_secs);
        if tokio::time::timeout(timeout, handle.stopped()).await.is_err() {
            tracing::warn!(
                "shutdown did not complete within {}s",
                config.operations.shutdown_timeout_secs
            );
        }
        tracing::info!("Shutdown complete.");
    });
}

fn sign(args: SignArgs) {
    let chain = match args.key {
        Some(ref secret) => {
            SignerChain::new().push(ConfiguredKey::new(secret).expect("invalid signing key"))
        }
        None => SignerChain::standard(),
    };

    let signed = chain.sign(&args.message).expect("signing failed");

    if let Some(ref path) = args.history_file {
        let store = JsonFileHistory::open(path).expect("failed to open history file");
        store
            .append(HistoryEntry::new(
                signed.message.clone(),
                signed.signature.clone(),
            ))
            .expect("failed to record history");
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&signed).expect("serialize signed message")
    );
}

fn verify(args: VerifyArgs) {
    let outcome = verify_message(&args.message, &args.signature);
    let valid = outcome.is_valid();

    println!(
        "{}",
        serde_json::to_string_pretty(&outcome).expect("serialize outcome")
    );

    if !valid {
        std::process::exit(1);
    }
}
