// crates/caresync-server/src/main.rs
// ============================================================================
// Module: CareSync Server Entry Point
// Description: Binary wiring configuration into the HTTP server.
// Purpose: Load config, build the clients, and serve the router.
// Dependencies: axum, caresync-analytics, caresync-auth, caresync-config,
//               caresync-gateway, caresync-server, clap, tokio
// ============================================================================

//! ## Overview
//! The binary is pure wiring: parse the command line, load and validate the
//! configuration, construct the gateway and analytics clients plus the
//! authentication front door, and hand the assembled state to the router.
//! All request behavior lives in the library crates.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use caresync_analytics::AnalyticsClient;
use caresync_analytics::IdResolver;
use caresync_auth::Authenticator;
use caresync_auth::HttpOAuthVerifier;
use caresync_auth::HttpTokenIntrospector;
use caresync_config::CaresyncConfig;
use caresync_gateway::DocumentStore;
use caresync_gateway::GatewayClient;
use caresync_server::AppState;
use caresync_server::DocumentController;
use caresync_server::NoopMetrics;
use caresync_server::ServerError;
use caresync_server::SyncAdminProvisioner;
use caresync_server::build_router;
use clap::Parser;

// ============================================================================
// SECTION: Command Line
// ============================================================================

/// CareSync Gateway API server.
#[derive(Debug, Parser)]
#[command(name = "caresync-server", version)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, value_name = "PATH")]
    config: PathBuf,
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Server entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Loads configuration, assembles the state, and serves requests.
async fn run() -> Result<(), ServerError> {
    let cli = Cli::parse();
    let config =
        CaresyncConfig::load(&cli.config).map_err(|err| ServerError::Config(err.to_string()))?;

    let gateway = Arc::new(
        GatewayClient::new(&config.gateway).map_err(|err| ServerError::Init(err.to_string()))?,
    );
    let store: Arc<dyn DocumentStore> = gateway;
    let analytics = Arc::new(
        AnalyticsClient::new(&config.analytics)
            .map_err(|err| ServerError::Init(err.to_string()))?,
    );
    let verifier = Arc::new(
        HttpOAuthVerifier::new(&config.oauth).map_err(|err| ServerError::Init(err.to_string()))?,
    );
    let introspector = Arc::new(
        HttpTokenIntrospector::new(&config.portal_api)
            .map_err(|err| ServerError::Init(err.to_string()))?,
    );

    let authenticator = Authenticator::new(
        config.oauth.clone(),
        verifier,
        introspector,
        Arc::clone(&store),
    );
    let controller = DocumentController::new(IdResolver::new(analytics), Arc::clone(&store));
    let provisioner = SyncAdminProvisioner::new(Arc::clone(&store));
    let state = Arc::new(AppState {
        authenticator,
        controller,
        provisioner,
        metrics: Arc::new(NoopMetrics),
    });

    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .map_err(|_| ServerError::Config("invalid bind address".to_string()))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| ServerError::Transport(format!("bind failed: {err}")))?;
    axum::serve(listener, build_router(state))
        .await
        .map_err(|err| ServerError::Transport(format!("server failed: {err}")))
}

// ============================================================================
// SECTION: Output
// ============================================================================

/// Writes a line to stderr without the denied print macros.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message and returns the failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
