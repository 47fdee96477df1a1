//! Process supervisor (C8) — the composition root.
//!
//! Validates environment at boot, builds the listener and router, then
//! drives `axum::serve` until a termination signal arrives. Mirrors
//! `gglib-proxy::server::serve`'s `axum::serve(...).with_graceful_shutdown`
//! pattern, plus a bounded wait on in-flight bridge sessions
//! (`spec.md` §5, §6 exit codes).

use std::process::ExitCode;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use relay_core::Settings;
use relay_http::{bootstrap, create_router};

/// How long graceful shutdown waits for in-flight bridge sessions to close
/// on their own before force-exiting (`spec.md` §5: "allow in-flight
/// sessions up to 10 s to close, then force-exit").
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            // No tracing subscriber yet — env validation happens before we
            // know the requested verbosity, so this goes to stderr directly.
            eprintln!("fatal: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(settings.is_verbose());

    let port = settings.port;
    let ctx = bootstrap(settings);
    let session_tracker = ctx.session_tracker.clone();
    let router = create_router(ctx);

    let listener = match TcpListener::bind(("0.0.0.0", port)).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(port, error = %e, "failed to bind listener");
            return ExitCode::FAILURE;
        }
    };
    info!(port, "relay listening");

    let shutdown = CancellationToken::new();
    tokio::spawn(wait_for_termination(shutdown.clone()));

    let serve_result = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await;

    if let Err(e) = serve_result {
        error!(error = %e, "server exited with an error");
        return ExitCode::FAILURE;
    }

    info!("no longer accepting new connections, waiting for in-flight calls to close");
    session_tracker.close();
    match tokio::time::timeout(SHUTDOWN_GRACE_PERIOD, session_tracker.wait()).await {
        Ok(()) => {
            info!("graceful shutdown complete");
            ExitCode::SUCCESS
        }
        Err(_) => {
            warn!(
                grace_period_secs = SHUTDOWN_GRACE_PERIOD.as_secs(),
                "in-flight calls did not close within the grace period, forcing exit"
            );
            ExitCode::FAILURE
        }
    }
}

/// Resolves once `SIGINT` or (on Unix) `SIGTERM` is observed.
async fn wait_for_termination(shutdown: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received SIGINT"),
        () = terminate => info!("received SIGTERM"),
    }

    shutdown.cancel();
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_directive = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
