use pulse::app;
use pulse::config::Settings;
use pulse::telemetry::{LogFormat, get_subscriber, init_subscriber};
use pulse::utils::constant::DEFAULT_LOG_FILTER;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let format = LogFormat::from_env().unwrap_or_else(|e| {
        eprintln!("{e}; falling back to pretty logs");
        LogFormat::Pretty
    });
    let subscriber = get_subscriber(
        "pulse".into(),
        DEFAULT_LOG_FILTER.into(),
        format,
        std::io::stdout,
    );
    if let Err(e) = init_subscriber(subscriber) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    let settings = Settings::load().unwrap_or_else(|e| {
        error!(error = %e, "Failed to load configuration");
        std::process::exit(1);
    });

    let app = app(&settings);
    let addr = settings.server.bind_address();

    let listener = TcpListener::bind(&addr).await.unwrap_or_else(|e| {
        error!(%addr, error = %e, "Failed to bind listener");
        std::process::exit(1);
    });
    info!("Server starting at http://{addr}");

    if let Err(e) = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server exited with error");
        std::process::exit(1);
    }

    info!("Server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
