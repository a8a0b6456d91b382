mod backend;
mod config;
mod runtime;
mod state_machine;
mod ui;

use backend::{ChatService, HttpBackend, LoggingBackend};
use config::BackendConfig;
use runtime::SessionRuntime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The TUI owns stdout, so logs go to stderr (redirect to a file when
    // running interactively: `companion-chat 2>chat.log`).
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("companion_chat=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = BackendConfig::from_env();
    tracing::info!(base_url = %config.base_url, "Starting companion chat");

    let backend = LoggingBackend::new(HttpBackend::new(&config.base_url));

    // Advisory probe: the chat still opens when the service is down, the
    // first submission just falls back.
    match backend.health().await {
        Ok(health) => tracing::info!(status = %health.status, "Backend reachable"),
        Err(e) => tracing::warn!("Backend health check failed: {e}"),
    }

    let (session, handle) = SessionRuntime::new(backend);
    tokio::spawn(session.run());

    ui::run(handle).await?;

    tracing::info!("Companion chat exited");
    Ok(())
}
