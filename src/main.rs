use std::sync::Arc;

use anyhow::Result;
use skypanel::ai::GeminiClient;
use skypanel::config::SkypanelConfig;
use skypanel::dashboard::Dashboard;
use skypanel::web;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("skypanel=info,tower_http=info")),
        )
        .init();

    let config = SkypanelConfig::from_env()?;
    let port = config.server.port;

    let generator = Arc::new(GeminiClient::new(
        config.ai.clone(),
        config.weather.timeout_seconds,
    )?);
    let dashboard = Arc::new(Dashboard::new(config, generator)?);

    // Initial render for the default city, matching first page load. A
    // failure here leaves the dashboard empty instead of aborting startup.
    if let Err(err) = dashboard.render(dashboard.default_query()).await {
        tracing::warn!("Initial render failed: {}", err.user_message());
    }

    web::run(dashboard, port).await
}
