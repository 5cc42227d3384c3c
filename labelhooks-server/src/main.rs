use std::sync::Arc;

use anyhow::Result;
use labelhooks::service::WebhookService;
use labelhooks::storage::InMemoryWebhookStore;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::info;

use labelhooks_server::cli::CliArgs;
use labelhooks_server::config::ServerConfig;
use labelhooks_server::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli_args = CliArgs::parse();
    let log_directive = cli_args.log_level.clone();

    // Load configuration from CLI arguments, environment variables and file
    let server_config = ServerConfig::from_cli_and_env(cli_args)?;

    // Held until shutdown so buffered file output is flushed
    let _log_guard =
        labelhooks::logging::init(&server_config.labelhooks.logging, log_directive.as_deref())?;

    info!("Starting labelhooks server v{}", labelhooks::VERSION);
    if let Some(path) = &server_config.config_file {
        info!("Configuration loaded from {}", path.display());
    }

    let store = Arc::new(InMemoryWebhookStore::new());
    let service = WebhookService::new(store, server_config.labelhooks.api.base_url.clone());

    let listener = server_config.bind().await?;
    let addr = listener.local_addr()?;
    let max_request_size = server_config.max_request_size;
    let app_state = Arc::new(AppState::new(service, server_config));

    // Create the router with all API endpoints
    let app = create_router(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .map_response(axum::response::IntoResponse::into_response)
            .layer(RequestBodyLimitLayer::new(max_request_size)),
    );

    info!("Server listening on {}", addr);
    info!("API documentation available at http://{}/docs", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
