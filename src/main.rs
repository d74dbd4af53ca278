use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use paper_digest::{
    config::Config,
    api::routes::create_router,
    AppState,
};

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging();

    let config = Config::load()?;
    let server_addr = config.server_addr;
    info!(
        cache = %config.cache_path.display(),
        reset_cache_on_request = config.reset_cache_on_request,
        model = %config.gemini_model,
        "starting paper digest"
    );

    let app_state = AppState::new(config)?;
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;

    info!("Listening on http://{}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
