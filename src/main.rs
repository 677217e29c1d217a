use appport::build_app;
use appport::config::AppConfig;
use axum::serve;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Default to Info, keep sqlx statement logging out of the way
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info,sqlx=warn"))
        .init();

    let config = AppConfig::load()?;
    log::info!(
        "{} {} starting: server={}",
        config.portfolio.app_name,
        config.portfolio.version,
        config.server_address()
    );

    let app = build_app(&config).await?;

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("AppPort server running on http://{}", bind_address);

    serve(listener, app).await?;

    Ok(())
}
