use grain_blend::{config::AppConfig, logging, start_server, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let app_config = AppConfig::from_env()?;
    let config = ServerConfig::from_app_config(&app_config)?;

    start_server(config).await?;

    Ok(())
}
