use color_eyre::eyre::Result;
use dotenv::dotenv;

use atelier_api::config::ApiConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    // Build the file-backed stores and shared state
    let state = atelier_api::build_state(config).await?;

    // Start API server
    atelier_api::start_server(state).await?;

    Ok(())
}
