mod error;
mod handlers;
mod setup;
mod state;

use promptforge_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load .env for local development; a missing file is fine.
    dotenvy::dotenv().ok();

    setup::telemetry::init_telemetry();

    let config = Config::from_env()?;

    let (_state, router) = setup::initialize_app(config.clone()).await?;

    setup::server::start_server(&config, router).await?;

    Ok(())
}
