use crxup_api::setup;
use crxup_core::ServerConfig;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = ServerConfig::from_env()?;

    let (state, router) = setup::initialize_app(config.clone()).await?;

    setup::server::start_server(&config, &state, router).await?;

    Ok(())
}
