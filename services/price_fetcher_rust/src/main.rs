use anyhow::{bail, Context, Result};
use bullion_rust_core::db::{create_pool, DbPoolConfig};
use bullion_rust_core::BtmcClient;
use dotenv::dotenv;
use price_fetcher_rust::{Config, CycleOutcome, PriceFetcher};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting price fetcher...");

    // Config
    let config = Config::from_env()?;

    // Feed client
    let mut client = BtmcClient::with_timeout(config.api_key.clone(), config.timeout)
        .context("Failed to create BTMC client")?;
    if let Some(base_url) = &config.base_url {
        client = client.with_base_url(base_url.as_str());
    }

    // Database
    let pool = match &config.database_url {
        Some(url) => {
            let pool_config = DbPoolConfig::from_env_with_defaults(DbPoolConfig::default());
            Some(create_pool(url, &pool_config).await?)
        }
        None => {
            info!("No database configured, quotes will not be stored");
            None
        }
    };

    let fetcher = PriceFetcher::new(client, pool);

    match config.fetch_interval {
        Some(interval) => fetcher.run(interval).await,
        None => match fetcher.run_cycle().await? {
            CycleOutcome::Fetched { result, .. } => {
                println!("{}", serde_json::to_string_pretty(&result)?);
                Ok(())
            }
            CycleOutcome::Unreachable => bail!("BTMC feed unreachable"),
        },
    }
}
