use anyhow::{Context, Result};
use sauce_api::client::{Auth, Client, ClientSettings, Init};
use sauce_api::portal::Portal;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, registry, EnvFilter};

pub mod config;

pub use config::{Config, ConfigError, DEFAULT_CONFIG_PATH};

/// An unauthenticated client for the production portal, paced per the config.
pub fn client(config: &Config) -> Result<Client<Init>> {
    let client = Client::new(Portal::default(), &config.client_settings())
        .context("could not set up HTTP client")?;
    Ok(client)
}

/// An unauthenticated client with default pacing, for public pages when no config is at hand.
pub fn public_client() -> Result<Client<Init>> {
    let client = Client::new(Portal::default(), &ClientSettings::default())
        .context("could not set up HTTP client")?;
    Ok(client)
}

pub async fn login(config: &Config) -> Result<Client<Auth>> {
    info!(username = config.creds().username(), "logging in");
    client(config)?
        .login(config.creds())
        .await
        .context("could not log in to SAUCE")
}

pub fn init_tracing() {
    registry()
        .with(fmt::layer().event_format(format().pretty()))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();
}
