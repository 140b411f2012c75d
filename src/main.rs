use log::{error, info};

mod config;
mod core;
mod error;
mod hosts;
mod providers;

use crate::config::Config;
use crate::core::provider::DnsProvider;
use crate::error::Error;
use providers::dynect::{DynectConfig, DynectProvider};

async fn update_host(provider: &dyn DnsProvider, config: &Config, ip: &str) -> Result<(), Error> {
    if ip.is_empty() {
        return Err(Error::InvalidInput("empty IP address".to_string()));
    }
    info!(
        "updating {} in zone {} to {} (force: {})",
        config.fqdn, config.zone, ip, config.force
    );
    provider
        .update_a_record(&config.zone, &config.fqdn, ip, config.force)
        .await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?.with_args(std::env::args().skip(1));

    // Initialize logging
    if config.debug {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt::init();
    }

    let ip = hosts::public_ip_from_hosts()?;

    let provider = DynectProvider::new(
        DynectConfig {
            api_url: config.api_url.clone(),
            retry_interval: config.retry_interval,
        },
        &config.customer,
        &config.username,
        &config.password,
    )
    .await?;

    match update_host(&provider, &config, &ip).await {
        Ok(()) => {
            info!("successfully updated {} to {}", config.fqdn, ip);
            Ok(())
        }
        Err(e) => {
            error!("failed to update {}: {}", config.fqdn, e);
            Err(e.into())
        }
    }
}
