//! `colmena check` - verify the credential store is reachable and accepts
//! the service key.

use super::store_client;
use anyhow::Context;
use colmena_core::ColmenaConfig;

pub async fn run(config: &ColmenaConfig) -> anyhow::Result<()> {
    let client = store_client(config)?;
    println!("Credential store: {}", client.base_url());

    let health = client
        .health()
        .await
        .context("credential store health check failed")?;
    println!("  ✓ reachable ({} {})", health.name, health.version);

    let users = client
        .list_users(1, 1)
        .await
        .context("admin API rejected the service key")?;
    println!("  ✓ service key accepted ({} user(s) on first page)", users.len());

    tracing::info!(base_url = %client.base_url(), "connection check passed");
    Ok(())
}
