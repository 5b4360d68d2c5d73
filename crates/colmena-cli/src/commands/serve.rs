//! `colmena serve` - run the HTTP API server.

use colmena_core::ColmenaConfig;

pub async fn run(config: &ColmenaConfig) -> anyhow::Result<()> {
    colmena_server::run(config).await
}
