pub mod check;
pub mod login;
pub mod reset_password;
pub mod serve;

use anyhow::Context;
use colmena_auth::GoTrueClient;
use colmena_core::ColmenaConfig;

/// Build the credential store client, failing fast when it is not configured.
pub fn store_client(config: &ColmenaConfig) -> anyhow::Result<GoTrueClient> {
    let settings = config
        .credential_store
        .resolve()
        .context("credential store is not configured")?;
    Ok(GoTrueClient::new(&settings)?)
}
