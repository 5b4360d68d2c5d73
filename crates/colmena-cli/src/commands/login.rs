//! `colmena login` - sign in and resolve the principal the API would see.
//!
//! The issued token goes through the same verifier and enrichment as a
//! request to `/api/auth/me`.

use super::store_client;
use anyhow::Context;
use colmena_auth::Authenticator;
use colmena_core::ColmenaConfig;
use std::sync::Arc;

pub async fn run(config: &ColmenaConfig, email: &str, password: &str) -> anyhow::Result<()> {
    let client = store_client(config)?;

    let session = client
        .sign_in_with_password(email, password)
        .await
        .with_context(|| format!("sign-in failed for {email}"))?;
    println!("  ✓ signed in (token expires in {}s)", session.expires_in.unwrap_or_default());

    let authenticator = Authenticator::new(Arc::new(client), config.identity.clone());
    let principal = authenticator
        .authenticate_token(Some(session.access_token.as_str()))
        .await
        .context("issued token did not verify")?;

    println!("{}", serde_json::to_string_pretty(&principal)?);
    Ok(())
}
