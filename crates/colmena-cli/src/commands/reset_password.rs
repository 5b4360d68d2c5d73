//! `colmena reset-password` - set a new password for an existing user.

use super::store_client;
use anyhow::{Context, bail};
use colmena_core::ColmenaConfig;

/// Shortest password the identity service accepts by default.
const MIN_PASSWORD_LEN: usize = 6;

pub async fn run(config: &ColmenaConfig, email: &str, password: &str) -> anyhow::Result<()> {
    validate_password(password)?;
    let client = store_client(config)?;

    let user = client
        .find_user_by_email(email)
        .await
        .context("failed to list users")?
        .with_context(|| format!("no user with email {email}"))?;

    client
        .update_user_password(&user.id, password)
        .await
        .with_context(|| format!("failed to update password for {email}"))?;

    tracing::info!(user_id = %user.id, "password reset");
    println!("  ✓ password updated for {email} ({})", user.id);
    Ok(())
}

fn validate_password(password: &str) -> anyhow::Result<()> {
    if password.trim().is_empty() {
        bail!("password must not be blank");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        bail!("password must be at least {MIN_PASSWORD_LEN} characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password() {
        assert!(validate_password("abc12").is_err());
        assert!(validate_password("      ").is_err());
        assert!(validate_password("abc123").is_ok());
        assert!(validate_password("contraseña").is_ok());
    }
}
