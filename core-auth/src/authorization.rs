//! The two credential flows the binaries run.
//!
//! - [`complete_authorization`]: callback outcome → code exchange → saved record
//! - [`refresh_stored_credentials`]: saved record → access token, with the
//!   rotated refresh token saved back

use crate::callback::CallbackOutcome;
use crate::error::{AuthError, Result};
use crate::oauth::OAuthFlowManager;
use crate::token_store::TokenStore;
use crate::types::CredentialField;
use tracing::{info, instrument};

/// Finish the authorization-code flow.
///
/// Any outcome other than [`CallbackOutcome::Authorized`] fails without
/// contacting the token endpoint. On success the client credentials and the
/// new refresh token are written to `store` and persisted.
#[instrument(skip_all, fields(tag = %store.tag()))]
pub async fn complete_authorization(
    outcome: CallbackOutcome,
    manager: &OAuthFlowManager,
    client_id: &str,
    client_secret: &str,
    store: &mut TokenStore,
) -> Result<()> {
    let code = outcome.into_code()?;

    let exchange = manager
        .exchange_code_for_refresh_token(client_id, client_secret, &code)
        .await?;

    let refresh_token = exchange.value.ok_or_else(|| {
        AuthError::MissingCredential("Token endpoint returned no refresh_token".to_string())
    })?;

    store.set(CredentialField::ClientId, client_id);
    store.set(CredentialField::ClientSecret, client_secret);
    store.set(CredentialField::RefreshToken, refresh_token);
    store.save().await?;

    info!(location = %store.location(), "Authorization complete");
    Ok(())
}

/// Trade the stored refresh token for an access token.
///
/// The refresh token is single-use on Box, so the rotated one is saved
/// before the access token is returned.
#[instrument(skip_all, fields(tag = %store.tag()))]
pub async fn refresh_stored_credentials(
    manager: &OAuthFlowManager,
    store: &mut TokenStore,
) -> Result<String> {
    let refresh_token = store.record().require(CredentialField::RefreshToken)?;
    let client_id = store.record().require(CredentialField::ClientId)?;
    let client_secret = store.record().require(CredentialField::ClientSecret)?;

    let exchange = manager
        .exchange_refresh_token_for_access_token(client_id, client_secret, refresh_token)
        .await?;

    let tokens = exchange.value.ok_or_else(|| {
        AuthError::MissingCredential("Can't get access_token from refresh_token".to_string())
    })?;

    store.set(CredentialField::RefreshToken, tokens.refresh_token);
    store.save().await?;

    Ok(tokens.access_token)
}
