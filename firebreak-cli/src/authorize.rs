//! `boxoauth2`: run the authorization-code flow and save the refresh token.

use anyhow::Context;
use bridge_desktop::{JsonFileSecureStore, ReqwestHttpClient};
use bridge_traits::http::HttpClient;
use core_auth::{
    complete_authorization, CallbackListener, OAuthEndpoints, OAuthFlowManager, StateToken,
    TokenStore,
};
use core_runtime::CoreConfig;
use dialoguer::Password;
use std::sync::Arc;
use tracing::debug;

use crate::args::AuthorizeArgs;

pub async fn run(args: AuthorizeArgs) -> anyhow::Result<()> {
    crate::init_cli_logging(args.debug)?;
    let config = CoreConfig::builder().build()?;

    let client_secret = match &args.client_secret {
        Some(secret) => secret.clone(),
        None => Password::new()
            .with_prompt("Enter Box client_secret")
            .interact()
            .context("Failed to read client_secret")?,
    };

    let http_client: Arc<dyn HttpClient> =
        Arc::new(ReqwestHttpClient::with_timeout(config.http_timeout)?);
    let manager = OAuthFlowManager::new(OAuthEndpoints::from_config(&config), http_client);

    let secure_store =
        JsonFileSecureStore::open(&config.secrets_search_path, &config.secrets_filename).await?;
    let mut store = TokenStore::load(Arc::new(secure_store), args.fbtag.as_deref()).await?;

    // Listen before handing out the URI so a fast browser can't miss us.
    let listener = CallbackListener::bind(&config.listen_addr, config.listen_port).await?;
    debug!(addr = ?listener.local_addr().ok(), "Callback listener ready");

    let state = StateToken::generate();
    let uri = manager.build_auth_url(&args.client_id, &state, args.box_login.as_deref())?;
    println!("Paste this URI into your Web browser and authenticate to Box:\n");
    println!("{}\n", uri);

    let outcome = listener.accept_one(state).await?;
    complete_authorization(
        outcome,
        &manager,
        &args.client_id,
        &client_secret,
        &mut store,
    )
    .await?;

    println!("Saved secrets to {}", store.location());
    Ok(())
}
