//! `firebreak-box`: walk the Box account and optionally submit to WildFire.

use anyhow::{anyhow, Context};
use bridge_desktop::{find_in_search_path, JsonFileSecureStore, ReqwestHttpClient};
use bridge_traits::http::HttpClient;
use core_auth::{refresh_stored_credentials, OAuthEndpoints, OAuthFlowManager, TokenStore};
use core_runtime::CoreConfig;
use provider_box::{BoxConnector, FolderWalker, WalkReport, ROOT_FOLDER_ID};
use provider_wildfire::{PanRc, ScanSubmitter, WildFireClient};
use std::sync::Arc;
use tracing::{debug, info};

use crate::args::ScanArgs;

pub async fn run(args: ScanArgs) -> anyhow::Result<()> {
    crate::init_cli_logging(args.debug)?;
    let config = CoreConfig::builder().build()?;
    let http_client: Arc<dyn HttpClient> =
        Arc::new(ReqwestHttpClient::with_timeout(config.http_timeout)?);

    let access_token = match &args.access_token {
        Some(token) => token.clone(),
        None => refreshed_access_token(&config, http_client.clone(), args.fbtag.as_deref()).await?,
    };

    scan(&config, http_client, &args, access_token).await?;
    Ok(())
}

/// Trade the saved refresh token under `fbtag` for an access token.
async fn refreshed_access_token(
    config: &CoreConfig,
    http_client: Arc<dyn HttpClient>,
    fbtag: Option<&str>,
) -> anyhow::Result<String> {
    let secure_store =
        JsonFileSecureStore::open(&config.secrets_search_path, &config.secrets_filename).await?;
    let mut store = TokenStore::load(Arc::new(secure_store), fbtag).await?;
    let manager = OAuthFlowManager::new(OAuthEndpoints::from_config(config), http_client);

    let access_token = refresh_stored_credentials(&manager, &mut store).await?;
    info!(location = %store.location(), "Saved rotated refresh_token");
    Ok(access_token)
}

/// Walk from the root folder with `access_token`, submitting matched files
/// when `--submit` is set.
pub async fn scan(
    config: &CoreConfig,
    http_client: Arc<dyn HttpClient>,
    args: &ScanArgs,
    access_token: String,
) -> anyhow::Result<WalkReport> {
    let pattern = args
        .pattern
        .as_deref()
        .map(glob::Pattern::new)
        .transpose()
        .context("Invalid --match pattern")?;

    let submitter = if args.submit {
        let path = find_in_search_path(&config.panrc_search_path, &config.panrc_filename)
            .ok_or_else(|| {
                anyhow!(
                    "{} not found in {}",
                    config.panrc_filename,
                    config.panrc_search_path.join(", ")
                )
            })?;
        let panrc = PanRc::load(&path, args.tag.as_deref(), &config.wildfire_hostname).await?;
        Some(ScanSubmitter::new(WildFireClient::new(http_client.clone(), panrc)))
    } else {
        None
    };

    let connector =
        BoxConnector::with_api_base(http_client, access_token, config.box_api_base.as_str());

    let mut walker = FolderWalker::new(&connector);
    if let Some(pattern) = pattern {
        walker = walker.with_pattern(pattern);
    }
    if let Some(submitter) = &submitter {
        walker = walker.with_handler(submitter);
    }

    let report = walker.walk_folder(ROOT_FOLDER_ID).await?;
    debug!(?report, "Scan report");
    Ok(report)
}
