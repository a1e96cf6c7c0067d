//! CLI argument definitions using clap
//!
//! Long flags keep their underscore spelling (`--client_id`, `--access_token`)
//! so existing scripts keep working.

use clap::Parser;
use core_runtime::logging::MAX_DEBUG_LEVEL;

/// Authorize firebreak against a Box account and save the refresh token
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "boxoauth2")]
#[command(version)]
pub struct AuthorizeArgs {
    /// Box application client_id
    #[arg(long = "client_id", required = true)]
    pub client_id: String,

    /// Box application client_secret (prompted for if omitted)
    #[arg(long = "client_secret")]
    pub client_secret: Option<String>,

    /// Pre-fill the Box login form with this user
    #[arg(long = "box_login")]
    pub box_login: Option<String>,

    /// Secrets tag to save the credentials under
    #[arg(long)]
    pub fbtag: Option<String>,

    /// Debug level 0-3
    #[arg(long, default_value_t = 0, value_parser = parse_debug)]
    pub debug: u8,
}

/// Walk a Box account and optionally submit files to WildFire
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "firebreak-box")]
#[command(version)]
pub struct ScanArgs {
    /// Use this access token instead of refreshing the saved one
    #[arg(long = "access_token")]
    pub access_token: Option<String>,

    /// Only visit files whose full path matches this glob
    #[arg(long = "match", value_name = "GLOB")]
    pub pattern: Option<String>,

    /// `.panrc` tag for the WildFire API key
    #[arg(long)]
    pub tag: Option<String>,

    /// Secrets tag holding the Box credentials
    #[arg(long)]
    pub fbtag: Option<String>,

    /// Submit each matched file to WildFire
    #[arg(long)]
    pub submit: bool,

    /// Debug level 0-3
    #[arg(long, default_value_t = 0, value_parser = parse_debug)]
    pub debug: u8,
}

fn parse_debug(raw: &str) -> Result<u8, String> {
    let level: u8 = raw
        .parse()
        .map_err(|_| format!("Invalid debug: {}", raw))?;
    if level > MAX_DEBUG_LEVEL {
        return Err(format!("Maximum debug level is {}", MAX_DEBUG_LEVEL));
    }
    Ok(level)
}
