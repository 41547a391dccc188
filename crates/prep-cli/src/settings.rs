//! API connection settings for the CLI.
//!
//! Precedence, lowest first: built-in defaults, the TOML file given with
//! `--config`, `PREP_ADMIN_API_URL` / `PREP_ADMIN_TOKEN`, command-line flags.

use std::path::PathBuf;

use anyhow::{Context, Result};
use prep_client::ApiConfig;

/// Connection flags as parsed from the command line.
#[derive(Debug, Clone, Default)]
pub struct ConnectionArgs {
    pub config: Option<PathBuf>,
    pub api_url: Option<String>,
    pub token: Option<String>,
}

pub fn resolve_api_config(args: &ConnectionArgs) -> Result<ApiConfig> {
    resolve_api_config_with(args, |name| std::env::var(name).ok())
}

/// Same as [`resolve_api_config`] with an explicit environment lookup.
pub fn resolve_api_config_with(
    args: &ConnectionArgs,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ApiConfig> {
    let base = match &args.config {
        Some(path) => ApiConfig::load_from(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => ApiConfig::default(),
    };
    let mut config = base.with_overrides_from(lookup);
    if let Some(url) = &args.api_url {
        config = config.with_base_url(url.clone());
    }
    if let Some(token) = &args.token {
        config = config.with_access_token(Some(token.clone()));
    }
    config.parsed_base_url().context("invalid API base URL")?;
    Ok(config)
}
