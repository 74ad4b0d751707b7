use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Placeholder store host used when neither the config file nor `SHOP` names one.
pub const DEFAULT_SHOP: &str = "your-store.myshopify.com";
/// Admin API version used in the GraphQL endpoint path.
pub const DEFAULT_API_VERSION: &str = "2026-01";

pub const ENV_SHOP: &str = "SHOP";
pub const ENV_ACCESS_TOKEN: &str = "ACCESS_TOKEN";
pub const ENV_API_VERSION: &str = "SHOPIFY_API_VERSION";
pub const ENV_DOWNLOAD_FOLDER: &str = "DOWNLOAD_FOLDER";
pub const ENV_OUTPUT_FILE: &str = "OUTPUT_FILE";

/// Store connection and output settings.
///
/// Loaded from `~/.config/shopfiles/config.toml`, then overridden by the
/// environment (and a `.env` file). Every field has a default, so a partial
/// config file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    /// Store host, e.g. `my-store.myshopify.com`.
    pub shop: String,
    /// Admin API access token sent as `X-Shopify-Access-Token`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    pub api_version: String,
    /// Directory that `download` writes files into.
    pub download_dir: PathBuf,
    /// File that `export` writes the file list to.
    pub output_file: PathBuf,
    /// Seconds a request may go without receiving data before it fails.
    pub download_timeout_secs: u64,
    /// Connect timeout for every HTTP request.
    pub connect_timeout_secs: u64,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            shop: DEFAULT_SHOP.to_string(),
            access_token: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            download_dir: PathBuf::from("downloads"),
            output_file: PathBuf::from("shopify_files_list.csv"),
            download_timeout_secs: 30,
            connect_timeout_secs: 15,
        }
    }
}

impl ShopConfig {
    /// GraphQL endpoint for the configured store and API version.
    pub fn api_url(&self) -> String {
        format!(
            "https://{}/admin/api/{}/graphql.json",
            self.shop_host(),
            self.api_version
        )
    }

    /// Store host with any scheme prefix and trailing slash removed.
    pub fn shop_host(&self) -> &str {
        let host = self.shop.trim();
        let host = host
            .strip_prefix("https://")
            .or_else(|| host.strip_prefix("http://"))
            .unwrap_or(host);
        host.trim_end_matches('/')
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Override fields from environment-style variables. Unset or blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(shop) = get(ENV_SHOP) {
            self.shop = shop;
        }
        if let Some(token) = get(ENV_ACCESS_TOKEN) {
            self.access_token = Some(token);
        }
        if let Some(version) = get(ENV_API_VERSION) {
            self.api_version = version;
        }
        if let Some(dir) = get(ENV_DOWNLOAD_FOLDER) {
            self.download_dir = PathBuf::from(dir);
        }
        if let Some(out) = get(ENV_OUTPUT_FILE) {
            self.output_file = PathBuf::from(out);
        }
    }
}

const CONFIG_FILE: &str = "config.toml";

/// Load configuration from disk, creating a default file if none exists.
/// An unusable config location falls back to defaults with a warning.
pub fn load_or_init() -> Result<ShopConfig> {
    let xdg_dirs = match xdg::BaseDirectories::with_prefix("shopfiles") {
        Ok(dirs) => dirs,
        Err(e) => {
            tracing::warn!("no config directory ({}); using defaults", e);
            return Ok(ShopConfig::default());
        }
    };
    load_or_init_at(&xdg_dirs.get_config_home().join(CONFIG_FILE))
}

/// Like `load_or_init`, for an explicit path. Only an existing file that
/// cannot be read or parsed is an error.
pub fn load_or_init_at(path: &Path) -> Result<ShopConfig> {
    if path.exists() {
        return load_from_path(path);
    }

    let default_cfg = ShopConfig::default();
    match write_default(path, &default_cfg) {
        Ok(()) => tracing::info!("created default config at {}", path.display()),
        Err(e) => tracing::warn!(
            "could not create default config at {}: {:#}; using defaults",
            path.display(),
            e
        ),
    }
    Ok(default_cfg)
}

fn write_default(path: &Path, cfg: &ShopConfig) -> Result<()> {
    let toml = toml::to_string_pretty(cfg)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config dir {}", parent.display()))?;
    }
    fs::write(path, toml)?;
    Ok(())
}

/// Parse a config file at `path`.
pub fn load_from_path(path: &Path) -> Result<ShopConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: ShopConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

/// Config file, then `.env` in the working directory, then the process environment.
pub fn load() -> Result<ShopConfig> {
    let mut cfg = load_or_init()?;
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("ignoring unreadable .env file: {}", e),
    }
    cfg.apply_env(|key| std::env::var(key).ok());
    if cfg.access_token.is_none() {
        tracing::warn!("no access token configured; set {} or access_token", ENV_ACCESS_TOKEN);
    }
    Ok(cfg)
}
