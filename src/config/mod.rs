#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};
pub use toml_config::FileConfig;

use crate::core::http::{DEFAULT_RETRIES, DEFAULT_TIMEOUT_MS, DEFAULT_USER_AGENT};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{GbizError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_required_field, validate_url, Validate,
};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://info.gbiz.go.jp/hojin/v1/hojin";
pub const MAX_RETRIES: u32 = 10;

pub const ENV_API_TOKEN: &str = "GBIZINFO_API_TOKEN";
pub const ENV_BASE_URL: &str = "GBIZINFO_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "REQUEST_TIMEOUT_MS";
pub const ENV_RETRIES: &str = "GBIZINFO_RETRIES";
pub const ENV_USER_AGENT: &str = "GBIZINFO_USER_AGENT";
pub const ENV_DEBUG: &str = "GBIZINFO_DEBUG";
pub const ENV_CONFIG_FILE: &str = "GBIZINFO_CONFIG";

/// 啟動時組裝一次，之後唯讀
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_token: String,
    pub base_url: String,
    pub request_timeout_ms: u64,
    pub retries: u32,
    pub user_agent: String,
    pub debug: bool,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("retries", &self.retries)
            .field("user_agent", &self.user_agent)
            .field("debug", &self.debug)
            .finish()
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| GbizError::InvalidConfigValue {
            field: field.to_string(),
            value: raw.to_string(),
            reason: "Expected a non-negative integer".to_string(),
        })
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl AppConfig {
    /// 優先順位：既定値 < 設定檔 < 環境變數
    pub fn resolve(
        file: Option<&FileConfig>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let env = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let file = file.cloned().unwrap_or_default();

        let api_token = env(ENV_API_TOKEN).or(file.gbizinfo.api_token);
        let api_token = validate_required_field(ENV_API_TOKEN, &api_token)?
            .trim()
            .to_string();

        let base_url = env(ENV_BASE_URL)
            .or(file.gbizinfo.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let request_timeout_ms = match env(ENV_TIMEOUT_MS) {
            Some(raw) => parse_number(ENV_TIMEOUT_MS, &raw)?,
            None => file.http.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
        };

        let retries = match env(ENV_RETRIES) {
            Some(raw) => parse_number(ENV_RETRIES, &raw)?,
            None => file.http.retries.unwrap_or(DEFAULT_RETRIES),
        };

        let user_agent = env(ENV_USER_AGENT)
            .or(file.http.user_agent)
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let debug = match env(ENV_DEBUG) {
            Some(raw) => parse_flag(&raw),
            None => file.http.debug.unwrap_or(false),
        };

        Ok(Self {
            api_token,
            base_url,
            request_timeout_ms,
            retries,
            user_agent,
            debug,
        })
    }

    /// 依序載入 `.env`、設定檔、環境變數，並完成驗證
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        load_env_files();

        let path = config_file
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(ENV_CONFIG_FILE).map(PathBuf::from));

        let file = match path {
            Some(path) => {
                tracing::debug!("📄 Loading config file: {}", path.display());
                Some(FileConfig::from_file(&path)?)
            }
            None => None,
        };

        let config = Self::resolve(file.as_ref(), |key| std::env::var(key).ok())?;
        config.validate()?;
        tracing::debug!("Resolved config: {:?}", config);
        Ok(config)
    }

    /// CLI 旗標優先
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug |= debug;
        self
    }
}

/// 作業目錄的 `.env` 之後，token 還沒有就再找執行檔旁邊的 `.env`。
/// 已存在的環境變數不會被覆寫。
pub fn load_env_files() {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("📄 Loaded {}", path.display());
    }

    if std::env::var(ENV_API_TOKEN).is_ok() {
        return;
    }

    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(".env")));
    if let Some(path) = beside_exe {
        if dotenvy::from_path(&path).is_ok() {
            tracing::debug!("📄 Loaded {}", path.display());
        }
    }
}

impl ConfigProvider for AppConfig {
    fn api_token(&self) -> &str {
        &self.api_token
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request_timeout_ms(&self) -> u64 {
        self.request_timeout_ms
    }

    fn retries(&self) -> u32 {
        self.retries
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn debug(&self) -> bool {
        self.debug
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string(ENV_API_TOKEN, &self.api_token)?;
        validate_url(ENV_BASE_URL, &self.base_url)?;
        validate_range(ENV_TIMEOUT_MS, self.request_timeout_ms, 1, u64::MAX)?;
        validate_range(ENV_RETRIES, self.retries, 0, MAX_RETRIES)?;
        validate_non_empty_string(ENV_USER_AGENT, &self.user_agent)?;
        Ok(())
    }
}
