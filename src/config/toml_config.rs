use crate::utils::error::{GbizError, Result};
use regex::{Captures, Regex};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// 設定檔（`--config` 或 `GBIZINFO_CONFIG`）
///
/// ```toml
/// [gbizinfo]
/// api_token = "${GBIZINFO_API_TOKEN}"
/// base_url = "https://info.gbiz.go.jp/hojin/v1/hojin"
///
/// [http]
/// timeout_ms = 15000
/// retries = 1
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub gbizinfo: GbizinfoSection,
    #[serde(default)]
    pub http: HttpSection,
}

#[derive(Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GbizinfoSection {
    pub api_token: Option<String>,
    pub base_url: Option<String>,
}

impl fmt::Debug for GbizinfoSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GbizinfoSection")
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSection {
    pub timeout_ms: Option<u64>,
    pub retries: Option<u32>,
    pub user_agent: Option<String>,
    pub debug: Option<bool>,
}

impl FileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_vars(content, |name| std::env::var(name).ok())?;

        toml::from_str(&processed).map_err(|e| GbizError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

/// 替換 `${VAR}`，找不到的變數原樣保留
pub fn substitute_vars(content: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GbizError::Config {
        message: format!("Invalid substitution pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &Captures| {
        let name = &caps[1];
        lookup(name).unwrap_or_else(|| format!("${{{}}}", name))
    });

    Ok(result.into_owned())
}
