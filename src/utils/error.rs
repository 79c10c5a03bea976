use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// 上游 API 回傳非 2xx 時的分類結果
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("HTTP {status}: {message}")]
pub struct ApiServerError {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "errors", skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Error, Debug)]
pub enum GbizError {
    #[error("Input validation error: {message}")]
    InputValidation {
        field: Option<String>,
        message: String,
    },

    #[error("API communication error: {message}")]
    ApiCommunication {
        message: String,
        #[source]
        server: Option<ApiServerError>,
    },

    #[error("API server error: {0}")]
    ApiServer(ApiServerError),

    #[error("Domain error: {message}")]
    Domain { message: String },

    #[error("Unexpected error: {message}")]
    Unexpected { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<reqwest::Error> for GbizError {
    fn from(err: reqwest::Error) -> Self {
        GbizError::ApiCommunication {
            message: err.to_string(),
            server: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Network,
    Server,
    Configuration,
    Domain,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GbizError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        GbizError::InputValidation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    pub fn communication(message: impl Into<String>) -> Self {
        GbizError::ApiCommunication {
            message: message.into(),
            server: None,
        }
    }

    /// 將 HTTP client 的錯誤統一包成 ApiCommunication，保留已分類的 server payload
    pub fn into_communication(self) -> Self {
        match self {
            GbizError::ApiServer(server) => GbizError::ApiCommunication {
                message: server.message.clone(),
                server: Some(server),
            },
            err @ GbizError::ApiCommunication { .. } => err,
            other => GbizError::ApiCommunication {
                message: other.to_string(),
                server: None,
            },
        }
    }

    /// ApiServer 也屬於通訊錯誤
    pub fn is_communication(&self) -> bool {
        matches!(
            self,
            GbizError::ApiCommunication { .. } | GbizError::ApiServer(_)
        )
    }

    pub fn server_error(&self) -> Option<&ApiServerError> {
        match self {
            GbizError::ApiServer(server) => Some(server),
            GbizError::ApiCommunication { server, .. } => server.as_ref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.server_error().map(|s| s.status)
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            GbizError::InputValidation { .. } => ErrorCategory::Validation,
            GbizError::ApiCommunication { server: None, .. } => ErrorCategory::Network,
            GbizError::ApiCommunication { server: Some(_), .. } | GbizError::ApiServer(_) => {
                ErrorCategory::Server
            }
            GbizError::Domain { .. } => ErrorCategory::Domain,
            GbizError::MissingConfig { .. }
            | GbizError::InvalidConfigValue { .. }
            | GbizError::Config { .. } => ErrorCategory::Configuration,
            GbizError::Unexpected { .. }
            | GbizError::Io(_)
            | GbizError::Serialization(_)
            | GbizError::Csv(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Domain => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Server => match self.status() {
                Some(status) if status >= 500 => ErrorSeverity::Medium,
                _ => ErrorSeverity::High,
            },
            ErrorCategory::Configuration => ErrorSeverity::Critical,
            ErrorCategory::Internal => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            GbizError::InputValidation { message, .. } => message.clone(),
            GbizError::ApiCommunication { message, server } => match server {
                Some(s) => format!("gBizINFO API returned HTTP {}: {}", s.status, s.message),
                None => format!("Could not reach gBizINFO API: {}", message),
            },
            GbizError::ApiServer(s) => {
                format!("gBizINFO API returned HTTP {}: {}", s.status, s.message)
            }
            GbizError::MissingConfig { field } => format!("{} is required", field),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => "Check the search parameters and code values",
            ErrorCategory::Network => "Check network connectivity or raise REQUEST_TIMEOUT_MS",
            ErrorCategory::Server => match self.status() {
                Some(401) | Some(403) => "Check that GBIZINFO_API_TOKEN is valid",
                Some(404) => "Check the corporate number",
                Some(status) if status >= 500 => "gBizINFO is unavailable, retry later",
                _ => "Check the request parameters",
            },
            ErrorCategory::Configuration => {
                "Set GBIZINFO_API_TOKEN in the environment or .env (see .env.example)"
            }
            ErrorCategory::Domain | ErrorCategory::Internal => "Re-run with --verbose for details",
        }
    }
}

pub type Result<T> = std::result::Result<T, GbizError>;
