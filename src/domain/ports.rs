use crate::utils::error::Result;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Transport 看到的單次請求，header 已組好
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
            .unwrap_or(false)
    }
}

/// 實際送出 HTTP 的邊界。重試與逾時由 HttpClient 負責，transport 只送一次。
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: &OutboundRequest) -> Result<RawResponse>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_token(&self) -> &str;
    fn base_url(&self) -> &str;
    fn request_timeout_ms(&self) -> u64;
    fn retries(&self) -> u32;
    fn user_agent(&self) -> &str;
    fn debug(&self) -> bool;
}
