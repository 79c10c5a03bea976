use crate::domain::ports::{
    ConfigProvider, HttpMethod, HttpTransport, OutboundRequest, RawResponse,
};
use crate::utils::error::{ApiServerError, GbizError, Result};
use serde_json::{json, Value};
use std::time::Duration;

/// 與 Swagger（v3 api-docs）的寫法一致
pub const AUTH_HEADER_NAME: &str = "X-hojinInfo-api-token";
pub const DEFAULT_USER_AGENT: &str = "gbizinfo-mcp/0.1 (+https://info.gbiz.go.jp/)";
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_RETRIES: u32 = 1;

const BACKOFF_BASE_MS: u64 = 500;
const PREVIEW_CHARS: usize = 500;
const REDACTED: &str = "<redacted>";
const LOG_TARGET: &str = "gbizinfo_mcp::http";

#[derive(Debug, Clone, Default)]
pub struct HttpRequestOptions {
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout_ms: Option<u64>,
    pub retries: Option<u32>,
}

/// 第 `attempt` 次失敗後的等待時間：500ms * 2^attempt
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(BACKOFF_BASE_MS.saturating_mul(1u64 << attempt.min(16)))
}

pub fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

pub fn redact_headers(headers: &[(String, String)]) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            if name.eq_ignore_ascii_case(AUTH_HEADER_NAME) {
                (name.clone(), REDACTED.to_string())
            } else {
                (name.clone(), value.clone())
            }
        })
        .collect()
}

fn headers_to_json(headers: &[(String, String)]) -> Value {
    let map = redact_headers(headers)
        .into_iter()
        .map(|(name, value)| (name, Value::String(value)))
        .collect::<serde_json::Map<_, _>>();
    Value::Object(map)
}

fn non_empty_scalar(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// 錯誤回應的 body 能解析成 JSON 就取 message / id / errors，否則附上截斷後的原文
pub fn parse_error_body(status: u16, body: &str) -> ApiServerError {
    let mut error = ApiServerError {
        status,
        message: format!("HTTP {}", status),
        id: None,
        details: None,
    };

    if body.trim().is_empty() {
        return error;
    }

    match serde_json::from_str::<Value>(body) {
        Ok(payload) => {
            if let Some(message) = non_empty_scalar(payload.get("message")) {
                error.message = message;
            }
            error.id = non_empty_scalar(payload.get("id"));
            error.details = payload.get("errors").filter(|v| !v.is_null()).cloned();
        }
        Err(_) => {
            error.message = format!("{}: {}", error.message, preview(body));
        }
    }

    error
}

pub fn request_record(request: &OutboundRequest, attempt: u32) -> Value {
    json!({
        "level": "debug",
        "event": "http_request",
        "method": request.method.as_str(),
        "url": request.url,
        "headers": headers_to_json(&request.headers),
        "bodyBytes": request.body.as_ref().map(|b| b.len()).unwrap_or(0),
        "attempt": attempt,
    })
}

pub fn response_ok_record(response: &RawResponse, url: &str, attempt: u32) -> Value {
    json!({
        "level": "debug",
        "event": "http_response_ok",
        "status": response.status,
        "url": url,
        "contentType": response.content_type.as_deref().unwrap_or(""),
        "preview": preview(&response.body),
        "attempt": attempt,
    })
}

pub fn response_error_record(
    error: &ApiServerError,
    response: &RawResponse,
    url: &str,
    attempt: u32,
) -> Value {
    json!({
        "level": "debug",
        "event": "http_response_error",
        "status": error.status,
        "url": url,
        "message": error.message,
        "id": error.id,
        "preview": preview(&response.body),
        "attempt": attempt,
    })
}

fn decode_success(response: RawResponse) -> Result<Value> {
    if !response.is_json() {
        return Ok(Value::String(response.body));
    }
    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&response.body).map_err(|e| {
        GbizError::communication(format!("Invalid JSON in response body: {}", e))
    })
}

/// gBizINFO 的 HTTP client。
///
/// - 5xx、transport 失敗與壞掉的 JSON 最多重試 `retries` 次（backoff 500ms * 2^n）
/// - 4xx 直接回傳 `ApiServer`
/// - 每次嘗試以 `timeout_ms` 為上限
pub struct HttpClient<T: HttpTransport> {
    transport: T,
    api_token: String,
    user_agent: String,
    timeout_ms: u64,
    retries: u32,
    debug: bool,
}

impl<T: HttpTransport> HttpClient<T> {
    pub fn new<C: ConfigProvider>(transport: T, config: &C) -> Self {
        Self {
            transport,
            api_token: config.api_token().to_string(),
            user_agent: config.user_agent().to_string(),
            timeout_ms: config.request_timeout_ms(),
            retries: config.retries(),
            debug: config.debug(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn build_request(&self, url: &str, options: &HttpRequestOptions) -> Result<OutboundRequest> {
        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
            ("User-Agent".to_string(), self.user_agent.clone()),
        ];
        headers.extend(
            options
                .headers
                .iter()
                .filter(|(name, _)| !name.eq_ignore_ascii_case(AUTH_HEADER_NAME))
                .cloned(),
        );
        headers.push((AUTH_HEADER_NAME.to_string(), self.api_token.clone()));

        let body = match &options.body {
            Some(value) => Some(serde_json::to_string(value)?),
            None => None,
        };

        Ok(OutboundRequest {
            method: options.method,
            url: url.to_string(),
            headers,
            body,
        })
    }

    /// record 的欄位直接攤成 tracing 欄位，JSON formatter 輸出時不會被包成字串
    fn trace(&self, record: Value) {
        if !self.debug {
            return;
        }
        fn text<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
            record.get(key).and_then(Value::as_str)
        }
        let number = |key: &str| record.get(key).and_then(Value::as_u64);
        tracing::debug!(
            target: LOG_TARGET,
            event = text(&record, "event"),
            method = text(&record, "method"),
            url = text(&record, "url"),
            status = number("status"),
            attempt = number("attempt"),
            content_type = text(&record, "contentType"),
            body_bytes = number("bodyBytes"),
            headers = record.get("headers").map(tracing::field::display),
            error = text(&record, "message"),
            error_id = text(&record, "id"),
            preview = text(&record, "preview"),
            "http diagnostic"
        );
    }

    pub async fn get(&self, url: &str) -> Result<Value> {
        self.request(url, &HttpRequestOptions::default()).await
    }

    pub async fn request(&self, url: &str, options: &HttpRequestOptions) -> Result<Value> {
        let timeout_ms = options.timeout_ms.unwrap_or(self.timeout_ms);
        let timeout = Duration::from_millis(timeout_ms);
        let retries = options.retries.unwrap_or(self.retries);
        let request = self.build_request(url, options)?;

        let mut attempt: u32 = 0;
        loop {
            self.trace(request_record(&request, attempt));

            let outcome = match tokio::time::timeout(timeout, self.transport.execute(&request)).await
            {
                Ok(result) => result,
                Err(_) => Err(GbizError::communication(format!(
                    "Request to {} timed out after {} ms",
                    url, timeout_ms
                ))),
            };
            let can_retry = attempt < retries;

            // 2xx 但 JSON 解析失敗時，與 transport 失敗一樣走重試
            let outcome = match outcome {
                Ok(response) if response.is_success() => {
                    self.trace(response_ok_record(&response, url, attempt));
                    match decode_success(response) {
                        Ok(value) => return Ok(value),
                        Err(err) => Err(err),
                    }
                }
                other => other,
            };

            match outcome {
                Ok(response) => {
                    let error = parse_error_body(response.status, &response.body);
                    self.trace(response_error_record(&error, &response, url, attempt));

                    if response.status >= 500 && can_retry {
                        let delay = backoff_delay(attempt);
                        tracing::warn!(
                            "⚠️ gBizINFO returned HTTP {} (attempt {}/{}), retrying in {:?}",
                            response.status,
                            attempt + 1,
                            retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    return Err(GbizError::ApiServer(error));
                }
                Err(err) => {
                    self.trace(json!({
                        "level": "debug",
                        "event": "http_transport_error",
                        "url": url,
                        "message": err.to_string(),
                        "attempt": attempt,
                    }));

                    if can_retry {
                        let delay = backoff_delay(attempt);
                        tracing::warn!(
                            "⚠️ Request failed (attempt {}/{}): {}, retrying in {:?}",
                            attempt + 1,
                            retries + 1,
                            err,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    return Err(err.into_communication());
                }
            }
        }
    }
}
