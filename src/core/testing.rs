use crate::domain::ports::{ConfigProvider, HttpTransport, OutboundRequest, RawResponse};
use crate::utils::error::{GbizError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

pub struct TestConfig {
    pub api_token: String,
    pub base_url: String,
    pub request_timeout_ms: u64,
    pub retries: u32,
    pub user_agent: String,
    pub debug: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_token: "test-token".to_string(),
            base_url: "http://stub/hojin/".to_string(),
            request_timeout_ms: crate::core::http::DEFAULT_TIMEOUT_MS,
            retries: crate::core::http::DEFAULT_RETRIES,
            user_agent: crate::core::http::DEFAULT_USER_AGENT.to_string(),
            debug: true,
        }
    }
}

impl ConfigProvider for TestConfig {
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

pub fn json_response(status: u16, body: Value) -> RawResponse {
    RawResponse {
        status,
        content_type: Some("application/json;charset=UTF-8".to_string()),
        body: body.to_string(),
    }
}

pub fn text_response(status: u16, body: &str) -> RawResponse {
    RawResponse {
        status,
        content_type: Some("text/plain".to_string()),
        body: body.to_string(),
    }
}

/// 依序回傳預先排好的回應；排完後改回傳 `fallback`
pub struct StubTransport {
    queued: Mutex<VecDeque<Result<RawResponse>>>,
    fallback: Option<RawResponse>,
    delay: Option<Duration>,
    calls: Mutex<Vec<(OutboundRequest, Instant)>>,
}

impl StubTransport {
    pub fn new(responses: Vec<Result<RawResponse>>) -> Self {
        Self {
            queued: Mutex::new(responses.into()),
            fallback: None,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn repeating(response: RawResponse) -> Self {
        Self {
            fallback: Some(response),
            ..Self::new(Vec::new())
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(req, _)| req.clone())
            .collect()
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn execute(&self, request: &OutboundRequest) -> Result<RawResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((request.clone(), Instant::now()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.queued.lock().unwrap().pop_front();
        match next {
            Some(result) => result,
            None => self.fallback.clone().ok_or_else(|| GbizError::Unexpected {
                message: "stub transport has no more responses".to_string(),
            }),
        }
    }
}
