//! MCP tool handlers. Every tool goes through the controller so the CLI and MCP
//! surfaces validate input the same way.

use super::protocol::ToolCallResult;
use super::tools::{GET_UPDATE_INFO, SEARCH, SEARCH_COMPANIES};
use crate::core::controller::CompanySearchController;
use crate::core::presenter::{present_company_list_page, present_update_info_page};
use crate::domain::model::{CompanyFilter, DetailKind};
use crate::domain::ports::HttpTransport;
use crate::utils::error::{GbizError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NameSearchArgs {
    name: String,
    from: Option<u32>,
    size: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct LookupArgs {
    corporate_number: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UpdateInfoArgs {
    from: String,
    to: String,
    page: Option<u32>,
    kind: Option<DetailKind>,
}

/// 沒帶 arguments 視為空物件
fn parse_arguments<A: DeserializeOwned>(args: Value) -> Result<A> {
    let args = match args {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(args).map_err(|e| GbizError::InputValidation {
        field: None,
        message: format!("Invalid arguments: {}", e),
    })
}

fn to_pretty_json<V: Serialize>(value: &V) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub struct ToolHandlers<T: HttpTransport> {
    controller: CompanySearchController<T>,
}

impl<T: HttpTransport> ToolHandlers<T> {
    pub fn new(controller: CompanySearchController<T>) -> Self {
        Self { controller }
    }

    pub fn controller(&self) -> &CompanySearchController<T> {
        &self.controller
    }

    /// 失敗以 `isError: true` 的結果回傳，而非 JSON-RPC error
    pub async fn handle(&self, name: &str, args: Value) -> ToolCallResult {
        match self.dispatch(name, args).await {
            Ok(text) => ToolCallResult::text(text),
            Err(e) => {
                tracing::warn!(
                    "❌ Tool {} failed: {} (Category: {:?})",
                    name,
                    e,
                    e.category()
                );
                ToolCallResult::error(e.user_friendly_message())
            }
        }
    }

    async fn dispatch(&self, name: &str, args: Value) -> Result<String> {
        match name {
            SEARCH => self.search(args).await,
            SEARCH_COMPANIES => self.search_companies(args).await,
            GET_UPDATE_INFO => self.update_info(args).await,
            other => match DetailKind::from_tool_name(other) {
                Some(kind) => self.lookup(kind, args).await,
                None => Err(GbizError::validation(
                    "name",
                    format!("Unknown tool: {}", other),
                )),
            },
        }
    }

    async fn search(&self, args: Value) -> Result<String> {
        let filter: CompanyFilter = parse_arguments(args)?;
        let page = self.controller.search(&filter).await?;
        to_pretty_json(&present_company_list_page(&page))
    }

    async fn search_companies(&self, args: Value) -> Result<String> {
        let args: NameSearchArgs = parse_arguments(args)?;
        let page = self
            .controller
            .search_by_name(&args.name, args.from, args.size)
            .await?;
        to_pretty_json(&present_company_list_page(&page))
    }

    async fn lookup(&self, kind: DetailKind, args: Value) -> Result<String> {
        let args: LookupArgs = parse_arguments(args)?;
        let data = self.controller.lookup(kind, &args.corporate_number).await?;
        to_pretty_json(&data)
    }

    async fn update_info(&self, args: Value) -> Result<String> {
        let args: UpdateInfoArgs = parse_arguments(args)?;
        let page = self
            .controller
            .update_info(
                args.kind.unwrap_or(DetailKind::Basic),
                &args.from,
                &args.to,
                args.page,
            )
            .await?;
        to_pretty_json(&present_update_info_page(&page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::service::GbizinfoService;
    use crate::core::testing::{json_response, StubTransport, TestConfig};
    use serde_json::json;

    fn handlers(body: Value) -> ToolHandlers<StubTransport> {
        let transport = StubTransport::repeating(json_response(200, body));
        ToolHandlers::new(CompanySearchController::new(GbizinfoService::from_config(
            transport,
            &TestConfig::default(),
        )))
    }

    fn requested_urls(handlers: &ToolHandlers<StubTransport>) -> Vec<String> {
        handlers
            .controller()
            .service()
            .http()
            .transport()
            .requests()
            .into_iter()
            .map(|r| r.url)
            .collect()
    }

    #[tokio::test]
    async fn test_search_returns_presented_page() {
        let handlers = handlers(json!({
            "hojin-infos": [{
                "corporate_number": "1234567890123",
                "name": "Acme",
                "prefecture_name": "東京都",
                "city_name": "港区"
            }],
            "total": 1
        }));

        let result = handlers
            .handle(SEARCH, json!({"name": "Acme", "from": 1, "size": 5}))
            .await;

        assert_eq!(result.is_error, None);
        let view: Value = serde_json::from_str(&result.content[0].text).unwrap();
        assert_eq!(view["items"][0]["address"], "東京都港区");
        assert_eq!(view["size"], 5);
        assert_eq!(requested_urls(&handlers), vec!["http://stub/hojin?name=Acme&page=1&limit=5"]);
    }

    #[tokio::test]
    async fn test_validation_failure_is_error_result() {
        let handlers = handlers(json!({}));

        let result = handlers
            .handle(SEARCH, json!({"capitalStockFrom": 100}))
            .await;

        assert_eq!(result.is_error, Some(true));
        assert!(requested_urls(&handlers).is_empty());
    }

    #[tokio::test]
    async fn test_unknown_arguments_are_rejected() {
        let handlers = handlers(json!({}));

        let result = handlers.handle(SEARCH, json!({"nmae": "Acme"})).await;
        assert_eq!(result.is_error, Some(true));
        assert!(result.content[0].text.contains("Invalid arguments"));

        let result = handlers.handle(SEARCH_COMPANIES, Value::Null).await;
        assert_eq!(result.is_error, Some(true));
    }

    #[tokio::test]
    async fn test_lookup_tools_dispatch_by_name() {
        let body = json!({"hojin-infos": [{"corporate_number": "1234567890123", "patent": []}]});
        let handlers = handlers(body.clone());

        let result = handlers
            .handle("get_patent", json!({"corporateNumber": "1234567890123"}))
            .await;

        assert_eq!(result.is_error, None);
        let data: Value = serde_json::from_str(&result.content[0].text).unwrap();
        assert_eq!(data, body);
        assert_eq!(
            requested_urls(&handlers),
            vec!["http://stub/hojin/1234567890123/patent"]
        );
    }

    #[tokio::test]
    async fn test_update_info_tool() {
        let handlers = handlers(json!({"hojin-infos": [], "totalCount": 0, "totalPage": 0}));

        let result = handlers
            .handle(
                GET_UPDATE_INFO,
                json!({"from": "20250101", "to": "20250110", "kind": "subsidy"}),
            )
            .await;

        assert_eq!(result.is_error, None);
        assert_eq!(
            requested_urls(&handlers),
            vec!["http://stub/hojin/updateInfo/subsidy?from=20250101&to=20250110&page=1"]
        );
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let handlers = handlers(json!({}));

        let result = handlers.handle("get_everything", json!({})).await;
        assert_eq!(result.is_error, Some(true));
        assert!(result.content[0].text.contains("Unknown tool: get_everything"));
    }
}
