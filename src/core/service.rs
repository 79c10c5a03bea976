use crate::core::http::HttpClient;
use crate::core::mapper::map_companies;
use crate::core::query::{build_search_query, build_update_info_query};
use crate::domain::model::{Company, CompanyFilter, DetailKind, PaginatedResult, UpdateInfoPage};
use crate::domain::ports::{ConfigProvider, HttpTransport};
use crate::utils::error::{GbizError, Result};
use serde_json::Value;
use url::Url;

const ITEM_KEYS: [&str; 3] = ["hojin-infos", "items", "results"];
const TOTAL_KEYS: [&str; 3] = ["total", "count", "total-count"];
const UPDATE_INFO_SEGMENT: &str = "updateInfo";

fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// 回應外殼的 key 因版本而異：`hojin-infos` → `items` → `results`
pub fn extract_items(body: &Value) -> &[Value] {
    ITEM_KEYS
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn extract_total(body: &Value, fallback: usize) -> u64 {
    TOTAL_KEYS
        .iter()
        .find_map(|key| body.get(*key).and_then(as_count))
        .unwrap_or(fallback as u64)
}

pub struct GbizinfoService<T: HttpTransport> {
    http: HttpClient<T>,
    base_url: String,
}

impl<T: HttpTransport> GbizinfoService<T> {
    pub fn new(http: HttpClient<T>, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config<C: ConfigProvider>(transport: T, config: &C) -> Self {
        Self::new(HttpClient::new(transport, config), config.base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn http(&self) -> &HttpClient<T> {
        &self.http
    }

    pub fn search_url(&self, filter: &CompanyFilter) -> String {
        format!("{}?{}", self.base_url, build_search_query(filter))
    }

    fn url_with_segments(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| GbizError::Config {
            message: format!("Invalid base URL {}: {}", self.base_url, e),
        })?;
        url.path_segments_mut()
            .map_err(|_| GbizError::Config {
                message: format!("Base URL cannot carry a path: {}", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `{base}/{corporateNumber}[/{sub}]`，法人番號編碼成單一 path segment
    pub fn detail_url(&self, corporate_number: &str, kind: DetailKind) -> Result<String> {
        let mut segments = vec![corporate_number];
        segments.extend(kind.sub_resource());
        Ok(self.url_with_segments(&segments)?.into())
    }

    pub fn update_info_url(
        &self,
        kind: DetailKind,
        from: &str,
        to: &str,
        page: u32,
    ) -> Result<String> {
        let mut segments = vec![UPDATE_INFO_SEGMENT];
        segments.extend(kind.sub_resource());
        let mut url = self.url_with_segments(&segments)?;
        url.set_query(Some(&build_update_info_query(from, to, page)));
        Ok(url.into())
    }

    pub async fn search_companies(
        &self,
        filter: &CompanyFilter,
    ) -> Result<PaginatedResult<Company>> {
        let url = self.search_url(filter);
        tracing::debug!("📡 Searching gBizINFO: {}", url);

        let body = self
            .http
            .get(&url)
            .await
            .map_err(GbizError::into_communication)?;

        let items = extract_items(&body);
        let total = extract_total(&body, items.len());
        let companies = map_companies(items);

        tracing::info!(
            "📊 gBizINFO search returned {} of {} companies",
            companies.len(),
            total
        );

        Ok(PaginatedResult {
            items: companies,
            total,
            from: filter.page_or_default(),
            size: filter.limit_or_default(),
        })
    }

    pub async fn search_companies_by_name(
        &self,
        name: &str,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<PaginatedResult<Company>> {
        self.search_companies(&CompanyFilter::by_name(name, page, limit))
            .await
    }

    /// 個別資料不做 mapping，原樣回傳
    pub async fn get_detail(&self, kind: DetailKind, corporate_number: &str) -> Result<Value> {
        let url = self
            .detail_url(corporate_number, kind)
            .map_err(GbizError::into_communication)?;
        tracing::debug!("📡 Fetching {} info: {}", kind, url);

        self.http
            .get(&url)
            .await
            .map_err(GbizError::into_communication)
    }

    pub async fn get_basic_info(&self, corporate_number: &str) -> Result<Value> {
        self.get_detail(DetailKind::Basic, corporate_number).await
    }

    pub async fn get_certification(&self, corporate_number: &str) -> Result<Value> {
        self.get_detail(DetailKind::Certification, corporate_number)
            .await
    }

    pub async fn get_commendation(&self, corporate_number: &str) -> Result<Value> {
        self.get_detail(DetailKind::Commendation, corporate_number)
            .await
    }

    pub async fn get_finance(&self, corporate_number: &str) -> Result<Value> {
        self.get_detail(DetailKind::Finance, corporate_number).await
    }

    pub async fn get_patent(&self, corporate_number: &str) -> Result<Value> {
        self.get_detail(DetailKind::Patent, corporate_number).await
    }

    pub async fn get_procurement(&self, corporate_number: &str) -> Result<Value> {
        self.get_detail(DetailKind::Procurement, corporate_number)
            .await
    }

    pub async fn get_subsidy(&self, corporate_number: &str) -> Result<Value> {
        self.get_detail(DetailKind::Subsidy, corporate_number).await
    }

    pub async fn get_workplace(&self, corporate_number: &str) -> Result<Value> {
        self.get_detail(DetailKind::Workplace, corporate_number).await
    }

    /// 期間內的更新資訊（`DetailKind::Basic` 為基本資訊）
    pub async fn get_update_info(
        &self,
        kind: DetailKind,
        from: &str,
        to: &str,
        page: u32,
    ) -> Result<UpdateInfoPage> {
        let url = self
            .update_info_url(kind, from, to, page)
            .map_err(GbizError::into_communication)?;
        tracing::debug!("📡 Fetching update info: {}", url);

        let body = self
            .http
            .get(&url)
            .await
            .map_err(GbizError::into_communication)?;

        let items = body
            .get("hojin-infos")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let count = |key: &str| body.get(key).and_then(as_count).filter(|n| *n > 0);

        Ok(UpdateInfoPage {
            items: map_companies(items),
            page_number: count("pageNumber")
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(page),
            total_count: count("totalCount").unwrap_or(items.len() as u64),
            total_page: count("totalPage")
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{json_response, StubTransport, TestConfig};
    use serde_json::json;

    fn service(transport: StubTransport) -> GbizinfoService<StubTransport> {
        GbizinfoService::from_config(transport, &TestConfig::default())
    }

    #[tokio::test]
    async fn test_search_maps_hojin_infos_envelope() {
        let transport = StubTransport::repeating(json_response(
            200,
            json!({
                "hojin-infos": [{
                    "corporate_number": "1234567890123",
                    "name": "サンプル株式会社",
                    "prefecture_name": "東京都",
                    "city_name": "千代田区",
                    "address": "丸の内1-1-1",
                    "postal_code": "1000000",
                    "sic": "製造業"
                }],
                "total": 1
            }),
        ));
        let service = service(transport);

        let result = service
            .search_companies(&CompanyFilter::by_name("サンプル", Some(1), Some(1)))
            .await
            .unwrap();

        assert_eq!(result.total, 1);
        assert_eq!(result.from, 1);
        assert_eq!(result.size, 1);
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].corporate_number, "1234567890123");
        assert_eq!(result.items[0].name, "サンプル株式会社");
    }

    #[tokio::test]
    async fn test_envelope_fallback_results_and_count() {
        let transport = StubTransport::repeating(json_response(
            200,
            json!({"results": [{"corporate_number": "1"}, {"corporate_number": "2"}], "count": 5}),
        ));
        let service = service(transport);

        let result = service
            .search_companies_by_name("Acme", None, None)
            .await
            .unwrap();

        assert_eq!(result.items.len(), 2);
        assert_eq!(result.total, 5);
        assert_eq!(result.from, 1);
        assert_eq!(result.size, 20);
    }

    #[test]
    fn test_extract_helpers() {
        let body = json!({"items": [{}], "total-count": "7"});
        assert_eq!(extract_items(&body).len(), 1);
        assert_eq!(extract_total(&body, 1), 7);

        let empty = json!({"unexpected": true});
        assert!(extract_items(&empty).is_empty());
        assert_eq!(extract_total(&empty, 0), 0);

        let not_object = Value::String("oops".to_string());
        assert!(extract_items(&not_object).is_empty());
    }

    #[tokio::test]
    async fn test_from_and_size_echo_request_not_server() {
        let transport = StubTransport::repeating(json_response(
            200,
            json!({"hojin-infos": [], "page": 9, "limit": 99}),
        ));
        let service = service(transport);

        let result = service
            .search_companies_by_name("Acme", Some(3), Some(10))
            .await
            .unwrap();

        assert_eq!((result.from, result.size), (3, 10));
        assert_eq!(result.total, 0);
    }

    #[tokio::test]
    async fn test_search_is_idempotent_for_identical_bodies() {
        let transport = StubTransport::repeating(json_response(
            200,
            json!({"hojin-infos": [{"corporate_number": "1", "name_jp": "A"}], "total": 1}),
        ));
        let service = service(transport);
        let filter = CompanyFilter::by_name("A", None, None);

        let first = service.search_companies(&filter).await.unwrap();
        let second = service.search_companies(&filter).await.unwrap();

        assert_eq!(first, second);
        let requests = service.http().transport().requests();
        assert_eq!(requests[0].url, requests[1].url);
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_errors_are_wrapped_as_communication_errors() {
        let transport = StubTransport::repeating(json_response(
            503,
            json!({"message": "maintenance", "id": "M-1"}),
        ));
        let service = service(transport);

        let err = service.get_finance("1234567890123").await.unwrap_err();

        assert!(matches!(err, GbizError::ApiCommunication { .. }));
        let server = err.server_error().unwrap();
        assert_eq!(server.status, 503);
        assert_eq!(server.id.as_deref(), Some("M-1"));
        assert_eq!(service.http().transport().call_count(), 2);
    }

    #[test]
    fn test_detail_url_round_trip_with_mapped_company() {
        let service = service(StubTransport::new(Vec::new()));
        let company = crate::core::mapper::map_company(&json!({"corporate_number": "1234567890123"}));

        let url = service
            .detail_url(&company.corporate_number, DetailKind::Basic)
            .unwrap();
        assert_eq!(url, "http://stub/hojin/1234567890123");

        let url = service
            .detail_url(&company.corporate_number, DetailKind::Patent)
            .unwrap();
        assert_eq!(url, "http://stub/hojin/1234567890123/patent");
    }

    #[test]
    fn test_detail_url_percent_encodes_identifier() {
        let service = service(StubTransport::new(Vec::new()));

        let url = service.detail_url("12 3/4", DetailKind::Basic).unwrap();
        assert!(url.ends_with("/12%203%2F4"));
    }

    #[tokio::test]
    async fn test_lookups_hit_sub_resources_and_return_raw_body() {
        let body = json!({"hojin-infos": [{"corporate_number": "1234567890123", "finance": {}}]});
        let transport = StubTransport::repeating(json_response(200, body.clone()));
        let service = service(transport);

        assert_eq!(service.get_basic_info("1234567890123").await.unwrap(), body);
        service.get_certification("1234567890123").await.unwrap();
        service.get_commendation("1234567890123").await.unwrap();
        service.get_finance("1234567890123").await.unwrap();
        service.get_patent("1234567890123").await.unwrap();
        service.get_procurement("1234567890123").await.unwrap();
        service.get_subsidy("1234567890123").await.unwrap();
        service.get_workplace("1234567890123").await.unwrap();

        let urls: Vec<String> = service
            .http()
            .transport()
            .requests()
            .into_iter()
            .map(|r| r.url)
            .collect();
        assert_eq!(
            urls,
            vec![
                "http://stub/hojin/1234567890123",
                "http://stub/hojin/1234567890123/certification",
                "http://stub/hojin/1234567890123/commendation",
                "http://stub/hojin/1234567890123/finance",
                "http://stub/hojin/1234567890123/patent",
                "http://stub/hojin/1234567890123/procurement",
                "http://stub/hojin/1234567890123/subsidy",
                "http://stub/hojin/1234567890123/workplace",
            ]
        );
    }

    #[tokio::test]
    async fn test_update_info_page() {
        let transport = StubTransport::repeating(json_response(
            200,
            json!({
                "hojin-infos": [{"corporate_number": "1", "name": "A"}],
                "pageNumber": "2",
                "totalCount": "31",
                "totalPage": "4"
            }),
        ));
        let service = service(transport);

        let page = service
            .get_update_info(DetailKind::Subsidy, "20250101", "20250131", 2)
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.page_number, 2);
        assert_eq!(page.total_count, 31);
        assert_eq!(page.total_page, 4);
        assert_eq!(
            service.http().transport().requests()[0].url,
            "http://stub/hojin/updateInfo/subsidy?from=20250101&to=20250131&page=2"
        );
    }

    #[tokio::test]
    async fn test_update_info_defaults_when_envelope_is_sparse() {
        let transport = StubTransport::repeating(json_response(200, json!({})));
        let service = service(transport);

        let page = service
            .get_update_info(DetailKind::Basic, "20250101", "20250131", 3)
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.page_number, 3);
        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_page, 1);
    }

    #[tokio::test]
    async fn test_update_info_out_of_range_counts_fall_back() {
        let transport = StubTransport::repeating(json_response(
            200,
            json!({"hojin-infos": [], "pageNumber": 4_294_967_297u64, "totalCount": 10, "totalPage": 4_294_967_296u64}),
        ));
        let service = service(transport);

        let page = service
            .get_update_info(DetailKind::Basic, "20250101", "20250131", 2)
            .await
            .unwrap();

        assert_eq!(page.page_number, 2);
        assert_eq!(page.total_count, 10);
        assert_eq!(page.total_page, 1);
    }
}
