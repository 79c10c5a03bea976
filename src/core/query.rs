use crate::domain::model::CompanyFilter;
use url::form_urlencoded;

/// 依固定順序收集 key=value，最後序列化成 query string
#[derive(Debug, Default)]
struct QueryPairs {
    pairs: Vec<(&'static str, String)>,
}

impl QueryPairs {
    fn text(&mut self, key: &'static str, value: Option<&str>) {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.pairs.push((key, v.to_string()));
        }
    }

    // 0 也要送出
    fn number(&mut self, key: &'static str, value: Option<i64>) {
        if let Some(v) = value {
            self.pairs.push((key, v.to_string()));
        }
    }

    fn flag(&mut self, key: &'static str, value: Option<bool>) {
        if let Some(v) = value {
            self.pairs.push((key, v.to_string()));
        }
    }

    fn finish(self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }
}

/// 將檢索條件轉成上游的 snake_case query string。
///
/// 同樣的輸入永遠得到同樣的輸出；`page` / `limit` 一定會出現。
pub fn build_search_query(filter: &CompanyFilter) -> String {
    let mut q = QueryPairs::default();

    q.text("name", filter.name.as_deref());
    q.text("corporate_number", filter.corporate_number.as_deref());
    q.text("corporate_type", filter.corporate_type.as_deref());
    q.flag("exist_flg", filter.exist_flg);
    q.text("prefecture", filter.prefecture.as_deref());
    q.text("city", filter.city.as_deref());
    q.text("address", filter.address.as_deref());
    q.text("industry", filter.industry.as_deref());
    q.text("business_item", filter.business_item.as_deref());
    q.text("founded_year", filter.founded_year.as_deref());
    q.text("sales_area", filter.sales_area.as_deref());

    q.text("unified_qualification", filter.unified_qualification.as_deref());
    q.text("unified_qualification_sub01", filter.unified_qualification_sub01.as_deref());
    q.text("unified_qualification_sub02", filter.unified_qualification_sub02.as_deref());
    q.text("unified_qualification_sub03", filter.unified_qualification_sub03.as_deref());
    q.text("unified_qualification_sub04", filter.unified_qualification_sub04.as_deref());

    q.number("net_sales_summary_of_business_results_from", filter.net_sales_from);
    q.number("net_sales_summary_of_business_results_to", filter.net_sales_to);
    q.number("net_income_loss_summary_of_business_results_from", filter.net_income_loss_from);
    q.number("net_income_loss_summary_of_business_results_to", filter.net_income_loss_to);
    q.number("total_assets_summary_of_business_results_from", filter.total_assets_from);
    q.number("total_assets_summary_of_business_results_to", filter.total_assets_to);
    q.number("operating_revenue1_summary_of_business_results_from", filter.operating_revenue1_from);
    q.number("operating_revenue1_summary_of_business_results_to", filter.operating_revenue1_to);
    q.number("operating_revenue2_summary_of_business_results_from", filter.operating_revenue2_from);
    q.number("operating_revenue2_summary_of_business_results_to", filter.operating_revenue2_to);
    q.number(
        "ordinary_income_loss_summary_of_business_results_from",
        filter.ordinary_income_loss_from,
    );
    q.number(
        "ordinary_income_loss_summary_of_business_results_to",
        filter.ordinary_income_loss_to,
    );
    q.number("ordinary_income_summary_of_business_results_from", filter.ordinary_income_from);
    q.number("ordinary_income_summary_of_business_results_to", filter.ordinary_income_to);
    q.number("capital_stock_from", filter.capital_stock_from);
    q.number("capital_stock_to", filter.capital_stock_to);
    q.number("employee_number_from", filter.employee_number_from);
    q.number("employee_number_to", filter.employee_number_to);
    q.text("establishment_from", filter.establishment_from.as_deref());
    q.text("establishment_to", filter.establishment_to.as_deref());

    q.text("name_major_shareholders", filter.name_major_shareholders.as_deref());
    q.text(
        "average_continuous_service_years",
        filter.average_continuous_service_years.as_deref(),
    );
    q.text("average_age", filter.average_age.as_deref());
    q.text(
        "month_average_predetermined_overtime_hours",
        filter.month_average_predetermined_overtime_hours.as_deref(),
    );
    q.text("female_workers_proportion", filter.female_workers_proportion.as_deref());
    q.text("year", filter.year.as_deref());
    q.text("ministry", filter.ministry.as_deref());
    q.text("source", filter.source.as_deref());

    q.pairs.push(("page", filter.page_or_default().to_string()));
    q.pairs.push(("limit", filter.limit_or_default().to_string()));

    q.finish()
}

/// 期間更新資訊的 query
pub fn build_update_info_query(from: &str, to: &str, page: u32) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair("from", from)
        .append_pair("to", to)
        .append_pair("page", &page.to_string())
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_only_filter() {
        let filter = CompanyFilter::by_name("Acme", None, None);
        assert_eq!(build_search_query(&filter), "name=Acme&page=1&limit=20");
    }

    #[test]
    fn test_zero_numeric_values_are_kept() {
        let filter = CompanyFilter {
            name: Some("Acme".to_string()),
            capital_stock_from: Some(0),
            employee_number_to: Some(0),
            net_sales_from: Some(0),
            ..Default::default()
        };

        let query = build_search_query(&filter);
        assert!(query.contains("capital_stock_from=0"));
        assert!(query.contains("employee_number_to=0"));
        assert!(query.contains("net_sales_summary_of_business_results_from=0"));
    }

    #[test]
    fn test_blank_strings_are_skipped_and_values_trimmed() {
        let filter = CompanyFilter {
            name: Some("  Acme ".to_string()),
            address: Some("   ".to_string()),
            city: Some(String::new()),
            ..Default::default()
        };

        assert_eq!(build_search_query(&filter), "name=Acme&page=1&limit=20");
    }

    #[test]
    fn test_booleans_only_when_defined() {
        let mut filter = CompanyFilter::by_name("Acme", None, None);
        assert!(!build_search_query(&filter).contains("exist_flg"));

        filter.exist_flg = Some(false);
        assert!(build_search_query(&filter).contains("exist_flg=false"));
    }

    #[test]
    fn test_key_translation_and_order() {
        let filter = CompanyFilter {
            corporate_type: Some("301,305".to_string()),
            prefecture: Some("13".to_string()),
            unified_qualification_sub02: Some("A".to_string()),
            operating_revenue2_to: Some(500),
            establishment_from: Some("2000-01-01".to_string()),
            page: Some(3),
            limit: Some(100),
            ..Default::default()
        };

        assert_eq!(
            build_search_query(&filter),
            "corporate_type=301%2C305&prefecture=13&unified_qualification_sub02=A\
             &operating_revenue2_summary_of_business_results_to=500\
             &establishment_from=2000-01-01&page=3&limit=100"
        );
    }

    #[test]
    fn test_output_is_deterministic() {
        let filter = CompanyFilter {
            name: Some("株式会社テスト".to_string()),
            net_income_loss_from: Some(100),
            exist_flg: Some(true),
            ..Default::default()
        };

        assert_eq!(build_search_query(&filter), build_search_query(&filter.clone()));
        assert!(build_search_query(&filter).starts_with("name=%E6%A0%AA"));
    }

    #[test]
    fn test_update_info_query() {
        assert_eq!(
            build_update_info_query("20250101", "20250131", 2),
            "from=20250101&to=20250131&page=2"
        );
    }
}
