use crate::core::service::GbizinfoService;
use crate::core::validator;
use crate::domain::model::{
    Company, CompanyFilter, DetailKind, PaginatedResult, UpdateInfoPage, DEFAULT_PAGE,
};
use crate::domain::ports::HttpTransport;
use crate::utils::error::{GbizError, Result};
use serde_json::Value;

type FindInvalid = fn(&str) -> Vec<String>;

fn reject_invalid_codes(field: &str, value: Option<&str>, find: FindInvalid) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    let invalid = find(value);
    if invalid.is_empty() {
        return Ok(());
    }
    Err(GbizError::validation(
        field,
        format!("Invalid {} codes: {}", field, invalid.join(", ")),
    ))
}

fn reject_zero(field: &str, value: Option<u32>) -> Result<()> {
    match value {
        Some(0) => Err(GbizError::validation(
            field,
            format!("{} must be 1 or greater", field),
        )),
        _ => Ok(()),
    }
}

/// 檢索條件檢查，通過後回傳去除空白的副本
pub fn validate_filter(filter: &CompanyFilter) -> Result<CompanyFilter> {
    let filter = filter.trimmed();

    if filter
        .identifying_fields()
        .iter()
        .all(|(_, value)| value.is_none())
    {
        return Err(GbizError::InputValidation {
            field: None,
            message: "At least one of name, corporateNumber, prefecture, city, address or industry is required".to_string(),
        });
    }

    if filter.city.is_some() && filter.prefecture.is_none() {
        return Err(GbizError::validation("city", "city requires prefecture"));
    }

    if let Some(number) = filter.corporate_number.as_deref() {
        if !validator::is_valid_corporate_number(number) {
            return Err(GbizError::validation(
                "corporateNumber",
                format!("Invalid corporateNumber (13 digits expected): {}", number),
            ));
        }
    }

    let code_checks: [(&str, Option<&str>, FindInvalid); 10] = [
        (
            "corporateType",
            filter.corporate_type.as_deref(),
            validator::find_invalid_corporate_type_codes,
        ),
        (
            "prefecture",
            filter.prefecture.as_deref(),
            validator::find_invalid_prefecture_codes,
        ),
        (
            "city",
            filter.city.as_deref(),
            validator::find_invalid_city_codes,
        ),
        (
            "businessItem",
            filter.business_item.as_deref(),
            validator::find_invalid_business_item_codes,
        ),
        (
            "salesArea",
            filter.sales_area.as_deref(),
            validator::find_invalid_sales_area_codes,
        ),
        (
            "unifiedQualification",
            filter.unified_qualification.as_deref(),
            validator::find_invalid_unified_qualification_codes,
        ),
        (
            "unifiedQualificationSub01",
            filter.unified_qualification_sub01.as_deref(),
            validator::find_invalid_unified_qualification_codes,
        ),
        (
            "unifiedQualificationSub02",
            filter.unified_qualification_sub02.as_deref(),
            validator::find_invalid_unified_qualification_codes,
        ),
        (
            "unifiedQualificationSub03",
            filter.unified_qualification_sub03.as_deref(),
            validator::find_invalid_unified_qualification_codes,
        ),
        (
            "unifiedQualificationSub04",
            filter.unified_qualification_sub04.as_deref(),
            validator::find_invalid_unified_qualification_codes,
        ),
    ];
    for (field, value, find) in code_checks {
        reject_invalid_codes(field, value, find)?;
    }

    reject_invalid_codes(
        "foundedYear",
        filter.founded_year.as_deref(),
        validator::find_invalid_founded_years,
    )?;

    let mut dates = Vec::with_capacity(2);
    for (field, value) in [
        ("establishmentFrom", filter.establishment_from.as_deref()),
        ("establishmentTo", filter.establishment_to.as_deref()),
    ] {
        if let Some(value) = value {
            let date = validator::parse_establishment_date(value).ok_or_else(|| {
                GbizError::validation(
                    field,
                    format!("Invalid {} (YYYY-MM-DD expected): {}", field, value),
                )
            })?;
            dates.push(date);
        }
    }
    if let &[from, to] = dates.as_slice() {
        if from > to {
            return Err(GbizError::validation(
                "establishmentFrom",
                "establishmentFrom must not be after establishmentTo",
            ));
        }
    }

    for (field, value) in filter.range_fields() {
        if let Some(n) = value.filter(|n| *n < 0) {
            return Err(GbizError::validation(
                field,
                format!("{} must be 0 or greater: {}", field, n),
            ));
        }
    }

    reject_zero("page", filter.page)?;
    reject_zero("limit", filter.limit)?;

    Ok(filter)
}

pub struct CompanySearchController<T: HttpTransport> {
    service: GbizinfoService<T>,
}

impl<T: HttpTransport> CompanySearchController<T> {
    pub fn new(service: GbizinfoService<T>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &GbizinfoService<T> {
        &self.service
    }

    pub async fn search(&self, filter: &CompanyFilter) -> Result<PaginatedResult<Company>> {
        let filter = validate_filter(filter)?;
        self.service.search_companies(&filter).await
    }

    pub async fn search_by_name(
        &self,
        name: &str,
        from: Option<u32>,
        size: Option<u32>,
    ) -> Result<PaginatedResult<Company>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GbizError::validation("name", "name is required"));
        }
        reject_zero("from", from)?;
        reject_zero("size", size)?;

        self.service
            .search_companies_by_name(name, from, size)
            .await
    }

    pub async fn lookup(&self, kind: DetailKind, corporate_number: &str) -> Result<Value> {
        let corporate_number = corporate_number.trim();
        if !validator::is_valid_corporate_number(corporate_number) {
            return Err(GbizError::validation(
                "corporateNumber",
                format!(
                    "Invalid corporateNumber (13 digits expected): {}",
                    corporate_number
                ),
            ));
        }
        self.service.get_detail(kind, corporate_number).await
    }

    pub async fn update_info(
        &self,
        kind: DetailKind,
        from: &str,
        to: &str,
        page: Option<u32>,
    ) -> Result<UpdateInfoPage> {
        let (from, to) = (from.trim(), to.trim());
        let parse = |field: &str, value: &str| {
            validator::parse_compact_date(value).ok_or_else(|| {
                GbizError::validation(
                    field,
                    format!("Invalid {} (YYYYMMDD expected): {}", field, value),
                )
            })
        };
        if parse("from", from)? > parse("to", to)? {
            return Err(GbizError::validation("from", "from must not be after to"));
        }
        reject_zero("page", page)?;

        self.service
            .get_update_info(kind, from, to, page.unwrap_or(DEFAULT_PAGE))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{json_response, StubTransport, TestConfig};
    use serde_json::json;

    fn controller() -> CompanySearchController<StubTransport> {
        let transport = StubTransport::repeating(json_response(
            200,
            json!({"hojin-infos": [{"corporate_number": "1234567890123", "name": "Acme"}], "totalCount": 1}),
        ));
        CompanySearchController::new(GbizinfoService::from_config(
            transport,
            &TestConfig::default(),
        ))
    }

    fn calls(controller: &CompanySearchController<StubTransport>) -> usize {
        controller.service().http().transport().call_count()
    }

    fn validation_message(err: GbizError) -> String {
        match err {
            GbizError::InputValidation { message, .. } => message,
            other => panic!("expected InputValidation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rejects_filter_without_identifying_fields() {
        let controller = controller();
        let filter = CompanyFilter {
            capital_stock_from: Some(1_000_000),
            ..Default::default()
        };

        let err = controller.search(&filter).await.unwrap_err();

        assert!(matches!(err, GbizError::InputValidation { .. }));
        assert_eq!(calls(&controller), 0);
    }

    #[tokio::test]
    async fn test_blank_identifying_fields_do_not_count() {
        let controller = controller();
        let filter = CompanyFilter {
            name: Some("   ".to_string()),
            address: Some(String::new()),
            ..Default::default()
        };

        assert!(controller.search(&filter).await.is_err());
        assert_eq!(calls(&controller), 0);
    }

    #[tokio::test]
    async fn test_invalid_codes_are_named_in_the_error() {
        let controller = controller();

        let filter = CompanyFilter {
            prefecture: Some("13, 48,00".to_string()),
            ..Default::default()
        };
        let message = validation_message(controller.search(&filter).await.unwrap_err());
        assert!(message.contains("48"));
        assert!(message.contains("00"));
        assert!(!message.contains("13"));

        let filter = CompanyFilter {
            name: Some("Acme".to_string()),
            unified_qualification_sub03: Some("a,E".to_string()),
            ..Default::default()
        };
        let message = validation_message(controller.search(&filter).await.unwrap_err());
        assert!(message.contains("unifiedQualificationSub03"));
        assert!(message.contains('E'));

        assert_eq!(calls(&controller), 0);
    }

    #[tokio::test]
    async fn test_rejects_malformed_scalars() {
        let controller = controller();
        let base = CompanyFilter::by_name("Acme", None, None);

        for filter in [
            CompanyFilter {
                corporate_number: Some("12345".to_string()),
                ..base.clone()
            },
            CompanyFilter {
                founded_year: Some("1999,99".to_string()),
                ..base.clone()
            },
            CompanyFilter {
                establishment_from: Some("2020-13-01".to_string()),
                ..base.clone()
            },
            CompanyFilter {
                establishment_from: Some("2021-01-01".to_string()),
                establishment_to: Some("2020-01-01".to_string()),
                ..base.clone()
            },
            CompanyFilter {
                city: Some("101".to_string()),
                ..base.clone()
            },
            CompanyFilter {
                capital_stock_from: Some(-5),
                ..base.clone()
            },
            CompanyFilter {
                employee_number_to: Some(-1),
                ..base.clone()
            },
            CompanyFilter {
                page: Some(0),
                ..base.clone()
            },
            CompanyFilter {
                limit: Some(0),
                ..base.clone()
            },
        ] {
            let err = controller.search(&filter).await.unwrap_err();
            assert!(matches!(err, GbizError::InputValidation { .. }), "{:?}", filter);
        }
        assert_eq!(calls(&controller), 0);
    }

    #[tokio::test]
    async fn test_city_and_negative_ranges_are_named() {
        let controller = controller();

        let filter = CompanyFilter {
            city: Some("101".to_string()),
            ..Default::default()
        };
        let err = controller.search(&filter).await.unwrap_err();
        assert!(matches!(
            &err,
            GbizError::InputValidation { field: Some(field), .. } if field == "city"
        ));
        assert!(validation_message(err).contains("requires prefecture"));

        let filter = CompanyFilter {
            name: Some("Acme".to_string()),
            capital_stock_from: Some(-5),
            employee_number_to: Some(-1),
            ..Default::default()
        };
        let message = validation_message(controller.search(&filter).await.unwrap_err());
        assert!(message.contains("capitalStockFrom"));
        assert!(message.contains("-5"));

        assert_eq!(calls(&controller), 0);
    }

    #[tokio::test]
    async fn test_valid_filter_is_trimmed_before_reaching_service() {
        let controller = controller();
        let filter = CompanyFilter {
            name: Some("  Acme ".to_string()),
            prefecture: Some("13".to_string()),
            city: Some(" 101 ".to_string()),
            capital_stock_from: Some(0),
            establishment_from: Some("20000101".to_string()),
            ..Default::default()
        };

        let result = controller.search(&filter).await.unwrap();

        assert_eq!(result.items.len(), 1);
        let url = &controller.service().http().transport().requests()[0].url;
        assert_eq!(
            url,
            "http://stub/hojin?name=Acme&prefecture=13&city=101&capital_stock_from=0\
             &establishment_from=20000101&page=1&limit=20"
        );
    }

    #[tokio::test]
    async fn test_search_by_name() {
        let controller = controller();

        assert!(controller.search_by_name("  ", None, None).await.is_err());
        assert!(controller.search_by_name("Acme", Some(0), None).await.is_err());
        assert_eq!(calls(&controller), 0);

        let result = controller
            .search_by_name(" Acme ", Some(2), Some(5))
            .await
            .unwrap();
        assert_eq!((result.from, result.size), (2, 5));
        assert_eq!(
            controller.service().http().transport().requests()[0].url,
            "http://stub/hojin?name=Acme&page=2&limit=5"
        );
    }

    #[tokio::test]
    async fn test_lookup_requires_thirteen_digits() {
        let controller = controller();

        for bad in ["", "123456789012", "12345678901234", "123456789012a"] {
            assert!(controller.lookup(DetailKind::Basic, bad).await.is_err());
        }
        assert_eq!(calls(&controller), 0);

        controller
            .lookup(DetailKind::Workplace, "1234567890123")
            .await
            .unwrap();
        assert_eq!(
            controller.service().http().transport().requests()[0].url,
            "http://stub/hojin/1234567890123/workplace"
        );
    }

    #[tokio::test]
    async fn test_update_info_validates_period() {
        let controller = controller();

        assert!(controller
            .update_info(DetailKind::Basic, "2025-01-01", "20250131", None)
            .await
            .is_err());
        assert!(controller
            .update_info(DetailKind::Basic, "20250201", "20250131", None)
            .await
            .is_err());
        assert!(controller
            .update_info(DetailKind::Basic, "20250101", "20250131", Some(0))
            .await
            .is_err());
        assert_eq!(calls(&controller), 0);

        let page = controller
            .update_info(DetailKind::Finance, "20250101", "20250101", None)
            .await
            .unwrap();
        assert_eq!(page.page_number, 1);
        assert_eq!(page.total_count, 1);
        assert_eq!(
            controller.service().http().transport().requests()[0].url,
            "http://stub/hojin/updateInfo/finance?from=20250101&to=20250101&page=1"
        );
    }
}
