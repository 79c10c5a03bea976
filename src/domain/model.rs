use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 20;

/// 法人（Domain Mapper 的唯一產出）
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub corporate_number: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefecture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

/// `from` / `size` 是請求值原樣回傳，不是上游確認過的 offset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub from: u32,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInfoPage {
    pub items: Vec<Company>,
    pub page_number: u32,
    pub total_count: u64,
    pub total_page: u32,
}

/// 複合檢索條件。數值欄位用 `Option` 以區分 0 與未指定。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyFilter {
    pub name: Option<String>,
    pub corporate_number: Option<String>,
    pub corporate_type: Option<String>,
    pub exist_flg: Option<bool>,
    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub industry: Option<String>,
    pub business_item: Option<String>,
    pub founded_year: Option<String>,
    pub sales_area: Option<String>,

    pub unified_qualification: Option<String>,
    pub unified_qualification_sub01: Option<String>,
    pub unified_qualification_sub02: Option<String>,
    pub unified_qualification_sub03: Option<String>,
    pub unified_qualification_sub04: Option<String>,

    pub net_sales_from: Option<i64>,
    pub net_sales_to: Option<i64>,
    pub net_income_loss_from: Option<i64>,
    pub net_income_loss_to: Option<i64>,
    pub total_assets_from: Option<i64>,
    pub total_assets_to: Option<i64>,
    pub operating_revenue1_from: Option<i64>,
    pub operating_revenue1_to: Option<i64>,
    pub operating_revenue2_from: Option<i64>,
    pub operating_revenue2_to: Option<i64>,
    pub ordinary_income_loss_from: Option<i64>,
    pub ordinary_income_loss_to: Option<i64>,
    pub ordinary_income_from: Option<i64>,
    pub ordinary_income_to: Option<i64>,
    pub capital_stock_from: Option<i64>,
    pub capital_stock_to: Option<i64>,
    pub employee_number_from: Option<i64>,
    pub employee_number_to: Option<i64>,
    pub establishment_from: Option<String>,
    pub establishment_to: Option<String>,

    pub name_major_shareholders: Option<String>,
    pub average_continuous_service_years: Option<String>,
    pub average_age: Option<String>,
    pub month_average_predetermined_overtime_hours: Option<String>,
    pub female_workers_proportion: Option<String>,
    pub year: Option<String>,
    pub ministry: Option<String>,
    pub source: Option<String>,

    #[serde(alias = "from")]
    pub page: Option<u32>,
    #[serde(alias = "size")]
    pub limit: Option<u32>,
}

impl CompanyFilter {
    pub fn by_name(name: impl Into<String>, page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            name: Some(name.into()),
            page,
            limit,
            ..Default::default()
        }
    }

    pub fn page_or_default(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    pub fn limit_or_default(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    /// 檢索至少要帶其中一個識別欄位
    pub fn identifying_fields(&self) -> [(&'static str, Option<&str>); 6] {
        [
            ("name", self.name.as_deref()),
            ("corporateNumber", self.corporate_number.as_deref()),
            ("prefecture", self.prefecture.as_deref()),
            ("city", self.city.as_deref()),
            ("address", self.address.as_deref()),
            ("industry", self.industry.as_deref()),
        ]
    }

    /// 財務與規模的區間欄位，皆不可為負
    pub fn range_fields(&self) -> [(&'static str, Option<i64>); 18] {
        [
            ("netSalesFrom", self.net_sales_from),
            ("netSalesTo", self.net_sales_to),
            ("netIncomeLossFrom", self.net_income_loss_from),
            ("netIncomeLossTo", self.net_income_loss_to),
            ("totalAssetsFrom", self.total_assets_from),
            ("totalAssetsTo", self.total_assets_to),
            ("operatingRevenue1From", self.operating_revenue1_from),
            ("operatingRevenue1To", self.operating_revenue1_to),
            ("operatingRevenue2From", self.operating_revenue2_from),
            ("operatingRevenue2To", self.operating_revenue2_to),
            ("ordinaryIncomeLossFrom", self.ordinary_income_loss_from),
            ("ordinaryIncomeLossTo", self.ordinary_income_loss_to),
            ("ordinaryIncomeFrom", self.ordinary_income_from),
            ("ordinaryIncomeTo", self.ordinary_income_to),
            ("capitalStockFrom", self.capital_stock_from),
            ("capitalStockTo", self.capital_stock_to),
            ("employeeNumberFrom", self.employee_number_from),
            ("employeeNumberTo", self.employee_number_to),
        ]
    }

    /// 所有字串欄位去頭尾空白，空字串視為未指定
    pub fn trimmed(&self) -> Self {
        fn clean(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        }

        Self {
            name: clean(&self.name),
            corporate_number: clean(&self.corporate_number),
            corporate_type: clean(&self.corporate_type),
            prefecture: clean(&self.prefecture),
            city: clean(&self.city),
            address: clean(&self.address),
            industry: clean(&self.industry),
            business_item: clean(&self.business_item),
            founded_year: clean(&self.founded_year),
            sales_area: clean(&self.sales_area),
            unified_qualification: clean(&self.unified_qualification),
            unified_qualification_sub01: clean(&self.unified_qualification_sub01),
            unified_qualification_sub02: clean(&self.unified_qualification_sub02),
            unified_qualification_sub03: clean(&self.unified_qualification_sub03),
            unified_qualification_sub04: clean(&self.unified_qualification_sub04),
            establishment_from: clean(&self.establishment_from),
            establishment_to: clean(&self.establishment_to),
            name_major_shareholders: clean(&self.name_major_shareholders),
            average_continuous_service_years: clean(&self.average_continuous_service_years),
            average_age: clean(&self.average_age),
            month_average_predetermined_overtime_hours: clean(
                &self.month_average_predetermined_overtime_hours,
            ),
            female_workers_proportion: clean(&self.female_workers_proportion),
            year: clean(&self.year),
            ministry: clean(&self.ministry),
            source: clean(&self.source),
            ..self.clone()
        }
    }
}

/// 以法人番號查詢的個別資料種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum DetailKind {
    Basic,
    Certification,
    Commendation,
    Finance,
    Patent,
    Procurement,
    Subsidy,
    Workplace,
}

impl DetailKind {
    pub const ALL: [DetailKind; 8] = [
        DetailKind::Basic,
        DetailKind::Certification,
        DetailKind::Commendation,
        DetailKind::Finance,
        DetailKind::Patent,
        DetailKind::Procurement,
        DetailKind::Subsidy,
        DetailKind::Workplace,
    ];

    /// 基本資訊沒有子路徑
    pub fn sub_resource(self) -> Option<&'static str> {
        match self {
            DetailKind::Basic => None,
            DetailKind::Certification => Some("certification"),
            DetailKind::Commendation => Some("commendation"),
            DetailKind::Finance => Some("finance"),
            DetailKind::Patent => Some("patent"),
            DetailKind::Procurement => Some("procurement"),
            DetailKind::Subsidy => Some("subsidy"),
            DetailKind::Workplace => Some("workplace"),
        }
    }

    pub fn tool_name(self) -> &'static str {
        match self {
            DetailKind::Basic => "get_basic_info",
            DetailKind::Certification => "get_certification",
            DetailKind::Commendation => "get_commendation",
            DetailKind::Finance => "get_finance",
            DetailKind::Patent => "get_patent",
            DetailKind::Procurement => "get_procurement",
            DetailKind::Subsidy => "get_subsidy",
            DetailKind::Workplace => "get_workplace",
        }
    }

    pub fn from_tool_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tool_name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            DetailKind::Basic => "法人番号で基本情報を取得します。",
            DetailKind::Certification => "法人番号で届出・認定情報を取得します。",
            DetailKind::Commendation => "法人番号で表彰情報を取得します。",
            DetailKind::Finance => "法人番号で財務情報を取得します。",
            DetailKind::Patent => "法人番号で特許情報を取得します。",
            DetailKind::Procurement => "法人番号で調達情報を取得します。",
            DetailKind::Subsidy => "法人番号で補助金情報を取得します。",
            DetailKind::Workplace => "法人番号で職場情報を取得します。",
        }
    }
}

impl fmt::Display for DetailKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sub_resource().unwrap_or("basic"))
    }
}
