//! 將 Company 轉成顯示用的結構，並輸出成 JSON / CSV / TSV。

use crate::domain::model::{Company, PaginatedResult, UpdateInfoPage};
use crate::utils::error::{GbizError, Result};
use serde::Serialize;
use serde_json::Value;

const TABLE_HEADER: [&str; 4] = ["corporate_number", "name", "address", "postal_code"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyListItemView {
    pub corporate_number: String,
    pub name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyListPageView {
    pub items: Vec<CompanyListItemView>,
    pub total: u64,
    pub from: u32,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInfoPageView {
    pub items: Vec<CompanyListItemView>,
    pub page_number: u32,
    pub total_count: u64,
    pub total_page: u32,
}

/// 表格輸出只列 items，分頁資訊只在 JSON 裡
pub trait TabularView: Serialize {
    fn rows(&self) -> &[CompanyListItemView];
}

impl TabularView for CompanyListPageView {
    fn rows(&self) -> &[CompanyListItemView] {
        &self.items
    }
}

impl TabularView for UpdateInfoPageView {
    fn rows(&self) -> &[CompanyListItemView] {
        &self.items
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    Tsv,
}

pub fn present_company(company: &Company) -> CompanyListItemView {
    let address: String = [&company.prefecture, &company.city, &company.address]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect();

    CompanyListItemView {
        corporate_number: company.corporate_number.clone(),
        name: company.name.clone(),
        address,
        postal_code: company.postal_code.clone(),
    }
}

pub fn present_company_list(companies: &[Company]) -> Vec<CompanyListItemView> {
    companies.iter().map(present_company).collect()
}

pub fn present_company_list_page(page: &PaginatedResult<Company>) -> CompanyListPageView {
    CompanyListPageView {
        items: present_company_list(&page.items),
        total: page.total,
        from: page.from,
        size: page.size,
    }
}

pub fn present_update_info_page(page: &UpdateInfoPage) -> UpdateInfoPageView {
    UpdateInfoPageView {
        items: present_company_list(&page.items),
        page_number: page.page_number,
        total_count: page.total_count,
        total_page: page.total_page,
    }
}

fn render_table(rows: &[CompanyListItemView], delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(TABLE_HEADER)?;
    for row in rows {
        writer.write_record([
            row.corporate_number.as_str(),
            row.name.as_str(),
            row.address.as_str(),
            row.postal_code.as_deref().unwrap_or(""),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| GbizError::Unexpected {
        message: format!("Failed to flush table output: {}", e),
    })?;
    String::from_utf8(bytes).map_err(|e| GbizError::Unexpected {
        message: format!("Table output is not UTF-8: {}", e),
    })
}

pub fn render<V: TabularView>(view: &V, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(view)?),
        OutputFormat::Csv => render_table(view.rows(), b','),
        OutputFormat::Tsv => render_table(view.rows(), b'\t'),
    }
}

/// 個別資料結構不固定，一律輸出 JSON
pub fn render_value(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
