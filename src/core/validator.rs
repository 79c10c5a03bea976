//! 檢索條件的代碼白名單檢查。全部是純函式。

use chrono::NaiveDate;

const CORPORATE_TYPES: [&str; 10] = [
    "101", // 国の機関
    "201", // 地方公共団体
    "301", // 株式会社
    "302", // 有限会社
    "303", // 合名会社
    "304", // 合資会社
    "305", // 合同会社
    "399", // その他の設立登記法人
    "401", // 外国会社等
    "499", // その他
];

/// GEPS 営業品目：製造、販売、役務、買受け
const BUSINESS_ITEM_RANGES: [(u16, u16); 4] = [(101, 124), (201, 224), (301, 318), (401, 402)];

const QUALIFICATION_GRADES: [&str; 4] = ["A", "B", "C", "D"];

fn split_codes(codes: &str) -> Vec<&str> {
    codes
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn is_valid_list(codes: &str, accept: impl Fn(&str) -> bool) -> bool {
    let parts = split_codes(codes);
    !parts.is_empty() && parts.into_iter().all(|code| accept(code))
}

fn find_invalid(codes: &str, accept: impl Fn(&str) -> bool) -> Vec<String> {
    split_codes(codes)
        .into_iter()
        .filter(|code| !accept(code))
        .map(str::to_string)
        .collect()
}

fn numeric_in_range(code: &str, width: usize, min: u16, max: u16) -> bool {
    if code.len() != width || !code.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    code.parse::<u16>()
        .map(|n| n >= min && n <= max)
        .unwrap_or(false)
}

fn corporate_type_code(code: &str) -> bool {
    CORPORATE_TYPES.contains(&code)
}

fn business_item_code(code: &str) -> bool {
    BUSINESS_ITEM_RANGES
        .iter()
        .any(|&(min, max)| numeric_in_range(code, 3, min, max))
}

fn qualification_grade(code: &str) -> bool {
    QUALIFICATION_GRADES
        .iter()
        .any(|grade| grade.eq_ignore_ascii_case(code))
}

fn sales_area_code(code: &str) -> bool {
    (1..=2).any(|width| numeric_in_range(code, width, 1, 10))
}

fn prefecture_code(code: &str) -> bool {
    numeric_in_range(code, 2, 1, 47)
}

fn city_code(code: &str) -> bool {
    numeric_in_range(code, 3, 100, 799)
}

fn founded_year(code: &str) -> bool {
    code.len() == 4 && code.bytes().all(|b| b.is_ascii_digit())
}

pub fn is_valid_corporate_type(codes: &str) -> bool {
    is_valid_list(codes, corporate_type_code)
}

pub fn find_invalid_corporate_type_codes(codes: &str) -> Vec<String> {
    find_invalid(codes, corporate_type_code)
}

pub fn is_valid_business_item(codes: &str) -> bool {
    is_valid_list(codes, business_item_code)
}

pub fn find_invalid_business_item_codes(codes: &str) -> Vec<String> {
    find_invalid(codes, business_item_code)
}

pub fn is_valid_unified_qualification(codes: &str) -> bool {
    is_valid_list(codes, qualification_grade)
}

pub fn find_invalid_unified_qualification_codes(codes: &str) -> Vec<String> {
    find_invalid(codes, qualification_grade)
}

pub fn is_valid_sales_area(codes: &str) -> bool {
    is_valid_list(codes, sales_area_code)
}

pub fn find_invalid_sales_area_codes(codes: &str) -> Vec<String> {
    find_invalid(codes, sales_area_code)
}

/// JIS X 0401（01〜47）
pub fn is_valid_prefecture(codes: &str) -> bool {
    is_valid_list(codes, prefecture_code)
}

pub fn find_invalid_prefecture_codes(codes: &str) -> Vec<String> {
    find_invalid(codes, prefecture_code)
}

/// JIS X 0402（100〜799）
pub fn is_valid_city(codes: &str) -> bool {
    is_valid_list(codes, city_code)
}

pub fn find_invalid_city_codes(codes: &str) -> Vec<String> {
    find_invalid(codes, city_code)
}

pub fn is_valid_founded_year(codes: &str) -> bool {
    is_valid_list(codes, founded_year)
}

pub fn find_invalid_founded_years(codes: &str) -> Vec<String> {
    find_invalid(codes, founded_year)
}

/// 法人番號為 13 位數字
pub fn is_valid_corporate_number(value: &str) -> bool {
    value.len() == 13 && value.bytes().all(|b| b.is_ascii_digit())
}

/// 設立日：`YYYY-MM-DD` 或 `YYYYMMDD`
pub fn parse_establishment_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_compact_date(value))
}

/// 更新資訊的期間只接受 `YYYYMMDD`
pub fn parse_compact_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y%m%d").ok()
}
