use crate::domain::model::Company;
use serde_json::Value;

// 上游歷來混用 snake_case / camelCase，依序嘗試
const CORPORATE_NUMBER_KEYS: &[&str] = &["corporate_number", "corporateNumber"];
const NAME_KEYS: &[&str] = &["name", "name_jp", "nameJp"];
const PREFECTURE_KEYS: &[&str] = &["prefecture_name", "prefecture", "prefectureName"];
const CITY_KEYS: &[&str] = &["city_name", "city", "cityName"];
const ADDRESS_KEYS: &[&str] = &["address", "street", "location"];
const POSTAL_CODE_KEYS: &[&str] = &["postal_code", "postalCode", "zip"];
const INDUSTRY_KEYS: &[&str] = &["sic", "industry"];

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// 第一個存在且非 null 的純量值
fn probe(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find_map(scalar_to_string)
}

/// 上游紀錄 → Company。缺欄位時以空字串 / None 補上，不會失敗。
pub fn map_company(record: &Value) -> Company {
    Company {
        corporate_number: probe(record, CORPORATE_NUMBER_KEYS).unwrap_or_default(),
        name: probe(record, NAME_KEYS).unwrap_or_default(),
        prefecture: probe(record, PREFECTURE_KEYS),
        city: probe(record, CITY_KEYS),
        address: probe(record, ADDRESS_KEYS),
        postal_code: probe(record, POSTAL_CODE_KEYS),
        industry: probe(record, INDUSTRY_KEYS),
    }
}

pub fn map_companies(records: &[Value]) -> Vec<Company> {
    records.iter().map(map_company).collect()
}
