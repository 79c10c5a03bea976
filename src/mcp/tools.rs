//! MCP tool definitions.

use super::protocol::Tool;
use crate::domain::model::DetailKind;
use serde_json::{json, Value};

pub const SEARCH: &str = "search";
pub const SEARCH_COMPANIES: &str = "search_companies";
pub const GET_UPDATE_INFO: &str = "get_update_info";

fn search_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": { "type": "string", "description": "企業名（部分一致）" },
            "corporateNumber": { "type": "string", "description": "法人番号（13桁）" },
            "corporateType": { "type": "string", "description": "法人種別コード（101: 国の機関, 201: 地方公共団体, 301: 株式会社, 302: 有限会社, 303: 合名会社, 304: 合資会社, 305: 合同会社, 399: その他の設立登記法人, 401: 外国会社等, 499: その他。複数はカンマ区切り）" },
            "existFlg": { "type": "boolean", "description": "法人活動情報の有無" },
            "prefecture": { "type": "string", "description": "都道府県コード（JIS X 0401の2桁）" },
            "city": { "type": "string", "description": "市区町村コード（JIS X 0402の3桁、prefecture と併用）" },
            "address": { "type": "string", "description": "住所（フリーテキスト）" },
            "industry": { "type": "string", "description": "業種（フリーテキストまたはコード）" },
            "businessItem": { "type": "string", "description": "営業品目コード（GEPS）。例: 101, 206。複数はカンマ区切り" },
            "foundedYear": { "type": "string", "description": "創業年・設立年（4桁、カンマ区切り可）" },
            "salesArea": { "type": "string", "description": "営業エリアコード（1-10、カンマ区切り可）" },
            "unifiedQualification": { "type": "string", "description": "全省庁統一資格の資格等級（従来型）。A,B,C,D をカンマ区切りで指定" },
            "unifiedQualificationSub01": { "type": "string", "description": "資格等級(物品の製造)：A,B,C,D をカンマ区切りで指定" },
            "unifiedQualificationSub02": { "type": "string", "description": "資格等級(物品の販売)：A,B,C,D をカンマ区切りで指定" },
            "unifiedQualificationSub03": { "type": "string", "description": "資格等級(役務の提供等)：A,B,C,D をカンマ区切りで指定" },
            "unifiedQualificationSub04": { "type": "string", "description": "資格等級(物品の買受け)：A,B,C,D をカンマ区切りで指定" },
            "netSalesFrom": { "type": "integer", "description": "売上高（以上）" },
            "netSalesTo": { "type": "integer", "description": "売上高（以下）" },
            "netIncomeLossFrom": { "type": "integer", "description": "当期純利益又は当期純損失（以上）" },
            "netIncomeLossTo": { "type": "integer", "description": "当期純利益又は当期純損失（以下）" },
            "totalAssetsFrom": { "type": "integer", "description": "総資産額（以上）" },
            "totalAssetsTo": { "type": "integer", "description": "総資産額（以下）" },
            "operatingRevenue1From": { "type": "integer", "description": "営業収益（以上）" },
            "operatingRevenue1To": { "type": "integer", "description": "営業収益（以下）" },
            "operatingRevenue2From": { "type": "integer", "description": "営業収入（以上）" },
            "operatingRevenue2To": { "type": "integer", "description": "営業収入（以下）" },
            "ordinaryIncomeLossFrom": { "type": "integer", "description": "経常利益又は経常損失（以上）" },
            "ordinaryIncomeLossTo": { "type": "integer", "description": "経常利益又は経常損失（以下）" },
            "ordinaryIncomeFrom": { "type": "integer", "description": "経常収益（以上）" },
            "ordinaryIncomeTo": { "type": "integer", "description": "経常収益（以下）" },
            "capitalStockFrom": { "type": "integer", "description": "資本金（下限）" },
            "capitalStockTo": { "type": "integer", "description": "資本金（上限）" },
            "employeeNumberFrom": { "type": "integer", "description": "従業員数（下限）" },
            "employeeNumberTo": { "type": "integer", "description": "従業員数（上限）" },
            "establishmentFrom": { "type": "string", "description": "設立日（下限, YYYY-MM-DD）" },
            "establishmentTo": { "type": "string", "description": "設立日（上限, YYYY-MM-DD）" },
            "nameMajorShareholders": { "type": "string", "description": "大株主名" },
            "averageContinuousServiceYears": { "type": "string", "description": "平均継続勤務年数" },
            "averageAge": { "type": "string", "description": "従業員の平均年齢" },
            "monthAveragePredeterminedOvertimeHours": { "type": "string", "description": "月平均所定外労働時間" },
            "femaleWorkersProportion": { "type": "string", "description": "労働者に占める女性労働者の割合" },
            "year": { "type": "string", "description": "年度" },
            "ministry": { "type": "string", "description": "府省" },
            "source": { "type": "string", "description": "出典元" },
            "from": { "type": "integer", "description": "ページ番号（1始まり）", "minimum": 1 },
            "size": { "type": "integer", "description": "取得件数", "minimum": 1 }
        },
        "additionalProperties": false
    })
}

fn corporate_number_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "corporateNumber": { "type": "string", "description": "法人番号（13桁）" }
        },
        "required": ["corporateNumber"],
        "additionalProperties": false
    })
}

/// 對外公開的 tool 清單
pub fn get_tools() -> Vec<Tool> {
    let mut tools = vec![
        Tool {
            name: SEARCH.into(),
            description: "gBizINFO を複合条件で検索します。name / corporateNumber / prefecture / city / address / industry のいずれかが必要です。".into(),
            input_schema: search_schema(),
        },
        Tool {
            name: SEARCH_COMPANIES.into(),
            description: "企業名だけで gBizINFO を検索します。".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "企業名（部分一致）" },
                    "from": { "type": "integer", "description": "ページ番号（1始まり）", "minimum": 1 },
                    "size": { "type": "integer", "description": "取得件数", "minimum": 1 }
                },
                "required": ["name"],
                "additionalProperties": false
            }),
        },
    ];

    tools.extend(DetailKind::ALL.into_iter().map(|kind| Tool {
        name: kind.tool_name().into(),
        description: kind.description().into(),
        input_schema: corporate_number_schema(),
    }));

    let kinds: Vec<String> = DetailKind::ALL.iter().map(ToString::to_string).collect();
    tools.push(Tool {
        name: GET_UPDATE_INFO.into(),
        description: "期間内に更新された法人情報を取得します。".into(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "from": { "type": "string", "description": "開始日（YYYYMMDD）" },
                "to": { "type": "string", "description": "終了日（YYYYMMDD）" },
                "page": { "type": "integer", "description": "ページ番号（1始まり）", "minimum": 1 },
                "kind": { "type": "string", "enum": kinds, "description": "情報の種類（既定: basic）" }
            },
            "required": ["from", "to"],
            "additionalProperties": false
        }),
    });

    tools
}
