use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::{
    provider::{RawDividend, RawPrice},
    report::{DividendRecord, PriceRecord},
    util::{datetime, text},
};

/// 將資料源的原始股利紀錄補正成完整的 [`DividendRecord`]。
///
/// 資料源揭露的欄位在不同股票與年代間只是已知欄位集合的子集，
/// 缺漏的數值欄位一律補 0、日期欄位補 None，型別轉換失敗也視為 0，
/// 不會往外拋錯，讓彙總階段可以不理會資料源的欄位差異。
pub fn resolve_dividend(raw: &RawDividend) -> DividendRecord {
    DividendRecord {
        year: resolve_year(&raw.year),
        cash: decimal_or_zero(&raw.cash_earnings_distribution),
        stock: decimal_or_zero(&raw.stock_earnings_distribution),
        ex_dividend_date: resolve_date(&raw.ex_dividend_ex_rights_date),
    }
}

/// 將原始收盤紀錄轉成 [`PriceRecord`]，交易日無法解析時整筆捨棄，
/// 因為沒有日期就無法歸入任何年度。
pub fn resolve_price(raw: &RawPrice) -> Option<PriceRecord> {
    let date = NaiveDate::parse_from_str(&raw.date, "%Y-%m-%d").ok()?;

    Some(PriceRecord {
        date,
        close: decimal_or_zero(&raw.close),
    })
}

fn resolve_year(value: &Value) -> i32 {
    match value {
        Value::String(s) => datetime::normalize_year(s),
        Value::Number(n) => datetime::normalize_year(&n.to_string()),
        _ => 0,
    }
}

pub(crate) fn decimal_or_zero(value: &Value) -> Decimal {
    match value {
        // 經由十進位字串轉換，serde_json 會印出最短的往返表示，
        // 直接從 f64 轉會把尾數雜訊帶進金額
        Value::Number(n) => text::parse_decimal(&n.to_string(), None).unwrap_or(Decimal::ZERO),
        Value::String(s) => text::parse_decimal(s, None).unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

fn resolve_date(value: &Value) -> Option<NaiveDate> {
    let s = value.as_str()?;

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| datetime::parse_taiwan_date(s))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_resolve_dividend_full_record() {
        let raw: RawDividend = serde_json::from_value(json!({
            "year": "93",
            "CashEarningsDistribution": 2.5,
            "StockEarningsDistribution": "0.5",
            "CashExDividendTradingDate": "2004-08-15",
        }))
        .unwrap();

        let record = resolve_dividend(&raw);
        assert_eq!(record.year, 2004);
        assert_eq!(record.cash, dec!(2.5));
        assert_eq!(record.stock, dec!(0.5));
        assert_eq!(
            record.ex_dividend_date,
            NaiveDate::from_ymd_opt(2004, 8, 15)
        );
    }

    #[test]
    fn test_resolve_dividend_missing_fields_default_to_zero() {
        let raw: RawDividend = serde_json::from_value(json!({ "year": 2020 })).unwrap();

        let record = resolve_dividend(&raw);
        assert_eq!(record.year, 2020);
        assert_eq!(record.cash, Decimal::ZERO);
        assert_eq!(record.stock, Decimal::ZERO);
        assert_eq!(record.ex_dividend_date, None);
    }

    #[test]
    fn test_resolve_dividend_bad_coercion_defaults_to_zero() {
        let raw: RawDividend = serde_json::from_value(json!({
            "year": "尚未公佈",
            "CashEarningsDistribution": "N/A",
            "StockEarningsDistribution": null,
        }))
        .unwrap();

        let record = resolve_dividend(&raw);
        assert_eq!(record.year, 0);
        assert_eq!(record.cash, Decimal::ZERO);
        assert_eq!(record.stock, Decimal::ZERO);
    }

    #[test]
    fn test_resolve_dividend_float_amounts_stay_exact() {
        // 1.1 沒有精確的二進位浮點表示，轉換不能放大成一長串尾數
        let raw: RawDividend = serde_json::from_value(json!({
            "year": 2020,
            "CashEarningsDistribution": 1.1,
            "StockEarningsDistribution": 0.3,
        }))
        .unwrap();

        let record = resolve_dividend(&raw);
        assert_eq!(record.cash, dec!(1.1));
        assert_eq!(record.stock, dec!(0.3));
        assert_eq!(record.cash.to_string(), "1.1");
    }

    #[test]
    fn test_resolve_price() {
        let raw: RawPrice =
            serde_json::from_value(json!({ "date": "2020-03-02", "close": 38.0 })).unwrap();
        let price = resolve_price(&raw).unwrap();
        assert_eq!(price.date, NaiveDate::from_ymd_opt(2020, 3, 2).unwrap());
        assert_eq!(price.close, dec!(38));

        let bad: RawPrice =
            serde_json::from_value(json!({ "date": "不詳", "close": 38.0 })).unwrap();
        assert_eq!(resolve_price(&bad), None);
    }

    #[test]
    fn test_resolve_taiwan_style_ex_dividend_date() {
        let raw: RawDividend = serde_json::from_value(json!({
            "year": "110",
            "ExDividendExRightsDate": "110/08/15",
        }))
        .unwrap();

        let record = resolve_dividend(&raw);
        assert_eq!(
            record.ex_dividend_date,
            NaiveDate::from_ymd_opt(2021, 8, 15)
        );
    }

    #[test]
    fn test_resolve_ex_dividend_date_alternate_column_name() {
        // 同一欄位的另一種拼法也要能被讀到
        let raw: RawDividend = serde_json::from_value(json!({
            "year": "2020",
            "CashExDividendTradingDate": "2020-07-16",
        }))
        .unwrap();

        let record = resolve_dividend(&raw);
        assert_eq!(
            record.ex_dividend_date,
            NaiveDate::from_ymd_opt(2020, 7, 16)
        );
    }
}
