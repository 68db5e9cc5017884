use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

/// FinMind 台股開放資料
pub mod finmind;

/// 資料源介面，回傳的欄位允許缺漏或型別不一，由 report::resolver 負責補正。
#[async_trait]
pub trait DataProvider {
    /// 指定股票自 since 起的歷次股利分配紀錄
    async fn dividends(&self, stock_symbol: &str, since: NaiveDate) -> Result<Vec<RawDividend>>;

    /// 指定股票自 since 起的每日收盤價
    async fn daily_prices(&self, stock_symbol: &str, since: NaiveDate) -> Result<Vec<RawPrice>>;
}

/// 一筆未整理的股利分配紀錄。
///
/// 資料源在不同股票、不同年代間揭露的欄位並不一致，因此所有欄位
/// 都以 `serde_json::Value` 承接，缺漏時為 `Null`，數字可能是字串。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDividend {
    /// 股利所屬年度，可能為民國年、西元年或 "93年" 這類字串
    #[serde(default)]
    pub year: Value,
    /// 現金股利
    #[serde(default, rename = "CashEarningsDistribution")]
    pub cash_earnings_distribution: Value,
    /// 股票股利
    #[serde(default, rename = "StockEarningsDistribution")]
    pub stock_earnings_distribution: Value,
    /// 除權息日，僅供參考；資料源對此欄位有兩種拼法，皆接受
    #[serde(
        default,
        rename = "ExDividendExRightsDate",
        alias = "CashExDividendTradingDate"
    )]
    pub ex_dividend_ex_rights_date: Value,
}

/// 一筆未整理的每日收盤紀錄
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPrice {
    /// 交易日 yyyy-MM-dd
    #[serde(default)]
    pub date: String,
    /// 收盤價
    #[serde(default)]
    pub close: Value,
}
