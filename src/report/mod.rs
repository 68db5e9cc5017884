use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    declare::{SortOrder, YieldBasis},
    logging,
    provider::DataProvider,
};

pub mod aggregate;
pub mod combine;
pub mod export;
pub mod resolver;

/// 一筆整理完成的股利分配紀錄，年度已正規化成西元年，缺漏欄位已補 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DividendRecord {
    /// 西元年度，無法解析時為 0
    pub year: i32,
    /// 現金股利
    pub cash: Decimal,
    /// 股票股利
    pub stock: Decimal,
    /// 除息交易日，僅供參考
    pub ex_dividend_date: Option<NaiveDate>,
}

/// 一筆整理完成的每日收盤紀錄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub close: Decimal,
}

/// 年報中的一列，同一年度內的多次配發已合併
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearlyRow {
    /// 西元年度
    pub year: i32,
    /// 當年度現金股利合計
    pub cash_total: Decimal,
    /// 當年度股票股利合計
    pub stock_total: Decimal,
    /// cash_total + stock_total
    pub total: Decimal,
    /// 當年度收盤價平均，無價格資料時為 None
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_price: Option<Decimal>,
    /// 現金殖利率（%），有提供價格資料時才會計算，
    /// 該年度查不到股價時為 0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yield_pct: Option<Decimal>,
    /// 當年度最後一次除息交易日，僅供參考
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_ex_dividend_date: Option<NaiveDate>,
}

/// 單一股票的年度股利報表
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearlyReport {
    pub stock_symbol: String,
    pub rows: Vec<YearlyRow>,
}

/// 報表建置的結果。
///
/// 查無資料是正常的業務結果而非錯誤，與真正的零股利年度做出區隔；
/// 抓取失敗才會以 Err 回報。
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportOutcome {
    Report(YearlyReport),
    NoData { stock_symbol: String },
}

/// 建立單一股票的年度股利報表。
///
/// 股利資料抓取失敗會回傳 Err；價格資料抓取失敗只會記錄 log，
/// 報表仍會產出但不含殖利率，殖利率屬於盡力而為的欄位。
pub async fn build<P: DataProvider>(
    provider: &P,
    stock_symbol: &str,
    since: NaiveDate,
    order: SortOrder,
    basis: YieldBasis,
) -> Result<ReportOutcome> {
    let raw_dividends = provider.dividends(stock_symbol, since).await?;
    let records: Vec<DividendRecord> = raw_dividends.iter().map(resolver::resolve_dividend).collect();
    let mut rows = aggregate::yearly_totals(&records, order);

    if rows.is_empty() {
        return Ok(ReportOutcome::NoData {
            stock_symbol: stock_symbol.to_string(),
        });
    }

    match provider.daily_prices(stock_symbol, since).await {
        Ok(raw_prices) => {
            let prices: Vec<PriceRecord> =
                raw_prices.iter().filter_map(resolver::resolve_price).collect();
            if !prices.is_empty() {
                aggregate::apply_prices(&mut rows, &prices, basis);
            }
        }
        Err(why) => {
            logging::error_file_async(format!(
                "Failed to fetch daily prices({}) because {:?}",
                stock_symbol, why
            ));
        }
    }

    Ok(ReportOutcome::Report(YearlyReport {
        stock_symbol: stock_symbol.to_string(),
        rows,
    }))
}
