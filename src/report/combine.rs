use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::{
    declare::{SortOrder, YieldBasis},
    logging,
    provider::DataProvider,
    report::{aggregate, resolver, DividendRecord, PriceRecord, YearlyRow},
};

/// 合併報表中單一股票的區塊，列次固定由舊到新以便沿時間軸比較
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickerReport {
    pub stock_symbol: String,
    pub rows: Vec<YearlyRow>,
    /// 最近一個交易日的收盤價
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_close: Option<Decimal>,
    /// 預估殖利率（%）：最近一個年度的現金股利合計除以最近收盤價
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_yield: Option<Decimal>,
}

/// 多檔股票的合併結果
#[derive(Debug, Clone, Serialize)]
pub struct CombinedReport {
    pub tickers: Vec<TickerReport>,
    /// 查無資料或抓取失敗而被略過的股票
    pub skipped: Vec<String>,
}

/// 合併報表的結果，全部股票都失敗時以 NoData 回報
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CombinedOutcome {
    Combined(CombinedReport),
    NoData { skipped: Vec<String> },
}

/// 解析使用者輸入的逗號分隔股票清單，去除前後空白並忽略空白項目
pub fn parse_ticker_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

/// 依輸入順序逐檔建立報表並合併。
///
/// 單一股票查無資料或抓取失敗時記錄 log 後略過，不會中斷其他股票的
/// 處理；只有在全部股票都失敗時才回傳 NoData。
pub async fn combine<P: DataProvider>(
    provider: &P,
    stock_symbols: &[String],
    since: NaiveDate,
    basis: YieldBasis,
) -> CombinedOutcome {
    let mut tickers = Vec::with_capacity(stock_symbols.len());
    let mut skipped = Vec::new();

    for stock_symbol in stock_symbols {
        match build_ticker(provider, stock_symbol, since, basis).await {
            Ok(Some(ticker)) => tickers.push(ticker),
            Ok(None) => {
                logging::warn_file_async(format!("no dividend data for {}", stock_symbol));
                skipped.push(stock_symbol.clone());
            }
            Err(why) => {
                logging::error_file_async(format!(
                    "Failed to build report({}) because {:?}",
                    stock_symbol, why
                ));
                skipped.push(stock_symbol.clone());
            }
        }
    }

    if tickers.is_empty() {
        CombinedOutcome::NoData { skipped }
    } else {
        CombinedOutcome::Combined(CombinedReport { tickers, skipped })
    }
}

async fn build_ticker<P: DataProvider>(
    provider: &P,
    stock_symbol: &str,
    since: NaiveDate,
    basis: YieldBasis,
) -> Result<Option<TickerReport>> {
    let raw_dividends = provider.dividends(stock_symbol, since).await?;
    let records: Vec<DividendRecord> = raw_dividends.iter().map(resolver::resolve_dividend).collect();
    let mut rows = aggregate::yearly_totals(&records, SortOrder::Ascending);

    if rows.is_empty() {
        return Ok(None);
    }

    let mut latest_close = None;
    match provider.daily_prices(stock_symbol, since).await {
        Ok(raw_prices) => {
            let prices: Vec<PriceRecord> =
                raw_prices.iter().filter_map(resolver::resolve_price).collect();
            if !prices.is_empty() {
                aggregate::apply_prices(&mut rows, &prices, basis);
                latest_close = aggregate::latest_close(&prices);
            }
        }
        Err(why) => {
            logging::error_file_async(format!(
                "Failed to fetch daily prices({}) because {:?}",
                stock_symbol, why
            ));
        }
    }

    let estimated_yield = match (rows.last(), latest_close) {
        (Some(last_year), Some(price)) if !price.is_zero() => {
            Some((last_year.cash_total / price * dec!(100)).round_dp(2))
        }
        _ => None,
    };

    Ok(Some(TickerReport {
        stock_symbol: stock_symbol.to_string(),
        rows,
        latest_close,
        estimated_yield,
    }))
}
