use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize};

use crate::{
    config::SETTINGS,
    provider::{DataProvider, RawDividend, RawPrice},
    util::http,
};

const DATASET_DIVIDEND: &str = "TaiwanStockDividend";
const DATASET_PRICE: &str = "TaiwanStockPrice";

/// FinMind 的回應外殼，實際資料在 data 欄位內
#[derive(Debug, Deserialize)]
struct FinMindResponse<T> {
    #[serde(default)]
    msg: String,
    #[serde(default)]
    status: i64,
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

/// FinMind 開放資料 API 的用戶端
#[derive(Debug, Default, Copy, Clone)]
pub struct FinMind;

impl FinMind {
    fn build_url(dataset: &str, stock_symbol: &str, since: NaiveDate) -> String {
        let mut url = format!(
            "{}?dataset={}&data_id={}&start_date={}",
            SETTINGS.finmind.base_url,
            dataset,
            stock_symbol,
            since.format("%Y-%m-%d")
        );

        if !SETTINGS.finmind.token.is_empty() {
            url.push_str("&token=");
            url.push_str(&SETTINGS.finmind.token);
        }

        url
    }

    async fn visit<T: DeserializeOwned>(
        dataset: &str,
        stock_symbol: &str,
        since: NaiveDate,
    ) -> Result<Vec<T>> {
        let url = Self::build_url(dataset, stock_symbol, since);
        let res = http::get_json::<FinMindResponse<T>>(&url).await?;

        if res.status != 200 {
            return Err(anyhow!(
                "Failed to fetch {}({}) because status:{} msg:{}",
                dataset,
                stock_symbol,
                res.status,
                res.msg
            ));
        }

        Ok(res.data)
    }
}

#[async_trait]
impl DataProvider for FinMind {
    async fn dividends(&self, stock_symbol: &str, since: NaiveDate) -> Result<Vec<RawDividend>> {
        Self::visit(DATASET_DIVIDEND, stock_symbol, since).await
    }

    async fn daily_prices(&self, stock_symbol: &str, since: NaiveDate) -> Result<Vec<RawPrice>> {
        Self::visit(DATASET_PRICE, stock_symbol, since).await
    }
}
