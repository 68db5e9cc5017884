//! 查詢結果快取模組。
//!
//! 同一組查詢參數在存活時間內重複查詢時直接回傳前次結果，
//! 不再向遠端抓取；過期判斷在讀取時由快取層處理。

use std::{sync::Arc, time::Duration};

use moka::sync::Cache;
use once_cell::sync::Lazy;

use crate::{
    config::SETTINGS,
    declare::{QueryKind, SortOrder, YieldBasis},
    report::{combine::CombinedOutcome, ReportOutcome},
};

/// 全域查詢結果快取實例，存活時間取自設定檔
pub static TTL: Lazy<Ttl> = Lazy::new(Default::default);

/// 具存活時間的查詢結果快取容器
pub struct Ttl {
    /// 單一股票的年度報表
    reports: Cache<String, Arc<ReportOutcome>>,
    /// 多檔股票的合併結果
    combined: Cache<String, Arc<CombinedOutcome>>,
}

/// 對 `Ttl` 的操作介面抽象，讓呼叫端以一致的 API 讀寫各區塊
pub trait TtlCacheInner {
    /// 清空全部區塊
    fn clear(&self);
    /// 讀取單一股票報表
    fn report_get(&self, key: &str) -> Option<Arc<ReportOutcome>>;
    /// 寫入單一股票報表
    fn report_set(&self, key: String, val: Arc<ReportOutcome>);
    /// 讀取合併結果
    fn combined_get(&self, key: &str) -> Option<Arc<CombinedOutcome>>;
    /// 寫入合併結果
    fn combined_set(&self, key: String, val: Arc<CombinedOutcome>);
}

impl TtlCacheInner for Ttl {
    fn clear(&self) {
        self.reports.invalidate_all();
        self.combined.invalidate_all();
    }

    fn report_get(&self, key: &str) -> Option<Arc<ReportOutcome>> {
        self.reports.get(key)
    }

    fn report_set(&self, key: String, val: Arc<ReportOutcome>) {
        self.reports.insert(key, val);
    }

    fn combined_get(&self, key: &str) -> Option<Arc<CombinedOutcome>> {
        self.combined.get(key)
    }

    fn combined_set(&self, key: String, val: Arc<CombinedOutcome>) {
        self.combined.insert(key, val);
    }
}

impl Ttl {
    /// 建立新的快取容器並設定各區塊的存活時間與容量上限
    pub fn new(time_to_live: Duration) -> Self {
        Ttl {
            reports: Cache::builder()
                .max_capacity(1024)
                .time_to_live(time_to_live)
                .build(),
            combined: Cache::builder()
                .max_capacity(256)
                .time_to_live(time_to_live)
                .build(),
        }
    }
}

impl Default for Ttl {
    fn default() -> Self {
        Self::new(Duration::from_secs(SETTINGS.cache.ttl_secs))
    }
}

/// 組出查詢結果的快取鍵，查詢種類、排序、殖利率基準與股票清單
/// 任一不同都視為不同的查詢。
pub fn key(kind: QueryKind, order: SortOrder, basis: YieldBasis, stock_symbols: &[String]) -> String {
    format!(
        "{}:{}:{}:{}",
        kind.name(),
        order.name(),
        basis.name(),
        stock_symbols.join(",")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key() {
        let symbols = vec!["2330".to_string(), "2317".to_string()];
        assert_eq!(
            key(
                QueryKind::Compare,
                SortOrder::Ascending,
                YieldBasis::AnnualAverage,
                &symbols
            ),
            "compare:asc:average:2330,2317"
        );
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let ttl = Ttl::new(Duration::from_millis(100));
        let outcome = Arc::new(ReportOutcome::NoData {
            stock_symbol: "2330".to_string(),
        });

        ttl.report_set("dividend:desc:average:2330".to_string(), outcome);
        assert!(ttl.report_get("dividend:desc:average:2330").is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(ttl.report_get("dividend:desc:average:2330").is_none());
    }

    #[test]
    fn test_clear() {
        let ttl = Ttl::new(Duration::from_secs(60));
        ttl.report_set(
            "dividend:desc:average:2330".to_string(),
            Arc::new(ReportOutcome::NoData {
                stock_symbol: "2330".to_string(),
            }),
        );

        ttl.clear();
        assert!(ttl.report_get("dividend:desc:average:2330").is_none());
    }
}
