use std::{env, path::PathBuf, str::FromStr};

use chrono::NaiveDate;
use config::{Config as config_config, File as config_file};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::{declare::YieldBasis, logging};

const CONFIG_PATH: &str = "app.json";

const WEB_HOST: &str = "WEB_HOST";
const WEB_PORT: &str = "WEB_PORT";
const FINMIND_TOKEN: &str = "FINMIND_TOKEN";
const FINMIND_BASE_URL: &str = "FINMIND_BASE_URL";
const CACHE_TTL_SECS: &str = "CACHE_TTL_SECS";
const REPORT_START_DATE: &str = "REPORT_START_DATE";
const REPORT_YIELD_BASIS: &str = "REPORT_YIELD_BASIS";

pub static SETTINGS: Lazy<App> = Lazy::new(|| App::get().expect("Config error"));

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct App {
    #[serde(default)]
    pub web: Web,
    #[serde(default)]
    pub finmind: FinMind,
    #[serde(default)]
    pub cache: Cache,
    #[serde(default)]
    pub report: Report,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Web {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: u16,
}

impl Default for Web {
    fn default() -> Self {
        Web {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FinMind {
    /// FinMind 的 API token，可以為空字串，流量額度較低
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub base_url: String,
}

impl Default for FinMind {
    fn default() -> Self {
        FinMind {
            token: String::new(),
            base_url: "https://api.finmindtrade.com/api/v4/data".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Cache {
    /// 查詢結果的存活秒數，過期後下一次查詢會重新向遠端抓取
    #[serde(default)]
    pub ttl_secs: u64,
}

impl Default for Cache {
    fn default() -> Self {
        Cache { ttl_secs: 3600 }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Report {
    /// 向遠端抓取資料的起始日 yyyy-MM-dd
    #[serde(default)]
    pub start_date: String,
    /// 殖利率的預設計算基準 average 或 latest
    #[serde(default)]
    pub yield_basis: String,
}

impl Default for Report {
    fn default() -> Self {
        Report {
            start_date: "2010-01-01".to_string(),
            yield_basis: "average".to_string(),
        }
    }
}

impl Report {
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::parse_from_str(&self.start_date, "%Y-%m-%d").unwrap_or_else(|why| {
            logging::error_file_async(format!(
                "Failed to parse report.start_date '{}' because {:?}",
                self.start_date, why
            ));
            NaiveDate::from_ymd_opt(2010, 1, 1).unwrap_or_default()
        })
    }

    pub fn yield_basis(&self) -> YieldBasis {
        YieldBasis::from_param(Some(self.yield_basis.as_str())).unwrap_or(YieldBasis::AnnualAverage)
    }
}

impl App {
    fn get() -> Result<Self, config::ConfigError> {
        let config_path = config_path();
        if config_path.exists() {
            let config: App = config_config::builder()
                .add_source(config_file::from(config_path))
                .build()?
                .try_deserialize()?;
            return Ok(config.override_with_env());
        }

        Ok(App::default().override_with_env())
    }

    /// 將來至於 env 的設定值覆蓋掉 json 上的設定值
    fn override_with_env(mut self) -> Self {
        if let Ok(host) = env::var(WEB_HOST) {
            self.web.host = host;
        }

        if let Ok(port) = env::var(WEB_PORT) {
            self.web.port = u16::from_str(&port).unwrap_or(self.web.port);
        }

        if let Ok(token) = env::var(FINMIND_TOKEN) {
            self.finmind.token = token;
        }

        if let Ok(base_url) = env::var(FINMIND_BASE_URL) {
            self.finmind.base_url = base_url;
        }

        if let Ok(ttl) = env::var(CACHE_TTL_SECS) {
            self.cache.ttl_secs = u64::from_str(&ttl).unwrap_or(self.cache.ttl_secs);
        }

        if let Ok(start_date) = env::var(REPORT_START_DATE) {
            self.report.start_date = start_date;
        }

        if let Ok(basis) = env::var(REPORT_YIELD_BASIS) {
            self.report.yield_basis = basis;
        }

        self
    }
}

/// 回傳設定檔的路徑
fn config_path() -> PathBuf {
    PathBuf::from(CONFIG_PATH)
}
