use std::sync::Arc;

use anyhow::{anyhow, Result};
use axum::{
    extract::{Path, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    cache::{self, TtlCacheInner, TTL},
    config::SETTINGS,
    declare::{QueryKind, SortOrder, YieldBasis},
    logging,
    provider::finmind::FinMind,
    report::{
        self,
        combine::{self, CombinedOutcome},
        export, ReportOutcome,
    },
};

/// 啟動 HTTP 服務，阻塞直到服務結束
pub async fn serve() -> Result<()> {
    let addr = format!("{}:{}", SETTINGS.web.host, SETTINGS.web.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|why| anyhow!("Failed to bind {} because {:?}", addr, why))?;

    logging::info_console(format!("dividend dashboard listening on {}", addr));

    axum::serve(listener, router())
        .await
        .map_err(|why| anyhow!("Failed to serve because {:?}", why))
}

fn router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/dividend/{stock_symbol}", get(dividend))
        .route("/api/dividend/{stock_symbol}/csv", get(dividend_csv))
        .route("/api/compare", get(compare))
}

#[derive(Debug, Deserialize)]
struct ReportQuery {
    /// asc 或 desc，預設 desc
    order: Option<String>,
    /// average 或 latest，預設取自設定檔
    basis: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompareQuery {
    /// 逗號分隔的股票清單
    tickers: Option<String>,
    basis: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl ErrorBody {
    fn new(message: impl Into<String>) -> Self {
        ErrorBody {
            message: message.into(),
        }
    }
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /api/dividend/{stock_symbol}
async fn dividend(
    Path(stock_symbol): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Response {
    match fetch_report(&stock_symbol, &query).await {
        Ok(outcome) => match outcome.as_ref() {
            ReportOutcome::Report(report) => (StatusCode::OK, Json(report)).into_response(),
            ReportOutcome::NoData { stock_symbol } => (
                StatusCode::NOT_FOUND,
                Json(ErrorBody::new(format!(
                    "no dividend data for {}",
                    stock_symbol
                ))),
            )
                .into_response(),
        },
        Err(response) => response,
    }
}

/// GET /api/dividend/{stock_symbol}/csv
async fn dividend_csv(
    Path(stock_symbol): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Response {
    match fetch_report(&stock_symbol, &query).await {
        Ok(outcome) => match outcome.as_ref() {
            ReportOutcome::Report(report) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
                export::to_delimited(report),
            )
                .into_response(),
            ReportOutcome::NoData { stock_symbol } => (
                StatusCode::NOT_FOUND,
                Json(ErrorBody::new(format!(
                    "no dividend data for {}",
                    stock_symbol
                ))),
            )
                .into_response(),
        },
        Err(response) => response,
    }
}

/// GET /api/compare?tickers=2330,2317
///
/// 逐檔處理，單一股票失敗只會被略過；合併結果固定由舊到新排序
/// 以便沿時間軸比較。
async fn compare(Query(query): Query<CompareQuery>) -> Response {
    let stock_symbols = combine::parse_ticker_list(query.tickers.as_deref().unwrap_or_default());
    if stock_symbols.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new("tickers is required")),
        )
            .into_response();
    }

    let basis = YieldBasis::from_param(query.basis.as_deref())
        .unwrap_or_else(|| SETTINGS.report.yield_basis());
    let key = cache::key(
        QueryKind::Compare,
        SortOrder::Ascending,
        basis,
        &stock_symbols,
    );

    let outcome = match TTL.combined_get(&key) {
        Some(hit) => hit,
        None => {
            let outcome = Arc::new(
                combine::combine(
                    &FinMind,
                    &stock_symbols,
                    SETTINGS.report.start_date(),
                    basis,
                )
                .await,
            );
            TTL.combined_set(key, outcome.clone());
            outcome
        }
    };

    match outcome.as_ref() {
        CombinedOutcome::Combined(report) => (StatusCode::OK, Json(report)).into_response(),
        CombinedOutcome::NoData { skipped } => (
            StatusCode::NOT_FOUND,
            Json(ErrorBody::new(format!(
                "no dividend data for any of: {}",
                skipped.join(", ")
            ))),
        )
            .into_response(),
    }
}

/// 依查詢參數取得單一股票報表，優先使用快取，失敗時回傳已組好的錯誤回應
async fn fetch_report(
    stock_symbol: &str,
    query: &ReportQuery,
) -> std::result::Result<Arc<ReportOutcome>, Response> {
    let order = SortOrder::from_param(query.order.as_deref()).unwrap_or(SortOrder::Descending);
    let basis = YieldBasis::from_param(query.basis.as_deref())
        .unwrap_or_else(|| SETTINGS.report.yield_basis());
    let symbols = [stock_symbol.to_string()];
    let key = cache::key(QueryKind::Dividend, order, basis, &symbols);

    if let Some(hit) = TTL.report_get(&key) {
        return Ok(hit);
    }

    match report::build(
        &FinMind,
        stock_symbol,
        SETTINGS.report.start_date(),
        order,
        basis,
    )
    .await
    {
        Ok(outcome) => {
            let outcome = Arc::new(outcome);
            TTL.report_set(key, outcome.clone());
            Ok(outcome)
        }
        Err(why) => {
            logging::error_file_async(format!(
                "Failed to build report({}) because {:?}",
                stock_symbol, why
            ));
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorBody::new(format!(
                    "failed to fetch dividend data for {}",
                    stock_symbol
                ))),
            )
                .into_response())
        }
    }
}
