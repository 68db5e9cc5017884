use chrono::{Datelike, NaiveDate};
use hashbrown::HashMap;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::{
    declare::{SortOrder, YieldBasis, MIN_REPORT_YEAR},
    report::{DividendRecord, PriceRecord, YearlyRow},
};

/// 將歷次股利分配紀錄依年度合併成年報列。
///
/// 一檔股票同一年度內可能配發多次（季配、半年配），同年度的金額
/// 以加總收斂成一列；年度為 0 或早於 [`MIN_REPORT_YEAR`] 的紀錄剔除。
pub fn yearly_totals(records: &[DividendRecord], order: SortOrder) -> Vec<YearlyRow> {
    let mut by_year: HashMap<i32, (Decimal, Decimal, Option<NaiveDate>)> = HashMap::new();

    for record in records {
        if record.year <= MIN_REPORT_YEAR {
            continue;
        }

        let entry = by_year.entry(record.year).or_default();
        entry.0 += record.cash;
        entry.1 += record.stock;
        if record.ex_dividend_date > entry.2 {
            entry.2 = record.ex_dividend_date;
        }
    }

    let mut rows: Vec<YearlyRow> = by_year
        .into_iter()
        .map(|(year, (cash_total, stock_total, last_ex_dividend_date))| YearlyRow {
            year,
            cash_total,
            stock_total,
            total: cash_total + stock_total,
            avg_price: None,
            yield_pct: None,
            last_ex_dividend_date,
        })
        .collect();

    sort_rows(&mut rows, order);
    rows
}

/// 以收盤價資料補上年均價與現金殖利率。
///
/// 殖利率分母依 `basis` 取當年度均價或最近收盤價；該年度取不到分母
/// 或分母為 0 時殖利率記 0，資料列仍保留，殖利率屬於盡力而為的欄位。
pub fn apply_prices(rows: &mut [YearlyRow], prices: &[PriceRecord], basis: YieldBasis) {
    let averages = average_close_by_year(prices);
    let latest = latest_close(prices);

    for row in rows.iter_mut() {
        row.avg_price = averages.get(&row.year).copied();

        let denominator = match basis {
            YieldBasis::AnnualAverage => row.avg_price,
            YieldBasis::LatestClose => latest,
        };

        row.yield_pct = Some(match denominator {
            Some(price) if !price.is_zero() => (row.cash_total / price * dec!(100)).round_dp(2),
            _ => Decimal::ZERO,
        });
    }
}

/// 各年度收盤價的平均值
pub fn average_close_by_year(prices: &[PriceRecord]) -> HashMap<i32, Decimal> {
    let mut sums: HashMap<i32, (Decimal, Decimal)> = HashMap::new();

    for price in prices {
        let entry = sums.entry(price.date.year()).or_default();
        entry.0 += price.close;
        entry.1 += Decimal::ONE;
    }

    sums.into_iter()
        .map(|(year, (sum, count))| (year, sum / count))
        .collect()
}

/// 最近一個交易日的收盤價
pub fn latest_close(prices: &[PriceRecord]) -> Option<Decimal> {
    prices.iter().max_by_key(|p| p.date).map(|p| p.close)
}

fn sort_rows(rows: &mut [YearlyRow], order: SortOrder) {
    match order {
        SortOrder::Ascending => rows.sort_by_key(|row| row.year),
        SortOrder::Descending => rows.sort_by_key(|row| std::cmp::Reverse(row.year)),
    }
}
