use std::fmt::Write as _;

use crate::report::YearlyReport;

/// 將年報匯出成逗號分隔的純文字表格。
///
/// 欄位順序固定：年度、現金股利、股票股利、合計，有計算殖利率時
/// 會附上殖利率欄，列次維持報表本身的排序。
pub fn to_delimited(report: &YearlyReport) -> String {
    let with_yield = report.rows.iter().any(|row| row.yield_pct.is_some());
    let mut out = String::with_capacity(64 + report.rows.len() * 32);

    if with_yield {
        out.push_str("year,cash,stock,total,yield_pct\n");
    } else {
        out.push_str("year,cash,stock,total\n");
    }

    for row in &report.rows {
        if with_yield {
            let _ = writeln!(
                out,
                "{},{},{},{},{}",
                row.year,
                row.cash_total,
                row.stock_total,
                row.total,
                row.yield_pct.unwrap_or_default()
            );
        } else {
            let _ = writeln!(
                out,
                "{},{},{},{}",
                row.year, row.cash_total, row.stock_total, row.total
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::report::YearlyRow;

    use super::*;

    fn row(year: i32, cash: Decimal, yield_pct: Option<Decimal>) -> YearlyRow {
        YearlyRow {
            year,
            cash_total: cash,
            stock_total: dec!(0.5),
            total: cash + dec!(0.5),
            avg_price: None,
            yield_pct,
            last_ex_dividend_date: None,
        }
    }

    #[test]
    fn test_to_delimited_with_yield() {
        let report = YearlyReport {
            stock_symbol: "2330".to_string(),
            rows: vec![
                row(2021, dec!(3), Some(dec!(5.00))),
                row(2020, dec!(2), Some(Decimal::ZERO)),
            ],
        };

        let csv = to_delimited(&report);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("year,cash,stock,total,yield_pct"));
        assert_eq!(lines.next(), Some("2021,3,0.5,3.5,5.00"));
        assert_eq!(lines.next(), Some("2020,2,0.5,2.5,0"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_to_delimited_without_yield() {
        let report = YearlyReport {
            stock_symbol: "2330".to_string(),
            rows: vec![row(2020, dec!(2), None)],
        };

        let csv = to_delimited(&report);
        assert_eq!(csv, "year,cash,stock,total\n2020,2,0.5,2.5\n");
    }
}
