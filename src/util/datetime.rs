use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+").unwrap_or_else(|why| panic!("Failed to compile digit regex: {:?}", why))
});

/// 小於此值的年份視為民國年
const MINGUO_CEILING: i64 = 200;

/// Convert ROC year to Gregorian year.
pub fn to_gregorian_year(year: i32) -> i32 {
    year + 1911
}

/// 將來源中格式不一的年度值正規化成西元年。
///
/// 資料源的年度欄位可能是民國年（93）、西元年（2004）或夾帶文字的字串
/// （"93年"），一律取出第一段連續數字後依大小判斷：小於 200 視為民國年
/// 加 1911，否則視為已是西元年。
///
/// 無法解析時回傳 0，由彙總階段剔除該筆資料，本函式不會失敗。
pub fn normalize_year(raw: &str) -> i32 {
    let run = match DIGIT_RUN.find(raw) {
        Some(m) => m.as_str(),
        None => return 0,
    };

    let n = match run.parse::<i64>() {
        Ok(n) => n,
        Err(_) => return 0,
    };

    if n < MINGUO_CEILING {
        to_gregorian_year(n as i32)
    } else if n <= i32::MAX as i64 {
        n as i32
    } else {
        0
    }
}

/// Parse a date string in the format of ROC calendar
/// and return it as a NaiveDate in the Gregorian calendar.
pub fn parse_taiwan_date(date_str: &str) -> Option<NaiveDate> {
    let split_date: Vec<&str> = date_str.split(['/', '-']).collect();
    if split_date.len() != 3 {
        return None;
    }

    let year = to_gregorian_year(parse_date_part::<i32>(split_date[0])?);
    let month = parse_date_part::<u32>(split_date[1])?;
    let day = parse_date_part::<u32>(split_date[2])?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Try to parse a string as a date part and return it as an Option.
fn parse_date_part<T: std::str::FromStr>(date_part_str: &str) -> Option<T> {
    date_part_str.parse::<T>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_year_minguo() {
        assert_eq!(normalize_year("93"), 2004);
        assert_eq!(normalize_year("94"), 2005);
        assert_eq!(normalize_year("110年"), 2021);
        assert_eq!(normalize_year("0"), 1911);
    }

    #[test]
    fn test_normalize_year_gregorian() {
        assert_eq!(normalize_year("2020"), 2020);
        assert_eq!(normalize_year("2004.0"), 2004);
        assert_eq!(normalize_year("200"), 200);
    }

    #[test]
    fn test_normalize_year_embedded_text() {
        // 前置的非數字字元會被跳過，取第一段連續數字
        assert_eq!(normalize_year("abc99"), 2010);
        assert_eq!(normalize_year("民國93年度"), 2004);
    }

    #[test]
    fn test_normalize_year_unparseable() {
        assert_eq!(normalize_year(""), 0);
        assert_eq!(normalize_year("未公佈"), 0);
        assert_eq!(normalize_year("99999999999999999999"), 0);
    }

    #[test]
    fn test_parse_taiwan_date() {
        assert_eq!(
            parse_taiwan_date("93/08/15"),
            NaiveDate::from_ymd_opt(2004, 8, 15)
        );
        assert_eq!(
            parse_taiwan_date("110-01-05"),
            NaiveDate::from_ymd_opt(2021, 1, 5)
        );
        assert_eq!(parse_taiwan_date("2004/08"), None);
        assert_eq!(parse_taiwan_date("93/13/45"), None);
    }
}
