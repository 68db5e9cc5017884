/// 年報中允許的最小年度，正規化後小於等於此值的資料列會被剔除
pub const MIN_REPORT_YEAR: i32 = 1900;

/// 報表的排序方向
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SortOrder {
    /// 由舊到新，跨股票比較時使用
    Ascending,
    /// 由新到舊，單一股票報表的預設排序
    Descending,
}

impl SortOrder {
    pub fn name(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }

    /// 解析查詢參數，無法辨識時回傳 None 由呼叫端決定預設值
    pub fn from_param(param: Option<&str>) -> Option<SortOrder> {
        match param {
            Some("asc") | Some("ascending") => Some(SortOrder::Ascending),
            Some("desc") | Some("descending") => Some(SortOrder::Descending),
            _ => None,
        }
    }
}

/// 殖利率的計算基準
///
/// 現金股利要除以哪一個股價，原始需求在不同版本間並不一致，
/// 因此改為明確的設定項，由呼叫端或設定檔指定。
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum YieldBasis {
    /// 當年度收盤價的平均值
    AnnualAverage,
    /// 最近一個交易日的收盤價
    LatestClose,
}

impl YieldBasis {
    pub fn name(&self) -> &'static str {
        match self {
            YieldBasis::AnnualAverage => "average",
            YieldBasis::LatestClose => "latest",
        }
    }

    pub fn from_param(param: Option<&str>) -> Option<YieldBasis> {
        match param {
            Some("average") | Some("avg") => Some(YieldBasis::AnnualAverage),
            Some("latest") | Some("close") => Some(YieldBasis::LatestClose),
            _ => None,
        }
    }
}

/// 查詢種類，作為快取鍵的一部分
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum QueryKind {
    /// 單一股票的年度股利報表
    Dividend,
    /// 多檔股票的合併比較
    Compare,
}

impl QueryKind {
    pub fn name(&self) -> &'static str {
        match self {
            QueryKind::Dividend => "dividend",
            QueryKind::Compare => "compare",
        }
    }
}
