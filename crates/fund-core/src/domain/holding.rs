//! 펀드 보유종목 타입 정의.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 저장소의 보유종목 테이블 이름.
pub const FUND_HOLDINGS_TABLE: &str = "fund_holdings";

/// 데이터 소스가 반환하는 보유종목 행.
///
/// 공시 표에 따라 컬럼이 빠질 수 있으므로 수치 필드는 모두 `Option`입니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoldingRow {
    /// 종목 코드
    pub stock_code: String,
    /// 종목명
    pub stock_name: String,
    /// 순자산 대비 비중 (%)
    pub ratio: Option<f64>,
    /// 보유 주식 수 (만주)
    pub shares: Option<f64>,
    /// 보유 평가액 (만위안)
    pub market_value: Option<f64>,
    /// 공시 기간 라벨 (예: 2024年4季度股票投资明细)
    pub period: Option<String>,
}

/// `fund_holdings` 테이블 행.
///
/// (fund_code, stock_code, report_date) 조합이 논리적 식별자이지만
/// 저장소에서 강제하지는 않습니다. 기간별로 새 행이 누적됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingRecord {
    pub fund_code: String,
    pub stock_code: String,
    pub stock_name: String,
    pub holding_ratio: f64,
    pub holding_shares: f64,
    pub holding_value: f64,
    pub report_date: String,
    pub updated_at: DateTime<Utc>,
}

impl HoldingRecord {
    /// 소스 행을 저장용 레코드로 변환합니다.
    ///
    /// 누락된 수치는 0, 누락된 기간은 빈 문자열로 채웁니다.
    pub fn from_row(fund_code: &str, row: &HoldingRow, updated_at: DateTime<Utc>) -> Self {
        Self {
            fund_code: fund_code.to_string(),
            stock_code: row.stock_code.clone(),
            stock_name: row.stock_name.clone(),
            holding_ratio: row.ratio.unwrap_or(0.0),
            holding_shares: row.shares.unwrap_or(0.0),
            holding_value: row.market_value.unwrap_or(0.0),
            report_date: row.period.clone().unwrap_or_default(),
            updated_at,
        }
    }
}
