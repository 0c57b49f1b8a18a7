//! 데이터 Provider 모듈.
//!
//! 펀드 목록과 분기별 보유종목 공시를 가져오는 Provider를 정의합니다.
//!
//! ## Eastmoney
//! - `EastmoneyFundSource`: 공모펀드 전체 목록 (`fundcode_search.js`)
//! - 펀드별 주식 보유 명세 (`FundArchivesDatas.aspx?type=jjcc`)

pub mod eastmoney;

pub use eastmoney::{EastmoneyFundSource, EastmoneyOptions};

use async_trait::async_trait;
use fund_core::{FundListing, HoldingRow};

use crate::{DataError, Result};

/// 펀드 한 건에 대한 보유종목 조회 결과.
///
/// 현재 수집 루프는 `Empty`와 `Error`를 모두 건너뛰기로 처리하지만
/// 두 경우를 구분해 로그와 통계에 남깁니다.
#[derive(Debug)]
pub enum HoldingsFetch {
    /// 보유종목 행이 한 건 이상 있음
    Data(Vec<HoldingRow>),
    /// 조회는 성공했으나 공시된 보유종목 없음
    Empty,
    /// 조회 실패
    Error(DataError),
}

impl HoldingsFetch {
    /// 조회 결과를 분류합니다.
    pub fn from_result(result: Result<Vec<HoldingRow>>) -> Self {
        match result {
            Ok(rows) if rows.is_empty() => Self::Empty,
            Ok(rows) => Self::Data(rows),
            Err(e) => Self::Error(e),
        }
    }
}

/// 펀드 데이터 소스 trait.
#[async_trait]
pub trait FundDataSource: Send + Sync {
    /// Provider 이름.
    fn name(&self) -> &str;

    /// 전체 펀드 목록 조회.
    async fn fetch_fund_list(&self) -> Result<Vec<FundListing>>;

    /// 펀드 보유종목 조회.
    ///
    /// `period`가 빈 문자열이면 최신 공시 연도를 조회합니다.
    async fn fetch_holdings(&self, fund_code: &str, period: &str) -> Result<Vec<HoldingRow>>;

    /// 보유종목 조회 후 결과를 분류합니다.
    async fn holdings(&self, fund_code: &str, period: &str) -> HoldingsFetch {
        HoldingsFetch::from_result(self.fetch_holdings(fund_code, period).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holdings_fetch_classification() {
        assert!(matches!(
            HoldingsFetch::from_result(Ok(Vec::new())),
            HoldingsFetch::Empty
        ));
        assert!(matches!(
            HoldingsFetch::from_result(Ok(vec![HoldingRow::default()])),
            HoldingsFetch::Data(rows) if rows.len() == 1
        ));
        assert!(matches!(
            HoldingsFetch::from_result(Err(DataError::ParseError("bad".into()))),
            HoldingsFetch::Error(_)
        ));
    }
}
