//! 에러 타입 정의.

use std::fmt;

use fund_data::DataError;

/// Collector 에러 타입
#[derive(Debug)]
pub enum CollectorError {
    /// 데이터 소스 / 저장소 에러
    Data(DataError),
    /// 설정 에러
    Config(String),
    /// 데이터 소스 에러 (펀드 목록 조회 등)
    DataSource(String),
    /// 참조 펀드 목록이 비어 있음 (펀드 목록 동기화 선행 필요)
    EmptyReferenceSet,
}

impl fmt::Display for CollectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data(e) => write!(f, "Data error: {}", e),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::DataSource(msg) => write!(f, "Data source error: {}", msg),
            Self::EmptyReferenceSet => write!(
                f,
                "Reference fund list is empty: run `fund-collector sync-funds` first"
            ),
        }
    }
}

impl std::error::Error for CollectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Data(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DataError> for CollectorError {
    fn from(err: DataError) -> Self {
        Self::Data(err)
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
