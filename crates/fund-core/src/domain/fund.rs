//! 펀드 목록 타입 정의.
//!
//! - `FundListing` - 데이터 소스에서 받은 원본 펀드 행
//! - `FundRecord` - `fund_list` 테이블에 저장되는 행
//! - `FundRef` - 보유종목 수집 시 `fund_list`에서 다시 읽어오는 행

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 저장소의 펀드 목록 테이블 이름.
pub const FUND_LIST_TABLE: &str = "fund_list";

/// 데이터 소스가 반환하는 펀드 목록 행.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundListing {
    /// 펀드 코드 (예: 000001)
    pub code: String,
    /// 펀드 약칭
    pub short_name: String,
    /// 펀드 유형 라벨 (예: 混合型-偏股). 비어 있을 수 있음
    pub fund_type: String,
    /// 병음 약어
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinyin_abbr: Option<String>,
    /// 전체 병음
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_pinyin: Option<String>,
}

impl FundListing {
    /// 필수 필드만으로 생성합니다.
    pub fn new(
        code: impl Into<String>,
        short_name: impl Into<String>,
        fund_type: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            short_name: short_name.into(),
            fund_type: fund_type.into(),
            pinyin_abbr: None,
            full_pinyin: None,
        }
    }
}

/// `fund_list` 테이블 행.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundRecord {
    pub fund_code: String,
    pub fund_name: String,
    pub fund_type: String,
    pub updated_at: DateTime<Utc>,
}

impl FundRecord {
    /// 소스 행을 저장용 레코드로 변환합니다.
    pub fn from_listing(listing: &FundListing, updated_at: DateTime<Utc>) -> Self {
        Self {
            fund_code: listing.code.clone(),
            fund_name: listing.short_name.clone(),
            fund_type: listing.fund_type.clone(),
            updated_at,
        }
    }
}

/// `fund_list`에서 읽어오는 참조 행.
///
/// `select=fund_code,fund_name,fund_type` 조회 결과에 대응합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundRef {
    pub fund_code: String,
    #[serde(default)]
    pub fund_name: String,
    #[serde(default)]
    pub fund_type: String,
}

impl FundRef {
    /// 참조 조회 시 선택하는 컬럼 목록.
    pub const COLUMNS: &'static [&'static str] = &["fund_code", "fund_name", "fund_type"];

    /// 정렬 키 컬럼.
    pub const ORDER_BY: &'static str = "fund_code";
}
