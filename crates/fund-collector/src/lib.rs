//! Standalone batch collector for public-fund data.
//!
//! 이 crate는 독립 실행형 배치 작업을 제공합니다:
//! - 펀드 목록 동기화 (조회 → 유형 필터 → 테이블 비우기 → 일괄 저장)
//! - 보유종목 수집 (참조 목록 페이지 조회 → 윈도우 구간 펀드별 조회/저장, 재개 가능)
//! - 연결 점검 (설정, 데이터 소스, 저장소)
//! - 펀드 유형 분포 리포트

pub mod config;
pub mod error;
pub mod modules;
pub mod stats;

pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
pub use stats::CollectionStats;
