//! # Fund Core
//!
//! 공모펀드 보유종목 수집기의 핵심 도메인 모델을 제공합니다.
//!
//! 이 크레이트는 수집 파이프라인 전반에서 사용되는 기본 타입을 제공합니다:
//! - 펀드 목록 / 보유종목 레코드
//! - 펀드 유형 분류기 (수집 대상 판별)
//! - 재개 가능한 배치 윈도우 계산
//! - 로깅 인프라

pub mod classifier;
pub mod domain;
pub mod logging;
pub mod window;

pub use classifier::{filter_listings, is_in_scope, FundTypeFilter};
pub use domain::*;
pub use logging::{init_logging, LogConfig, LogFormat};
pub use window::{window, window_bounds};
