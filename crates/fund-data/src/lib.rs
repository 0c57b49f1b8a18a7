//! 외부 데이터 소스 및 원격 저장소 접근.
//!
//! 이 crate는 다음을 제공합니다:
//! - 펀드 목록 / 보유종목 데이터 소스 (Eastmoney)
//! - REST 기반 테이블 저장소 클라이언트 (Supabase PostgREST)
//! - 저장소 페이지 단위 조회 유틸리티

pub mod error;
pub mod provider;
pub mod store;

pub use error::{DataError, Result};

pub use provider::{EastmoneyFundSource, EastmoneyOptions, FundDataSource, HoldingsFetch};
pub use store::{
    insert_records, read_all_pages, PagedRead, ProbeStatus, StoreSettings, SupabaseStore,
    TableStore,
};
