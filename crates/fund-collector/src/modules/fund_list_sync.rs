//! 펀드 목록 동기화 모듈.
//!
//! 데이터 소스의 전체 펀드 목록을 받아 유형 필터를 적용한 뒤
//! `fund_list` 테이블을 통째로 교체합니다 (전체 삭제 → 일괄 삽입).
//!
//! # 단계
//!
//! 1. **조회**: 한 번의 호출로 전체 목록 조회. 실패/취소 시 즉시 종료
//! 2. **필터**: 유형 분류기 적용. 결과가 비면 종료 (테이블 보호)
//! 3. **비우기**: `fund_list` 전체 삭제. 실패해도 경고만 남기고 계속
//! 4. **저장**: 전체 배치를 한 번의 `bulk_insert`로 저장
//!
//! 3과 4 사이에는 트랜잭션이 없으므로, 비우기 실패 후 저장하면 중복 행이 생길 수 있습니다.

use std::time::Instant;

use chrono::Utc;
use fund_core::{filter_listings, FundRecord, FUND_LIST_TABLE};
use fund_data::{insert_records, FundDataSource, TableStore};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::type_report::fund_type_distribution;
use crate::config::FundListSyncConfig;
use crate::CollectionStats;

/// 펀드 목록 동기화 종료 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSyncOutcome {
    /// 저장 완료
    Saved,
    /// 데이터 소스 조회 실패
    FetchFailed,
    /// 조회 중 사용자 취소
    Cancelled,
    /// 데이터 소스가 빈 목록 반환
    EmptySource,
    /// 필터 후 남은 펀드 없음
    NothingInScope,
    /// 일괄 저장 실패
    SaveFailed,
}

/// 펀드 목록 동기화 결과
#[derive(Debug, Clone)]
pub struct FundListSyncReport {
    pub outcome: ListSyncOutcome,
    /// 조회된 펀드 수
    pub fetched: usize,
    /// 필터 통과 펀드 수
    pub in_scope: usize,
    /// 테이블 비우기 성공 여부 (시도하지 않았으면 None)
    pub cleared: Option<bool>,
    pub stats: CollectionStats,
}

impl FundListSyncReport {
    fn new(outcome: ListSyncOutcome) -> Self {
        Self {
            outcome,
            fetched: 0,
            in_scope: 0,
            cleared: None,
            stats: CollectionStats::new(),
        }
    }

    /// 저장까지 성공했는지 여부
    pub fn is_success(&self) -> bool {
        self.outcome == ListSyncOutcome::Saved
    }
}

/// 펀드 목록 동기화
pub async fn sync_fund_list(
    source: &dyn FundDataSource,
    store: &dyn TableStore,
    config: &FundListSyncConfig,
    cancel: &CancellationToken,
) -> FundListSyncReport {
    let start = Instant::now();
    let finish = |mut report: FundListSyncReport| {
        report.stats.elapsed = start.elapsed();
        report
    };

    // 1. 조회
    info!(step = "1/4", source = source.name(), "펀드 목록 조회 중 (중단: Ctrl+C)");
    let fetched = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            warn!("사용자 취소, 펀드 목록 동기화 중단");
            return finish(FundListSyncReport::new(ListSyncOutcome::Cancelled));
        }
        result = source.fetch_fund_list() => result,
    };

    let listings = match fetched {
        Ok(listings) => listings,
        Err(e) => {
            error!(error = %e, "펀드 목록 조회 실패");
            return finish(FundListSyncReport::new(ListSyncOutcome::FetchFailed));
        }
    };

    if listings.is_empty() {
        error!("데이터 소스가 빈 펀드 목록을 반환했습니다");
        return finish(FundListSyncReport::new(ListSyncOutcome::EmptySource));
    }

    let mut report = FundListSyncReport::new(ListSyncOutcome::Saved);
    report.fetched = listings.len();
    info!(count = report.fetched, "펀드 목록 조회 완료");

    // 2. 필터
    info!(step = "2/4", "펀드 유형 필터 적용");
    let in_scope = filter_listings(listings, &config.filter);
    report.in_scope = in_scope.len();
    report.stats.total = report.fetched;
    report.stats.skipped = report.fetched - report.in_scope;

    info!(
        original = report.fetched,
        kept = report.in_scope,
        excluded = report.fetched - report.in_scope,
        "유형 필터 결과"
    );

    if in_scope.is_empty() {
        error!("필터 후 남은 펀드가 없어 저장하지 않습니다");
        report.outcome = ListSyncOutcome::NothingInScope;
        return finish(report);
    }

    for entry in fund_type_distribution(&in_scope).top(10) {
        info!("  - {}: {} 건", entry.label, entry.count);
    }

    // 3. 비우기
    info!(step = "3/4", table = FUND_LIST_TABLE, "테이블 비우기");
    let cleared = store.delete_all(FUND_LIST_TABLE).await;
    report.cleared = Some(cleared);
    if cleared {
        info!(table = FUND_LIST_TABLE, "테이블 비우기 완료");
    } else {
        warn!(
            table = FUND_LIST_TABLE,
            "테이블 비우기 실패, 저장은 계속 진행합니다 (중복 행 가능)"
        );
    }

    // 4. 저장
    info!(step = "4/4", count = in_scope.len(), "펀드 목록 저장");
    let now = Utc::now();
    let records: Vec<FundRecord> = in_scope
        .iter()
        .map(|listing| FundRecord::from_listing(listing, now))
        .collect();

    if insert_records(store, FUND_LIST_TABLE, &records).await {
        report.stats.success = records.len();
        report.stats.total_rows = records.len();
        info!(count = records.len(), "펀드 목록 저장 완료");
    } else {
        report.stats.errors = 1;
        report.outcome = ListSyncOutcome::SaveFailed;
        error!("펀드 목록 저장 실패");
    }

    finish(report)
}
