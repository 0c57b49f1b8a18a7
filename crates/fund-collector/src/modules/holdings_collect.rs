//! 펀드 보유종목 수집 모듈.
//!
//! `fund_list` 테이블을 페이지 단위로 읽은 뒤, 설정된 윈도우 구간의 펀드를
//! 하나씩 조회해 `fund_holdings`에 저장합니다.
//!
//! # 재개
//!
//! 중단되면 다음 시작 위치를 로그로 남깁니다. `HOLDINGS_START_INDEX`를
//! 그 값으로 바꿔 다시 실행하면 이어서 처리합니다.
//!
//! # 실패 격리
//!
//! 펀드 하나의 조회 실패, 빈 결과, 저장 실패는 해당 펀드만 건너뛰기로 집계하고
//! 다음 펀드 처리에 영향을 주지 않습니다. 취소는 펀드 사이에서만 확인합니다.

use std::ops::Range;
use std::time::Instant;

use chrono::Utc;
use fund_core::{window_bounds, FundRef, HoldingRecord, FUND_HOLDINGS_TABLE, FUND_LIST_TABLE};
use fund_data::{
    insert_records, read_all_pages, DataError, FundDataSource, HoldingsFetch, TableStore,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::HoldingsCollectConfig;
use crate::{CollectionStats, CollectorError, Result};

/// 보유종목 수집 요약
#[derive(Debug, Clone)]
pub struct HoldingsSummary {
    /// 참조 목록 전체 펀드 수
    pub reference_count: usize,
    /// 처리 윈도우 (참조 목록 인덱스, 끝 미포함)
    pub window: Range<usize>,
    /// 사용자 취소로 중단되었는지 여부
    pub interrupted: bool,
    /// 다음 실행 시작 위치
    pub next_start: usize,
    pub stats: CollectionStats,
}

impl HoldingsSummary {
    /// 요약 로그 출력
    pub fn log_summary(&self) {
        self.stats.log_summary("보유종목 수집");
        if self.interrupted {
            warn!(
                next_start = self.next_start,
                "중단됨. 이어서 처리하려면 HOLDINGS_START_INDEX={} 로 다시 실행하세요",
                self.next_start
            );
        } else if self.next_start < self.reference_count {
            info!(
                next_start = self.next_start,
                remaining = self.reference_count - self.next_start,
                "다음 배치: HOLDINGS_START_INDEX={}",
                self.next_start
            );
        }
        info!("fund_holdings 테이블은 report_date로 기간별 보유종목을 구분하며, 기간마다 새 행이 추가됩니다");
    }
}

/// 보유종목 수집
pub async fn collect_holdings(
    source: &dyn FundDataSource,
    store: &dyn TableStore,
    config: &HoldingsCollectConfig,
    cancel: &CancellationToken,
) -> Result<HoldingsSummary> {
    let start = Instant::now();

    // 1. 참조 목록 조회
    info!(table = FUND_LIST_TABLE, page_size = config.page_size, "참조 펀드 목록 조회 중...");
    let read = read_all_pages::<FundRef>(
        store,
        FUND_LIST_TABLE,
        FundRef::COLUMNS,
        FundRef::ORDER_BY,
        config.page_size,
    )
    .await;

    match read.error {
        // 전송 오류는 중단, 그 외 오류는 읽은 데까지 사용
        Some(e @ DataError::HttpError(_)) => {
            error!(
                loaded = read.rows.len(),
                error = %e,
                "참조 목록 조회 실패, 수집 중단"
            );
            return Err(e.into());
        }
        Some(e) => {
            warn!(
                loaded = read.rows.len(),
                error = %e,
                "참조 목록 조회 중 오류, 읽은 데까지만 사용"
            );
        }
        None => {}
    }

    let funds = read.rows;
    if funds.is_empty() {
        error!("저장소에 펀드 목록이 없습니다. 먼저 `fund-collector sync-funds`를 실행하세요");
        return Err(CollectorError::EmptyReferenceSet);
    }
    info!(count = funds.len(), pages = read.pages, "참조 펀드 목록 조회 완료");

    // 2. 윈도우
    let window = window_bounds(funds.len(), config.start_index, config.batch_size);
    let mut summary = HoldingsSummary {
        reference_count: funds.len(),
        window: window.clone(),
        interrupted: false,
        next_start: window.end,
        stats: CollectionStats {
            total: window.len(),
            ..Default::default()
        },
    };

    if window.is_empty() {
        let reason = if config.start_index >= funds.len() {
            "시작 위치가 목록 길이 이상"
        } else {
            "배치 크기가 0"
        };
        warn!(
            start_index = config.start_index,
            batch_size = ?config.batch_size,
            reference_count = funds.len(),
            "처리할 구간이 없습니다 ({})",
            reason
        );
        summary.stats.elapsed = start.elapsed();
        return Ok(summary);
    }

    info!(
        from = window.start + 1,
        to = window.end,
        total = window.len(),
        "{}번째부터 {}번째 펀드 보유종목 수집",
        window.start + 1,
        window.end
    );

    // 3. 펀드별 처리
    let progress_interval = config.progress_interval.max(1);
    let stats = &mut summary.stats;
    for (index, fund) in funds[window.clone()].iter().enumerate() {
        let position = window.start + index;

        if cancel.is_cancelled() {
            warn!(position, "사용자 취소, 수집 중단");
            summary.interrupted = true;
            summary.next_start = position;
            break;
        }

        info!(
            progress = format!("{}/{}", position + 1, window.end),
            fund_code = %fund.fund_code,
            fund_name = %fund.fund_name,
            "보유종목 조회"
        );

        match source.holdings(&fund.fund_code, &config.report_period).await {
            HoldingsFetch::Data(rows) => {
                let now = Utc::now();
                let records: Vec<HoldingRecord> = rows
                    .iter()
                    .map(|row| HoldingRecord::from_row(&fund.fund_code, row, now))
                    .collect();

                if insert_records(store, FUND_HOLDINGS_TABLE, &records).await {
                    stats.success += 1;
                    stats.total_rows += records.len();
                    info!(fund_code = %fund.fund_code, rows = records.len(), "[OK] 보유종목 저장");
                } else {
                    stats.skipped += 1;
                    stats.errors += 1;
                    warn!(fund_code = %fund.fund_code, "[SKIP] 보유종목 저장 실패");
                }
            }
            HoldingsFetch::Empty => {
                stats.skipped += 1;
                stats.empty += 1;
                info!(fund_code = %fund.fund_code, "[SKIP] 보유종목 없음");
            }
            HoldingsFetch::Error(e) => {
                stats.skipped += 1;
                stats.errors += 1;
                warn!(fund_code = %fund.fund_code, error = %e, "[SKIP] 보유종목 조회 실패");
            }
        }

        let processed = index + 1;
        if processed % progress_interval == 0 {
            info!(
                processed,
                success = stats.success,
                skipped = stats.skipped,
                "--- 진행 통계 ---"
            );
        }

        if !config.request_delay().is_zero() && processed < window.len() {
            tokio::select! {
                _ = cancel.cancelled() => debug!("딜레이 중 취소 신호 수신"),
                _ = tokio::time::sleep(config.request_delay()) => {}
            }
        }
    }

    summary.stats.elapsed = start.elapsed();
    Ok(summary)
}
