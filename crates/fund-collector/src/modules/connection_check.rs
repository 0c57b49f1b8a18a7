//! 연결 점검 모듈.
//!
//! 배치 실행 전에 설정, 데이터 소스, 저장소 연결을 차례로 확인합니다.

use fund_core::FUND_LIST_TABLE;
use fund_data::{FundDataSource, ProbeStatus, TableStore};
use tracing::{error, info, warn};

use crate::CollectorConfig;

/// 점검 항목 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Passed(String),
    Warning(String),
    Failed(String),
}

impl CheckStatus {
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed(_))
    }

    fn log(&self, item: &str) {
        match self {
            Self::Passed(detail) => info!(item, "[OK] {}", detail),
            Self::Warning(detail) => warn!(item, "[WARN] {}", detail),
            Self::Failed(detail) => error!(item, "[ERROR] {}", detail),
        }
    }
}

/// 연결 점검 결과
#[derive(Debug, Clone)]
pub struct ConnectionReport {
    pub config: CheckStatus,
    pub source: CheckStatus,
    pub store: CheckStatus,
}

impl ConnectionReport {
    /// 모든 항목 통과 여부
    pub fn is_ok(&self) -> bool {
        self.config.is_passed() && self.source.is_passed() && self.store.is_passed()
    }

    /// 결과 로그 출력
    pub fn log_report(&self) {
        self.config.log("config");
        self.source.log("source");
        self.store.log("store");

        if self.is_ok() {
            info!("모든 점검 통과. 배치 작업을 실행할 수 있습니다");
        } else {
            warn!("점검 실패 항목이 있습니다. .env 설정과 테이블 생성 여부를 확인하세요");
        }
    }
}

/// 연결 점검
///
/// 설정은 `CollectorConfig` 생성 시 이미 검증되므로 여기서는 요약만 남깁니다.
pub async fn check_connection(
    source: &dyn FundDataSource,
    store: &dyn TableStore,
    config: &CollectorConfig,
) -> ConnectionReport {
    info!("1/3 설정 확인");
    let config_status = CheckStatus::Passed(format!(
        "Supabase URL: {}, Service Key: {}",
        config.store.base_url,
        config.masked_service_key()
    ));

    info!("2/3 데이터 소스 확인");
    let source_status = match source.fetch_fund_list().await {
        Ok(listings) if listings.is_empty() => CheckStatus::Warning(format!(
            "{} 응답은 정상이지만 펀드 목록이 비어 있습니다",
            source.name()
        )),
        Ok(listings) => CheckStatus::Passed(format!(
            "{} 펀드 목록 {} 건 조회",
            source.name(),
            listings.len()
        )),
        Err(e) => CheckStatus::Failed(format!("{} 조회 실패: {}", source.name(), e)),
    };

    info!("3/3 저장소 확인");
    let store_status = match store.probe(FUND_LIST_TABLE).await {
        Ok(ProbeStatus::Reachable { rows }) => CheckStatus::Passed(format!(
            "{} 테이블 접근 가능 (샘플 {} 건)",
            FUND_LIST_TABLE, rows
        )),
        Ok(ProbeStatus::TableMissing) => CheckStatus::Warning(format!(
            "{} 테이블이 없습니다. 테이블 생성 SQL을 먼저 실행하세요",
            FUND_LIST_TABLE
        )),
        Ok(ProbeStatus::Unexpected(status)) => {
            CheckStatus::Warning(format!("저장소 응답 이상: HTTP {}", status))
        }
        Err(e) => CheckStatus::Failed(format!("저장소 연결 실패: {}", e)),
    };

    ConnectionReport {
        config: config_status,
        source: source_status,
        store: store_status,
    }
}
