//! 환경변수 기반 설정 모듈.
//!
//! 프로세스 시작 시 한 번 생성해 저장소 클라이언트와 각 파이프라인에 참조로 넘깁니다.

use std::time::Duration;

use fund_core::FundTypeFilter;
use fund_data::{EastmoneyOptions, StoreSettings};

use crate::{CollectorError, Result};

/// Collector 전체 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// 저장소 연결 설정
    pub store: StoreSettings,
    /// 데이터 소스 설정
    pub source: EastmoneyOptions,
    /// 펀드 목록 동기화 설정
    pub fund_list: FundListSyncConfig,
    /// 보유종목 수집 설정
    pub holdings: HoldingsCollectConfig,
}

/// 펀드 목록 동기화 설정
#[derive(Debug, Clone, Default)]
pub struct FundListSyncConfig {
    /// 수집 대상 유형 필터
    pub filter: FundTypeFilter,
}

/// 보유종목 수집 설정
#[derive(Debug, Clone)]
pub struct HoldingsCollectConfig {
    /// 참조 목록 조회 페이지 크기
    pub page_size: usize,
    /// 윈도우 시작 위치 (0부터). 중단 후 재개 시 "마지막 완료 위치 + 1"
    pub start_index: usize,
    /// 윈도우 크기 (None이면 끝까지)
    pub batch_size: Option<usize>,
    /// 공시 기간 (빈 문자열이면 최신)
    pub report_period: String,
    /// 펀드 간 요청 딜레이 (밀리초)
    pub request_delay_ms: u64,
    /// 진행 통계 출력 주기 (펀드 수)
    pub progress_interval: usize,
}

impl Default for HoldingsCollectConfig {
    fn default() -> Self {
        Self {
            page_size: 1000,
            start_index: 0,
            batch_size: None,
            report_period: String::new(),
            request_delay_ms: 0,
            progress_interval: 50,
        }
    }
}

impl HoldingsCollectConfig {
    /// 펀드 간 요청 딜레이를 Duration으로 반환
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl CollectorConfig {
    /// 환경변수(.env 포함)에서 설정 로드
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 키 조회 함수로부터 설정 생성
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = required(&lookup, "SUPABASE_URL")?;
        let service_key = required(&lookup, "SUPABASE_SERVICE_ROLE_KEY")?;

        let timeout = parse_opt::<u64, _>(&lookup, "HTTP_TIMEOUT_SECS")
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let defaults = HoldingsCollectConfig::default();
        let source_defaults = EastmoneyOptions::default();

        Ok(Self {
            store: StoreSettings {
                base_url,
                service_key,
                anon_key: lookup("SUPABASE_ANON_KEY").filter(|v| !v.trim().is_empty()),
                timeout,
            },
            source: EastmoneyOptions {
                fund_base_url: lookup("EASTMONEY_FUND_BASE_URL")
                    .unwrap_or(source_defaults.fund_base_url),
                f10_base_url: lookup("EASTMONEY_F10_BASE_URL")
                    .unwrap_or(source_defaults.f10_base_url),
                timeout,
            },
            fund_list: FundListSyncConfig::default(),
            holdings: HoldingsCollectConfig {
                page_size: parse_or(&lookup, "FUND_LIST_PAGE_SIZE", defaults.page_size).max(1),
                start_index: parse_strict(&lookup, "HOLDINGS_START_INDEX")?
                    .unwrap_or(defaults.start_index),
                batch_size: parse_strict(&lookup, "HOLDINGS_BATCH_SIZE")?,
                report_period: lookup("HOLDINGS_REPORT_PERIOD").unwrap_or_default(),
                request_delay_ms: parse_or(
                    &lookup,
                    "HOLDINGS_REQUEST_DELAY_MS",
                    defaults.request_delay_ms,
                ),
                progress_interval: parse_or(
                    &lookup,
                    "HOLDINGS_PROGRESS_INTERVAL",
                    defaults.progress_interval,
                )
                .max(1),
            },
        })
    }

    /// 로그용으로 서비스 키 앞부분만 남깁니다.
    pub fn masked_service_key(&self) -> String {
        let prefix: String = self.store.service_key.chars().take(20).collect();
        format!("{}...", prefix)
    }
}

/// 필수 값 조회 (없거나 비어 있으면 설정 오류)
fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CollectorError::Config(format!("{} 환경변수가 설정되지 않았습니다", key)))
}

/// 설정된 값만 꺼냅니다 (빈 문자열은 미설정)
fn lookup_set<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 값을 파싱 (없거나 실패 시 None, 실패는 경고)
fn parse_opt<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup_set(lookup, key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "환경변수 값을 해석할 수 없어 기본값을 사용합니다");
            None
        }
    }
}

/// 재개 위치처럼 잘못되면 안 되는 값을 파싱 (설정됐지만 해석 실패 시 설정 오류)
fn parse_strict<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup_set(lookup, key) {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| {
            CollectorError::Config(format!("{} 값을 해석할 수 없습니다: {:?}", key, raw))
        }),
    }
}

/// 값을 파싱 (실패 시 기본값 사용)
fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    parse_opt(lookup, key).unwrap_or(default)
}
