//! 펀드 유형 분포 리포트 모듈.
//!
//! 데이터 소스의 전체 펀드 목록을 유형 라벨별로 집계합니다.
//! 필터 규칙을 조정할 때 참고용이며 저장소는 건드리지 않습니다.

use std::collections::HashMap;

use fund_core::FundListing;
use fund_data::FundDataSource;
use tracing::info;

use crate::{CollectorError, Result};

/// 빈 유형 라벨 표시용
const EMPTY_LABEL: &str = "(없음)";

/// 유형 라벨별 집계.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeCount {
    pub label: String,
    pub count: usize,
    /// 전체 펀드 대비 비율 (%)
    pub percentage: f64,
}

/// 유형 분포.
#[derive(Debug, Clone, Default)]
pub struct TypeDistribution {
    /// 전체 펀드 수
    pub total: usize,
    /// 전체 유형 (건수 내림차순, 동률이면 라벨순)
    pub entries: Vec<TypeCount>,
}

impl TypeDistribution {
    /// 라벨에 `keyword`가 포함된 유형만 추립니다.
    pub fn containing(&self, keyword: &str) -> Vec<&TypeCount> {
        self.entries
            .iter()
            .filter(|entry| entry.label.contains(keyword))
            .collect()
    }

    /// 상위 `n`개 유형.
    pub fn top(&self, n: usize) -> &[TypeCount] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// 리포트 로그 출력
    pub fn log_report(&self) {
        info!(total = self.total, types = self.entries.len(), "전체 펀드 유형 분포");
        for entry in &self.entries {
            info!(
                "  {:30} {:6} 건 ({:5.2}%)",
                entry.label, entry.count, entry.percentage
            );
        }

        for keyword in ["股票", "混合"] {
            let subset = self.containing(keyword);
            info!(keyword, types = subset.len(), "'{}' 포함 유형", keyword);
            for entry in subset {
                info!("  {:30} {:6} 건", entry.label, entry.count);
            }
        }
    }
}

/// 펀드 목록의 유형 분포를 계산합니다.
pub fn fund_type_distribution(listings: &[FundListing]) -> TypeDistribution {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for listing in listings {
        let label = listing.fund_type.trim();
        let label = if label.is_empty() { EMPTY_LABEL } else { label };
        *counts.entry(label).or_insert(0) += 1;
    }

    let total = listings.len();
    let mut entries: Vec<TypeCount> = counts
        .into_iter()
        .map(|(label, count)| TypeCount {
            label: label.to_string(),
            count,
            percentage: if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            },
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));

    TypeDistribution { total, entries }
}

/// 데이터 소스에서 펀드 목록을 받아 유형 분포를 계산합니다.
pub async fn report_fund_types(source: &dyn FundDataSource) -> Result<TypeDistribution> {
    info!(source = source.name(), "펀드 목록 조회 중...");

    let listings = source
        .fetch_fund_list()
        .await
        .map_err(|e| CollectorError::DataSource(format!("펀드 목록 조회 실패: {}", e)))?;

    info!(count = listings.len(), "펀드 목록 조회 완료");
    Ok(fund_type_distribution(&listings))
}
