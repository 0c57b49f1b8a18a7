//! 펀드 유형 분류기.
//!
//! 펀드 유형 라벨 하나만 보고 수집 대상 여부를 판정합니다.
//!
//! # 판정 규칙
//!
//! - 허용 접두사 중 하나로 **시작**해야 함 (대소문자 구분)
//! - 제외 키워드를 하나도 **포함하지 않아야** 함 (대소문자 무시)
//! - 빈 라벨은 접두사 검사에서 탈락

use crate::domain::FundListing;

/// 기본 허용 접두사 (주식형, 혼합형).
pub const DEFAULT_ALLOW_PREFIXES: &[&str] = &["股票型", "混合型"];

/// 기본 제외 키워드.
///
/// 지수형, 채권형, 머니마켓, QDII, FOF, 자산관리형, 채권편향, 리츠, 원자재.
pub const DEFAULT_DENY_KEYWORDS: &[&str] = &[
    "指数型", "债券型", "债务型", "货币型", "QDII", "FOF", "理财", "偏债", "REITs", "商品",
];

/// 허용 접두사 / 제외 키워드 기반 펀드 유형 필터.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundTypeFilter {
    allow_prefixes: Vec<String>,
    /// 소문자로 정규화된 제외 키워드
    deny_keywords: Vec<String>,
}

impl FundTypeFilter {
    /// 새 필터를 생성합니다.
    pub fn new<A, D>(allow_prefixes: A, deny_keywords: D) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        let mut deny: Vec<String> = Vec::new();
        for keyword in deny_keywords {
            let lowered = keyword.as_ref().to_lowercase();
            if !lowered.is_empty() && !deny.contains(&lowered) {
                deny.push(lowered);
            }
        }

        Self {
            allow_prefixes: allow_prefixes.into_iter().map(Into::into).collect(),
            deny_keywords: deny,
        }
    }

    /// 허용 접두사 목록.
    pub fn allow_prefixes(&self) -> &[String] {
        &self.allow_prefixes
    }

    /// 정규화된 제외 키워드 목록.
    pub fn deny_keywords(&self) -> &[String] {
        &self.deny_keywords
    }

    /// 유형 라벨이 수집 대상인지 판정합니다.
    pub fn is_in_scope(&self, fund_type: &str) -> bool {
        if fund_type.is_empty() {
            return false;
        }

        if !self
            .allow_prefixes
            .iter()
            .any(|prefix| fund_type.starts_with(prefix.as_str()))
        {
            return false;
        }

        let lowered = fund_type.to_lowercase();
        !self
            .deny_keywords
            .iter()
            .any(|keyword| lowered.contains(keyword.as_str()))
    }
}

impl Default for FundTypeFilter {
    fn default() -> Self {
        Self::new(
            DEFAULT_ALLOW_PREFIXES.iter().copied(),
            DEFAULT_DENY_KEYWORDS.iter().copied(),
        )
    }
}

/// 기본 규칙으로 유형 라벨을 판정합니다.
pub fn is_in_scope(fund_type: &str) -> bool {
    FundTypeFilter::default().is_in_scope(fund_type)
}

/// 수집 대상 펀드만 남깁니다. 원래 순서는 유지됩니다.
pub fn filter_listings(listings: Vec<FundListing>, filter: &FundTypeFilter) -> Vec<FundListing> {
    listings
        .into_iter()
        .filter(|listing| filter.is_in_scope(&listing.fund_type))
        .collect()
}
