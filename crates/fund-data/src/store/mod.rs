//! 원격 테이블 저장소 모듈.
//!
//! REST로 접근하는 테이블 저장소에 대한 얇은 CRUD 추상화입니다.
//!
//! - `TableStore`: 페이지 조회 / 전체 삭제 / 일괄 삽입
//! - `SupabaseStore`: Supabase(PostgREST) 구현
//! - `read_all_pages`: 짧은 페이지가 나올 때까지 전체 조회

pub mod supabase;

pub use supabase::{StoreSettings, SupabaseStore};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::{DataError, Result};

/// 테이블 연결 점검 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStatus {
    /// 테이블 조회 성공 (반환된 행 수)
    Reachable { rows: usize },
    /// 테이블 없음 (404)
    TableMissing,
    /// 기타 상태 코드
    Unexpected(u16),
}

/// 테이블 저장소 trait.
///
/// 모든 호출은 원격 호출이며 로컬 내구성이 없습니다.
/// `delete_all`과 `bulk_insert`를 묶는 트랜잭션은 없습니다.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// 정렬 키 오름차순으로 `[offset, offset + limit)` 범위를 조회합니다.
    ///
    /// 반환 행 수가 `limit`보다 작으면 마지막 페이지입니다.
    /// 성공이 아닌 상태 코드나 전송 오류는 `Err`입니다.
    async fn read_page(
        &self,
        table: &str,
        columns: &[&str],
        order_by: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Value>>;

    /// 테이블의 모든 행을 삭제합니다. 저장소가 성공을 보고했는지 반환합니다.
    async fn delete_all(&self, table: &str) -> bool;

    /// 한 번의 요청으로 행들을 삽입합니다.
    ///
    /// 실패 시 배치의 어떤 부분도 반영되었다고 가정하지 않습니다.
    async fn bulk_insert(&self, table: &str, rows: &[Value]) -> bool;

    /// 테이블 접근 가능 여부를 점검합니다.
    async fn probe(&self, table: &str) -> Result<ProbeStatus>;
}

/// 페이지 단위 전체 조회 결과.
#[derive(Debug)]
pub struct PagedRead<T> {
    /// 디코딩된 행 (정렬 순서 유지)
    pub rows: Vec<T>,
    /// 요청한 페이지 수
    pub pages: usize,
    /// 디코딩에 실패해 버린 행 수
    pub skipped_rows: usize,
    /// 조회를 중단시킨 저장소 오류
    pub error: Option<DataError>,
}

/// 짧은 페이지(0건 포함)가 나오거나 저장소 오류가 날 때까지 전체 행을 조회합니다.
///
/// 오류가 나면 그때까지 읽은 행을 유지한 채 조회를 멈추고 `error`에 남깁니다.
pub async fn read_all_pages<T: DeserializeOwned>(
    store: &dyn TableStore,
    table: &str,
    columns: &[&str],
    order_by: &str,
    page_size: usize,
) -> PagedRead<T> {
    let page_size = page_size.max(1);
    let mut result = PagedRead {
        rows: Vec::new(),
        pages: 0,
        skipped_rows: 0,
        error: None,
    };
    let mut offset = 0;

    loop {
        let page = match store
            .read_page(table, columns, order_by, offset, page_size)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(table, offset, error = %e, "페이지 조회 실패");
                result.error = Some(e);
                break;
            }
        };
        result.pages += 1;

        let page_len = page.len();
        for value in page {
            match serde_json::from_value::<T>(value) {
                Ok(row) => result.rows.push(row),
                Err(e) => {
                    result.skipped_rows += 1;
                    tracing::warn!(table, error = %e, "행 디코딩 실패, 건너뜀");
                }
            }
        }

        tracing::info!(table, loaded = result.rows.len(), "페이지 조회 중...");

        if page_len < page_size {
            break;
        }
        offset += page_size;
    }

    result
}

/// 레코드를 JSON 행으로 직렬화해 일괄 삽입합니다.
pub async fn insert_records<T: Serialize>(
    store: &dyn TableStore,
    table: &str,
    records: &[T],
) -> bool {
    let rows: std::result::Result<Vec<Value>, _> =
        records.iter().map(serde_json::to_value).collect();

    match rows {
        Ok(rows) => store.bulk_insert(table, &rows).await,
        Err(e) => {
            tracing::error!(table, error = %e, "레코드 직렬화 실패");
            false
        }
    }
}
