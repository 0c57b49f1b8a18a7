//! Supabase(PostgREST) 테이블 저장소 클라이언트.
//!
//! `{base_url}/rest/v1/{table}` 엔드포인트에 대해:
//! - 조회: `GET ?select=..&order=..asc` + `Range: {from}-{to}` 헤더
//! - 전체 삭제: `DELETE ?id=gte.0`
//! - 일괄 삽입: `POST` JSON 배열
//!
//! 성공 상태 코드는 200, 201, 204, 206 입니다.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde_json::Value;

use super::{ProbeStatus, TableStore};
use crate::error::truncate_body;
use crate::{DataError, Result};

const SUCCESS_STATUSES: [u16; 4] = [200, 201, 204, 206];

/// 저장소 연결 설정.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    /// 저장소 기본 URL (예: https://xxxx.supabase.co)
    pub base_url: String,
    /// 권한 있는 서비스 키
    pub service_key: String,
    /// 공개 키 (없으면 서비스 키를 `apikey`로 사용)
    pub anon_key: Option<String>,
    /// 요청 타임아웃 (None이면 제한 없음)
    pub timeout: Option<Duration>,
}

/// Supabase REST 저장소.
pub struct SupabaseStore {
    client: Client,
    base_url: String,
}

impl SupabaseStore {
    /// 설정으로 클라이언트를 생성합니다.
    pub fn new(settings: &StoreSettings) -> Result<Self> {
        let api_key = settings
            .anon_key
            .as_deref()
            .unwrap_or(&settings.service_key);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value(api_key)?);
        headers.insert(
            AUTHORIZATION,
            header_value(&format!("Bearer {}", settings.service_key))?,
        );
        headers.insert("prefer", HeaderValue::from_static("return=minimal"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 기본 URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| DataError::ConfigError(format!("invalid header value: {}", e)))
}

fn is_success(status: StatusCode) -> bool {
    SUCCESS_STATUSES.contains(&status.as_u16())
}

#[async_trait]
impl TableStore for SupabaseStore {
    async fn read_page(
        &self,
        table: &str,
        columns: &[&str],
        order_by: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Value>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .get(self.table_url(table))
            .query(&[
                ("select", columns.join(",")),
                ("order", format!("{}.asc", order_by)),
            ])
            .header("Range", format!("{}-{}", offset, offset + limit - 1))
            .send()
            .await?;

        let status = response.status();
        if !is_success(status) {
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::StatusError {
                status: status.as_u16(),
                body: truncate_body(&body, 200),
            });
        }

        Ok(response.json::<Vec<Value>>().await?)
    }

    async fn delete_all(&self, table: &str) -> bool {
        let result = self
            .client
            .delete(self.table_url(table))
            .query(&[("id", "gte.0")])
            .send()
            .await;

        match result {
            Ok(response) if is_success(response.status()) => true,
            Ok(response) => {
                tracing::warn!(table, status = response.status().as_u16(), "테이블 비우기 실패");
                false
            }
            Err(e) => {
                tracing::error!(table, error = %e, "테이블 비우기 요청 실패");
                false
            }
        }
    }

    async fn bulk_insert(&self, table: &str, rows: &[Value]) -> bool {
        if rows.is_empty() {
            tracing::debug!(table, "삽입할 행 없음");
            return true;
        }

        let result = self
            .client
            .post(self.table_url(table))
            .json(rows)
            .send()
            .await;

        match result {
            Ok(response) if is_success(response.status()) => true,
            Ok(response) => {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                tracing::warn!(
                    table,
                    status,
                    body = %truncate_body(&body, 200),
                    "일괄 삽입 실패"
                );
                false
            }
            Err(e) => {
                tracing::error!(table, error = %e, "일괄 삽입 요청 실패");
                false
            }
        }
    }

    async fn probe(&self, table: &str) -> Result<ProbeStatus> {
        let response = self
            .client
            .get(self.table_url(table))
            .query(&[("select", "*"), ("limit", "1")])
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let rows = response.json::<Vec<Value>>().await?;
                Ok(ProbeStatus::Reachable { rows: rows.len() })
            }
            StatusCode::NOT_FOUND => Ok(ProbeStatus::TableMissing),
            other => Ok(ProbeStatus::Unexpected(other.as_u16())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn store_for(server: &mockito::ServerGuard) -> SupabaseStore {
        SupabaseStore::new(&StoreSettings {
            base_url: format!("{}/", server.url()),
            service_key: "service-key".to_string(),
            anon_key: None,
            timeout: None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_read_page_sends_range_and_auth() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/fund_list")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("select".into(), "fund_code,fund_name,fund_type".into()),
                Matcher::UrlEncoded("order".into(), "fund_code.asc".into()),
            ]))
            .match_header("range", "1000-1999")
            .match_header("apikey", "service-key")
            .match_header("authorization", "Bearer service-key")
            .with_status(206)
            .with_body(r#"[{"fund_code":"000001","fund_name":"A","fund_type":"股票型"}]"#)
            .create_async()
            .await;

        let store = store_for(&server);
        let rows = store
            .read_page(
                "fund_list",
                &["fund_code", "fund_name", "fund_type"],
                "fund_code",
                1000,
                1000,
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["fund_code"], "000001");
    }

    #[tokio::test]
    async fn test_read_page_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/v1/fund_list")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"message":"Invalid API key"}"#)
            .create_async()
            .await;

        let store = store_for(&server);
        let result = store
            .read_page("fund_list", &["fund_code"], "fund_code", 0, 10)
            .await;

        match result {
            Err(DataError::StatusError { status, body }) => {
                assert_eq!(status, 401);
                assert!(body.contains("Invalid API key"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_all() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/rest/v1/fund_list")
            .match_query(Matcher::UrlEncoded("id".into(), "gte.0".into()))
            .match_header("prefer", "return=minimal")
            .with_status(204)
            .create_async()
            .await;

        let store = store_for(&server);
        assert!(store.delete_all("fund_list").await);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_all_failure_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/rest/v1/fund_list")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let store = store_for(&server);
        assert!(!store.delete_all("fund_list").await);
    }

    #[tokio::test]
    async fn test_bulk_insert_posts_json_array() {
        let mut server = mockito::Server::new_async().await;
        let rows = vec![
            json!({ "fund_code": "000001", "stock_code": "600519" }),
            json!({ "fund_code": "000001", "stock_code": "00700" }),
        ];
        let mock = server
            .mock("POST", "/rest/v1/fund_holdings")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!(rows)))
            .with_status(201)
            .create_async()
            .await;

        let store = store_for(&server);
        assert!(store.bulk_insert("fund_holdings", &rows).await);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_bulk_insert_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/rest/v1/fund_holdings")
            .with_status(409)
            .with_body("duplicate key")
            .create_async()
            .await;

        let store = store_for(&server);
        assert!(!store.bulk_insert("fund_holdings", &[json!({})]).await);
    }

    #[tokio::test]
    async fn test_probe_statuses() {
        let mut server = mockito::Server::new_async().await;
        let _ok = server
            .mock("GET", "/rest/v1/fund_list")
            .match_query(Matcher::UrlEncoded("limit".into(), "1".into()))
            .with_status(200)
            .with_body(r#"[{"fund_code":"000001"}]"#)
            .create_async()
            .await;
        let _missing = server
            .mock("GET", "/rest/v1/fund_holdings")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let store = store_for(&server);
        assert_eq!(
            store.probe("fund_list").await.unwrap(),
            ProbeStatus::Reachable { rows: 1 }
        );
        assert_eq!(
            store.probe("fund_holdings").await.unwrap(),
            ProbeStatus::TableMissing
        );
    }

    #[test]
    fn test_anon_key_used_as_apikey() {
        let store = SupabaseStore::new(&StoreSettings {
            base_url: "https://example.supabase.co///".to_string(),
            service_key: "service".to_string(),
            anon_key: Some("anon".to_string()),
            timeout: Some(Duration::from_secs(5)),
        })
        .unwrap();
        assert_eq!(store.base_url(), "https://example.supabase.co");
        assert_eq!(
            store.table_url("fund_list"),
            "https://example.supabase.co/rest/v1/fund_list"
        );
    }

    #[test]
    fn test_invalid_key_is_config_error() {
        let result = SupabaseStore::new(&StoreSettings {
            base_url: "https://example.supabase.co".to_string(),
            service_key: "bad\nkey".to_string(),
            anon_key: None,
            timeout: None,
        });
        assert!(matches!(result, Err(DataError::ConfigError(_))));
    }
}
