//! 데이터 모듈 오류 타입.

use thiserror::Error;

/// 데이터 소스 / 저장소 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// HTTP 요청 실패 (연결, 타임아웃, 본문 읽기)
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// 성공이 아닌 응답 상태 코드
    #[error("Unexpected status {status}: {body}")]
    StatusError { status: u16, body: String },

    /// 응답 본문 파싱 오류
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 설정 오류
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

/// 로그/오류 메시지용으로 응답 본문을 앞부분만 남깁니다.
pub(crate) fn truncate_body(body: &str, max_chars: usize) -> String {
    body.chars().take(max_chars).collect()
}
