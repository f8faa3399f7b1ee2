//! Error types for Maya Connect
//!
//! 모든 에러를 중앙에서 관리

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Maya Connect 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // Hub 관련
    // ========================================================================
    #[error("Not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Hub session error: {0}")]
    Session(String),

    // ========================================================================
    // 실행 관련
    // ========================================================================
    #[error("Launch failed: {application} - {message}")]
    Launch { application: String, message: String },

    // ========================================================================
    // 일반
    // ========================================================================
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    // ========================================================================
    // 기타
    // ========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// 사용자에게 보여줄 수 있는 에러인지 확인
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::NotFound { .. }
                | Error::InvalidInput(_)
                | Error::Validation(_)
                | Error::Launch { .. }
        )
    }

    /// NotFound 에러 생성 헬퍼
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Error::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Launch 에러 생성 헬퍼
    pub fn launch(application: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Launch {
            application: application.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// From 구현 (추가 변환)
// ============================================================================

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = Error::not_found("Task", "abc");
        assert_eq!(err.to_string(), "Not found: Task abc");
        assert!(err.is_user_facing());
    }

    #[test]
    fn test_internal_is_not_user_facing() {
        let err: Error = "boom".into();
        assert!(!err.is_user_facing());
    }
}
