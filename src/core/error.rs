//! 核心错误处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::info;

/// 服务层抛出的运行时错误
///
/// 只有一种错误：携带消息的运行时失败。通知只能观察它，不能吞掉它。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Runtime(String),
}

impl ServiceError {
    pub fn runtime(message: impl Into<String>) -> Self {
        ServiceError::Runtime(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            ServiceError::Runtime(msg) => msg,
        }
    }
}

/// 在边界处捕获错误，把消息原样作为纯文本返回
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        info!("在控制器边界捕获到异常");
        info!("Message: {}", self.message());

        (StatusCode::INTERNAL_SERVER_ERROR, self.message().to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_bare_message() {
        let err = ServiceError::runtime("boom");
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.message(), "boom");
    }

    #[test]
    fn test_into_response_is_plain_text_500() {
        let response = ServiceError::runtime("boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|h| h.to_str().ok())
            .unwrap_or_default();
        assert!(content_type.starts_with("text/plain"));
    }
}
