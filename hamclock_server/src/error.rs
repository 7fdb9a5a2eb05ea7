// hamclock_server/src/error.rs

//! 开发服务器的错误类型。
//!
//! `AppError` 是请求处理过程中的错误，实现了 axum 的 `IntoResponse`，
//! 直接转换为带纯文本正文的 HTTP 错误响应。
//! `ServerError` 是启动阶段（参数解析、HTTP 客户端构建、监听）的错误。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// 请求处理错误。
#[derive(Error, Debug)]
pub enum AppError {
    /// 请求的端点名称不在配置的端点表中。
    #[error("Unknown API endpoint: {0}")]
    UnknownEndpoint(String),

    /// 上游数据源不可达或返回了错误状态。
    #[error("Failed to fetch data: {0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnknownEndpoint(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

/// 服务启动阶段的错误。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("无效的端口号: '{0}'")]
    InvalidPort(String),

    #[error("构建上游 HTTP 客户端失败: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::UnknownEndpoint("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Upstream("x".into()).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(AppError::Internal("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_messages() {
        assert_eq!(AppError::UnknownEndpoint("foo".into()).to_string(), "Unknown API endpoint: foo");
        assert_eq!(
            AppError::Upstream("connection refused".into()).to_string(),
            "Failed to fetch data: connection refused"
        );
    }
}
