// hamclock_server/src/api/proxy_handler.rs

//! 上游数据源代理。
//!
//! `GET /api/{endpoint}` 在配置的端点表中查找上游 URL，转发请求并原样返回响应体。
//! 查询字符串不参与端点解析。

use crate::error::AppError;
use crate::state::SharedState;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use log::{error, info};

pub async fn proxy_api(State(state): State<SharedState>, Path(endpoint): Path<String>) -> Result<Response, AppError> {
    let url = state
        .config
        .endpoints
        .get(&endpoint)
        .ok_or_else(|| AppError::UnknownEndpoint(endpoint.clone()))?;

    info!("[代理] Fetching: {}", url);
    let upstream = state
        .http_client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|e| {
            error!("[代理] 请求上游 {} 失败: {}", url, e);
            AppError::Upstream(e.to_string())
        })?;

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));
    let body = upstream.bytes().await.map_err(|e| {
        error!("[代理] 读取上游 {} 的响应体失败: {}", url, e);
        AppError::Upstream(e.to_string())
    })?;
    let cache_control = HeaderValue::from_str(&format!("max-age={}", state.config.cache_max_age_secs))
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
            (header::CACHE_CONTROL, cache_control),
        ],
        body,
    )
        .into_response())
}
