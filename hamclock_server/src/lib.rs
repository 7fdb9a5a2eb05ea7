//! `hamclock_server` OpenHamClock 开发服务器核心库。
//!
//! 本 Crate 提供本地开发用的 HTTP 服务：
//! - 从配置的目录提供静态文件；
//! - `/api/{endpoint}` 把请求代理到 NOAA、POTA 等上游数据源，附带 CORS 与缓存头；
//! - `/ws/settings` 与 `/api/settings` 作为客户端设置同步的远端。
//!
//! 主要模块包括：
//! - `api`: HTTP API 处理器。
//! - `config`: 服务器配置的加载与命令行覆盖。
//! - `error`: 请求处理与启动阶段的错误类型。
//! - `state`: 处理器共享的应用状态。
//! - `ws_server`: 设置同步 WebSocket 会话。

pub mod api;
pub mod config;
pub mod error;
pub mod state;
pub mod ws_server;

use crate::config::ServerConfig;
use crate::state::{AppState, SharedState};
use anyhow::Context;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use chrono::Local;
use log::{error, info};
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

/// 组装全部路由。`/api/settings` 优先于 `/api/:endpoint` 匹配。
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/settings", get(api::settings_handler::get_settings))
        .route("/api/:endpoint", get(api::proxy_handler::proxy_api))
        .route("/ws/settings", get(ws_server::settings_session::settings_ws_handler))
        .fallback_service(ServeDir::new(&state.config.static_dir))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// 非 API 请求按 `[HH:MM:SS] METHOD path` 记录，API 请求由代理自行记录。
async fn log_request(request: Request, next: Next) -> Response {
    let path = request.uri().path();
    if !path.starts_with("/api/") {
        info!("[{}] {} {}", Local::now().format("%H:%M:%S"), request.method(), path);
    }
    next.run(request).await
}

/// 启动横幅：服务目录、访问地址与全部 API 端点。
pub fn banner(config: &ServerConfig) -> String {
    let rule = "=".repeat(50);
    let mut lines = vec![
        rule.clone(),
        "  OpenHamClock Development Server".to_string(),
        rule.clone(),
        String::new(),
        format!("  Serving from: {}", config.static_dir.display()),
        format!("  URL: http://localhost:{}", config.port),
        "  Press Ctrl+C to stop".to_string(),
        String::new(),
        "  Available API endpoints:".to_string(),
    ];
    lines.extend(config.endpoints.keys().map(|name| format!("    /api/{}", name)));
    lines.push(String::new());
    lines.push(rule);
    lines.push(String::new());
    lines.join("\n")
}

/// 在已绑定的监听器上运行服务，直到 `shutdown` 完成。
pub async fn serve<F>(listener: TcpListener, state: SharedState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("开发服务器异常退出")
}

/// 按配置绑定地址并运行服务，Ctrl+C 时优雅退出。
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("无法绑定到 {}", addr))?;
    info!("[主程序] 开发服务器正在监听 {}", addr);
    let state = AppState::shared(config).context("初始化服务器状态失败")?;
    serve(listener, state, shutdown_signal()).await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            println!("\nServer stopped.");
            info!("[主程序] 收到 Ctrl+C，正在停止服务。");
        }
        Err(e) => {
            error!("[主程序] 无法监听 Ctrl+C 信号: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
