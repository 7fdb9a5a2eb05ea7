// hamclock_server/tests/dev_server_integration_test.rs

//! 开发服务器集成测试。
//!
//! 每个测试在 `127.0.0.1:0` 上启动一个假的上游数据源和一个真实的开发服务器，
//! 通过 `reqwest` 与 `satellite_filters` 的同步客户端驱动它们。

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use common_models::settings::{SettingsSnapshot, SATELLITE_FILTERS_KEY};
use hamclock_server::config::ServerConfig;
use hamclock_server::state::{AppState, SharedState};
use satellite_filters::{KeyValueStore, MemoryStore, SatelliteFilterState, SettingsSync, WsSettingsSync};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const SOLAR_FLUX_JSON: &str = r#"[{"time_tag":"2024-01-01","flux":150.2}]"#;
const BANDS_XML: &str = "<solar><solardata><sfi>150</sfi></solardata></solar>";

/// 假的上游数据源：一个 JSON 端点、一个不带 Content-Type 的端点、一个总是返回 500 的端点。
async fn spawn_upstream() -> SocketAddr {
    let app = Router::new()
        .route(
            "/solar-flux.json",
            get(|| async { ([(header::CONTENT_TYPE, "application/json; charset=utf-8")], SOLAR_FLUX_JSON) }),
        )
        .route("/solarxml.php", get(|| async { Response::new(Body::from(BANDS_XML)) }))
        .route("/broken", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("无法绑定假上游端口");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// 返回一个当前没有任何服务监听的本地地址。
async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

struct DevServer {
    addr: SocketAddr,
    state: SharedState,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<anyhow::Result<()>>,
}

impl DevServer {
    async fn start(config: ServerConfig) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("无法绑定开发服务器端口");
        let addr = listener.local_addr().unwrap();
        let state = AppState::shared(config).expect("构建服务器状态失败");
        let (shutdown, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(hamclock_server::serve(listener, Arc::clone(&state), async move {
            let _ = shutdown_rx.await;
        }));
        Self {
            addr,
            state,
            shutdown,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    fn ws_url(&self) -> String {
        format!("ws://{}/ws/settings", self.addr)
    }

    async fn stop(self) {
        let _ = self.shutdown.send(());
        self.handle.await.expect("服务任务不应 panic").expect("服务应正常退出");
    }
}

async fn config_with_upstream() -> ServerConfig {
    let upstream = spawn_upstream().await;
    let unreachable = unused_addr().await;
    let endpoints: BTreeMap<String, String> = [
        ("solarflux", format!("http://{}/solar-flux.json", upstream)),
        ("bands", format!("http://{}/solarxml.php", upstream)),
        ("broken", format!("http://{}/broken", upstream)),
        ("offline", format!("http://{}/nothing", unreachable)),
    ]
    .into_iter()
    .map(|(name, url)| (name.to_string(), url))
    .collect();
    ServerConfig {
        upstream_timeout_secs: 2,
        endpoints,
        ..ServerConfig::default()
    }
}

async fn fetch_settings(server: &DevServer) -> SettingsSnapshot {
    reqwest::get(server.url("/api/settings"))
        .await
        .expect("请求 /api/settings 失败")
        .json()
        .await
        .expect("/api/settings 应返回设置快照")
}

/// 轮询 `/api/settings`，直到过滤列表的值等于 `expected`。
async fn wait_for_synced_filters(server: &DevServer, expected: &str) -> SettingsSnapshot {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let snapshot = fetch_settings(server).await;
            if snapshot.get(SATELLITE_FILTERS_KEY) == Some(expected) {
                return snapshot;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("等待过滤列表 {} 同步到服务器超时", expected))
}

#[tokio::test]
async fn test_proxy_forwards_upstream_body_and_headers() {
    let server = DevServer::start(config_with_upstream().await).await;

    let response = reqwest::get(server.url("/api/solarflux?_=12345")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let headers = response.headers().clone();
    assert_eq!(headers[header::CONTENT_TYPE], "application/json; charset=utf-8");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(headers[header::CACHE_CONTROL], "max-age=60");
    assert_eq!(response.text().await.unwrap(), SOLAR_FLUX_JSON);

    server.stop().await;
}

#[tokio::test]
async fn test_proxy_defaults_content_type_to_json() {
    let server = DevServer::start(config_with_upstream().await).await;

    let response = reqwest::get(server.url("/api/bands")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(response.text().await.unwrap(), BANDS_XML);

    server.stop().await;
}

#[tokio::test]
async fn test_proxy_error_statuses() {
    let server = DevServer::start(config_with_upstream().await).await;

    let unknown = reqwest::get(server.url("/api/doesnotexist")).await.unwrap();
    assert_eq!(unknown.status(), reqwest::StatusCode::NOT_FOUND);
    assert_eq!(unknown.text().await.unwrap(), "Unknown API endpoint: doesnotexist");

    let broken = reqwest::get(server.url("/api/broken")).await.unwrap();
    assert_eq!(broken.status(), reqwest::StatusCode::BAD_GATEWAY);
    assert!(broken.text().await.unwrap().starts_with("Failed to fetch data: "));

    let offline = reqwest::get(server.url("/api/offline")).await.unwrap();
    assert_eq!(offline.status(), reqwest::StatusCode::BAD_GATEWAY);
    assert!(offline.text().await.unwrap().starts_with("Failed to fetch data: "));

    server.stop().await;
}

#[tokio::test]
async fn test_ws_sync_updates_server_snapshot() {
    let server = DevServer::start(ServerConfig::default()).await;

    let store = Arc::new(MemoryStore::new());
    store.set(SATELLITE_FILTERS_KEY, "[\"ISS\",\"NOAA-19\"]").unwrap();
    store.set("openhamclock_callsign", "\"N0CALL\"").unwrap();
    store.set("unrelated_key", "ignored").unwrap();

    let sync = WsSettingsSync::new(store, &server.ws_url(), Duration::from_secs(5)).unwrap();
    sync.sync_all_settings().await.expect("同步应被服务器确认");

    let snapshot = fetch_settings(&server).await;
    assert_eq!(snapshot.get(SATELLITE_FILTERS_KEY), Some("[\"ISS\",\"NOAA-19\"]"));
    assert_eq!(snapshot.get("openhamclock_callsign"), Some("\"N0CALL\""));
    assert_eq!(snapshot.get("unrelated_key"), None);
    assert_eq!(*server.state.settings.read().await, snapshot);

    server.stop().await;
}

#[tokio::test]
async fn test_filter_changes_reach_server() {
    let server = DevServer::start(ServerConfig::default()).await;

    let store = Arc::new(MemoryStore::new());
    let sync = Arc::new(WsSettingsSync::new(Arc::clone(&store), &server.ws_url(), Duration::from_secs(5)).unwrap());
    let state = SatelliteFilterState::initialize(Arc::clone(&store), sync);

    // 挂载时的同步先到达，之后的修改不会与它竞争
    wait_for_synced_filters(&server, "[]").await;

    state.set_filters(vec!["AO-91".to_string(), "ISS".to_string()]);
    state.settled().await;
    assert_eq!(store.get(SATELLITE_FILTERS_KEY).unwrap().as_deref(), Some("[\"AO-91\",\"ISS\"]"));
    wait_for_synced_filters(&server, "[\"AO-91\",\"ISS\"]").await;

    state.shutdown().await;
    server.stop().await;
}

#[tokio::test]
async fn test_sync_failure_leaves_filter_state_usable() {
    // 指向一个没有服务监听的地址，每次同步都会失败
    let offline = unused_addr().await;
    let store = Arc::new(MemoryStore::new());
    let sync = Arc::new(
        WsSettingsSync::new(
            Arc::clone(&store),
            &format!("ws://{}/ws/settings", offline),
            Duration::from_millis(500),
        )
        .unwrap(),
    );
    let state = SatelliteFilterState::initialize(Arc::clone(&store), sync);

    state.toggle_filter("ISS");
    state.settled().await;
    assert_eq!(*state.filters(), vec!["ISS".to_string()]);
    assert_eq!(store.get(SATELLITE_FILTERS_KEY).unwrap().as_deref(), Some("[\"ISS\"]"));

    state.shutdown().await;
}
