use anyhow::Context;
use hamclock_server::config::{self, ServerConfig};
use log::{info, LevelFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 基础过滤级别放到 Trace，实际级别在读取配置后通过 set_max_level 收紧；
    // 设置了 RUST_LOG 时以环境变量为准
    env_logger::Builder::new()
        .filter_level(LevelFilter::Trace)
        .parse_default_env()
        .format_timestamp_millis()
        .init();
    let rust_log_set = std::env::var_os("RUST_LOG").is_some();
    if !rust_log_set {
        log::set_max_level(LevelFilter::Info);
    }

    let config_path = config::config_file_path();
    let mut server_config = ServerConfig::load_or_create(&config_path);
    if let Some(port) = config::port_from_args(std::env::args().skip(1)).context("解析命令行参数失败")? {
        server_config.port = port;
    }
    if !rust_log_set {
        log::set_max_level(server_config.log_level_filter());
    }
    info!("[主程序] 应用配置已加载，监听地址: {}", server_config.bind_addr());

    println!("{}", hamclock_server::banner(&server_config));
    hamclock_server::run(server_config).await
}
