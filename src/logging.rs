//! 日志初始化
//!
//! 日志写到 stderr，不会和菜单的 stdout 输出混在一起。

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 日志级别环境变量
pub const LOG_ENV: &str = "SPRIG_LOG";

/// 初始化 tracing；`verbose` 时默认级别为 debug，否则为 warn
pub fn init(verbose: bool) {
    let default = if verbose { "sprig=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    // 重复初始化（例如测试中）时忽略错误
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
