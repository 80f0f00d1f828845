use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::UtcTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::LogLevel;

/// 初始化日志，返回的 guard 需要在程序退出前一直持有
///
/// 设置了 `RUST_LOG` 时以环境变量为准，全局 subscriber 已存在时返回错误
pub fn init_tracing(level: LogLevel) -> anyhow::Result<WorkerGuard> {
    // 滚动文件 appender (按小时切割，目录logs/, 文件名gestures.log)
    let file_appender = RollingFileAppender::new(Rotation::HOURLY, "logs/", "gestures.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_timer(UtcTime::rfc_3339())
        .with_line_number(true)
        .with_writer(non_blocking)
        .with_filter(env_filter(level));

    // 控制台写到 stderr，stdout 留给事件输出
    let console_layer = fmt::layer()
        .with_ansi(false)
        .with_timer(UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .with_filter(env_filter(level));

    Registry::default()
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_an_error() {
        let _guard = init_tracing(LogLevel::Info).unwrap();
        assert!(init_tracing(LogLevel::Debug).is_err());
    }
}
