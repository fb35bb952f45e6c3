//! 日志基础设施
//!
//! tracing 输出到 stdout；给出 LOG_DIR 时追加按日滚动的文件。

use std::path::Path;

/// Initialize the logger (stdout only, info level)
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger, optionally writing to a daily-rolling file.
///
/// 目录不存在时静默退回 stdout，启动不因日志配置而失败。
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level.parse().unwrap_or(tracing::Level::INFO))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "sanmart-server");
            subscriber.with_writer(file_appender).init();
            return;
        }
    }

    subscriber.init();
}
