use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber: stderr plus a daily `photomind.log` in
/// `log_dir`. Keep the returned guard alive until exit or buffered lines
/// are lost.
pub fn init(level: &str, log_dir: &Path) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;
    let file_appender = rolling::daily(log_dir, "photomind.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr.and(file_writer))
        .init();
    Ok(guard)
}
