use crate::modules::settings::cli::SETTINGS;
use chrono::Local;
use std::process;
use std::sync::OnceLock;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};
use tracing_subscriber::layer::SubscriberExt;

pub static LOG_WORKER_GUARD: OnceLock<Vec<WorkerGuard>> = OnceLock::new();

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

/// Install the global tracing subscriber from settings. Called once by the
/// embedding server before the first operation.
pub fn initialize_logging() {
    if SETTINGS.mailbridge_log_to_file {
        setup_file_logger().unwrap();
    } else {
        setup_stdout_logger().unwrap();
    }
}

fn setup_stdout_logger() -> Result<(), tracing::dispatcher::SetGlobalDefaultError> {
    let level = parse_log_level(&SETTINGS.mailbridge_log_level);

    let format = tracing_subscriber::fmt::format()
        .with_timer(LocalTimer)
        .with_ansi(SETTINGS.mailbridge_ansi_logs)
        .with_level(true)
        .with_target(true);

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .event_format(format)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}

fn setup_file_logger() -> Result<(), tracing::dispatcher::SetGlobalDefaultError> {
    let level = parse_log_level(&SETTINGS.mailbridge_log_level);

    let (server_nonb, server_guard) = server_log_writer();
    LOG_WORKER_GUARD.set(vec![server_guard]).unwrap();

    let server_layer = fmt::layer()
        .with_timer(LocalTimer)
        .with_ansi(SETTINGS.mailbridge_ansi_logs)
        .with_level(true)
        .with_writer(server_nonb)
        .with_target(true);

    let subscriber = tracing_subscriber::registry()
        .with(LevelFilter::from_level(level))
        .with(server_layer);

    tracing::subscriber::set_global_default(subscriber)
}

fn server_log_writer() -> (NonBlocking, WorkerGuard) {
    let rolling = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("server")
        .max_log_files(SETTINGS.mailbridge_max_log_files)
        .build(SETTINGS.mailbridge_log_dir.clone())
        .expect("failed to initialize rolling file appender");
    let (nb, wg) = tracing_appender::non_blocking(rolling);
    (nb, wg)
}

fn parse_log_level(level: &str) -> Level {
    match level.parse::<Level>() {
        Ok(level) => level,
        Err(_) => {
            eprintln!(
                "Invalid log level '{}'. Expected one of: error, warn, info, debug, trace.",
                level
            );
            process::exit(1);
        }
    }
}
