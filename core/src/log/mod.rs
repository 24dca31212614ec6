//! Logger and logging macros
//!
//! Every crate of the workspace logs through the `log` facade using the macros exported here.
//! A host process installs the sink once with [`init_logger`]; tests use [`try_init_logger`].

mod appender;
mod consts;
mod logger;

pub use consts::DEFAULT_LOGGER_ENV;
pub use logger::LogError;

use appender::AppenderSpec;
use log4rs::config::{Config, Root};
use logger::Builder;

const CONSOLE_APPENDER: &str = "stdout";
const LOG_FILE_APPENDER: &str = "log_file";
const ERR_LOG_FILE_APPENDER: &str = "err_log_file";

fn build_config(log_dir: Option<&str>, filters: &str) -> Result<Config, LogError> {
    let loggers = Builder::new().parse_env(DEFAULT_LOGGER_ENV).parse_expression(filters).build();

    let mut appenders = vec![AppenderSpec::console(CONSOLE_APPENDER, None)];
    if let Some(log_dir) = log_dir {
        appenders.push(AppenderSpec::roller(LOG_FILE_APPENDER, None, log_dir, consts::LOG_FILE_NAME)?);
        appenders.push(AppenderSpec::roller(ERR_LOG_FILE_APPENDER, Some(log::LevelFilter::Warn), log_dir, consts::ERR_LOG_FILE_NAME)?);
    }
    let names = appenders.iter().map(|x| x.name).collect::<Vec<_>>();

    Config::builder()
        .appenders(appenders.into_iter().map(|x| x.appender()))
        .loggers(loggers.items(&names))
        .build(Root::builder().appenders(names.iter().copied()).build(loggers.root_level()))
        .map_err(|err| LogError::ConfigError(err.to_string()))
}

/// Installs the global logger.
///
/// `filters` follows the `RUST_LOG` syntax (`info,tonsub_store=debug`) and is applied
/// after the content of the `RUST_LOG` environment variable. When `log_dir` is provided
/// all records are also written to a rolling log file and warnings/errors to a dedicated one.
pub fn init_logger(log_dir: Option<&str>, filters: &str) -> Result<(), LogError> {
    let config = build_config(log_dir, filters)?;
    log4rs::init_config(config).map_err(|err| LogError::ConfigError(err.to_string()))?;
    Ok(())
}

/// Tries to init the global console logger, silently ignoring an already installed one.
pub fn try_init_logger(filters: &str) {
    let _ = init_logger(None, filters);
}

#[macro_export]
macro_rules! trace {
    ($($t:tt)*) => (
        log::trace!($($t)*)
    )
}

#[macro_export]
macro_rules! debug {
    ($($t:tt)*) => (
        log::debug!($($t)*)
    )
}

#[macro_export]
macro_rules! info {
    ($($t:tt)*) => (
        log::info!($($t)*)
    )
}

#[macro_export]
macro_rules! warn {
    ($($t:tt)*) => (
        log::warn!($($t)*)
    )
}

#[macro_export]
macro_rules! error {
    ($($t:tt)*) => (
        log::error!($($t)*)
    )
}
