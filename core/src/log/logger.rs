use log::LevelFilter;
use log4rs::config::Logger;
use std::{collections::HashMap, env, mem};
use thiserror::Error;

#[derive(Clone, Debug, Error)]
pub enum LogError {
    #[error("logger spec parsing error: {0}")]
    ParseLoggerSpecError(String),

    #[error("invalid log path: {0}")]
    InvalidLogPath(String),

    #[error("appender error: {0}")]
    AppenderError(String),

    #[error("logger config error: {0}")]
    ConfigError(String),
}

#[derive(Clone, Debug, PartialEq)]
pub(super) struct LoggerSpec {
    pub name: String,
    pub level: LevelFilter,
}

impl LoggerSpec {
    pub fn logger(&self, appenders: &[&'static str]) -> Logger {
        Logger::builder().appenders(appenders.iter().map(|x| x.to_string())).additive(false).build(self.name.clone(), self.level)
    }
}

/// Parsed filter expression: a root level plus per-module overrides
pub(super) struct Loggers {
    loggers: Vec<LoggerSpec>,
    root_level: LevelFilter,
}

impl Loggers {
    pub fn root_level(&self) -> LevelFilter {
        self.root_level
    }

    pub fn items<'a>(&'a self, appenders: &'a [&'static str]) -> impl Iterator<Item = Logger> + 'a {
        self.loggers.iter().map(move |x| x.logger(appenders))
    }

    #[cfg(test)]
    fn level_of(&self, name: &str) -> Option<LevelFilter> {
        self.loggers.iter().find(|x| x.name == name).map(|x| x.level)
    }
}

#[derive(Default)]
pub(super) struct Builder {
    loggers: HashMap<String, LevelFilter>,
    root_level: Option<LevelFilter>,
}

impl Builder {
    pub fn new() -> Builder {
        Self::default()
    }

    pub fn parse_env(&mut self, env: &str) -> &mut Self {
        self.parse_expression(&env::var(env).unwrap_or_default())
    }

    /// Parses a comma separated list of `level` or `module=level` specs.
    ///
    /// Invalid specs are reported on stdout and skipped since no logger exists yet.
    pub fn parse_expression(&mut self, expression: &str) -> &mut Self {
        for spec in expression.split(',').map(|x| x.trim()) {
            if spec.is_empty() {
                continue;
            }
            let mut parts = spec.split('=');
            let (level, name) = match (parts.next(), parts.next().map(|x| x.trim()), parts.next()) {
                (Some(part0), None, None) => match part0.parse() {
                    Ok(level) => (level, None),
                    Err(_) => (LevelFilter::max(), Some(part0)),
                },
                (Some(part0), Some(""), None) => (LevelFilter::max(), Some(part0)),
                (Some(part0), Some(part1), None) => match part1.parse() {
                    Ok(level) => (level, Some(part0)),
                    Err(_) => {
                        println!("Ignoring invalid logging spec '{}'", LogError::ParseLoggerSpecError(part1.to_string()));
                        continue;
                    }
                },
                _ => {
                    println!("Ignoring invalid logging spec '{}'", LogError::ParseLoggerSpecError(spec.to_string()));
                    continue;
                }
            };
            match name {
                Some(name) => {
                    self.loggers.insert(name.to_string(), level);
                }
                None => {
                    self.root_level.replace(level);
                }
            }
        }
        self
    }

    pub fn build(&mut self) -> Loggers {
        let loggers = mem::take(&mut self.loggers).into_iter().map(|(name, level)| LoggerSpec { name, level }).collect();
        Loggers { loggers, root_level: self.root_level.take().unwrap_or(LevelFilter::Info) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expression() {
        let loggers = Builder::new().parse_expression("warn, tonsub_store=debug ,tonsub_subscriber=trace").build();
        assert_eq!(loggers.root_level(), LevelFilter::Warn);
        assert_eq!(loggers.level_of("tonsub_store"), Some(LevelFilter::Debug));
        assert_eq!(loggers.level_of("tonsub_subscriber"), Some(LevelFilter::Trace));
    }

    #[test]
    fn test_parse_expression_skips_invalid_specs() {
        let loggers = Builder::new().parse_expression("tonsub_notify=loud,a=b=c,,tonsub_core").build();
        assert_eq!(loggers.root_level(), LevelFilter::Info);
        assert_eq!(loggers.level_of("tonsub_notify"), None);
        assert_eq!(loggers.level_of("tonsub_core"), Some(LevelFilter::max()));
    }
}
