//! Platform logging initialization for the deep_reader binary.
//!
//! Logs go to `./deep_reader.log` by default so they do not interleave with
//! the rendered screen. `DEEP_READER_LOG` picks the destination and
//! `DEEP_READER_LOG_LEVEL` the level.

use std::fs::File;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILE: &str = "./deep_reader.log";
const DESTINATION_ENV: &str = "DEEP_READER_LOG";
const LEVEL_ENV: &str = "DEEP_READER_LOG_LEVEL";

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to ./deep_reader.log in current directory.
    File,
    /// Write to terminal (stderr for warnings and errors).
    Terminal,
    /// Write to both file and terminal.
    Both,
}

impl LogDestination {
    pub fn from_env() -> Self {
        std::env::var(DESTINATION_ENV)
            .ok()
            .and_then(|raw| Self::parse(&raw))
            .unwrap_or(LogDestination::File)
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "file" => Some(LogDestination::File),
            "terminal" | "term" => Some(LogDestination::Terminal),
            "both" => Some(LogDestination::Both),
            _ => None,
        }
    }
}

/// Initialize the logger with the specified destination.
///
/// For `LogDestination::File` or `Both`, creates `./deep_reader.log` in the
/// current working directory.
pub fn initialize(destination: LogDestination) {
    let level = std::env::var(LEVEL_ENV)
        .ok()
        .and_then(|raw| reader_logging::parse_level(&raw))
        .unwrap_or(LevelFilter::Info);

    let config = build_config();

    let loggers: Vec<Box<dyn SharedLogger>> = match destination {
        LogDestination::File => {
            if let Some(file_logger) = create_file_logger(level, config) {
                vec![file_logger]
            } else {
                return;
            }
        }
        LogDestination::Terminal => {
            vec![TermLogger::new(
                level,
                config,
                TerminalMode::Stderr,
                ColorChoice::Auto,
            )]
        }
        LogDestination::Both => {
            let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
                level,
                config.clone(),
                TerminalMode::Stderr,
                ColorChoice::Auto,
            )];
            if let Some(file_logger) = create_file_logger(level, config) {
                loggers.push(file_logger);
            }
            loggers
        }
    };

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(level: LevelFilter, config: Config) -> Option<Box<WriteLogger<File>>> {
    let log_path = PathBuf::from(LOG_FILE);
    match File::create(&log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_names_parse() {
        assert_eq!(LogDestination::parse("Both"), Some(LogDestination::Both));
        assert_eq!(LogDestination::parse(" term "), Some(LogDestination::Terminal));
        assert_eq!(LogDestination::parse("syslog"), None);
    }
}
