use crate::{
    config::{GatewayConfig, ProviderConfig},
    error::{ProviderError, Result},
    providers::ProviderKind,
};
use chrono::{DateTime, Utc};
use colored::*;
use log::{Level, LevelFilter, Metadata, Record};
use once_cell::sync::{Lazy, OnceCell};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{Duration, Instant};

static CONSOLE_LOGGER: Lazy<ConsoleLogger> = Lazy::new(ConsoleLogger::new);
static INSTALLED: OnceCell<()> = OnceCell::new();

pub fn init() -> Result<()> {
    init_with_config(LoggerConfig::from_env())
}

/// Installs the logger on first call; later calls only swap the config.
pub fn init_with_config(config: LoggerConfig) -> Result<()> {
    let level = config.min_level;
    CONSOLE_LOGGER.update_config(config)?;

    if INSTALLED.get().is_none() {
        log::set_logger(&*CONSOLE_LOGGER)
            .map_err(|e| ProviderError::ConfigError(format!("Failed to set logger: {}", e)))?;
        let _ = INSTALLED.set(());
    }

    log::set_max_level(level.to_level_filter());
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn color(&self) -> Color {
        match self {
            LogLevel::Trace => Color::Cyan,
            LogLevel::Debug => Color::Blue,
            LogLevel::Info => Color::Green,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            LogLevel::Trace => "🔍",
            LogLevel::Debug => "🐛",
            LogLevel::Info => "💡",
            LogLevel::Warn => "⚠️",
            LogLevel::Error => "❌",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    pub fn to_level(&self) -> Level {
        match self {
            LogLevel::Trace => Level::Trace,
            LogLevel::Debug => Level::Debug,
            LogLevel::Info => Level::Info,
            LogLevel::Warn => Level::Warn,
            LogLevel::Error => Level::Error,
        }
    }

    pub fn to_level_filter(&self) -> LevelFilter {
        self.to_level().to_level_filter()
    }

    pub fn from_level(level: Level) -> Self {
        match level {
            Level::Trace => LogLevel::Trace,
            Level::Debug => LogLevel::Debug,
            Level::Info => LogLevel::Info,
            Level::Warn => LogLevel::Warn,
            Level::Error => LogLevel::Error,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub module: String,
    pub file: String,
    pub line: u32,
}

impl LogEntry {
    fn from_record(record: &Record) -> Self {
        Self {
            timestamp: Utc::now(),
            level: LogLevel::from_level(record.level()),
            message: record.args().to_string(),
            module: record.module_path().unwrap_or("unknown").to_string(),
            file: record.file().unwrap_or("unknown").to_string(),
            line: record.line().unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub show_colors: bool,
    pub show_emojis: bool,
    pub show_file_location: bool,
    pub show_module: bool,
    pub include_timestamp: bool,
    pub timestamp_format: String,
    pub output_json: bool,
    pub log_file_path: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: true,
            show_emojis: true,
            show_file_location: false,
            show_module: true,
            include_timestamp: true,
            timestamp_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            output_json: false,
            log_file_path: None,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// `LEARNGEN_LOG` picks the level, `LEARNGEN_LOG_JSON=true` switches to
    /// JSON lines and `LEARNGEN_LOG_FILE` adds a file sink.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(level) = std::env::var("LEARNGEN_LOG").ok().as_deref().and_then(LogLevel::parse) {
            config.min_level = level;
        }
        if std::env::var("LEARNGEN_LOG_JSON").map_or(false, |v| v == "true") {
            config = config.with_json_output(true);
        }
        if let Ok(path) = std::env::var("LEARNGEN_LOG_FILE") {
            config = config.with_file_output(&path);
        }
        config
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.show_colors = enabled;
        self
    }

    pub fn with_file_output(mut self, path: &str) -> Self {
        self.log_file_path = Some(path.to_string());
        self
    }

    pub fn with_json_output(mut self, enabled: bool) -> Self {
        self.output_json = enabled;
        if enabled {
            self.show_colors = false;
            self.show_emojis = false;
        }
        self
    }

    pub fn production() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: false,
            show_emojis: false,
            output_json: true,
            ..Default::default()
        }
    }

    pub fn development() -> Self {
        Self {
            min_level: LogLevel::Debug,
            show_file_location: true,
            ..Default::default()
        }
    }
}

/// Writes to stderr so that generated content on stdout stays clean.
pub struct ConsoleLogger {
    config: Mutex<LoggerConfig>,
    log_file: Mutex<Option<File>>,
}

impl ConsoleLogger {
    fn new() -> Self {
        Self {
            config: Mutex::new(LoggerConfig::default()),
            log_file: Mutex::new(None),
        }
    }

    fn update_config(&self, new_config: LoggerConfig) -> Result<()> {
        let file = match &new_config.log_file_path {
            Some(path) => Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| {
                        ProviderError::ConfigError(format!("Cannot open log file {}: {}", path, e))
                    })?,
            ),
            None => None,
        };

        if let Ok(mut log_file) = self.log_file.lock() {
            *log_file = file;
        }
        if let Ok(mut config) = self.config.lock() {
            *config = new_config;
        }
        Ok(())
    }

    fn format_line(entry: &LogEntry, config: &LoggerConfig) -> String {
        if config.output_json {
            return serde_json::to_string(entry).unwrap_or_default();
        }

        let mut parts = Vec::new();

        if config.include_timestamp {
            let timestamp = entry.timestamp.format(&config.timestamp_format).to_string();
            parts.push(if config.show_colors {
                timestamp.bright_black().to_string()
            } else {
                timestamp
            });
        }

        let level = if config.show_emojis {
            format!("[{} {}]", entry.level.emoji(), entry.level.as_str())
        } else {
            format!("[{}]", entry.level.as_str())
        };
        parts.push(if config.show_colors {
            level.color(entry.level.color()).bold().to_string()
        } else {
            level
        });

        let mut message = String::new();
        if config.show_module && !entry.module.is_empty() {
            if config.show_colors {
                message.push_str(&format!("{}: ", entry.module.bright_blue()));
            } else {
                message.push_str(&format!("{}: ", entry.module));
            }
        }
        message.push_str(&entry.message);
        parts.push(message);

        if config.show_file_location {
            let location = format!("({}:{})", entry.file, entry.line);
            parts.push(if config.show_colors {
                location.bright_black().to_string()
            } else {
                location
            });
        }

        parts.join(" ")
    }
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        match self.config.lock() {
            Ok(config) => metadata.level() <= config.min_level.to_level(),
            Err(_) => true,
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let Ok(config) = self.config.lock() else {
            return;
        };

        let entry = LogEntry::from_record(record);
        eprintln!("{}", Self::format_line(&entry, &config));

        if let Ok(mut log_file) = self.log_file.lock() {
            if let Some(file) = log_file.as_mut() {
                let plain = LoggerConfig {
                    show_colors: false,
                    ..config.clone()
                };
                let _ = writeln!(file, "{}", Self::format_line(&entry, &plain));
            }
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
        if let Ok(mut log_file) = self.log_file.lock() {
            if let Some(file) = log_file.as_mut() {
                let _ = file.flush();
            }
        }
    }
}

/// Logs how long an operation took when dropped.
pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn new(name: &str) -> Self {
        log::debug!("⏱️  Starting: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        log::info!(
            "⏱️  '{}' finished in {}ms",
            self.name,
            self.elapsed().as_millis()
        );
    }
}

pub fn timer(name: &str) -> Timer {
    Timer::new(name)
}

/// Summary of the active selection. Keys are reported as present or
/// missing, never printed.
pub fn log_gateway_info(gateway: &GatewayConfig, providers: &ProviderConfig) {
    log::info!("⚙️  Gateway configuration:");
    log::info!("   Provider: {}", gateway.provider_id);
    log::info!(
        "   Model: {}",
        gateway.model_id.as_deref().unwrap_or("(provider default)")
    );
    log::info!(
        "   API key: {}",
        if gateway.api_key().is_some() { "✅" } else { "❌" }
    );
    log::info!(
        "   Temperature: {} / max tokens: {}",
        gateway.options.temperature,
        gateway.options.max_tokens
    );
    for kind in ProviderKind::ALL {
        let base_url = providers.base_url(kind);
        if base_url != kind.default_base_url() {
            log::info!("   {} endpoint override: {}", kind.display_name(), base_url);
        }
    }
}
