//! Tracing subscriber setup shared by the hub binaries.
//!
//! Driven by environment variables:
//!
//! - `RUST_LOG`: full filter directives, takes precedence over `LOG_LEVEL`
//! - `LOG_LEVEL`: filter used when `RUST_LOG` is unset
//! - `LOG_FORMAT`: `human` (default) or `json`
//! - `LOG_OUTPUT`: `console` (default), `file` or `both`
//! - `LOG_FILE_PATH`: daily-rolled log file (default `/tmp/hub.log`)
//!
//! With neither `RUST_LOG` nor `LOG_LEVEL` set, the filter is `info` plus the
//! caller's default directives.

use std::{env, path::PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter, Layer, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Human,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Console,
    File,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub rust_log: Option<String>,
    pub level: Option<String>,
    pub format: LogFormat,
    pub output: LogOutput,
    pub file_path: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            rust_log: None,
            level: None,
            format: LogFormat::Human,
            output: LogOutput::Console,
            file_path: PathBuf::from("/tmp/hub.log"),
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Unknown values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Human,
        };
        let output = match lookup("LOG_OUTPUT").as_deref() {
            Some("file") => LogOutput::File,
            Some("both") => LogOutput::Both,
            _ => LogOutput::Console,
        };

        Self {
            rust_log: lookup("RUST_LOG").filter(|v| !v.trim().is_empty()),
            level: lookup("LOG_LEVEL").filter(|v| !v.trim().is_empty()),
            format,
            output,
            file_path: lookup("LOG_FILE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.file_path),
        }
    }
}

const DEFAULT_LEVEL: &str = "info";
const QUIET_DEPENDENCIES: [&str; 2] = ["sqlx=warn", "hyper=warn"];

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn fmt_layer<W>(writer: W, format: LogFormat) -> BoxedLayer
where
    W: for<'a> fmt::MakeWriter<'a> + Send + Sync + 'static,
{
    match format {
        LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
        LogFormat::Human => fmt::layer().with_writer(writer).boxed(),
    }
}

impl LogConfig {
    /// Filter for this configuration. `default_directives` (e.g.
    /// `"hub_api=debug"`) only apply when neither `RUST_LOG` nor `LOG_LEVEL`
    /// is set; an explicit level always has the last word.
    pub fn env_filter(&self, default_directives: &[&str]) -> EnvFilter {
        if let Some(explicit) = self.rust_log.as_deref().or(self.level.as_deref()) {
            return EnvFilter::new(explicit);
        }

        let mut filter = EnvFilter::new(DEFAULT_LEVEL);
        for directive in QUIET_DEPENDENCIES.iter().chain(default_directives) {
            if let Ok(directive) = directive.parse() {
                filter = filter.add_directive(directive);
            }
        }
        filter
    }
}

/// Install the global subscriber using [`LogConfig::env_filter`].
///
/// Keep the returned guard alive for the life of the process when logging to
/// a file, otherwise buffered lines are lost on exit.
pub fn init_subscriber(config: &LogConfig, default_directives: &[&str]) -> Option<WorkerGuard> {
    let filter = config.env_filter(default_directives);

    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guard = None;

    if matches!(config.output, LogOutput::Console | LogOutput::Both) {
        layers.push(fmt_layer(std::io::stdout, config.format));
    }
    if matches!(config.output, LogOutput::File | LogOutput::Both) {
        let dir = config
            .file_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/tmp"));
        let file_name = config
            .file_path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("hub.log"));

        let appender = tracing_appender::rolling::daily(dir, file_name);
        let (writer, file_guard) = tracing_appender::non_blocking(appender);
        guard = Some(file_guard);
        layers.push(fmt_layer(writer, config.format));
    }

    // Another subscriber may already be installed (tests, embedding).
    let _ = registry().with(layers).with(filter).try_init();

    guard
}
