// Codepad - Terminal Code Editor
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Logging configuration for Codepad components
//!
//! Provides centralized logging setup with:
//! - Colorful console output for the command line tools
//! - File-only output for the terminal UI, which owns the screen
//! - Environment variable support (RUST_LOG)
//! - A once-only initializer for tests

use eyre::Result;
use std::{env, fs, path::PathBuf, sync::Once};
use tracing::Level;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, time::LocalTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Name of the directory (under the system temp dir) holding all log files.
pub const LOG_ROOT_DIR: &str = "codepad-logs";

/// Initialize console logging, optionally mirrored to a daily rolling file.
///
/// # Arguments
/// * `component_name` - Name of the component (e.g., "codepad")
/// * `enable_file_logging` - Whether to also write logs under the temp dir
///
/// # Examples
/// ```rust,no_run
/// use codepad_common::logging;
///
/// fn main() -> eyre::Result<()> {
///     logging::init_logging("codepad", false)?;
///     tracing::info!("Application started");
///     Ok(())
/// }
/// ```
pub fn init_logging(component_name: &str, enable_file_logging: bool) -> Result<()> {
    let env_filter = default_env_filter("info")?;

    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_timer(LocalTime::rfc_3339())
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .pretty();

    if enable_file_logging {
        let log_dir = create_log_directory(component_name)?;

        let file_appender = rolling::daily(&log_dir, format!("{component_name}.log"));
        let (non_blocking_appender, guard) = non_blocking(file_appender);

        // The guard must outlive the process, otherwise buffered lines are lost
        std::mem::forget(guard);

        let file_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(LocalTime::rfc_3339())
            .with_ansi(false)
            .with_writer(non_blocking_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer.with_filter(filter_for_console()?))
            .with(file_layer.with_filter(filter_for_file()))
            .try_init()
            .map_err(|e| eyre::eyre!("Failed to initialize tracing subscriber: {e}"))?;

        tracing::info!(
            component = component_name,
            log_dir = %log_dir.display(),
            "Logging initialized with console and file output"
        );
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer.with_filter(filter_for_console()?))
            .try_init()
            .map_err(|e| eyre::eyre!("Failed to initialize tracing subscriber: {e}"))?;

        tracing::debug!(component = component_name, "Logging initialized with console output only");
    }

    log_environment_info(component_name);

    Ok(())
}

/// Initialize logging that never touches the terminal.
///
/// The TUI owns stdout/stderr while it runs, so every record goes to a daily
/// rolling file instead. Returns the path of today's log file so the caller
/// can tell the user where to look.
pub fn init_file_only_logging(component_name: &str) -> Result<PathBuf> {
    let env_filter = default_env_filter("debug")?;
    let log_dir = create_log_directory(component_name)?;
    let file_name = format!("{component_name}.log");

    let file_appender = rolling::daily(&log_dir, &file_name);
    let (non_blocking_appender, guard) = non_blocking(file_appender);
    std::mem::forget(guard);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(LocalTime::rfc_3339())
        .with_ansi(false)
        .with_writer(non_blocking_appender);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to initialize file logging: {e}"))?;

    log_environment_info(component_name);

    // rolling::daily appends the date as a suffix
    let today = chrono::Local::now().format("%Y-%m-%d");
    Ok(log_dir.join(format!("{file_name}.{today}")))
}

fn default_env_filter(default_level: &str) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| eyre::eyre!("Failed to create environment filter: {e}"))
}

/// Create log directory in system temp folder
fn create_log_directory(component_name: &str) -> Result<PathBuf> {
    let log_dir = env::temp_dir().join(LOG_ROOT_DIR).join(component_name);
    fs::create_dir_all(&log_dir)?;
    Ok(log_dir)
}

/// Console output hides HTTP client chatter
fn filter_for_console() -> Result<EnvFilter> {
    Ok(EnvFilter::from_default_env()
        .add_directive("hyper=warn".parse()?)
        .add_directive("hyper_util=warn".parse()?)
        .add_directive("reqwest=warn".parse()?))
}

/// File output keeps everything RUST_LOG allows
fn filter_for_file() -> EnvFilter {
    EnvFilter::from_default_env()
}

fn log_environment_info(component_name: &str) {
    let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let args: Vec<String> = env::args().collect();

    tracing::debug!(
        component = component_name,
        rust_log = %rust_log,
        args = ?args,
        "Environment information"
    );

    if let Ok(current_dir) = env::current_dir() {
        tracing::debug!(working_directory = %current_dir.display(), "Working directory");
    }
}

/// Initialize simple logging (console only, compact format)
///
/// # Arguments
/// * `level` - The default log level to use when RUST_LOG is unset
pub fn init_simple_logging(level: Level) -> Result<()> {
    let env_filter = default_env_filter(level.as_str())?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to initialize simple logging: {e}"))?;

    Ok(())
}

static TEST_LOGGING_INIT: Once = Once::new();

/// Safe logging initialization for tests - can be called multiple times.
///
/// Console only, INFO by default, RUST_LOG wins when set.
///
/// # Usage
/// ```rust
/// use codepad_common::logging;
/// use tracing::info;
///
/// logging::ensure_test_logging(None);
/// info!("This will work safely in any test!");
/// ```
pub fn ensure_test_logging(default_level: Option<Level>) {
    TEST_LOGGING_INIT.call_once(|| {
        // A subscriber may already be installed by the harness, which is fine
        let _ = init_simple_logging(default_level.unwrap_or(Level::INFO));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{debug, error, info, warn};

    #[test]
    fn test_logging_functions_work() {
        ensure_test_logging(None);

        info!("Test info message");
        warn!("Test warning message");
        debug!("Test debug message");
        error!("Test error message");
    }

    #[test]
    fn test_log_directory_creation() {
        let log_dir = create_log_directory("test-component").unwrap();
        assert!(log_dir.exists());
        assert!(log_dir.to_string_lossy().contains(LOG_ROOT_DIR));
        assert!(log_dir.to_string_lossy().contains("test-component"));
    }

    #[test]
    fn test_environment_filters() {
        let console_filter = filter_for_console().unwrap().to_string();
        assert!(console_filter.contains("reqwest=warn"));

        // Building the file filter must not panic whatever RUST_LOG holds
        let _ = filter_for_file();
    }

    #[test]
    fn test_repeated_initialization_does_not_panic() {
        ensure_test_logging(None);

        // A global subscriber is already set, so both attempts report an error
        let first = init_logging("test-repeat-1", false);
        let second = init_logging("test-repeat-2", false);
        assert!(first.is_err() || second.is_err());

        info!("Logging still works after repeated init attempts");
    }
}
