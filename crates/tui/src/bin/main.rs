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

//! Codepad TUI - Terminal User Interface for Codepad
//!
//! This binary opens a file or directory in the terminal editor.

use clap::Parser;
use codepad_common::{logging, Language};
use codepad_tui::{Config, TuiConfig};
use eyre::Result;
use std::path::PathBuf;

/// Codepad Terminal User Interface
#[derive(Debug, Parser)]
#[command(name = "codepad-tui")]
#[command(about = "Terminal code editor with a simulated debugger and AI assistant", version)]
struct Args {
    /// File or directory to open
    path: Option<PathBuf>,

    /// Language of the initial buffer (detected from the file name otherwise)
    #[arg(long = "lang")]
    language: Option<Language>,

    /// Config file path (uses ~/.codepad.toml if not specified)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable mouse support
    #[arg(long)]
    mouse: bool,

    /// Terminal refresh interval in milliseconds
    #[arg(long, default_value = "50")]
    refresh_interval: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    // Setup file-only logging for TUI (logs go to file, not terminal)
    let log_file_path = logging::init_file_only_logging("codepad-tui")?;

    // Use stderr so it doesn't interfere with TUI if there are issues
    eprintln!("Codepad TUI logs: {}", log_file_path.display());

    let config = match args.config {
        Some(config_path) => Config::load_from_path(config_path)?,
        None => Config::load().unwrap_or_default(),
    };

    let tui_config = TuiConfig {
        path: args.path,
        language: args.language,
        refresh_interval: std::time::Duration::from_millis(args.refresh_interval),
        enable_mouse: args.mouse,
        config,
    };

    tracing::info!("Starting Codepad TUI");

    match codepad_tui::api::start_tui(tui_config).await {
        Ok(_) => {
            tracing::info!("TUI exited normally");
            Ok(())
        }
        Err(e) => {
            tracing::error!("TUI error: {}", e);
            Err(e)
        }
    }
}
