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

//! Edit command - open the terminal editor

use codepad_common::{logging, Language};
use codepad_tui::TuiConfig;
use eyre::Result;
use std::path::PathBuf;

/// Start the terminal UI on `path`
pub async fn edit(
    cli: &crate::Cli,
    path: Option<PathBuf>,
    language: Option<Language>,
    mouse: bool,
) -> Result<()> {
    // Logs go to a file so they don't tear the screen
    let log_file_path = logging::init_file_only_logging("codepad")?;
    eprintln!("Codepad logs: {}", log_file_path.display());

    let config = super::load_config(cli)?;
    let tui_config = TuiConfig { path, language, enable_mouse: mouse, config, ..Default::default() };

    tracing::info!("Launching Terminal UI...");
    match codepad_tui::api::start_tui(tui_config).await {
        Ok(()) => {
            tracing::info!("TUI exited normally");
            Ok(())
        }
        Err(e) => {
            tracing::error!("TUI failed: {}", e);
            Err(e)
        }
    }
}
