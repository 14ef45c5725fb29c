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

//! Command modules for the Codepad CLI

pub mod ai;
pub mod debug;
pub mod edit;
pub mod tree;

pub use ai::{ask, fix, generate};
pub use debug::debug_file;
pub use edit::edit;
pub use tree::print_tree;

use codepad_engine::AiConfig;
use codepad_tui::Config;
use eyre::Result;

/// Load the configuration file and apply the AI flags on top of it
pub fn load_config(cli: &crate::Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    apply_ai_overrides(cli, &mut config.ai);
    Ok(config)
}

fn apply_ai_overrides(cli: &crate::Cli, ai: &mut AiConfig) {
    if let Some(provider) = cli.provider {
        if provider != ai.provider {
            // Endpoint and model from the file belong to the other provider
            *ai = AiConfig { timeout_secs: ai.timeout_secs, ..AiConfig::for_provider(provider) };
        }
    }
    if let Some(endpoint) = &cli.endpoint {
        ai.endpoint = Some(endpoint.clone());
    }
    if let Some(model) = &cli.model {
        ai.model = Some(model.clone());
    }
    tracing::debug!(provider = %ai.provider, endpoint = ai.endpoint(), "AI configuration resolved");
}
