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

//! Codepad - Terminal Code Editor
//!
//! Opens the terminal editor, or runs the simulated debugger and the AI
//! assistant headlessly.

use clap::{Parser, Subcommand};
use codepad_common::{logging, Language};
use codepad_engine::AiProvider;
use eyre::Result;
use std::path::PathBuf;
use tracing::Level;

mod cmd;

/// Command-line interface for Codepad
#[derive(Debug, Parser)]
#[command(name = "codepad")]
#[command(about = "Codepad - A terminal code editor with an AI assistant and a step-through simulator")]
#[command(version)]
pub struct Cli {
    /// File or directory to open in the editor (same as `codepad edit PATH`);
    /// without a path or a command an empty buffer is opened
    pub path: Option<PathBuf>,

    /// Config file path (uses ~/.codepad.toml if not specified)
    #[arg(long, global = true, env = "CODEPAD_CONFIG")]
    pub config: Option<PathBuf>,

    /// AI provider (ollama or gemini)
    #[arg(long, global = true, env = "CODEPAD_AI_PROVIDER")]
    pub provider: Option<AiProvider>,

    /// AI endpoint base URL
    #[arg(long, global = true, env = "CODEPAD_AI_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Model name sent to the AI endpoint
    #[arg(long, global = true, env = "CODEPAD_AI_MODEL")]
    pub model: Option<String>,

    /// Log at debug level on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Open a project directory or a single file in the terminal editor
    Edit {
        /// File or directory to open (empty scratch buffer if omitted)
        path: Option<PathBuf>,

        /// Language of the initial buffer
        #[arg(long = "lang")]
        language: Option<Language>,

        /// Enable mouse support
        #[arg(long)]
        mouse: bool,
    },
    /// Run a simulated debug session over a file and print the result
    Debug {
        /// Source file to run
        file: PathBuf,

        /// Language (detected from the file name if omitted)
        #[arg(long = "lang")]
        language: Option<Language>,

        /// Breakpoint line, may be repeated
        #[arg(short = 'b', long = "breakpoint")]
        breakpoints: Vec<usize>,

        /// Stop after this many steps instead of running to the end
        #[arg(long)]
        steps: Option<usize>,
    },
    /// Generate code from a description
    Generate {
        /// What the code should do
        prompt: String,

        /// Language to generate
        #[arg(long = "lang")]
        language: Language,

        /// Write the code to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Ask the AI to fix an issue in a file
    Fix {
        /// File to fix
        file: PathBuf,

        /// Line of the issue (first validator issue if omitted)
        #[arg(long, requires = "message")]
        line: Option<usize>,

        /// Column of the issue
        #[arg(long, default_value = "1")]
        column: usize,

        /// Description of the issue
        #[arg(long, requires = "line")]
        message: Option<String>,

        /// Overwrite the file with the fixed code
        #[arg(long)]
        write: bool,
    },
    /// Ask the AI a question, optionally about a file
    Ask {
        /// The question
        question: String,

        /// File whose content is sent along with the question
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Print the file tree of a directory with node ids
    Tree {
        /// Project root
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Parse CLI arguments
    let mut cli = Cli::parse();

    // A bare path opens the editor
    let command = cli.command.take().unwrap_or_else(|| Commands::Edit {
        path: cli.path.take(),
        language: None,
        mouse: false,
    });

    // The editor owns the terminal, so it logs to a file instead
    if !matches!(command, Commands::Edit { .. }) {
        logging::init_simple_logging(if cli.verbose { Level::DEBUG } else { Level::WARN })?;
    }

    match command {
        Commands::Edit { path, language, mouse } => cmd::edit(&cli, path, language, mouse).await,
        Commands::Debug { file, language, breakpoints, steps } => {
            cmd::debug_file(&file, language, &breakpoints, steps)
        }
        Commands::Generate { prompt, language, output } => {
            cmd::generate(&cli, &prompt, language, output.as_deref()).await
        }
        Commands::Fix { file, line, column, message, write } => {
            let issue = line.zip(message).map(|(line, message)| (line, column, message));
            cmd::fix(&cli, &file, issue, write).await
        }
        Commands::Ask { question, file } => cmd::ask(&cli, &question, file.as_deref()).await,
        Commands::Tree { dir } => cmd::print_tree(&dir),
    }
}
