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

//! AI commands - generate, fix and ask without the terminal UI

use codepad_common::{Language, SourceBuffer, ValidationMarker};
use codepad_engine::{extract_code_block, AiClient, DelimiterValidator};
use eyre::{Result, WrapErr};
use std::{fs, path::Path};

fn client(cli: &crate::Cli) -> Result<AiClient> {
    let config = super::load_config(cli)?;
    AiClient::new(config.ai).wrap_err("Failed to create AI client")
}

fn read_source(file: &Path) -> Result<(String, Language)> {
    let text = fs::read_to_string(file)
        .wrap_err_with(|| format!("Failed to read {}", file.display()))?;
    let name = file.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    Ok((text, Language::from_file_name(&name)))
}

fn print_code(code: &str) {
    print!("{code}");
    if !code.ends_with('\n') {
        println!();
    }
}

/// Generate code for `prompt`, printing it or writing it to `output`
pub async fn generate(
    cli: &crate::Cli,
    prompt: &str,
    language: Language,
    output: Option<&Path>,
) -> Result<()> {
    let reply = client(cli)?.request_generate(prompt, language).await?;
    let code = extract_code_block(&reply);

    match output {
        Some(path) => {
            fs::write(path, code).wrap_err_with(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "Wrote generated code");
            println!("Wrote {}", path.display());
        }
        None => print_code(code),
    }
    Ok(())
}

/// Ask for a fix of `issue` (line, column, message), or of the first issue
/// the validator finds
pub async fn fix(
    cli: &crate::Cli,
    file: &Path,
    issue: Option<(usize, usize, String)>,
    write: bool,
) -> Result<()> {
    let (text, language) = read_source(file)?;

    let marker = match issue {
        Some((line, column, message)) => ValidationMarker::new(line, column, message),
        None => {
            let markers =
                DelimiterValidator::new().validate(&SourceBuffer::from_text(&text), language);
            match markers.into_iter().next() {
                Some(marker) => marker,
                None => {
                    println!("No issues found in {}", file.display());
                    return Ok(());
                }
            }
        }
    };
    tracing::info!(line = marker.start_line, message = %marker.message, "Requesting fix");

    let reply = client(cli)?.request_fix(&marker, &text, language).await?;
    let code = extract_code_block(&reply);

    if write {
        fs::write(file, code).wrap_err_with(|| format!("Failed to write {}", file.display()))?;
        println!("Fixed {}", file.display());
    } else {
        print_code(code);
    }
    Ok(())
}

/// Ask `question`, sending the content of `file` along when given
pub async fn ask(cli: &crate::Cli, question: &str, file: Option<&Path>) -> Result<()> {
    let (code, language) = match file {
        Some(file) => read_source(file)?,
        None => (String::new(), Language::PlainText),
    };

    let reply = client(cli)?.ask(question, &code, language).await?;
    print_code(&reply);
    Ok(())
}
