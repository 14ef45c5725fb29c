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

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::{fs, path::Path};
use tempfile::TempDir;
use tracing::info;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// A `codepad` command that never touches the user's config file
fn codepad(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("codepad").unwrap();
    cmd.env("CODEPAD_CONFIG", config_dir.join("codepad.toml"))
        .env_remove("CODEPAD_AI_PROVIDER")
        .env_remove("CODEPAD_AI_ENDPOINT")
        .env_remove("CODEPAD_AI_MODEL");
    cmd
}

#[test]
fn test_help_command() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Testing CLI help command");

    let dir = TempDir::new().unwrap();
    codepad(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("terminal code editor"));
}

#[test]
fn test_version_command() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let dir = TempDir::new().unwrap();
    codepad(dir.path()).arg("--version").assert().success().stdout(predicate::str::contains("codepad"));
}

#[test]
fn test_unknown_flag() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let dir = TempDir::new().unwrap();
    codepad(dir.path()).arg("--frobnicate").assert().failure().stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_debug_subcommand_help() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let dir = TempDir::new().unwrap();
    codepad(dir.path())
        .args(["debug", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("simulated debug session"));
}

#[test]
fn test_debug_runs_to_completion() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let dir = TempDir::new().unwrap();
    let file = dir.path().join("app.js");
    fs::write(&file, "let a = 1;\nlet b = a + 1;\nconsole.log(b);\n").unwrap();

    codepad(dir.path())
        .arg("debug")
        .arg(&file)
        .args(["-b", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Debugging started...\nExecuting line 3\nExecuting line 4\nDebugging finished"))
        .stdout(predicate::str::contains("   2  b     a + 1"));
}

#[test]
fn test_debug_step_limit_pauses() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let dir = TempDir::new().unwrap();
    let file = dir.path().join("calc.py");
    fs::write(&file, "x = 1\ny = 2\nz = 3").unwrap();

    codepad(dir.path())
        .arg("debug")
        .arg(&file)
        .args(["--steps", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Paused at line 2"))
        .stdout(predicate::str::contains("Debugging finished").not());
}

#[test]
fn test_debug_refuses_syntax_errors() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let dir = TempDir::new().unwrap();
    let file = dir.path().join("broken.js");
    fs::write(&file, "let a = (1;\n").unwrap();

    codepad(dir.path())
        .arg("debug")
        .arg(&file)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Cannot start debugging with syntax errors"))
        .stderr(predicate::str::contains("Unclosed '('"));
}

#[test]
fn test_invalid_language() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let dir = TempDir::new().unwrap();
    let file = dir.path().join("a.txt");
    fs::write(&file, "x").unwrap();
    codepad(dir.path()).arg("debug").arg(&file).args(["--lang", "cobol"]).assert().failure();
}

#[test]
fn test_tree_lists_ids() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let dir = TempDir::new().unwrap();
    let project = dir.path().join("proj");
    fs::create_dir_all(project.join("lib")).unwrap();
    fs::write(project.join("lib").join("util.go"), "package lib\n").unwrap();

    codepad(dir.path())
        .arg("tree")
        .arg(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("proj/  [root]"))
        .stdout(predicate::str::contains("    util.go  [root/lib/util-go]"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_generate_writes_extracted_code() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Here you go:\n```python\nprint('hi')\n```\nEnjoy."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("hi.py");
    codepad(dir.path())
        .args(["generate", "say hi", "--lang", "python", "--provider", "ollama"])
        .args(["--endpoint", &server.uri(), "-o"])
        .arg(&output)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&output).unwrap(), "print('hi')\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fix_uses_first_marker() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "response": "let a = (1);\n" })),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let file = dir.path().join("broken.js");
    fs::write(&file, "let a = (1;\n").unwrap();

    codepad(dir.path())
        .arg("fix")
        .arg(&file)
        .args(["--endpoint", &server.uri(), "--write"])
        .assert()
        .success();
    assert_eq!(fs::read_to_string(&file).unwrap(), "let a = (1);\n");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body["prompt"].as_str().unwrap().contains("Unclosed '('"));
}

#[test]
fn test_ask_reports_unreachable_endpoint() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let dir = TempDir::new().unwrap();
    codepad(dir.path())
        .args(["ask", "what is rust?", "--endpoint", "http://127.0.0.1:9"])
        .assert()
        .failure();
}
