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

//! Tree command - print a project's file forest

use codepad_common::FileNode;
use codepad_engine::Project;
use eyre::{Result, WrapErr};
use std::path::Path;

/// Print every node under `dir`, depth first, with its id
pub fn print_tree(dir: &Path) -> Result<()> {
    let project =
        Project::open(dir).wrap_err_with(|| format!("Failed to open {}", dir.display()))?;
    print!("{}", render_tree(&project));
    Ok(())
}

fn render_tree(project: &Project) -> String {
    let mut out = String::new();
    render_node(project, project.root(), 0, &mut out);
    out
}

fn render_node(project: &Project, node: &FileNode, depth: usize, out: &mut String) {
    let suffix = if node.is_folder() { "/" } else { "" };
    out.push_str(&format!("{}{}{suffix}  [{}]\n", "  ".repeat(depth), node.name, node.id));
    for child in project.children(&node.id) {
        render_node(project, child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_render_tree() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src").join("main.rs"), "fn main() {}\n").unwrap();
        fs::write(dir.path().join("README.md"), "# hi\n").unwrap();

        let project = Project::open(dir.path()).unwrap();
        let rendered = render_tree(&project);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with("/  [root]"));
        assert_eq!(lines[1], "  README.md  [root/README-md]");
        assert_eq!(lines[2], "  src/  [root/src]");
        assert_eq!(lines[3], "    main.rs  [root/src/main-rs]");
    }
}
