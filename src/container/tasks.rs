//! Adding a "Publish container" task to `.vscode/tasks.json`

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::info;

use super::commands::DotnetCommand;

pub const TASK_LABEL: &str = "Publish container";

/// Merge the publish task into the tasks file at `path`.
///
/// The file may contain comments and trailing commas, as VS Code writes it;
/// both are gone after the rewrite. A missing file is created. A task with
/// the same label is replaced, other tasks are kept as they are.
pub fn add_publish_task(path: &Path, publish: &DotnetCommand) -> Result<()> {
    let mut document = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        json5::from_str::<Value>(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?
    } else {
        json!({ "version": "2.0.0", "tasks": [] })
    };

    let Some(root) = document.as_object_mut() else {
        bail!("{} does not contain a JSON object", path.display());
    };
    root.entry("version").or_insert_with(|| json!("2.0.0"));
    let tasks = root.entry("tasks").or_insert_with(|| json!([]));
    let Some(tasks) = tasks.as_array_mut() else {
        bail!("\"tasks\" in {} is not an array", path.display());
    };

    tasks.retain(|task| task.get("label").and_then(Value::as_str) != Some(TASK_LABEL));
    tasks.push(publish_task(publish));

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create tasks directory")?;
    }
    let content = serde_json::to_string_pretty(&document).context("Failed to serialize tasks")?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), "Added publish task");
    Ok(())
}

/// `project` as a task in the workspace owning `tasks_path` should name it.
///
/// Inside that workspace the path becomes `${workspaceFolder}/...`, so the
/// shared tasks file works on every checkout. Both paths should be absolute.
pub fn workspace_project_path(project: &Path, tasks_path: &Path) -> PathBuf {
    let vscode_dir = tasks_path
        .parent()
        .filter(|dir| dir.file_name().is_some_and(|name| name == ".vscode"));
    let relative = vscode_dir
        .and_then(Path::parent)
        .and_then(|workspace| project.strip_prefix(workspace).ok());
    match relative {
        Some(relative) => Path::new("${workspaceFolder}").join(relative),
        None => project.to_path_buf(),
    }
}

fn publish_task(publish: &DotnetCommand) -> Value {
    json!({
        "label": TASK_LABEL,
        "type": "shell",
        "command": publish.program,
        "args": publish.args,
        "problemMatcher": "$msCompile",
    })
}
