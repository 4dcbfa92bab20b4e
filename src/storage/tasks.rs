use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{load_toml, save_toml};
use crate::error::{Result, SprigError};
use crate::model::{Project, Task, TaskList, Workspace, DEFAULT_PROJECT};

/// 数据文件 (用于 TOML 序列化)
///
/// 撤销历史只在内存中，不写入文件。
#[derive(Debug, Serialize, Deserialize)]
struct TodoFile {
    #[serde(default = "default_project_name")]
    current_project: String,
    #[serde(default)]
    projects: Vec<ProjectRecord>,
}

/// 单个项目的持久化数据
#[derive(Debug, Serialize, Deserialize)]
struct ProjectRecord {
    name: String,
    /// 下一个分配的 id，保证删除后 id 不复用
    #[serde(default = "default_next_id")]
    next_id: u64,
    #[serde(default)]
    tasks: Vec<Task>,
}

fn default_project_name() -> String {
    DEFAULT_PROJECT.to_string()
}

fn default_next_id() -> u64 {
    1
}

/// 加载 Workspace；文件不存在时返回只含 default 项目的新 Workspace
pub fn load_workspace(path: &Path, history_depth: Option<usize>) -> Result<Workspace> {
    if !path.exists() {
        debug!(path = %path.display(), "no data file, starting fresh");
        return Ok(Workspace::new(history_depth));
    }

    let file: TodoFile = load_toml(path)?;
    let mut names = HashSet::new();
    let mut projects = Vec::with_capacity(file.projects.len());
    for record in file.projects {
        if !names.insert(record.name.clone()) {
            return Err(SprigError::invalid_input(format!(
                "duplicate project '{}' in {}",
                record.name,
                path.display()
            )));
        }
        let tasks = TaskList::from_parts(record.tasks, record.next_id)?;
        projects.push(Project::with_tasks(record.name, tasks, history_depth));
    }

    debug!(path = %path.display(), projects = projects.len(), "data loaded");
    Ok(Workspace::from_projects(
        projects,
        &file.current_project,
        history_depth,
    ))
}

/// 保存 Workspace
pub fn save_workspace(path: &Path, workspace: &Workspace) -> Result<()> {
    let file = TodoFile {
        current_project: workspace.current_name().to_string(),
        projects: workspace
            .projects()
            .iter()
            .map(|p| ProjectRecord {
                name: p.name.clone(),
                next_id: p.tasks.next_id(),
                tasks: p.tasks.iter().cloned().collect(),
            })
            .collect(),
    };
    save_toml(path, &file)?;
    debug!(path = %path.display(), "data saved");
    Ok(())
}
