//! Workspace 状态管理
//! 管理项目列表和当前项目，每个项目拥有自己的任务链表和撤销栈

use tracing::debug;

use crate::error::{Result, SprigError};

use super::history::ActionHistory;
use super::task_list::TaskList;

/// 默认项目名称（始终存在，不可删除）
pub const DEFAULT_PROJECT: &str = "default";

/// 项目
#[derive(Debug, Clone)]
pub struct Project {
    pub name: String,
    pub tasks: TaskList,
    pub history: ActionHistory,
}

impl Project {
    pub fn new(name: impl Into<String>, history_depth: Option<usize>) -> Self {
        Self::with_tasks(name, TaskList::new(), history_depth)
    }

    pub fn with_tasks(
        name: impl Into<String>,
        tasks: TaskList,
        history_depth: Option<usize>,
    ) -> Self {
        Self {
            name: name.into(),
            tasks,
            history: ActionHistory::with_max_depth(history_depth),
        }
    }
}

/// 项目摘要（用于列表显示）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub name: String,
    pub task_count: usize,
    pub is_current: bool,
}

/// Workspace 状态
#[derive(Debug, Clone)]
pub struct Workspace {
    /// 按创建顺序排列
    projects: Vec<Project>,
    /// 当前项目名称
    current: String,
    /// 新项目撤销栈的最大深度
    history_depth: Option<usize>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Workspace {
    /// 创建只包含 default 项目的 Workspace
    pub fn new(history_depth: Option<usize>) -> Self {
        Self {
            projects: vec![Project::new(DEFAULT_PROJECT, history_depth)],
            current: DEFAULT_PROJECT.to_string(),
            history_depth,
        }
    }

    /// 从已有项目重建；缺失 default 时补上，current 不存在时回落到 default
    pub fn from_projects(
        mut projects: Vec<Project>,
        current: &str,
        history_depth: Option<usize>,
    ) -> Self {
        if !projects.iter().any(|p| p.name == DEFAULT_PROJECT) {
            projects.insert(0, Project::new(DEFAULT_PROJECT, history_depth));
        }
        let current = if projects.iter().any(|p| p.name == current) {
            current.to_string()
        } else {
            DEFAULT_PROJECT.to_string()
        };
        Self {
            projects,
            current,
            history_depth,
        }
    }

    pub fn current_name(&self) -> &str {
        &self.current
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    /// 当前项目
    pub fn current(&self) -> &Project {
        let index = self.current_index();
        &self.projects[index]
    }

    /// 当前项目（可变）
    pub fn current_mut(&mut self) -> &mut Project {
        let index = self.current_index();
        &mut self.projects[index]
    }

    // current 只会被设置为已存在的项目名
    fn current_index(&self) -> usize {
        self.projects
            .iter()
            .position(|p| p.name == self.current)
            .unwrap_or(0)
    }

    /// 创建新项目
    pub fn create(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SprigError::invalid_input("Project name cannot be empty"));
        }
        if self.get(name).is_some() {
            return Err(SprigError::ProjectExists(name.to_string()));
        }
        self.projects.push(Project::new(name, self.history_depth));
        debug!(project = name, "project created");
        Ok(())
    }

    /// 切换当前项目
    pub fn switch(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if self.get(name).is_none() {
            return Err(SprigError::ProjectNotFound(name.to_string()));
        }
        self.current = name.to_string();
        debug!(project = name, "switched project");
        Ok(())
    }

    /// 删除项目；删除当前项目时切回 default
    pub fn remove(&mut self, name: &str) -> Result<Project> {
        let name = name.trim();
        if name == DEFAULT_PROJECT {
            return Err(SprigError::ProtectedProject(name.to_string()));
        }
        let index = self
            .projects
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| SprigError::ProjectNotFound(name.to_string()))?;
        if self.current == name {
            self.current = DEFAULT_PROJECT.to_string();
        }
        debug!(project = name, "project deleted");
        Ok(self.projects.remove(index))
    }

    /// 项目列表摘要
    pub fn summaries(&self) -> Vec<ProjectSummary> {
        self.projects
            .iter()
            .map(|p| ProjectSummary {
                name: p.name.clone(),
                task_count: p.tasks.len(),
                is_current: p.name == self.current,
            })
            .collect()
    }
}
