use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SprigError;

/// 任务 ID（单调递增，删除后不复用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = SprigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .trim_start_matches('#')
            .parse::<u64>()
            .map(TaskId)
            .map_err(|_| SprigError::invalid_input("Please enter a valid number"))
    }
}

/// 任务优先级
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// 排序权重，越大越靠前
    pub fn weight(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    /// 返回优先级对应的图标
    pub fn icon(&self) -> &'static str {
        match self {
            Priority::High => "🔴",
            Priority::Medium => "🟡",
            Priority::Low => "🟢",
        }
    }

    /// 返回优先级文字标签
    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// 菜单输入 "1"/"2"/"3"，其它输入回落到 Medium
    pub fn from_menu_choice(choice: &str) -> Self {
        match choice.trim() {
            "1" => Priority::High,
            "3" => Priority::Low,
            _ => Priority::Medium,
        }
    }
}

impl FromStr for Priority {
    type Err = SprigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "h" => Ok(Priority::High),
            "medium" | "m" => Ok(Priority::Medium),
            "low" | "l" => Ok(Priority::Low),
            other => Err(SprigError::invalid_input(format!(
                "unknown priority '{}'",
                other
            ))),
        }
    }
}

/// 任务数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Task {
    /// 返回完成状态图标
    pub fn status_icon(&self) -> &'static str {
        if self.completed {
            "✓"
        } else {
            "○"
        }
    }

    /// 未完成且截止日期早于 today
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }
}

/// 新任务的输入（id 由 TaskList 分配）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub tags: Vec<String>,
}

impl TaskDraft {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn due(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = due_date;
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub(crate) fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            description: self.description,
            completed: false,
            priority: self.priority,
            due_date: self.due_date,
            tags: self.tags,
        }
    }
}

/// 解析截止日期 (YYYY-MM-DD)，空输入表示无截止日期
pub fn parse_due_date(input: &str) -> Result<Option<NaiveDate>, SprigError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| SprigError::invalid_input(format!("'{}' is not a YYYY-MM-DD date", trimmed)))
}

/// 解析逗号分隔的标签
/// "work, urgent,," → ["work", "urgent"]
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// 查看任务时的过滤条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    Done,
    HighPriority,
    /// 描述的大小写不敏感子串匹配
    Search(String),
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Pending => !task.completed,
            TaskFilter::Done => task.completed,
            TaskFilter::HighPriority => task.priority == Priority::High,
            TaskFilter::Search(term) => task
                .description
                .to_lowercase()
                .contains(&term.to_lowercase()),
        }
    }
}

impl FromStr for TaskFilter {
    type Err = SprigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(TaskFilter::All),
            "pending" => Ok(TaskFilter::Pending),
            "done" => Ok(TaskFilter::Done),
            "high" => Ok(TaskFilter::HighPriority),
            other => Err(SprigError::invalid_input(format!(
                "unknown filter '{}'",
                other
            ))),
        }
    }
}

/// 排序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// High → Low
    Priority,
    /// 升序，无截止日期的排在最后
    DueDate,
    /// 大小写不敏感升序
    Description,
}

impl SortKey {
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Priority => "priority",
            SortKey::DueDate => "due_date",
            SortKey::Description => "description",
        }
    }

    pub fn from_menu_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(SortKey::Priority),
            "2" => Some(SortKey::DueDate),
            "3" => Some(SortKey::Description),
            _ => None,
        }
    }
}
