//! ActionHistory: 记录 TaskList 变更的 LIFO 栈，支持单步撤销
//!
//! 撤销本身不入栈（没有 redo）。历史只存在于进程内存中。

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use crate::error::{Result, SprigError};

use super::task::{SortKey, Task, TaskId};
use super::task_list::TaskList;

/// 一次可撤销的变更
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRecord {
    /// 添加了任务，撤销时按 id 删除
    Add { task: Task },
    /// 删除了任务，撤销时在原位置重新插入
    Delete { task: Task, position: usize },
    /// 标记完成，撤销时恢复之前的 completed
    Complete { id: TaskId, previous: bool },
    /// 排序，撤销时恢复原顺序
    Sort {
        key: SortKey,
        previous_order: Vec<TaskId>,
    },
}

impl ActionRecord {
    /// 操作类型标签
    pub fn kind(&self) -> &'static str {
        match self {
            ActionRecord::Add { .. } => "ADD",
            ActionRecord::Delete { .. } => "DELETE",
            ActionRecord::Complete { .. } => "DONE",
            ActionRecord::Sort { .. } => "SORT",
        }
    }

    /// 简短描述（用于 "Undid: ..." 和历史列表）
    pub fn summary(&self) -> String {
        match self {
            ActionRecord::Add { task } | ActionRecord::Delete { task, .. } => {
                format!("#{} {}", task.id, task.description)
            }
            ActionRecord::Complete { id, .. } => format!("#{}", id),
            ActionRecord::Sort { key, .. } => format!("by {}", key.label()),
        }
    }

    /// 在 TaskList 上应用逆操作
    fn revert(&self, tasks: &mut TaskList) -> Result<()> {
        match self {
            ActionRecord::Add { task } => {
                tasks.delete(task.id)?;
            }
            ActionRecord::Delete { task, position } => {
                tasks.insert_at(*position, task.clone())?;
            }
            ActionRecord::Complete { id, previous } => {
                tasks.set_completed(*id, *previous)?;
            }
            ActionRecord::Sort { previous_order, .. } => {
                tasks.reorder(previous_order)?;
            }
        }
        Ok(())
    }
}

/// 历史条目
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub action: ActionRecord,
    pub recorded_at: DateTime<Local>,
}

/// 撤销栈
#[derive(Debug, Clone, Default)]
pub struct ActionHistory {
    entries: Vec<HistoryEntry>,
    /// 最大深度，None 表示不限
    max_depth: Option<usize>,
}

impl ActionHistory {
    pub fn with_max_depth(max_depth: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            max_depth,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 入栈；超过 max_depth 时丢弃最旧的一条
    pub fn record(&mut self, action: ActionRecord) {
        debug!(kind = action.kind(), summary = %action.summary(), "record action");
        self.entries.push(HistoryEntry {
            action,
            recorded_at: Local::now(),
        });
        if let Some(max) = self.max_depth {
            if self.entries.len() > max {
                let overflow = self.entries.len() - max;
                self.entries.drain(..overflow);
            }
        }
    }

    /// 弹出最近一条记录并在 TaskList 上撤销它
    ///
    /// 历史为空时返回 `EmptyHistory`，TaskList 不变。
    pub fn undo(&mut self, tasks: &mut TaskList) -> Result<ActionRecord> {
        let entry = self.entries.pop().ok_or(SprigError::EmptyHistory)?;
        if let Err(e) = entry.action.revert(tasks) {
            warn!(kind = entry.action.kind(), error = %e, "dropping unrevertable action");
            return Err(e);
        }
        debug!(kind = entry.action.kind(), summary = %entry.action.summary(), "undo");
        Ok(entry.action)
    }

    /// 最近的在前
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }
}
