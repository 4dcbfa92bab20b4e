//! 任务统计与看板分组

use chrono::NaiveDate;

use crate::model::{Priority, Task, TaskId, TaskList};

/// 任务统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// 逾期任务（未完成且截止日期早于 today），按链表顺序
    pub overdue: Vec<TaskId>,
}

impl Stats {
    pub fn collect(tasks: &TaskList, today: NaiveDate) -> Self {
        let total = tasks.len();
        let completed = tasks.completed_count();
        let overdue = tasks
            .iter()
            .filter(|t| t.is_overdue(today))
            .map(|t| t.id)
            .collect();
        Self {
            total,
            completed,
            pending: total - completed,
            overdue,
        }
    }

    /// 完成率（百分比），没有任务时为 None
    pub fn completion_rate(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.completed as f64 / self.total as f64 * 100.0)
        }
    }
}

/// 看板三列，每列保持链表顺序
#[derive(Debug, Default)]
pub struct Kanban<'a> {
    pub todo: Vec<&'a Task>,
    pub in_progress: Vec<&'a Task>,
    pub done: Vec<&'a Task>,
}

impl<'a> Kanban<'a> {
    /// 已完成 → DONE；未完成高优先级 → IN PROGRESS；其余 → TODO
    pub fn build(tasks: &'a TaskList) -> Self {
        let mut board = Self::default();
        for task in tasks {
            if task.completed {
                board.done.push(task);
            } else if task.priority == Priority::High {
                board.in_progress.push(task);
            } else {
                board.todo.push(task);
            }
        }
        board
    }

    pub fn is_empty(&self) -> bool {
        self.todo.is_empty() && self.in_progress.is_empty() && self.done.is_empty()
    }

    /// (列名, 任务) 按显示顺序
    pub fn columns(&self) -> [(&'static str, &[&'a Task]); 3] {
        [
            ("TODO", self.todo.as_slice()),
            ("IN PROGRESS", self.in_progress.as_slice()),
            ("DONE", self.done.as_slice()),
        ]
    }
}
