//! TaskList: 单向链表存储的有序任务序列
//!
//! 插入顺序即显示顺序。id 由链表自身单调分配，删除或撤销添加后都不会复用。

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::{Result, SprigError};

use super::task::{SortKey, Task, TaskDraft, TaskId};

type Link = Option<Box<Node>>;

struct Node {
    task: Task,
    next: Link,
}

/// 任务链表
pub struct TaskList {
    head: Link,
    len: usize,
    /// 下一个分配的 id
    next_id: u64,
}

impl Default for TaskList {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskList {
    pub fn new() -> Self {
        Self {
            head: None,
            len: 0,
            next_id: 1,
        }
    }

    /// 从持久化数据重建链表
    ///
    /// `next_id` 会被抬高到大于所有已有 id，重复 id 返回 `InvalidInput`。
    pub fn from_parts(tasks: Vec<Task>, next_id: u64) -> Result<Self> {
        let mut seen = HashSet::with_capacity(tasks.len());
        for task in &tasks {
            if !seen.insert(task.id) {
                return Err(SprigError::invalid_input(format!(
                    "duplicate task id #{}",
                    task.id
                )));
            }
        }
        let max_id = tasks.iter().map(|t| t.id.0).max().unwrap_or(0);

        let mut list = Self::new();
        list.rebuild(tasks);
        list.next_id = next_id.max(max_id + 1);
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// 下一个将被分配的 id（用于持久化）
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// 追加一个只有描述的新任务
    pub fn add(&mut self, description: impl Into<String>) -> &Task {
        self.add_draft(TaskDraft::new(description))
    }

    /// 追加新任务到链表尾部，分配新 id，completed = false
    pub fn add_draft(&mut self, draft: TaskDraft) -> &Task {
        let id = TaskId(self.next_id);
        self.next_id += 1;

        let mut cursor = &mut self.head;
        while let Some(node) = cursor {
            cursor = &mut node.next;
        }
        let node = cursor.insert(Box::new(Node {
            task: draft.into_task(id),
            next: None,
        }));
        self.len += 1;
        &node.task
    }

    /// 按插入顺序遍历（惰性、可重复）
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
            remaining: self.len,
        }
    }

    fn iter_mut(&mut self) -> IterMut<'_> {
        IterMut {
            next: self.head.as_deref_mut(),
        }
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.iter_mut().find(|t| t.id == id)
    }

    /// 任务在链表中的位置（从 0 开始）
    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.iter().position(|t| t.id == id)
    }

    pub fn completed_count(&self) -> usize {
        self.iter().filter(|t| t.completed).count()
    }

    /// 标记完成，返回之前的 completed 值
    pub fn complete(&mut self, id: TaskId) -> Result<bool> {
        self.set_completed(id, true)
    }

    /// 设置 completed，返回之前的值
    pub fn set_completed(&mut self, id: TaskId, completed: bool) -> Result<bool> {
        let task = self.get_mut(id).ok_or(SprigError::NotFound(id))?;
        Ok(std::mem::replace(&mut task.completed, completed))
    }

    /// 删除任务，返回被删除的任务及其原位置
    pub fn delete(&mut self, id: TaskId) -> Result<(Task, usize)> {
        let position = self.position(id).ok_or(SprigError::NotFound(id))?;
        let link = self.link_at(position);
        match link.take() {
            Some(mut node) => {
                *link = node.next.take();
                self.len -= 1;
                Ok((node.task, position))
            }
            None => Err(SprigError::NotFound(id)),
        }
    }

    /// 在指定位置重新插入任务（位置超出长度时追加到尾部）
    pub fn insert_at(&mut self, position: usize, task: Task) -> Result<()> {
        if self.get(task.id).is_some() {
            return Err(SprigError::invalid_input(format!(
                "task #{} is already in the list",
                task.id
            )));
        }
        self.next_id = self.next_id.max(task.id.0 + 1);

        let position = position.min(self.len);
        let link = self.link_at(position);
        let next = link.take();
        *link = Some(Box::new(Node { task, next }));
        self.len += 1;
        Ok(())
    }

    /// 稳定排序，返回排序前的 id 顺序（用于撤销）
    pub fn sort_by(&mut self, key: SortKey) -> Vec<TaskId> {
        let previous: Vec<TaskId> = self.iter().map(|t| t.id).collect();
        let mut tasks = self.drain();
        tasks.sort_by(|a, b| compare(key, a, b));
        self.rebuild(tasks);
        previous
    }

    /// 按给定 id 顺序重排；`order` 必须恰好包含当前所有 id
    pub fn reorder(&mut self, order: &[TaskId]) -> Result<()> {
        let current: HashSet<TaskId> = self.iter().map(|t| t.id).collect();
        let wanted: HashSet<TaskId> = order.iter().copied().collect();
        if order.len() != self.len || current != wanted {
            return Err(SprigError::invalid_input(
                "order does not match the tasks in the list",
            ));
        }

        let mut by_id: HashMap<TaskId, Task> =
            self.drain().into_iter().map(|t| (t.id, t)).collect();
        let tasks = order.iter().filter_map(|id| by_id.remove(id)).collect();
        self.rebuild(tasks);
        Ok(())
    }

    /// 第 position 个节点所在的链接（position == len 时为尾部空链接）
    fn link_at(&mut self, position: usize) -> &mut Link {
        let mut cursor = &mut self.head;
        for _ in 0..position {
            let Some(node) = cursor else { break };
            cursor = &mut node.next;
        }
        cursor
    }

    /// 取出所有任务，链表变为空（next_id 保留）
    fn drain(&mut self) -> Vec<Task> {
        let mut tasks = Vec::with_capacity(self.len);
        let mut link = self.head.take();
        while let Some(mut node) = link {
            link = node.next.take();
            tasks.push(node.task);
        }
        self.len = 0;
        tasks
    }

    /// 用给定任务替换链表内容（保持顺序）
    fn rebuild(&mut self, tasks: Vec<Task>) {
        self.drain();
        self.len = tasks.len();
        for task in tasks.into_iter().rev() {
            let next = self.head.take();
            self.head = Some(Box::new(Node { task, next }));
        }
    }
}

fn compare(key: SortKey, a: &Task, b: &Task) -> Ordering {
    match key {
        SortKey::Priority => b.priority.weight().cmp(&a.priority.weight()),
        SortKey::DueDate => match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortKey::Description => a
            .description
            .to_lowercase()
            .cmp(&b.description.to_lowercase()),
    }
}

// 逐个释放节点，避免长链表递归析构爆栈
impl Drop for TaskList {
    fn drop(&mut self) {
        let mut link = self.head.take();
        while let Some(mut node) = link {
            link = node.next.take();
        }
    }
}

impl Clone for TaskList {
    fn clone(&self) -> Self {
        let mut list = Self::new();
        list.rebuild(self.iter().cloned().collect());
        list.next_id = self.next_id;
        list
    }
}

impl PartialEq for TaskList {
    fn eq(&self, other: &Self) -> bool {
        self.next_id == other.next_id && self.iter().eq(other.iter())
    }
}

impl fmt::Debug for TaskList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// 只读迭代器
pub struct Iter<'a> {
    next: Option<&'a Node>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Task;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            self.remaining = self.remaining.saturating_sub(1);
            &node.task
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

struct IterMut<'a> {
    next: Option<&'a mut Node>,
}

impl<'a> Iterator for IterMut<'a> {
    type Item = &'a mut Task;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.take().map(|node| {
            self.next = node.next.as_deref_mut();
            &mut node.task
        })
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
