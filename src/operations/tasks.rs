//! Core task operations shared between the interactive menu and one-shot commands
//!
//! Every mutating operation changes the project's `TaskList` and records the
//! matching `ActionRecord` on the same project's `ActionHistory`, so callers
//! never have to keep the two in sync by hand.
//!
//! ## Architecture
//!
//! ```text
//! Menu (src/cli/menu.rs)  ──┐
//!                           ├──> operations::tasks (this module) ──> model (TaskList, ActionHistory)
//! One-shot (src/cli/run.rs) ┘
//! ```
//!
//! Printing messages is the caller's responsibility.

use tracing::debug;

use crate::error::{Result, SprigError};
use crate::model::{ActionRecord, Project, SortKey, Task, TaskDraft, TaskId};

/// Result of a complete operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteResult {
    pub description: String,
    /// The task was already completed; nothing was recorded
    pub already_completed: bool,
}

/// Add a task to the end of the project's list
///
/// # Steps
///
/// 1. Validate: description not empty
/// 2. Append (fresh id, not completed)
/// 3. Record `Add`
pub fn add_task(project: &mut Project, mut draft: TaskDraft) -> Result<Task> {
    draft.description = draft.description.trim().to_string();
    if draft.description.is_empty() {
        return Err(SprigError::invalid_input("Task cannot be empty!"));
    }

    let task = project.tasks.add_draft(draft).clone();
    project
        .history
        .record(ActionRecord::Add { task: task.clone() });
    debug!(project = %project.name, id = %task.id, "task added");
    Ok(task)
}

/// Mark a task completed
///
/// A task that is already completed is left alone and no action is recorded.
pub fn complete_task(project: &mut Project, id: TaskId) -> Result<CompleteResult> {
    let previous = project.tasks.complete(id)?;
    if !previous {
        project
            .history
            .record(ActionRecord::Complete { id, previous });
    }

    let description = project
        .tasks
        .get(id)
        .map(|t| t.description.clone())
        .unwrap_or_default();
    Ok(CompleteResult {
        description,
        already_completed: previous,
    })
}

/// Delete a task, remembering its position for undo
pub fn delete_task(project: &mut Project, id: TaskId) -> Result<Task> {
    let (task, position) = project.tasks.delete(id)?;
    project.history.record(ActionRecord::Delete {
        task: task.clone(),
        position,
    });
    debug!(project = %project.name, id = %id, position, "task deleted");
    Ok(task)
}

/// Sort the project's tasks
///
/// # Returns
///
/// `true` if the order changed (and an undoable `Sort` was recorded).
pub fn sort_tasks(project: &mut Project, key: SortKey) -> bool {
    let previous_order = project.tasks.sort_by(key);
    let changed = project
        .tasks
        .iter()
        .map(|t| t.id)
        .ne(previous_order.iter().copied());
    if changed {
        project.history.record(ActionRecord::Sort {
            key,
            previous_order,
        });
    }
    changed
}

/// Undo the most recent recorded action of the project
pub fn undo(project: &mut Project) -> Result<ActionRecord> {
    let Project { tasks, history, .. } = project;
    history.undo(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;

    fn project() -> Project {
        Project::new("test", None)
    }

    fn descriptions(project: &Project) -> Vec<String> {
        project
            .tasks
            .iter()
            .map(|t| t.description.clone())
            .collect()
    }

    #[test]
    fn test_add_records_history() {
        let mut p = project();
        let task = add_task(&mut p, TaskDraft::new("  Buy milk ")).unwrap();
        assert_eq!(task.description, "Buy milk");
        assert_eq!(task.id, TaskId(1));
        assert_eq!(p.history.len(), 1);

        undo(&mut p).unwrap();
        assert!(p.tasks.is_empty());
    }

    #[test]
    fn test_add_rejects_empty_description() {
        let mut p = project();
        let err = add_task(&mut p, TaskDraft::new("   ")).unwrap_err();
        assert!(matches!(err, SprigError::InvalidInput(_)));
        assert!(p.tasks.is_empty());
        assert!(p.history.is_empty());
    }

    #[test]
    fn test_undo_add_does_not_reuse_id() {
        let mut p = project();
        add_task(&mut p, TaskDraft::new("a")).unwrap();
        undo(&mut p).unwrap();
        let task = add_task(&mut p, TaskDraft::new("b")).unwrap();
        assert_eq!(task.id, TaskId(2));
    }

    #[test]
    fn test_complete_twice_records_once() {
        let mut p = project();
        let id = add_task(&mut p, TaskDraft::new("a")).unwrap().id;

        let first = complete_task(&mut p, id).unwrap();
        assert!(!first.already_completed);
        let second = complete_task(&mut p, id).unwrap();
        assert!(second.already_completed);
        assert_eq!(second.description, "a");
        assert_eq!(p.history.len(), 2);

        undo(&mut p).unwrap();
        assert!(!p.tasks.get(id).unwrap().completed);
    }

    #[test]
    fn test_missing_id_leaves_state_unchanged() {
        let mut p = project();
        add_task(&mut p, TaskDraft::new("a")).unwrap();
        let before = p.tasks.clone();

        assert!(matches!(
            complete_task(&mut p, TaskId(5)),
            Err(SprigError::NotFound(TaskId(5)))
        ));
        assert!(matches!(
            delete_task(&mut p, TaskId(5)),
            Err(SprigError::NotFound(TaskId(5)))
        ));
        assert_eq!(p.tasks, before);
        assert_eq!(p.history.len(), 1);
    }

    #[test]
    fn test_milk_and_dog_scenario() {
        let mut p = project();
        add_task(&mut p, TaskDraft::new("Buy milk")).unwrap();
        add_task(&mut p, TaskDraft::new("Walk dog")).unwrap();
        complete_task(&mut p, TaskId(1)).unwrap();
        delete_task(&mut p, TaskId(2)).unwrap();

        let undone = undo(&mut p).unwrap();
        assert_eq!(undone.kind(), "DELETE");
        let undone = undo(&mut p).unwrap();
        assert_eq!(undone.kind(), "DONE");

        assert_eq!(descriptions(&p), vec!["Buy milk", "Walk dog"]);
        assert!(p.tasks.iter().all(|t| !t.completed));
    }

    #[test]
    fn test_sort_records_only_when_order_changes() {
        let mut p = project();
        add_task(&mut p, TaskDraft::new("low").priority(Priority::Low)).unwrap();
        add_task(&mut p, TaskDraft::new("high").priority(Priority::High)).unwrap();
        assert_eq!(p.history.len(), 2);

        assert!(sort_tasks(&mut p, SortKey::Priority));
        assert_eq!(descriptions(&p), vec!["high", "low"]);
        assert_eq!(p.history.len(), 3);

        assert!(!sort_tasks(&mut p, SortKey::Priority));
        assert_eq!(p.history.len(), 3);

        undo(&mut p).unwrap();
        assert_eq!(descriptions(&p), vec!["low", "high"]);
    }

    #[test]
    fn test_undo_empty_history() {
        let mut p = project();
        assert!(matches!(undo(&mut p), Err(SprigError::EmptyHistory)));
    }
}
