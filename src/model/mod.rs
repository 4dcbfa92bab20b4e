pub mod history;
pub mod task;
pub mod task_list;
pub mod workspace;

pub use history::{ActionHistory, ActionRecord};
pub use task::{
    parse_due_date, parse_tags, Priority, SortKey, Task, TaskDraft, TaskFilter, TaskId,
};
pub use task_list::TaskList;
pub use workspace::{Project, ProjectSummary, Workspace, DEFAULT_PROJECT};
