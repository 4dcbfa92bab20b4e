//! 文本输出（菜单和一次性命令共用）

use std::io::{self, Write};

use crate::model::{ActionHistory, ProjectSummary, Task, TaskFilter, TaskList};
use crate::operations::stats::{Kanban, Stats};

const WIDE_RULE: usize = 60;
const NARROW_RULE: usize = 40;

fn rule<W: Write>(out: &mut W, ch: char, width: usize) -> io::Result<()> {
    writeln!(out, "{}", ch.to_string().repeat(width))
}

fn task_line(task: &Task) -> String {
    let due = task
        .due_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "No date".to_string());
    let tags: Vec<String> = task.tags.iter().map(|t| format!("[{}]", t)).collect();
    let line = format!(
        "{:<4} [{}]   {}  {:<12} {}",
        task.id,
        task.status_icon(),
        task.priority.icon(),
        due,
        task.description
    );
    if tags.is_empty() {
        line
    } else {
        format!("{} {}", line, tags.join(" "))
    }
}

/// 任务表格
pub fn task_table<W: Write>(out: &mut W, tasks: &TaskList, filter: &TaskFilter) -> io::Result<()> {
    if tasks.is_empty() {
        return writeln!(out, "No tasks");
    }

    let shown: Vec<&Task> = tasks.iter().filter(|t| filter.matches(t)).collect();
    if shown.is_empty() {
        return writeln!(out, "No tasks match your criteria");
    }

    writeln!(out)?;
    rule(out, '=', WIDE_RULE)?;
    writeln!(
        out,
        "{:<4} {:<6} {:<4} {:<12} Description",
        "ID", "Status", "Pri", "Due Date"
    )?;
    rule(out, '=', WIDE_RULE)?;
    for task in &shown {
        writeln!(out, "{}", task_line(task))?;
    }
    rule(out, '=', WIDE_RULE)?;
    writeln!(out, "Total: {} task(s)", shown.len())
}

/// 统计信息
pub fn stats<W: Write>(out: &mut W, stats: &Stats, tasks: &TaskList) -> io::Result<()> {
    writeln!(out)?;
    rule(out, '=', NARROW_RULE)?;
    writeln!(out, "TASK STATISTICS")?;
    rule(out, '=', NARROW_RULE)?;
    writeln!(out, "Total Tasks: {}", stats.total)?;
    writeln!(out, "Completed: {}", stats.completed)?;
    writeln!(out, "Pending: {}", stats.pending)?;
    writeln!(out, "Overdue: {}", stats.overdue.len())?;
    if let Some(rate) = stats.completion_rate() {
        writeln!(out, "Completion Rate: {:.1}%", rate)?;
    }

    if !stats.overdue.is_empty() {
        writeln!(out)?;
        writeln!(out, "🚨 Overdue Tasks: {}", stats.overdue.len())?;
        for task in stats.overdue.iter().filter_map(|id| tasks.get(*id)) {
            writeln!(out, "   - #{} {}", task.id, task.description)?;
        }
    }
    Ok(())
}

/// 看板视图
pub fn kanban<W: Write>(out: &mut W, board: &Kanban<'_>) -> io::Result<()> {
    if board.is_empty() {
        return writeln!(out, "No tasks to display");
    }
    writeln!(out)?;
    rule(out, '=', WIDE_RULE)?;
    writeln!(out, "KANBAN VIEW")?;
    rule(out, '=', WIDE_RULE)?;
    for (name, tasks) in board.columns() {
        writeln!(out)?;
        writeln!(out, "{} ({} tasks)", name, tasks.len())?;
        rule(out, '-', NARROW_RULE)?;
        for task in tasks {
            writeln!(
                out,
                " [{}] {} #{} {}",
                task.status_icon(),
                task.priority.icon(),
                task.id,
                task.description
            )?;
        }
    }
    Ok(())
}

/// 撤销历史（最近的在前）
pub fn history<W: Write>(out: &mut W, history: &ActionHistory) -> io::Result<()> {
    if history.is_empty() {
        return writeln!(out, "No actions in history");
    }
    writeln!(out)?;
    writeln!(out, "Undo History ({} actions):", history.len())?;
    for (i, entry) in history.entries().enumerate() {
        writeln!(
            out,
            "{}. {} - {} ({})",
            i + 1,
            entry.action.kind(),
            entry.action.summary(),
            entry.recorded_at.format("%H:%M:%S")
        )?;
    }
    Ok(())
}

/// 项目列表
pub fn projects<W: Write>(out: &mut W, summaries: &[ProjectSummary]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Projects:")?;
    for (i, summary) in summaries.iter().enumerate() {
        let current = if summary.is_current { " (current)" } else { "" };
        writeln!(
            out,
            "{}. {} - {} tasks{}",
            i + 1,
            summary.name,
            summary.task_count,
            current
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActionRecord, Priority, TaskDraft, TaskId};
    use chrono::NaiveDate;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn sample() -> TaskList {
        let mut list = TaskList::new();
        list.add_draft(
            TaskDraft::new("Buy milk")
                .priority(Priority::High)
                .due(NaiveDate::from_ymd_opt(2024, 1, 2))
                .tags(vec!["home".to_string(), "errand".to_string()]),
        );
        list.add("Walk dog");
        list
    }

    #[test]
    fn test_task_table() {
        let list = sample();
        let text = render(|out| task_table(out, &list, &TaskFilter::All));
        assert!(text.contains("Buy milk [home] [errand]"));
        assert!(text.contains("2024-01-02"));
        assert!(text.contains("No date"));
        assert!(text.contains("Total: 2 task(s)"));
    }

    #[test]
    fn test_task_table_empty_and_filtered() {
        let text = render(|out| task_table(out, &TaskList::new(), &TaskFilter::All));
        assert_eq!(text, "No tasks\n");

        let list = sample();
        let text = render(|out| task_table(out, &list, &TaskFilter::Done));
        assert_eq!(text, "No tasks match your criteria\n");
    }

    #[test]
    fn test_stats_output() {
        let mut list = sample();
        list.complete(TaskId(2)).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let s = Stats::collect(&list, today);
        let text = render(|out| stats(out, &s, &list));
        assert!(text.contains("Completion Rate: 50.0%"));
        assert!(text.contains("- #1 Buy milk"));
    }

    #[test]
    fn test_history_output() {
        let mut h = ActionHistory::default();
        let text = render(|out| history(out, &h));
        assert_eq!(text, "No actions in history\n");

        h.record(ActionRecord::Complete {
            id: TaskId(3),
            previous: false,
        });
        let text = render(|out| history(out, &h));
        assert!(text.contains("Undo History (1 actions):"));
        assert!(text.contains("1. DONE - #3"));
    }

    #[test]
    fn test_kanban_output() {
        let list = sample();
        let board = Kanban::build(&list);
        let text = render(|out| kanban(out, &board));
        assert!(text.contains("TODO (1 tasks)"));
        assert!(text.contains("IN PROGRESS (1 tasks)"));
        assert!(text.contains("DONE (0 tasks)"));
    }

    #[test]
    fn test_kanban_empty_list() {
        let list = TaskList::new();
        let text = render(|out| kanban(out, &Kanban::build(&list)));
        assert_eq!(text, "No tasks to display\n");
    }
}
