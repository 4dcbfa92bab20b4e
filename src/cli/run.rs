//! 子命令实现

use std::io::{self, Write};

use chrono::Local;

use super::{menu, render, Commands};
use crate::app::App;
use crate::error::Result;
use crate::model::{parse_due_date, parse_tags, Priority, TaskDraft, TaskFilter};
use crate::operations::stats::{Kanban, Stats};
use crate::operations::tasks;
use crate::storage::config::{self, Config};

/// 执行一个子命令（Menu 进入交互式菜单）
pub fn execute<W: Write>(app: &mut App, command: Commands, out: &mut W) -> Result<()> {
    match command {
        Commands::Menu => menu::run(app, io::stdin().lock(), out),
        Commands::Add {
            description,
            priority,
            due,
            tags,
        } => add(app, out, description.join(" "), priority, due, tags),
        Commands::List { filter, search } => {
            let filter = search.map(TaskFilter::Search).unwrap_or(filter);
            render::task_table(out, &app.workspace.current().tasks, &filter)?;
            Ok(())
        }
        Commands::Done { id } => {
            let result = tasks::complete_task(app.project_mut(), id)?;
            if result.already_completed {
                writeln!(out, "Task already completed!")?;
            } else {
                writeln!(out, "Completed: {}", result.description)?;
            }
            Ok(())
        }
        Commands::Rm { id } => {
            let task = tasks::delete_task(app.project_mut(), id)?;
            writeln!(out, "Deleted: {}", task.description)?;
            Ok(())
        }
        Commands::Stats => {
            let project_tasks = &app.workspace.current().tasks;
            let stats = Stats::collect(project_tasks, Local::now().date_naive());
            render::stats(out, &stats, project_tasks)?;
            Ok(())
        }
        Commands::Kanban => {
            render::kanban(out, &Kanban::build(&app.workspace.current().tasks))?;
            Ok(())
        }
        Commands::Projects => {
            render::projects(out, &app.workspace.summaries())?;
            Ok(())
        }
        Commands::Config { init } => show_config(out, init),
    }
}

fn add<W: Write>(
    app: &mut App,
    out: &mut W,
    description: String,
    priority: Priority,
    due: Option<String>,
    tags: Vec<String>,
) -> Result<()> {
    let due_date = match due {
        Some(input) => parse_due_date(&input)?,
        None => None,
    };
    // --tag 既可以重复，也可以写成逗号分隔
    let tags = tags.iter().flat_map(|t| parse_tags(t)).collect();

    let draft = TaskDraft::new(description)
        .priority(priority)
        .due(due_date)
        .tags(tags);
    let task = tasks::add_task(app.project_mut(), draft)?;
    writeln!(
        out,
        "Added: #{} {} (Priority: {})",
        task.id,
        task.description,
        task.priority.label()
    )?;
    Ok(())
}

/// 显示当前配置；`init` 时写入默认配置文件（已存在则不覆盖）
pub fn show_config<W: Write>(out: &mut W, init: bool) -> Result<()> {
    let path = config::config_path();
    if init {
        if path.exists() {
            writeln!(out, "Config already exists at {}", path.display())?;
        } else {
            config::save_config(&path, &Config::default())?;
            writeln!(out, "Wrote {}", path.display())?;
        }
    }

    let config = config::load_config_from(&path);
    writeln!(out, "Config file: {}", path.display())?;
    writeln!(out, "Data file:   {}", config.data_path().display())?;
    writeln!(out, "Autosave:    {}", config.storage.autosave)?;
    match config.history.max_depth {
        Some(depth) => writeln!(out, "Undo depth:  {}", depth)?,
        None => writeln!(out, "Undo depth:  unlimited")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TaskId, Workspace};

    fn app_in(dir: &tempfile::TempDir) -> App {
        App::with_workspace(Workspace::default(), dir.path().join("todo.toml"), true)
    }

    fn exec(app: &mut App, command: Commands) -> Result<String> {
        let mut out = Vec::new();
        execute(app, command, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn add_cmd(description: &str) -> Commands {
        Commands::Add {
            description: description.split(' ').map(str::to_string).collect(),
            priority: Priority::Medium,
            due: None,
            tags: vec!["a,b".to_string(), "c".to_string()],
        }
    }

    #[test]
    fn test_add_list_done_rm() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);

        let text = exec(&mut app, add_cmd("Buy milk")).unwrap();
        assert_eq!(text, "Added: #1 Buy milk (Priority: medium)\n");
        let task = app.workspace.current().tasks.get(TaskId(1)).unwrap();
        assert_eq!(task.tags, vec!["a", "b", "c"]);

        exec(&mut app, add_cmd("Walk dog")).unwrap();
        let text = exec(&mut app, Commands::Done { id: TaskId(1) }).unwrap();
        assert_eq!(text, "Completed: Buy milk\n");

        let text = exec(
            &mut app,
            Commands::List {
                filter: TaskFilter::Pending,
                search: None,
            },
        )
        .unwrap();
        assert!(text.contains("Walk dog"));
        assert!(!text.contains("Buy milk"));

        let text = exec(
            &mut app,
            Commands::List {
                filter: TaskFilter::All,
                search: Some("MILK".to_string()),
            },
        )
        .unwrap();
        assert!(text.contains("Buy milk"));
        assert!(text.contains("Total: 1 task(s)"));

        let text = exec(&mut app, Commands::Rm { id: TaskId(2) }).unwrap();
        assert_eq!(text, "Deleted: Walk dog\n");
        assert!(app.is_dirty());
    }

    #[test]
    fn test_missing_id_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        let err = exec(&mut app, Commands::Done { id: TaskId(8) }).unwrap_err();
        assert_eq!(err.to_string(), "Task not found: #8");
    }

    #[test]
    fn test_bad_due_date() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        let err = exec(
            &mut app,
            Commands::Add {
                description: vec!["x".to_string()],
                priority: Priority::Low,
                due: Some("31-12-2024".to_string()),
                tags: Vec::new(),
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("YYYY-MM-DD"));
        assert!(app.workspace.current().tasks.is_empty());
    }

    #[test]
    fn test_kanban_on_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        let text = exec(&mut app, Commands::Kanban).unwrap();
        assert_eq!(text, "No tasks to display\n");
    }

    #[test]
    fn test_projects_and_stats() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        exec(&mut app, add_cmd("one")).unwrap();
        let text = exec(&mut app, Commands::Projects).unwrap();
        assert!(text.contains("1. default - 1 tasks (current)"));

        let text = exec(&mut app, Commands::Stats).unwrap();
        assert!(text.contains("Total Tasks: 1"));

        let text = exec(&mut app, Commands::Kanban).unwrap();
        assert!(text.contains("TODO (1 tasks)"));
    }
}
