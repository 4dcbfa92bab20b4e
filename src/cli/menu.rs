//! 交互式菜单
//!
//! 输入输出是泛型的 `BufRead` / `Write`，测试中直接用内存缓冲区驱动。
//! 领域错误（任务不存在、没有可撤销的操作等）只打印提示，菜单继续。

use std::io::{self, BufRead, Write};

use chrono::Local;
use tracing::warn;

use super::render;
use crate::app::App;
use crate::error::{Result, SprigError};
use crate::model::{parse_due_date, parse_tags, Priority, SortKey, TaskDraft, TaskFilter, TaskId};
use crate::operations::stats::{Kanban, Stats};
use crate::operations::tasks;

/// 菜单循环的下一步
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

struct Menu<'a, R, W> {
    app: &'a mut App,
    input: R,
    out: W,
}

/// 运行主菜单，直到选择 Exit 或输入结束
pub fn run<R: BufRead, W: Write>(app: &mut App, input: R, out: W) -> Result<()> {
    let mut menu = Menu { app, input, out };
    writeln!(menu.out, "=== sprig todo ===")?;
    writeln!(menu.out, "Tasks live in a linked list, undo lives on a stack.")?;
    menu.run()
}

impl<R: BufRead, W: Write> Menu<'_, R, W> {
    fn run(&mut self) -> Result<()> {
        loop {
            self.print_main_menu()?;
            let choice = match self.prompt("Choose (1-12): ")? {
                Some(choice) => choice,
                None => {
                    // 输入结束等同于 Exit
                    writeln!(self.out)?;
                    self.exit()?;
                    return Ok(());
                }
            };

            match self.dispatch(&choice) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(e) => {
                    if !e.is_recoverable() {
                        warn!(error = %e, "menu action failed");
                    }
                    writeln!(self.out, "{}", e)?;
                }
            }
        }
    }

    fn print_main_menu(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(
            self.out,
            "Current Project: {}",
            self.app.workspace.current_name()
        )?;
        for line in [
            "1. Add Task",
            "2. View Tasks",
            "3. Complete Task",
            "4. Delete Task",
            "5. Undo",
            "6. Statistics",
            "7. Kanban View",
            "8. Sort Tasks",
            "9. Projects",
            "10. Save",
            "11. Undo History",
            "12. Exit",
        ] {
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    /// 输出提示并读取一行；输入结束时返回 None
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.out, "{}", message)?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn dispatch(&mut self, choice: &str) -> Result<Flow> {
        match choice {
            "1" => self.add_task()?,
            "2" => self.view_tasks()?,
            "3" => self.complete_task()?,
            "4" => self.delete_task()?,
            "5" => self.undo()?,
            "6" => self.statistics()?,
            "7" => self.kanban()?,
            "8" => self.sort_tasks()?,
            "9" => self.projects()?,
            "10" => {
                self.app.save()?;
                writeln!(self.out, "Data saved to {}", self.app.data_path().display())?;
            }
            "11" => render::history(&mut self.out, &self.app.workspace.current().history)?,
            "12" => {
                self.exit()?;
                return Ok(Flow::Exit);
            }
            _ => writeln!(self.out, "Invalid choice! Please enter 1-12.")?,
        }
        Ok(Flow::Continue)
    }

    fn add_task(&mut self) -> Result<()> {
        let Some(description) = self.prompt("Enter task: ")? else {
            return Ok(());
        };
        if description.is_empty() {
            return Err(SprigError::invalid_input("Task cannot be empty!"));
        }

        writeln!(self.out)?;
        writeln!(self.out, "Priority levels:")?;
        writeln!(self.out, "1. High {}", Priority::High.icon())?;
        writeln!(self.out, "2. Medium {}", Priority::Medium.icon())?;
        writeln!(self.out, "3. Low {}", Priority::Low.icon())?;
        let priority = self
            .prompt("Choose priority (1-3, default 2): ")?
            .map(|c| Priority::from_menu_choice(&c))
            .unwrap_or_default();

        let due_date = match self.prompt("Due date (YYYY-MM-DD, optional): ")? {
            Some(input) => parse_due_date(&input)?,
            None => None,
        };
        let tags = self
            .prompt("Tags (comma separated, optional): ")?
            .map(|input| parse_tags(&input))
            .unwrap_or_default();

        let draft = TaskDraft::new(description)
            .priority(priority)
            .due(due_date)
            .tags(tags);
        let task = tasks::add_task(self.app.project_mut(), draft)?;
        writeln!(
            self.out,
            "Added: #{} {} (Priority: {})",
            task.id,
            task.description,
            task.priority.label()
        )?;
        Ok(())
    }

    fn view_tasks(&mut self) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Filter options:")?;
        writeln!(self.out, "1. All tasks")?;
        writeln!(self.out, "2. Pending tasks")?;
        writeln!(self.out, "3. Completed tasks")?;
        writeln!(self.out, "4. High priority tasks")?;
        writeln!(self.out, "5. Search tasks")?;
        let Some(choice) = self.prompt("Choose filter (1-5): ")? else {
            return Ok(());
        };

        let filter = match choice.as_str() {
            "2" => TaskFilter::Pending,
            "3" => TaskFilter::Done,
            "4" => TaskFilter::HighPriority,
            "5" => {
                let term = self.prompt("Enter search term: ")?.unwrap_or_default();
                TaskFilter::Search(term)
            }
            _ => TaskFilter::All,
        };
        render::task_table(&mut self.out, &self.app.workspace.current().tasks, &filter)?;
        Ok(())
    }

    /// 读取任务 id；输入结束时返回 None
    fn prompt_id(&mut self, message: &str) -> Result<Option<TaskId>> {
        match self.prompt(message)? {
            Some(input) => Ok(Some(input.parse()?)),
            None => Ok(None),
        }
    }

    fn complete_task(&mut self) -> Result<()> {
        render::task_table(
            &mut self.out,
            &self.app.workspace.current().tasks,
            &TaskFilter::Pending,
        )?;
        let Some(id) = self.prompt_id("Enter task id: ")? else {
            return Ok(());
        };

        let result = tasks::complete_task(self.app.project_mut(), id)?;
        if result.already_completed {
            writeln!(self.out, "Task already completed!")?;
        } else {
            writeln!(self.out, "Completed: {}", result.description)?;
        }
        Ok(())
    }

    fn delete_task(&mut self) -> Result<()> {
        render::task_table(
            &mut self.out,
            &self.app.workspace.current().tasks,
            &TaskFilter::All,
        )?;
        let Some(id) = self.prompt_id("Enter task id to delete: ")? else {
            return Ok(());
        };

        let task = tasks::delete_task(self.app.project_mut(), id)?;
        writeln!(self.out, "Deleted: {}", task.description)?;
        Ok(())
    }

    fn undo(&mut self) -> Result<()> {
        let action = tasks::undo(self.app.project_mut())?;
        writeln!(self.out, "Undid: {} - {}", action.kind(), action.summary())?;
        Ok(())
    }

    fn statistics(&mut self) -> Result<()> {
        let project_tasks = &self.app.workspace.current().tasks;
        let stats = Stats::collect(project_tasks, Local::now().date_naive());
        render::stats(&mut self.out, &stats, project_tasks)?;
        Ok(())
    }

    fn kanban(&mut self) -> Result<()> {
        let project_tasks = &self.app.workspace.current().tasks;
        render::kanban(&mut self.out, &Kanban::build(project_tasks))?;
        Ok(())
    }

    fn sort_tasks(&mut self) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Sort options:")?;
        writeln!(self.out, "1. By Priority (High to Low)")?;
        writeln!(self.out, "2. By Due Date (Earliest first)")?;
        writeln!(self.out, "3. By Description (A-Z)")?;
        let Some(choice) = self.prompt("Choose sort method (1-3): ")? else {
            return Ok(());
        };

        let Some(key) = SortKey::from_menu_choice(&choice) else {
            writeln!(self.out, "Invalid choice!")?;
            return Ok(());
        };
        if tasks::sort_tasks(self.app.project_mut(), key) {
            writeln!(self.out, "Tasks sorted by {}", key.label())?;
        } else {
            writeln!(self.out, "Tasks already sorted by {}", key.label())?;
        }
        Ok(())
    }

    fn projects(&mut self) -> Result<()> {
        loop {
            writeln!(self.out)?;
            writeln!(
                self.out,
                "Current Project: {}",
                self.app.workspace.current_name()
            )?;
            writeln!(self.out, "1. List Projects")?;
            writeln!(self.out, "2. Create Project")?;
            writeln!(self.out, "3. Switch Project")?;
            writeln!(self.out, "4. Delete Project")?;
            writeln!(self.out, "5. Back to Main Menu")?;
            let Some(choice) = self.prompt("Choose (1-5): ")? else {
                return Ok(());
            };

            let outcome = match choice.as_str() {
                "1" => {
                    render::projects(&mut self.out, &self.app.workspace.summaries())?;
                    Ok(())
                }
                "2" => self.create_project(),
                "3" => self.switch_project(),
                "4" => self.delete_project(),
                "5" => return Ok(()),
                _ => {
                    writeln!(self.out, "Invalid choice!")?;
                    Ok(())
                }
            };
            // 子菜单内的错误也只提示
            if let Err(e) = outcome {
                writeln!(self.out, "{}", e)?;
            }
        }
    }

    fn create_project(&mut self) -> Result<()> {
        let Some(name) = self.prompt("Enter project name: ")? else {
            return Ok(());
        };
        self.app.workspace.create(&name)?;
        self.app.touch();
        writeln!(self.out, "Project '{}' created", name)?;
        Ok(())
    }

    fn switch_project(&mut self) -> Result<()> {
        let Some(name) = self.prompt("Enter project name to switch to: ")? else {
            return Ok(());
        };
        self.app.workspace.switch(&name)?;
        self.app.touch();
        writeln!(self.out, "Switched to project: {}", name)?;
        Ok(())
    }

    fn delete_project(&mut self) -> Result<()> {
        let Some(name) = self.prompt("Enter project name to delete: ")? else {
            return Ok(());
        };
        self.app.workspace.remove(&name)?;
        self.app.touch();
        writeln!(self.out, "Project '{}' deleted", name)?;
        Ok(())
    }

    fn exit(&mut self) -> Result<()> {
        if self.app.autosave_if_dirty()? {
            writeln!(self.out, "Data saved to {}", self.app.data_path().display())?;
        }
        writeln!(self.out, "Goodbye!")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Workspace;
    use crate::storage::config::Config;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn app_in(dir: &tempfile::TempDir) -> App {
        App::with_workspace(Workspace::default(), dir.path().join("todo.toml"), true)
    }

    /// 运行脚本化会话，返回输出
    fn session(app: &mut App, script: &str) -> String {
        let mut out = Vec::new();
        run(app, Cursor::new(script.as_bytes()), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn descriptions(app: &App) -> Vec<String> {
        app.workspace
            .current()
            .tasks
            .iter()
            .map(|t| t.description.clone())
            .collect()
    }

    #[test]
    fn test_add_and_view() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        let text = session(
            &mut app,
            "1\nBuy milk\n1\n2024-05-01\nhome, errand\n1\nWalk dog\n\n\n\n2\n1\n12\n",
        );

        assert!(text.contains("Added: #1 Buy milk (Priority: high)"));
        assert!(text.contains("Added: #2 Walk dog (Priority: medium)"));
        assert!(text.contains("Total: 2 task(s)"));
        assert!(text.contains("Goodbye!"));
        assert_eq!(descriptions(&app), vec!["Buy milk", "Walk dog"]);

        let milk = app.workspace.current().tasks.get(TaskId(1)).unwrap();
        assert_eq!(milk.tags, vec!["home", "errand"]);
    }

    #[test]
    fn test_milk_and_dog_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        let text = session(
            &mut app,
            concat!(
                "1\nBuy milk\n\n\n\n",
                "1\nWalk dog\n\n\n\n",
                "3\n1\n",
                "4\n2\n",
                "5\n",
                "5\n",
                "12\n",
            ),
        );

        assert!(text.contains("Completed: Buy milk"));
        assert!(text.contains("Deleted: Walk dog"));
        assert!(text.contains("Undid: DELETE - #2 Walk dog"));
        assert!(text.contains("Undid: DONE - #1"));
        assert_eq!(descriptions(&app), vec!["Buy milk", "Walk dog"]);
        assert!(app.workspace.current().tasks.iter().all(|t| !t.completed));
    }

    #[test]
    fn test_errors_are_reported_and_menu_continues() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        let text = session(&mut app, "5\n3\n42\n4\nabc\n1\n\n99\n12\n");

        assert!(text.contains("Nothing to undo"));
        assert!(text.contains("Task not found: #42"));
        assert!(text.contains("Please enter a valid number"));
        assert!(text.contains("Task cannot be empty!"));
        assert!(text.contains("Invalid choice! Please enter 1-12."));
        assert!(text.contains("Goodbye!"));
        assert!(app.workspace.current().tasks.is_empty());
    }

    #[test]
    fn test_complete_twice() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        let text = session(&mut app, "1\nx\n\n\n\n3\n1\n3\n1\n12\n");
        assert!(text.contains("Completed: x"));
        assert!(text.contains("Task already completed!"));
    }

    #[test]
    fn test_invalid_due_date_aborts_add() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        let text = session(&mut app, "1\nTaxes\n2\ntomorrow\n12\n");
        assert!(text.contains("'tomorrow' is not a YYYY-MM-DD date"));
        assert!(app.workspace.current().tasks.is_empty());
    }

    #[test]
    fn test_exit_autosaves() {
        let dir = tempfile::tempdir().unwrap();
        let path: PathBuf = dir.path().join("todo.toml");
        let mut app = app_in(&dir);
        let text = session(&mut app, "1\nPersist me\n\n\n\n12\n");
        assert!(text.contains("Data saved to"));

        let reloaded = App::load(path, &Config::default()).unwrap();
        assert_eq!(descriptions(&reloaded), vec!["Persist me"]);
    }

    #[test]
    fn test_end_of_input_exits() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        let text = session(&mut app, "1\nHalf");
        assert!(text.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_sort_and_undo() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        session(
            &mut app,
            "1\nbeta\n\n\n\n1\nAlpha\n\n\n\n8\n3\n12\n",
        );
        assert_eq!(descriptions(&app), vec!["Alpha", "beta"]);

        let text = session(&mut app, "11\n5\n12\n");
        assert!(text.contains("1. SORT - by description"));
        assert_eq!(descriptions(&app), vec!["beta", "Alpha"]);
    }

    #[test]
    fn test_projects_submenu() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        let text = session(
            &mut app,
            concat!(
                "9\n2\nwork\n2\nwork\n3\nwork\n4\ndefault\n1\n5\n",
                "1\nReport\n\n\n\n",
                "9\n3\nnowhere\n5\n",
                "12\n",
            ),
        );

        assert!(text.contains("Project 'work' created"));
        assert!(text.contains("Project 'work' already exists"));
        assert!(text.contains("Switched to project: work"));
        assert!(text.contains("Cannot delete default project"));
        assert!(text.contains("2. work - 0 tasks (current)"));
        assert!(text.contains("Project 'nowhere' not found"));
        assert_eq!(app.workspace.current_name(), "work");
        assert_eq!(descriptions(&app), vec!["Report"]);
        assert!(app
            .workspace
            .get("default")
            .unwrap()
            .tasks
            .is_empty());
    }

    #[test]
    fn test_statistics_and_kanban() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        let text = session(&mut app, "7\n1\nShip it\n1\n\n\n6\n7\n12\n");
        assert!(text.contains("No tasks to display"));
        assert!(text.contains("Total Tasks: 1"));
        assert!(text.contains("Completion Rate: 0.0%"));
        assert!(text.contains("IN PROGRESS (1 tasks)"));
    }
}
