use crate::model::Task;
use std::fmt;

pub const EMPTY_MESSAGE: &str = "No tasks in your list!";
const RULE_WIDTH: usize = 50;

/// Renders a task list on demand through `Display`; nothing is formatted until written.
#[derive(Debug, Clone, Copy)]
pub struct TaskListView<'a> {
    tasks: &'a [Task],
}

impl<'a> TaskListView<'a> {
    pub fn new(tasks: &'a [Task]) -> Self {
        Self { tasks }
    }
}

impl fmt::Display for TaskListView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tasks.is_empty() {
            return writeln!(f, "{EMPTY_MESSAGE}");
        }

        let rule = "=".repeat(RULE_WIDTH);
        writeln!(f)?;
        writeln!(f, "{rule}")?;
        writeln!(f, "YOUR TO-DO LIST")?;
        writeln!(f, "{rule}")?;

        for task in self.tasks {
            writeln!(f, "{} [{}] {}", task.status_glyph(), task.id, task.description)?;
            if task.completed {
                let completed_at = task.completed_at.as_deref().unwrap_or("Unknown");
                writeln!(f, "    Completed: {completed_at}")?;
            } else {
                writeln!(f, "    Created: {}", task.created_at)?;
            }
        }

        writeln!(f, "{rule}")
    }
}
