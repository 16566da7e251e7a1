use crate::error::AppError;
use crate::model::{Task, timestamp};
use crate::storage::json_store::{self, TaskState};
use crate::view::TaskListView;
use log::info;
use std::path::{Path, PathBuf};

/// The task collection and its backing file. Every mutation rewrites the file.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    state: TaskState,
}

impl TaskStore {
    /// Loads `path` best-effort; an absent or unusable file opens an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = json_store::load_state_or_default(&path);
        info!(
            "opened task store {} ({} task(s))",
            path.display(),
            state.tasks.len()
        );
        Self { path, state }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn len(&self) -> usize {
        self.state.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.tasks.is_empty()
    }

    pub fn save(&self) -> Result<(), AppError> {
        json_store::save_state(&self.path, &self.state)
    }

    pub fn add(&mut self, description: &str) -> Result<Task, AppError> {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            return Err(AppError::invalid_input("description is required"));
        }

        let created_at = timestamp::now()?;
        let task = Task::new(self.state.next_id, trimmed, created_at);
        self.state.next_id += 1;
        self.state.tasks.push(task.clone());
        self.save()?;

        Ok(task)
    }

    pub fn view(&self) -> TaskListView<'_> {
        TaskListView::new(&self.state.tasks)
    }

    pub fn complete(&mut self, id: i64) -> Result<Task, AppError> {
        self.complete_at(id, timestamp::now)
    }

    fn complete_at(
        &mut self,
        id: i64,
        clock: impl FnOnce() -> Result<String, AppError>,
    ) -> Result<Task, AppError> {
        let task = self
            .state
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(AppError::NotFound { id })?;

        if task.completed {
            return Err(AppError::AlreadyCompleted {
                description: task.description.clone(),
            });
        }

        // Stamp first so a clock failure leaves the task untouched.
        let completed_at = clock()?;
        task.completed = true;
        task.completed_at = Some(completed_at);
        let updated = task.clone();
        self.save()?;

        Ok(updated)
    }

    pub fn delete(&mut self, id: i64) -> Result<Task, AppError> {
        let index = self
            .state
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(AppError::NotFound { id })?;

        let removed = self.state.tasks.remove(index);
        self.save()?;

        Ok(removed)
    }

    /// Drops every completed task and returns how many went. Always saves.
    pub fn clear_completed(&mut self) -> Result<usize, AppError> {
        let initial_count = self.state.tasks.len();
        self.state.tasks.retain(|task| !task.completed);
        let removed = initial_count - self.state.tasks.len();
        self.save()?;

        Ok(removed)
    }
}
