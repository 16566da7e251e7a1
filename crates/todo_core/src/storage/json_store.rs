use crate::error::AppError;
use crate::model::Task;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const STORE_FILE_NAME: &str = "tasks.json";
pub const STORE_ENV_VAR: &str = "TODOAPP_STORE_PATH";

#[derive(Debug, Serialize, Deserialize)]
struct StoredTasks {
    next_id: i64,
    tasks: Vec<Task>,
}

// Files written before the id counter existed are a bare task array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredFile {
    Counted(StoredTasks),
    Bare(Vec<Task>),
}

/// The persisted collection: tasks in insertion order plus the next id to hand out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskState {
    pub tasks: Vec<Task>,
    pub next_id: i64,
}

impl Default for TaskState {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
        }
    }
}

impl TaskState {
    /// The counter never falls behind a stored id, whatever the file claims.
    fn from_stored(tasks: Vec<Task>, next_id: i64) -> Self {
        let past_highest = tasks.iter().map(|task| task.id).max().unwrap_or(0) + 1;
        Self {
            next_id: next_id.max(past_highest).max(1),
            tasks,
        }
    }
}

/// Resolves the backing file: explicit path, then `TODOAPP_STORE_PATH`, then the
/// configured path, then `tasks.json` in the working directory.
pub fn store_path(explicit: Option<&Path>, configured: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return PathBuf::from(path);
    }

    configured
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(STORE_FILE_NAME))
}

pub fn load_tasks(path: &Path) -> Result<Vec<Task>, AppError> {
    Ok(load_state(path)?.tasks)
}

pub fn load_state(path: &Path) -> Result<TaskState, AppError> {
    if !path.exists() {
        return Ok(TaskState::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let stored: StoredFile = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;

    Ok(match stored {
        StoredFile::Counted(stored) => TaskState::from_stored(stored.tasks, stored.next_id),
        StoredFile::Bare(tasks) => TaskState::from_stored(tasks, 1),
    })
}

/// Best-effort load: a missing, unreadable or malformed file yields no tasks.
pub fn load_state_or_default(path: &Path) -> TaskState {
    if !path.exists() {
        debug!("no task file at {}, starting empty", path.display());
        return TaskState::default();
    }

    match load_state(path) {
        Ok(state) => {
            debug!(
                "loaded {} task(s) from {}, next id {}",
                state.tasks.len(),
                path.display(),
                state.next_id
            );
            state
        }
        Err(err) => {
            warn!("ignoring unusable task file: {err}");
            TaskState::default()
        }
    }
}

pub fn save_state(path: &Path, state: &TaskState) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    let stored = StoredTasks {
        next_id: state.next_id,
        tasks: state.tasks.clone(),
    };
    let content = serde_json::to_string_pretty(&stored)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    std::fs::write(path, content)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions).map_err(|err| AppError::io(err.to_string()))?;
    }

    debug!("saved {} task(s) to {}", state.tasks.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{TaskState, load_state, load_state_or_default, load_tasks, save_state, store_path};
    use crate::model::Task;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("todoapp-{nanos}-{file_name}"))
    }

    fn completed_task() -> Task {
        Task {
            id: 2,
            description: "walk dog".to_string(),
            completed: true,
            created_at: "2025-12-20 08:00:00".to_string(),
            completed_at: Some("2025-12-20 09:30:00".to_string()),
        }
    }

    #[test]
    fn save_and_load_round_trip() {
        let path = temp_path("tasks.json");
        let state = TaskState {
            tasks: vec![
                Task::new(1, "buy milk", "2025-12-20 07:00:00"),
                completed_task(),
            ],
            next_id: 5,
        };

        save_state(&path, &state).unwrap();
        let loaded = load_state(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded, state);
    }

    #[test]
    fn save_writes_pretty_envelope_and_omits_pending_completed_at() {
        let path = temp_path("layout.json");
        let state = TaskState {
            tasks: vec![Task::new(1, "buy milk", "2025-12-20 07:00:00")],
            next_id: 2,
        };
        save_state(&path, &state).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();

        let expected = "{\n  \"next_id\": 2,\n  \"tasks\": [\n    {\n      \"id\": 1,\n      \"description\": \"buy milk\",\n      \"completed\": false,\n      \"created_at\": \"2025-12-20 07:00:00\"\n    }\n  ]\n}";
        assert_eq!(content, expected);
    }

    #[test]
    fn save_keeps_completed_at_for_completed_tasks() {
        let path = temp_path("completed.json");
        let state = TaskState {
            tasks: vec![completed_task()],
            next_id: 3,
        };
        save_state(&path, &state).unwrap();
        let stored: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(stored["tasks"][0]["completed"], true);
        assert_eq!(stored["tasks"][0]["completed_at"], "2025-12-20 09:30:00");
    }

    #[test]
    fn bare_array_loads_with_counter_past_highest_id() {
        let path = temp_path("bare.json");
        let content = "[\n  {\n    \"id\": 4,\n    \"description\": \"demo\",\n    \"completed\": false,\n    \"created_at\": \"2025-12-20 00:00:00\"\n  }\n]";
        fs::write(&path, content).unwrap();

        let loaded = load_state(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.tasks.len(), 1);
        assert_eq!(loaded.tasks[0].id, 4);
        assert_eq!(loaded.next_id, 5);
    }

    #[test]
    fn stale_counter_is_raised_past_stored_ids() {
        let path = temp_path("stale-counter.json");
        let content = "{\"next_id\": 1, \"tasks\": [{\"id\": 9, \"description\": \"demo\", \"created_at\": \"2025-12-20 00:00:00\"}]}";
        fs::write(&path, content).unwrap();

        let loaded = load_state(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.next_id, 10);
    }

    #[test]
    fn load_missing_file_is_empty() {
        let path = temp_path("missing.json");
        assert_eq!(load_state(&path).unwrap(), TaskState::default());
        assert_eq!(load_state_or_default(&path).next_id, 1);
    }

    #[test]
    fn load_rejects_malformed_json() {
        let path = temp_path("malformed.json");
        fs::write(&path, "[{ not json").unwrap();

        let err = load_state(&path).unwrap_err();
        let fallback = load_state_or_default(&path);
        fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_data");
        assert_eq!(fallback, TaskState::default());
    }

    #[test]
    fn load_rejects_wrong_shape() {
        let path = temp_path("wrong-shape.json");
        fs::write(&path, "{\"items\": []}").unwrap();

        let fallback = load_state_or_default(&path);
        fs::remove_file(&path).ok();

        assert!(fallback.tasks.is_empty());
    }

    #[test]
    fn load_defaults_missing_completed_flag() {
        let path = temp_path("no-completed.json");
        let content = "[\n  {\n    \"id\": 7,\n    \"description\": \"demo\",\n    \"created_at\": \"2025-12-20 00:00:00\"\n  }\n]";
        fs::write(&path, content).unwrap();

        let loaded = load_tasks(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.len(), 1);
        assert!(!loaded[0].completed);
        assert_eq!(loaded[0].completed_at, None);
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = temp_path("nested");
        let path = dir.join("inner").join("tasks.json");

        save_state(&path, &TaskState::default()).unwrap();
        let loaded = load_state(&path).unwrap();
        fs::remove_dir_all(&dir).ok();

        assert_eq!(loaded, TaskState::default());
    }

    #[test]
    fn explicit_store_path_wins() {
        let explicit = Path::new("/tmp/explicit.json");
        let configured = Path::new("/tmp/configured.json");
        assert_eq!(
            store_path(Some(explicit), Some(configured)),
            PathBuf::from("/tmp/explicit.json")
        );
    }
}
