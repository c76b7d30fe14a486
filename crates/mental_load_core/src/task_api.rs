//! One-call operations against a file-backed store, for shells that do not
//! keep a [`TaskStore`] alive between user actions.

use crate::error::AppError;
use crate::model::{Category, Task, TaskId, TaskInput, TaskPatch};
use crate::organizer::{TaskFilter, filter_tasks, organize};
use crate::storage::JsonFileStore;
use crate::store::TaskStore;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    pub category: Category,
    pub tasks: Vec<Task>,
}

/// The grouped list view plus the totals shown above it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskOverview {
    pub groups: Vec<CategoryGroup>,
    pub total: usize,
    pub completed: usize,
}

pub fn open_store(path: &Path) -> Result<TaskStore<JsonFileStore>, AppError> {
    TaskStore::open(JsonFileStore::open(path)?)
}

pub fn add_task(path: &Path, input: &TaskInput) -> Result<Task, AppError> {
    open_store(path)?.create_task(input)
}

pub fn edit_task(path: &Path, id: TaskId, patch: &TaskPatch) -> Result<Task, AppError> {
    if patch.is_empty() {
        return Err(AppError::validation("nothing to update"));
    }
    open_store(path)?.update_task(id, patch)
}

pub fn delete_task(path: &Path, id: TaskId) -> Result<Task, AppError> {
    open_store(path)?.delete_task(id)
}

pub fn toggle_task(path: &Path, id: TaskId) -> Result<Task, AppError> {
    open_store(path)?.toggle_completion(id)
}

/// Removes every task and returns how many there were.
pub fn clear_tasks(path: &Path) -> Result<usize, AppError> {
    let mut store = open_store(path)?;
    let removed = store.list_tasks().len();
    store.clear_all()?;
    Ok(removed)
}

pub fn get_task(path: &Path, id: TaskId) -> Result<Task, AppError> {
    open_store(path)?.get_task(id).cloned()
}

pub fn overview(path: &Path, filter: &TaskFilter) -> Result<TaskOverview, AppError> {
    let store = open_store(path)?;
    Ok(build_overview(store.list_tasks(), filter))
}

fn build_overview(tasks: &[Task], filter: &TaskFilter) -> TaskOverview {
    let visible = filter_tasks(tasks, filter);
    let total = visible.len();
    let completed = visible.iter().filter(|task| task.completed).count();

    let groups = organize(visible)
        .into_iter()
        .map(|(category, tasks)| CategoryGroup {
            category,
            tasks: tasks.into_iter().cloned().collect(),
        })
        .collect();

    TaskOverview {
        groups,
        total,
        completed,
    }
}
