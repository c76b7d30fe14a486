use crate::error::AppError;
use crate::id_alloc::IdAllocator;
use crate::model::input::parse_date;
use crate::model::{Task, TaskId, TaskInput, TaskPatch};
use crate::storage::{KeyValueStore, TASKS_KEY};
use std::collections::HashSet;

/// The authoritative task collection, written through to its storage on
/// every mutation.
///
/// Mutations build the next collection aside, persist it, and only then
/// replace the in-memory one, so a failed write leaves memory matching what
/// was last stored.
#[derive(Debug)]
pub struct TaskStore<S> {
    adapter: S,
    tasks: Vec<Task>,
    ids: IdAllocator,
}

impl<S: KeyValueStore> TaskStore<S> {
    pub fn open(mut adapter: S) -> Result<Self, AppError> {
        let tasks = load_tasks(&adapter)?;
        let mut ids = IdAllocator::load(&adapter)?;
        if let Some(highest) = tasks.iter().map(|task| task.id).max() {
            ids.reserve_above(highest, &mut adapter)?;
        }

        Ok(Self {
            adapter,
            tasks,
            ids,
        })
    }

    /// Tasks in insertion order.
    pub fn list_tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get_task(&self, id: TaskId) -> Result<&Task, AppError> {
        self.tasks
            .iter()
            .find(|task| task.id == id)
            .ok_or_else(|| AppError::not_found(id))
    }

    /// The id the next created task will receive.
    pub fn upcoming_id(&self) -> TaskId {
        self.ids.peek()
    }

    pub fn create_task(&mut self, input: &TaskInput) -> Result<Task, AppError> {
        let draft = input.validate()?;
        let id = self.ids.next_id(&mut self.adapter)?;
        let task = draft.into_task(id);

        let mut next = self.tasks.clone();
        next.push(task.clone());
        self.commit(next)?;

        Ok(task)
    }

    pub fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> Result<Task, AppError> {
        let index = self.position(id)?;
        let patch = patch.validate()?;

        let mut next = self.tasks.clone();
        patch.apply_to(&mut next[index]);
        let updated = next[index].clone();
        self.commit(next)?;

        Ok(updated)
    }

    pub fn delete_task(&mut self, id: TaskId) -> Result<Task, AppError> {
        let index = self.position(id)?;

        let mut next = self.tasks.clone();
        let removed = next.remove(index);
        self.commit(next)?;

        Ok(removed)
    }

    pub fn toggle_completion(&mut self, id: TaskId) -> Result<Task, AppError> {
        let index = self.position(id)?;

        let mut next = self.tasks.clone();
        next[index].completed = !next[index].completed;
        let updated = next[index].clone();
        self.commit(next)?;

        Ok(updated)
    }

    /// Drops every task and its stored record. The id counter survives.
    pub fn clear_all(&mut self) -> Result<(), AppError> {
        self.adapter.remove(TASKS_KEY)?;
        self.tasks.clear();
        Ok(())
    }

    pub fn adapter(&self) -> &S {
        &self.adapter
    }

    pub fn into_inner(self) -> S {
        self.adapter
    }

    fn position(&self, id: TaskId) -> Result<usize, AppError> {
        self.tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| AppError::not_found(id))
    }

    fn commit(&mut self, tasks: Vec<Task>) -> Result<(), AppError> {
        save_tasks(&mut self.adapter, &tasks)?;
        self.tasks = tasks;
        Ok(())
    }
}

/// Reads the stored collection. Records written by older app versions are
/// normalized while deserializing; duplicate ids are rejected.
pub fn load_tasks<S: KeyValueStore + ?Sized>(store: &S) -> Result<Vec<Task>, AppError> {
    let raw = match store.get(TASKS_KEY)? {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(Vec::new()),
    };

    let tasks: Vec<Task> =
        serde_json::from_str(&raw).map_err(|err| AppError::invalid_data(err.to_string()))?;

    let mut seen = HashSet::with_capacity(tasks.len());
    for task in &tasks {
        check_stored(task)?;
        if !seen.insert(task.id) {
            return Err(AppError::invalid_data(format!(
                "duplicate task id {}",
                task.id
            )));
        }
    }

    Ok(tasks)
}

fn check_stored(task: &Task) -> Result<(), AppError> {
    if task.id == 0 {
        return Err(AppError::invalid_data("stored task has id 0"));
    }
    if task.name.trim().is_empty() {
        return Err(AppError::invalid_data(format!(
            "task {} has an empty name",
            task.id
        )));
    }
    parse_date(&task.scheduled_date).map_err(|_| {
        AppError::invalid_data(format!(
            "task {} has invalid scheduled date '{}'",
            task.id, task.scheduled_date
        ))
    })?;
    Ok(())
}

pub fn save_tasks<S: KeyValueStore + ?Sized>(store: &mut S, tasks: &[Task]) -> Result<(), AppError> {
    let content =
        serde_json::to_string(tasks).map_err(|err| AppError::invalid_data(err.to_string()))?;
    store.set(TASKS_KEY, &content)
}
