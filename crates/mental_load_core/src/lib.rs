pub mod config;
pub mod error;
pub mod id_alloc;
pub mod model;
pub mod organizer;
pub mod storage;
pub mod store;
pub mod task_api;

pub use error::AppError;
pub use organizer::{GroupedTasks, TaskFilter, organize};
pub use store::TaskStore;

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::model::{Category, Priority, ReminderSet, RepeatRule, Task};

    #[test]
    fn task_has_required_fields() {
        let task = Task {
            id: 1,
            name: "demo".to_string(),
            category: Category::Other,
            priority: Priority::default(),
            scheduled_date: "2025-12-20".to_string(),
            repeat_rule: RepeatRule::default(),
            reminder: ReminderSet::default(),
            completed: false,
        };

        assert_eq!(task.id, 1);
        assert_eq!(task.name, "demo");
        assert_eq!(task.priority, Priority::NotImportant);
        assert_eq!(task.repeat_rule, RepeatRule::Never);
        assert!(task.reminder.is_empty());
        assert!(!task.completed);
    }

    #[test]
    fn app_error_exposes_code() {
        let err = AppError::validation("missing name");
        assert_eq!(err.code(), "validation_error");
        assert_eq!(err.to_string(), "validation_error - missing name");
        assert!(err.is_recoverable());

        let err = AppError::not_found(3);
        assert_eq!(err.to_string(), "not_found - task 3 not found");

        let err = AppError::io("disk full");
        assert_eq!(err.code(), "io_error");
        assert!(!err.is_recoverable());
    }
}
