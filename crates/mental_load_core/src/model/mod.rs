pub mod fields;
pub mod input;
pub mod task;

pub use fields::{Category, Label, Priority, Reminder, ReminderSet, RepeatRule};
pub use input::{TaskInput, TaskPatch};
pub use task::{Task, TaskId};
