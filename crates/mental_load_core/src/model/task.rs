use crate::model::fields::{Category, Priority, ReminderSet, RepeatRule};
use serde::{Deserialize, Serialize};

pub type TaskId = u64;

/// One to-do item. The legacy aliases let collections written by earlier
/// versions of the app load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    #[serde(alias = "taskName")]
    pub name: String,
    #[serde(alias = "categoryName")]
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    #[serde(alias = "chooseDate")]
    pub scheduled_date: String,
    #[serde(default, alias = "repeatTask")]
    pub repeat_rule: RepeatRule,
    #[serde(default, alias = "remind")]
    pub reminder: ReminderSet,
    #[serde(default, alias = "isChecked")]
    pub completed: bool,
}
