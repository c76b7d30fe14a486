use crate::error::AppError;
use crate::model::fields::{Category, Label, Priority, ReminderSet, RepeatRule};
use crate::model::task::{Task, TaskId};
use serde::{Deserialize, Serialize};
use time::Date;
use time::macros::format_description;

/// Raw values of a submitted "new task" form. Only `name`, `category` and
/// `scheduled_date` are mandatory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskInput {
    pub name: String,
    pub category: String,
    pub priority: Option<String>,
    pub scheduled_date: String,
    pub repeat_rule: Option<String>,
    pub reminder: Vec<String>,
}

impl TaskInput {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        scheduled_date: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            scheduled_date: scheduled_date.into(),
            ..Self::default()
        }
    }

    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn repeat_rule(mut self, repeat_rule: impl Into<String>) -> Self {
        self.repeat_rule = Some(repeat_rule.into());
        self
    }

    pub fn reminder(mut self, reminder: impl Into<String>) -> Self {
        self.reminder.push(reminder.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<TaskDraft, AppError> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.category.trim().is_empty() {
            missing.push("category");
        }
        if self.scheduled_date.trim().is_empty() {
            missing.push("scheduledDate");
        }
        if !missing.is_empty() {
            return Err(AppError::validation(format!(
                "missing required field(s): {}",
                missing.join(", ")
            )));
        }

        Ok(TaskDraft {
            name: self.name.trim().to_string(),
            category: Category::parse_label(&self.category)?,
            priority: parse_optional_priority(self.priority.as_deref())?,
            scheduled_date: parse_scheduled_date(&self.scheduled_date)?,
            repeat_rule: parse_optional_repeat(self.repeat_rule.as_deref())?,
            reminder: ReminderSet::parse(&self.reminder)?,
        })
    }
}

/// A validated [`TaskInput`] still waiting for its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TaskDraft {
    name: String,
    category: Category,
    priority: Priority,
    scheduled_date: String,
    repeat_rule: RepeatRule,
    reminder: ReminderSet,
}

impl TaskDraft {
    pub(crate) fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            name: self.name,
            category: self.category,
            priority: self.priority,
            scheduled_date: self.scheduled_date,
            repeat_rule: self.repeat_rule,
            reminder: self.reminder,
            completed: false,
        }
    }
}

/// Fields to replace on an existing task. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub scheduled_date: Option<String>,
    pub repeat_rule: Option<String>,
    pub reminder: Option<Vec<String>>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn validate(&self) -> Result<ValidPatch, AppError> {
        let name = match self.name.as_deref() {
            Some(raw) if raw.trim().is_empty() => {
                return Err(AppError::validation("name cannot be empty"));
            }
            Some(raw) => Some(raw.trim().to_string()),
            None => None,
        };

        Ok(ValidPatch {
            name,
            category: self
                .category
                .as_deref()
                .map(Category::parse_label)
                .transpose()?,
            priority: self
                .priority
                .as_deref()
                .map(Priority::parse_label)
                .transpose()?,
            scheduled_date: self
                .scheduled_date
                .as_deref()
                .map(parse_scheduled_date)
                .transpose()?,
            repeat_rule: self
                .repeat_rule
                .as_deref()
                .map(|raw| parse_optional_repeat(Some(raw)))
                .transpose()?,
            reminder: self.reminder.as_ref().map(ReminderSet::parse).transpose()?,
            completed: self.completed,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidPatch {
    name: Option<String>,
    category: Option<Category>,
    priority: Option<Priority>,
    scheduled_date: Option<String>,
    repeat_rule: Option<RepeatRule>,
    reminder: Option<ReminderSet>,
    completed: Option<bool>,
}

impl ValidPatch {
    pub(crate) fn apply_to(self, task: &mut Task) {
        if let Some(name) = self.name {
            task.name = name;
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(scheduled_date) = self.scheduled_date {
            task.scheduled_date = scheduled_date;
        }
        if let Some(repeat_rule) = self.repeat_rule {
            task.repeat_rule = repeat_rule;
        }
        if let Some(reminder) = self.reminder {
            task.reminder = reminder;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}

fn parse_optional_priority(raw: Option<&str>) -> Result<Priority, AppError> {
    match raw {
        Some(value) if !value.trim().is_empty() => Priority::parse_label(value),
        _ => Ok(Priority::default()),
    }
}

fn parse_optional_repeat(raw: Option<&str>) -> Result<RepeatRule, AppError> {
    match raw {
        Some(value) if !value.trim().is_empty() => RepeatRule::parse_label(value),
        _ => Ok(RepeatRule::default()),
    }
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> Result<Date, AppError> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(raw.trim(), format).map_err(|_| {
        AppError::validation(format!(
            "scheduled date must be a YYYY-MM-DD calendar date, got '{}'",
            raw.trim()
        ))
    })
}

pub fn format_date(date: Date) -> Result<String, AppError> {
    let format = format_description!("[year]-[month]-[day]");
    date.format(format)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

fn parse_scheduled_date(raw: &str) -> Result<String, AppError> {
    format_date(parse_date(raw)?)
}
