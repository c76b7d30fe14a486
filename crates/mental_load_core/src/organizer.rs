//! Derives the grouped, display-ready view of a task collection.
//!
//! Everything here is a pure function of its input: tasks are borrowed, never
//! mutated, and the same collection always produces the same view.

use crate::error::AppError;
use crate::model::input::parse_date;
use crate::model::{Category, Task};
use std::collections::BTreeMap;
use time::Date;

/// Tasks grouped by category. Iteration follows the fixed category order;
/// categories without tasks are absent.
pub type GroupedTasks<'a> = BTreeMap<Category, Vec<&'a Task>>;

/// Groups `tasks` by category and orders each group: open tasks before
/// completed ones, then higher priority first, then insertion order.
pub fn organize<'a, I>(tasks: I) -> GroupedTasks<'a>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut groups: GroupedTasks<'a> = BTreeMap::new();
    for task in tasks {
        groups.entry(task.category).or_default().push(task);
    }

    for group in groups.values_mut() {
        // sort_by is stable, so equal keys keep insertion order.
        group.sort_by(|a, b| {
            a.completed
                .cmp(&b.completed)
                .then_with(|| b.priority.cmp(&a.priority))
        });
    }

    groups
}

/// Category and date criteria from the list's filter panel. An unset
/// criterion matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub category: Option<Category>,
    pub date: Option<Date>,
}

impl TaskFilter {
    pub fn parse(category: Option<&str>, date: Option<&str>) -> Result<Self, AppError> {
        let category = category
            .filter(|raw| !raw.trim().is_empty())
            .map(str::parse::<Category>)
            .transpose()?;
        let date = date
            .filter(|raw| !raw.trim().is_empty())
            .map(parse_date)
            .transpose()?;

        Ok(Self { category, date })
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.date.is_none()
    }

    pub fn matches(&self, task: &Task) -> bool {
        if let Some(category) = self.category
            && task.category != category
        {
            return false;
        }

        match self.date {
            Some(date) => parse_date(&task.scheduled_date).is_ok_and(|scheduled| scheduled == date),
            None => true,
        }
    }
}

/// The tasks matching `filter`, in input order.
pub fn filter_tasks<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    tasks.iter().filter(|task| filter.matches(task)).collect()
}
