use crate::error::AppError;
use crate::model::TaskId;
use crate::storage::{ID_COUNTER_KEY, KeyValueStore};

const FIRST_ID: TaskId = 1;

/// Hands out task ids from a persisted counter. Ids only ever grow; wiping
/// the task list leaves the counter where it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next: TaskId,
}

impl IdAllocator {
    /// Reads the persisted counter, starting at 1 when none exists.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self, AppError> {
        let next = match store.get(ID_COUNTER_KEY)? {
            Some(raw) => raw.trim().parse::<TaskId>().map_err(|_| {
                AppError::invalid_data(format!("{ID_COUNTER_KEY} must be a decimal integer"))
            })?,
            None => FIRST_ID,
        };

        Ok(Self {
            next: next.max(FIRST_ID),
        })
    }

    /// Never hand out an id at or below one already in use. A raised floor
    /// is persisted before it is adopted, so it outlives the tasks that
    /// forced it.
    pub fn reserve_above<S: KeyValueStore + ?Sized>(
        &mut self,
        highest_in_use: TaskId,
        store: &mut S,
    ) -> Result<(), AppError> {
        let floor = highest_in_use
            .checked_add(1)
            .ok_or_else(|| AppError::invalid_data("task id counter overflowed"))?;
        if floor <= self.next {
            return Ok(());
        }

        store.set(ID_COUNTER_KEY, &floor.to_string())?;
        self.next = floor;
        Ok(())
    }

    pub fn peek(&self) -> TaskId {
        self.next
    }

    /// Returns the current counter value after persisting its successor.
    /// On a failed write the counter is left unchanged.
    pub fn next_id<S: KeyValueStore + ?Sized>(&mut self, store: &mut S) -> Result<TaskId, AppError> {
        let id = self.next;
        let following = id
            .checked_add(1)
            .ok_or_else(|| AppError::invalid_data("task id counter overflowed"))?;

        store.set(ID_COUNTER_KEY, &following.to_string())?;
        self.next = following;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::IdAllocator;
    use crate::storage::{ID_COUNTER_KEY, KeyValueStore, MemoryStore};

    #[test]
    fn cold_start_begins_at_one() {
        let mut store = MemoryStore::new();
        let mut ids = IdAllocator::load(&store).unwrap();

        assert_eq!(ids.next_id(&mut store).unwrap(), 1);
        assert_eq!(ids.next_id(&mut store).unwrap(), 2);
        assert_eq!(store.get(ID_COUNTER_KEY).unwrap().as_deref(), Some("3"));
    }

    #[test]
    fn resumes_from_persisted_counter() {
        let mut store = MemoryStore::new();
        store.set(ID_COUNTER_KEY, "42").unwrap();

        let mut ids = IdAllocator::load(&store).unwrap();
        assert_eq!(ids.next_id(&mut store).unwrap(), 42);
    }

    #[test]
    fn reserve_above_skips_ids_in_use() {
        let mut store = MemoryStore::new();
        store.set(ID_COUNTER_KEY, "2").unwrap();

        let mut ids = IdAllocator::load(&store).unwrap();
        ids.reserve_above(9, &mut store).unwrap();
        assert_eq!(ids.peek(), 10);
        assert_eq!(store.get(ID_COUNTER_KEY).unwrap().as_deref(), Some("10"));

        ids.reserve_above(3, &mut store).unwrap();
        assert_eq!(ids.next_id(&mut store).unwrap(), 10);
    }

    #[test]
    fn reserve_above_leaves_a_higher_counter_untouched() {
        let mut store = MemoryStore::new();
        store.set(ID_COUNTER_KEY, "12").unwrap();

        let mut ids = IdAllocator::load(&store).unwrap();
        ids.reserve_above(4, &mut store).unwrap();

        assert_eq!(ids.peek(), 12);
        assert_eq!(store.get(ID_COUNTER_KEY).unwrap().as_deref(), Some("12"));
    }

    #[test]
    fn reserved_floor_survives_a_reload() {
        let mut store = MemoryStore::new();
        let mut ids = IdAllocator::load(&store).unwrap();
        ids.reserve_above(7, &mut store).unwrap();

        let mut reloaded = IdAllocator::load(&store).unwrap();
        assert_eq!(reloaded.next_id(&mut store).unwrap(), 8);
    }

    #[test]
    fn rejects_non_numeric_counter() {
        let mut store = MemoryStore::new();
        store.set(ID_COUNTER_KEY, "seven").unwrap();

        let err = IdAllocator::load(&store).unwrap_err();
        assert_eq!(err.code(), "invalid_data");
    }
}
