use super::task::{Task, TaskId};
use chrono::Utc;

/// Result of toggling a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// Unknown id, nothing changed
    Ignored,
    /// The task was active and has been deactivated
    Stopped(TaskId),
    /// The task is now active; `replaced` was deactivated first
    Started {
        id: TaskId,
        replaced: Option<TaskId>,
    },
}

/// The task list of the day currently being viewed
///
/// Keeps at most one task active. Has no notion of dates; the app decides
/// which day is loaded and whether it may be mutated.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    /// Largest id handed out or seen so far
    last_id: TaskId,
}

impl TaskStore {
    /// Create a store for `tasks`, never issuing ids at or below `id_floor`
    pub fn new(tasks: Vec<Task>, id_floor: TaskId) -> Self {
        let mut store = Self {
            tasks: Vec::new(),
            last_id: id_floor,
        };
        store.load_day(tasks);
        store
    }

    /// Replace the loaded tasks with another day's snapshot.
    /// Every task comes in inactive; a revisited day never resumes a timer.
    pub fn load_day(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        for task in &mut self.tasks {
            task.is_active = false;
            self.last_id = self.last_id.max(task.id);
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Id of the active task, if any
    pub fn active_id(&self) -> Option<TaskId> {
        self.tasks.iter().find(|t| t.is_active).map(|t| t.id)
    }

    /// Append a new task. Whitespace-only names are ignored.
    pub fn add_task(&mut self, name: &str) -> Option<TaskId> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let Some(id) = self.next_id() else {
            tracing::warn!(last_id = self.last_id, "task id space exhausted");
            return None;
        };
        self.tasks.push(Task::new(id, name.to_string()));
        Some(id)
    }

    /// Millisecond timestamp, bumped past every id already in use.
    /// `None` once the largest id in use is `u64::MAX`.
    fn next_id(&mut self) -> Option<TaskId> {
        let now_ms = Utc::now().timestamp_millis().max(0) as TaskId;
        let id = now_ms.max(self.last_id.checked_add(1)?);
        self.last_id = id;
        Some(id)
    }

    /// Toggle a task on or off. Activating a task deactivates the previously
    /// active one before the new one is switched on.
    pub fn toggle(&mut self, id: TaskId) -> Toggle {
        let Some(target) = self.get(id) else {
            return Toggle::Ignored;
        };

        if target.is_active {
            if let Some(task) = self.get_mut(id) {
                task.is_active = false;
            }
            return Toggle::Stopped(id);
        }

        let replaced = self.active_id();
        if let Some(prev) = replaced.and_then(|prev| self.get_mut(prev)) {
            prev.is_active = false;
        }
        if let Some(task) = self.get_mut(id) {
            task.is_active = true;
        }

        Toggle::Started { id, replaced }
    }

    /// Rename a task. Returns whether anything changed.
    pub fn rename(&mut self, id: TaskId, new_name: &str) -> bool {
        self.get_mut(id).is_some_and(|task| task.rename(new_name))
    }

    /// Overwrite a task's accumulated seconds. Returns whether the value changed.
    pub fn set_time_spent(&mut self, id: TaskId, seconds: u64) -> bool {
        match self.get_mut(id) {
            Some(task) if task.time_spent != seconds => {
                task.time_spent = seconds;
                true
            }
            _ => false,
        }
    }

    /// Deactivate every task. Returns whether any task was active.
    pub fn deactivate_all(&mut self) -> bool {
        let mut changed = false;
        for task in self.tasks.iter_mut().filter(|t| t.is_active) {
            task.is_active = false;
            changed = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn store_with(names: &[&str]) -> (TaskStore, Vec<TaskId>) {
        let mut store = TaskStore::default();
        let ids = names
            .iter()
            .map(|name| store.add_task(name).unwrap())
            .collect();
        (store, ids)
    }

    fn active_count(store: &TaskStore) -> usize {
        store.tasks().iter().filter(|t| t.is_active).count()
    }

    #[test]
    fn test_add_task() {
        let (store, ids) = store_with(&["  Write report  "]);
        let task = store.get(ids[0]).unwrap();
        assert_eq!(task.name, "Write report");
        assert_eq!(task.time_spent, 0);
        assert!(!task.is_active);
        assert!(!task.edited);
    }

    #[test]
    fn test_add_blank_task_is_noop() {
        let mut store = TaskStore::default();
        assert_eq!(store.add_task(""), None);
        assert_eq!(store.add_task("   \t"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let (store, ids) = store_with(&["a", "b", "c", "d"]);
        assert_eq!(store.len(), 4);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_ids_stay_above_floor() {
        let floor = u64::MAX / 2;
        let mut store = TaskStore::new(Vec::new(), floor);
        let id = store.add_task("x").unwrap();
        assert_eq!(id, floor + 1);
    }

    #[test]
    fn test_add_task_ignored_when_ids_exhausted() {
        let mut store = TaskStore::new(Vec::new(), u64::MAX);
        assert_eq!(store.add_task("x"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_day_forces_inactive() {
        let mut task = Task::new(10, "Running".to_string());
        task.is_active = true;
        let store = TaskStore::new(vec![task], 0);
        assert_eq!(store.active_id(), None);
        assert!(!store.get(10).unwrap().is_active);
    }

    #[test]
    fn test_toggle_on_and_off() {
        let (mut store, ids) = store_with(&["a"]);
        assert_eq!(
            store.toggle(ids[0]),
            Toggle::Started {
                id: ids[0],
                replaced: None
            }
        );
        assert_eq!(store.active_id(), Some(ids[0]));

        assert_eq!(store.toggle(ids[0]), Toggle::Stopped(ids[0]));
        assert_eq!(store.active_id(), None);
    }

    #[test]
    fn test_toggle_switches_active_task() {
        let (mut store, ids) = store_with(&["a", "b"]);
        store.toggle(ids[0]);
        assert_eq!(
            store.toggle(ids[1]),
            Toggle::Started {
                id: ids[1],
                replaced: Some(ids[0])
            }
        );
        assert!(!store.get(ids[0]).unwrap().is_active);
        assert!(store.get(ids[1]).unwrap().is_active);
    }

    #[test]
    fn test_toggle_unknown_id_is_ignored() {
        let (mut store, ids) = store_with(&["a"]);
        store.toggle(ids[0]);
        assert_eq!(store.toggle(ids[0] + 1000), Toggle::Ignored);
        assert_eq!(store.active_id(), Some(ids[0]));
    }

    #[test]
    fn test_rename() {
        let (mut store, ids) = store_with(&["Foo"]);
        assert!(store.rename(ids[0], "Bar"));
        let task = store.get(ids[0]).unwrap();
        assert_eq!(task.name, "Bar");
        assert_eq!(task.previous_names, vec!["Foo".to_string()]);
        assert!(task.edited);

        assert!(!store.rename(ids[0], " Bar "));
        assert_eq!(store.get(ids[0]).unwrap().previous_names.len(), 1);

        assert!(!store.rename(ids[0] + 1000, "Baz"));
    }

    #[test]
    fn test_set_time_spent_reports_change() {
        let (mut store, ids) = store_with(&["a"]);
        assert!(store.set_time_spent(ids[0], 3));
        assert!(!store.set_time_spent(ids[0], 3));
        assert_eq!(store.get(ids[0]).unwrap().time_spent, 3);
    }

    #[test]
    fn test_deactivate_all() {
        let (mut store, ids) = store_with(&["a", "b"]);
        assert!(!store.deactivate_all());
        store.toggle(ids[1]);
        assert!(store.deactivate_all());
        assert_eq!(store.active_id(), None);
    }

    proptest! {
        #[test]
        fn at_most_one_active_after_any_toggle_sequence(
            picks in proptest::collection::vec(0usize..6, 0..64)
        ) {
            let (mut store, ids) = store_with(&["a", "b", "c", "d", "e"]);
            for pick in picks {
                // index 5 is an id that does not exist
                let id = ids.get(pick).copied().unwrap_or(u64::MAX);
                let outcome = store.toggle(id);
                prop_assert!(active_count(&store) <= 1);
                if let Toggle::Started { id: started, .. } = outcome {
                    prop_assert_eq!(store.active_id(), Some(started));
                }
            }
        }
    }
}
