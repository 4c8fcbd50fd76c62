use serde::{Deserialize, Serialize};

/// Numeric task identifier, unique across the whole archive
pub type TaskId = u64;

/// A named task tracked for a single day
///
/// Field names follow the persisted layout (`timeSpent`, `isActive`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Assigned at creation, never changes
    pub id: TaskId,
    /// Current display name
    pub name: String,
    /// Whole seconds accumulated while active
    pub time_spent: u64,
    /// Whether this task is the one currently accruing time
    pub is_active: bool,
    /// Names this task held before each rename, oldest first
    #[serde(default)]
    pub previous_names: Vec<String>,
    /// Set on the first rename and never cleared
    #[serde(default)]
    pub edited: bool,
}

impl Task {
    pub fn new(id: TaskId, name: String) -> Self {
        Self {
            id,
            name,
            time_spent: 0,
            is_active: false,
            previous_names: Vec::new(),
            edited: false,
        }
    }

    /// Rename this task, recording the old name in its history.
    ///
    /// Names are compared after trimming; if they match nothing changes and
    /// `false` is returned. The new name is stored trimmed and may be empty.
    pub fn rename(&mut self, new_name: &str) -> bool {
        let trimmed = new_name.trim();
        if trimmed == self.name.trim() {
            return false;
        }

        let old = std::mem::replace(&mut self.name, trimmed.to_string());
        self.previous_names.push(old);
        self.edited = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_task_new() {
        let task = Task::new(7, "Write report".to_string());
        assert_eq!(task.id, 7);
        assert_eq!(task.name, "Write report");
        assert_eq!(task.time_spent, 0);
        assert!(!task.is_active);
        assert!(task.previous_names.is_empty());
        assert!(!task.edited);
    }

    #[test]
    fn test_rename_records_history() {
        let mut task = Task::new(1, "Foo".to_string());
        assert!(task.rename("Bar"));
        assert_eq!(task.name, "Bar");
        assert_eq!(task.previous_names, vec!["Foo".to_string()]);
        assert!(task.edited);
    }

    #[test]
    fn test_rename_same_trimmed_name_is_noop() {
        let mut task = Task::new(1, "Foo".to_string());
        assert!(!task.rename("  Foo  "));
        assert_eq!(task.name, "Foo");
        assert!(task.previous_names.is_empty());
        assert!(!task.edited);
    }

    #[test]
    fn test_rename_keeps_untrimmed_old_name() {
        // Data written by older versions may carry surrounding whitespace
        let mut task = Task::new(1, " Foo ".to_string());
        assert!(!task.rename("Foo"));

        assert!(task.rename("  Bar "));
        assert_eq!(task.name, "Bar");
        assert_eq!(task.previous_names, vec![" Foo ".to_string()]);
    }

    #[test]
    fn test_rename_to_empty_is_recorded() {
        let mut task = Task::new(1, "Foo".to_string());
        assert!(task.rename("   "));
        assert_eq!(task.name, "");
        assert_eq!(task.previous_names, vec!["Foo".to_string()]);
        assert!(task.edited);
    }

    #[test]
    fn test_task_json_layout() {
        let mut task = Task::new(1700000000000, "Review".to_string());
        task.time_spent = 42;
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": 1700000000000u64,
                "name": "Review",
                "timeSpent": 42,
                "isActive": false,
                "previousNames": [],
                "edited": false
            })
        );
    }

    #[test]
    fn test_task_json_missing_history_fields() {
        let task: Task =
            serde_json::from_str(r#"{"id":3,"name":"Old","timeSpent":9,"isActive":true}"#).unwrap();
        assert!(task.previous_names.is_empty());
        assert!(!task.edited);
        assert!(task.is_active);
    }
}
