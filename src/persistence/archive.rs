use super::error::StorageError;
use super::store::ArchiveStore;
use crate::domain::{Task, TaskId};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Date format used for archive keys
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Snapshots of each day's task list, keyed by calendar date
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayArchive {
    days: BTreeMap<NaiveDate, Vec<Task>>,
}

impl DayArchive {
    /// Restore the archive from `store`.
    ///
    /// Missing, unreadable or malformed data all yield an empty archive;
    /// the problem is logged rather than surfaced.
    pub fn load(store: &dyn ArchiveStore) -> Self {
        match store.load() {
            Ok(None) => Self::default(),
            Ok(Some(raw)) => Self::from_json(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Ignoring malformed task history");
                Self::default()
            }),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read task history");
                Self::default()
            }
        }
    }

    /// Write the full mapping to `store`. An empty archive is never written,
    /// so a session without activity cannot wipe earlier data.
    /// Returns whether anything was written.
    pub fn persist(&self, store: &dyn ArchiveStore) -> Result<bool, StorageError> {
        if self.days.is_empty() {
            return Ok(false);
        }
        store.save(&self.to_json()?)?;
        tracing::debug!(days = self.days.len(), "Task history persisted");
        Ok(true)
    }

    /// Parse the persisted layout: an object of "YYYY-MM-DD" -> [Task].
    /// Keys that are not valid dates are skipped.
    pub fn from_json(raw: &str) -> Result<Self, StorageError> {
        let wire: BTreeMap<String, Vec<Task>> = serde_json::from_str(raw)?;
        let mut days = BTreeMap::new();

        for (key, tasks) in wire {
            match NaiveDate::parse_from_str(&key, DATE_FORMAT) {
                Ok(date) if !tasks.is_empty() => {
                    days.insert(date, tasks);
                }
                Ok(_) => {}
                Err(_) => tracing::warn!(key = %key, "Skipping history entry with invalid date"),
            }
        }

        Ok(Self { days })
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        let wire: BTreeMap<String, &Vec<Task>> = self
            .days
            .iter()
            .map(|(date, tasks)| (date.format(DATE_FORMAT).to_string(), tasks))
            .collect();
        Ok(serde_json::to_string_pretty(&wire)?)
    }

    /// Store a full copy of `tasks` under `date`, replacing any earlier
    /// snapshot. Empty lists are not stored. Returns whether it was stored.
    pub fn snapshot(&mut self, date: NaiveDate, tasks: &[Task]) -> bool {
        if tasks.is_empty() {
            return false;
        }
        self.days.insert(date, tasks.to_vec());
        true
    }

    /// Copy of the snapshot for `date`
    pub fn restore(&self, date: NaiveDate) -> Option<Vec<Task>> {
        self.days.get(&date).cloned()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    /// Recorded dates, newest first
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.days.keys().rev().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Largest task id anywhere in the archive (0 if none)
    pub fn max_task_id(&self) -> TaskId {
        self.days
            .values()
            .flatten()
            .map(|task| task.id)
            .max()
            .unwrap_or(0)
    }

    /// Total seconds recorded for `date`
    pub fn day_total(&self, date: NaiveDate) -> u64 {
        self.days
            .get(&date)
            .map(|tasks| tasks.iter().map(|t| t.time_spent).sum())
            .unwrap_or(0)
    }
}
