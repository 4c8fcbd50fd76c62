use crate::domain::{Focus, Task, TaskId, TaskStore, Toggle, UiMode};
use crate::persistence::{ArchiveStore, DayArchive};
use crate::timer::{TimerEngine, TimerState};
use anyhow::Result;
use chrono::NaiveDate;
use std::time::{Duration, Instant};

/// What the input form submits to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Add,
    Rename(TaskId),
}

/// Input form state for adding or renaming a task
#[derive(Debug, Clone)]
pub struct InputFormState {
    pub kind: FormKind,
    pub text: String,
}

/// Main application state
///
/// Owns the viewed day's tasks, the archive of all days and the timer, and
/// only lets today's tasks change.
pub struct AppState {
    store: TaskStore,
    archive: DayArchive,
    timer: TimerEngine,
    persistence: Box<dyn ArchiveStore>,
    viewed_date: NaiveDate,
    today: NaiveDate,
    pub selected_index: usize,
    pub history_index: usize,
    pub focus: Focus,
    pub ui_mode: UiMode,
    pub input_form: Option<InputFormState>,
    pub needs_save: bool,
}

impl AppState {
    /// Restore the archive and open `today`
    pub fn new(persistence: Box<dyn ArchiveStore>, today: NaiveDate, tick_period: Duration) -> Self {
        let archive = DayArchive::load(persistence.as_ref());
        let tasks = archive.restore(today).unwrap_or_default();
        let store = TaskStore::new(tasks, archive.max_task_id());
        tracing::info!(days = archive.len(), %today, "Task history loaded");

        Self {
            store,
            archive,
            timer: TimerEngine::new(tick_period),
            persistence,
            viewed_date: today,
            today,
            selected_index: 0,
            history_index: 0,
            focus: Focus::Tasks,
            ui_mode: UiMode::Normal,
            input_form: None,
            needs_save: false,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn viewed_date(&self) -> NaiveDate {
        self.viewed_date
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn archive(&self) -> &DayArchive {
        &self.archive
    }

    pub fn timer_state(&self) -> TimerState {
        self.timer.state()
    }

    pub fn active_task(&self) -> Option<&Task> {
        self.store.active_id().and_then(|id| self.store.get(id))
    }

    /// Only today's tasks may be added, toggled or renamed
    pub fn is_read_only(&self) -> bool {
        self.viewed_date != self.today
    }

    /// Dates for the history pane, newest first. Today is always listed.
    pub fn history_dates(&self) -> Vec<NaiveDate> {
        let mut dates = self.archive.dates();
        if !self.archive.contains(self.today) {
            let pos = dates.partition_point(|d| *d > self.today);
            dates.insert(pos, self.today);
        }
        dates
    }

    /// How long the event loop may wait before the timer needs a tick
    pub fn until_next_tick(&self, now: Instant) -> Option<Duration> {
        self.timer.until_next_tick(now)
    }

    /// Record the viewed day's tasks in the archive
    fn record_snapshot(&mut self) {
        if self.archive.snapshot(self.viewed_date, self.store.tasks()) {
            self.needs_save = true;
        }
    }

    /// Bring the running task's time up to `now`. Returns whether it changed.
    fn sync_running(&mut self, now: Instant) -> bool {
        match self.timer.elapsed(now) {
            Some(elapsed) => self.store.set_time_spent(elapsed.task_id, elapsed.seconds),
            None => false,
        }
    }

    /// Freeze the running task, cancel the tick and deactivate everything
    fn halt(&mut self, now: Instant) {
        let synced = self.sync_running(now);
        self.timer.stop();
        let deactivated = self.store.deactivate_all();
        if synced || deactivated {
            self.record_snapshot();
        }
    }

    /// Add a task to today's list
    pub fn add_task(&mut self, name: &str) -> Option<TaskId> {
        if self.is_read_only() {
            return None;
        }

        let id = self.store.add_task(name)?;
        tracing::debug!(task_id = id, "Task added");
        self.record_snapshot();
        Some(id)
    }

    /// Start or stop the timer on a task
    pub fn toggle(&mut self, id: TaskId) {
        self.toggle_at(id, Instant::now());
    }

    pub fn toggle_at(&mut self, id: TaskId, now: Instant) {
        if self.is_read_only() || self.store.get(id).is_none() {
            return;
        }

        // The outgoing task keeps exactly the time it had at this instant
        self.sync_running(now);

        match self.store.toggle(id) {
            Toggle::Ignored => return,
            Toggle::Stopped(id) => {
                self.timer.stop();
                tracing::debug!(task_id = id, "Task deactivated");
            }
            Toggle::Started { id, replaced } => {
                self.timer.stop();
                let accumulated = self.store.get(id).map_or(0, |t| t.time_spent);
                self.timer.start(id, accumulated, now);
                tracing::debug!(task_id = id, ?replaced, "Task activated");
            }
        }

        self.record_snapshot();
    }

    /// Rename a task, keeping its old name in the history
    pub fn rename(&mut self, id: TaskId, new_name: &str) -> bool {
        if self.is_read_only() || !self.store.rename(id, new_name) {
            return false;
        }

        tracing::debug!(task_id = id, "Task renamed");
        self.record_snapshot();
        true
    }

    /// View another day. Always stops the timer; the loaded day never has an
    /// active task.
    pub fn select_day(&mut self, date: NaiveDate) {
        self.select_day_at(date, Instant::now());
    }

    pub fn select_day_at(&mut self, date: NaiveDate, now: Instant) {
        self.halt(now);

        let tasks = self.archive.restore(date).unwrap_or_default();
        self.store.load_day(tasks);
        self.viewed_date = date;
        self.selected_index = 0;
        tracing::debug!(%date, read_only = self.is_read_only(), "Day selected");
    }

    /// Advance the timer and watch for midnight
    pub fn tick(&mut self) {
        self.tick_at(Instant::now(), chrono::Local::now().date_naive());
    }

    pub fn tick_at(&mut self, now: Instant, today: NaiveDate) {
        self.roll_over(today, now);

        if let Some(elapsed) = self.timer.tick(now) {
            if self.store.set_time_spent(elapsed.task_id, elapsed.seconds) {
                self.record_snapshot();
            }
        }
    }

    /// Handle the calendar date changing under a running session
    fn roll_over(&mut self, today: NaiveDate, now: Instant) {
        if today == self.today {
            return;
        }

        tracing::info!(from = %self.today, to = %today, "Day changed");
        let was_live = !self.is_read_only();
        self.today = today;
        if was_live {
            // The old day is history now; finish it with nothing running
            self.halt(now);
        }
    }

    /// Freeze timers before exit
    pub fn shutdown(&mut self) {
        self.halt(Instant::now());
    }

    /// Persist the archive if it changed
    pub fn save(&mut self) -> Result<()> {
        if !self.needs_save {
            return Ok(());
        }
        self.archive.persist(self.persistence.as_ref())?;
        self.needs_save = false;
        Ok(())
    }

    /// Currently selected task in the list
    pub fn selected_task(&self) -> Option<&Task> {
        self.store.tasks().get(self.selected_index)
    }

    pub fn move_selection_up(&mut self) {
        match self.focus {
            Focus::Tasks => self.selected_index = self.selected_index.saturating_sub(1),
            Focus::History => self.history_index = self.history_index.saturating_sub(1),
        }
    }

    pub fn move_selection_down(&mut self) {
        match self.focus {
            Focus::Tasks => {
                if self.selected_index + 1 < self.store.len() {
                    self.selected_index += 1;
                }
            }
            Focus::History => {
                if self.history_index + 1 < self.history_dates().len() {
                    self.history_index += 1;
                }
            }
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.next();
    }

    /// Toggle the selected task
    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_task().map(|t| t.id) {
            self.toggle(id);
        }
    }

    /// View the day highlighted in the history pane
    pub fn open_history_entry(&mut self) {
        if let Some(date) = self.history_dates().get(self.history_index).copied() {
            self.select_day(date);
            self.focus = Focus::Tasks;
        }
    }

    /// Jump back to today
    pub fn go_to_today(&mut self) {
        if self.is_read_only() {
            self.select_day(self.today);
        }
        self.history_index = self
            .history_dates()
            .iter()
            .position(|d| *d == self.today)
            .unwrap_or(0);
    }

    /// Open the form for a new task
    pub fn start_add_task(&mut self) {
        if self.is_read_only() {
            return;
        }
        self.ui_mode = UiMode::AddingTask;
        self.input_form = Some(InputFormState {
            kind: FormKind::Add,
            text: String::new(),
        });
    }

    /// Open the form pre-filled with the selected task's name
    pub fn start_rename_task(&mut self) {
        if self.is_read_only() {
            return;
        }
        if let Some(task) = self.selected_task() {
            let form = InputFormState {
                kind: FormKind::Rename(task.id),
                text: task.name.clone(),
            };
            self.ui_mode = UiMode::RenamingTask;
            self.input_form = Some(form);
        }
    }

    pub fn input_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.input_form {
            form.text.push(c);
        }
    }

    pub fn input_form_backspace(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.text.pop();
        }
    }

    /// Apply the form and close it
    pub fn submit_input_form(&mut self) {
        if let Some(form) = self.input_form.take() {
            match form.kind {
                FormKind::Add => {
                    if self.add_task(&form.text).is_some() {
                        self.selected_index = self.store.len().saturating_sub(1);
                    }
                }
                FormKind::Rename(id) => {
                    self.rename(id, &form.text);
                }
            }
        }
        self.ui_mode = UiMode::Normal;
    }

    pub fn cancel_input_form(&mut self) {
        self.input_form = None;
        self.ui_mode = UiMode::Normal;
    }
}
