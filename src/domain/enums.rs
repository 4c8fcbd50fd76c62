/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    AddingTask,
    RenamingTask,
}

/// Which pane receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Tasks,
    History,
}

impl Focus {
    /// The other pane
    pub fn next(self) -> Self {
        match self {
            Focus::Tasks => Focus::History,
            Focus::History => Focus::Tasks,
        }
    }
}
