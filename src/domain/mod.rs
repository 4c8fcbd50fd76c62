pub mod enums;
pub mod format;
pub mod store;
pub mod task;

pub use enums::{Focus, UiMode};
pub use format::format_hms;
pub use store::{TaskStore, Toggle};
pub use task::{Task, TaskId};
