pub mod archive;
pub mod config;
pub mod error;
pub mod files;
pub mod store;

pub use archive::{DayArchive, DATE_FORMAT};
pub use config::{load_config, save_config, AppConfig};
pub use files::{
    archive_file, atomic_write, config_file, ensure_data_dir, init_local_dir, log_file,
};
pub use store::{ArchiveStore, JsonFileStore};
#[cfg(test)]
pub use store::MemoryStore;
