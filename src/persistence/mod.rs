pub mod adapter;
pub mod files;
pub mod metadata;
pub mod serializer;
pub mod storage;

pub use adapter::{load_tasks, save_tasks, seed_tasks, TASKS_KEY};
pub use files::{ensure_data_dir, init_local_data_dir, log_file};
pub use metadata::{load_filter, save_filter};
pub use storage::{FileStorage, MemoryStorage, Storage};
