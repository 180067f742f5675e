//! File System Implementations

mod local;
mod run_lock;

pub use local::LocalFs;
pub use run_lock::{RunLock, LOCK_FILE};
