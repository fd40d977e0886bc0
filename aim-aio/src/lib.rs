// aim-aio/src/lib.rs
//! Filesystem, checksum, config persistence and process primitives for aim

pub mod checksum;
pub mod fs;
pub mod json_io;
pub mod process;

pub use checksum::{checksum_matches, compute_checksum, compute_checksum_async};
pub use fs::{DiskSpaceProbe, SystemDiskSpace};
pub use json_io::JsonConfigStore;
pub use process::{run_command_async, spawn_detached};
