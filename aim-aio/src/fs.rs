/*
File: aim-aio/src/fs.rs
Purpose: Primitive synchronous filesystem operations and the free-space probe.
*/
use std::fs::{self, Permissions};
use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use aim_common::error::{AimError, Result};
use sysinfo::Disks;
use tempfile::NamedTempFile;
use tracing::{debug, error, warn};

/// Creates a directory and all its parent components if they are missing.
pub fn create_dir_all(path: &Path) -> Result<()> {
    debug!("Creating directory recursively: {}", path.display());
    fs::create_dir_all(path).map_err(|e| {
        error!("Failed create dir {}: {}", path.display(), e);
        AimError::from(e)
    })
}

/// Removes a file, treating an already missing file as success.
pub fn remove_file_if_exists(path: &Path) -> Result<()> {
    debug!("Removing file: {}", path.display());
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            error!("Failed remove file {}: {}", path.display(), e);
            Err(AimError::from(e))
        }
    }
}

/// Sets file permissions (Unix only). Mode is standard Unix octal mode.
#[cfg(unix)]
pub fn set_permissions(path: &Path, mode: u32) -> Result<()> {
    debug!("Setting permissions on {}: {:o}", path.display(), mode);
    fs::set_permissions(path, Permissions::from_mode(mode)).map_err(|e| {
        error!("Failed set permissions on {}: {}", path.display(), e);
        AimError::from(e)
    })
}

#[cfg(not(unix))]
pub fn set_permissions(path: &Path, _mode: u32) -> Result<()> {
    warn!(
        "Setting permissions not fully supported on this platform: {}",
        path.display()
    );
    Ok(())
}

fn persist_temp(temp_file: NamedTempFile, target: &Path) -> Result<()> {
    let temp_path = temp_file.path().to_path_buf();
    temp_file.persist(target).map_err(|e| {
        error!(
            "Failed to persist temporary file {} over {}: {}",
            temp_path.display(),
            target.display(),
            e.error
        );
        AimError::Io(Arc::new(e.error))
    })?;
    Ok(())
}

/// Atomically writes data to a file using a temporary file in the same directory.
/// Preserves original permissions if possible.
pub fn atomic_write_file(original_path: &Path, content: &[u8]) -> Result<()> {
    let dir = original_path.parent().ok_or_else(|| {
        AimError::Generic(format!(
            "Cannot get parent directory for {}",
            original_path.display()
        ))
    })?;
    create_dir_all(dir)?;

    let original_perms = fs::metadata(original_path).map(|m| m.permissions()).ok();

    let mut temp_file = NamedTempFile::new_in(dir)?;
    debug!(
        "Atomically writing {} bytes to {} via temp file {}",
        content.len(),
        original_path.display(),
        temp_file.path().display()
    );
    temp_file.write_all(content)?;
    temp_file.flush()?;
    temp_file.as_file().sync_all()?;

    persist_temp(temp_file, original_path)?;

    if let Some(perms) = original_perms {
        if let Err(e) = fs::set_permissions(original_path, perms) {
            warn!(
                "Failed to restore original permissions on {}: {}",
                original_path.display(),
                e
            );
        }
    } else if let Err(e) = set_permissions(original_path, 0o644) {
        warn!(
            "Failed to set default permissions on new file {}: {}",
            original_path.display(),
            e
        );
    }

    Ok(())
}

/// Copies `source` over `target` so that readers of `target` never observe a
/// partially written file.
pub fn atomic_copy_file(source: &Path, target: &Path, mode: u32) -> Result<()> {
    let dir = target.parent().ok_or_else(|| {
        AimError::Generic(format!("Cannot get parent directory for {}", target.display()))
    })?;
    create_dir_all(dir)?;

    let mut temp_file = NamedTempFile::new_in(dir)?;
    let mut reader = fs::File::open(source)?;
    let copied = io::copy(&mut reader, &mut temp_file)?;
    temp_file.as_file().sync_all()?;
    debug!(
        "Copied {} bytes from {} for atomic replace of {}",
        copied,
        source.display(),
        target.display()
    );

    persist_temp(temp_file, target)?;
    set_permissions(target, mode)
}

/// Names and paths of the immediate subdirectories of `dir_path`. A missing
/// directory yields an empty list; unreadable entries are skipped.
pub fn list_subdirectories(dir_path: &Path) -> Result<Vec<(String, PathBuf)>> {
    debug!("Listing subdirectories of: {}", dir_path.display());
    if !dir_path.is_dir() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for entry_res in fs::read_dir(dir_path)? {
        match entry_res {
            Ok(entry) => {
                let path = entry.path();
                if path.is_dir() {
                    entries.push((entry.file_name().to_string_lossy().to_string(), path));
                }
            }
            Err(e) => warn!("Error reading entry in {}: {}", dir_path.display(), e),
        }
    }
    entries.sort();
    Ok(entries)
}

/// The closest ancestor of `path` (itself included) that exists on disk.
pub fn nearest_existing_ancestor(path: &Path) -> Option<&Path> {
    path.ancestors().find(|p| p.exists())
}

/// Free-space query for the filesystem holding a path.
pub trait DiskSpaceProbe: Send + Sync {
    fn available_bytes(&self, path: &Path) -> Result<u64>;
}

/// Reads free space from the mounted disks reported by the OS, choosing the
/// disk whose mount point is the longest prefix of the path.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDiskSpace;

impl DiskSpaceProbe for SystemDiskSpace {
    fn available_bytes(&self, path: &Path) -> Result<u64> {
        let existing = nearest_existing_ancestor(path).ok_or_else(|| AimError::InvalidPath {
            path: path.to_path_buf(),
            reason: "no existing ancestor directory".to_string(),
        })?;
        let resolved = existing.canonicalize()?;

        let disks = Disks::new_with_refreshed_list();
        let disk = disks
            .list()
            .iter()
            .filter(|disk| resolved.starts_with(disk.mount_point()))
            .max_by_key(|disk| disk.mount_point().as_os_str().len())
            .ok_or_else(|| {
                AimError::Generic(format!(
                    "Can't determine the disk holding {}",
                    resolved.display()
                ))
            })?;

        debug!(
            "Disk mounted at {} has {} bytes available for {}",
            disk.mount_point().display(),
            disk.available_space(),
            resolved.display()
        );
        Ok(disk.available_space())
    }
}
