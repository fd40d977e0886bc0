// aim-aio/src/checksum.rs
use std::path::Path;

use aim_common::error::Result;
use sha2::{Digest, Sha256};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Hex-encoded SHA256 of a file's content.
pub fn compute_checksum(path: &Path) -> Result<String> {
    debug!("Computing checksum for: {}", path.display());
    let std_file = std::fs::File::open(path)?;
    let mut std_reader = std::io::BufReader::new(std_file);
    let mut hasher = Sha256::new();
    let bytes_copied = std::io::copy(&mut std_reader, &mut hasher)?;
    let actual = hex::encode(hasher.finalize());
    debug!("Calculated SHA256: {} ({} bytes read)", actual, bytes_copied);
    Ok(actual)
}

/// Reads the file asynchronously but performs hashing synchronously.
pub async fn compute_checksum_async(path: &Path) -> Result<String> {
    debug!("Async computing checksum for: {}", path.display());
    let mut file = File::open(path).await?;

    let mut hasher = Sha256::new();
    let mut buffer = Vec::with_capacity(8192);
    let mut total_bytes_read = 0u64;

    loop {
        buffer.clear();
        match file.read_buf(&mut buffer).await? {
            0 => break,
            n => {
                hasher.update(&buffer[..n]);
                total_bytes_read += n as u64;
            }
        }
    }

    let actual = hex::encode(hasher.finalize());
    debug!(
        "Async Calculated SHA256: {} ({} bytes read)",
        actual, total_bytes_read
    );
    Ok(actual)
}

/// `Ok(false)` on a mismatch; `Err` only when the file can't be read.
pub fn checksum_matches(path: &Path, expected: &str) -> Result<bool> {
    let actual = compute_checksum(path)?;
    debug!("Expected SHA256:   {}", expected);
    Ok(actual.eq_ignore_ascii_case(expected))
}
