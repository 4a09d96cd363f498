//! # File I/O Module
//!
//! Handles study file operations with safety features:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **File locking**: Prevent concurrent edits on shared drives
//! - **Version validation**: Ensure schema compatibility
//!
//! ## File Format
//!
//! Studies are saved as `.rsf` (river study file) files containing JSON.
//! Lock files use `.rsf.lock` extension with metadata about who holds
//! the lock.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hydro_core::file_io::{save_study, load_study, FileLock};
//! use hydro_core::study::Study;
//! use std::path::Path;
//!
//! let study = Study::new("Fieldwork 2026", "River Lyn", "Exmoor");
//! let path = Path::new("fieldwork.rsf");
//!
//! // Acquire lock before saving
//! let lock = FileLock::acquire(path, "teacher@school.org").unwrap();
//!
//! // Save with atomic write
//! save_study(&study, path).unwrap();
//!
//! // Lock is released when dropped
//! drop(lock);
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::errors::{HydroError, HydroResult};
use crate::study::{Study, SCHEMA_VERSION};

/// Lock file metadata stored in .rsf.lock files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Machine name where lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    /// When the lock was acquired
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Create new lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

/// Get the hostname of the current machine
fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

/// File lock guard that releases the lock when dropped.
///
/// Uses both:
/// 1. OS-level file locking (via fs2) for process safety
/// 2. .lock file with metadata for user visibility
pub struct FileLock {
    /// Path to the main study file
    study_path: PathBuf,
    /// Path to the lock file
    lock_path: PathBuf,
    /// The underlying file handle (keeps OS lock)
    _lock_file: File,
    /// Lock metadata
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a study file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the .rsf study file
    /// * `user_id` - Identifier for the user acquiring the lock
    ///
    /// # Returns
    ///
    /// * `Ok(FileLock)` - Lock acquired successfully
    /// * `Err(HydroError::FileLocked)` - Another process holds the lock
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> HydroResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        // Check if lock file exists and contains valid lock info
        if lock_path.exists() {
            if let Ok(existing) = read_lock_info(&lock_path) {
                // Stale locks (dead process, >24h old) can be taken over
                if !is_lock_stale(&existing) {
                    return Err(HydroError::file_locked(
                        path.display().to_string(),
                        format!("{} ({})", existing.user_id, existing.machine),
                        existing.locked_at.to_rfc3339(),
                    ));
                }
            }
        }

        // Create/open the lock file
        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| {
                HydroError::file_error(
                    "create lock",
                    lock_path.display().to_string(),
                    e.to_string(),
                )
            })?;

        // Try to acquire exclusive OS-level lock (non-blocking)
        lock_file.try_lock_exclusive().map_err(|_| {
            HydroError::file_locked(
                path.display().to_string(),
                "another process".to_string(),
                "unknown".to_string(),
            )
        })?;

        // Write lock info to the file using the same handle
        let lock_json =
            serde_json::to_string_pretty(&info).map_err(|e| HydroError::SerializationError {
                reason: e.to_string(),
            })?;

        lock_file.write_all(lock_json.as_bytes()).map_err(|e| {
            HydroError::file_error("write lock", lock_path.display().to_string(), e.to_string())
        })?;

        lock_file.sync_all().map_err(|e| {
            HydroError::file_error("sync lock", lock_path.display().to_string(), e.to_string())
        })?;

        Ok(FileLock {
            study_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Check if a file is locked without acquiring the lock.
    ///
    /// Returns `Some(LockInfo)` if locked, `None` if available.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        if lock_path.exists() {
            if let Ok(info) = read_lock_info(&lock_path) {
                if !is_lock_stale(&info) {
                    return Some(info);
                }
            }
        }
        None
    }

    /// Get the path to the study file
    pub fn study_path(&self) -> &Path {
        &self.study_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Remove the lock file
        let _ = fs::remove_file(&self.lock_path);
        // OS lock is released when _lock_file is dropped
    }
}

/// Get the lock file path for a study file
fn lock_path_for(study_path: &Path) -> PathBuf {
    let mut lock_path = study_path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

/// Read lock info from a lock file
fn read_lock_info(lock_path: &Path) -> HydroResult<LockInfo> {
    let mut file = File::open(lock_path).map_err(|e| {
        HydroError::file_error("read lock", lock_path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        HydroError::file_error("read lock", lock_path.display().to_string(), e.to_string())
    })?;

    serde_json::from_str(&contents).map_err(|e| HydroError::SerializationError {
        reason: e.to_string(),
    })
}

/// Check if a lock is stale (the process that created it is no longer running)
fn is_lock_stale(info: &LockInfo) -> bool {
    if let Some(our_machine) = hostname() {
        if info.machine == our_machine {
            // Same machine - check if the process is still running
            #[cfg(windows)]
            {
                use std::process::Command;
                let output = Command::new("tasklist")
                    .args(["/FI", &format!("PID eq {}", info.pid), "/NH"])
                    .output();
                if let Ok(output) = output {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    if stdout.contains("No tasks") || !stdout.contains(&info.pid.to_string()) {
                        return true;
                    }
                }
            }
            #[cfg(unix)]
            {
                if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                    return true;
                }
            }
        }
    }

    // A lock older than 24 hours is stale regardless of origin
    let age = Utc::now() - info.locked_at;
    age.num_hours() > 24
}

/// Save a study to a file with atomic write semantics.
///
/// The save process:
/// 1. Serialize study to JSON
/// 2. Write to a temporary file (.tmp)
/// 3. Sync to disk (fsync)
/// 4. Rename .tmp to .rsf (atomic on most filesystems)
///
/// This prevents corruption if the process is interrupted during write.
///
/// # Example
///
/// ```rust,no_run
/// use hydro_core::file_io::save_study;
/// use hydro_core::study::Study;
/// use std::path::Path;
///
/// let study = Study::new("Fieldwork 2026", "River Lyn", "Exmoor");
/// save_study(&study, Path::new("fieldwork.rsf"))?;
/// # Ok::<(), hydro_core::errors::HydroError>(())
/// ```
pub fn save_study(study: &Study, path: &Path) -> HydroResult<()> {
    let json =
        serde_json::to_string_pretty(study).map_err(|e| HydroError::SerializationError {
            reason: e.to_string(),
        })?;

    let tmp_path = path.with_extension("rsf.tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        HydroError::file_error(
            "create temp file",
            tmp_path.display().to_string(),
            e.to_string(),
        )
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        HydroError::file_error(
            "write temp file",
            tmp_path.display().to_string(),
            e.to_string(),
        )
    })?;

    tmp_file.sync_all().map_err(|e| {
        HydroError::file_error(
            "sync temp file",
            tmp_path.display().to_string(),
            e.to_string(),
        )
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        // Clean up temp file if rename fails
        let _ = fs::remove_file(&tmp_path);
        HydroError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

/// Load a study from a file.
///
/// # Returns
///
/// * `Ok(Study)` - Successfully loaded study
/// * `Err(HydroError::VersionMismatch)` - File version is incompatible
/// * `Err(HydroError::SerializationError)` - Invalid JSON
/// * `Err(HydroError::FileError)` - I/O error
pub fn load_study(path: &Path) -> HydroResult<Study> {
    let mut file = File::open(path)
        .map_err(|e| HydroError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| HydroError::file_error("read", path.display().to_string(), e.to_string()))?;

    let study: Study =
        serde_json::from_str(&contents).map_err(|e| HydroError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    validate_version(&study.meta.version)?;
    study.validate()?;

    Ok(study)
}

/// Load a study, returning whether it's read-only due to a lock.
///
/// # Returns
///
/// * `Ok((Study, None))` - Loaded successfully, no lock
/// * `Ok((Study, Some(LockInfo)))` - Loaded, but another user has the lock
/// * `Err(_)` - Failed to load
pub fn load_study_with_lock_check(path: &Path) -> HydroResult<(Study, Option<LockInfo>)> {
    let study = load_study(path)?;
    let lock_info = FileLock::check(path);
    Ok((study, lock_info))
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> HydroResult<()> {
    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(HydroError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(HydroError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    // For 0.x versions, a newer minor is a breaking change we can't read
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(HydroError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    fn temp_study_path(name: &str) -> PathBuf {
        temp_dir().join(format!("riverlog_test_{}.rsf", name))
    }

    #[test]
    fn test_lock_path_generation() {
        let study_path = Path::new("/path/to/fieldwork.rsf");
        let lock_path = lock_path_for(study_path);
        assert_eq!(lock_path, Path::new("/path/to/fieldwork.rsf.lock"));
    }

    #[test]
    fn test_lock_info_creation() {
        let info = LockInfo::new("test@example.com");
        assert_eq!(info.user_id, "test@example.com");
        assert!(info.pid > 0);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_study_path("roundtrip");

        let mut study = Study::new("Roundtrip Study", "River Lyn", "Exmoor");
        study
            .add_site(crate::site::Site::new(1, 3.0).unwrap())
            .unwrap();
        save_study(&study, &path).unwrap();

        let loaded = load_study(&path).unwrap();
        assert_eq!(loaded.meta.name, "Roundtrip Study");
        assert_eq!(loaded.meta.river, "River Lyn");
        assert_eq!(loaded.site_count(), 1);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_study_path("atomic");
        let tmp_path = path.with_extension("rsf.tmp");

        let study = Study::new("Atomic", "River", "Somewhere");
        save_study(&study, &path).unwrap();

        // Temp file should not exist after successful save
        assert!(!tmp_path.exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_lock_acquire_and_release() {
        let path = temp_study_path("lock_test");
        File::create(&path).unwrap();

        let lock = FileLock::acquire(&path, "test@example.com").unwrap();
        assert_eq!(lock.info.user_id, "test@example.com");

        let lock_path = lock_path_for(&path);
        assert!(lock_path.exists());

        drop(lock);
        assert!(!lock_path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.0").is_ok());
        assert!(validate_version("0.1.5").is_ok());

        // Different major should fail
        assert!(validate_version("1.0.0").is_err());

        // Newer minor (in 0.x) should fail
        assert!(validate_version("0.2.0").is_err());
    }

    #[test]
    fn test_load_with_lock_check() {
        let path = temp_study_path("lock_check");

        let study = Study::new("Lock Check", "River", "Somewhere");
        save_study(&study, &path).unwrap();

        let (loaded, lock_info) = load_study_with_lock_check(&path).unwrap();
        assert_eq!(loaded.meta.name, "Lock Check");
        assert!(lock_info.is_none());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_invalid_study() {
        let path = temp_study_path("invalid");
        fs::write(
            &path,
            r#"{"meta":{"id":"8c0ce18e-3f96-4c64-9f9a-0e1f6a1f0001","version":"0.1.0","name":"Bad","river":"R","location":"L","study_date":"2026-05-01","created":"2026-05-01T00:00:00Z","modified":"2026-05-01T00:00:00Z"},"sites":[{"site_number":1,"river_width_m":-2.0}]}"#,
        )
        .unwrap();

        let err = load_study(&path).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_MEASUREMENT");

        let _ = fs::remove_file(&path);
    }
}
