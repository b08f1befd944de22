//! Rotating file writer with size-based rotation and backup retention.
//!
//! Provides a thread-safe log file sink that rotates when the file exceeds a
//! size threshold and keeps a fixed number of backups, so the log never grows
//! without bound.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Maximum file size before rotation (10 MB).
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe rotating file writer.
///
/// When the current file exceeds the size limit it is renamed to
/// `<name>.<timestamp>` and a new file is started. Backups beyond the
/// retention limit are removed, oldest first.
///
/// The worker thread and the main thread share one writer through
/// [`FileWriter::handle`].
pub struct FileWriter {
    file_path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    /// Opened on first write.
    writer: Mutex<Option<fs::File>>,
}

impl FileWriter {
    /// Creates a writer with the default 10 MB / 3 backups policy.
    ///
    /// The file is not opened until the first write.
    #[must_use]
    pub const fn new(file_path: PathBuf) -> Self {
        Self::with_limits(file_path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    #[must_use]
    pub const fn with_limits(file_path: PathBuf, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            file_path,
            max_bytes,
            max_backups,
            writer: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Appends `bytes`, rotating first if the file is over the limit.
    ///
    /// # Errors
    ///
    /// Fails on filesystem errors or if another thread panicked while
    /// holding the lock.
    pub fn write_bytes(&self, bytes: &[u8]) -> io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Mutex poisoned: {e}")))?;

        self.check_and_rotate(&mut writer)?;

        if writer.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)?;
            *writer = Some(file);
        }

        let file = writer
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No file available"))?;

        file.write_all(bytes)?;
        file.flush()
    }

    /// Cloneable `io::Write` handle for `tracing_subscriber`'s `with_writer`.
    #[must_use]
    pub fn handle(self: &Arc<Self>) -> FileHandle {
        FileHandle(Arc::clone(self))
    }

    fn check_and_rotate(&self, writer: &mut Option<fs::File>) -> io::Result<()> {
        if let Ok(metadata) = fs::metadata(&self.file_path) {
            if metadata.len() > self.max_bytes {
                *writer = None;
                self.rotate_files()?;
            }
        }
        Ok(())
    }

    fn rotate_files(&self) -> io::Result<()> {
        let timestamp = chrono::Utc::now().format("%Y%m%d%H%M%S%f");
        let backup_path = self.backup_prefix().map_or_else(
            || self.file_path.with_extension(format!("{timestamp}")),
            |prefix| self.file_path.with_file_name(format!("{prefix}{timestamp}")),
        );

        if self.file_path.exists() {
            fs::rename(&self.file_path, &backup_path)?;
        }

        self.cleanup_old_backups()
    }

    /// `<file name>.`, the prefix every backup name starts with.
    fn backup_prefix(&self) -> Option<String> {
        self.file_path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| format!("{name}."))
    }

    /// Removes backups beyond the retention limit.
    ///
    /// Timestamps sort lexically, so name order is age order. Individual
    /// deletion errors are ignored.
    fn cleanup_old_backups(&self) -> io::Result<()> {
        let parent_dir = self
            .file_path
            .parent()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No parent directory"))?;
        let prefix = self
            .backup_prefix()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "Invalid file name"))?;

        let mut backups: Vec<PathBuf> = fs::read_dir(parent_dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&prefix))
            })
            .collect();

        backups.sort_unstable_by(|a, b| b.cmp(a));

        for old_backup in backups.iter().skip(self.max_backups) {
            let _ = fs::remove_file(old_backup);
        }

        Ok(())
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}

/// Shared handle implementing [`io::Write`].
#[derive(Debug, Clone)]
pub struct FileHandle(Arc<FileWriter>);

impl Write for FileHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backups(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with("geoform.log."))
            .count()
    }

    #[test]
    fn appends_without_rotation_below_limit() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::new(dir.path().join("geoform.log"));
        writer.write_bytes(b"first\n").unwrap();
        writer.write_bytes(b"second\n").unwrap();

        let contents = fs::read_to_string(writer.path()).unwrap();
        assert_eq!(contents, "first\nsecond\n");
        assert_eq!(backups(dir.path()), 0);
    }

    #[test]
    fn rotates_and_keeps_limited_backups() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::with_limits(dir.path().join("geoform.log"), 8, 2);
        for line in 0..6 {
            writer.write_bytes(format!("line {line} of the log\n").as_bytes()).unwrap();
        }

        assert!(backups(dir.path()) <= 2);
        let current = fs::read_to_string(writer.path()).unwrap();
        assert_eq!(current, "line 5 of the log\n");
    }

    #[test]
    fn handle_writes_through_shared_writer() {
        let dir = tempfile::tempdir().unwrap();
        let writer = Arc::new(FileWriter::new(dir.path().join("geoform.log")));
        let mut handle = writer.handle();
        handle.write_all(b"via handle\n").unwrap();
        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "via handle\n");
    }
}
