//! Atomic file writes
//!
//! The document is written to a hidden temporary file next to the
//! destination and renamed into place, so readers never see a partial file.
//! Every write gets its own uniquely named temporary file, so concurrent
//! writes to the same destination never share one.

use crate::domain::{BdtError, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::watch;
use tokio::task;

const TEMP_SUFFIX: &str = ".partial";

/// Writes byte buffers atomically, honouring a shutdown signal
///
/// The signal is checked once, after the temporary file is complete and
/// before the rename that commits it.
#[derive(Debug, Clone, Default)]
pub struct AtomicWriter {
    shutdown_signal: Option<watch::Receiver<bool>>,
}

impl AtomicWriter {
    pub fn new(shutdown_signal: watch::Receiver<bool>) -> Self {
        Self {
            shutdown_signal: Some(shutdown_signal),
        }
    }

    /// A writer that always commits
    pub fn uncancellable() -> Self {
        Self::default()
    }

    fn is_cancelled(&self) -> bool {
        self.shutdown_signal
            .as_ref()
            .is_some_and(|signal| *signal.borrow())
    }

    /// Writes `bytes` to `path`
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// - [`BdtError::Write`] with the destination path and the OS error
    /// - [`BdtError::Cancelled`] if shutdown was requested before the rename;
    ///   no destination file is left behind in that case
    pub async fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let dir = parent_dir(path);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| BdtError::write(path, e))?;

        let prefix = temp_prefix_for(path);
        let contents = bytes.to_vec();
        let temp = run_blocking(move || write_temp(&dir, &prefix, &contents))
            .await
            .map_err(|e| BdtError::write(path, e))?;

        if self.is_cancelled() {
            discard(temp);
            tracing::warn!(path = %path.display(), "Shutdown requested, BDT file not committed");
            return Err(BdtError::Cancelled(path.to_path_buf()));
        }

        let destination = path.to_path_buf();
        run_blocking(move || {
            temp.persist(&destination)
                .map(|_| ())
                .map_err(|e| {
                    let source = e.error;
                    discard(e.file);
                    source
                })
        })
        .await
        .map_err(|e| BdtError::write(path, e))?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "BDT file committed");
        Ok(())
    }
}

/// The directory the temporary file lives in, `.` for bare file names
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// `.name.` for `dir/name`; the random part and `.partial` follow
fn temp_prefix_for(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "export".to_string());
    format!(".{name}.")
}

fn write_temp(dir: &Path, prefix: &str, bytes: &[u8]) -> io::Result<NamedTempFile> {
    let mut temp = tempfile::Builder::new()
        .prefix(prefix)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(dir)?;
    temp.write_all(bytes)?;
    // Temporary files start out owner-only
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))?;
    }
    temp.as_file().sync_all()?;
    Ok(temp)
}

fn discard(temp: NamedTempFile) {
    let temp_path = temp.path().to_path_buf();
    if let Err(e) = temp.close() {
        tracing::warn!(path = %temp_path.display(), error = %e, "Failed to remove temporary file");
    }
}

async fn run_blocking<T, F>(f: F) -> io::Result<T>
where
    F: FnOnce() -> io::Result<T> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(f).await.map_err(io::Error::other)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Names in `dir`, sorted
    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_write_commits_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("patient_1.bdt");

        AtomicWriter::uncancellable()
            .write(&path, b"0103100Doe\r\n")
            .await
            .unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"0103100Doe\r\n");
        assert_eq!(entries(&dir.path().join("nested")), vec!["patient_1.bdt"]);
    }

    #[tokio::test]
    async fn test_write_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("patient_export.bdt");
        std::fs::write(&path, b"old").unwrap();

        AtomicWriter::uncancellable().write(&path, b"new").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_cancelled_write_leaves_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("patient_1.bdt");
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let result = AtomicWriter::new(rx).write(&path, b"0103100Doe\r\n").await;

        assert!(matches!(result, Err(BdtError::Cancelled(p)) if p == path));
        assert!(entries(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_write_error_names_destination() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file, not a directory").unwrap();
        let path = blocker.join("patient_1.bdt");

        let err = AtomicWriter::uncancellable()
            .write(&path, b"x")
            .await
            .unwrap_err();

        match err {
            BdtError::Write { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("expected write error, got {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_to_same_destination() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("patient_export.bdt");
        let first = vec![b'a'; 4 * 1024 * 1024];
        let second = vec![b'b'; 4 * 1024 * 1024];

        for _ in 0..5 {
            let writes = [first.clone(), second.clone()].map(|bytes| {
                let path = path.clone();
                tokio::spawn(async move { AtomicWriter::uncancellable().write(&path, &bytes).await })
            });
            for handle in writes {
                handle.await.unwrap().unwrap();
            }

            let written = std::fs::read(&path).unwrap();
            assert!(written == first || written == second, "torn write");
            assert_eq!(entries(dir.path()), vec!["patient_export.bdt"]);
        }
    }

    #[test]
    fn test_temp_files_are_hidden_siblings() {
        assert_eq!(
            temp_prefix_for(Path::new("/exports/patient_1.bdt")),
            ".patient_1.bdt."
        );
        assert_eq!(parent_dir(Path::new("patient_1.bdt")), PathBuf::from("."));

        let dir = TempDir::new().unwrap();
        let first = write_temp(dir.path(), ".patient_1.bdt.", b"x").unwrap();
        let second = write_temp(dir.path(), ".patient_1.bdt.", b"y").unwrap();
        assert_ne!(first.path(), second.path());
        for temp in [&first, &second] {
            let name = temp.path().file_name().unwrap().to_string_lossy().into_owned();
            assert!(name.starts_with(".patient_1.bdt.") && name.ends_with(".partial"));
            assert_eq!(temp.path().parent().unwrap(), dir.path());
        }
    }
}
