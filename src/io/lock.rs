use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::debug;

/// Lock file name inside a project directory
pub const LOCK_FILE: &str = ".lock";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// Exclusive advisory lock on a project directory, held while a command
/// rewrites the order file or a card.
///
/// Dropping the lock closes the handle, which releases the flock. The lock
/// file is never unlinked, so every process locks the same inode.
pub struct FileLock {
    _handle: File,
}

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("project is busy: gave up on {path} after {waited:?}")]
    Timeout { path: PathBuf, waited: Duration },
}

impl FileLock {
    /// Wait up to `timeout` for the project lock.
    pub fn acquire(project_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let lock_path = project_dir.join(LOCK_FILE);
        let handle = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|source| LockError::CreateError {
                path: lock_path.clone(),
                source,
            })?;

        let started = Instant::now();
        let mut logged = false;
        while let Err(e) = flock_exclusive(&handle) {
            let waited = started.elapsed();
            if waited >= timeout {
                return Err(LockError::Timeout {
                    path: lock_path,
                    waited,
                });
            }
            if !logged {
                debug!(path = %lock_path.display(), error = %e, "waiting for project lock");
                logged = true;
            }
            std::thread::sleep(RETRY_INTERVAL);
        }

        Ok(FileLock { _handle: handle })
    }

    pub fn acquire_default(project_dir: &Path) -> Result<Self, LockError> {
        Self::acquire(project_dir, DEFAULT_TIMEOUT)
    }
}

#[cfg(unix)]
fn flock_exclusive(file: &File) -> std::io::Result<()> {
    use std::os::unix::io::AsRawFd;
    // SAFETY: the fd is owned by `file` and stays open for the call
    let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if rc == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn flock_exclusive(_file: &File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_release_on_drop() {
        let tmp = TempDir::new().unwrap();

        let lock = FileLock::acquire_default(tmp.path());
        assert!(lock.is_ok());
        assert!(tmp.path().join(LOCK_FILE).exists());

        drop(lock);
        // the file stays so later lockers share its inode
        assert!(tmp.path().join(LOCK_FILE).exists());

        let again = FileLock::acquire(tmp.path(), Duration::from_millis(50));
        assert!(again.is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_lock_contention() {
        let tmp = TempDir::new().unwrap();
        let _held = FileLock::acquire_default(tmp.path()).unwrap();

        let second = FileLock::acquire(tmp.path(), Duration::from_millis(50));
        match second {
            Err(LockError::Timeout { waited, .. }) => assert!(waited >= Duration::from_millis(50)),
            _ => panic!("expected a timeout while the lock is held"),
        }
    }

    #[test]
    fn test_missing_project_dir() {
        let tmp = TempDir::new().unwrap();
        let result = FileLock::acquire_default(&tmp.path().join("gone"));
        assert!(matches!(result, Err(LockError::CreateError { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_waiter_and_newcomer_never_share_the_lock() {
        use std::sync::mpsc;
        use std::thread;

        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().to_path_buf();
        let held = FileLock::acquire_default(&dir).unwrap();

        let (acquired_tx, acquired_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let waiter_dir = dir.clone();
        let waiter = thread::spawn(move || {
            let lock = FileLock::acquire(&waiter_dir, Duration::from_secs(3)).unwrap();
            acquired_tx.send(()).unwrap();
            release_rx.recv().unwrap();
            drop(lock);
        });

        // let the waiter open the lock file and start retrying
        thread::sleep(Duration::from_millis(100));
        drop(held);
        acquired_rx.recv_timeout(Duration::from_secs(3)).unwrap();

        let newcomer = FileLock::acquire(&dir, Duration::from_millis(50));
        assert!(
            matches!(newcomer, Err(LockError::Timeout { .. })),
            "newcomer got the lock while the waiter held it"
        );

        release_tx.send(()).unwrap();
        waiter.join().unwrap();
        assert!(FileLock::acquire(&dir, Duration::from_millis(50)).is_ok());
    }
}
