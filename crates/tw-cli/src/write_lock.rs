use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

const LOCK_FILE: &str = ".tw.lock";
const LOCK_WAIT_TIMEOUT: Duration = Duration::from_secs(30);
const LOCK_RETRY_DELAY: Duration = Duration::from_millis(250);

/// A write command finishes in well under this; an older holder crashed.
const STALE_AFTER: TimeDelta = TimeDelta::minutes(10);

/// Contents of the lock file.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct LockHolder {
    pid: u32,
    acquired_at: DateTime<Utc>,
}

impl LockHolder {
    fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.acquired_at) > STALE_AFTER
    }
}

/// Held for the load, mutate, save sequence of a write command.
#[derive(Debug)]
pub struct WriteLockGuard {
    path: PathBuf,
}

impl Drop for WriteLockGuard {
    fn drop(&mut self) {
        if let Err(error) = std::fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), %error, "failed to release write lock");
        }
    }
}

#[derive(Debug)]
enum LockState {
    Held(LockHolder),
    Stale(LockHolder),
    /// Present but not a lock record we wrote.
    Unreadable,
}

/// Take the write lock for `tasks_root`, waiting while another command holds it.
pub async fn acquire_for_root(tasks_root: &Path) -> anyhow::Result<WriteLockGuard> {
    acquire_within(tasks_root, LOCK_WAIT_TIMEOUT).await
}

async fn acquire_within(tasks_root: &Path, timeout: Duration) -> anyhow::Result<WriteLockGuard> {
    std::fs::create_dir_all(tasks_root)
        .with_context(|| format!("failed to create tasks root {}", tasks_root.display()))?;
    let lock_path = tasks_root.join(LOCK_FILE);
    let started = std::time::Instant::now();

    loop {
        let state = match try_acquire(&lock_path, Utc::now())
            .with_context(|| format!("failed to lock tasks root {}", tasks_root.display()))?
        {
            Ok(guard) => {
                tracing::debug!(path = %lock_path.display(), "write lock acquired");
                return Ok(guard);
            }
            Err(state) => state,
        };

        if let LockState::Stale(holder) = &state {
            tracing::warn!(
                path = %lock_path.display(),
                pid = holder.pid,
                acquired_at = %holder.acquired_at,
                "removing stale write lock"
            );
            match std::fs::remove_file(&lock_path) {
                Ok(()) => continue,
                Err(error) if error.kind() == std::io::ErrorKind::NotFound => continue,
                Err(error) => {
                    return Err(error).with_context(|| {
                        format!("failed to remove stale lock {}", lock_path.display())
                    });
                }
            }
        }

        if started.elapsed() >= timeout {
            return Err(contention_error(tasks_root, &lock_path, &state));
        }
        tokio::time::sleep(LOCK_RETRY_DELAY).await;
    }
}

fn contention_error(tasks_root: &Path, lock_path: &Path, state: &LockState) -> anyhow::Error {
    match state {
        LockState::Held(holder) | LockState::Stale(holder) => anyhow::anyhow!(
            "tasks root {} is locked by pid {} since {}; try again after it finishes",
            tasks_root.display(),
            holder.pid,
            holder.acquired_at.to_rfc3339(),
        ),
        LockState::Unreadable => anyhow::anyhow!(
            "tasks root {} has an unreadable lock file {}; remove it if no tw command is running",
            tasks_root.display(),
            lock_path.display(),
        ),
    }
}

/// One attempt. The outer error is an I/O failure; the inner one reports
/// who holds the lock.
fn try_acquire(
    lock_path: &Path,
    now: DateTime<Utc>,
) -> std::io::Result<Result<WriteLockGuard, LockState>> {
    match OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(lock_path)
    {
        Ok(mut file) => {
            let guard = WriteLockGuard {
                path: lock_path.to_path_buf(),
            };
            let holder = LockHolder {
                pid: std::process::id(),
                acquired_at: now,
            };
            let record = serde_json::to_string(&holder).map_err(std::io::Error::other)?;
            writeln!(file, "{record}")?;
            Ok(Ok(guard))
        }
        Err(error) if error.kind() == std::io::ErrorKind::AlreadyExists => {
            Ok(Err(inspect(lock_path, now)?))
        }
        Err(error) => Err(error),
    }
}

fn inspect(lock_path: &Path, now: DateTime<Utc>) -> std::io::Result<LockState> {
    let contents = match std::fs::read_to_string(lock_path) {
        Ok(contents) => contents,
        // Released between our open and read.
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Ok(LockState::Unreadable);
        }
        Err(error) => return Err(error),
    };
    Ok(match serde_json::from_str::<LockHolder>(contents.trim()) {
        Ok(holder) if holder.is_stale(now) => LockState::Stale(holder),
        Ok(holder) => LockState::Held(holder),
        Err(_) => LockState::Unreadable,
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
    }

    fn write_holder(lock_path: &Path, pid: u32, acquired_at: DateTime<Utc>) {
        let record = serde_json::to_string(&LockHolder { pid, acquired_at }).unwrap();
        std::fs::write(lock_path, record).expect("write lock file");
    }

    #[test]
    fn acquires_and_releases_lock_file() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let lock_path = temp.path().join(LOCK_FILE);

        let guard = try_acquire(&lock_path, now())
            .expect("io")
            .expect("lock should acquire");
        let written: LockHolder =
            serde_json::from_str(&std::fs::read_to_string(&lock_path).unwrap()).unwrap();
        assert_eq!(written.pid, std::process::id());
        assert_eq!(written.acquired_at, now());

        drop(guard);
        assert!(!lock_path.exists());
    }

    #[test]
    fn fresh_lock_from_another_process_is_held() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let lock_path = temp.path().join(LOCK_FILE);
        write_holder(&lock_path, 4242, now() - TimeDelta::seconds(5));

        match try_acquire(&lock_path, now()).expect("io") {
            Err(LockState::Held(holder)) => assert_eq!(holder.pid, 4242),
            other => panic!("expected held lock, got {other:?}"),
        }
        assert!(lock_path.exists());
    }

    #[test]
    fn old_lock_is_stale() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let lock_path = temp.path().join(LOCK_FILE);
        write_holder(&lock_path, 4242, now() - STALE_AFTER - TimeDelta::seconds(1));

        assert!(matches!(
            try_acquire(&lock_path, now()).expect("io"),
            Err(LockState::Stale(_))
        ));
    }

    #[test]
    fn garbage_lock_file_is_unreadable() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let lock_path = temp.path().join(LOCK_FILE);
        std::fs::write(&lock_path, "not a pid").expect("write lock file");

        assert!(matches!(
            try_acquire(&lock_path, now()).expect("io"),
            Err(LockState::Unreadable)
        ));
    }

    #[tokio::test]
    async fn stale_lock_is_replaced() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let lock_path = temp.path().join(LOCK_FILE);
        write_holder(&lock_path, 4242, Utc::now() - TimeDelta::hours(1));

        let guard = acquire_within(temp.path(), Duration::ZERO)
            .await
            .expect("stale lock should be taken over");
        let written: LockHolder =
            serde_json::from_str(&std::fs::read_to_string(&lock_path).unwrap()).unwrap();
        assert_eq!(written.pid, std::process::id());
        drop(guard);
    }

    #[tokio::test]
    async fn held_lock_error_names_root_and_holder() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let lock_path = temp.path().join(LOCK_FILE);
        write_holder(&lock_path, 4242, Utc::now());

        let err = acquire_within(temp.path(), Duration::ZERO)
            .await
            .expect_err("held lock should time out");
        let message = err.to_string();
        assert!(message.contains(&temp.path().display().to_string()));
        assert!(message.contains("pid 4242"));
        assert!(lock_path.exists());
    }
}
