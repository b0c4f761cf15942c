//! Background pruning and compression of rotated backups
//!
//! A rotation only renames the current file. Removing surplus backups and
//! lz4-compressing the rest can take seconds for large files, so that work is
//! handed to one worker thread per [`RollingFile`](super::RollingFile) and the
//! write that triggered the rotation returns right away.
//!
//! The worker is spawned on the first rotation and joined when the file is
//! closed or dropped. If it cannot be spawned, milling runs inline.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use chrono::{Duration, NaiveDateTime};
use crossbeam::channel::{self, Receiver, Sender};

use super::backup::{self, BackupName};
use super::{RotationConfig, now};

/// Retention rules applied to the backups of one log path
#[derive(Debug, Clone)]
pub(crate) struct MillPolicy {
    path: PathBuf,
    names: BackupName,
    max_backups: usize,
    max_age_days: u32,
    compress: bool,
    local_time: bool,
}

impl MillPolicy {
    pub(crate) fn new(config: &RotationConfig) -> Self {
        Self {
            path: config.path.clone(),
            names: BackupName::for_path(&config.path),
            max_backups: config.max_backups,
            max_age_days: config.max_age_days,
            compress: config.compress,
            local_time: config.local_time,
        }
    }

    fn cutoff(&self) -> Option<NaiveDateTime> {
        (self.max_age_days > 0)
            .then(|| now(self.local_time) - Duration::days(i64::from(self.max_age_days)))
    }

    /// Prune and compress backups
    ///
    /// Failures are logged; nothing here fails a write.
    pub(crate) fn run(&self) {
        let backups = match self.names.list(&self.path) {
            Ok(backups) => backups,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to list log backups"
                );
                return;
            }
        };

        let cutoff = self.cutoff();
        let mut keep = Vec::with_capacity(backups.len());
        let mut remove = Vec::new();

        // Newest first, so the count limit keeps the most recent backups
        for backup in backups {
            let over_count = self.max_backups > 0 && keep.len() >= self.max_backups;
            let too_old = cutoff.is_some_and(|cutoff| backup.timestamp < cutoff);
            if over_count || too_old {
                remove.push(backup);
            } else {
                keep.push(backup);
            }
        }

        for backup in &remove {
            match fs::remove_file(&backup.path) {
                Ok(()) => tracing::debug!(backup = %backup.path.display(), "removed old log backup"),
                Err(e) => tracing::warn!(
                    backup = %backup.path.display(),
                    error = %e,
                    "failed to remove old log backup"
                ),
            }
        }

        if !self.compress {
            return;
        }

        for backup in keep.iter().filter(|b| !b.compressed) {
            match backup::compress(&backup.path) {
                Ok(dst) => tracing::debug!(backup = %dst.display(), "compressed log backup"),
                Err(e) => tracing::warn!(
                    backup = %backup.path.display(),
                    error = %e,
                    "failed to compress log backup"
                ),
            }
        }
    }
}

enum Request {
    Mill,
    /// Acknowledged once every earlier request is done
    Barrier(Sender<()>),
    /// Park the worker until the sender fires or is dropped
    #[cfg(test)]
    Hold(Receiver<()>),
}

struct Worker {
    requests: Sender<Request>,
    handle: JoinHandle<()>,
}

/// Owner of the background mill worker
pub(crate) struct Miller {
    policy: Arc<MillPolicy>,
    worker: Option<Worker>,
}

impl Miller {
    pub(crate) fn new(policy: MillPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
            worker: None,
        }
    }

    /// Queue a mill pass
    pub(crate) fn request(&mut self) {
        if self.worker.is_none() {
            self.worker = self.spawn();
        }

        let queued = self
            .worker
            .as_ref()
            .is_some_and(|worker| worker.requests.send(Request::Mill).is_ok());
        if !queued {
            self.policy.run();
        }
    }

    /// Block until every queued pass has finished
    pub(crate) fn wait(&self) {
        let Some(worker) = &self.worker else {
            return;
        };
        let (ack, done) = channel::bounded(1);
        if worker.requests.send(Request::Barrier(ack)).is_ok() {
            let _ = done.recv();
        }
    }

    /// Finish queued passes and stop the worker
    pub(crate) fn shutdown(&mut self) {
        let Some(Worker { requests, handle }) = self.worker.take() else {
            return;
        };
        drop(requests);
        if handle.join().is_err() {
            tracing::warn!(path = %self.policy.path.display(), "log mill worker panicked");
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Park the worker; it resumes when the returned sender fires or drops
    #[cfg(test)]
    pub(crate) fn hold(&mut self) -> Sender<()> {
        if self.worker.is_none() {
            self.worker = self.spawn();
        }
        let (release, held) = channel::bounded(1);
        if let Some(worker) = &self.worker {
            let _ = worker.requests.send(Request::Hold(held));
        }
        release
    }

    fn spawn(&self) -> Option<Worker> {
        let (requests, queue) = channel::unbounded();
        let policy = Arc::clone(&self.policy);

        match thread::Builder::new()
            .name("lumber-mill".into())
            .spawn(move || run_worker(&policy, &queue))
        {
            Ok(handle) => Some(Worker { requests, handle }),
            Err(e) => {
                tracing::warn!(
                    path = %self.policy.path.display(),
                    error = %e,
                    "failed to start log mill worker, milling inline"
                );
                None
            }
        }
    }
}

fn run_worker(policy: &MillPolicy, queue: &Receiver<Request>) {
    while let Ok(request) = queue.recv() {
        match request {
            Request::Mill => policy.run(),
            Request::Barrier(ack) => {
                let _ = ack.send(());
            }
            #[cfg(test)]
            Request::Hold(held) => {
                let _ = held.recv();
            }
        }
    }
}

impl Drop for Miller {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for Miller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Miller")
            .field("policy", &self.policy)
            .field("running", &self.is_running())
            .finish()
    }
}
