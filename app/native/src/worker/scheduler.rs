//! In-process periodic task runner.
//!
//! Each task has a unique name and its own worker thread. The task runs once
//! right away and then once per interval until it is cancelled. Enqueueing a
//! name that is already scheduled replaces the existing task, so at most one
//! run per name is ever in flight.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use super::{TaskInput, Worker};
use crate::constants::WORK_NAME;
use crate::folder::FolderReference;

/// Description of a periodic task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodicWorkRequest {
    name: String,
    interval: Duration,
    input: TaskInput,
}

impl PeriodicWorkRequest {
    /// Creates a request.
    #[must_use]
    pub fn new(name: impl Into<String>, interval: Duration, input: TaskInput) -> Self {
        Self { name: name.into(), interval, input }
    }

    /// Creates the wallpaper change request for `folder`.
    #[must_use]
    pub fn wallpaper(folder: &FolderReference, interval: Duration) -> Self {
        Self::new(WORK_NAME, interval, TaskInput::for_folder(folder))
    }

    /// Unique name of the task.
    #[must_use]
    pub fn name(&self) -> &str { &self.name }

    /// Time between runs.
    #[must_use]
    pub const fn interval(&self) -> Duration { self.interval }

    /// Input handed to every run.
    #[must_use]
    pub const fn input(&self) -> &TaskInput { &self.input }
}

/// Signals the end of a task thread to waiters.
#[derive(Default)]
struct Completion {
    done: Mutex<bool>,
    cond: Condvar,
}

impl Completion {
    fn wait(&self) {
        let mut done = self.done.lock();
        while !*done {
            self.cond.wait(&mut done);
        }
    }
}

/// Marks the completion when dropped, including on panic.
struct CompletionGuard(Arc<Completion>);

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        *self.0.done.lock() = true;
        self.0.cond.notify_all();
    }
}

struct ScheduledTask {
    cancel: Sender<()>,
    handle: JoinHandle<()>,
    completion: Arc<Completion>,
}

impl ScheduledTask {
    fn stop(self) {
        // The receiver is gone if the thread already exited.
        let _ = self.cancel.send(());
        if self.handle.join().is_err() {
            tracing::warn!("scheduled task thread panicked");
        }
    }
}

/// Runs named periodic tasks on dedicated threads.
pub struct Scheduler<W: Worker> {
    worker: Arc<W>,
    tasks: Mutex<HashMap<String, ScheduledTask>>,
    /// Serializes replacements so two enqueues of one name never overlap.
    enqueue: Mutex<()>,
}

impl<W: Worker> Scheduler<W> {
    /// Creates a scheduler running `worker`.
    #[must_use]
    pub fn new(worker: W) -> Self {
        Self {
            worker: Arc::new(worker),
            tasks: Mutex::new(HashMap::new()),
            enqueue: Mutex::new(()),
        }
    }

    /// Schedules `request`, replacing any task with the same name.
    ///
    /// The replaced task is cancelled and its thread joined before the new
    /// one starts. The new task runs immediately, then once per interval.
    ///
    /// # Errors
    ///
    /// Returns an error if the task thread cannot be spawned.
    pub fn enqueue_unique_periodic(&self, request: PeriodicWorkRequest) -> std::io::Result<()> {
        let _enqueue = self.enqueue.lock();

        // The task table is not held while the old thread is joined.
        let existing = self.tasks.lock().remove(&request.name);
        if let Some(existing) = existing {
            tracing::debug!(task = %request.name, "replacing scheduled task");
            existing.stop();
        }

        let (cancel, cancelled) = mpsc::channel();
        let completion = Arc::new(Completion::default());
        let guard = CompletionGuard(Arc::clone(&completion));
        let worker = Arc::clone(&self.worker);
        let name = request.name.clone();
        let interval = request.interval;

        let handle = thread::Builder::new().name(format!("task-{name}")).spawn(move || {
            let _guard = guard;
            run_periodic(worker.as_ref(), &request, &cancelled);
        })?;

        tracing::info!(task = %name, interval_secs = interval.as_secs(), "task scheduled");
        self.tasks.lock().insert(name, ScheduledTask { cancel, handle, completion });
        Ok(())
    }

    /// Cancels the task named `name`.
    ///
    /// A run in progress completes first. Returns `false` if no such task exists.
    pub fn cancel_unique(&self, name: &str) -> bool {
        let Some(task) = self.tasks.lock().remove(name) else {
            return false;
        };

        task.stop();
        tracing::info!(task = name, "task cancelled");
        true
    }

    /// Whether a task named `name` is scheduled and its thread still alive.
    #[must_use]
    pub fn is_scheduled(&self, name: &str) -> bool {
        self.tasks
            .lock()
            .get(name)
            .is_some_and(|task| !task.handle.is_finished())
    }

    /// Blocks until the task named `name` stops running.
    ///
    /// Returns `false` immediately if no such task exists.
    pub fn wait(&self, name: &str) -> bool {
        let completion = self.tasks.lock().get(name).map(|task| Arc::clone(&task.completion));
        let Some(completion) = completion else {
            return false;
        };

        completion.wait();
        true
    }
}

impl<W: Worker> Drop for Scheduler<W> {
    fn drop(&mut self) {
        for (_, task) in self.tasks.lock().drain() {
            task.stop();
        }
    }
}

fn run_periodic<W: Worker + ?Sized>(
    worker: &W,
    request: &PeriodicWorkRequest,
    cancelled: &Receiver<()>,
) {
    let mut run = 0u64;

    loop {
        match cancelled.try_recv() {
            Err(TryRecvError::Empty) => {}
            Ok(()) | Err(TryRecvError::Disconnected) => break,
        }

        run += 1;
        let outcome = worker.do_work(&request.input);
        tracing::debug!(task = %request.name, run, ?outcome, "task run finished");

        match cancelled.recv_timeout(request.interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}
