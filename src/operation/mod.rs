//! Background operation handles.
//!
//! An [`Operation`] ties exactly one unit of asynchronous work to one dialog
//! presentation. The work runs on a tokio runtime; the presenting thread is
//! blocked inside the modal call and only ever takes short, non-blocking
//! looks at the operation through [`StatusProbe::status`]. Completion is
//! published through a mutex/condvar pair so the grace-period wait and the
//! final [`join`](Operation::join) never spin.
//!
//! Cancellation is cooperative: [`CancelSource::request`] flips a
//! `tokio::sync::watch` value that the background work observes through its
//! [`CancelToken`]. Requesting never waits for the work to stop; the dialog
//! stays open until a later timer tick sees the operation's terminal state.

use std::future::Future;
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use tokio::sync::watch;

/// Point-in-time completion state of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    Running,
    Completed,
    Faulted,
    Canceled,
}

impl OperationStatus {
    pub fn is_terminal(self) -> bool {
        self != OperationStatus::Running
    }
}

/// Terminal result of an operation.
///
/// A faulted outcome carries the original error value verbatim; it is moved,
/// never wrapped, all the way back to the presentation caller so downcasts
/// against the producer's error types keep working.
#[derive(Debug)]
pub enum Outcome<T> {
    Completed(T),
    Faulted(anyhow::Error),
    Canceled,
}

impl<T> Outcome<T> {
    pub fn status(&self) -> OperationStatus {
        match self {
            Outcome::Completed(_) => OperationStatus::Completed,
            Outcome::Faulted(_) => OperationStatus::Faulted,
            Outcome::Canceled => OperationStatus::Canceled,
        }
    }

    /// Fold a plain fallible result into an outcome.
    pub fn from_result(result: anyhow::Result<T>) -> Self {
        match result {
            Ok(value) => Outcome::Completed(value),
            Err(e) => Outcome::Faulted(e),
        }
    }
}

enum Slot<T> {
    Running,
    Finished(Outcome<T>),
    /// The outcome was moved out by `join`; only the status remains.
    Taken(OperationStatus),
}

impl<T> Slot<T> {
    fn status(&self) -> OperationStatus {
        match self {
            Slot::Running => OperationStatus::Running,
            Slot::Finished(outcome) => outcome.status(),
            Slot::Taken(status) => *status,
        }
    }
}

struct Shared<T> {
    slot: Mutex<Slot<T>>,
    done: Condvar,
}

impl<T> Shared<T> {
    fn finish(&self, outcome: Outcome<T>) {
        let mut slot = self.slot.lock().unwrap();
        if matches!(*slot, Slot::Running) {
            tracing::debug!(status = ?outcome.status(), "operation finished");
            *slot = Slot::Finished(outcome);
            self.done.notify_all();
        }
    }
}

/// Read-only view of an operation's completion state.
///
/// The callback session holds the operation through this trait so the
/// notification handler can be exercised against any probe in tests.
pub trait StatusProbe {
    /// Consistent point-in-time snapshot of the completion state. Both the
    /// timer completion check and the cancel-button veto funnel through this
    /// single read.
    fn status(&self) -> OperationStatus;

    fn is_finished(&self) -> bool {
        self.status().is_terminal()
    }
}

/// Handle to one background unit of work.
///
/// Not reusable: `join` consumes the handle, and a handle participates in at
/// most one dialog presentation.
pub struct Operation<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Operation<T> {
    fn pending() -> Self {
        Self {
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot::Running),
                done: Condvar::new(),
            }),
        }
    }

    /// Wrap work that already reached a terminal state.
    ///
    /// Presenting such an operation never shows a dialog; the orchestrator
    /// unwraps the outcome immediately.
    pub fn finished(outcome: Outcome<T>) -> Self {
        let op = Self::pending();
        op.shared.finish(outcome);
        op
    }

    /// Block until the operation finishes or the timeout elapses.
    ///
    /// Returns true when the operation is finished. Used for the short
    /// grace period that avoids flashing a dialog for near-immediate work.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let guard = self.shared.slot.lock().unwrap();
        let (guard, _) = self
            .shared
            .done
            .wait_timeout_while(guard, timeout, |slot| matches!(slot, Slot::Running))
            .unwrap();
        guard.status().is_terminal()
    }

    /// Block until the operation finishes and take its outcome.
    ///
    /// Called once per presentation, after the modal call has returned (at
    /// which point the timer handler has already observed completion) or
    /// when the dialog was skipped entirely.
    pub fn join(self) -> Outcome<T> {
        let guard = self.shared.slot.lock().unwrap();
        let mut guard = self
            .shared
            .done
            .wait_while(guard, |slot| matches!(slot, Slot::Running))
            .unwrap();
        let status = guard.status();
        match std::mem::replace(&mut *guard, Slot::Taken(status)) {
            Slot::Finished(outcome) => outcome,
            // join consumes self and nothing else takes the outcome, so the
            // slot cannot already be Taken here; Running is excluded above.
            Slot::Running | Slot::Taken(_) => unreachable!("operation outcome already taken"),
        }
    }
}

impl<T: Send + 'static> Operation<T> {
    /// Spawn work producing an [`Outcome`] on the given runtime.
    ///
    /// The future decides its own terminal state; return
    /// [`Outcome::Canceled`] after observing a [`CancelToken`].
    pub fn spawn<F>(handle: &tokio::runtime::Handle, future: F) -> Self
    where
        F: Future<Output = Outcome<T>> + Send + 'static,
    {
        let op = Self::pending();
        let shared = Arc::clone(&op.shared);
        handle.spawn(async move {
            let outcome = future.await;
            shared.finish(outcome);
        });
        op
    }

    /// Spawn plain fallible work; errors become faulted outcomes.
    pub fn spawn_result<F>(handle: &tokio::runtime::Handle, future: F) -> Self
    where
        F: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        Self::spawn(handle, async move { Outcome::from_result(future.await) })
    }
}

impl<T> StatusProbe for Operation<T> {
    fn status(&self) -> OperationStatus {
        self.shared.slot.lock().unwrap().status()
    }
}

/// Requesting side of the cooperative cancellation signal.
///
/// Requests are idempotent; signaling an already-canceled source is a no-op
/// by construction, so repeated cancel clicks need no deduplication.
#[derive(Debug)]
pub struct CancelSource {
    tx: watch::Sender<bool>,
}

impl CancelSource {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Hand out an observing token for the background work.
    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }

    /// Signal cancellation. Never blocks and never waits for the work to
    /// acknowledge.
    pub fn request(&self) {
        tracing::debug!("cancellation requested");
        let _ = self.tx.send(true);
    }

    pub fn is_canceled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for CancelSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Observing side of the cancellation signal, cloned into background work.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn is_canceled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once cancellation has been requested. Pends forever when the
    /// source is dropped without canceling.
    pub async fn canceled(&mut self) {
        if *self.rx.borrow() {
            return;
        }
        while self.rx.changed().await.is_ok() {
            if *self.rx.borrow() {
                return;
            }
        }
        std::future::pending::<()>().await
    }
}
