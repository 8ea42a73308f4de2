//! One-shot background fetches with cooperative cancellation.
//!
//! # Responsibility
//! - Run exactly one read per activation on a worker thread.
//! - Expose the outcome as `Loading`, `Failed(reason)` or `Ready(value)`.
//! - Discard results that arrive after the consumer deactivated.
//!
//! # Invariants
//! - State moves out of `Loading` at most once per activation.
//! - After `deactivate`, neither `poll` nor `wait` applies a late result.
//! - Failures are surfaced as state, never retried here.

use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Observable outcome of one activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState<T> {
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Cooperative cancellation flag shared with the worker.
///
/// Blocking I/O is not interrupted; the worker checks the token before it
/// publishes a result.
#[derive(Debug, Clone)]
pub struct CancelToken {
    active: Arc<AtomicBool>,
}

impl CancelToken {
    fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        !self.active.load(Ordering::SeqCst)
    }

    fn cancel(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

/// Handle to one in-flight (or resolved) read.
#[derive(Debug)]
pub struct Activation<T> {
    id: Uuid,
    label: &'static str,
    token: CancelToken,
    receiver: Option<Receiver<Result<T, String>>>,
    state: FetchState<T>,
}

impl<T: Send + 'static> Activation<T> {
    /// Spawns `work` on a worker thread and returns in `Loading`.
    ///
    /// `label` names the read in log events.
    pub fn spawn<F>(label: &'static str, work: F) -> Self
    where
        F: FnOnce(&CancelToken) -> Result<T, String> + Send + 'static,
    {
        let id = Uuid::new_v4();
        let token = CancelToken::new();
        let (sender, receiver) = mpsc::channel();
        let worker_token = token.clone();

        info!("event=fetch_start module=fetch source={label} activation_id={id}");
        std::thread::spawn(move || {
            let started_at = Instant::now();
            let result = work(&worker_token);
            if worker_token.is_cancelled() {
                debug!(
                    "event=fetch_discard module=fetch source={label} activation_id={id} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                return;
            }
            // Receiver may already be gone if the activation was dropped.
            let _ = sender.send(result);
        });

        Self {
            id,
            label,
            token,
            receiver: Some(receiver),
            state: FetchState::Loading,
        }
    }

    /// Creates an activation that is already resolved, without a worker.
    pub fn resolved(label: &'static str, result: Result<T, String>) -> Self {
        let mut activation = Self {
            id: Uuid::new_v4(),
            label,
            token: CancelToken::new(),
            receiver: None,
            state: FetchState::Loading,
        };
        activation.apply(result);
        activation
    }
}

impl<T> Activation<T> {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Applies a finished result if one arrived; never blocks.
    pub fn poll(&mut self) -> &FetchState<T> {
        if let Some(receiver) = &self.receiver {
            match receiver.try_recv() {
                Ok(result) => self.apply(result),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => self.worker_lost(),
            }
        }
        &self.state
    }

    /// Blocks until the read resolves; returns immediately once deactivated.
    pub fn wait(&mut self) -> &FetchState<T> {
        if let Some(receiver) = &self.receiver {
            match receiver.recv() {
                Ok(result) => self.apply(result),
                Err(_) => self.worker_lost(),
            }
        }
        &self.state
    }

    /// Invalidates the token; any late result becomes a no-op.
    pub fn deactivate(&mut self) {
        if self.receiver.take().is_some() {
            info!(
                "event=fetch_cancel module=fetch source={} activation_id={}",
                self.label, self.id
            );
        }
        self.token.cancel();
    }

    /// Returns the resolved value, if any, consuming the activation.
    pub fn into_ready(mut self) -> Option<T> {
        match std::mem::replace(&mut self.state, FetchState::Loading) {
            FetchState::Ready(value) => Some(value),
            _ => None,
        }
    }

    fn apply(&mut self, result: Result<T, String>) {
        self.receiver = None;
        if self.token.is_cancelled() {
            return;
        }
        self.state = match result {
            Ok(value) => {
                info!(
                    "event=fetch_done module=fetch status=ok source={} activation_id={}",
                    self.label, self.id
                );
                FetchState::Ready(value)
            }
            Err(reason) => {
                warn!(
                    "event=fetch_done module=fetch status=error source={} activation_id={}",
                    self.label, self.id
                );
                FetchState::Failed(reason)
            }
        };
    }

    fn worker_lost(&mut self) {
        self.apply(Err(format!("{} worker stopped before reporting", self.label)));
    }
}

impl<T> Drop for Activation<T> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::{Activation, FetchState};
    use std::sync::mpsc;

    #[test]
    fn wait_resolves_ready_value() {
        let mut activation = Activation::spawn("numbers", |_| Ok(vec![1, 2, 3]));
        assert_eq!(activation.wait(), &FetchState::Ready(vec![1, 2, 3]));
        // A second wait keeps the resolved state.
        assert_eq!(activation.wait(), &FetchState::Ready(vec![1, 2, 3]));
    }

    #[test]
    fn failure_is_terminal_state() {
        let mut activation =
            Activation::<Vec<u8>>::spawn("numbers", |_| Err("network timeout".to_string()));
        assert_eq!(
            activation.wait(),
            &FetchState::Failed("network timeout".to_string())
        );
    }

    #[test]
    fn poll_stays_loading_until_worker_finishes() {
        let (release, gate) = mpsc::channel::<()>();
        let mut activation = Activation::spawn("gated", move |_| {
            gate.recv().map_err(|err| err.to_string())?;
            Ok(5)
        });
        assert!(activation.poll().is_loading());
        release.send(()).unwrap();
        assert_eq!(activation.wait(), &FetchState::Ready(5));
    }

    #[test]
    fn late_result_after_deactivate_is_discarded() {
        let (release, gate) = mpsc::channel::<()>();
        let (finished_tx, finished_rx) = mpsc::channel::<bool>();
        let mut activation = Activation::spawn("gated", move |token| {
            gate.recv().map_err(|err| err.to_string())?;
            let _ = finished_tx.send(token.is_cancelled());
            Ok(5)
        });

        activation.deactivate();
        release.send(()).unwrap();
        assert!(finished_rx.recv().unwrap(), "worker should observe cancellation");

        assert!(activation.poll().is_loading());
        assert!(activation.wait().is_loading());
        assert!(!activation.is_active());
    }

    #[test]
    fn panicking_worker_reports_failure() {
        let mut activation = Activation::<u8>::spawn("boom", |_| panic!("worker blew up"));
        match activation.wait() {
            FetchState::Failed(reason) => assert!(reason.contains("boom")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn resolved_activation_needs_no_worker() {
        let activation = Activation::resolved("inline", Ok("done"));
        assert_eq!(activation.into_ready(), Some("done"));
    }
}
