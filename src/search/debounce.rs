//! Quiet-window debouncer.
//!
//! A [`Debouncer`] forwards the latest pushed value once no newer value has
//! arrived for the whole window. Every push restarts the window, so a burst
//! of N values yields one emission carrying the last value, timed from the
//! last arrival.
//!
//! The debouncer runs as a tokio task on the current runtime and emits on an
//! unbounded channel that the session loop drains alongside its other
//! inputs.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Handle to a running debounce task.
///
/// Dropping the handle cancels the task; a pending value is discarded.
#[derive(Debug)]
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    cancel: CancellationToken,
    window: Duration,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Starts a debounce task with the given quiet window.
    ///
    /// Returns the handle and the receiver of stabilized values. Must be
    /// called from within a tokio runtime.
    #[must_use]
    pub fn spawn(window: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (input, mut input_rx) = mpsc::unbounded_channel::<T>();
        let (output, output_rx) = mpsc::unbounded_channel::<T>();
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        tokio::spawn(async move {
            loop {
                let mut latest = tokio::select! {
                    biased;
                    () = task_cancel.cancelled() => return,
                    value = input_rx.recv() => match value {
                        Some(value) => value,
                        None => return,
                    },
                };

                loop {
                    tokio::select! {
                        biased;
                        () = task_cancel.cancelled() => return,
                        value = input_rx.recv() => match value {
                            Some(value) => latest = value,
                            None => return,
                        },
                        () = sleep(window) => break,
                    }
                }

                if output.send(latest).is_err() {
                    tracing::trace!("debounce receiver dropped");
                    return;
                }
            }
        });

        (
            Self {
                input,
                cancel,
                window,
            },
            output_rx,
        )
    }

    /// Pushes a new value and restarts the quiet window.
    ///
    /// Returns `false` if the debouncer has been cancelled.
    pub fn push(&self, value: T) -> bool {
        !self.cancel.is_cancelled() && self.input.send(value).is_ok()
    }

    /// Stops the task. Any value still inside its window is never emitted.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, timeout};

    const WINDOW: Duration = Duration::from_millis(400);

    #[tokio::test(start_paused = true)]
    async fn burst_yields_single_emission_of_last_value() {
        let (debouncer, mut rx) = Debouncer::spawn(WINDOW);

        for value in ["r", "ru", "rus", "rust"] {
            assert!(debouncer.push(value.to_string()));
            advance(Duration::from_millis(100)).await;
        }

        let emitted = timeout(Duration::from_secs(5), rx.recv()).await;
        assert_eq!(emitted.ok().flatten().as_deref(), Some("rust"));

        let nothing_else = timeout(Duration::from_secs(5), rx.recv()).await;
        assert!(nothing_else.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn window_is_timed_from_last_arrival() {
        let (debouncer, mut rx) = Debouncer::spawn(WINDOW);
        let started = tokio::time::Instant::now();

        debouncer.push(1_u32);
        advance(Duration::from_millis(300)).await;
        debouncer.push(2_u32);

        let emitted = rx.recv().await;
        assert_eq!(emitted, Some(2));
        assert!(started.elapsed() >= Duration::from_millis(700));
    }

    #[tokio::test(start_paused = true)]
    async fn separate_bursts_emit_separately() {
        let (debouncer, mut rx) = Debouncer::spawn(WINDOW);

        debouncer.push("a");
        assert_eq!(rx.recv().await, Some("a"));
        debouncer.push("b");
        assert_eq!(rx.recv().await, Some("b"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_discards_pending_value() {
        let (debouncer, mut rx) = Debouncer::spawn(WINDOW);

        debouncer.push("pending");
        debouncer.cancel();
        assert!(!debouncer.push("late"));

        let emitted = timeout(Duration::from_secs(5), rx.recv()).await;
        assert!(matches!(emitted, Ok(None) | Err(_)));
    }
}
