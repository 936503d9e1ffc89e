//! Single-fire cancellation for a running interval.
//!
//! A [`CancelHandle`] fires at most once; the matching [`CancelSignal`] is
//! awaited by the clock inside its `select!`. A background interrupt listener
//! owns the handle, the foreground loop owns the signal, and nothing else is
//! shared between them.

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Sending half. Dropping it without firing leaves the signal pending forever.
#[derive(Debug)]
pub struct CancelHandle {
    tx: Option<oneshot::Sender<()>>,
}

impl CancelHandle {
    /// Fire the cancellation. Later calls are no-ops.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Receiving half, awaited by the foreground loop.
#[derive(Debug)]
pub struct CancelSignal {
    rx: Option<oneshot::Receiver<()>>,
    fired: bool,
    listener: Option<JoinHandle<()>>,
}

/// Create a connected handle/signal pair.
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = oneshot::channel();
    (
        CancelHandle { tx: Some(tx) },
        CancelSignal {
            rx: Some(rx),
            fired: false,
            listener: None,
        },
    )
}

impl CancelSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        Self {
            rx: None,
            fired: false,
            listener: None,
        }
    }

    /// Tie a background listener task to this signal; it is aborted when the
    /// signal is dropped.
    pub fn with_listener(mut self, listener: JoinHandle<()>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.fired
    }

    /// Resolves once the handle fires. Cancel-safe, so it can sit in a
    /// `select!` loop and be re-created each iteration.
    pub async fn cancelled(&mut self) {
        if self.fired {
            return;
        }
        if let Some(rx) = self.rx.as_mut() {
            if rx.await.is_ok() {
                self.fired = true;
                self.rx = None;
                return;
            }
            // Handle dropped without firing.
            self.rx = None;
        }
        std::future::pending::<()>().await
    }
}

impl Drop for CancelSignal {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}

/// Produces one cancellation signal per interval (or prompt).
pub trait InterruptSource {
    fn arm(&mut self) -> CancelSignal;
}

/// Interrupts from the OS: Ctrl-C, plus SIGTERM on unix.
///
/// Each call to [`InterruptSource::arm`] spawns one listener task that turns
/// the next interrupt into a single cancellation. Must be called from within a
/// tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsInterrupts;

impl InterruptSource for OsInterrupts {
    fn arm(&mut self) -> CancelSignal {
        let (mut handle, signal) = cancel_pair();
        // Registered before returning so a signal sent right after `arm`
        // is not lost.
        let terminate = terminate_stream();
        let listener = tokio::spawn(async move {
            match interrupted(terminate).await {
                Ok(()) => {
                    debug!("interrupt received");
                    handle.cancel();
                }
                Err(e) => warn!(error = %e, "failed to listen for interrupt"),
            }
        });
        signal.with_listener(listener)
    }
}

#[cfg(unix)]
type TerminateStream = Option<tokio::signal::unix::Signal>;
#[cfg(not(unix))]
type TerminateStream = ();

#[cfg(unix)]
fn terminate_stream() -> TerminateStream {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(stream) => Some(stream),
        Err(e) => {
            warn!(error = %e, "failed to listen for SIGTERM");
            None
        }
    }
}

#[cfg(not(unix))]
fn terminate_stream() -> TerminateStream {}

#[cfg(unix)]
async fn interrupted(terminate: TerminateStream) -> std::io::Result<()> {
    let Some(mut sigterm) = terminate else {
        return tokio::signal::ctrl_c().await;
    };
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = sigterm.recv() => {
            debug!("SIGTERM received");
            Ok(())
        }
    }
}

#[cfg(not(unix))]
async fn interrupted(_terminate: TerminateStream) -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn fires_once() {
        let (mut handle, mut signal) = cancel_pair();
        assert!(!signal.is_cancelled());
        handle.cancel();
        handle.cancel();
        signal.cancelled().await;
        assert!(signal.is_cancelled());
        // Already fired: resolves immediately.
        signal.cancelled().await;
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_handle_never_fires() {
        let (handle, mut signal) = cancel_pair();
        drop(handle);
        let fired = tokio::time::timeout(Duration::from_secs(5), signal.cancelled()).await;
        assert!(fired.is_err());
        assert!(!signal.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn never_stays_pending() {
        let mut signal = CancelSignal::never();
        let fired = tokio::time::timeout(Duration::from_secs(1), signal.cancelled()).await;
        assert!(fired.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn sigterm_cancels_armed_interval() {
        let mut signal = OsInterrupts.arm();
        let status = std::process::Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        let fired = tokio::time::timeout(Duration::from_secs(5), signal.cancelled()).await;
        assert!(fired.is_ok(), "SIGTERM did not cancel");
        assert!(signal.is_cancelled());
    }

    #[tokio::test]
    async fn dropping_signal_aborts_listener() {
        let listener = tokio::spawn(std::future::pending::<()>());
        let abort = listener.abort_handle();
        let signal = CancelSignal::never().with_listener(listener);
        drop(signal);
        for _ in 0..10 {
            if abort.is_finished() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(abort.is_finished());
    }
}
