//! Interval-complete notifications.
//!
//! Notifications are fire-and-forget: a failure is logged and never reaches
//! the interval loop, and delivery never blocks a tick.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::timer::IntervalKind;

pub trait Notifier: Send + Sync {
    /// Announce that an interval of `kind` is about to finish.
    fn notify(&self, kind: IntervalKind);
}

/// Title and body shown for each interval kind.
pub fn message_for(kind: IntervalKind) -> (&'static str, &'static str) {
    match kind {
        IntervalKind::Work => ("Work Complete", "Time for a break!"),
        IntervalKind::Break => ("Break Complete", "Ready for another session?"),
    }
}

/// Desktop notification through the platform notification service.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, kind: IntervalKind) {
        let (summary, body) = message_for(kind);
        let deliver = move || {
            if let Err(e) = notify_rust::Notification::new()
                .summary(summary)
                .body(body)
                .appname("termidoro")
                .show()
            {
                warn!(error = %e, %kind, "failed to show notification");
            } else {
                debug!(%kind, "notification shown");
            }
        };

        // Delivery talks to a system service; keep it off the tick loop.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(deliver);
            }
            Err(_) => {
                std::thread::spawn(deliver);
            }
        }
    }
}

/// Used when sound/notifications are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, kind: IntervalKind) {
        debug!(%kind, "notification suppressed");
    }
}

/// Keeps every notification it receives. Useful in tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<IntervalKind>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<IntervalKind> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: IntervalKind) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(kind);
        }
    }
}

/// Pick the notifier for the configured sound setting.
pub fn notifier_for(sound_enabled: bool) -> Arc<dyn Notifier> {
    if sound_enabled {
        Arc::new(DesktopNotifier)
    } else {
        Arc::new(SilentNotifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_per_kind() {
        assert_eq!(message_for(IntervalKind::Work).0, "Work Complete");
        assert_eq!(message_for(IntervalKind::Break).1, "Ready for another session?");
    }

    #[test]
    fn recording_notifier_shares_history_across_clones() {
        let notifier = RecordingNotifier::new();
        let clone = notifier.clone();
        clone.notify(IntervalKind::Work);
        clone.notify(IntervalKind::Break);
        assert_eq!(notifier.sent(), vec![IntervalKind::Work, IntervalKind::Break]);
    }

    #[test]
    fn silent_notifier_does_nothing() {
        SilentNotifier.notify(IntervalKind::Work);
    }
}
