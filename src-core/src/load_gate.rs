//! Initial-load gating for the host window.
//!
//! The main window stays hidden until every tracked surface has finished its
//! first page load. The gate keeps the set of labels still pending and opens
//! on the transition to empty.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::{debug, info};

/// Outcome of a load-completion signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateTransition {
    /// Still waiting on other surfaces.
    Waiting { remaining: usize },
    /// This signal was the last one; show the window now.
    Opened,
    /// The gate opened earlier (e.g. a later navigation finished).
    AlreadyOpen,
    /// The label is not tracked, or already reported.
    Ignored,
}

pub struct LoadGate {
    pending: Mutex<HashSet<String>>,
    opened: AtomicBool,
}

impl LoadGate {
    /// Create a gate waiting on the given surface labels.
    ///
    /// A gate with nothing to wait for starts open.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pending: HashSet<String> = labels.into_iter().map(Into::into).collect();
        let opened = pending.is_empty();
        Self {
            pending: Mutex::new(pending),
            opened: AtomicBool::new(opened),
        }
    }

    /// Record that a surface finished loading.
    pub fn mark_loaded(&self, label: &str) -> GateTransition {
        if self.opened.load(Ordering::SeqCst) {
            return GateTransition::AlreadyOpen;
        }

        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if !pending.remove(label) {
            return GateTransition::Ignored;
        }

        if pending.is_empty() {
            // Only one caller can observe the last removal under the lock.
            self.opened.store(true, Ordering::SeqCst);
            info!(label, "All surfaces loaded");
            GateTransition::Opened
        } else {
            debug!(label, remaining = pending.len(), "Surface finished loading");
            GateTransition::Waiting {
                remaining: pending.len(),
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.opened.load(Ordering::SeqCst)
    }

    /// Labels still waiting for their first load, sorted.
    pub fn pending(&self) -> Vec<String> {
        let pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        let mut labels: Vec<String> = pending.iter().cloned().collect();
        labels.sort();
        labels
    }
}

impl std::fmt::Debug for LoadGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadGate")
            .field("pending", &self.pending())
            .field("opened", &self.is_open())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opens_on_last_pending_surface() {
        let gate = LoadGate::new(["main-view", "youtube-view", "youtube-window-1"]);
        assert!(!gate.is_open());

        assert_eq!(
            gate.mark_loaded("youtube-window-1"),
            GateTransition::Waiting { remaining: 2 }
        );
        assert_eq!(
            gate.mark_loaded("main-view"),
            GateTransition::Waiting { remaining: 1 }
        );
        assert!(!gate.is_open());

        assert_eq!(gate.mark_loaded("youtube-view"), GateTransition::Opened);
        assert!(gate.is_open());
        assert!(gate.pending().is_empty());
    }

    #[test]
    fn test_repeat_signal_does_not_count_twice() {
        let gate = LoadGate::new(["a", "b"]);
        assert_eq!(gate.mark_loaded("a"), GateTransition::Waiting { remaining: 1 });
        assert_eq!(gate.mark_loaded("a"), GateTransition::Ignored);
        assert_eq!(gate.pending(), vec!["b".to_string()]);
        assert!(!gate.is_open());
    }

    #[test]
    fn test_untracked_label_is_ignored() {
        let gate = LoadGate::new(["a"]);
        assert_eq!(gate.mark_loaded("devtools"), GateTransition::Ignored);
        assert!(!gate.is_open());
    }

    #[test]
    fn test_later_navigation_after_open() {
        let gate = LoadGate::new(["a"]);
        assert_eq!(gate.mark_loaded("a"), GateTransition::Opened);
        assert_eq!(gate.mark_loaded("a"), GateTransition::AlreadyOpen);
    }

    #[test]
    fn test_empty_gate_starts_open() {
        let gate = LoadGate::new(Vec::<String>::new());
        assert!(gate.is_open());
    }
}
