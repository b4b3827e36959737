//! Navigation that completes when the new page has loaded.
//!
//! Tauri's `navigate` only queues the navigation. Callers that script the
//! page right after loading it register a waiter under the surface label,
//! which the `on_page_load` hook completes on `PageLoadEvent::Finished`.

use remix_stage_core::SurfaceError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// How long a page has to finish loading after a navigation.
pub const PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(15);

type Waiters = HashMap<String, Vec<(u64, oneshot::Sender<String>)>>;

#[derive(Default)]
pub struct PageLoads {
    next_id: AtomicU64,
    waiting: Mutex<Waiters>,
}

impl PageLoads {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&self, label: &str) -> (u64, oneshot::Receiver<String>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.lock()
            .entry(label.to_string())
            .or_default()
            .push((id, tx));
        (id, rx)
    }

    fn forget(&self, label: &str, id: u64) {
        let mut waiting = self.lock();
        if let Some(waiters) = waiting.get_mut(label) {
            waiters.retain(|(waiter, _)| *waiter != id);
            if waiters.is_empty() {
                waiting.remove(label);
            }
        }
    }

    /// A page finished loading in `label`. Returns how many waiters it released.
    pub fn finished(&self, label: &str, url: &str) -> usize {
        let Some(waiters) = self.lock().remove(label) else {
            return 0;
        };
        let released = waiters.len();
        for (_, tx) in waiters {
            let _ = tx.send(url.to_string());
        }
        debug!(label, url, released, "Page load finished");
        released
    }

    /// Fail every pending navigation of a destroyed surface.
    pub fn close(&self, label: &str) {
        if self.lock().remove(label).is_some() {
            debug!(label, "Dropped pending navigations of closed surface");
        }
    }

    /// Run `navigate` and wait for `label` to report its next finished load.
    pub async fn navigate<F>(&self, label: &str, navigate: F) -> Result<(), SurfaceError>
    where
        F: FnOnce() -> Result<(), SurfaceError>,
    {
        self.navigate_within(label, PAGE_LOAD_TIMEOUT, navigate)
            .await
    }

    async fn navigate_within<F>(
        &self,
        label: &str,
        timeout: Duration,
        navigate: F,
    ) -> Result<(), SurfaceError>
    where
        F: FnOnce() -> Result<(), SurfaceError>,
    {
        // Registered first so a fast load cannot slip past the waiter.
        let (id, rx) = self.register(label);
        if let Err(e) = navigate() {
            self.forget(label, id);
            return Err(e);
        }

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(_url)) => Ok(()),
            Ok(Err(_)) => Err(SurfaceError::Closed(label.to_string())),
            Err(_) => {
                warn!(label, "Page did not finish loading in time");
                self.forget(label, id);
                Err(SurfaceError::Navigation(format!(
                    "{} did not finish loading within {}s",
                    label,
                    timeout.as_secs()
                )))
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Waiters> {
        self.waiting.lock().unwrap_or_else(|e| e.into_inner())
    }
}
