//! Script evaluation with a result channel.
//!
//! Tauri's `eval` is fire-and-forget. To get a value back the expression is
//! wrapped so the page posts its result to the `surface_script_result`
//! command under a one-time token, which completes the waiting future.

use remix_stage_core::SurfaceError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// How long a page has to answer an evaluation.
pub const SCRIPT_RESULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Default)]
pub struct ScriptResults {
    next_token: AtomicU64,
    pending: Mutex<HashMap<u64, oneshot::Sender<Value>>>,
}

impl ScriptResults {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&self) -> (u64, oneshot::Receiver<Value>) {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed) + 1;
        let (tx, rx) = oneshot::channel();
        self.lock().insert(token, tx);
        (token, rx)
    }

    fn forget(&self, token: u64) {
        self.lock().remove(&token);
    }

    /// Deliver a page result. Returns false for unknown or expired tokens.
    pub fn complete(&self, token: u64, value: Value) -> bool {
        match self.lock().remove(&token) {
            Some(tx) => tx.send(value).is_ok(),
            None => {
                debug!(token, "Script result for unknown token");
                false
            }
        }
    }

    /// Evaluate `expression` through `eval` and wait for the posted result.
    pub async fn evaluate<F>(&self, expression: &str, eval: F) -> Result<Value, SurfaceError>
    where
        F: FnOnce(&str) -> Result<(), SurfaceError>,
    {
        self.evaluate_within(expression, SCRIPT_RESULT_TIMEOUT, eval)
            .await
    }

    async fn evaluate_within<F>(
        &self,
        expression: &str,
        timeout: Duration,
        eval: F,
    ) -> Result<Value, SurfaceError>
    where
        F: FnOnce(&str) -> Result<(), SurfaceError>,
    {
        let (token, rx) = self.register();
        if let Err(e) = eval(&wrap_expression(token, expression)) {
            self.forget(token);
            return Err(e);
        }

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(_)) => Err(SurfaceError::Script("result channel closed".to_string())),
            Err(_) => {
                warn!(token, "Script result timed out");
                self.forget(token);
                Err(SurfaceError::ScriptTimeout)
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<u64, oneshot::Sender<Value>>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Wrap an expression so its (awaited) value is posted back under `token`.
/// Exceptions and `undefined` report `null`.
pub fn wrap_expression(token: u64, expression: &str) -> String {
    format!(
        r#"(async () => {{
  let value = null;
  try {{ value = await ({expression}); }} catch (_) {{ value = null; }}
  if (value === undefined) {{ value = null; }}
  window.__TAURI__.core.invoke('surface_script_result', {{ token: {token}, value }});
}})();"#
    )
}
