//! Development-server connection bootstrap.
//!
//! In development the UI is served by a local dev server that may still be
//! starting. The shell probes it with a flat retry loop; if every attempt
//! fails on a refused connection it waits once more and runs a single slower
//! recovery pass.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Flat retry schedule: `attempts` tries, `delay` apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub const INITIAL: RetryPolicy = RetryPolicy {
        attempts: 10,
        delay: Duration::from_secs(1),
    };

    pub const RECOVERY: RetryPolicy = RetryPolicy {
        attempts: 5,
        delay: Duration::from_secs(2),
    };
}

/// Pause before the recovery pass.
pub const RECOVERY_PAUSE: Duration = Duration::from_secs(2);

/// Why a single probe failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// Nothing is listening yet.
    Connection(String),
    Other(String),
}

impl std::fmt::Display for ProbeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection(msg) => write!(f, "connection failed: {}", msg),
            Self::Other(msg) => f.write_str(msg),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Dev server unreachable after {attempts} attempts: {last}")]
pub struct BootstrapError {
    pub attempts: u32,
    pub last: ProbeError,
}

/// Run `probe` under `policy`, sleeping between attempts but not after the
/// last one.
pub async fn retry<F, Fut>(policy: RetryPolicy, mut probe: F) -> Result<u32, (u32, ProbeError)>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), ProbeError>>,
{
    let mut last = ProbeError::Other("no attempts made".to_string());
    for attempt in 1..=policy.attempts {
        match probe().await {
            Ok(()) => return Ok(attempt),
            Err(e) => {
                warn!(attempt, max = policy.attempts, "Dev server probe failed: {}", e);
                last = e;
            }
        }
        if attempt < policy.attempts {
            tokio::time::sleep(policy.delay).await;
        }
    }
    Err((policy.attempts, last))
}

/// Wait for the dev server: one initial pass, then one recovery pass if the
/// initial pass ended on a connection failure.
pub async fn connect_dev_server<F, Fut>(mut probe: F) -> Result<(), BootstrapError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), ProbeError>>,
{
    let (used, last) = match retry(RetryPolicy::INITIAL, &mut probe).await {
        Ok(attempt) => {
            info!(attempt, "Dev server reachable");
            return Ok(());
        }
        Err(failure) => failure,
    };

    if !matches!(last, ProbeError::Connection(_)) {
        return Err(BootstrapError {
            attempts: used,
            last,
        });
    }

    warn!("Dev server still refusing connections, running recovery pass");
    tokio::time::sleep(RECOVERY_PAUSE).await;
    match retry(RetryPolicy::RECOVERY, &mut probe).await {
        Ok(attempt) => {
            info!(attempt, "Dev server reachable after recovery");
            Ok(())
        }
        Err((more, last)) => Err(BootstrapError {
            attempts: used + more,
            last,
        }),
    }
}
