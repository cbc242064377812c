//! Reconciliation poller
//!
//! After the control plane accepts a mutation, the resource moves through
//! intermediate states with no notification when it is done. The poller
//! re-reads it at a fixed interval until a probe reports a terminal
//! observation:
//!
//! ```text
//! Pending ──▶ Ready(T)
//!    │    ──▶ Absent
//!    └──────▶ Failed (probe error, Stalled, Timeout, Canceled)
//! ```
//!
//! Every loop is bounded by a maximum attempt count and/or a deadline, and
//! stops as soon as the cancellation token fires. Sleeps go through
//! `tokio::time`, so a paused test clock drives the loop deterministically.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use amqpctl_common::{Error, PollSettings, Result};

/// What a single probe saw
#[derive(Debug, Clone, PartialEq)]
pub enum Observation<T> {
    Ready(T),
    Absent,
    Pending,
}

/// Terminal state of a reconciliation
#[derive(Debug, Clone, PartialEq)]
pub enum Settled<T> {
    Ready(T),
    Absent,
}

impl<T> Settled<T> {
    /// Ready value, or [`Error::Vanished`] when the resource went away instead
    pub fn into_ready(self, what: &str) -> Result<T> {
        match self {
            Settled::Ready(value) => Ok(value),
            Settled::Absent => Err(Error::Vanished {
                what: what.to_string(),
            }),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Settled::Absent)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollConfig {
    pub interval: Duration,
    pub initial_delay: Duration,
    pub max_attempts: Option<u32>,
    pub timeout: Option<Duration>,
}

impl From<&PollSettings> for PollConfig {
    fn from(settings: &PollSettings) -> Self {
        Self {
            interval: settings.interval(),
            initial_delay: settings.initial_delay(),
            max_attempts: settings.max_attempts,
            timeout: settings.timeout(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::from(&PollSettings::default())
    }
}

pub struct Poller {
    config: PollConfig,
    cancel: CancellationToken,
}

impl Poller {
    pub fn new(config: PollConfig, cancel: CancellationToken) -> Self {
        Self { config, cancel }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Drive `probe` until it reports `Ready` or `Absent`.
    ///
    /// A probe error is a terminal failure and is returned as-is; only
    /// `Pending` observations are retried.
    pub async fn run<T, F, Fut>(&self, what: &str, probe: F) -> Result<Settled<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Observation<T>>>,
    {
        let deadline = self.config.timeout.map(|t| Instant::now() + t);

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                warn!("reconciliation of {} canceled", what);
                Err(Error::Canceled { what: what.to_string() })
            }
            _ = until(deadline) => {
                let seconds = self.config.timeout.map(|t| t.as_secs()).unwrap_or_default();
                warn!("reconciliation of {} timed out after {}s", what, seconds);
                Err(Error::Timeout { what: what.to_string(), seconds })
            }
            result = self.attempts(what, probe) => result,
        }
    }

    async fn attempts<T, F, Fut>(&self, what: &str, mut probe: F) -> Result<Settled<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Observation<T>>>,
    {
        if !self.config.initial_delay.is_zero() {
            debug!("waiting {:?} before first read of {}", self.config.initial_delay, what);
            sleep(self.config.initial_delay).await;
        }

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match probe().await? {
                Observation::Ready(value) => {
                    info!("{} ready after {} attempt(s)", what, attempt);
                    return Ok(Settled::Ready(value));
                }
                Observation::Absent => {
                    info!("{} absent after {} attempt(s)", what, attempt);
                    return Ok(Settled::Absent);
                }
                Observation::Pending => {
                    debug!("{} still pending (attempt {})", what, attempt);
                }
            }

            if let Some(max) = self.config.max_attempts {
                if attempt >= max {
                    warn!("{} did not settle after {} attempts", what, attempt);
                    return Err(Error::Stalled {
                        what: what.to_string(),
                        attempts: attempt,
                    });
                }
            }

            sleep(self.config.interval).await;
        }
    }
}

async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
