//! Preparation deadline — bounds wall-clock time spent on research notes.
//!
//! Both debaters prepare concurrently. Each call is raced against a shared
//! deadline (and an optional cancellation token); a call that loses the race
//! is dropped, which cancels the in-flight request at its next await point.
//! Whatever finished in time is kept.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::config::DebateConfig;
use super::state::Position;

/// Scale applied to the base preparation time for a research depth.
///
/// Depth 0–2 → 0.8, 3–7 → 1.0, 8–10 → 1.5. Unset depth is 1.0; depths
/// above 10 are treated as 10.
pub fn research_depth_factor(depth: Option<u8>) -> f64 {
    match depth.map(|d| d.min(10)) {
        None => 1.0,
        Some(0..=2) => 0.8,
        Some(3..=7) => 1.0,
        Some(_) => 1.5,
    }
}

/// Effective preparation limit: base time scaled by the larger of the two
/// debaters' research-depth factors. `None` means no deadline.
pub fn preparation_limit(config: &DebateConfig) -> Option<Duration> {
    let base = config.base_preparation_time()?;
    let factor = research_depth_factor(config.affirmative_research_depth)
        .max(research_depth_factor(config.negative_research_depth));
    Some(base.mul_f64(factor))
}

/// Result of one raced call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<T> {
    /// The call returned before the deadline.
    Finished(T),
    /// The deadline (or cancellation) came first; the call was dropped.
    Abandoned,
}

impl<T> Slot<T> {
    pub fn is_abandoned(&self) -> bool {
        matches!(self, Self::Abandoned)
    }

    pub fn finished(self) -> Option<T> {
        match self {
            Self::Finished(v) => Some(v),
            Self::Abandoned => None,
        }
    }
}

/// A deadline shared by concurrent calls, plus a token that ends them early.
#[derive(Debug, Clone)]
pub struct Deadline {
    at: Option<Instant>,
    cancel: CancellationToken,
}

impl Deadline {
    /// Deadline `limit` from now; `None` never expires on its own.
    pub fn after(limit: Option<Duration>) -> Self {
        Self {
            at: limit.map(|d| Instant::now() + d),
            cancel: CancellationToken::new(),
        }
    }

    /// Use an externally owned token, e.g. one cancelled on shutdown.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// When the deadline expires, if bounded.
    pub fn instant(&self) -> Option<Instant> {
        self.at
    }

    /// Race `fut` against this deadline.
    pub async fn bound<F: Future>(&self, fut: F) -> Slot<F::Output> {
        let expiry = async {
            match self.at {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            out = fut => Slot::Finished(out),
            _ = expiry => Slot::Abandoned,
            _ = self.cancel.cancelled() => Slot::Abandoned,
        }
    }

    /// Run two fallible calls concurrently, each bounded by this deadline.
    ///
    /// The first `Err` ends the race at once and drops the other call.
    pub async fn race_pair<A, B, T, U, E>(&self, a: A, b: B) -> Result<(Slot<T>, Slot<U>), E>
    where
        A: Future<Output = Result<T, E>>,
        B: Future<Output = Result<U, E>>,
    {
        futures::future::try_join(
            async { self.bound(a).await.transpose() },
            async { self.bound(b).await.transpose() },
        )
        .await
    }
}

impl<T, E> Slot<Result<T, E>> {
    /// `Finished(Err(e))` becomes `Err(e)`; everything else is `Ok`.
    pub fn transpose(self) -> Result<Slot<T>, E> {
        match self {
            Self::Finished(Ok(v)) => Ok(Slot::Finished(v)),
            Self::Finished(Err(e)) => Err(e),
            Self::Abandoned => Ok(Slot::Abandoned),
        }
    }
}

/// Non-fatal notice that preparation was cut short.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutWarning {
    pub limit: Option<Duration>,
    pub abandoned: Vec<Position>,
}

impl std::fmt::Display for TimeoutWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sides = self
            .abandoned
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        match self.limit {
            Some(limit) => write!(
                f,
                "preparation time limit of {:.1}s reached; proceeding with partial preparation (unfinished: {})",
                limit.as_secs_f64(),
                sides
            ),
            None => write!(
                f,
                "preparation cancelled; proceeding with partial preparation (unfinished: {})",
                sides
            ),
        }
    }
}
