//! Fee-estimation capability.
//!
//! The policy engine never asks for a fee itself. The caller sources exactly
//! one [`FeeEstimate`] per evaluation from a [`FeeEstimator`] and passes it in
//! by value. No live oracle is implemented; the estimators here return
//! configured or scripted values.

use agentguard_core::error::FeeError;
use agentguard_core::types::FeeEstimate;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Something that can produce a current fee estimate.
pub trait FeeEstimator: Send + Sync {
    /// Returns the current fee, answering within `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`FeeError::Timeout`] if no estimate is available in time and
    /// [`FeeError::Unavailable`] if the estimator has nothing to offer.
    fn estimate(&self, timeout: Duration) -> Result<FeeEstimate, FeeError>;
}

impl<T: FeeEstimator + ?Sized> FeeEstimator for Arc<T> {
    fn estimate(&self, timeout: Duration) -> Result<FeeEstimate, FeeError> {
        (**self).estimate(timeout)
    }
}

fn timeout_ms(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

/// Always returns the same estimate.
///
/// ```
/// use agentguard_core::types::FeeEstimate;
/// use agentguard_policy::fee::{FeeEstimator, FixedFeeEstimator};
/// use std::time::Duration;
///
/// let estimator = FixedFeeEstimator::new(FeeEstimate::from_gwei(30));
/// assert_eq!(
///     estimator.estimate(Duration::from_secs(1)).unwrap(),
///     FeeEstimate::from_gwei(30)
/// );
/// assert!(estimator.estimate(Duration::ZERO).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedFeeEstimator {
    fee: FeeEstimate,
}

impl FixedFeeEstimator {
    /// Creates an estimator that always answers `fee`.
    #[must_use]
    pub const fn new(fee: FeeEstimate) -> Self {
        Self { fee }
    }
}

impl FeeEstimator for FixedFeeEstimator {
    fn estimate(&self, timeout: Duration) -> Result<FeeEstimate, FeeError> {
        if timeout.is_zero() {
            return Err(FeeError::timeout(0));
        }
        Ok(self.fee)
    }
}

/// Cycles through a fixed list of estimates, one per call.
///
/// Stands in for a fluctuating network fee in demos and tests. The cursor is
/// atomic so one estimator can be shared between threads.
#[derive(Debug)]
pub struct ScriptedFeeEstimator {
    fees: Vec<FeeEstimate>,
    cursor: AtomicUsize,
}

impl ScriptedFeeEstimator {
    /// Creates an estimator replaying `fees` in order, wrapping around.
    #[must_use]
    pub fn new(fees: impl IntoIterator<Item = FeeEstimate>) -> Self {
        Self {
            fees: fees.into_iter().collect(),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Convenience constructor from whole gwei values.
    #[must_use]
    pub fn from_gwei(gwei: &[u64]) -> Self {
        Self::new(gwei.iter().copied().map(FeeEstimate::from_gwei))
    }

    /// Number of scripted estimates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fees.len()
    }

    /// Returns `true` if there is nothing to replay.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fees.is_empty()
    }
}

impl FeeEstimator for ScriptedFeeEstimator {
    fn estimate(&self, timeout: Duration) -> Result<FeeEstimate, FeeError> {
        if timeout.is_zero() {
            return Err(FeeError::timeout(timeout_ms(timeout)));
        }
        if self.fees.is_empty() {
            return Err(FeeError::unavailable("no scripted fee estimates"));
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.fees.len();
        self.fees
            .get(index)
            .copied()
            .ok_or_else(|| FeeError::unavailable("scripted fee index out of range"))
    }
}
