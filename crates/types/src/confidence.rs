//! Confidence score newtype.

use serde::{Deserialize, Serialize};

/// Confidence score clamped to the [0.0, 1.0] range.
///
/// The newtype guarantees the public contract that confidence is always a
/// valid probability-like value: any input is clamped during construction.
///
/// # Examples
///
/// ```
/// use humidor_types::Confidence;
///
/// let c = Confidence::new(0.75);
/// assert_eq!(c.value(), 0.75);
///
/// let high = Confidence::new(1.5);
/// assert_eq!(high.value(), 1.0);
///
/// let low = Confidence::new(-0.5);
/// assert_eq!(low.value(), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    /// Create a new confidence, clamping the value to [0.0, 1.0].
    ///
    /// NaN inputs collapse to 0.0 rather than propagating.
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Get the inner confidence value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Zero confidence.
    #[must_use]
    pub fn zero() -> Self {
        Self(0.0)
    }

    /// Full confidence (1.0).
    #[must_use]
    pub fn full() -> Self {
        Self(1.0)
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self(0.0)
    }
}

impl From<f64> for Confidence {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(conf: Confidence) -> Self {
        conf.0
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
