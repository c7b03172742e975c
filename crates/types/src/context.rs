//! Contextual factors supplied by the context collaborator.

use serde::{Deserialize, Serialize};

/// Time-of-day buckets recognized by the context adjuster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// Early hours.
    Morning,
    /// Midday to late afternoon.
    Afternoon,
    /// After-dinner hours.
    Evening,
    /// Late night.
    Night,
}

/// Weather buckets recognized by the context adjuster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    /// Clear and warm.
    Sunny,
    /// Overcast.
    Cloudy,
    /// Wet weather.
    Rainy,
    /// Cold conditions.
    Cold,
}

/// Mood buckets recognized by the context adjuster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    /// Unwinding.
    Relaxed,
    /// Upbeat.
    Energetic,
    /// Slow and thoughtful.
    Contemplative,
    /// Marking an occasion.
    Celebratory,
}

/// Current categorical context tags; absent dimensions are no-ops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextualFactors {
    /// Time-of-day dimension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<TimeOfDay>,
    /// Weather dimension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<Weather>,
    /// Mood dimension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
}

impl ContextualFactors {
    /// True when no dimension is present.
    pub fn is_empty(&self) -> bool {
        self.time_of_day.is_none() && self.weather.is_none() && self.mood.is_none()
    }
}
