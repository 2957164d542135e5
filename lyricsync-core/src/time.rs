//! Conversions between `Duration` and the integer milliseconds used by the
//! lyric model, saturating instead of truncating.

use std::time::Duration;

/// Extension trait for safe Duration conversions.
pub trait DurationExt {
    /// Convert duration to milliseconds as u64, saturating at `u64::MAX`.
    fn as_millis_u64(&self) -> u64;

    /// Convert duration to milliseconds as i64, saturating at `i64::MAX`.
    ///
    /// This is the signed position type accepted by
    /// [`LyricSync::advance`](crate::LyricSync::advance).
    fn as_millis_i64(&self) -> i64;
}

impl DurationExt for Duration {
    fn as_millis_u64(&self) -> u64 {
        u64::try_from(self.as_millis()).unwrap_or(u64::MAX)
    }

    fn as_millis_i64(&self) -> i64 {
        i64::try_from(self.as_millis()).unwrap_or(i64::MAX)
    }
}
