use std::sync::atomic::{AtomicU64, Ordering};

/// Issues Unix-epoch timestamps in seconds that never go backwards.
///
/// The wall clock can step back (NTP corrections, manual changes). Every
/// reading is clamped to the largest value handed out so far. Timestamps are
/// non-negative finite `f64`s, whose bit patterns order the same way as their
/// values, so the high-water mark is kept as raw bits in an atomic.
#[derive(Debug, Default)]
pub struct StatusClock {
    high_water: AtomicU64,
}

impl StatusClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current wall-clock time, clamped to be `>=` every earlier result.
    pub fn now(&self) -> f64 {
        self.observe(wall_clock_secs())
    }

    fn observe(&self, reading: f64) -> f64 {
        let reading = if reading.is_finite() && reading > 0.0 {
            reading
        } else {
            0.0
        };
        let bits = reading.to_bits();
        let previous = self.high_water.fetch_max(bits, Ordering::AcqRel);
        f64::from_bits(previous.max(bits))
    }
}

fn wall_clock_secs() -> f64 {
    time::OffsetDateTime::now_utc().unix_timestamp_nanos() as f64 / 1e9
}
