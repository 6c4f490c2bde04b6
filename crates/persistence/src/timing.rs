//! Query timing.
//!
//! Slow statements are logged at `warn`, everything else at `debug`.

use std::time::{Duration, Instant};

/// Statements slower than this are reported as slow.
pub const SLOW_QUERY_THRESHOLD: Duration = Duration::from_millis(500);

/// Times one database operation and logs its duration when recorded.
///
/// ```ignore
/// let timer = QueryTimer::new("devices.find_by_id");
/// let result = repo.find_by_id(id).await;
/// timer.record();
/// ```
pub struct QueryTimer {
    query_name: String,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: impl Into<String>) -> Self {
        Self {
            query_name: query_name.into(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn record(self) {
        let elapsed = self.elapsed();
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        if elapsed >= SLOW_QUERY_THRESHOLD {
            tracing::warn!(query = %self.query_name, elapsed_ms, "Slow query");
        } else {
            tracing::debug!(query = %self.query_name, elapsed_ms, "Query finished");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_timer_creation() {
        let timer = QueryTimer::new("devices.count_by_name");
        assert_eq!(timer.query_name, "devices.count_by_name");
    }

    #[test]
    fn test_query_timer_elapsed_is_monotonic() {
        let timer = QueryTimer::new(String::from("sensors.find_all"));
        let first = timer.elapsed();
        let second = timer.elapsed();
        assert!(second >= first);
        timer.record();
    }
}
