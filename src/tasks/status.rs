//! Periodic status reports emitted by the frame loop

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scheduler::PoolStats;

/// Snapshot of the scheduler, logged as JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    pub timestamp: DateTime<Utc>,
    pub uptime: String,
    pub frames: u64,
    pub timers: PoolStats,
}

impl StatusReport {
    pub fn new(timers: PoolStats, uptime: Duration, frames: u64) -> Self {
        Self {
            timestamp: Utc::now(),
            uptime: format_uptime(uptime),
            frames,
            timers,
        }
    }
}

/// Format a duration as `1h 2m 3s`, dropping leading zero units
pub fn format_uptime(duration: Duration) -> String {
    let hours = duration.as_secs() / 3600;
    let minutes = (duration.as_secs() % 3600) / 60;
    let seconds = duration.as_secs() % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_drops_leading_zero_units() {
        assert_eq!(format_uptime(Duration::from_secs(42)), "42s");
        assert_eq!(format_uptime(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_uptime(Duration::from_secs(3723)), "1h 2m 3s");
    }

    #[test]
    fn report_serializes_pool_counts() {
        let stats = PoolStats {
            pooled: 3,
            active: 1,
            addressable: 1,
            total: 4,
            max_pool_size: 8,
        };
        let report = StatusReport::new(stats, Duration::from_secs(61), 3660);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["uptime"], "1m 1s");
        assert_eq!(json["frames"], 3660);
        assert_eq!(json["timers"]["pooled"], 3);
        assert_eq!(json["timers"]["max_pool_size"], 8);
    }
}
