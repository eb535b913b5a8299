//! Pool occupancy snapshot

use serde::{Deserialize, Serialize};

/// Record counts at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Free records waiting for reuse
    pub pooled: usize,
    /// Records currently counting down
    pub active: usize,
    /// Active records registered under an id
    pub addressable: usize,
    /// Records allocated so far (pooled + active)
    pub total: usize,
    pub max_pool_size: usize,
}

impl PoolStats {
    /// Whether another timer can start without being rejected
    pub fn has_capacity(&self) -> bool {
        self.pooled > 0 || self.total < self.max_pool_size
    }
}
