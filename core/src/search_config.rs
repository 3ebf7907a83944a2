use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 10;
pub const DEFAULT_CANCEL_POLL_MS: u64 = 5;

/// Payload carried by UPDATE events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
    /// Only the vertex whose distance just changed.
    #[default]
    Delta,
    /// Every finite distance known at the time of the update.
    Snapshot,
}

/// Configuration for a streaming search instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Capacity of the lazily created event channel
    pub channel_capacity: usize,
    /// Delta or full-snapshot UPDATE payloads
    pub update_mode: UpdateMode,
    /// How often a push blocked on a full channel re-checks the cancel token
    pub cancel_poll_ms: u64,
}

impl SearchConfig {
    pub fn new(channel_capacity: usize, update_mode: UpdateMode) -> Self {
        Self {
            channel_capacity,
            update_mode,
            ..Self::default()
        }
    }

    pub fn with_channel_capacity(mut self, channel_capacity: usize) -> Self {
        self.channel_capacity = channel_capacity;
        self
    }

    pub fn with_update_mode(mut self, update_mode: UpdateMode) -> Self {
        self.update_mode = update_mode;
        self
    }

    pub fn with_cancel_poll_ms(mut self, cancel_poll_ms: u64) -> Self {
        self.cancel_poll_ms = cancel_poll_ms;
        self
    }

    pub fn cancel_poll_interval(&self) -> Duration {
        Duration::from_millis(self.cancel_poll_ms)
    }

    /// Replaces zero capacity or zero poll interval with the defaults.
    pub fn validated(mut self) -> Self {
        if self.channel_capacity == 0 {
            tracing::warn!(
                default = DEFAULT_CHANNEL_CAPACITY,
                "channel capacity must be positive, using default"
            );
            self.channel_capacity = DEFAULT_CHANNEL_CAPACITY;
        }
        if self.cancel_poll_ms == 0 {
            tracing::warn!(
                default = DEFAULT_CANCEL_POLL_MS,
                "cancel poll interval must be positive, using default"
            );
            self.cancel_poll_ms = DEFAULT_CANCEL_POLL_MS;
        }
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            update_mode: UpdateMode::Delta,
            cancel_poll_ms: DEFAULT_CANCEL_POLL_MS,
        }
    }
}
