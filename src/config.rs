//! Widget and server configuration

use std::time::Duration;

/// Maximum characters accepted in a single submission
pub const DEFAULT_CHAR_LIMIT: usize = 500;

/// Simulated backend latency before a reply is produced
pub const DEFAULT_REPLY_LATENCY: Duration = Duration::from_millis(1000);

/// Delay before the "history cleared" notice is appended
pub const DEFAULT_CLEAR_NOTICE_DELAY: Duration = Duration::from_millis(300);

/// How long a screen-reader announcement stays in the live region
pub const DEFAULT_ANNOUNCEMENT_TTL: Duration = Duration::from_secs(1);

/// Constants consumed by the conversation core
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    pub char_limit: usize,
    pub reply_latency: Duration,
    pub clear_notice_delay: Duration,
    pub announcement_ttl: Duration,
    /// Counter switches to the warning level above this share of the limit (percent)
    pub warning_percent: usize,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            char_limit: DEFAULT_CHAR_LIMIT,
            reply_latency: DEFAULT_REPLY_LATENCY,
            clear_notice_delay: DEFAULT_CLEAR_NOTICE_DELAY,
            announcement_ttl: DEFAULT_ANNOUNCEMENT_TTL,
            warning_percent: 90,
        }
    }
}

/// Process-level settings read from the environment
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    pub port: Option<u16>,
    /// Seed for the fallback reply picker; random when unset
    pub seed: Option<u64>,
}

impl ServerConfig {
    pub const DEFAULT_PORT: u16 = 8000;

    pub fn from_env() -> Self {
        Self {
            port: std::env::var("CHATDESK_PORT")
                .ok()
                .and_then(|p| p.parse().ok()),
            seed: std::env::var("CHATDESK_SEED")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(Self::DEFAULT_PORT)
    }
}
