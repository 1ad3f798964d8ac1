//! Transient notifications and the timers that retire them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How long a notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_millis(3000);

/// How long the over-quota alert stays raised.
pub const QUOTA_ALERT_TTL: Duration = Duration::from_millis(2000);

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

/// A single on-screen message. At most one is shown at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}

/// Presentation work the host runs after a delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Timer {
    /// Hide the notice with this id, if it is still shown.
    DismissNotice { id: u64 },
    /// Lower the over-quota alert with this id, if it is still raised.
    ClearQuotaAlert { id: u64 },
}

/// A timer together with its delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheduled {
    pub delay_ms: u64,
    pub timer: Timer,
}

impl Scheduled {
    pub fn new(delay: Duration, timer: Timer) -> Self {
        Self {
            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            timer,
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}
