//! Core trait definitions

use crate::error::AttendifyResult;
use crate::sink::AttendanceRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// Handlers read time through this so expiry can be driven by tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Write-only store receiving one row per accepted submission
#[async_trait]
pub trait AttendanceSink: Send + Sync {
    /// Append a single attendance row
    async fn append(&self, record: &AttendanceRecord) -> AttendifyResult<()>;

    /// Short name used in logs
    fn name(&self) -> &str;
}
