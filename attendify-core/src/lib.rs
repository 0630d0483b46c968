//! Attendify Core - session token lifecycle, QR rendering and attendance sinks
//!
//! This crate holds everything the HTTP layer calls into: the single active
//! attendance session, the QR image bound to its token, and the best-effort
//! sink that records accepted submissions.

pub mod async_utils;
pub mod config;
pub mod error;
pub mod logging;
pub mod qr;
pub mod session;
pub mod sink;
pub mod token;
pub mod traits;
pub mod types;

pub use async_utils::*;
pub use config::*;
pub use error::*;
pub use logging::*;
pub use session::{SessionInfo, SessionManager, SessionSettings, SessionSnapshot};
pub use sink::{dispatch, sink_from_url, AttendanceRecord, LogSink, MemorySink, WebhookSink};
pub use traits::*;
pub use types::*;

// Re-export commonly used external types
pub use async_trait::async_trait;
pub use chrono;
pub use tracing;
