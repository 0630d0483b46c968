//! Attendance session lifecycle
//!
//! A single active session (token, subject, deadline, QR image) is held at a
//! time. Starting a session replaces the previous one wholesale, so an older
//! token stops validating immediately.

pub mod manager;
pub mod types;

pub use manager::SessionManager;
pub use types::{ActiveSession, SessionInfo, SessionSnapshot, SessionSettings};
