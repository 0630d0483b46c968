//! HTTP request handlers for the Attendify web server
//!
//! This module contains all the HTTP request handlers organized by functionality.

pub mod attendance;
pub mod config;
pub mod health;
pub mod session;
pub mod types;

pub use attendance::*;
pub use config::*;
pub use health::*;
pub use session::*;

// Re-export all types for convenience
pub use types::*;
