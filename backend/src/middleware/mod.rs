//! Request middleware.
//!
//! Purpose: request lifecycle concerns that sit outside the inbound adapter:
//! trace correlation and per-request logging.

pub mod request_log;
pub mod trace;

pub use request_log::RequestLog;
pub use trace::Trace;
