//! Test doubles shared by unit tests across the crate.
//!
//! Only compiled for `cfg(test)`; integration tests under `tests/` build their
//! own state through the public API.

mod clock;
mod services;

pub use clock::MutableClock;
pub use services::{TestServices, fixture_now};
