//! Mock collaborators for testing without AWS, systemd or a live application.
//!
//! Commands, HTTP endpoints and sleeping are all scripted; the HTTP mock
//! reads the virtual clock the sleeper advances, so polling schedules can
//! be tested in microseconds.

pub mod platform;

pub use platform::*;
