//! Platform abstraction layer.
//!
//! Provides consistent interfaces for:
//! - External command execution
//! - HTTP endpoint probing
//! - Host information

pub mod command;
pub mod http;
pub mod linux;
