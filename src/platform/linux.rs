//! Host information.

use crate::PreflightError;
use std::fs;

/// Get the system hostname
pub fn get_hostname() -> Result<String, PreflightError> {
    // Try /etc/hostname first
    if let Ok(hostname) = fs::read_to_string("/etc/hostname") {
        let hostname = hostname.trim().to_string();
        if !hostname.is_empty() {
            return Ok(hostname);
        }
    }

    // Fall back to /proc/sys/kernel/hostname
    if let Ok(hostname) = fs::read_to_string("/proc/sys/kernel/hostname") {
        let hostname = hostname.trim().to_string();
        if !hostname.is_empty() {
            return Ok(hostname);
        }
    }

    if let Ok(hostname) = std::env::var("HOSTNAME") {
        if !hostname.is_empty() {
            return Ok(hostname);
        }
    }

    Err(PreflightError::IoError {
        context: "get_hostname".to_string(),
        message: "Could not read hostname from /etc/hostname, /proc or $HOSTNAME".to_string(),
    })
}
