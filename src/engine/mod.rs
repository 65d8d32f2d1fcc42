//! Check engine.
//!
//! Provides check orchestration, result aggregation and bounded polling.

pub mod orchestrator;
pub mod poll;
pub mod result;
