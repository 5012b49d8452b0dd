//! Core business logic for campuswatch.
//!
//! The report lifecycle and assignment-resolution workflow engine: the
//! [`lifecycle`] state machine, one service per workflow component, and the
//! [`WorkflowService`] facade that external callers go through.

pub mod lifecycle;
pub mod services;

pub use services::*;
