//! Common utilities and shared types for campuswatch.
//!
//! This crate provides foundational components used across all campuswatch
//! crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Telemetry**: `tracing` subscriber bootstrap for embedding applications
//!
//! # Example
//!
//! ```no_run
//! use campuswatch_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod telemetry;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
