//! Database repositories.

pub mod account;
pub mod assignment;
pub mod report;
pub mod resolution;

pub use account::AccountRepository;
pub use assignment::AssignmentRepository;
pub use report::{ExtensionActiveModel, ReportExtension, ReportFilter, ReportRepository};
pub use resolution::ResolutionRepository;
