//! Workflow services.
//!
//! Each component service owns one slice of the report lifecycle; the
//! [`workflow::WorkflowService`] facade composes them and owns the
//! transaction boundaries that span more than one of them.

pub mod assignment;
pub mod report;
pub mod resolution;
pub mod workflow;

pub use assignment::{
    AssignmentService, BulkProgressUpdate, BulkUpdateFailure, BulkUpdateOutcome,
};
pub use report::{
    CrimeDetails, ExtensionInput, FacilityDetails, ReportService, SubmitReportInput,
    UpdateReportFields,
};
pub use resolution::{ResolutionService, ResolveReportInput};
pub use workflow::{AssignmentView, ReportView, WorkflowService};
