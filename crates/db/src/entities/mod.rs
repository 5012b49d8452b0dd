//! Database entities.

pub mod account;
pub mod assignment;
pub mod crime_report;
pub mod facility_report;
pub mod report;
pub mod resolution;

pub use account::Entity as Account;
pub use assignment::Entity as Assignment;
pub use crime_report::Entity as CrimeReport;
pub use facility_report::Entity as FacilityReport;
pub use report::Entity as Report;
pub use resolution::Entity as Resolution;
