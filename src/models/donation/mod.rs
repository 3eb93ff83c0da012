pub mod display;
pub mod registration;
pub mod report;
pub mod types;
pub mod validate;

pub use self::registration::{RegistrationOutcome, submit};
pub use self::report::{DateRange, ReportQuery, ReportRow, export_csv, list_records};
pub use self::types::*;
pub use self::validate::{ValidationError, validate};
