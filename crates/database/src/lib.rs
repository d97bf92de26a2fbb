pub mod db;
pub mod entities;
pub mod error;
pub mod scope;
pub mod services;
pub mod validation;

pub use error::{ServiceError, ServiceResult};
pub use scope::{BranchScoped, Scope};
pub use validation::ValidationErrors;

/// Current wall-clock time as stored in timestamp columns
pub(crate) fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

/// The calendar date of [`now`]. Date defaults must use this so a record stamped
/// "now" falls inside the window of "today".
pub fn today() -> chrono::NaiveDate {
    now().date()
}
