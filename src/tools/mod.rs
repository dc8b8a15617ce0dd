//! Nutriflow tools
//!
//! One request object and one handler per user action. Handlers run
//! synchronously against a [`Session`](crate::session::Session), log any
//! store failure and hand back a plain error string instead.

pub mod ingredients;
pub mod intake;
pub mod logs;
pub mod status;

use chrono::NaiveDate;
use tracing::error;

use crate::store::StoreError;

/// Log a store failure and turn it into the message returned to the caller
pub(crate) fn failure(action: &str, err: StoreError) -> String {
    error!(error = %err, "{} failed", action);
    format!("{} failed: {}", action, err)
}

pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date {:?}, expected YYYY-MM-DD", s))
}

pub(crate) fn validate_amount(amount: f64) -> Result<(), String> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(format!("Amount must be greater than 0, got {}", amount))
    }
}
