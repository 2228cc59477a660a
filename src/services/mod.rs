//! Business logic layer.
//!
//! Each service owns an `Arc<DbPool>` and, where it emits domain events, an
//! optional `Arc<EventSender>`. Lifecycle writes happen inside transactions;
//! authorization checks that need fetched row data (ownership) happen here,
//! coarse role checks happen in the handlers.

pub mod analytics;
pub mod announcements;
pub mod cylinders;
pub mod inventory;
pub mod orders;
pub mod ratings;
pub mod safety;
pub mod users;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^1[3-9]\d{9}$").expect("phone regex is valid"));

/// Mainland mobile number check, applied wherever a phone field is accepted.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_RE.is_match(phone) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone");
        err.message = Some("phone must be a valid 11-digit mobile number".into());
        Err(err)
    }
}
