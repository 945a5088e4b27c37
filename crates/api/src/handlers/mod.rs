pub mod business;
pub mod category;
pub mod diagnostic;
pub mod notification;
pub mod storage;

use bazaar_core::validation::from_validation_errors;
use validator::Validate;

use crate::error::AppResult;

/// Run `validator` derive rules on a request body.
pub(crate) fn validate_body<T: Validate>(body: &T) -> AppResult<()> {
    body.validate().map_err(from_validation_errors)?;
    Ok(())
}
