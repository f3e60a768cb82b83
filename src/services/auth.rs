use crate::auth::verify_password;
use crate::forms::auth::LoginFormPayload;

use super::{ServiceError, ServiceResult};

/// Checks the submitted password against the configured hash.
pub fn login(payload: &LoginFormPayload, password_hash: &str) -> ServiceResult<()> {
    match verify_password(&payload.password, password_hash) {
        Ok(true) => {
            log::info!("Admin logged in");
            Ok(())
        }
        Ok(false) => {
            log::warn!("Rejected admin login with a wrong password");
            Err(ServiceError::Unauthorized)
        }
        Err(e) => {
            log::error!("Configured admin password hash is invalid: {e}");
            Err(ServiceError::Internal)
        }
    }
}
