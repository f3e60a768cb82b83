//! Single-password admin authentication.
//!
//! A successful login stores [`ADMIN_IDENTITY`] in the session through
//! `actix-identity`. Admin handlers take an [`AdminUser`] argument; requests
//! without that identity are redirected to the login page.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError};
use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use thiserror::Error;

/// Identity stored in the session after a successful login.
pub const ADMIN_IDENTITY: &str = "admin";

pub const LOGIN_PATH: &str = "/admin/login";

/// Marker extracted from a session holding the admin identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminUser;

/// Rejection of an admin request without a session.
#[derive(Debug, Error)]
#[error("login required")]
pub struct LoginRequired;

impl ResponseError for LoginRequired {
    fn status_code(&self) -> StatusCode {
        StatusCode::SEE_OTHER
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::SeeOther()
            .insert_header((header::LOCATION, LOGIN_PATH))
            .finish()
    }
}

impl FromRequest for AdminUser {
    type Error = LoginRequired;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let is_admin = req
            .get_identity()
            .ok()
            .and_then(|identity| identity.id().ok())
            .is_some_and(|id| id == ADMIN_IDENTITY);

        ready(if is_admin { Ok(AdminUser) } else { Err(LoginRequired) })
    }
}

/// Hashes `password` into an Argon2id PHC string with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Checks `password` against a stored PHC string.
///
/// A wrong password is `Ok(false)`; a malformed hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    #[test]
    fn hashes_verify_only_the_original_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("x", "not-a-hash").is_err());
    }

    #[test]
    fn login_required_redirects_to_login() {
        let response = LoginRequired.error_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            LOGIN_PATH
        );
    }

    #[actix_web::test]
    async fn request_without_session_is_rejected() {
        let req = TestRequest::default().to_http_request();
        let result = AdminUser::extract(&req).await;
        assert!(result.is_err());
    }
}
