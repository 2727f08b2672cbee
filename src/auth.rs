// src/auth.rs
//! Caller identity is owned by the upstream services; this guard only
//! extracts the bearer token so it can be forwarded.

use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use tracing::warn;

#[derive(Debug)]
pub enum AuthError {
    InvalidToken,
}

/// `Authorization: Bearer <token>`, if the caller sent one.
#[derive(Debug, Clone, Default)]
pub struct BearerToken(pub Option<String>);

impl BearerToken {
    pub fn into_inner(self) -> Option<String> {
        self.0
    }
}

fn parse_authorization(header: &str) -> Result<String, AuthError> {
    match header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(AuthError::InvalidToken),
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for BearerToken {
    type Error = AuthError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match req.headers().get_one("Authorization") {
            None => Outcome::Success(BearerToken(None)),
            Some(header) => match parse_authorization(header) {
                Ok(token) => Outcome::Success(BearerToken(Some(token))),
                Err(e) => {
                    warn!("Invalid Authorization header format");
                    Outcome::Error((Status::Unauthorized, e))
                }
            },
        }
    }
}
