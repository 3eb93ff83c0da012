use actix_session::Session;
use rand::Rng;

use crate::errors::AppError;

const SESSION_KEY: &str = "csrf_token";

/// Get the CSRF token from the session, or generate a new one.
pub fn get_or_create_token(session: &Session) -> String {
    if let Some(token) = issued_token(session) {
        return token;
    }
    let token = generate_token();
    let _ = session.insert(SESSION_KEY, &token);
    token
}

/// The token previously issued to this session, if any.
pub fn issued_token(session: &Session) -> Option<String> {
    session.get::<String>(SESSION_KEY).unwrap_or(None)
}

/// Validate the submitted CSRF token against the session token.
pub fn validate_csrf(session: &Session, submitted: &str) -> Result<(), AppError> {
    if tokens_match(issued_token(session).as_deref(), submitted) {
        Ok(())
    } else {
        Err(AppError::Csrf)
    }
}

/// True when a token was issued and the submitted one equals it.
pub fn tokens_match(issued: Option<&str>, submitted: &str) -> bool {
    match issued {
        Some(stored) if !stored.is_empty() => constant_time_eq(stored, submitted),
        _ => false,
    }
}

/// Generate a random 32-byte hex token.
pub fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
