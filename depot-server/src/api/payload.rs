//! Request payloads shared by the sensitive endpoints
//!
//! Step-up secrets ride in the request body, never in the session: the JWT
//! proves login, the password proves presence at the keyboard.

use serde::Deserialize;

/// Mutating request: credential + justification + the actual payload
#[derive(Debug, Deserialize)]
pub struct Sensitive<T> {
    pub password: String,
    pub reason: String,
    pub data: T,
}

/// Destructive request without a payload (delete)
#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub password: String,
    pub reason: Option<String>,
}

/// History request: credential only, no justification needed
#[derive(Debug, Deserialize)]
pub struct HistoryRequest {
    pub password: String,
}
