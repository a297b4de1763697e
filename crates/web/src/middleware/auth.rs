use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::collections::HashMap;

use crate::error::WebError;
use crate::state::AppState;

/// Bearer-token table for arena clients. Leases are tracked per worker, so
/// each token resolves to a worker identity rather than just passing a
/// yes/no check.
#[derive(Clone, Default)]
pub struct WorkerKeys {
    tokens: HashMap<String, String>,
}

impl WorkerKeys {
    /// Parse `worker_name:token` pairs from a comma-separated string;
    /// malformed entries are skipped with a warning.
    pub fn from_comma_separated(keys_str: &str) -> Self {
        let mut tokens = HashMap::new();
        for entry in keys_str.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match entry.split_once(':') {
                Some((name, token)) if !name.is_empty() && !token.is_empty() => {
                    tokens.insert(token.to_string(), name.to_string());
                }
                _ => tracing::warn!("Skipping malformed worker key entry"),
            }
        }

        Self { tokens }
    }

    pub fn worker_for(&self, token: &str) -> Option<&str> {
        self.tokens.get(token).map(String::as_str)
    }
}

/// Authenticated worker identity, extracted from the bearer token.
pub struct Worker(pub String);

#[async_trait]
impl FromRequestParts<AppState> for Worker {
    type Rejection = WebError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(WebError::Unauthorized)?;

        match state.worker_keys.worker_for(token) {
            Some(worker) => Ok(Worker(worker.to_string())),
            None => {
                tracing::warn!("Invalid worker API key attempt");
                Err(WebError::Unauthorized)
            }
        }
    }
}
