//! API key exchange and bearer-token authentication.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ApiError;
use crate::response::Envelope;
use crate::state::AppState;

/// How long a token stays valid when no lifetime is configured.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(3600);

/// Tokens issued by `POST /api/auth` with the instant each was issued.
///
/// Expired tokens are dropped whenever a new one is issued, so the map only
/// holds tokens from the last `ttl`.
#[derive(Debug, Clone)]
pub struct Sessions {
    tokens: Arc<RwLock<HashMap<Uuid, Instant>>>,
    ttl: Duration,
}

impl Default for Sessions {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Issues a fresh random token, pruning expired ones first.
    pub async fn issue(&self) -> Uuid {
        let token = Uuid::new_v4();
        let now = Instant::now();

        let mut tokens = self.tokens.write().await;
        tokens.retain(|_, issued| now.duration_since(*issued) < self.ttl);
        tokens.insert(token, now);
        token
    }

    pub async fn is_valid(&self, token: &Uuid) -> bool {
        self.tokens
            .read()
            .await
            .get(token)
            .is_some_and(|issued| issued.elapsed() < self.ttl)
    }

    /// Number of tokens currently held, including expired ones not yet pruned.
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }
}

#[derive(Deserialize)]
pub struct AuthRequest {
    #[serde(alias = "apiKey")]
    pub api_key: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
}

/// POST /api/auth: exchange the shared API key for a session token.
#[tracing::instrument(skip(state, req))]
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    req: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Json<Envelope<AuthResponse>>, ApiError> {
    let Json(req) = req?;

    if req.api_key != state.config.api_key {
        metrics::counter!("auth_failures").increment(1);
        return Err(ApiError::Unauthorized("Invalid API key"));
    }

    let token = state.sessions.issue().await;
    tracing::info!("session token issued");

    Ok(Json(
        Envelope::data(AuthResponse {
            token: token.to_string(),
        })
        .with_message("Authentication successful"),
    ))
}

/// Middleware rejecting requests without a valid `Authorization: Bearer` token.
pub async fn require_token(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized("Authentication required"))?;

    let valid = match Uuid::parse_str(token.trim()) {
        Ok(token) => state.sessions.is_valid(&token).await,
        Err(_) => false,
    };
    if !valid {
        metrics::counter!("auth_failures").increment(1);
        return Err(ApiError::Unauthorized("Invalid authentication token"));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_issued_tokens_are_valid() {
        let sessions = Sessions::new();
        let token = sessions.issue().await;

        assert!(sessions.is_valid(&token).await);
        assert!(!sessions.is_valid(&Uuid::new_v4()).await);
    }

    #[tokio::test]
    async fn test_expired_tokens_rejected_and_pruned() {
        let sessions = Sessions::with_ttl(Duration::ZERO);

        let first = sessions.issue().await;
        assert!(!sessions.is_valid(&first).await);

        let second = sessions.issue().await;
        assert!(!sessions.is_valid(&second).await);
        assert_eq!(sessions.len().await, 1);
    }

    #[tokio::test]
    async fn test_live_tokens_survive_pruning() {
        let sessions = Sessions::new();
        let first = sessions.issue().await;
        sessions.issue().await;

        assert!(sessions.is_valid(&first).await);
        assert_eq!(sessions.len().await, 2);
    }

    #[test]
    fn test_auth_request_accepts_camel_case() {
        let req: AuthRequest = serde_json::from_str(r#"{"apiKey":"k"}"#).unwrap();
        assert_eq!(req.api_key, "k");
    }
}
