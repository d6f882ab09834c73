//! Login endpoint and bearer-token extraction.
//!
//! # Design
//! `/token` trades the single configured username/password pair for the
//! configured access token. Protected handlers take a `BearerToken`
//! argument; extraction fails with 401 before the handler body runs. Whether
//! the token value itself is compared depends on `TokenCheck`.

use axum::extract::rejection::FormRejection;
use axum::extract::{FromRequestParts, State};
use axum::http::{header, request::Parts};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use crate::config::{AuthSettings, TokenCheck};
use crate::error::ServiceError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Json<TokenResponse>, ServiceError> {
    let Form(form) = form?;
    let auth = &state.auth;
    if form.username != auth.username || form.password != auth.password {
        tracing::info!(username = %form.username, "rejected login");
        return Err(ServiceError::InvalidCredentials);
    }
    tracing::debug!(username = %form.username, "issued access token");
    Ok(Json(TokenResponse {
        access_token: auth.access_token.clone(),
        token_type: "bearer".to_string(),
    }))
}

/// Proof that a request carried an acceptable bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

impl FromRequestParts<AppState> for BearerToken {
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        let token = parse_bearer(header).ok_or(ServiceError::MissingToken)?;
        check_token(&state.auth, token)?;
        Ok(BearerToken(token.to_string()))
    }
}

/// Extract the credential from an `Authorization: Bearer <token>` header.
/// The scheme is case-insensitive; an empty credential is rejected.
fn parse_bearer(header: Option<&str>) -> Option<&str> {
    let (scheme, token) = header?.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

fn check_token(auth: &AuthSettings, token: &str) -> Result<(), ServiceError> {
    match auth.token_check {
        TokenCheck::Presence => Ok(()),
        TokenCheck::Exact if token == auth.access_token => Ok(()),
        TokenCheck::Exact => Err(ServiceError::InvalidToken),
    }
}
