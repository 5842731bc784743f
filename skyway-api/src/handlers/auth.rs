use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;

use skyway_domain::client::{Client, LoginRequest, RegisterRequest};
use skyway_domain::validation;

use crate::error::AppError;
use crate::middleware::auth::{issue_token, AuthClient};
use crate::response::{created, ok, ApiResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
    client: Client,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/api/auth/me", get(me))
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(axum::http::StatusCode, Json<ApiResponse<AuthResponse>>), AppError> {
    let errors = validation::validate_registration(&req);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let password = req.password.clone();
    // Argon2 is CPU-bound; keep it off the async runtime.
    let hash = tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
    })
    .await
    .map_err(AppError::internal)?
    .map_err(|e| AppError::internal(anyhow::anyhow!("password hashing failed: {}", e)))?;

    let client = state
        .clients()
        .create(
            req.username.trim(),
            req.email.trim(),
            &hash,
            req.first_name.trim(),
            req.last_name.trim(),
        )
        .await?;

    let token = issue_token(&state.auth, &client)?;
    tracing::info!(client_id = client.id, "client registered");

    Ok(created(AuthResponse { token, client }, "registered"))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let invalid = || AppError::Authentication("invalid email or password".to_string());

    let (client, stored_hash) = state
        .clients()
        .find_by_email(req.email.trim())
        .await?
        .ok_or_else(invalid)?;

    let password = req.password.clone();
    let verified = tokio::task::spawn_blocking(move || {
        let Ok(parsed) = PasswordHash::new(&stored_hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
    .await
    .map_err(AppError::internal)?;

    if !verified {
        return Err(invalid());
    }

    let token = issue_token(&state.auth, &client)?;
    Ok(ok(AuthResponse { token, client }, "logged in"))
}

async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthClient>,
) -> Result<Json<ApiResponse<Client>>, AppError> {
    let client = state.clients().find_by_id(auth.id).await?;
    Ok(ok(client, "ok"))
}
