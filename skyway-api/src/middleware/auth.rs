use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use skyway_domain::client::{Client, Role};

use crate::error::AppError;
use crate::state::{AppState, AuthConfig};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub exp: usize,
}

/// Verified identity, injected into request extensions by the middleware.
#[derive(Debug, Clone)]
pub struct AuthClient {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl AuthClient {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

pub fn issue_token(auth: &AuthConfig, client: &Client) -> Result<String, AppError> {
    let claims = Claims {
        sub: client.id.to_string(),
        username: client.username.clone(),
        email: client.email.clone(),
        role: client.role.as_str().to_string(),
        exp: (Utc::now() + Duration::seconds(auth.expiration as i64)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.secret.as_bytes()),
    )
    .map_err(AppError::internal)
}

fn verify_bearer(state: &AppState, req: &Request) -> Result<AuthClient, AppError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Authentication("missing bearer token".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Authentication("missing bearer token".to_string()))?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Authentication("invalid or expired token".to_string()))?;

    let claims = token_data.claims;
    let id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::Authentication("invalid token subject".to_string()))?;
    let role = Role::parse(&claims.role)
        .map_err(|_| AppError::Authentication("invalid token role".to_string()))?;

    Ok(AuthClient {
        id,
        username: claims.username,
        email: claims.email,
        role,
    })
}

pub async fn client_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = verify_bearer(&state, &req)?;
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

pub async fn admin_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = verify_bearer(&state, &req)?;
    if !identity.is_admin() {
        return Err(AppError::Authorization(
            "admin role required".to_string(),
        ));
    }
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client {
            id: 42,
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            role: Role::Client,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_round_trips() {
        let auth = AuthConfig {
            secret: "test-secret".to_string(),
            expiration: 3600,
        };
        let token = issue_token(&auth, &client()).unwrap();

        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(auth.secret.as_bytes()),
            &Validation::default(),
        )
        .unwrap();

        assert_eq!(decoded.claims.sub, "42");
        assert_eq!(decoded.claims.role, "client");
        assert_eq!(decoded.claims.email, "ada@example.com");
    }

    #[test]
    fn wrong_secret_rejects_token() {
        let auth = AuthConfig {
            secret: "test-secret".to_string(),
            expiration: 3600,
        };
        let token = issue_token(&auth, &client()).unwrap();

        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"other-secret"),
            &Validation::default(),
        );
        assert!(result.is_err());
    }
}
