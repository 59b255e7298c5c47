use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};

use lectern_db::{Database, StoreError};
use lectern_types::api::{Claims, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use lectern_types::models::User;

use crate::error::ApiError;
use crate::parse_created_at;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let RegisterRequest {
        username,
        password,
        role,
    } = req;

    // Password length and username uniqueness are checked by the store so
    // their messages reach the client verbatim.
    let db = state.clone();
    let (user_id, username, role) = tokio::task::spawn_blocking(move || {
        let id = db.db.register_user(&username, &password, &role)?;
        Ok::<_, StoreError>((id, username, role))
    })
    .await??;

    let token = create_token(&state.jwt_secret, user_id, &username, &role)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse { user_id, token }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Run the blocking lookup and hash verification off the async runtime.
    let db = state.clone();
    let user = tokio::task::spawn_blocking(move || {
        db.db.authenticate_user(&req.username, &req.password)
    })
    .await??
    .ok_or(ApiError::Unauthorized)?;

    let token = create_token(&state.jwt_secret, user.id, &user.username, &user.role)?;

    Ok(Json(LoginResponse {
        user: User {
            id: user.id,
            username: user.username,
            role: user.role,
            created_at: parse_created_at(&user.created_at),
        },
        token,
    }))
}

fn create_token(secret: &str, user_id: i64, username: &str, role: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        role: role.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{DecodingKey, Validation, decode};

    #[test]
    fn issued_tokens_round_trip() {
        let token = create_token("test-secret", 42, "alice", "student").unwrap();

        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::default(),
        )
        .unwrap();

        assert_eq!(data.claims.sub, 42);
        assert_eq!(data.claims.username, "alice");
        assert_eq!(data.claims.role, "student");
    }

    #[test]
    fn tokens_fail_with_the_wrong_secret() {
        let token = create_token("test-secret", 42, "alice", "student").unwrap();

        assert!(
            decode::<Claims>(
                &token,
                &DecodingKey::from_secret(b"other-secret"),
                &Validation::default(),
            )
            .is_err()
        );
    }
}
