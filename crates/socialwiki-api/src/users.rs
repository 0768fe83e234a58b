use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::{error, info, warn};

use socialwiki_db::{SaveError, UserLookup, UserStore};
use socialwiki_types::api::{CreateUserRequest, LoginRequest};
use socialwiki_types::models::NewUser;

use crate::AppState;

/// POST /createUser. Responds with the session view of the new account.
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    // Validate input
    let name_len = req.user_name.chars().count();
    if !(3..=32).contains(&name_len) {
        return Err(StatusCode::BAD_REQUEST);
    }
    if !req.email.contains('@') {
        return Err(StatusCode::BAD_REQUEST);
    }
    if req.password.len() < 8 {
        return Err(StatusCode::BAD_REQUEST);
    }

    let user = tokio::task::spawn_blocking(move || {
        let password_hash = hash_password(&req.password).map_err(|e| {
            error!("Password hashing failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

        let new_user = NewUser {
            user_name: req.user_name,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password_hash,
        };

        state.db.create_user(&new_user).map_err(|e| match e {
            SaveError::Rejected(reason) => {
                warn!("User '{}' not created: {}", new_user.user_name, reason);
                StatusCode::CONFLICT
            }
            SaveError::Store(e) => {
                error!("DB create_user error: {:#}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        })
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })??;

    info!("User {} '{}' created", user.id(), user.user_name);

    Ok((StatusCode::CREATED, Json(user.as_session_user())))
}

/// POST /login. Checks the password and returns the session view; no token
/// or cookie is issued.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let session = tokio::task::spawn_blocking(move || {
        let mut matches = state.db.find_by_user_name(&req.user_name).map_err(|e| {
            error!("DB find_by_user_name error: {:#}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        if matches.len() != 1 {
            return Err(StatusCode::UNAUTHORIZED);
        }
        let user = matches.remove(0);

        if !verify_password(&req.password, &user.password_hash)? {
            return Err(StatusCode::UNAUTHORIZED);
        }

        Ok(user.as_session_user())
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })??;

    Ok(Json(session))
}

/// Argon2id with a fresh random salt, encoded as a PHC string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// `Ok(false)` on a wrong password. A stored hash that does not parse is a
/// server-side fault.
fn verify_password(password: &str, stored: &str) -> Result<bool, StatusCode> {
    let parsed = PasswordHash::new(stored).map_err(|e| {
        error!("Stored password hash is unreadable: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_are_salted_and_verifiable() {
        let a = hash_password("correct horse").unwrap();
        let b = hash_password("correct horse").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));

        assert!(verify_password("correct horse", &a).unwrap());
        assert!(!verify_password("wrong horse", &a).unwrap());
    }

    #[test]
    fn garbage_hash_is_server_error() {
        assert_eq!(
            verify_password("anything", "plaintext").unwrap_err(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
