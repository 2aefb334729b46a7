use axum::{extract::State, http::StatusCode, Extension, Json};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{
    middleware::AuthUser,
    password::{hash_password, verify_password},
    token::{issue_token, revoke_token},
};
use crate::error::{AppError, AppResult};
use crate::models::account::{Account, LoginRequest, SignupRequest, TokenResponse};
use crate::AppState;

/// Map the signup insert outcome to a result. The unique key on
/// `accounts.username` is the source of truth: a losing concurrent signup
/// inserts zero rows and is reported the same way as a pre-existing name.
fn check_signup_insert(rows_affected: u64) -> AppResult<()> {
    if rows_affected == 0 {
        return Err(AppError::Validation("Username already taken".into()));
    }
    Ok(())
}

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    body.validate()?;

    let pwd_hash = hash_password(&body.password)?;
    let account_id = Uuid::new_v4();

    let result = sqlx::query(
        r#"
        INSERT INTO accounts (id, username, password_hash, nickname)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (username) DO NOTHING
        "#,
    )
    .bind(account_id)
    .bind(&body.username)
    .bind(&pwd_hash)
    .bind(&body.nickname)
    .execute(&state.db)
    .await?;

    check_signup_insert(result.rows_affected())?;

    let token = issue_token(&state.db, account_id).await?;
    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    body.validate()?;

    let account =
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE username = $1")
            .bind(&body.username)
            .fetch_optional(&state.db)
            .await?
            .ok_or_else(|| AppError::Validation("Invalid credentials".into()))?;

    if !verify_password(&body.password, &account.password_hash)? {
        return Err(AppError::Validation("Invalid credentials".into()));
    }

    let token = issue_token(&state.db, account.id).await?;
    Ok(Json(TokenResponse { token }))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<serde_json::Value>> {
    revoke_token(&state.db, &auth_user.token_hash).await?;
    Ok(Json(serde_json::json!({ "message": "Logged out successfully" })))
}

/// Account deletion cascades to calendars, walk sessions, SRI samples and
/// the remaining tokens.
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
        .bind(auth_user.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Account not found".into()));
    }

    tracing::info!(account_id = %auth_user.id, "Account deleted");
    Ok(Json(serde_json::json!({ "message": "Account deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_losing_signup_insert_reports_taken_username() {
        let err = check_signup_insert(0).unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "Username already taken"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_winning_signup_insert_is_ok() {
        assert!(check_signup_insert(1).is_ok());
    }

    #[test]
    fn test_signup_request_rejects_short_password() {
        let body = SignupRequest {
            username: "walker".into(),
            nickname: "Walker".into(),
            password: "short".into(),
        };
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_signup_request_rejects_empty_username() {
        let body = SignupRequest {
            username: String::new(),
            nickname: "Walker".into(),
            password: "long enough".into(),
        };
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_signup_request_accepts_valid_body() {
        let body = SignupRequest {
            username: "walker".into(),
            nickname: "Walker".into(),
            password: "long enough".into(),
        };
        assert!(body.validate().is_ok());
    }
}
