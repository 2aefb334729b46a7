use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::token::hash_token;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    /// Hash of the token this request authenticated with; logout deletes
    /// exactly this row.
    pub token_hash: String,
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized)?;

    let token_hash = hash_token(token);

    // The FK from auth_tokens to accounts cascades on delete, so a live
    // token row implies a live account.
    let account_id = sqlx::query_scalar::<_, Uuid>(
        "SELECT account_id FROM auth_tokens WHERE token_hash = $1",
    )
    .bind(&token_hash)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::Unauthorized)?;

    req.extensions_mut().insert(AuthUser {
        id: account_id,
        token_hash,
    });
    Ok(next.run(req).await)
}
