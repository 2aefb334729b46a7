use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::models::sri::{SriCreateRequest, SriSample};
use crate::services::survey::is_survey_due;
use crate::AppState;

/// Whether the account should take an SRI survey today.
pub async fn sri_needed(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<serde_json::Value>> {
    let closed_walk_count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM walk_sessions w
        JOIN calendars c ON c.id = w.calendar_id
        WHERE c.account_id = $1 AND w.ended_at IS NOT NULL
        "#,
    )
    .bind(auth_user.id)
    .fetch_one(&state.db)
    .await?;

    let today_start = Utc::now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always valid")
        .and_utc();
    let tomorrow_start = today_start + Duration::days(1);

    let sampled_today = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM sri_samples
        WHERE account_id = $1 AND sampled_at >= $2 AND sampled_at < $3
        "#,
    )
    .bind(auth_user.id)
    .bind(today_start)
    .bind(tomorrow_start)
    .fetch_one(&state.db)
    .await?
        > 0;

    Ok(Json(serde_json::json!({
        "sri_needed": is_survey_due(closed_walk_count, sampled_today),
    })))
}

pub async fn sri_create(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<SriCreateRequest>,
) -> AppResult<(StatusCode, Json<SriSample>)> {
    let sample = sqlx::query_as::<_, SriSample>(
        r#"
        INSERT INTO sri_samples (id, account_id, score, sampled_at)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(body.sri_score)
    .bind(Utc::now())
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(sample)))
}
