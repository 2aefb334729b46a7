use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{Datelike, Timelike, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::handlers::calendar::get_or_create_day;
use crate::models::account::Account;
use crate::models::walk::{
    WalkEndRequest, WalkOnceReport, WalkSatisfyRequest, WalkSession, WalkStartRequest,
};
use crate::services::progression::apply_points;
use crate::AppState;

pub async fn walk_start(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<WalkStartRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if !state.config.allowed_playtimes.contains(&body.playtime) {
        return Err(AppError::Validation(format!(
            "playtime must be one of {:?}",
            state.config.allowed_playtimes
        )));
    }

    let now = Utc::now();
    let today = now.date_naive();
    let (calendar, _) = get_or_create_day(
        &state.db,
        auth_user.id,
        today.year(),
        today.month() as i32,
        today.day() as i32,
    )
    .await?;

    let session = sqlx::query_as::<_, WalkSession>(
        r#"
        INSERT INTO walk_sessions (id, calendar_id, started_at, playtime, course)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(calendar.id)
    .bind(now)
    .bind(body.playtime)
    .bind(&body.course)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(serde_json::json!({
        "walk_history_id": session.id,
        "message": "Start walk successfully",
    })))
}

/// End a walk. One transaction covers the session close, the day bucket's
/// walk-finished flag, and the account's point/level update, with row locks
/// on the session and the account so concurrent endings cannot drop points.
pub async fn walk_end(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(walk_id): Path<Uuid>,
    Json(body): Json<WalkEndRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let mut tx = state.db.begin().await?;

    let session = sqlx::query_as::<_, WalkSession>(
        r#"
        SELECT w.* FROM walk_sessions w
        JOIN calendars c ON c.id = w.calendar_id
        WHERE w.id = $1 AND c.account_id = $2
        FOR UPDATE OF w
        "#,
    )
    .bind(walk_id)
    .bind(auth_user.id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Walk session not found".into()))?;

    if session.is_closed() && !state.config.allow_walk_reclose {
        return Err(AppError::Conflict("Walk session is already ended".into()));
    }

    let (stable_score, stable_loc) = match body.kinect_data {
        Some(kinect) => (kinect.stable_score, kinect.stable_loc),
        None => (None, None),
    };

    sqlx::query(
        r#"
        UPDATE walk_sessions SET
            ended_at = $2,
            stable_score = $3,
            stable_loc = $4,
            distance = $5,
            course = COALESCE($6, course)
        WHERE id = $1
        "#,
    )
    .bind(session.id)
    .bind(Utc::now())
    .bind(stable_score)
    .bind(&stable_loc)
    .bind(body.distance)
    .bind(&body.course)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE calendars SET walk_finished = true WHERE id = $1")
        .bind(session.calendar_id)
        .execute(&mut *tx)
        .await?;

    let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1 FOR UPDATE")
        .bind(auth_user.id)
        .fetch_one(&mut *tx)
        .await?;

    let delta = state.config.rewards.walk_reward(stable_score, body.distance);
    let (level, points) = apply_points(account.level, account.points, delta);

    sqlx::query(
        r#"
        UPDATE accounts SET level = $2, points = $3, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(account.id)
    .bind(level)
    .bind(points)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        account_id = %auth_user.id,
        walk_id = %walk_id,
        delta = delta,
        level = level,
        "Walk ended"
    );

    Ok(Json(serde_json::json!({
        "message": "End walk successfully",
        "earned_points": delta,
        "level": level,
        "points": points,
    })))
}

/// Standalone satisfaction update; not gated on whether the walk is still
/// open.
pub async fn walk_satisfy_update(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(walk_id): Path<Uuid>,
    Json(body): Json<WalkSatisfyRequest>,
) -> AppResult<Json<serde_json::Value>> {
    body.validate()?;
    let walk_score = body.walk_score.unwrap_or_default();

    let result = sqlx::query(
        r#"
        UPDATE walk_sessions w SET walk_score = $3
        FROM calendars c
        WHERE w.id = $1 AND c.id = w.calendar_id AND c.account_id = $2
        "#,
    )
    .bind(walk_id)
    .bind(auth_user.id)
    .bind(walk_score)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Walk session not found".into()));
    }

    Ok(Json(serde_json::json!({ "message": "Walk score updated successfully" })))
}

async fn fetch_owned_session(
    db: &sqlx::PgPool,
    walk_id: Uuid,
    account_id: Uuid,
) -> AppResult<WalkSession> {
    sqlx::query_as::<_, WalkSession>(
        r#"
        SELECT w.* FROM walk_sessions w
        JOIN calendars c ON c.id = w.calendar_id
        WHERE w.id = $1 AND c.account_id = $2
        "#,
    )
    .bind(walk_id)
    .bind(account_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::NotFound("Walk session not found".into()))
}

pub async fn walk_once_report(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(walk_id): Path<Uuid>,
) -> AppResult<Json<WalkOnceReport>> {
    let session = fetch_owned_session(&state.db, walk_id, auth_user.id).await?;

    let end_time = session
        .ended_at
        .map(|t| format!("{:02}:{:02}", t.hour(), t.minute()))
        .unwrap_or_default();

    Ok(Json(WalkOnceReport {
        walk_history_id: session.id,
        start_time: format!(
            "{:02}:{:02}",
            session.started_at.hour(),
            session.started_at.minute()
        ),
        end_time,
        distance: session.distance,
        actual_walk_time: session.actual_walk_minutes(),
        walk_score: session.walk_score,
        stable_score: session.stable_score,
    }))
}

/// Compact post-walk summary: this walk's figures plus the account's
/// current progression.
pub async fn walk_simple_report(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(walk_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let session = fetch_owned_session(&state.db, walk_id, auth_user.id).await?;

    let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
        .bind(auth_user.id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(serde_json::json!({
        "total_time": session.actual_walk_minutes(),
        "distance": session.distance,
        "stable_score": session.stable_score,
        "points": account.points,
        "level": account.level,
    })))
}
