use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::handlers::calendar::find_day;
use crate::services::classifier;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[validate(required(message = "Sentence is required"))]
    #[validate(length(min = 1, max = 255, message = "Sentence must be 1-255 characters"))]
    pub sentence: Option<String>,

    #[validate(length(max = 255, message = "Question must be under 255 characters"))]
    pub question: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SaveSmallRequest {
    #[validate(required(message = "Emotion small is required"))]
    #[validate(length(min = 1, max = 255, message = "Emotion small must be 1-255 characters"))]
    pub emotion_small: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmotionListQuery {
    #[serde(rename = "todayDate")]
    pub today_date: Option<NaiveDate>,
}

/// Phase 1: run the external classifier over the day's free text and store
/// the coarse label on today's bucket. The bucket must already exist (the
/// walk-start flow creates it); there is no auto-create here.
pub async fn analyze_large(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<AnalyzeRequest>,
) -> AppResult<Json<serde_json::Value>> {
    body.validate()?;
    let sentence = body.sentence.unwrap_or_default();

    let today = Utc::now().date_naive();
    let calendar = find_day(
        &state.db,
        auth_user.id,
        today.year(),
        today.month() as i32,
        today.day() as i32,
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Calendar entry does not exist for today".into()))?;

    let emotion_large = classifier::classify(&state.config, &sentence).await?;

    sqlx::query(
        r#"
        UPDATE calendars SET
            emotion_large = $2,
            sentence = $3,
            question = COALESCE($4, question)
        WHERE id = $1
        "#,
    )
    .bind(calendar.id)
    .bind(&emotion_large)
    .bind(&sentence)
    .bind(&body.question)
    .execute(&state.db)
    .await?;

    Ok(Json(serde_json::json!({
        "calendar_id": calendar.label(),
        "emotion_large": emotion_large,
    })))
}

/// Phase 2: store the user's fine-grained label on today's bucket.
pub async fn save_small(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<SaveSmallRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    body.validate()?;
    let emotion_small = body.emotion_small.unwrap_or_default();

    let today = Utc::now().date_naive();
    let calendar = find_day(
        &state.db,
        auth_user.id,
        today.year(),
        today.month() as i32,
        today.day() as i32,
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Calendar entry does not exist for today".into()))?;

    sqlx::query("UPDATE calendars SET emotion_small = $2 WHERE id = $1")
        .bind(calendar.id)
        .bind(&emotion_small)
        .execute(&state.db)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "calendar_id": calendar.label(),
            "question": calendar.question,
            "sentence": calendar.sentence,
            "emotion_large": calendar.emotion_large,
            "emotion_small": emotion_small,
        })),
    ))
}

/// Has the emotion flow been completed for the given date? A missing or
/// unlabelled bucket is a normal "not done yet" answer, not an error.
pub async fn emotion_list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<EmotionListQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let date = query.today_date.unwrap_or_else(|| Utc::now().date_naive());

    let calendar = find_day(
        &state.db,
        auth_user.id,
        date.year(),
        date.month() as i32,
        date.day() as i32,
    )
    .await?;

    match calendar.filter(|c| c.emotion_large.is_some()) {
        Some(calendar) => Ok(Json(serde_json::json!({
            "today_emotion_done": true,
            "emotions": {
                "calendar_id": calendar.label(),
                "question": calendar.question,
                "sentence": calendar.sentence,
                "emotion_large": calendar.emotion_large,
                "emotion_small": calendar.emotion_small,
            },
        }))),
        None => Ok(Json(serde_json::json!({ "today_emotion_done": false }))),
    }
}
