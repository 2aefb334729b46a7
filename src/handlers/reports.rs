use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::account::Account;
use crate::services::calendar::{floor1, month_bounds};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct MonthlyReport {
    pub nickname: String,
    pub cactus_level: i32,
    pub cactus_score: i32,
    pub sri_score: Option<i32>,
    pub sri_date: Option<DateTime<Utc>>,
    pub total_distance: f64,
    pub total_time: f64,
    pub emotion_analysis: Vec<EmotionDay>,
    pub stable_scores: Vec<f64>,
    pub stable_average: Option<f64>,
    pub sri_scores: Vec<i32>,
    pub sri_average: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct EmotionDay {
    pub day: i32,
    pub emotion_large: Option<String>,
    pub walk_history_ids: Vec<Uuid>,
}

fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

pub async fn walk_monthly_report(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((year, month)): Path<(i32, u32)>,
) -> AppResult<Json<MonthlyReport>> {
    let (start, end) = month_bounds(year, month)
        .ok_or_else(|| AppError::Validation("Month must be between 1 and 12".into()))?;
    let start_ts = date_floor(start);
    let end_ts = date_floor(end);

    let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
        .bind(auth_user.id)
        .fetch_one(&state.db)
        .await?;

    // Sessions whose start falls inside the month, for the distance and
    // duration totals.
    let sessions = sqlx::query_as::<_, (Option<i32>, DateTime<Utc>, Option<DateTime<Utc>>)>(
        r#"
        SELECT w.distance, w.started_at, w.ended_at
        FROM walk_sessions w
        JOIN calendars c ON c.id = w.calendar_id
        WHERE c.account_id = $1 AND w.started_at >= $2 AND w.started_at < $3
        "#,
    )
    .bind(auth_user.id)
    .bind(start_ts)
    .bind(end_ts)
    .fetch_all(&state.db)
    .await?;

    // Absent distance still counts as zero in the sum; sessions missing an
    // end time contribute no duration.
    let total_meters: i64 = sessions.iter().filter_map(|(d, _, _)| *d).map(i64::from).sum();
    let total_secs: i64 = sessions
        .iter()
        .filter_map(|(_, started, ended)| ended.map(|e| (e - *started).num_seconds()))
        .sum();

    let total_distance = floor1(total_meters as f64 / 1000.0);
    let total_time = floor1(total_secs as f64 / 3600.0);

    let latest_sri = sqlx::query_as::<_, (i32, DateTime<Utc>)>(
        r#"
        SELECT score, sampled_at FROM sri_samples
        WHERE account_id = $1
        ORDER BY sampled_at DESC
        LIMIT 1
        "#,
    )
    .bind(auth_user.id)
    .fetch_optional(&state.db)
    .await?;

    let sri_scores = sqlx::query_scalar::<_, i32>(
        r#"
        SELECT score FROM sri_samples
        WHERE account_id = $1
        ORDER BY sampled_at DESC
        LIMIT 7
        "#,
    )
    .bind(auth_user.id)
    .fetch_all(&state.db)
    .await?;

    // Most recent stability readings; sessions that never produced one are
    // left out of the list and the average.
    let stable_scores = sqlx::query_scalar::<_, f64>(
        r#"
        SELECT w.stable_score FROM walk_sessions w
        JOIN calendars c ON c.id = w.calendar_id
        WHERE c.account_id = $1 AND w.stable_score IS NOT NULL
        ORDER BY w.started_at DESC
        LIMIT 7
        "#,
    )
    .bind(auth_user.id)
    .fetch_all(&state.db)
    .await?;

    let finished_days = sqlx::query_as::<_, (Uuid, i32, Option<String>)>(
        r#"
        SELECT id, day, emotion_large FROM calendars
        WHERE account_id = $1 AND year = $2 AND month = $3 AND walk_finished = true
        ORDER BY day ASC
        "#,
    )
    .bind(auth_user.id)
    .bind(year)
    .bind(month as i32)
    .fetch_all(&state.db)
    .await?;

    let mut emotion_analysis = Vec::with_capacity(finished_days.len());
    for (calendar_id, day, emotion_large) in finished_days {
        let walk_history_ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM walk_sessions WHERE calendar_id = $1 ORDER BY started_at ASC",
        )
        .bind(calendar_id)
        .fetch_all(&state.db)
        .await?;

        emotion_analysis.push(EmotionDay {
            day,
            emotion_large,
            walk_history_ids,
        });
    }

    let sri_values: Vec<f64> = sri_scores.iter().map(|s| *s as f64).collect();

    Ok(Json(MonthlyReport {
        nickname: account.nickname,
        cactus_level: account.level,
        cactus_score: account.points,
        sri_score: latest_sri.map(|(score, _)| score),
        sri_date: latest_sri.map(|(_, date)| date),
        total_distance,
        total_time,
        emotion_analysis,
        stable_average: average(&stable_scores),
        stable_scores,
        sri_average: average(&sri_values),
        sri_scores,
    }))
}

fn date_floor(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .expect("midnight is always valid")
        .and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_of_empty_is_none() {
        assert_eq!(average(&[]), None);
    }

    #[test]
    fn average_ignores_nothing_present() {
        assert_eq!(average(&[80.0, 90.0]), Some(85.0));
    }
}
