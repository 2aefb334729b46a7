use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{Datelike, Utc};
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::calendar::Calendar;
use crate::AppState;

/// Fetch or lazily create the bucket for (account, date). Idempotent: the
/// composite unique key makes concurrent first-of-the-day calls converge on
/// one row — the losing insert falls through to the re-select.
pub async fn get_or_create_day(
    db: &sqlx::PgPool,
    account_id: Uuid,
    year: i32,
    month: i32,
    day: i32,
) -> AppResult<(Calendar, bool)> {
    let inserted = sqlx::query_as::<_, Calendar>(
        r#"
        INSERT INTO calendars (id, account_id, year, month, day)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (account_id, year, month, day) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(account_id)
    .bind(year)
    .bind(month)
    .bind(day)
    .fetch_optional(db)
    .await?;

    let existing = if inserted.is_some() {
        None
    } else {
        sqlx::query_as::<_, Calendar>(
            r#"
            SELECT * FROM calendars
            WHERE account_id = $1 AND year = $2 AND month = $3 AND day = $4
            "#,
        )
        .bind(account_id)
        .bind(year)
        .bind(month)
        .bind(day)
        .fetch_optional(db)
        .await?
    };

    resolve_get_or_create(inserted, existing)
}

/// Converge on one bucket per day: a winning insert returns the fresh row,
/// a losing insert returns the row that beat it. Both callers end up with
/// the same entity id.
fn resolve_get_or_create(
    inserted: Option<Calendar>,
    existing: Option<Calendar>,
) -> AppResult<(Calendar, bool)> {
    match (inserted, existing) {
        (Some(calendar), _) => Ok((calendar, true)),
        (None, Some(calendar)) => Ok((calendar, false)),
        (None, None) => Err(AppError::Internal(anyhow::anyhow!(
            "Calendar row vanished after conflict"
        ))),
    }
}

/// Fetch the bucket for a given date without creating it.
pub async fn find_day(
    db: &sqlx::PgPool,
    account_id: Uuid,
    year: i32,
    month: i32,
    day: i32,
) -> AppResult<Option<Calendar>> {
    let calendar = sqlx::query_as::<_, Calendar>(
        r#"
        SELECT * FROM calendars
        WHERE account_id = $1 AND year = $2 AND month = $3 AND day = $4
        "#,
    )
    .bind(account_id)
    .bind(year)
    .bind(month)
    .bind(day)
    .fetch_optional(db)
    .await?;
    Ok(calendar)
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let today = Utc::now().date_naive();
    let (calendar, created) = get_or_create_day(
        &state.db,
        auth_user.id,
        today.year(),
        today.month() as i32,
        today.day() as i32,
    )
    .await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    let mut body = serde_json::to_value(&calendar)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Serialize calendar: {}", e)))?;
    body["calendar_id"] = serde_json::Value::String(calendar.label());

    Ok((status, Json(body)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn bucket(id: Uuid) -> Calendar {
        Calendar {
            id,
            account_id: Uuid::new_v4(),
            year: 2025,
            month: 3,
            day: 7,
            walk_finished: false,
            question: None,
            sentence: None,
            emotion_large: None,
            emotion_small: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_winning_insert_reports_created() {
        let id = Uuid::new_v4();
        let (calendar, created) = resolve_get_or_create(Some(bucket(id)), None).unwrap();
        assert_eq!(calendar.id, id);
        assert!(created);
    }

    #[test]
    fn test_repeated_call_converges_on_same_entity() {
        // First call wins the insert; the second call's insert hits the
        // unique key and falls through to the re-select.
        let id = Uuid::new_v4();
        let (first, created) = resolve_get_or_create(Some(bucket(id)), None).unwrap();
        assert!(created);

        let (second, created) = resolve_get_or_create(None, Some(bucket(id))).unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_vanished_row_is_an_internal_error() {
        assert!(resolve_get_or_create(None, None).is_err());
    }
}
