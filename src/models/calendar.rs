use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Day bucket: one row per account per calendar day. Anchors the day's
/// emotion annotations and the walk-finished flag.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Calendar {
    pub id: Uuid,
    pub account_id: Uuid,
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub walk_finished: bool,
    pub question: Option<String>,
    pub sentence: Option<String>,
    pub emotion_large: Option<String>,
    pub emotion_small: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Calendar {
    /// Client-facing "YYMMDD" id for this bucket.
    pub fn label(&self) -> String {
        crate::services::calendar::calendar_label(self.year, self.month, self.day)
    }
}
