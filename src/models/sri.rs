use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One stress-resilience-index reading. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SriSample {
    pub id: Uuid,
    pub account_id: Uuid,
    pub score: i32,
    pub sampled_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SriCreateRequest {
    pub sri_score: i32,
}
