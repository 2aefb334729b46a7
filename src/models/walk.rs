use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// One timed walk. Open while `ended_at` is NULL; ending it is terminal.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WalkSession {
    pub id: Uuid,
    pub calendar_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub stable_score: Option<f64>,
    pub stable_loc: Option<String>,
    pub walk_score: Option<f64>,
    pub distance: Option<i32>,
    pub course: Option<String>,
    pub playtime: i32,
    pub created_at: DateTime<Utc>,
}

impl WalkSession {
    pub fn is_closed(&self) -> bool {
        self.ended_at.is_some()
    }

    /// Whole minutes walked. Zero while the session is still open.
    pub fn actual_walk_minutes(&self) -> i64 {
        match self.ended_at {
            Some(ended_at) => (ended_at - self.started_at).num_minutes(),
            None => 0,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WalkStartRequest {
    pub playtime: i32,
    pub course: Option<String>,
}

/// Measurement payload supplied by the sensor at walk end.
#[derive(Debug, Deserialize)]
pub struct KinectData {
    pub stable_score: Option<f64>,
    pub stable_loc: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WalkEndRequest {
    pub kinect_data: Option<KinectData>,
    pub distance: Option<i32>,
    pub course: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct WalkSatisfyRequest {
    #[validate(required(message = "Walk score is required"))]
    pub walk_score: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct WalkOnceReport {
    pub walk_history_id: Uuid,
    pub start_time: String,
    pub end_time: String,
    pub distance: Option<i32>,
    pub actual_walk_time: i64,
    pub walk_score: Option<f64>,
    pub stable_score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session(started: DateTime<Utc>, ended: Option<DateTime<Utc>>) -> WalkSession {
        WalkSession {
            id: Uuid::new_v4(),
            calendar_id: Uuid::new_v4(),
            started_at: started,
            ended_at: ended,
            stable_score: None,
            stable_loc: None,
            walk_score: None,
            distance: None,
            course: None,
            playtime: 20,
            created_at: started,
        }
    }

    #[test]
    fn open_session_walk_time_is_zero() {
        let start = Utc.with_ymd_and_hms(2025, 3, 7, 9, 0, 0).unwrap();
        let s = session(start, None);
        assert!(!s.is_closed());
        assert_eq!(s.actual_walk_minutes(), 0);
    }

    #[test]
    fn closed_session_walk_time_in_whole_minutes() {
        let start = Utc.with_ymd_and_hms(2025, 3, 7, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 7, 9, 23, 40).unwrap();
        let s = session(start, Some(end));
        assert!(s.is_closed());
        assert_eq!(s.actual_walk_minutes(), 23);
    }
}
