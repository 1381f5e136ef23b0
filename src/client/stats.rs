//! Gallery statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Moment;

/// Moments younger than this many whole days count as recent.
pub const RECENT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineStats {
    pub total: usize,
    pub recent: usize,
    pub collections: i64,
}

impl TimelineStats {
    pub fn compute(moments: &[Moment], collections: i64, now: DateTime<Utc>) -> Self {
        let recent = moments
            .iter()
            .filter(|m| is_recent(&m.created_at, now))
            .count();

        Self {
            total: moments.len(),
            recent,
            collections,
        }
    }
}

/// Unparseable timestamps are not recent.
fn is_recent(created_at: &str, now: DateTime<Utc>) -> bool {
    DateTime::parse_from_rfc3339(created_at)
        .map(|created| (now - created.with_timezone(&Utc)).num_days() <= RECENT_WINDOW_DAYS)
        .unwrap_or(false)
}

/// Gallery heading such as "1 moment" or "12 moments".
pub fn moment_count_label(count: usize) -> String {
    if count == 1 {
        "1 moment".to_string()
    } else {
        format!("{} moments", count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CinematicStyle, MomentType};
    use chrono::{Duration, SecondsFormat};

    fn moment_at(created_at: DateTime<Utc>) -> Moment {
        Moment {
            id: crate::models::new_id(),
            user_description: "x".into(),
            moment_type: MomentType::Memory,
            cinematic_style: CinematicStyle::Dreamy,
            image_url: "data:image/png;base64,".into(),
            created_at: created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            tags: None,
        }
    }

    #[test]
    fn test_recent_window() {
        let now = Utc::now();
        let moments = vec![
            moment_at(now),
            moment_at(now - Duration::days(7) - Duration::hours(23)),
            moment_at(now - Duration::days(8)),
            moment_at(now - Duration::days(30)),
        ];

        let stats = TimelineStats::compute(&moments, 3, now);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.recent, 2);
        assert_eq!(stats.collections, 3);
    }

    #[test]
    fn test_bad_timestamp_is_not_recent() {
        let mut moment = moment_at(Utc::now());
        moment.created_at = "yesterday".into();
        assert_eq!(TimelineStats::compute(&[moment], 0, Utc::now()).recent, 0);
    }

    #[test]
    fn test_count_label() {
        assert_eq!(moment_count_label(0), "0 moments");
        assert_eq!(moment_count_label(1), "1 moment");
        assert_eq!(moment_count_label(12), "12 moments");
    }
}
