use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::define_string_enum;

define_string_enum! {
    AssignmentStatus, "assignment status" {
        Open => "open",
        Closed => "closed",
    }
}

// 作业实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub classroom_id: i64,
    pub subject_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: AssignmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        self.due_date.is_some_and(|due| now > due)
    }

    pub fn is_closed(&self) -> bool {
        self.status == AssignmentStatus::Closed
    }

    /// 学生仅在作业关闭或截止后可见答案
    pub fn answers_visible(&self, now: DateTime<Utc>) -> bool {
        self.is_closed() || self.is_past_due(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn assignment(due: Option<DateTime<Utc>>, status: AssignmentStatus) -> Assignment {
        Assignment {
            id: 1,
            classroom_id: 1,
            subject_id: None,
            name: "hw".into(),
            description: None,
            due_date: due,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_answers_visible() {
        let now = Utc::now();
        assert!(!assignment(None, AssignmentStatus::Open).answers_visible(now));
        assert!(assignment(None, AssignmentStatus::Closed).answers_visible(now));
        assert!(
            assignment(Some(now - Duration::hours(1)), AssignmentStatus::Open).answers_visible(now)
        );
        assert!(
            !assignment(Some(now + Duration::hours(1)), AssignmentStatus::Open)
                .answers_visible(now)
        );
    }
}
