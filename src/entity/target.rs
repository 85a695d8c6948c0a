use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, EntryType, GoalStatus, Persistable};

/// A ninety-day target under a three-year goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NinetyDayTarget {
    pub id: String,
    pub title: String,
    pub three_year_goal_id: String,
    #[serde(default)]
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload for a ninety-day target
#[derive(Debug, Clone, Default)]
pub struct NewNinetyDayTarget {
    pub title: String,
    pub three_year_goal_id: String,
}

/// Update payload for a ninety-day target
#[derive(Debug, Default)]
pub struct NinetyDayTargetPatch {
    pub title: Option<String>,
    pub three_year_goal_id: Option<String>,
    pub status: Option<GoalStatus>,
}

impl Persistable for NinetyDayTarget {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for NinetyDayTarget {
    type Draft = NewNinetyDayTarget;
    type Patch = NinetyDayTargetPatch;

    fn entry_type() -> EntryType {
        EntryType::NinetyDayTargets
    }

    fn build(draft: NewNinetyDayTarget, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            three_year_goal_id: draft.three_year_goal_id,
            status: GoalStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: NinetyDayTargetPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(goal_id) = patch.three_year_goal_id {
            self.three_year_goal_id = goal_id;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = now;
    }
}
