use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, EntryType, GoalStatus, Persistable};

/// A short-horizon plan under a ninety-day target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub title: String,
    pub ninety_day_target_id: String,
    #[serde(default)]
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload for a plan
#[derive(Debug, Clone, Default)]
pub struct NewPlan {
    pub title: String,
    pub ninety_day_target_id: String,
}

/// Update payload for a plan
#[derive(Debug, Default)]
pub struct PlanPatch {
    pub title: Option<String>,
    pub ninety_day_target_id: Option<String>,
    pub status: Option<GoalStatus>,
}

impl Persistable for Plan {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Plan {
    type Draft = NewPlan;
    type Patch = PlanPatch;

    fn entry_type() -> EntryType {
        EntryType::Plans
    }

    fn build(draft: NewPlan, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            ninety_day_target_id: draft.ninety_day_target_id,
            status: GoalStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: PlanPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(target_id) = patch.ninety_day_target_id {
            self.ninety_day_target_id = target_id;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = now;
    }
}
