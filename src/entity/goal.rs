use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, EntryType, Persistable};

/// Lifecycle of a goal, target, or plan. A plain field, not a state
/// machine: any transition is allowed through an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Achieved,
    Abandoned,
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoalStatus::Active => write!(f, "active"),
            GoalStatus::Achieved => write!(f, "achieved"),
            GoalStatus::Abandoned => write!(f, "abandoned"),
        }
    }
}

impl std::str::FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(GoalStatus::Active),
            "achieved" | "done" => Ok(GoalStatus::Achieved),
            "abandoned" => Ok(GoalStatus::Abandoned),
            _ => Err(format!("Invalid goal status: {}", s)),
        }
    }
}

/// A three-year goal, the top of the goal cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreeYearGoal {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload for a three-year goal
#[derive(Debug, Clone, Default)]
pub struct NewThreeYearGoal {
    pub title: String,
    pub description: Option<String>,
}

/// Update payload for a three-year goal
#[derive(Debug, Default)]
pub struct ThreeYearGoalPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>, // Some(None) to clear
    pub status: Option<GoalStatus>,
}

impl Persistable for ThreeYearGoal {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for ThreeYearGoal {
    type Draft = NewThreeYearGoal;
    type Patch = ThreeYearGoalPatch;

    fn entry_type() -> EntryType {
        EntryType::ThreeYearGoals
    }

    fn build(draft: NewThreeYearGoal, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            status: GoalStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: ThreeYearGoalPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = now;
    }
}
