mod goal;
mod list;
mod plan;
mod tag;
mod target;
mod task;

pub use goal::{GoalStatus, NewThreeYearGoal, ThreeYearGoal, ThreeYearGoalPatch};
pub use list::{List, ListPatch, NewList, INBOX_LIST_ID};
pub use plan::{NewPlan, Plan, PlanPatch};
pub use tag::{NewTag, Tag, TagPatch};
pub use target::{NewNinetyDayTarget, NinetyDayTarget, NinetyDayTargetPatch};
pub use task::{NewTask, Task, TaskPatch};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

/// Partition key identifying a logical collection or scalar blob.
///
/// The same key is used for the local cache row and for tagging records
/// in the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    Tasks,
    CustomLists,
    ThreeYearGoals,
    NinetyDayTargets,
    Plans,
    Tags,
    NotepadContent,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Tasks => "tasks",
            EntryType::CustomLists => "customLists",
            EntryType::ThreeYearGoals => "threeYearGoals",
            EntryType::NinetyDayTargets => "ninetyDayTargets",
            EntryType::Plans => "plans",
            EntryType::Tags => "tags",
            EntryType::NotepadContent => "notepadContent",
        }
    }

    /// Key an earlier release stored this partition under, if any.
    /// Data found there is copied to the current key on first read.
    pub fn deprecated_alias(&self) -> Option<&'static str> {
        match self {
            EntryType::Tasks => Some("todos"),
            EntryType::CustomLists => Some("lists"),
            EntryType::NotepadContent => Some("notepad"),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Generate a fresh entity id. Ids are opaque strings, never reused.
pub fn new_entity_id() -> String {
    Uuid::new_v4().to_string()
}

/// What the store layer needs from a stored record: a serde codec and a
/// stable id to tag the remote row with.
pub trait Persistable: Clone + Serialize + DeserializeOwned {
    fn id(&self) -> &str;
}

/// What a repository needs on top of [`Persistable`]: a create payload,
/// an update payload, and the partition the collection lives in.
pub trait Entity: Persistable {
    type Draft;
    type Patch;

    fn entry_type() -> EntryType;

    /// Construct a new entity from its create payload. `created_at` and
    /// `updated_at` are both set to `now`.
    fn build(draft: Self::Draft, id: String, now: DateTime<Utc>) -> Self;

    /// Merge an update payload into the entity and stamp `updated_at`.
    fn apply(&mut self, patch: Self::Patch, now: DateTime<Utc>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_keys_are_stable() {
        assert_eq!(EntryType::Tasks.as_str(), "tasks");
        assert_eq!(EntryType::CustomLists.as_str(), "customLists");
        assert_eq!(EntryType::ThreeYearGoals.as_str(), "threeYearGoals");
        assert_eq!(EntryType::NinetyDayTargets.as_str(), "ninetyDayTargets");
        assert_eq!(EntryType::NotepadContent.as_str(), "notepadContent");
    }

    #[test]
    fn test_deprecated_aliases() {
        assert_eq!(EntryType::Tasks.deprecated_alias(), Some("todos"));
        assert_eq!(EntryType::CustomLists.deprecated_alias(), Some("lists"));
        assert_eq!(EntryType::Plans.deprecated_alias(), None);
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let a = new_entity_id();
        let b = new_entity_id();
        assert!(!a.is_empty());
        assert_ne!(a, b);
    }
}
