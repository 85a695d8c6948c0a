use std::sync::Arc;

use crate::entity::{EntryType, NewThreeYearGoal, NinetyDayTarget, ThreeYearGoal, ThreeYearGoalPatch};
use crate::error::Result;
use crate::store::SyncEngine;

use super::{PlanRepository, Repository};

/// Three-year goal CRUD. Deleting a goal hard-deletes the ninety-day
/// targets under it, and the plans under those targets.
pub struct GoalRepository {
    engine: Arc<SyncEngine>,
    goals: Repository<ThreeYearGoal>,
    plans: PlanRepository,
}

impl GoalRepository {
    pub fn new(engine: Arc<SyncEngine>) -> Self {
        Self {
            goals: Repository::new(Arc::clone(&engine)),
            plans: PlanRepository::new(Arc::clone(&engine)),
            engine,
        }
    }

    pub fn list(&self) -> Vec<ThreeYearGoal> {
        self.goals.list()
    }

    pub fn get(&self, id: &str) -> Option<ThreeYearGoal> {
        self.goals.get(id)
    }

    pub fn create(&self, draft: NewThreeYearGoal) -> ThreeYearGoal {
        self.goals.create(draft)
    }

    pub fn update(&self, id: &str, patch: ThreeYearGoalPatch) -> Result<ThreeYearGoal> {
        self.goals.update(id, patch)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.goals.delete(id)?;
        let removed_targets = self.remove_targets_for_goal(id);
        self.plans.remove_for_targets(&removed_targets);
        Ok(())
    }

    /// Remove every target under the goal, returning the removed ids so
    /// their plans can be removed too.
    fn remove_targets_for_goal(&self, goal_id: &str) -> Vec<String> {
        self.engine.with_entry_lock(EntryType::NinetyDayTargets, || {
            let mut targets: Vec<NinetyDayTarget> =
                self.engine.read_collection(EntryType::NinetyDayTargets);
            let removed: Vec<String> = targets
                .iter()
                .filter(|t| t.three_year_goal_id == goal_id)
                .map(|t| t.id.clone())
                .collect();
            if removed.is_empty() {
                return removed;
            }
            targets.retain(|t| t.three_year_goal_id != goal_id);
            self.engine.write_collection(EntryType::NinetyDayTargets, &targets);
            removed
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{NewNinetyDayTarget, NewPlan};
    use crate::repo::test_workspace;

    #[test]
    fn test_delete_goal_cascades_to_targets_and_plans() {
        let (ws, _remote) = test_workspace();

        let goal = ws.goals.create(NewThreeYearGoal {
            title: "Run a marathon".to_string(),
            description: None,
        });
        let other_goal = ws.goals.create(NewThreeYearGoal {
            title: "Learn piano".to_string(),
            description: None,
        });

        let target = ws.targets.create(NewNinetyDayTarget {
            title: "Run a 10k".to_string(),
            three_year_goal_id: goal.id.clone(),
        });
        let other_target = ws.targets.create(NewNinetyDayTarget {
            title: "Weekly lessons".to_string(),
            three_year_goal_id: other_goal.id.clone(),
        });

        ws.plans.create(NewPlan {
            title: "Three runs this week".to_string(),
            ninety_day_target_id: target.id.clone(),
        });
        let surviving_plan = ws.plans.create(NewPlan {
            title: "Practice scales".to_string(),
            ninety_day_target_id: other_target.id.clone(),
        });

        ws.goals.delete(&goal.id).unwrap();

        let goals = ws.goals.list();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].id, other_goal.id);

        let targets = ws.targets.list();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].id, other_target.id);

        let plans = ws.plans.list();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].id, surviving_plan.id);
    }

    #[test]
    fn test_delete_goal_without_children() {
        let (ws, _remote) = test_workspace();

        let goal = ws.goals.create(NewThreeYearGoal {
            title: "Standalone".to_string(),
            description: None,
        });

        ws.goals.delete(&goal.id).unwrap();
        assert!(ws.goals.list().is_empty());
    }
}
