use std::sync::Arc;

use crate::entity::{NewNinetyDayTarget, NinetyDayTarget, NinetyDayTargetPatch};
use crate::error::Result;
use crate::store::SyncEngine;

use super::{PlanRepository, Repository};

/// Ninety-day target CRUD. Deleting a target hard-deletes the plans
/// under it.
pub struct TargetRepository {
    targets: Repository<NinetyDayTarget>,
    plans: PlanRepository,
}

impl TargetRepository {
    pub fn new(engine: Arc<SyncEngine>) -> Self {
        Self {
            targets: Repository::new(Arc::clone(&engine)),
            plans: PlanRepository::new(engine),
        }
    }

    pub fn list(&self) -> Vec<NinetyDayTarget> {
        self.targets.list()
    }

    pub fn get(&self, id: &str) -> Option<NinetyDayTarget> {
        self.targets.get(id)
    }

    pub fn create(&self, draft: NewNinetyDayTarget) -> NinetyDayTarget {
        self.targets.create(draft)
    }

    pub fn update(&self, id: &str, patch: NinetyDayTargetPatch) -> Result<NinetyDayTarget> {
        self.targets.update(id, patch)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.targets.delete(id)?;
        self.plans.remove_for_targets(&[id.to_string()]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{NewPlan, NewThreeYearGoal};
    use crate::repo::test_workspace;

    #[test]
    fn test_delete_target_cascades_to_plans() {
        let (ws, _remote) = test_workspace();

        let goal = ws.goals.create(NewThreeYearGoal {
            title: "Ship the app".to_string(),
            description: None,
        });
        let target = ws.targets.create(NewNinetyDayTarget {
            title: "Beta release".to_string(),
            three_year_goal_id: goal.id.clone(),
        });
        let other_target = ws.targets.create(NewNinetyDayTarget {
            title: "Marketing site".to_string(),
            three_year_goal_id: goal.id.clone(),
        });

        ws.plans.create(NewPlan {
            title: "Fix crash reports".to_string(),
            ninety_day_target_id: target.id.clone(),
        });
        let surviving = ws.plans.create(NewPlan {
            title: "Draft landing page".to_string(),
            ninety_day_target_id: other_target.id.clone(),
        });

        ws.targets.delete(&target.id).unwrap();

        let plans = ws.plans.list();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].id, surviving.id);
        assert_eq!(ws.targets.list().len(), 1);
    }
}
