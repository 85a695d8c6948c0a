use std::sync::Arc;

use crate::entity::{EntryType, NewPlan, Plan, PlanPatch};
use crate::error::Result;
use crate::store::SyncEngine;

use super::Repository;

/// Plan CRUD. Plans are leaves of the goal cascade.
pub struct PlanRepository {
    engine: Arc<SyncEngine>,
    plans: Repository<Plan>,
}

impl PlanRepository {
    pub fn new(engine: Arc<SyncEngine>) -> Self {
        Self {
            plans: Repository::new(Arc::clone(&engine)),
            engine,
        }
    }

    pub fn list(&self) -> Vec<Plan> {
        self.plans.list()
    }

    pub fn get(&self, id: &str) -> Option<Plan> {
        self.plans.get(id)
    }

    pub fn create(&self, draft: NewPlan) -> Plan {
        self.plans.create(draft)
    }

    pub fn update(&self, id: &str, patch: PlanPatch) -> Result<Plan> {
        self.plans.update(id, patch)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.plans.delete(id)
    }

    /// Target-deletion cascade: drop every plan referencing one of the
    /// removed targets.
    pub(crate) fn remove_for_targets(&self, target_ids: &[String]) {
        if target_ids.is_empty() {
            return;
        }
        self.engine.with_entry_lock(EntryType::Plans, || {
            let mut plans: Vec<Plan> = self.engine.read_collection(EntryType::Plans);
            let len_before = plans.len();
            plans.retain(|p| !target_ids.contains(&p.ninety_day_target_id));
            if plans.len() != len_before {
                self.engine.write_collection(EntryType::Plans, &plans);
            }
        })
    }
}
