//! In-memory owner of every plan, with a JSON bridge to a [`KeyValueStore`].

use std::collections::BTreeMap;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};

use savings_domain::{Plan, PlanId};

use crate::{storage::KeyValueStore, CoreError};

/// Owns all plans, keyed and ordered by id (creation order).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanStore {
    plans: BTreeMap<PlanId, Plan>,
}

impl PlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    pub fn list(&self) -> Vec<&Plan> {
        self.plans.values().collect()
    }

    pub fn ids(&self) -> Vec<PlanId> {
        self.plans.keys().copied().collect()
    }

    pub fn get(&self, id: PlanId) -> Option<&Plan> {
        self.plans.get(&id)
    }

    pub fn get_mut(&mut self, id: PlanId) -> Option<&mut Plan> {
        self.plans.get_mut(&id)
    }

    /// The most recently created plan; later wizard steps keep editing it.
    pub fn latest(&self) -> Option<&Plan> {
        self.plans.values().next_back()
    }

    pub fn latest_id(&self) -> Option<PlanId> {
        self.plans.keys().next_back().copied()
    }

    /// Adds a new plan and returns its freshly assigned id.
    ///
    /// A plan needs a name or a company before it can be stored; any id on the
    /// draft is ignored.
    pub fn create(&mut self, mut draft: Plan) -> Result<PlanId, CoreError> {
        if draft.name.trim().is_empty() && draft.company.trim().is_empty() {
            return Err(CoreError::Validation("a plan needs a name or a company".into()));
        }
        let id = self.next_id();
        draft.id = id;
        debug!(plan = %id, label = draft.display_label(), "plan created");
        self.plans.insert(id, draft);
        Ok(id)
    }

    /// Applies `change` to the plan in place. The plan keeps its id whatever the closure does.
    pub fn update<F, R>(&mut self, id: PlanId, change: F) -> Result<R, CoreError>
    where
        F: FnOnce(&mut Plan) -> R,
    {
        let plan = self
            .plans
            .get_mut(&id)
            .ok_or(CoreError::PlanNotFound(id))?;
        let outcome = change(plan);
        plan.id = id;
        debug!(plan = %id, "plan updated");
        Ok(outcome)
    }

    /// Swaps in a whole plan, matched by its id.
    pub fn replace(&mut self, plan: Plan) -> Result<(), CoreError> {
        let slot = self
            .plans
            .get_mut(&plan.id)
            .ok_or(CoreError::PlanNotFound(plan.id))?;
        *slot = plan;
        Ok(())
    }

    pub fn delete(&mut self, id: PlanId) -> Result<Plan, CoreError> {
        let removed = self.plans.remove(&id).ok_or(CoreError::PlanNotFound(id))?;
        debug!(plan = %id, "plan deleted");
        Ok(removed)
    }

    /// Serializes every plan, in id order, as a JSON array.
    pub fn serialize(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(&self.list())?)
    }

    /// Rebuilds a store from a persisted payload.
    ///
    /// Never fails: a payload that is not a JSON array yields an empty store,
    /// non-object elements are skipped, and plans without a usable id (missing
    /// or duplicated) receive a fresh one.
    pub fn deserialize(payload: &str) -> Self {
        let entries = match serde_json::from_str::<Value>(payload) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) => {
                warn!("persisted plans are not a JSON array; starting empty");
                return Self::new();
            }
            Err(err) => {
                warn!(error = %err, "persisted plans are unreadable; starting empty");
                return Self::new();
            }
        };

        let mut store = Self::new();
        let mut unassigned = Vec::new();
        for (index, entry) in entries.into_iter().enumerate() {
            if !entry.is_object() {
                warn!(index, "skipping malformed plan entry");
                continue;
            }
            match Plan::from_value(entry) {
                Ok(plan) => {
                    let plan = normalize(plan);
                    if plan.id.is_assigned() && !store.plans.contains_key(&plan.id) {
                        store.plans.insert(plan.id, plan);
                    } else {
                        unassigned.push(plan);
                    }
                }
                Err(err) => warn!(index, error = %err, "skipping unreadable plan entry"),
            }
        }
        for mut plan in unassigned {
            plan.id = store.next_id();
            debug!(plan = %plan.id, "assigned id to persisted plan");
            store.plans.insert(plan.id, plan);
        }
        store
    }

    /// Loads the plans stored under `key`; an absent key is an empty store.
    pub fn load_from(storage: &dyn KeyValueStore, key: &str) -> Result<Self, CoreError> {
        let store = match storage.get(key)? {
            Some(payload) => Self::deserialize(&payload),
            None => Self::new(),
        };
        info!(key, plans = store.len(), "plans loaded");
        Ok(store)
    }

    pub fn save_to(&self, storage: &dyn KeyValueStore, key: &str) -> Result<(), CoreError> {
        storage.set(key, &self.serialize()?)?;
        info!(key, plans = self.len(), "plans saved");
        Ok(())
    }

    /// Creation timestamp in milliseconds, bumped past the newest id to stay unique and ordered.
    fn next_id(&self) -> PlanId {
        let now = PlanId::from_timestamp(Utc::now());
        let floor = self
            .plans
            .keys()
            .next_back()
            .map(|newest| newest.value() + 1)
            .unwrap_or(1);
        PlanId(now.value().max(floor))
    }
}

/// Drops blank and repeated category names, keeping first occurrences.
fn normalize(mut plan: Plan) -> Plan {
    let mut seen = Vec::with_capacity(plan.categories.len());
    plan.categories.retain(|category| {
        if category.trim().is_empty() || seen.contains(category) {
            false
        } else {
            seen.push(category.clone());
            true
        }
    });
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryKeyValueStore;

    #[test]
    fn create_requires_a_name_or_company() {
        let mut store = PlanStore::new();
        let err = store.create(Plan::default()).expect_err("blank plan rejected");
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(store.create(Plan::new("Internship")).is_ok());
        assert!(store.create(Plan::default().with_company("Acme")).is_ok());
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut store = PlanStore::new();
        let first = store.create(Plan::new("One")).unwrap();
        let second = store.create(Plan::new("Two")).unwrap();
        let third = store.create(Plan::new("Three")).unwrap();
        assert!(first < second && second < third);
        assert_eq!(store.latest_id(), Some(third));
        assert_eq!(store.latest().map(|plan| plan.name.as_str()), Some("Three"));
    }

    #[test]
    fn update_keeps_the_id_stable() {
        let mut store = PlanStore::new();
        let id = store.create(Plan::new("Stable")).unwrap();
        store
            .update(id, |plan| {
                plan.id = PlanId(7);
                plan.weeks = 12;
            })
            .unwrap();
        let plan = store.get(id).expect("plan still under its id");
        assert_eq!(plan.id, id);
        assert_eq!(plan.weeks, 12);
    }

    #[test]
    fn missing_plans_report_not_found() {
        let mut store = PlanStore::new();
        let ghost = PlanId(42);
        assert!(matches!(store.delete(ghost), Err(CoreError::PlanNotFound(id)) if id == ghost));
        assert!(matches!(
            store.update(ghost, |_| ()),
            Err(CoreError::PlanNotFound(_))
        ));
        let mut plan = Plan::new("Ghost");
        plan.id = ghost;
        assert!(matches!(store.replace(plan), Err(CoreError::PlanNotFound(_))));
    }

    #[test]
    fn deserialize_degrades_to_empty_store() {
        assert!(PlanStore::deserialize("not json").is_empty());
        assert!(PlanStore::deserialize("{}").is_empty());
        assert!(PlanStore::deserialize("null").is_empty());
        assert!(PlanStore::deserialize(r#"[1, "x", null]"#).is_empty());
    }

    #[test]
    fn deserialize_assigns_ids_to_missing_and_duplicate_entries() {
        let store = PlanStore::deserialize(
            r#"[
                {"id": 1700000000000, "name": "Original"},
                {"id": 1700000000000, "name": "Duplicate"},
                {"name": "No id"}
            ]"#,
        );
        assert_eq!(store.len(), 3);
        let ids = store.ids();
        assert_eq!(ids[0], PlanId(1_700_000_000_000));
        assert!(ids[1] > ids[0] && ids[2] > ids[1]);
        assert_eq!(store.get(ids[0]).unwrap().name, "Original");
    }

    #[test]
    fn deserialize_keeps_plans_carrying_both_transport_keys() {
        let store = PlanStore::deserialize(
            r#"[{"id": 1700000000000, "company": "Acme", "transportation": 15,
                 "transportFrequency": "weekly", "transportationFrequency": "daily"}]"#,
        );
        assert_eq!(store.len(), 1);
        let plan = store.get(PlanId(1_700_000_000_000)).expect("plan kept");
        assert_eq!(plan.company, "Acme");
        assert_eq!(plan.transportation_frequency, savings_domain::CostFrequency::Weekly);
    }

    #[test]
    fn deserialize_dedupes_categories() {
        let store = PlanStore::deserialize(
            r#"[{"id": 5, "categories": ["Travel", "", "Travel", "Emergency"]}]"#,
        );
        let plan = store.get(PlanId(5)).unwrap();
        assert_eq!(plan.categories, vec!["Travel", "Emergency"]);
    }

    #[test]
    fn save_and_load_through_key_value_store() {
        let storage = MemoryKeyValueStore::new();
        let mut store = PlanStore::new();
        store.create(Plan::new("Persisted").with_company("Acme")).unwrap();
        store.save_to(&storage, "plans").unwrap();

        let loaded = PlanStore::load_from(&storage, "plans").unwrap();
        assert_eq!(loaded, store);
        assert!(PlanStore::load_from(&storage, "other").unwrap().is_empty());
    }
}
