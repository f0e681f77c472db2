use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use savings_config::Config;
use savings_core::{
    BudgetCheck, BudgetService, CategoryProgress, CategoryService, GoalService, KeyValueStore,
    MemoryKeyValueStore, PlanComparison, PlanStatus, PlanStore, SavingsOutcome, SavingsService,
    SummaryService,
};
use savings_domain::{
    sanitize_amount, BudgetAllocation, CostFrequency, LineItem, LivingCost, Plan, PlanId,
    SalaryFrequency, Totals,
};
use savings_storage_json::JsonKeyValueStore;

use crate::errors::SavingsError;

/// Offer details entered on the second wizard step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OfferDetails {
    pub company: String,
    pub location: String,
    pub salary: f64,
    pub salary_frequency: Option<SalaryFrequency>,
    pub weeks: u32,
    pub hours_per_week: Option<f64>,
    pub living_costs: Vec<LivingCostEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LivingCostEntry {
    pub kind: LivingCost,
    pub amount: f64,
    pub frequency: CostFrequency,
}

impl OfferDetails {
    fn apply(self, plan: &mut Plan) {
        plan.company = self.company.trim().to_string();
        plan.location = self.location.trim().to_string();
        plan.salary = sanitize_amount(self.salary);
        plan.salary_frequency = self.salary_frequency;
        plan.weeks = self.weeks;
        plan.hours_per_week = self.hours_per_week.map(sanitize_amount).filter(|h| *h > 0.0);
        for entry in self.living_costs {
            plan.set_living_cost(entry.kind, sanitize_amount(entry.amount), entry.frequency);
        }
    }
}

/// Owns the plan list and writes it back to its key-value store after every change.
pub struct PlanManager {
    store: PlanStore,
    storage: Box<dyn KeyValueStore>,
    key: String,
    default_timeframe_weeks: u32,
}

impl PlanManager {
    pub fn new(storage: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store: PlanStore::new(),
            storage,
            key: key.into(),
            default_timeframe_weeks: Plan::default_budget_timeframe(),
        }
    }

    /// Manager backed by process memory only.
    pub fn in_memory() -> Self {
        Self::new(
            Box::new(MemoryKeyValueStore::new()),
            savings_core::DEFAULT_PLANS_KEY,
        )
    }

    /// Opens the JSON store the config points at and loads whatever is saved there.
    pub fn from_config(config: &Config) -> Result<Self, SavingsError> {
        let storage = JsonKeyValueStore::with_retention(
            config.resolve_data_root(),
            config.resolve_backup_root(),
            config.effective_retention(),
        )?;
        let mut manager = Self::new(Box::new(storage), config.effective_plans_key());
        manager.default_timeframe_weeks = config.effective_timeframe_weeks();
        manager.load()?;
        Ok(manager)
    }

    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &PlanStore {
        &self.store
    }

    /// Replaces in-memory plans with the persisted ones. Returns how many were loaded.
    pub fn load(&mut self) -> Result<usize, SavingsError> {
        self.store = PlanStore::load_from(self.storage.as_ref(), &self.key)?;
        Ok(self.store.len())
    }

    pub fn save(&self) -> Result<(), SavingsError> {
        self.store.save_to(self.storage.as_ref(), &self.key)?;
        Ok(())
    }

    pub fn plans(&self) -> Vec<&Plan> {
        self.store.list()
    }

    pub fn plan(&self, id: PlanId) -> Result<&Plan, SavingsError> {
        self.store.get(id).ok_or(SavingsError::PlanNotFound(id))
    }

    pub fn latest(&self) -> Option<&Plan> {
        self.store.latest()
    }

    /// First wizard step: a new plan with a name and/or company.
    pub fn create_plan(&mut self, name: &str, company: &str) -> Result<PlanId, SavingsError> {
        let mut draft = Plan::new(name.trim()).with_company(company.trim());
        draft.budget_timeframe_in_weeks = self.default_timeframe_weeks;
        let id = self.commit(|store| Ok(store.create(draft)?))?;
        info!(plan = %id, "plan created");
        Ok(id)
    }

    pub fn delete_plan(&mut self, id: PlanId) -> Result<Plan, SavingsError> {
        let removed = self.commit(|store| Ok(store.delete(id)?))?;
        info!(plan = %id, "plan deleted");
        Ok(removed)
    }

    pub fn set_offer_details(
        &mut self,
        id: PlanId,
        offer: OfferDetails,
    ) -> Result<(), SavingsError> {
        self.commit(|store| Ok(store.update(id, |plan| offer.apply(plan))?))
    }

    /// Replaces stipends and fees; entries without a positive amount are dropped.
    pub fn set_line_items(
        &mut self,
        id: PlanId,
        stipends: Vec<LineItem>,
        fees: Vec<LineItem>,
    ) -> Result<(), SavingsError> {
        self.commit(|store| {
            Ok(store.update(id, |plan| {
                plan.stipends = keep_positive(stipends);
                plan.fees = keep_positive(fees);
            })?)
        })
    }

    /// Replaces the plan's savings goals with the selected defaults plus custom ones.
    pub fn set_goals<S: AsRef<str>>(
        &mut self,
        id: PlanId,
        selected: &[S],
        custom: &[S],
    ) -> Result<Vec<String>, SavingsError> {
        self.commit(|store| {
            Ok(store.update(id, |plan| {
                GoalService::set_goals(plan, selected, custom);
                plan.goals.clone()
            })?)
        })
    }

    /// Flips one savings goal. Returns whether it is selected afterwards.
    pub fn toggle_goal(&mut self, id: PlanId, goal: &str) -> Result<bool, SavingsError> {
        self.commit(|store| Ok(store.update(id, |plan| GoalService::toggle(plan, goal))??))
    }

    pub fn set_categories<S: AsRef<str>>(
        &mut self,
        id: PlanId,
        names: &[S],
        timeframe_weeks: u32,
    ) -> Result<(), SavingsError> {
        self.commit(|store| {
            Ok(store.update(id, |plan| {
                CategoryService::set_categories(plan, names, timeframe_weeks)
            })??)
        })
    }

    pub fn add_category(&mut self, id: PlanId, name: &str) -> Result<bool, SavingsError> {
        self.commit(|store| Ok(store.update(id, |plan| CategoryService::add(plan, name))??))
    }

    pub fn remove_category(&mut self, id: PlanId, name: &str) -> Result<(), SavingsError> {
        self.commit(|store| Ok(store.update(id, |plan| CategoryService::remove(plan, name))??))
    }

    /// Previews allocations without storing them.
    pub fn check_budgets(
        &self,
        id: PlanId,
        allocations: &[BudgetAllocation],
    ) -> Result<BudgetCheck, SavingsError> {
        Ok(BudgetService::check(self.plan(id)?, allocations))
    }

    /// Final wizard step. Nothing is stored while the allocations are over budget.
    pub fn save_budgets(
        &mut self,
        id: PlanId,
        allocations: Vec<BudgetAllocation>,
    ) -> Result<BudgetCheck, SavingsError> {
        self.commit(|store| {
            Ok(store.update(id, |plan| BudgetService::save_allocations(plan, allocations))??)
        })
    }

    pub fn record_savings(
        &mut self,
        id: PlanId,
        category: &str,
        amount: f64,
    ) -> Result<SavingsOutcome, SavingsError> {
        let outcome = self.commit(|store| {
            Ok(store.update(id, |plan| {
                SavingsService::record_contribution(plan, category, amount)
            })??)
        })?;
        debug!(plan = %id, message = %outcome, "savings recorded");
        Ok(outcome)
    }

    pub fn suggested_per_goal(&self, id: PlanId) -> Result<f64, SavingsError> {
        Ok(GoalService::suggested_per_goal(self.plan(id)?))
    }

    pub fn progress(&self, id: PlanId) -> Result<Vec<CategoryProgress>, SavingsError> {
        Ok(SavingsService::progress(self.plan(id)?))
    }

    pub fn totals(&self, id: PlanId) -> Result<Totals, SavingsError> {
        Ok(SummaryService::totals(self.plan(id)?))
    }

    pub fn status(&self, id: PlanId) -> Result<PlanStatus, SavingsError> {
        Ok(SummaryService::status(self.plan(id)?))
    }

    pub fn compare(&self, left: PlanId, right: PlanId) -> Result<PlanComparison, SavingsError> {
        Ok(SummaryService::compare(self.plan(left)?, self.plan(right)?))
    }

    /// Runs `change` against a copy of the plans and keeps the copy only once it is persisted.
    fn commit<R>(
        &mut self,
        change: impl FnOnce(&mut PlanStore) -> Result<R, SavingsError>,
    ) -> Result<R, SavingsError> {
        let mut staged = self.store.clone();
        let outcome = change(&mut staged)?;
        staged.save_to(self.storage.as_ref(), &self.key)?;
        self.store = staged;
        Ok(outcome)
    }
}

fn keep_positive(items: Vec<LineItem>) -> Vec<LineItem> {
    items
        .into_iter()
        .filter(|item| sanitize_amount(item.amount) > 0.0)
        .collect()
}
