use tracing::{debug, warn};

use savings_domain::{same_category, sanitize_amount, BudgetAllocation, Plan};

use crate::{
    calculator::{budget_available_per_timeframe, compute_totals, remaining_budget},
    CoreError,
};

/// Outcome of weighing category allocations against what a plan can afford.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetCheck {
    pub available: f64,
    pub allocated: f64,
    pub remaining: f64,
    pub over_budget: bool,
}

impl BudgetCheck {
    pub fn new(available: f64, allocations: impl IntoIterator<Item = f64>) -> Self {
        let remaining = remaining_budget(available, allocations);
        Self {
            available,
            allocated: available - remaining,
            remaining,
            over_budget: remaining < 0.0,
        }
    }

    /// How far allocations exceed the available amount; zero when within budget.
    pub fn over_by(&self) -> f64 {
        if self.over_budget {
            -self.remaining
        } else {
            0.0
        }
    }
}

pub struct BudgetService;

impl BudgetService {
    /// Amount the plan can hand out to categories per review timeframe.
    pub fn available_for_plan(plan: &Plan) -> f64 {
        let totals = compute_totals(plan);
        budget_available_per_timeframe(
            totals.total_disposable_income,
            plan.weeks,
            plan.budget_timeframe_in_weeks,
        )
    }

    /// Checks proposed allocations without touching the plan.
    pub fn check(plan: &Plan, allocations: &[BudgetAllocation]) -> BudgetCheck {
        BudgetCheck::new(
            Self::available_for_plan(plan),
            allocations.iter().map(|allocation| allocation.amount),
        )
    }

    /// Checks the allocations already stored on the plan.
    pub fn check_current(plan: &Plan) -> BudgetCheck {
        Self::check(plan, &plan.budgets)
    }

    /// Stores category allocations, replacing the previous set.
    ///
    /// Rejected with [`CoreError::OverBudget`] while the allocations exceed what
    /// the plan can afford; the plan is left untouched in that case. Categories
    /// not yet on the plan are added, and every budgeted category gets a savings
    /// entry.
    pub fn save_allocations(
        plan: &mut Plan,
        allocations: Vec<BudgetAllocation>,
    ) -> Result<BudgetCheck, CoreError> {
        let mut merged: Vec<BudgetAllocation> = Vec::with_capacity(allocations.len());
        for allocation in allocations {
            let category = allocation.category.trim();
            if category.is_empty() {
                return Err(CoreError::Validation("budget allocation needs a category".into()));
            }
            let amount = sanitize_amount(allocation.amount);
            match merged
                .iter_mut()
                .find(|existing| same_category(&existing.category, category))
            {
                Some(existing) => existing.amount = amount,
                None => {
                    // Keep the spelling already on the plan.
                    let name = plan
                        .categories
                        .iter()
                        .find(|existing| same_category(existing, category))
                        .map_or(category, |existing| existing.as_str());
                    merged.push(BudgetAllocation::new(name, amount));
                }
            }
        }

        let check = Self::check(plan, &merged);
        if check.over_budget {
            warn!(plan = %plan.id, over_by = check.over_by(), "budget allocations rejected");
            return Err(CoreError::OverBudget {
                over_by: check.over_by(),
            });
        }

        for allocation in &merged {
            if !plan.has_category(&allocation.category) {
                plan.categories.push(allocation.category.clone());
            }
            plan.savings
                .entry(allocation.category.clone())
                .or_insert(0.0);
        }
        plan.budgets = merged;
        debug!(
            plan = %plan.id,
            categories = plan.budgets.len(),
            remaining = check.remaining,
            "budget allocations saved"
        );
        Ok(check)
    }

    /// Changes a single category's allocation, keeping the others.
    pub fn set_allocation(
        plan: &mut Plan,
        category: &str,
        amount: f64,
    ) -> Result<BudgetCheck, CoreError> {
        let mut allocations = plan.budgets.clone();
        match allocations
            .iter_mut()
            .find(|allocation| same_category(&allocation.category, category))
        {
            Some(existing) => existing.amount = amount,
            None => allocations.push(BudgetAllocation::new(category, amount)),
        }
        Self::save_allocations(plan, allocations)
    }
}
