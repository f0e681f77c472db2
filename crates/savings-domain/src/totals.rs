use serde::{Deserialize, Serialize};

/// Derived financial summary for a plan. Recomputed on every read, never persisted.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_income: f64,
    pub total_reimbursements: f64,
    pub total_fees: f64,
    pub total_rent_cost: f64,
    pub total_transportation_cost: f64,
    pub total_groceries_cost: f64,
    pub total_utilities_cost: f64,
    pub total_living_expenses: f64,
    pub total_disposable_income: f64,
    pub suggested_per_goal: f64,
}

impl Totals {
    /// `true` when fees and living costs exceed everything the plan brings in.
    pub fn is_over_budget(&self) -> bool {
        self.total_disposable_income < 0.0
    }
}
