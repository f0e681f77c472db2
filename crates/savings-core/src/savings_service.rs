use std::{collections::BTreeMap, fmt};

use tracing::info;

use savings_domain::Plan;

use crate::{format::format_currency, CoreError};

/// Result of recording money set aside for a category.
#[derive(Debug, Clone, PartialEq)]
pub enum SavingsOutcome {
    /// The running total reached the category's goal.
    GoalCompleted {
        category: String,
        saved: f64,
        goal: f64,
    },
    Added {
        category: String,
        amount: f64,
        saved: f64,
    },
}

impl SavingsOutcome {
    pub fn category(&self) -> &str {
        match self {
            SavingsOutcome::GoalCompleted { category, .. } => category,
            SavingsOutcome::Added { category, .. } => category,
        }
    }

    pub fn saved(&self) -> f64 {
        match self {
            SavingsOutcome::GoalCompleted { saved, .. } => *saved,
            SavingsOutcome::Added { saved, .. } => *saved,
        }
    }

    pub fn is_goal_completed(&self) -> bool {
        matches!(self, SavingsOutcome::GoalCompleted { .. })
    }

    /// Confirmation shown after a contribution.
    pub fn message(&self) -> String {
        match self {
            SavingsOutcome::GoalCompleted { category, .. } => {
                format!("Congrats! You completed your savings goal for {category}!")
            }
            SavingsOutcome::Added {
                category, amount, ..
            } => format!(
                "Added {} to {category}. Keep up the great saving!",
                format_currency(*amount)
            ),
        }
    }
}

impl fmt::Display for SavingsOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Goal versus saved amount for one budgeted category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryProgress {
    pub category: String,
    pub goal: f64,
    pub saved: f64,
    /// Share of the goal saved so far, clamped to `0.0..=1.0`.
    pub fraction: f64,
    pub completed: bool,
}

impl CategoryProgress {
    fn new(category: &str, goal: f64, saved: f64) -> Self {
        let fraction = if goal > 0.0 {
            (saved / goal).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            category: category.to_string(),
            goal,
            saved,
            fraction,
            completed: goal > 0.0 && saved >= goal,
        }
    }

    /// Whole percent for progress bars.
    pub fn percent(&self) -> u8 {
        (self.fraction * 100.0).round() as u8
    }
}

pub struct SavingsService;

impl SavingsService {
    /// Adds `amount` to the category's running total.
    ///
    /// Only categories with a budget allocation can receive money, and the
    /// amount must be a positive finite number.
    pub fn record_contribution(
        plan: &mut Plan,
        category: &str,
        amount: f64,
    ) -> Result<SavingsOutcome, CoreError> {
        if !(amount.is_finite() && amount > 0.0) {
            return Err(CoreError::Validation("contribution must be a positive amount".into()));
        }
        let (budgeted, goal) = plan
            .budget_for(category)
            .map(|allocation| (allocation.category.clone(), allocation.amount))
            .ok_or_else(|| CoreError::CategoryNotFound(category.trim().to_string()))?;
        let category = budgeted.as_str();

        let saved = plan.saved_for(category) + amount;
        plan.savings.insert(category.to_string(), saved);
        info!(plan = %plan.id, category, amount, saved, goal, "contribution recorded");

        let outcome = if goal > 0.0 && saved >= goal {
            SavingsOutcome::GoalCompleted {
                category: category.to_string(),
                saved,
                goal,
            }
        } else {
            SavingsOutcome::Added {
                category: category.to_string(),
                amount,
                saved,
            }
        };
        Ok(outcome)
    }

    /// Progress for every budgeted category, in allocation order.
    pub fn progress(plan: &Plan) -> Vec<CategoryProgress> {
        plan.budgets
            .iter()
            .map(|allocation| {
                CategoryProgress::new(
                    &allocation.category,
                    allocation.amount,
                    plan.saved_for(&allocation.category),
                )
            })
            .collect()
    }

    pub fn progress_for(plan: &Plan, category: &str) -> Option<CategoryProgress> {
        plan.budget_for(category).map(|allocation| {
            CategoryProgress::new(category, allocation.amount, plan.saved_for(category))
        })
    }

    /// The savings map with a zero entry filled in for every budgeted category.
    pub fn normalized_savings(plan: &Plan) -> BTreeMap<String, f64> {
        let mut savings = plan.savings.clone();
        for allocation in &plan.budgets {
            savings.entry(allocation.category.clone()).or_insert(0.0);
        }
        savings
    }

    pub fn total_saved(plan: &Plan) -> f64 {
        plan.budgets
            .iter()
            .map(|allocation| plan.saved_for(&allocation.category))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use savings_domain::BudgetAllocation;

    fn plan_with_goal(goal: f64) -> Plan {
        let mut plan = Plan::new("Savings");
        plan.categories.push("Travel".into());
        plan.budgets.push(BudgetAllocation::new("Travel", goal));
        plan
    }

    #[test]
    fn contributions_accumulate() {
        let mut plan = plan_with_goal(500.0);
        let first = SavingsService::record_contribution(&mut plan, "Travel", 100.0).unwrap();
        assert_eq!(
            first.message(),
            "Added $100.00 to Travel. Keep up the great saving!"
        );
        let second = SavingsService::record_contribution(&mut plan, "Travel", 50.25).unwrap();
        assert_eq!(second.saved(), 150.25);
        assert_eq!(plan.saved_for("Travel"), 150.25);
    }

    #[test]
    fn reaching_the_goal_congratulates() {
        let mut plan = plan_with_goal(200.0);
        SavingsService::record_contribution(&mut plan, "Travel", 150.0).unwrap();
        let outcome = SavingsService::record_contribution(&mut plan, "Travel", 75.0).unwrap();
        assert!(outcome.is_goal_completed());
        assert_eq!(
            outcome.to_string(),
            "Congrats! You completed your savings goal for Travel!"
        );
        let progress = SavingsService::progress_for(&plan, "Travel").unwrap();
        assert_eq!(progress.fraction, 1.0);
        assert!(progress.completed);
    }

    #[test]
    fn padded_names_credit_the_budgeted_category() {
        let mut plan = plan_with_goal(300.0);
        let outcome = SavingsService::record_contribution(&mut plan, " Travel ", 20.0).unwrap();
        assert_eq!(outcome.category(), "Travel");
        assert_eq!(plan.savings.keys().collect::<Vec<_>>(), vec!["Travel"]);
        assert!(matches!(
            SavingsService::record_contribution(&mut plan, "travel", 5.0),
            Err(CoreError::CategoryNotFound(_))
        ));
    }

    #[test]
    fn zero_goal_never_completes() {
        let mut plan = plan_with_goal(0.0);
        let outcome = SavingsService::record_contribution(&mut plan, "Travel", 10.0).unwrap();
        assert!(!outcome.is_goal_completed());
        assert_eq!(SavingsService::progress(&plan)[0].fraction, 0.0);
    }

    #[test]
    fn rejects_unknown_categories_and_bad_amounts() {
        let mut plan = plan_with_goal(100.0);
        assert!(matches!(
            SavingsService::record_contribution(&mut plan, "Pets", 10.0),
            Err(CoreError::CategoryNotFound(_))
        ));
        for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                SavingsService::record_contribution(&mut plan, "Travel", amount),
                Err(CoreError::Validation(_))
            ));
        }
        assert!(plan.savings.is_empty());
    }

    #[test]
    fn normalized_savings_fill_missing_entries() {
        let mut plan = plan_with_goal(100.0);
        plan.budgets.push(BudgetAllocation::new("Emergency", 300.0));
        plan.savings.insert("Emergency".into(), 120.0);
        plan.savings.insert("Stale".into(), 999.0);

        let normalized = SavingsService::normalized_savings(&plan);
        assert_eq!(normalized.get("Travel"), Some(&0.0));
        assert_eq!(normalized.get("Emergency"), Some(&120.0));
        assert_eq!(normalized.len(), 3);
        assert_eq!(SavingsService::total_saved(&plan), 120.0);
        assert_eq!(SavingsService::progress(&plan)[1].percent(), 40);
    }
}
