use tracing::debug;

use savings_domain::Plan;

use crate::{calculator::compute_totals, CoreError};

/// Savings goals offered before any custom ones are typed in.
pub const DEFAULT_GOALS: [&str; 6] = [
    "Travel",
    "Emergency",
    "Utilities",
    "Retirement",
    "Groceries",
    "Entertainment",
];

/// The goal list that feeds `suggestedPerGoal`.
pub struct GoalService;

impl GoalService {
    /// Stores the selected goals followed by the custom ones.
    ///
    /// Names are trimmed, blanks dropped, and repeats collapsed to their first
    /// occurrence.
    pub fn set_goals<I, J, S, T>(plan: &mut Plan, selected: I, custom: J)
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut goals: Vec<String> = Vec::new();
        let names = selected
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .chain(custom.into_iter().map(|name| name.as_ref().trim().to_string()));
        for name in names {
            if !name.is_empty() && !goals.contains(&name) {
                goals.push(name);
            }
        }
        debug!(plan = %plan.id, goals = goals.len(), "goals replaced");
        plan.goals = goals;
    }

    /// Flips one goal on or off. Returns whether it is selected afterwards.
    pub fn toggle(plan: &mut Plan, goal: &str) -> Result<bool, CoreError> {
        let goal = goal.trim();
        if goal.is_empty() {
            return Err(CoreError::Validation("Goal name cannot be empty".into()));
        }
        match plan.goals.iter().position(|existing| existing == goal) {
            Some(index) => {
                plan.goals.remove(index);
                Ok(false)
            }
            None => {
                plan.goals.push(goal.to_string());
                Ok(true)
            }
        }
    }

    pub fn suggested_per_goal(plan: &Plan) -> f64 {
        compute_totals(plan).suggested_per_goal
    }
}
