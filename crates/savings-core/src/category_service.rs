use tracing::debug;

use savings_domain::{same_category, Plan, DEFAULT_BUDGET_TIMEFRAME_WEEKS};

use crate::CoreError;

/// Categories offered on every new plan before any custom ones are added.
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Emergency",
    "Travel",
    "Retirement",
    "Education",
    "Big purchase",
    "Entertainment",
];

pub struct CategoryService;

impl CategoryService {
    /// Adds a category. Returns `false` when the trimmed name is already present.
    pub fn add(plan: &mut Plan, name: &str) -> Result<bool, CoreError> {
        let name = Self::validate_name(name)?;
        if Self::position(plan, &name).is_some() {
            return Ok(false);
        }
        debug!(plan = %plan.id, category = %name, "category added");
        plan.categories.push(name);
        Ok(true)
    }

    /// Removes a category together with its budget and savings entries.
    pub fn remove(plan: &mut Plan, name: &str) -> Result<(), CoreError> {
        let index = Self::position(plan, name)
            .ok_or_else(|| CoreError::CategoryNotFound(name.trim().to_string()))?;
        let removed = plan.categories.remove(index);
        plan.budgets.retain(|allocation| !same_category(&allocation.category, &removed));
        plan.savings.retain(|category, _| !same_category(category, &removed));
        debug!(plan = %plan.id, category = %removed, "category removed");
        Ok(())
    }

    /// Flips a category on or off. Returns whether it is selected afterwards.
    pub fn toggle(plan: &mut Plan, name: &str) -> Result<bool, CoreError> {
        if Self::position(plan, name).is_some() {
            Self::remove(plan, name)?;
            Ok(false)
        } else {
            Self::add(plan, name)
        }
    }

    /// Replaces the category selection and review timeframe in one step.
    ///
    /// Blank and repeated names are dropped; budgets and savings for categories
    /// no longer selected are pruned. A zero timeframe falls back to four weeks.
    pub fn set_categories<I, S>(
        plan: &mut Plan,
        names: I,
        timeframe_weeks: u32,
    ) -> Result<(), CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selected: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            if !selected.iter().any(|existing| same_category(existing, name)) {
                selected.push(name.to_string());
            }
        }
        let is_selected =
            |category: &str| selected.iter().any(|name| same_category(name, category));
        plan.budgets.retain(|allocation| is_selected(&allocation.category));
        plan.savings.retain(|category, _| is_selected(category));
        plan.categories = selected;
        plan.budget_timeframe_in_weeks = if timeframe_weeks == 0 {
            DEFAULT_BUDGET_TIMEFRAME_WEEKS
        } else {
            timeframe_weeks
        };
        debug!(
            plan = %plan.id,
            categories = plan.categories.len(),
            timeframe = plan.budget_timeframe_in_weeks,
            "categories replaced"
        );
        Ok(())
    }

    pub fn is_default(name: &str) -> bool {
        DEFAULT_CATEGORIES
            .iter()
            .any(|default| same_category(default, name))
    }

    /// Selected categories that are not among [`DEFAULT_CATEGORIES`].
    pub fn custom_categories(plan: &Plan) -> Vec<&str> {
        plan.categories
            .iter()
            .map(String::as_str)
            .filter(|name| !Self::is_default(name))
            .collect()
    }

    fn position(plan: &Plan, name: &str) -> Option<usize> {
        plan.categories
            .iter()
            .position(|existing| same_category(existing, name))
    }

    fn validate_name(candidate: &str) -> Result<String, CoreError> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            Err(CoreError::Validation("Category name cannot be empty".into()))
        } else {
            Ok(trimmed.to_string())
        }
    }
}
