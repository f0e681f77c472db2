//! Domain types representing a budgeting plan.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    common::{Amounted, PlanId},
    frequency::{CostFrequency, SalaryFrequency},
    lenient,
};

pub const DEFAULT_BUDGET_TIMEFRAME_WEEKS: u32 = 4;

const TRANSPORT_FREQUENCY_KEY: &str = "transportFrequency";
const LEGACY_TRANSPORT_FREQUENCY_KEY: &str = "transportationFrequency";

/// One budgeting scenario: an offer, its location costs, and the savings plan built on top.
///
/// Field names follow the persisted camelCase layout. Every field is optional on
/// input and coerced to its default when malformed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[serde(default, deserialize_with = "lenient::plan_id")]
    pub id: PlanId,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub salary: f64,
    #[serde(
        default,
        deserialize_with = "lenient::salary_frequency",
        skip_serializing_if = "Option::is_none"
    )]
    pub salary_frequency: Option<SalaryFrequency>,
    #[serde(default, deserialize_with = "lenient::whole_number")]
    pub weeks: u32,
    #[serde(
        default,
        deserialize_with = "lenient::optional_positive",
        skip_serializing_if = "Option::is_none"
    )]
    pub hours_per_week: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_positive",
        skip_serializing_if = "Option::is_none"
    )]
    pub hours_per_day: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub rent: f64,
    #[serde(default)]
    pub rent_frequency: CostFrequency,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub transportation: f64,
    #[serde(default, rename = "transportFrequency", alias = "transportationFrequency")]
    pub transportation_frequency: CostFrequency,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub groceries: f64,
    #[serde(default)]
    pub groceries_frequency: CostFrequency,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub utilities: f64,
    #[serde(default)]
    pub utilities_frequency: CostFrequency,
    #[serde(default, deserialize_with = "lenient::line_items")]
    pub stipends: Vec<LineItem>,
    #[serde(default, deserialize_with = "lenient::line_items")]
    pub fees: Vec<LineItem>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub goals: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub categories: Vec<String>,
    #[serde(
        default = "Plan::default_budget_timeframe",
        deserialize_with = "lenient::timeframe"
    )]
    pub budget_timeframe_in_weeks: u32,
    #[serde(default, deserialize_with = "lenient::budgets")]
    pub budgets: Vec<BudgetAllocation>,
    #[serde(default, deserialize_with = "lenient::savings")]
    pub savings: BTreeMap<String, f64>,
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            id: PlanId::UNASSIGNED,
            name: String::new(),
            company: String::new(),
            location: String::new(),
            salary: 0.0,
            salary_frequency: None,
            weeks: 0,
            hours_per_week: None,
            hours_per_day: None,
            rent: 0.0,
            rent_frequency: CostFrequency::default(),
            transportation: 0.0,
            transportation_frequency: CostFrequency::default(),
            groceries: 0.0,
            groceries_frequency: CostFrequency::default(),
            utilities: 0.0,
            utilities_frequency: CostFrequency::default(),
            stipends: Vec::new(),
            fees: Vec::new(),
            goals: Vec::new(),
            categories: Vec::new(),
            budget_timeframe_in_weeks: DEFAULT_BUDGET_TIMEFRAME_WEEKS,
            budgets: Vec::new(),
            savings: BTreeMap::new(),
        }
    }
}

impl Plan {
    /// Starts an unsaved plan carrying only a display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builds a plan from one persisted JSON object.
    ///
    /// Older clients wrote the transport cadence as `transportationFrequency`;
    /// when both spellings are present `transportFrequency` wins.
    pub fn from_value(mut value: Value) -> serde_json::Result<Self> {
        if let Value::Object(fields) = &mut value {
            if let Some(legacy) = fields.remove(LEGACY_TRANSPORT_FREQUENCY_KEY) {
                fields.entry(TRANSPORT_FREQUENCY_KEY).or_insert(legacy);
            }
        }
        serde_json::from_value(value)
    }

    pub fn default_budget_timeframe() -> u32 {
        DEFAULT_BUDGET_TIMEFRAME_WEEKS
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_salary(mut self, salary: f64, frequency: SalaryFrequency) -> Self {
        self.salary = salary;
        self.salary_frequency = Some(frequency);
        self
    }

    pub fn with_weeks(mut self, weeks: u32) -> Self {
        self.weeks = weeks;
        self
    }

    pub fn with_living_cost(
        mut self,
        kind: LivingCost,
        amount: f64,
        frequency: CostFrequency,
    ) -> Self {
        self.set_living_cost(kind, amount, frequency);
        self
    }

    /// Returns the amount and cadence recorded for one living-cost bucket.
    pub fn living_cost(&self, kind: LivingCost) -> (f64, &CostFrequency) {
        match kind {
            LivingCost::Rent => (self.rent, &self.rent_frequency),
            LivingCost::Transportation => (self.transportation, &self.transportation_frequency),
            LivingCost::Groceries => (self.groceries, &self.groceries_frequency),
            LivingCost::Utilities => (self.utilities, &self.utilities_frequency),
        }
    }

    pub fn set_living_cost(&mut self, kind: LivingCost, amount: f64, frequency: CostFrequency) {
        let (slot, cadence) = match kind {
            LivingCost::Rent => (&mut self.rent, &mut self.rent_frequency),
            LivingCost::Transportation => {
                (&mut self.transportation, &mut self.transportation_frequency)
            }
            LivingCost::Groceries => (&mut self.groceries, &mut self.groceries_frequency),
            LivingCost::Utilities => (&mut self.utilities, &mut self.utilities_frequency),
        };
        *slot = amount;
        *cadence = frequency;
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories
            .iter()
            .any(|existing| same_category(existing, category))
    }

    pub fn budget_for(&self, category: &str) -> Option<&BudgetAllocation> {
        self.budgets
            .iter()
            .find(|allocation| same_category(&allocation.category, category))
    }

    /// Amount saved so far toward a category; categories without an entry have saved nothing.
    pub fn saved_for(&self, category: &str) -> f64 {
        self.savings.get(category).copied().unwrap_or(0.0)
    }

    /// Label shown wherever a plan is listed: company, else name, else "Untitled".
    pub fn display_label(&self) -> &str {
        if !self.company.trim().is_empty() {
            &self.company
        } else if !self.name.trim().is_empty() {
            &self.name
        } else {
            "Untitled"
        }
    }
}

/// Category names match after trimming; case is significant.
pub fn same_category(left: &str, right: &str) -> bool {
    left.trim() == right.trim()
}

/// The four living-cost buckets tracked on every plan.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LivingCost {
    Rent,
    Transportation,
    Groceries,
    Utilities,
}

impl LivingCost {
    pub const ALL: [LivingCost; 4] = [
        LivingCost::Rent,
        LivingCost::Transportation,
        LivingCost::Groceries,
        LivingCost::Utilities,
    ];
}

impl fmt::Display for LivingCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LivingCost::Rent => "Rent",
            LivingCost::Transportation => "Transportation",
            LivingCost::Groceries => "Groceries",
            LivingCost::Utilities => "Utilities",
        };
        f.write_str(label)
    }
}

/// A stipend or fee: a labelled total for the whole plan duration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    #[serde(rename = "type", default, deserialize_with = "lenient::text")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: f64,
}

impl LineItem {
    pub fn new(kind: impl Into<String>, amount: f64) -> Self {
        Self {
            kind: kind.into(),
            amount,
        }
    }
}

impl Amounted for LineItem {
    fn amount(&self) -> f64 {
        self.amount
    }
}

/// Amount set aside for one category per budget timeframe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetAllocation {
    #[serde(default, deserialize_with = "lenient::text")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: f64,
}

impl BudgetAllocation {
    pub fn new(category: impl Into<String>, amount: f64) -> Self {
        Self {
            category: category.into(),
            amount,
        }
    }
}

impl Amounted for BudgetAllocation {
    fn amount(&self) -> f64 {
        self.amount
    }
}
