#![doc(test(attr(deny(warnings))))]

//! Sunny Savings turns internship and job offers into budgeting plans: what
//! an offer pays, what living there costs, how much is left each week, and
//! how savings goals are tracking.
//!
//! The workspace crates carry the model (`savings_domain`), the calculator
//! and services (`savings_core`), file persistence (`savings_storage_json`)
//! and preferences (`savings_config`). This crate wires them together behind
//! [`PlanManager`].

pub mod core;
pub mod errors;
pub mod utils;

use std::sync::Once;

pub use crate::core::plan_manager::{LivingCostEntry, OfferDetails, PlanManager};
pub use errors::SavingsError;
pub use savings_config::{Config, ConfigManager};
pub use savings_core::{
    compute_totals, format_currency, BudgetCheck, CategoryProgress, PlanComparison, PlanStatus,
    SavingsOutcome, DEFAULT_CATEGORIES, DEFAULT_GOALS,
};
pub use savings_domain::{
    BudgetAllocation, CostFrequency, LineItem, LivingCost, Plan, PlanId, SalaryFrequency, Totals,
};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Sunny Savings tracing initialized.");
    });
}
