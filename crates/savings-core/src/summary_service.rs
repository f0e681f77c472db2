use std::fmt;

use serde::Serialize;
use tracing::debug;

use savings_domain::{Plan, PlanId, Totals};

use crate::calculator::compute_totals;

/// How far along the wizard a plan is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanStatus {
    Draft,
    OfferOnly,
    Complete,
}

impl PlanStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PlanStatus::Draft => "draft",
            PlanStatus::OfferOnly => "offer-only",
            PlanStatus::Complete => "complete",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlanStatus::Draft => "Draft",
            PlanStatus::OfferOnly => "Offer Entered",
            PlanStatus::Complete => "Complete",
        }
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One side of a [`PlanComparison`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSnapshot {
    pub id: PlanId,
    pub label: String,
    pub status: PlanStatus,
    pub totals: Totals,
}

impl PlanSnapshot {
    pub fn of(plan: &Plan) -> Self {
        Self {
            id: plan.id,
            label: plan.display_label().to_string(),
            status: SummaryService::status(plan),
            totals: compute_totals(plan),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanComparison {
    pub left: PlanSnapshot,
    pub right: PlanSnapshot,
    /// `left` minus `right` disposable income.
    pub disposable_difference: f64,
}

impl PlanComparison {
    /// The snapshot with more disposable income; `None` on a tie.
    pub fn better(&self) -> Option<&PlanSnapshot> {
        if self.disposable_difference > 0.0 {
            Some(&self.left)
        } else if self.disposable_difference < 0.0 {
            Some(&self.right)
        } else {
            None
        }
    }
}

pub struct SummaryService;

impl SummaryService {
    pub fn totals(plan: &Plan) -> Totals {
        compute_totals(plan)
    }

    /// Company, salary, duration and location are all filled in.
    pub fn has_offer_info(plan: &Plan) -> bool {
        !plan.company.trim().is_empty()
            && plan.salary > 0.0
            && plan.weeks > 0
            && !plan.location.trim().is_empty()
    }

    pub fn status(plan: &Plan) -> PlanStatus {
        match (Self::has_offer_info(plan), plan.budgets.is_empty()) {
            (true, false) => PlanStatus::Complete,
            (true, true) => PlanStatus::OfferOnly,
            (false, _) => PlanStatus::Draft,
        }
    }

    /// Puts two plans side by side using the same calculator as every other view.
    pub fn compare(left: &Plan, right: &Plan) -> PlanComparison {
        let left = PlanSnapshot::of(left);
        let right = PlanSnapshot::of(right);
        let disposable_difference =
            left.totals.total_disposable_income - right.totals.total_disposable_income;
        debug!(
            left = %left.id,
            right = %right.id,
            difference = disposable_difference,
            "plans compared"
        );
        PlanComparison {
            left,
            right,
            disposable_difference,
        }
    }
}
