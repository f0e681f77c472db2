//! Plan financials: frequency normalization to weekly figures, then summation.
//!
//! Every function here is pure and total. Missing or invalid numbers count as
//! zero, so the calculator can run on a plan that is still being filled in.

use savings_domain::{
    sanitize_amount, Amounted, CostFrequency, LivingCost, Plan, SalaryFrequency, Totals,
};

pub const DEFAULT_HOURS_PER_WEEK: f64 = 40.0;
pub const WORKDAYS_PER_WEEK: f64 = 5.0;
/// Share of disposable income suggested for savings goals in the legacy goal flow.
pub const SUGGESTED_GOAL_SHARE: f64 = 0.20;

const DAYS_PER_WEEK: f64 = 7.0;
const WEEKS_PER_MONTH: f64 = 4.0;
const MONTHS_PER_YEAR: f64 = 12.0;
const WEEKS_PER_YEAR: f64 = 52.0;

/// Derives the full [`Totals`] record for a plan. Never fails and never mutates the plan.
pub fn compute_totals(plan: &Plan) -> Totals {
    let weeks = f64::from(plan.weeks);

    let total_income = finite_or_zero(weekly_salary(plan) * weeks);
    let total_reimbursements = sum_amounts(&plan.stipends);
    let total_fees = sum_amounts(&plan.fees);

    let [total_rent_cost, total_transportation_cost, total_groceries_cost, total_utilities_cost] =
        LivingCost::ALL.map(|kind| {
            let (amount, frequency) = plan.living_cost(kind);
            finite_or_zero(weeks * weekly_cost(amount, frequency))
        });

    let total_living_expenses = finite_or_zero(
        total_rent_cost + total_transportation_cost + total_groceries_cost + total_utilities_cost,
    );

    let total_disposable_income = finite_or_zero(
        total_income + total_reimbursements - total_fees - total_living_expenses,
    );

    let suggested_per_goal = match plan.goals.len() {
        0 => 0.0,
        goals => finite_or_zero((total_disposable_income * SUGGESTED_GOAL_SHARE) / goals as f64),
    };

    Totals {
        total_income,
        total_reimbursements,
        total_fees,
        total_rent_cost,
        total_transportation_cost,
        total_groceries_cost,
        total_utilities_cost,
        total_living_expenses,
        total_disposable_income,
        suggested_per_goal,
    }
}

/// Salary per week. Zero when salary or duration is missing, or when the cadence is unknown.
pub fn weekly_salary(plan: &Plan) -> f64 {
    let salary = sanitize_amount(plan.salary);
    if salary <= 0.0 || plan.weeks == 0 {
        return 0.0;
    }
    let weekly = match plan.salary_frequency {
        Some(SalaryFrequency::Hourly) => salary * hours_per_week(plan),
        Some(SalaryFrequency::Weekly) => salary,
        Some(SalaryFrequency::Biweekly) => salary / 2.0,
        Some(SalaryFrequency::Monthly) => salary / WEEKS_PER_MONTH,
        Some(SalaryFrequency::Annually) => salary / WEEKS_PER_YEAR,
        None => 0.0,
    };
    finite_or_zero(weekly)
}

/// Explicit weekly hours win, then legacy daily hours over a five-day week, then 40.
pub fn hours_per_week(plan: &Plan) -> f64 {
    let explicit = plan.hours_per_week.map(sanitize_amount).unwrap_or(0.0);
    if explicit > 0.0 {
        return explicit;
    }
    let daily = plan.hours_per_day.map(sanitize_amount).unwrap_or(0.0);
    if daily > 0.0 {
        return daily * WORKDAYS_PER_WEEK;
    }
    DEFAULT_HOURS_PER_WEEK
}

/// Normalizes a living cost to a weekly figure.
///
/// Monthly costs are annualized before dividing by 52. Unknown cadences are
/// taken as already weekly.
pub fn weekly_cost(amount: f64, frequency: &CostFrequency) -> f64 {
    let cost = sanitize_amount(amount);
    if cost <= 0.0 {
        return 0.0;
    }
    let weekly = match frequency {
        CostFrequency::Daily => cost * DAYS_PER_WEEK,
        CostFrequency::Weekly => cost,
        CostFrequency::Biweekly => cost / 2.0,
        CostFrequency::Monthly => (cost * MONTHS_PER_YEAR) / WEEKS_PER_YEAR,
        CostFrequency::Annually => cost / WEEKS_PER_YEAR,
        CostFrequency::Unrecognized(_) => cost,
    };
    finite_or_zero(weekly)
}

/// Sums positive finite amounts; everything else contributes nothing.
pub fn sum_amounts<T: Amounted>(items: &[T]) -> f64 {
    finite_or_zero(
        items
            .iter()
            .map(|item| sanitize_amount(item.amount()))
            .fold(0.0, |sum, amount| sum + amount),
    )
}

/// Money available for category budgets over one review timeframe.
pub fn budget_available_per_timeframe(
    total_disposable_income: f64,
    weeks: u32,
    timeframe_weeks: u32,
) -> f64 {
    if weeks == 0 || !total_disposable_income.is_finite() {
        return 0.0;
    }
    (total_disposable_income / f64::from(weeks)) * f64::from(timeframe_weeks)
}

/// Overflowed sums and products count as zero, like any other invalid figure.
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// What is left of `available` after the given allocations. Negative means over budget.
pub fn remaining_budget<I>(available: f64, allocations: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    available
        - allocations
            .into_iter()
            .map(sanitize_amount)
            .fold(0.0, |sum, amount| sum + amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use savings_domain::LineItem;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn empty_plan_yields_all_zero_totals() {
        assert_eq!(compute_totals(&Plan::default()), Totals::default());
    }

    #[test]
    fn weekly_salary_over_ten_weeks() {
        let plan = Plan::default()
            .with_salary(1000.0, SalaryFrequency::Weekly)
            .with_weeks(10);
        assert_eq!(compute_totals(&plan).total_income, 10_000.0);
    }

    #[test]
    fn hourly_salary_uses_explicit_weekly_hours() {
        let mut plan = Plan::default()
            .with_salary(20.0, SalaryFrequency::Hourly)
            .with_weeks(4);
        plan.hours_per_week = Some(30.0);
        assert_eq!(weekly_salary(&plan), 600.0);
        assert_eq!(compute_totals(&plan).total_income, 2400.0);
    }

    #[test]
    fn hourly_salary_defaults_to_forty_hours() {
        let plan = Plan::default()
            .with_salary(20.0, SalaryFrequency::Hourly)
            .with_weeks(1);
        assert_eq!(weekly_salary(&plan), 800.0);
        assert_eq!(compute_totals(&plan).total_income, 800.0);
    }

    #[test]
    fn hourly_salary_falls_back_to_daily_hours() {
        let mut plan = Plan::default()
            .with_salary(10.0, SalaryFrequency::Hourly)
            .with_weeks(2);
        plan.hours_per_week = Some(-1.0);
        plan.hours_per_day = Some(6.0);
        assert_eq!(hours_per_week(&plan), 30.0);
        assert_eq!(compute_totals(&plan).total_income, 600.0);
    }

    #[test]
    fn salary_cadences_normalize_to_weekly() {
        let base = Plan::default().with_weeks(52);
        let cases = [
            (SalaryFrequency::Biweekly, 2000.0, 1000.0),
            (SalaryFrequency::Monthly, 4000.0, 1000.0),
            (SalaryFrequency::Annually, 52_000.0, 1000.0),
        ];
        for (frequency, salary, weekly) in cases {
            let plan = base.clone().with_salary(salary, frequency);
            assert_close(weekly_salary(&plan), weekly);
        }
    }

    #[test]
    fn unknown_salary_cadence_zeroes_income() {
        let mut plan = Plan::default().with_weeks(10);
        plan.salary = 5000.0;
        assert_eq!(compute_totals(&plan).total_income, 0.0);
    }

    #[test]
    fn zero_weeks_yields_no_income_or_costs() {
        let plan = Plan::default()
            .with_salary(1000.0, SalaryFrequency::Weekly)
            .with_living_cost(LivingCost::Rent, 800.0, CostFrequency::Monthly);
        let totals = compute_totals(&plan);
        assert_eq!(totals.total_income, 0.0);
        assert_eq!(totals.total_rent_cost, 0.0);
    }

    #[test]
    fn monthly_rent_is_annualized() {
        let plan = Plan::default()
            .with_weeks(52)
            .with_living_cost(LivingCost::Rent, 1000.0, CostFrequency::Monthly);
        assert_close(weekly_cost(1000.0, &CostFrequency::Monthly), 230.769_230_769);
        assert_close(compute_totals(&plan).total_rent_cost, 12_000.0);
    }

    #[test]
    fn cost_cadences_normalize_to_weekly() {
        assert_eq!(weekly_cost(10.0, &CostFrequency::Daily), 70.0);
        assert_eq!(weekly_cost(10.0, &CostFrequency::Weekly), 10.0);
        assert_eq!(weekly_cost(10.0, &CostFrequency::Biweekly), 5.0);
        assert_eq!(weekly_cost(520.0, &CostFrequency::Annually), 10.0);
        assert_eq!(
            weekly_cost(10.0, &CostFrequency::Unrecognized("quarterly".into())),
            10.0
        );
        assert_eq!(weekly_cost(-10.0, &CostFrequency::Daily), 0.0);
        assert_eq!(weekly_cost(f64::NAN, &CostFrequency::Weekly), 0.0);
    }

    #[test]
    fn living_expenses_sum_every_bucket() {
        let plan = Plan::default()
            .with_weeks(2)
            .with_living_cost(LivingCost::Rent, 500.0, CostFrequency::Weekly)
            .with_living_cost(LivingCost::Transportation, 10.0, CostFrequency::Daily)
            .with_living_cost(LivingCost::Groceries, 100.0, CostFrequency::Biweekly)
            .with_living_cost(LivingCost::Utilities, 5200.0, CostFrequency::Annually);
        let totals = compute_totals(&plan);
        assert_eq!(totals.total_rent_cost, 1000.0);
        assert_eq!(totals.total_transportation_cost, 140.0);
        assert_eq!(totals.total_groceries_cost, 100.0);
        assert_eq!(totals.total_utilities_cost, 200.0);
        assert_eq!(totals.total_living_expenses, 1440.0);
    }

    #[test]
    fn invalid_line_items_are_skipped_not_subtracted() {
        let items = vec![
            LineItem::new("Deposit", -5.0),
            LineItem::new("Broken", f64::NAN),
            LineItem::new("Housing", 50.0),
        ];
        assert_eq!(sum_amounts(&items), 50.0);
    }

    #[test]
    fn disposable_income_may_go_negative() {
        let mut plan = Plan::default()
            .with_salary(100.0, SalaryFrequency::Weekly)
            .with_weeks(4)
            .with_living_cost(LivingCost::Rent, 2000.0, CostFrequency::Monthly);
        plan.stipends.push(LineItem::new("Relocation", 50.0));
        plan.fees.push(LineItem::new("Visa", 300.0));
        let totals = compute_totals(&plan);
        assert!(totals.total_disposable_income < 0.0);
        assert!(totals.is_over_budget());
        assert_close(
            totals.total_disposable_income,
            400.0 + 50.0 - 300.0 - totals.total_rent_cost,
        );
    }

    #[test]
    fn overflowing_figures_stay_finite() {
        let mut plan = Plan::default()
            .with_salary(1e308, SalaryFrequency::Hourly)
            .with_weeks(10)
            .with_living_cost(LivingCost::Rent, 1e308, CostFrequency::Daily);
        plan.stipends = vec![LineItem::new("A", 1e308), LineItem::new("B", 1e308)];
        plan.goals = vec!["Travel".into()];

        let totals = compute_totals(&plan);
        for figure in totals_bits(&totals).into_iter().map(f64::from_bits) {
            assert!(figure.is_finite(), "non-finite figure {figure}");
        }
        assert_eq!(totals.total_income, 0.0);
        assert_eq!(totals.total_reimbursements, 0.0);
        assert_eq!(totals.total_rent_cost, 0.0);
        assert_eq!(totals.total_disposable_income, 0.0);
    }

    #[test]
    fn suggested_per_goal_splits_a_fifth_of_disposable_income() {
        let mut plan = Plan::default()
            .with_salary(1000.0, SalaryFrequency::Weekly)
            .with_weeks(10);
        plan.goals = vec!["Travel".into(), "Emergency".into()];
        assert_close(compute_totals(&plan).suggested_per_goal, 1000.0);
    }

    #[test]
    fn compute_totals_is_idempotent() {
        let plan = Plan::default()
            .with_salary(31.7, SalaryFrequency::Hourly)
            .with_weeks(13)
            .with_living_cost(LivingCost::Groceries, 77.3, CostFrequency::Monthly);
        let first = compute_totals(&plan);
        let second = compute_totals(&plan);
        assert_eq!(
            totals_bits(&first),
            totals_bits(&second),
            "totals must be bit-identical"
        );
    }

    fn totals_bits(totals: &Totals) -> Vec<u64> {
        vec![
            totals.total_income.to_bits(),
            totals.total_reimbursements.to_bits(),
            totals.total_fees.to_bits(),
            totals.total_rent_cost.to_bits(),
            totals.total_transportation_cost.to_bits(),
            totals.total_groceries_cost.to_bits(),
            totals.total_utilities_cost.to_bits(),
            totals.total_living_expenses.to_bits(),
            totals.total_disposable_income.to_bits(),
            totals.suggested_per_goal.to_bits(),
        ]
    }

    #[test]
    fn budget_availability_scales_weekly_disposable_income() {
        assert_eq!(budget_available_per_timeframe(1000.0, 10, 4), 400.0);
        assert_eq!(budget_available_per_timeframe(1000.0, 0, 4), 0.0);
    }

    #[test]
    fn exact_allocation_leaves_zero_remaining() {
        let remaining = remaining_budget(100.0, [60.0, 40.0]);
        assert_eq!(remaining, 0.0);
        assert!(remaining >= 0.0);
        assert!(remaining_budget(100.0, [60.0, 40.5]) < 0.0);
    }
}
