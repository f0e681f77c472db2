mod common;

use common::setup_test_env;
use sunny_savings::{
    BudgetAllocation, CostFrequency, LineItem, LivingCost, LivingCostEntry, OfferDetails,
    PlanManager, PlanStatus, SalaryFrequency, SavingsError,
};

fn internship_offer() -> OfferDetails {
    OfferDetails {
        company: "Acme Robotics".into(),
        location: "Pittsburgh".into(),
        salary: 25.0,
        salary_frequency: Some(SalaryFrequency::Hourly),
        weeks: 12,
        hours_per_week: None,
        living_costs: vec![
            LivingCostEntry {
                kind: LivingCost::Rent,
                amount: 1040.0,
                frequency: CostFrequency::Monthly,
            },
            LivingCostEntry {
                kind: LivingCost::Transportation,
                amount: 10.0,
                frequency: CostFrequency::Daily,
            },
        ],
    }
}

#[test]
fn wizard_steps_complete_a_plan() {
    let (mut manager, _, _) = setup_test_env();

    let id = manager.create_plan("Summer 2025", "").expect("create plan");
    assert_eq!(manager.status(id).unwrap(), PlanStatus::Draft);

    manager.set_offer_details(id, internship_offer()).expect("offer");
    manager
        .set_line_items(
            id,
            vec![LineItem::new("Relocation stipend", 1500.0)],
            vec![LineItem::new("Background check", 60.0)],
        )
        .expect("line items");
    assert_eq!(manager.status(id).unwrap(), PlanStatus::OfferOnly);

    let goals = manager
        .set_goals(id, &["Travel", "Emergency"], &["Emergency", ""])
        .expect("goals");
    assert_eq!(goals, vec!["Travel", "Emergency"]);

    manager
        .set_categories(id, &["Emergency", "Travel", "Concert tickets"], 2)
        .expect("categories");
    let check = manager
        .save_budgets(
            id,
            vec![
                BudgetAllocation::new("Emergency", 300.0),
                BudgetAllocation::new("Travel", 200.0),
            ],
        )
        .expect("budgets");
    assert!(!check.over_budget);
    assert_eq!(manager.status(id).unwrap(), PlanStatus::Complete);

    // 25 * 40 * 12 = 12,000; rent 1040 * 12 / 52 = 240/week; transport 70/week.
    let totals = manager.totals(id).unwrap();
    assert_eq!(totals.total_income, 12_000.0);
    assert_eq!(totals.total_rent_cost, 2_880.0);
    assert_eq!(totals.total_transportation_cost, 840.0);
    assert_eq!(totals.total_disposable_income, 12_000.0 + 1_500.0 - 60.0 - 3_720.0);
    assert!((totals.suggested_per_goal - 972.0).abs() < 1e-9);

    let plan = manager.plan(id).unwrap();
    assert_eq!(plan.display_label(), "Acme Robotics");
    assert_eq!(plan.budget_timeframe_in_weeks, 2);
}

#[test]
fn over_budget_allocations_are_refused() {
    let (mut manager, _, _) = setup_test_env();
    let id = manager.create_plan("", "Tight Budget LLC").unwrap();
    manager.set_offer_details(id, internship_offer()).unwrap();

    let available = manager
        .check_budgets(id, &[])
        .expect("preview")
        .available;
    let err = manager
        .save_budgets(id, vec![BudgetAllocation::new("Travel", available + 50.0)])
        .expect_err("over budget");
    match err {
        SavingsError::OverBudget { over_by } => assert!((over_by - 50.0).abs() < 1e-6),
        other => panic!("unexpected error: {other}"),
    }
    assert!(manager.plan(id).unwrap().budgets.is_empty());
    assert_eq!(manager.status(id).unwrap(), PlanStatus::OfferOnly);
}

#[test]
fn savings_progress_reaches_the_goal() {
    let (mut manager, _, _) = setup_test_env();
    let id = manager.create_plan("Goals", "Acme").unwrap();
    manager.set_offer_details(id, internship_offer()).unwrap();
    manager
        .save_budgets(id, vec![BudgetAllocation::new("Travel", 400.0)])
        .unwrap();

    let first = manager.record_savings(id, "Travel", 150.0).unwrap();
    assert_eq!(
        first.message(),
        "Added $150.00 to Travel. Keep up the great saving!"
    );
    let progress = manager.progress(id).unwrap();
    assert_eq!(progress[0].percent(), 38);

    let done = manager.record_savings(id, "Travel", 250.0).unwrap();
    assert_eq!(
        done.message(),
        "Congrats! You completed your savings goal for Travel!"
    );
    assert!(manager.progress(id).unwrap()[0].completed);

    assert!(matches!(
        manager.record_savings(id, "Pets", 10.0),
        Err(SavingsError::CategoryNotFound(_))
    ));
    assert!(matches!(
        manager.record_savings(id, "Travel", -1.0),
        Err(SavingsError::InvalidInput(_))
    ));
}

#[test]
fn plans_compare_on_disposable_income() {
    let mut manager = PlanManager::in_memory();
    let acme = manager.create_plan("", "Acme").unwrap();
    manager.set_offer_details(acme, internship_offer()).unwrap();

    let globex = manager.create_plan("", "Globex").unwrap();
    let mut richer = internship_offer();
    richer.company = "Globex".into();
    richer.salary = 30.0;
    manager.set_offer_details(globex, richer).unwrap();

    let comparison = manager.compare(acme, globex).unwrap();
    assert_eq!(comparison.left.label, "Acme");
    assert_eq!(comparison.disposable_difference, -2_400.0);
    assert_eq!(
        comparison.better().map(|snapshot| snapshot.id),
        Some(globex)
    );
}

#[test]
fn blank_plans_cannot_be_created() {
    let mut manager = PlanManager::in_memory();
    assert!(matches!(
        manager.create_plan("  ", ""),
        Err(SavingsError::InvalidInput(_))
    ));
    assert!(manager.plans().is_empty());
}

#[test]
fn deleting_the_latest_plan_moves_focus_back() {
    let mut manager = PlanManager::in_memory();
    let first = manager.create_plan("First", "").unwrap();
    let second = manager.create_plan("Second", "").unwrap();
    assert_eq!(manager.latest().map(|plan| plan.id), Some(second));

    let removed = manager.delete_plan(second).unwrap();
    assert_eq!(removed.name, "Second");
    assert_eq!(manager.latest().map(|plan| plan.id), Some(first));
}
