//! Tests for the ledger service.

use chrono::NaiveDate;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::test_support::TestServices;

fn money(raw: &str) -> Money {
    Money::parse(raw).expect("amount")
}

fn day(raw: &str) -> NaiveDate {
    raw.parse().expect("date")
}

fn draft(title: &str, amount: &str, kind: TransactionKind, category: Category, date: &str) -> TransactionDraft {
    TransactionDraft {
        title: title.to_owned(),
        amount: money(amount),
        kind,
        category,
        date: day(date),
        vendor: None,
        description: None,
    }
}

#[fixture]
fn services() -> TestServices {
    TestServices::new()
}

#[rstest]
#[tokio::test]
async fn transactions_list_newest_first_with_filters(services: TestServices) {
    let owner = UserId::random();
    let ledger = &services.ledger;
    for (title, category, date) in [
        ("Groceries", Category::Food, "2026-03-02"),
        ("Bus pass", Category::Transport, "2026-03-10"),
        ("Dinner", Category::Food, "2026-03-12"),
    ] {
        ledger
            .create_transaction(&owner, draft(title, "10", TransactionKind::Expense, category, date))
            .await
            .expect("create");
    }

    let all = ledger
        .list_transactions(&owner, &TransactionFilter::default())
        .await
        .expect("list");
    let titles: Vec<&str> = all.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["Dinner", "Bus pass", "Groceries"]);

    let food_after_fifth = ledger
        .list_transactions(
            &owner,
            &TransactionFilter {
                category: Some(Category::Food),
                from: Some(day("2026-03-05")),
                ..TransactionFilter::default()
            },
        )
        .await
        .expect("filtered");
    assert_eq!(food_after_fifth.len(), 1);
    assert_eq!(food_after_fifth[0].title, "Dinner");
}

#[rstest]
#[tokio::test]
async fn inverted_date_range_is_rejected(services: TestServices) {
    let err = services
        .ledger
        .list_transactions(
            &UserId::random(),
            &TransactionFilter {
                from: Some(day("2026-03-10")),
                to: Some(day("2026-03-01")),
                ..TransactionFilter::default()
            },
        )
        .await
        .expect_err("inverted");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn other_owners_see_not_found(services: TestServices) {
    let (owner, intruder) = (UserId::random(), UserId::random());
    let ledger = &services.ledger;
    let created = ledger
        .create_transaction(
            &owner,
            draft("Rent", "900", TransactionKind::Expense, Category::Housing, "2026-03-01"),
        )
        .await
        .expect("create");

    let read = ledger
        .transaction(&intruder, &created.id)
        .await
        .expect_err("hidden");
    assert_eq!(read.code(), ErrorCode::NotFound);

    let replace = ledger
        .replace_transaction(
            &intruder,
            &created.id,
            draft("Mine now", "1", TransactionKind::Income, Category::Other, "2026-03-01"),
        )
        .await
        .expect_err("hidden");
    assert_eq!(replace.code(), ErrorCode::NotFound);

    let delete = ledger
        .delete_transaction(&intruder, &created.id)
        .await
        .expect_err("hidden");
    assert_eq!(delete.code(), ErrorCode::NotFound);

    let still_there = ledger.transaction(&owner, &created.id).await.expect("owner");
    assert_eq!(still_there.title, "Rent");
}

#[rstest]
#[tokio::test]
async fn replace_updates_fields_and_timestamp(services: TestServices) {
    let owner = UserId::random();
    let ledger = &services.ledger;
    let created = ledger
        .create_transaction(
            &owner,
            draft("Coffee", "3.20", TransactionKind::Expense, Category::Food, "2026-03-13"),
        )
        .await
        .expect("create");

    services.clock.advance(chrono::TimeDelta::minutes(5));
    let replaced = ledger
        .replace_transaction(
            &owner,
            &created.id,
            draft("Coffee beans", "14", TransactionKind::Expense, Category::Shopping, "2026-03-13"),
        )
        .await
        .expect("replace");

    assert_eq!(replaced.id, created.id);
    assert_eq!(replaced.category, Category::Shopping);
    assert_eq!(replaced.created_at, created.created_at);
    assert!(replaced.updated_at > created.updated_at);
}

#[rstest]
#[tokio::test]
async fn goals_accumulate_contributions(services: TestServices) {
    let owner = UserId::random();
    let ledger = &services.ledger;
    let goal = ledger
        .create_goal(
            &owner,
            GoalDraft {
                name: "Bike".to_owned(),
                target: money("500"),
                deadline: None,
            },
        )
        .await
        .expect("create");

    ledger.contribute(&owner, &goal.id, money("200")).await.expect("first");
    let goal = ledger.contribute(&owner, &goal.id, money("300")).await.expect("second");

    assert_eq!(goal.saved, money("500"));
    assert!(goal.is_complete());
    let foreign = ledger
        .contribute(&UserId::random(), &goal.id, money("1"))
        .await
        .expect_err("not theirs");
    assert_eq!(foreign.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn deleting_twice_reports_not_found(services: TestServices) {
    let owner = UserId::random();
    let budget = services
        .ledger
        .upsert_budget(
            &owner,
            BudgetInput {
                category: Category::Food,
                month: "2026-03".parse().expect("month"),
                limit: money("300"),
            },
        )
        .await
        .expect("upsert");

    services.ledger.delete_budget(&owner, &budget.id).await.expect("delete");
    let err = services
        .ledger
        .delete_budget(&owner, &budget.id)
        .await
        .expect_err("gone");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn dashboard_defaults_to_current_month(services: TestServices) {
    let owner = UserId::random();
    let ledger = &services.ledger;
    let entries = [
        ("Salary", "3000", TransactionKind::Income, Category::Salary, "2026-03-01"),
        ("Rent", "1200", TransactionKind::Expense, Category::Housing, "2026-03-01"),
        ("Groceries", "150.25", TransactionKind::Expense, Category::Food, "2026-03-05"),
        ("Restaurant", "80", TransactionKind::Expense, Category::Food, "2026-03-09"),
        ("Last month", "999", TransactionKind::Expense, Category::Food, "2026-02-27"),
    ];
    for (title, amount, kind, category, date) in entries {
        ledger
            .create_transaction(&owner, draft(title, amount, kind, category, date))
            .await
            .expect("create");
    }
    ledger
        .upsert_budget(
            &owner,
            BudgetInput {
                category: Category::Food,
                month: "2026-03".parse().expect("month"),
                limit: money("200"),
            },
        )
        .await
        .expect("budget");

    let summary = ledger.dashboard(&owner, None).await.expect("dashboard");

    assert_eq!(summary.month.to_string(), "2026-03");
    assert_eq!(summary.totals.income, money("3000"));
    assert_eq!(summary.totals.expenses, money("1430.25"));
    assert_eq!(summary.totals.balance.to_string(), "1569.75");
    assert_eq!(
        summary.spending,
        [
            CategorySpending {
                category: Category::Housing,
                amount: money("1200"),
            },
            CategorySpending {
                category: Category::Food,
                amount: money("230.25"),
            },
        ]
    );
    let food = &summary.budgets[0];
    assert_eq!(food.spent, money("230.25"));
    assert_eq!(food.remaining, Money::ZERO);
    assert!(food.over_budget);
}

#[rstest]
#[tokio::test]
async fn dashboard_for_empty_month_is_zeroed(services: TestServices) {
    let summary = services
        .ledger
        .dashboard(&UserId::random(), Some("2025-12".parse().expect("month")))
        .await
        .expect("dashboard");

    assert_eq!(summary.totals.income, Money::ZERO);
    assert_eq!(summary.totals.balance.cents(), 0);
    assert!(summary.spending.is_empty());
    assert!(summary.budgets.is_empty());
}
