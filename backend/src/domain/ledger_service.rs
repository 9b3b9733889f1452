//! Personal ledger: transactions, monthly budgets, savings goals and the
//! dashboard summary built from them.
//!
//! Every operation is scoped to an owner. Records belonging to someone else
//! are reported as missing, never as forbidden, so identifiers cannot be
//! enumerated.

use std::collections::BTreeMap;
use std::sync::Arc;

use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{
    BudgetRepository, GoalRepository, LedgerPersistenceError, TransactionRepository,
};
use crate::domain::{
    Balance, Budget, BudgetId, BudgetMonth, BudgetUsage, Category, Error, Goal, GoalDraft, GoalId,
    Money, Transaction, TransactionDraft, TransactionFilter, TransactionId, TransactionKind,
    UserId,
};

/// Driven ports required by [`LedgerService`].
#[derive(Clone)]
pub struct LedgerPorts {
    /// Transaction storage.
    pub transactions: Arc<dyn TransactionRepository>,
    /// Budget storage.
    pub budgets: Arc<dyn BudgetRepository>,
    /// Goal storage.
    pub goals: Arc<dyn GoalRepository>,
}

/// Validated budget fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetInput {
    /// Category the limit applies to.
    pub category: Category,
    /// Month the limit applies to.
    pub month: BudgetMonth,
    /// Spending limit.
    pub limit: Money,
}

/// Income and expense totals for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthTotals {
    /// Sum of income transactions.
    pub income: Money,
    /// Sum of expense transactions.
    pub expenses: Money,
    /// Income minus expenses.
    pub balance: Balance,
}

/// Expenses recorded in one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySpending {
    /// Category.
    pub category: Category,
    /// Total spent.
    pub amount: Money,
}

/// Monthly overview shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    /// Month summarised.
    pub month: BudgetMonth,
    /// Income, expenses and balance.
    pub totals: MonthTotals,
    /// Spending per category, largest first. Categories without spending are
    /// omitted.
    pub spending: Vec<CategorySpending>,
    /// Each budget for the month with its spending.
    pub budgets: Vec<BudgetUsage>,
}

/// Ledger service backing the transaction, budget, goal and dashboard
/// endpoints.
#[derive(Clone)]
pub struct LedgerService {
    ports: LedgerPorts,
    clock: Arc<dyn Clock>,
}

impl LedgerService {
    /// Create a service over the given ports.
    pub fn new(ports: LedgerPorts, clock: Arc<dyn Clock>) -> Self {
        Self { ports, clock }
    }

    /// Record a transaction for `owner`.
    pub async fn create_transaction(
        &self,
        owner: &UserId,
        draft: TransactionDraft,
    ) -> Result<Transaction, Error> {
        let transaction = Transaction::create(*owner, draft, self.clock.utc());
        self.ports
            .transactions
            .insert(&transaction)
            .await
            .map_err(map_ledger_error)?;
        debug!(user_id = %owner, transaction_id = %transaction.id, "recorded transaction");
        Ok(transaction)
    }

    /// `owner`'s transactions matching `filter`, newest first.
    pub async fn list_transactions(
        &self,
        owner: &UserId,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, Error> {
        if let (Some(from), Some(to)) = (filter.from, filter.to)
            && from > to
        {
            return Err(Error::invalid_request("from must not be after to"));
        }
        self.ports
            .transactions
            .list(owner, filter)
            .await
            .map_err(map_ledger_error)
    }

    /// One of `owner`'s transactions.
    pub async fn transaction(
        &self,
        owner: &UserId,
        id: &TransactionId,
    ) -> Result<Transaction, Error> {
        self.ports
            .transactions
            .find(owner, id)
            .await
            .map_err(map_ledger_error)?
            .ok_or_else(transaction_not_found)
    }

    /// Replace the editable fields of one of `owner`'s transactions.
    pub async fn replace_transaction(
        &self,
        owner: &UserId,
        id: &TransactionId,
        draft: TransactionDraft,
    ) -> Result<Transaction, Error> {
        let mut transaction = self.transaction(owner, id).await?;
        transaction.apply(draft, self.clock.utc());
        self.ports
            .transactions
            .update(&transaction)
            .await
            .map_err(map_ledger_error)?;
        Ok(transaction)
    }

    /// Delete one of `owner`'s transactions.
    pub async fn delete_transaction(&self, owner: &UserId, id: &TransactionId) -> Result<(), Error> {
        let deleted = self
            .ports
            .transactions
            .delete(owner, id)
            .await
            .map_err(map_ledger_error)?;
        if deleted {
            Ok(())
        } else {
            Err(transaction_not_found())
        }
    }

    /// Set the limit for a category and month, replacing any existing one.
    pub async fn upsert_budget(&self, owner: &UserId, input: BudgetInput) -> Result<Budget, Error> {
        let BudgetInput {
            category,
            month,
            limit,
        } = input;
        self.ports
            .budgets
            .upsert(Budget {
                id: BudgetId::random(),
                owner: *owner,
                category,
                month,
                limit,
            })
            .await
            .map_err(map_ledger_error)
    }

    /// `owner`'s budgets, optionally for one month.
    pub async fn list_budgets(
        &self,
        owner: &UserId,
        month: Option<BudgetMonth>,
    ) -> Result<Vec<Budget>, Error> {
        self.ports
            .budgets
            .list(owner, month)
            .await
            .map_err(map_ledger_error)
    }

    /// Delete one of `owner`'s budgets.
    pub async fn delete_budget(&self, owner: &UserId, id: &BudgetId) -> Result<(), Error> {
        let deleted = self
            .ports
            .budgets
            .delete(owner, id)
            .await
            .map_err(map_ledger_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found("budget not found"))
        }
    }

    /// Start a savings goal.
    pub async fn create_goal(&self, owner: &UserId, draft: GoalDraft) -> Result<Goal, Error> {
        let goal = Goal::create(*owner, draft, self.clock.utc());
        self.ports
            .goals
            .save(&goal)
            .await
            .map_err(map_ledger_error)?;
        Ok(goal)
    }

    /// `owner`'s goals, oldest first.
    pub async fn list_goals(&self, owner: &UserId) -> Result<Vec<Goal>, Error> {
        self.ports
            .goals
            .list(owner)
            .await
            .map_err(map_ledger_error)
    }

    /// Add `amount` to a goal's savings.
    pub async fn contribute(
        &self,
        owner: &UserId,
        id: &GoalId,
        amount: Money,
    ) -> Result<Goal, Error> {
        let mut goal = self
            .ports
            .goals
            .find(owner, id)
            .await
            .map_err(map_ledger_error)?
            .ok_or_else(goal_not_found)?;
        goal.contribute(amount);
        self.ports
            .goals
            .save(&goal)
            .await
            .map_err(map_ledger_error)?;
        if goal.is_complete() {
            debug!(user_id = %owner, goal_id = %goal.id, "goal reached");
        }
        Ok(goal)
    }

    /// Delete one of `owner`'s goals.
    pub async fn delete_goal(&self, owner: &UserId, id: &GoalId) -> Result<(), Error> {
        let deleted = self
            .ports
            .goals
            .delete(owner, id)
            .await
            .map_err(map_ledger_error)?;
        if deleted {
            Ok(())
        } else {
            Err(goal_not_found())
        }
    }

    /// Summarise `month`, or the current month when `None`.
    pub async fn dashboard(
        &self,
        owner: &UserId,
        month: Option<BudgetMonth>,
    ) -> Result<DashboardSummary, Error> {
        let month = month.unwrap_or_else(|| BudgetMonth::containing(self.clock.utc().date_naive()));
        let filter = TransactionFilter {
            from: Some(month.first_day()),
            to: Some(month.last_day()),
            ..TransactionFilter::default()
        };
        let transactions = self.list_transactions(owner, &filter).await?;
        let budgets = self.list_budgets(owner, Some(month)).await?;
        Ok(summarise(month, &transactions, budgets))
    }
}

fn summarise(
    month: BudgetMonth,
    transactions: &[Transaction],
    budgets: Vec<Budget>,
) -> DashboardSummary {
    let mut income = Money::ZERO;
    let mut by_category: BTreeMap<Category, Money> = BTreeMap::new();
    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Income => income = income + transaction.amount,
            TransactionKind::Expense => {
                let spent = by_category.entry(transaction.category).or_default();
                *spent = *spent + transaction.amount;
            }
        }
    }
    let expenses: Money = by_category.values().copied().sum();

    let budgets = budgets
        .into_iter()
        .map(|budget| {
            let spent = by_category
                .get(&budget.category)
                .copied()
                .unwrap_or_default();
            BudgetUsage::new(budget, spent)
        })
        .collect();

    let mut spending: Vec<CategorySpending> = by_category
        .into_iter()
        .map(|(category, amount)| CategorySpending { category, amount })
        .collect();
    spending.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.category.cmp(&b.category)));

    DashboardSummary {
        month,
        totals: MonthTotals {
            income,
            expenses,
            balance: Balance::between(income, expenses),
        },
        spending,
        budgets,
    }
}

fn transaction_not_found() -> Error {
    Error::not_found("transaction not found")
}

fn goal_not_found() -> Error {
    Error::not_found("goal not found")
}

fn map_ledger_error(error: LedgerPersistenceError) -> Error {
    match error {
        LedgerPersistenceError::Connection { message } => {
            Error::internal(format!("ledger repository unavailable: {message}"))
        }
        LedgerPersistenceError::Query { message } => {
            Error::internal(format!("ledger repository error: {message}"))
        }
    }
}

#[cfg(test)]
#[path = "ledger_service_tests.rs"]
mod tests;
