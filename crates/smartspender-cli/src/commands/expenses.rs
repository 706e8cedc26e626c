//! Expense command implementations

use anyhow::{anyhow, Result};
use smartspender_core::models::{Category, Expense, ExpenseUpdate, NewExpense};

use super::{parse_date_arg, truncate};
use crate::client::ApiClient;

fn parse_category_arg(s: &str) -> Result<Category> {
    s.parse::<Category>().map_err(|e| anyhow!(e))
}

pub(crate) fn format_expense_row(expense: &Expense) -> String {
    format!(
        "   {:>5}  {}  {:<13} {:>10.2}  {}",
        expense.id,
        expense.date.format("%Y-%m-%d"),
        expense.category.as_str(),
        expense.amount,
        truncate(&expense.description, 40)
    )
}

pub async fn cmd_expenses_list(client: &ApiClient, limit: usize) -> Result<()> {
    let expenses = client.list_expenses().await?;

    if expenses.is_empty() {
        println!("No expenses recorded yet. Add one with: smartspender expenses add 12.50 Food");
        return Ok(());
    }

    println!("💸 Expenses (newest first)");
    println!("   ─────────────────────────────────────────────────────────────");
    for expense in expenses.iter().take(limit) {
        println!("{}", format_expense_row(expense));
    }
    if expenses.len() > limit {
        println!("   ... and {} more (use --limit)", expenses.len() - limit);
    }
    Ok(())
}

pub async fn cmd_expenses_add(
    client: &ApiClient,
    amount: f64,
    category: &str,
    description: Option<&str>,
    date: Option<&str>,
) -> Result<Expense> {
    let new = NewExpense {
        amount,
        category: parse_category_arg(category)?,
        description: description.map(String::from),
        date: date.map(parse_date_arg).transpose()?,
    };
    new.validate()?;

    let expense = client.create_expense(&new).await?;
    println!("✅ Added expense #{}", expense.id);
    println!("{}", format_expense_row(&expense));
    Ok(expense)
}

pub async fn cmd_expenses_update(
    client: &ApiClient,
    id: i64,
    amount: Option<f64>,
    category: Option<&str>,
    description: Option<&str>,
    date: Option<&str>,
) -> Result<Expense> {
    let update = ExpenseUpdate {
        amount,
        category: category.map(parse_category_arg).transpose()?,
        description: description.map(String::from),
        date: date.map(parse_date_arg).transpose()?,
    };
    if update.is_empty() {
        anyhow::bail!("Nothing to update; pass --amount, --category, --description or --date");
    }
    update.validate()?;

    let expense = client.update_expense(id, &update).await?;
    println!("✅ Updated expense #{}", expense.id);
    println!("{}", format_expense_row(&expense));
    Ok(expense)
}

pub async fn cmd_expenses_delete(client: &ApiClient, id: i64) -> Result<()> {
    let message = client.delete_expense(id).await?;
    println!("🗑️  {}", message);
    Ok(())
}
