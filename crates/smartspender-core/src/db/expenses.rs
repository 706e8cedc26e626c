//! Expense CRUD operations
//!
//! Every query is scoped by `user_id`: a record owned by someone else
//! behaves exactly like a record that does not exist.

use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{parse_date, parse_datetime, Database, DATE_FORMAT};
use crate::error::{Error, Result};
use crate::models::{Category, Expense, ExpenseUpdate, NewExpense, SortOrder};

const EXPENSE_COLUMNS: &str = "id, user_id, amount, category, description, date, created_at";

fn row_to_expense(row: &rusqlite::Row) -> rusqlite::Result<Expense> {
    let category_str: String = row.get(3)?;
    let date_str: String = row.get(5)?;
    let created_at_str: String = row.get(6)?;

    Ok(Expense {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        category: category_str.parse().unwrap_or(Category::Other),
        description: row.get(4)?,
        date: parse_date(&date_str)?,
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Insert a new expense for `user_id`
    pub fn insert_expense(&self, user_id: i64, expense: &NewExpense) -> Result<Expense> {
        expense.validate()?;

        let date = expense.date.unwrap_or_else(|| Utc::now().date_naive());
        let description = expense.description.as_deref().unwrap_or("").trim();

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO expenses (user_id, amount, category, description, date)
             VALUES (?, ?, ?, ?, ?)",
            params![
                user_id,
                expense.amount,
                expense.category.as_str(),
                description,
                date.format(DATE_FORMAT).to_string(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(user_id, id, "Inserted expense");

        self.get_expense(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("expense {}", id)))
    }

    /// Get an expense by ID, only if owned by `user_id`
    pub fn get_expense(&self, user_id: i64, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let expense = conn
            .query_row(
                &format!(
                    "SELECT {} FROM expenses WHERE id = ? AND user_id = ?",
                    EXPENSE_COLUMNS
                ),
                params![id, user_id],
                row_to_expense,
            )
            .optional()?;
        Ok(expense)
    }

    /// List all of a user's expenses ordered by date
    ///
    /// Ties on date are broken by insertion order in the same direction.
    pub fn list_expenses(&self, user_id: i64, order: SortOrder) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {cols} FROM expenses WHERE user_id = ? ORDER BY date {dir}, id {dir}",
            cols = EXPENSE_COLUMNS,
            dir = order.as_sql()
        );
        let mut stmt = conn.prepare(&sql)?;

        let expenses = stmt
            .query_map(params![user_id], row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// Apply a partial update; returns `None` if the expense is not the user's
    pub fn update_expense(
        &self,
        user_id: i64,
        id: i64,
        update: &ExpenseUpdate,
    ) -> Result<Option<Expense>> {
        update.validate()?;

        let Some(existing) = self.get_expense(user_id, id)? else {
            return Ok(None);
        };
        if update.is_empty() {
            return Ok(Some(existing));
        }

        let updated = update.apply(&existing);
        let conn = self.conn()?;
        conn.execute(
            "UPDATE expenses SET amount = ?, category = ?, description = ?, date = ?
             WHERE id = ? AND user_id = ?",
            params![
                updated.amount,
                updated.category.as_str(),
                updated.description.trim(),
                updated.date.format(DATE_FORMAT).to_string(),
                id,
                user_id,
            ],
        )?;
        debug!(user_id, id, "Updated expense");

        self.get_expense(user_id, id)
    }

    /// Delete an expense; returns false if it was not the user's
    pub fn delete_expense(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM expenses WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(deleted > 0)
    }

    #[cfg(test)]
    pub(crate) fn count_expenses(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM expenses WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
