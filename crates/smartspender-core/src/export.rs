//! CSV export of expenses
//!
//! Works on already-fetched records, so the same code serves a local
//! database and expenses downloaded from the API.

use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::Result;
use crate::models::Expense;

/// Options for expense export
#[derive(Debug, Clone, Default)]
pub struct ExpenseExportOptions {
    /// Start date filter (inclusive)
    pub from: Option<NaiveDate>,
    /// End date filter (inclusive)
    pub to: Option<NaiveDate>,
}

impl ExpenseExportOptions {
    fn includes(&self, expense: &Expense) -> bool {
        self.from.map_or(true, |from| expense.date >= from)
            && self.to.map_or(true, |to| expense.date <= to)
    }
}

/// One CSV row
#[derive(Debug, Serialize)]
struct ExpenseRow<'a> {
    date: String,
    category: &'a str,
    amount: String,
    description: &'a str,
}

/// Write expenses as CSV (`date,category,amount,description`), in the given order
///
/// Returns the number of rows written.
pub fn write_expenses_csv<W: Write>(
    writer: W,
    expenses: &[Expense],
    opts: &ExpenseExportOptions,
) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    let mut written = 0;

    // Header is written even for an empty export
    wtr.write_record(["date", "category", "amount", "description"])?;

    for expense in expenses.iter().filter(|e| opts.includes(e)) {
        wtr.serialize(ExpenseRow {
            date: expense.date.format("%Y-%m-%d").to_string(),
            category: expense.category.as_str(),
            amount: format!("{:.2}", expense.amount),
            description: &expense.description,
        })?;
        written += 1;
    }

    wtr.flush()?;
    Ok(written)
}

#[cfg(test)]
fn expenses_to_csv(expenses: &[Expense], opts: &ExpenseExportOptions) -> Result<String> {
    let mut buf = Vec::new();
    write_expenses_csv(&mut buf, expenses, opts)?;
    String::from_utf8(buf).map_err(|e| crate::error::Error::InvalidData(e.to_string()))
}
