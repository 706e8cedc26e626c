//! Export command implementation

use std::path::Path;

use anyhow::{Context, Result};
use smartspender_core::export::{write_expenses_csv, ExpenseExportOptions};

use super::parse_date_arg;
use crate::client::ApiClient;

pub async fn cmd_export(
    client: &ApiClient,
    output: &Path,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<usize> {
    let opts = ExpenseExportOptions {
        from: from.map(parse_date_arg).transpose()?,
        to: to.map(parse_date_arg).transpose()?,
    };

    let expenses = client.list_expenses().await?;

    let file = std::fs::File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let written = write_expenses_csv(file, &expenses, &opts).context("Failed to write CSV")?;

    println!("📤 Exported {} expenses to {}", written, output.display());
    Ok(written)
}
