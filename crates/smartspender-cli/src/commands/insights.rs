//! Stats and AI insight commands

use anyhow::Result;
use serde_json::Value;
use smartspender_core::analytics::Stats;
use smartspender_core::insights::InsightKind;

use crate::client::{ApiClient, InsightReply};

pub(crate) fn format_stats(stats: &Stats) -> Vec<String> {
    let mut lines = vec![
        format!("   Expenses: {}", stats.count),
        format!("   Total:    {:.2}", stats.total),
    ];

    if !stats.by_category.is_empty() {
        lines.push(String::new());
        lines.push("   By category".to_string());
        for (category, amount) in &stats.by_category {
            lines.push(format!("     {:<13} {:>10.2}", category.as_str(), amount));
        }
    }

    if !stats.by_month.is_empty() {
        lines.push(String::new());
        lines.push("   By month".to_string());
        for (month, amount) in &stats.by_month {
            lines.push(format!("     {:<13} {:>10.2}", month, amount));
        }
    }

    lines
}

pub async fn cmd_stats(client: &ApiClient) -> Result<()> {
    let stats = client.stats().await?;

    println!("📊 Spending Summary");
    println!("   ─────────────────────────────");
    for line in format_stats(&stats) {
        println!("{}", line);
    }
    Ok(())
}

fn title(kind: InsightKind) -> &'static str {
    match kind {
        InsightKind::BudgetPrediction => "🔮 Budget Prediction",
        InsightKind::SpendingPatterns => "🧩 Spending Patterns",
        InsightKind::Anomalies => "🚨 Unusual Expenses",
    }
}

/// Render a local fallback result
pub(crate) fn format_fallback(kind: InsightKind, fallback: &Value) -> Vec<String> {
    let mut lines = Vec::new();
    match kind {
        InsightKind::BudgetPrediction => {
            let budget = fallback["predictedMonthlyBudget"].as_f64().unwrap_or(0.0);
            let confidence = fallback["confidence"].as_f64().unwrap_or(0.0);
            lines.push(format!("   Predicted monthly budget: {:.2}", budget));
            lines.push(format!("   Confidence: {:.0}%", confidence * 100.0));
        }
        InsightKind::SpendingPatterns => {
            for cluster in fallback["clusters"].as_array().into_iter().flatten() {
                lines.push(format!(
                    "   {:<13} total {:>10.2}  avg {:>8.2}",
                    cluster["category"].as_str().unwrap_or("?"),
                    cluster["totalAmount"].as_f64().unwrap_or(0.0),
                    cluster["averageAmount"].as_f64().unwrap_or(0.0),
                ));
            }
        }
        InsightKind::Anomalies => {
            let anomalies = fallback["anomalies"].as_array().cloned().unwrap_or_default();
            if anomalies.is_empty() {
                lines.push("   No unusual expenses found".to_string());
            }
            for anomaly in &anomalies {
                lines.push(format!(
                    "   {}  {:<13} {:>10.2}  {}",
                    anomaly["date"].as_str().unwrap_or("?"),
                    anomaly["category"].as_str().unwrap_or("?"),
                    anomaly["amount"].as_f64().unwrap_or(0.0),
                    anomaly["reason"].as_str().unwrap_or(""),
                ));
            }
        }
    }
    lines
}

pub async fn cmd_insights(client: &ApiClient, kind: InsightKind) -> Result<InsightReply> {
    let reply = client.insight(kind).await?;

    println!("{}", title(kind));
    println!("   ─────────────────────────────");
    match &reply {
        InsightReply::NotEnoughData(message) => {
            println!("   ℹ️  {}", message);
        }
        InsightReply::Remote(payload) => {
            println!("   🤖 From AI service");
            println!("{}", serde_json::to_string_pretty(payload)?);
        }
        InsightReply::Fallback(fallback) => {
            println!("   ⚠️  AI service unavailable, showing local analysis");
            for line in format_fallback(kind, fallback) {
                println!("{}", line);
            }
        }
    }
    Ok(reply)
}
