//! Receipt reconciliation CLI command

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::debug;

use slipstream_core::{
    AdjustmentType, LedgerClient, Receipt, ReconcileOutcome, Reconciler, SplitInfo,
};

/// Read a parsed-receipt JSON file and post it against an account
pub async fn cmd_reconcile(
    client: &LedgerClient,
    account: &str,
    receipt_path: &Path,
    as_of: Option<&str>,
    json: bool,
) -> Result<()> {
    let raw = fs::read_to_string(receipt_path)
        .with_context(|| format!("reading {}", receipt_path.display()))?;
    let receipt: Receipt = serde_json::from_str(&raw).context("parsing receipt JSON")?;
    debug!(merchant = %receipt.merchant, total = receipt.total_amount, "loaded receipt");

    let reconciler = Reconciler::new(client);
    let outcome = match as_of {
        Some(raw_date) => {
            let today = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
                .context("invalid --as-of date, expected YYYY-MM-DD")?;
            reconciler.reconcile_as_of(account, &receipt, today).await?
        }
        None => reconciler.reconcile(account, &receipt).await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!(
        "✓ Transaction created for {} (${:.2})",
        receipt.merchant, receipt.total_amount
    );
    print!("{}", outcome_feedback(&outcome, &receipt));
    Ok(())
}

/// Human-readable summary of what the reconciliation actually did
fn outcome_feedback(outcome: &ReconcileOutcome, receipt: &Receipt) -> String {
    let mut feedback = String::new();

    if let Some(info) = &outcome.split_info {
        feedback.push_str(&split_feedback(info, receipt));
    }
    if let Some(adjustment) = &outcome.date_adjustment {
        feedback.push_str(&format!(
            "• Date adjusted from {} to {} ({})\n",
            adjustment.original_date, adjustment.adjusted_date, adjustment.reason
        ));
    }
    feedback
}

fn split_feedback(info: &SplitInfo, receipt: &Receipt) -> String {
    let mut out = String::new();
    if !info.attempted {
        return out;
    }

    if info.successful {
        out.push_str(&format!("• Split across {} categories\n", info.split_count));
        if let Some(tax) = info.tax_distributed.filter(|t| *t > 0.0) {
            out.push_str(&format!("• Tax distributed: ${:.2}\n", tax));
        }
        if let Some(adjustment) = info.adjustment_applied.filter(|a| a.abs() > 0.0) {
            let kind = match info.adjustment_type {
                Some(AdjustmentType::Tolerance) => "tolerance adjustment",
                Some(AdjustmentType::ProportionalAdjustment) => "proportional adjustment",
                Some(AdjustmentType::TaxDistribution) => "with tax distribution",
                None => "adjustment",
            };
            let sign = if adjustment >= 0.0 { "+" } else { "" };
            out.push_str(&format!("• {}: {}${:.2}\n", kind, sign, adjustment));
        }
        if let Some(breakdown) = &info.detailed_breakdown {
            out.push_str(&format!(
                "• Split breakdown: Items ${:.2}",
                breakdown.original_split_total
            ));
            if breakdown.tax_amount > 0.0 {
                out.push_str(&format!(" + Tax ${:.2}", breakdown.tax_amount));
            }
            if breakdown.final_adjustment.abs() > 0.0 {
                out.push_str(&format!(" + Adj ${:.2}", breakdown.final_adjustment));
            }
            out.push_str(&format!(" = ${:.2}\n", receipt.total_amount));
        }
    } else {
        out.push_str("• ⚠️ Split transaction attempted but failed.\n");
        out.push_str(&format!(
            "• Expected total: ${:.2}, Split total: ${:.2}\n",
            info.expected_amount, info.total_split_amount
        ));
        if let Some(reason) = &info.reason {
            out.push_str(&format!("• {}\n", reason));
        }
        out.push_str(&format!(
            "• Transaction created as single entry in \"{}\" instead\n",
            receipt.category
        ));
    }
    out
}
