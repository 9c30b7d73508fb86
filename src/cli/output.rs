//! Output formatting module
//!
//! This module handles formatting validation results for different output formats.

use crate::Result;
use crate::payment::{PaymentResult, PaymentState};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// One validation outcome, as printed by the CLI
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub transaction_hash: String,
    pub expected_amount: Decimal,
    pub state: PaymentState,
    pub message: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl ValidationReport {
    pub fn new(transaction_hash: &str, expected_amount: Decimal, result: PaymentResult) -> Self {
        Self {
            transaction_hash: transaction_hash.to_string(),
            expected_amount,
            state: result.state,
            message: result.message,
            checked_at: Utc::now(),
        }
    }
}

/// Output a report as a single JSON line
pub fn output_json(w: &mut impl std::io::Write, report: &ValidationReport) -> Result<()> {
    serde_json::to_writer(&mut *w, report)?;
    writeln!(w)?;
    Ok(())
}

/// Output a report as text table
pub fn output_table(w: &mut impl std::io::Write, report: &ValidationReport) -> Result<()> {
    let hash_short = if report.transaction_hash.len() > 20 {
        format!("{}...", &report.transaction_hash[..17])
    } else {
        report.transaction_hash.clone()
    };

    writeln!(w, "{:-<80}", "")?;
    writeln!(
        w,
        "{:<20} {:>14} {:<10} {}",
        "TX Hash", "Expected NIM", "State", "Message"
    )?;
    writeln!(w, "{:-<80}", "")?;
    writeln!(
        w,
        "{:<20} {:>14} {:<10} {}",
        hash_short,
        report.expected_amount,
        report.state,
        report.message.as_deref().unwrap_or("-")
    )?;
    writeln!(
        w,
        "Checked at {}",
        report.checked_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;

    Ok(())
}
