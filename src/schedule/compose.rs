//! Benefit composition: calculator outputs to long-form schedule rows
//!
//! Two rules live here. The null-recoding rule: a benefit of exactly zero at
//! positive earnings means "not applicable" and becomes null, so plotted
//! curves break instead of hugging the axis; at zero earnings an explicit
//! zero is a legitimate amount and is preserved. The Young Child Tax Credit
//! rule: a year-gated three-piece function of earnings (flat, linear
//! phase-out, null) computed from policy parameters rather than calculator
//! output.

use serde::{Deserialize, Serialize};

use crate::calculator::CalculatorResult;

use super::BenefitRow;

/// Young Child Tax Credit policy parameters.
///
/// Defaults match the 2019 CalEITC expansion: $1,000 flat below $25,000,
/// phased out at 20 cents per dollar, exhausted at $30,000.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YctcPolicy {
    /// First tax year the credit exists
    pub start_year: u16,
    pub flat_amount: f64,
    pub phase_out_start: u32,
    pub phase_out_end: u32,
    /// Reduction per dollar of earnings past the phase-out start
    pub phase_out_rate: f64,
}

impl Default for YctcPolicy {
    fn default() -> Self {
        Self {
            start_year: 2019,
            flat_amount: 1_000.0,
            phase_out_start: 25_000,
            phase_out_end: 30_000,
            phase_out_rate: 0.20,
        }
    }
}

impl YctcPolicy {
    /// Raw credit amount before null-recoding.
    ///
    /// `None` means not applicable: pre-policy year, no qualifying child,
    /// no positive state EITC, or earnings past the phase-out end. The
    /// phase-out-end boundary itself yields `Some(0.0)`, which the
    /// null-recoding rule then turns into null at positive earnings.
    pub fn amount(
        &self,
        year: u16,
        earnings: u32,
        dependent_count: u8,
        state_eitc: Option<f64>,
    ) -> Option<f64> {
        if year < self.start_year || dependent_count == 0 {
            return None;
        }
        if !state_eitc.is_some_and(|v| v > 0.0) {
            return None;
        }
        if earnings > self.phase_out_end {
            return None;
        }
        // Never negative: parameters where the phase-out outruns the flat
        // amount inside the window bottom out at zero, which the recoding
        // rule then treats like any other exhausted credit
        let over = earnings.saturating_sub(self.phase_out_start) as f64;
        Some((self.flat_amount - self.phase_out_rate * over).max(0.0))
    }
}

/// Null-recoding rule: exactly zero at positive earnings means missing
fn recode_zero(earnings: u32, value: Option<f64>) -> Option<f64> {
    match value {
        Some(v) if earnings > 0 && v == 0.0 => None,
        other => other,
    }
}

/// Compose long-form schedule rows from calculator results.
///
/// Missing calculator fields stay `None` in the output; that is data, not
/// an error.
pub fn compose_schedule(results: &[CalculatorResult], yctc: &YctcPolicy) -> Vec<BenefitRow> {
    results
        .iter()
        .map(|r| {
            // Null addends count as zero for the total, then the recoding
            // rule applies to the total independently.
            let total = r.federal_eitc.unwrap_or(0.0) + r.state_eitc.unwrap_or(0.0);
            let yctc_amount = yctc.amount(r.year, r.earnings, r.dependent_count, r.state_eitc);

            BenefitRow {
                year: r.year,
                earnings: r.earnings,
                dependent_count: r.dependent_count,
                federal_eitc: recode_zero(r.earnings, r.federal_eitc),
                state_eitc: recode_zero(r.earnings, r.state_eitc),
                total_eitc: recode_zero(r.earnings, Some(total)),
                child_tax_credit: recode_zero(r.earnings, r.child_tax_credit),
                young_child_tax_credit: recode_zero(r.earnings, yctc_amount),
            }
        })
        .collect()
}
