//! In-memory stand-in for the external tax calculator
//!
//! Carries piecewise-linear EITC schedules per qualifying-child count so
//! the pipeline produces plausible curves without the external tool. Used
//! by the test suite and as the CLI default. The numbers approximate 2017
//! federal and CalEITC parameters for single filers; they are stand-ins,
//! not authoritative tax law.

use std::collections::HashMap;

use crate::error::ScheduleResult;
use crate::grid::GridRow;

use super::fields::{ADDITIONAL_CTC_FIELD, CTC_FIELD, FEDERAL_EITC_FIELD, STATE_EITC_FIELD};
use super::{RawResult, TaxCalculator};

/// Piecewise-linear credit: phase-in, plateau, phase-out to zero
#[derive(Debug, Clone, Copy)]
pub struct CreditSchedule {
    pub phase_in_rate: f64,
    pub max_credit: f64,
    pub phase_out_start: f64,
    pub phase_out_rate: f64,
}

impl CreditSchedule {
    /// Credit amount at a given earnings level (never negative)
    pub fn amount(&self, earnings: f64) -> f64 {
        let phased_in = (earnings * self.phase_in_rate).min(self.max_credit);
        let reduction = (earnings - self.phase_out_start).max(0.0) * self.phase_out_rate;
        (phased_in - reduction).max(0.0)
    }
}

/// Stub batch calculator with fixed in-memory schedules
#[derive(Debug, Clone)]
pub struct StubCalculator {
    /// Federal EITC schedule indexed by qualifying-child count (0..=3)
    federal_eitc: [CreditSchedule; 4],
    /// State EITC schedule indexed by qualifying-child count (0..=3)
    state_eitc: [CreditSchedule; 4],
}

impl Default for StubCalculator {
    fn default() -> Self {
        Self {
            // 2017 federal parameters, single filer
            federal_eitc: [
                CreditSchedule {
                    phase_in_rate: 0.0765,
                    max_credit: 510.0,
                    phase_out_start: 8_340.0,
                    phase_out_rate: 0.0765,
                },
                CreditSchedule {
                    phase_in_rate: 0.34,
                    max_credit: 3_400.0,
                    phase_out_start: 18_340.0,
                    phase_out_rate: 0.1598,
                },
                CreditSchedule {
                    phase_in_rate: 0.40,
                    max_credit: 5_616.0,
                    phase_out_start: 18_340.0,
                    phase_out_rate: 0.2106,
                },
                CreditSchedule {
                    phase_in_rate: 0.45,
                    max_credit: 6_318.0,
                    phase_out_start: 18_340.0,
                    phase_out_rate: 0.2106,
                },
            ],
            // CalEITC-shaped state credit: steeper, exhausted well before
            // the federal phase-out end
            state_eitc: [
                CreditSchedule {
                    phase_in_rate: 0.065,
                    max_credit: 223.0,
                    phase_out_start: 3_580.0,
                    phase_out_rate: 0.065,
                },
                CreditSchedule {
                    phase_in_rate: 0.289,
                    max_credit: 1_495.0,
                    phase_out_start: 7_000.0,
                    phase_out_rate: 0.098,
                },
                CreditSchedule {
                    phase_in_rate: 0.34,
                    max_credit: 2_467.0,
                    phase_out_start: 7_000.0,
                    phase_out_rate: 0.161,
                },
                CreditSchedule {
                    phase_in_rate: 0.38,
                    max_credit: 2_775.0,
                    phase_out_start: 7_000.0,
                    phase_out_rate: 0.181,
                },
            ],
        }
    }
}

impl StubCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    fn schedule_index(dependent_count: u8) -> usize {
        (dependent_count as usize).min(3)
    }

    /// Refundable child tax credit: 15% of earnings over $2,500, capped at
    /// the per-child amount ($1,000 per child; $2,000 from 2018)
    fn refundable_ctc(year: u16, earnings: f64, dependent_count: u8) -> f64 {
        if dependent_count == 0 {
            return 0.0;
        }
        let per_child = if year >= 2018 { 2_000.0 } else { 1_000.0 };
        let cap = per_child * dependent_count as f64;
        (0.15 * (earnings - 2_500.0).max(0.0)).min(cap)
    }
}

impl TaxCalculator for StubCalculator {
    fn calculate(&self, batch: &[GridRow]) -> ScheduleResult<Vec<RawResult>> {
        let results = batch
            .iter()
            .map(|row| {
                let idx = Self::schedule_index(row.dependent_count);
                let earnings = row.earnings as f64;
                // Zero amounts are reported as explicit zeros, as the real
                // tool does; null-recoding happens downstream.
                let fields = HashMap::from([
                    (FEDERAL_EITC_FIELD, self.federal_eitc[idx].amount(earnings)),
                    (STATE_EITC_FIELD, self.state_eitc[idx].amount(earnings)),
                    (CTC_FIELD, 0.0),
                    (
                        ADDITIONAL_CTC_FIELD,
                        Self::refundable_ctc(row.year, earnings, row.dependent_count),
                    ),
                ]);
                RawResult {
                    row_id: row.row_id,
                    fields,
                }
            })
            .collect();
        Ok(results)
    }
}
