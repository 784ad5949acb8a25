//! Submit a grid to a calculator and map numbered outputs to named fields

use std::collections::HashMap;

use crate::error::{ScheduleError, ScheduleResult};
use crate::grid::GridRow;

use super::fields::{ADDITIONAL_CTC_FIELD, CTC_FIELD, FEDERAL_EITC_FIELD, STATE_EITC_FIELD};
use super::{RawResult, TaxCalculator};

/// Named benefit amounts for one grid row.
///
/// A field is `None` when the calculator did not report it for this row;
/// that propagates as missing data downstream, it is not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorResult {
    pub year: u16,
    pub earnings: u32,
    pub dependent_count: u8,
    pub federal_eitc: Option<f64>,
    pub state_eitc: Option<f64>,
    /// Child tax credit total: field 22 plus field 23
    pub child_tax_credit: Option<f64>,
}

/// Run the calculator on a generated grid and name its outputs.
///
/// Fatal `AdapterMismatch` when the result count differs from the submitted
/// count: the external tool did not process the full grid.
pub fn run_calculator(
    calculator: &dyn TaxCalculator,
    grid: &[GridRow],
) -> ScheduleResult<Vec<CalculatorResult>> {
    let raw = calculator.calculate(grid)?;
    if raw.len() != grid.len() {
        return Err(ScheduleError::AdapterMismatch {
            submitted: grid.len(),
            received: raw.len(),
        });
    }

    let by_id: HashMap<u32, RawResult> = raw.into_iter().map(|r| (r.row_id, r)).collect();

    let results = grid
        .iter()
        .map(|row| {
            let fields = by_id.get(&row.row_id).map(|r| &r.fields);
            CalculatorResult {
                year: row.year,
                earnings: row.earnings,
                dependent_count: row.dependent_count,
                federal_eitc: fields.and_then(|f| f.get(&FEDERAL_EITC_FIELD).copied()),
                state_eitc: fields.and_then(|f| f.get(&STATE_EITC_FIELD).copied()),
                child_tax_credit: fields.and_then(|f| sum_ctc(f)),
            }
        })
        .collect();

    Ok(results)
}

/// Sum the two child-tax-credit components; `None` only when both are absent
fn sum_ctc(fields: &HashMap<u32, f64>) -> Option<f64> {
    let ctc = fields.get(&CTC_FIELD).copied();
    let actc = fields.get(&ADDITIONAL_CTC_FIELD).copied();
    match (ctc, actc) {
        (None, None) => None,
        (a, b) => Some(a.unwrap_or(0.0) + b.unwrap_or(0.0)),
    }
}
