//! Batch tax-calculator interface
//!
//! The external calculator is opaque: it maps a row of household attributes
//! to positionally numbered output fields, TAXSIM style. Everything here
//! either produces its input batch, invokes it, or maps its numbered outputs
//! back to named benefit amounts.

mod adapter;
mod command;
mod fields;
mod stub;

use std::collections::HashMap;

pub use adapter::{run_calculator, CalculatorResult};
pub use command::CommandCalculator;
pub use fields::{ADDITIONAL_CTC_FIELD, CTC_FIELD, FEDERAL_EITC_FIELD, STATE_EITC_FIELD};
pub use stub::StubCalculator;

use crate::error::ScheduleResult;
use crate::grid::GridRow;

/// One raw calculator output row: numbered fields keyed by output index
#[derive(Debug, Clone)]
pub struct RawResult {
    /// Identifier of the grid row this result answers
    pub row_id: u32,
    pub fields: HashMap<u32, f64>,
}

/// Opaque batch tax calculator.
///
/// A single blocking call: submit the full grid, receive one output row per
/// input row. Results are correlated by `row_id`; output order is not
/// significant.
pub trait TaxCalculator {
    fn calculate(&self, batch: &[GridRow]) -> ScheduleResult<Vec<RawResult>>;
}
