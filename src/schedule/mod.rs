//! Benefit-schedule composition and reshaping

mod compose;
mod reshape;

use serde::{Deserialize, Serialize};

pub use compose::{compose_schedule, YctcPolicy};
pub use reshape::{melt_long, pivot_wide, WideRow, WideTable};

/// Benefit field names in their fixed column order.
///
/// Downstream plotting code references wide-table columns by exact name,
/// so this order and these spellings are load-bearing.
pub const BENEFIT_FIELDS: [&str; 5] = [
    "federal_eitc",
    "state_eitc",
    "total_eitc",
    "child_tax_credit",
    "young_child_tax_credit",
];

/// One long-form schedule row: one (year, earnings, dependent_count) cell.
///
/// Benefit fields are `Option<f64>` because null and zero mean different
/// things here: null breaks a plotted line, zero does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitRow {
    pub year: u16,
    pub earnings: u32,
    pub dependent_count: u8,
    pub federal_eitc: Option<f64>,
    pub state_eitc: Option<f64>,
    pub total_eitc: Option<f64>,
    pub child_tax_credit: Option<f64>,
    pub young_child_tax_credit: Option<f64>,
}

impl BenefitRow {
    /// Benefit values in `BENEFIT_FIELDS` order
    pub fn benefit_values(&self) -> [Option<f64>; 5] {
        [
            self.federal_eitc,
            self.state_eitc,
            self.total_eitc,
            self.child_tax_credit,
            self.young_child_tax_credit,
        ]
    }

    /// Rebuild a row from values in `BENEFIT_FIELDS` order
    pub fn from_benefit_values(
        year: u16,
        earnings: u32,
        dependent_count: u8,
        values: [Option<f64>; 5],
    ) -> Self {
        Self {
            year,
            earnings,
            dependent_count,
            federal_eitc: values[0],
            state_eitc: values[1],
            total_eitc: values[2],
            child_tax_credit: values[3],
            young_child_tax_credit: values[4],
        }
    }
}
