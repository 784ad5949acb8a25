//! Synthetic household earnings-grid generation
//!
//! Builds the full cross-product of an earnings axis and qualifying-child
//! counts for one tax year. The grid is the input batch submitted to the tax
//! calculator; keeping the earnings axis identical across child counts is
//! what makes the plotted benefit curves comparable.

use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};

/// TAXSIM state code for California
pub const CALIFORNIA: u8 = 5;

/// Earnings axis step in dollars
pub const EARNINGS_STEP: u32 = 50;

/// Points on the earnings axis: $0 to $50,000 in $50 steps
pub const EARNINGS_POINTS: u32 = 1001;

/// Highest qualifying-child category; 3 means "3 or more"
pub const MAX_QUALIFYING_CHILDREN: u8 = 3;

/// First federal EITC tax year
const FIRST_EITC_YEAR: u16 = 1975;

/// Representative ages attached to YCTC-era rows with children
const REPRESENTATIVE_CHILD_AGES: [u8; 2] = [4, 5];

/// Filing status submitted to the calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaritalStatus {
    Single,
}

/// One synthetic household observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRow {
    /// Stable unique identifier within a batch, assigned at generation
    pub row_id: u32,
    pub year: u16,
    pub state: u8,
    /// Annual earnings in whole dollars
    pub earnings: u32,
    /// Number of qualifying children, capped at the "3 or more" bucket
    pub dependent_count: u8,
    pub marital_status: MaritalStatus,
    /// Representative child ages, present only for years with
    /// age-conditioned credits and rows with at least one child
    pub child_ages: Option<[u8; 2]>,
}

/// Parameters for one year's grid
#[derive(Debug, Clone, Copy)]
pub struct GridParams {
    pub year: u16,
    /// Highest qualifying-child count to include (1..=3)
    pub max_dependents: u8,
    /// First year for which child ages are attached (YCTC introduction)
    pub child_ages_from: u16,
}

impl GridParams {
    fn validate(&self) -> ScheduleResult<()> {
        if self.max_dependents == 0 {
            return Err(ScheduleError::Generation(
                "max dependents must be positive".to_string(),
            ));
        }
        if self.max_dependents > MAX_QUALIFYING_CHILDREN {
            return Err(ScheduleError::Generation(format!(
                "max dependents {} exceeds the \"3 or more\" bucket",
                self.max_dependents
            )));
        }
        if self.year < FIRST_EITC_YEAR {
            return Err(ScheduleError::Generation(format!(
                "unsupported tax year {} (federal EITC starts {})",
                self.year, FIRST_EITC_YEAR
            )));
        }
        Ok(())
    }
}

/// The shared earnings axis: 1001 points, $0..=$50,000
pub fn earnings_axis() -> impl Iterator<Item = u32> {
    (0..EARNINGS_POINTS).map(|i| i * EARNINGS_STEP)
}

/// Generate the full cross-product grid for one year.
///
/// Row count is always `EARNINGS_POINTS * (max_dependents + 1)`. Row ids are
/// sequential from 1 in (dependent_count, earnings) order.
pub fn generate_grid(params: GridParams) -> ScheduleResult<Vec<GridRow>> {
    params.validate()?;

    let attach_ages = params.year >= params.child_ages_from;
    let mut rows = Vec::with_capacity(EARNINGS_POINTS as usize * (params.max_dependents as usize + 1));
    let mut next_id: u32 = 1;

    for dependent_count in 0..=params.max_dependents {
        for earnings in earnings_axis() {
            let child_ages = if attach_ages && dependent_count >= 1 {
                Some(REPRESENTATIVE_CHILD_AGES)
            } else {
                None
            };
            rows.push(GridRow {
                row_id: next_id,
                year: params.year,
                state: CALIFORNIA,
                earnings,
                dependent_count,
                marital_status: MaritalStatus::Single,
                child_ages,
            });
            next_id += 1;
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(year: u16) -> GridParams {
        GridParams {
            year,
            max_dependents: 3,
            child_ages_from: 2019,
        }
    }

    #[test]
    fn test_grid_size() {
        let grid = generate_grid(params(2017)).unwrap();
        assert_eq!(grid.len(), 1001 * 4);
    }

    #[test]
    fn test_earnings_axis_shared_across_child_counts() {
        let grid = generate_grid(params(2017)).unwrap();
        let axis: Vec<u32> = earnings_axis().collect();
        assert_eq!(axis.len(), 1001);
        assert_eq!(axis[0], 0);
        assert_eq!(axis[1], 50);
        assert_eq!(axis[1000], 50_000);

        for dep in 0..=3u8 {
            let earnings: Vec<u32> = grid
                .iter()
                .filter(|r| r.dependent_count == dep)
                .map(|r| r.earnings)
                .collect();
            assert_eq!(earnings, axis);
        }
    }

    #[test]
    fn test_row_ids_unique_and_sequential() {
        let grid = generate_grid(params(2017)).unwrap();
        for (i, row) in grid.iter().enumerate() {
            assert_eq!(row.row_id, i as u32 + 1);
        }
    }

    #[test]
    fn test_child_ages_only_in_policy_years_with_children() {
        let pre = generate_grid(params(2017)).unwrap();
        assert!(pre.iter().all(|r| r.child_ages.is_none()));

        let post = generate_grid(params(2019)).unwrap();
        for row in &post {
            if row.dependent_count >= 1 {
                assert_eq!(row.child_ages, Some([4, 5]));
            } else {
                assert!(row.child_ages.is_none());
            }
        }
    }

    #[test]
    fn test_invalid_params_rejected() {
        let mut p = params(2017);
        p.max_dependents = 0;
        assert!(matches!(
            generate_grid(p),
            Err(ScheduleError::Generation(_))
        ));

        let mut p = params(2017);
        p.max_dependents = 4;
        assert!(matches!(
            generate_grid(p),
            Err(ScheduleError::Generation(_))
        ));

        assert!(matches!(
            generate_grid(params(1970)),
            Err(ScheduleError::Generation(_))
        ));
    }
}
