//! Long-to-wide schedule reshaping
//!
//! Pivot the long-form schedule on dependent count so every benefit curve
//! for a year shares one earnings axis, one column per (field, count) pair.
//! Column names are deterministic because downstream plotting code picks
//! columns by exact name.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::error::{ScheduleError, ScheduleResult};

use super::{BenefitRow, BENEFIT_FIELDS};

/// One wide row: a (year, earnings) point with every benefit cell
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub year: u16,
    pub earnings: u32,
    /// Cells in column order: field-major, dependent count minor
    pub cells: Vec<Option<f64>>,
    /// Which dependent-count slots had a long-form row at this key.
    ///
    /// Needed to melt faithfully: a long row whose benefits are all null is
    /// not the same thing as an absent combination. Not serialized.
    pub present: Vec<bool>,
}

/// Wide-form benefit schedule
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    /// Dependent-count categories, ascending
    pub dependent_counts: Vec<u8>,
    /// Column names: `{field}_{count}` in `BENEFIT_FIELDS` order
    pub columns: Vec<String>,
    /// Rows ordered by (year, earnings)
    pub rows: Vec<WideRow>,
}

impl WideTable {
    fn cell_index(&self, field_idx: usize, count_idx: usize) -> usize {
        field_idx * self.dependent_counts.len() + count_idx
    }
}

/// Pivot the long-form schedule on dependent count.
///
/// Duplicate (year, earnings, dependent_count) keys make the pivot
/// ambiguous and indicate an upstream generation bug; they are fatal.
///
/// The wide row set is the union of (year, earnings) keys across all
/// dependent counts; a count with no long-form row at some key leaves null
/// cells, never a dropped row.
pub fn pivot_wide(long: &[BenefitRow]) -> ScheduleResult<WideTable> {
    let mut seen: HashSet<(u16, u32, u8)> = HashSet::new();
    for row in long {
        if !seen.insert((row.year, row.earnings, row.dependent_count)) {
            return Err(ScheduleError::ReshapeConflict {
                year: row.year,
                earnings: row.earnings,
                dependent_count: row.dependent_count,
            });
        }
    }

    let dependent_counts: Vec<u8> = long
        .iter()
        .map(|r| r.dependent_count)
        .collect::<BTreeSet<u8>>()
        .into_iter()
        .collect();

    let columns: Vec<String> = BENEFIT_FIELDS
        .iter()
        .flat_map(|field| {
            dependent_counts
                .iter()
                .map(move |count| format!("{field}_{count}"))
        })
        .collect();

    let n_counts = dependent_counts.len();
    let n_cells = BENEFIT_FIELDS.len() * n_counts;

    // BTreeMap keyed by (year, earnings) gives the deterministic row order.
    let mut by_key: BTreeMap<(u16, u32), WideRow> = BTreeMap::new();
    for row in long {
        // dependent_counts was collected from this same input
        let count_idx = dependent_counts
            .iter()
            .position(|&c| c == row.dependent_count)
            .unwrap_or(0);
        let wide = by_key
            .entry((row.year, row.earnings))
            .or_insert_with(|| WideRow {
                year: row.year,
                earnings: row.earnings,
                cells: vec![None; n_cells],
                present: vec![false; n_counts],
            });
        wide.present[count_idx] = true;
        for (field_idx, value) in row.benefit_values().into_iter().enumerate() {
            wide.cells[field_idx * n_counts + count_idx] = value;
        }
    }

    Ok(WideTable {
        dependent_counts,
        columns,
        rows: by_key.into_values().collect(),
    })
}

/// Melt the wide table back to long form.
///
/// Emits one row per (year, earnings, dependent_count) combination that was
/// present when pivoted; combined with `pivot_wide` this round-trips any
/// duplicate-free long table up to row ordering.
pub fn melt_long(wide: &WideTable) -> Vec<BenefitRow> {
    let mut long = Vec::new();
    for row in &wide.rows {
        for (count_idx, &count) in wide.dependent_counts.iter().enumerate() {
            if !row.present[count_idx] {
                continue;
            }
            let mut values = [None; 5];
            for (field_idx, value) in values.iter_mut().enumerate() {
                *value = row.cells[wide.cell_index(field_idx, count_idx)];
            }
            long.push(BenefitRow::from_benefit_values(
                row.year,
                row.earnings,
                count,
                values,
            ));
        }
    }
    long
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: u16, earnings: u32, count: u8, federal: Option<f64>) -> BenefitRow {
        BenefitRow {
            year,
            earnings,
            dependent_count: count,
            federal_eitc: federal,
            state_eitc: federal.map(|v| v * 0.4),
            total_eitc: federal.map(|v| v * 1.4),
            child_tax_credit: None,
            young_child_tax_credit: None,
        }
    }

    #[test]
    fn test_column_names_deterministic() {
        let long = vec![
            row(2017, 0, 0, Some(0.0)),
            row(2017, 0, 1, Some(0.0)),
            row(2017, 50, 0, Some(3.8)),
            row(2017, 50, 1, Some(17.0)),
        ];
        let wide = pivot_wide(&long).unwrap();
        assert_eq!(wide.dependent_counts, vec![0, 1]);
        assert_eq!(
            wide.columns,
            vec![
                "federal_eitc_0",
                "federal_eitc_1",
                "state_eitc_0",
                "state_eitc_1",
                "total_eitc_0",
                "total_eitc_1",
                "child_tax_credit_0",
                "child_tax_credit_1",
                "young_child_tax_credit_0",
                "young_child_tax_credit_1",
            ]
        );
    }

    #[test]
    fn test_pivot_places_values() {
        let long = vec![row(2017, 50, 0, Some(3.8)), row(2017, 50, 1, Some(17.0))];
        let wide = pivot_wide(&long).unwrap();
        assert_eq!(wide.rows.len(), 1);
        let r = &wide.rows[0];
        assert_eq!(r.year, 2017);
        assert_eq!(r.earnings, 50);
        // federal_eitc_0 and federal_eitc_1
        assert_eq!(r.cells[0], Some(3.8));
        assert_eq!(r.cells[1], Some(17.0));
    }

    #[test]
    fn test_duplicate_keys_are_fatal() {
        let long = vec![row(2017, 50, 1, Some(17.0)), row(2017, 50, 1, Some(18.0))];
        let err = pivot_wide(&long).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::ReshapeConflict {
                year: 2017,
                earnings: 50,
                dependent_count: 1,
            }
        ));
    }

    #[test]
    fn test_row_set_is_union_of_keys() {
        // Count 1 has a row at earnings 100 that count 0 lacks
        let long = vec![
            row(2017, 50, 0, Some(3.8)),
            row(2017, 50, 1, Some(17.0)),
            row(2017, 100, 1, Some(34.0)),
        ];
        let wide = pivot_wide(&long).unwrap();
        assert_eq!(wide.rows.len(), 2);
        let r100 = &wide.rows[1];
        assert_eq!(r100.earnings, 100);
        // Count 0 cells are null, the row is not dropped
        assert_eq!(r100.cells[0], None);
        assert_eq!(r100.cells[1], Some(34.0));
        assert!(!r100.present[0]);
        assert!(r100.present[1]);
    }

    #[test]
    fn test_pivot_melt_round_trip() {
        let mut long = vec![
            row(2017, 0, 0, Some(0.0)),
            row(2017, 50, 0, Some(3.8)),
            row(2017, 50, 1, Some(17.0)),
            row(2019, 50, 1, Some(17.0)),
            // All-null benefits still round-trip as a row
            row(2019, 45_000, 1, None),
        ];
        let wide = pivot_wide(&long).unwrap();
        let mut melted = melt_long(&wide);

        let key = |r: &BenefitRow| (r.year, r.earnings, r.dependent_count);
        long.sort_by_key(key);
        melted.sort_by_key(key);
        assert_eq!(long, melted);
    }
}
