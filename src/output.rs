//! Schedule CSV emitters
//!
//! Every write is a full-file overwrite; null benefit cells serialize as
//! empty cells. File names are deterministic per year so reruns replace
//! earlier artifacts in place.

use std::path::{Path, PathBuf};

use crate::error::ScheduleResult;
use crate::schedule::{BenefitRow, WideTable};

/// Long-form schedule file name for a year
pub fn long_csv_name(year: u16) -> String {
    format!("eitc_schedule_long_{year}.csv")
}

/// Wide-form schedule file name for a year (the plotting-stage input)
pub fn wide_csv_name(year: u16) -> String {
    format!("eitc_schedule_wide_{year}.csv")
}

/// Write the long-form schedule
pub fn write_long_csv(path: impl AsRef<Path>, rows: &[BenefitRow]) -> ScheduleResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the wide-form schedule
pub fn write_wide_csv(path: impl AsRef<Path>, table: &WideTable) -> ScheduleResult<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec!["year".to_string(), "earnings".to_string()];
    header.extend(table.columns.iter().cloned());
    writer.write_record(&header)?;

    for row in &table.rows {
        let mut record = vec![row.year.to_string(), row.earnings.to_string()];
        for cell in &row.cells {
            record.push(cell.map(fmt_benefit_cell).unwrap_or_default());
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Render a benefit amount exactly as the serde path of the long-form file
/// does, so the two artifacts agree cell for cell (`0.0`, not `0`)
fn fmt_benefit_cell(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Mirror already-written files into the secondary publication directory
pub fn publish_mirror(files: &[PathBuf], publish_dir: &Path) -> ScheduleResult<()> {
    std::fs::create_dir_all(publish_dir)?;
    for file in files {
        let Some(name) = file.file_name() else {
            continue;
        };
        std::fs::copy(file, publish_dir.join(name))?;
    }
    Ok(())
}
