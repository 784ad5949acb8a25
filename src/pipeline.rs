//! Per-year pipeline driver
//!
//! One pure step per year (grid, calculator, composer, reshaper), invoked
//! in a loop by `run`. A failing year writes nothing; files from earlier
//! years in the same run stay on disk.

use std::path::PathBuf;

use crate::calculator::{run_calculator, TaxCalculator};
use crate::config::PipelineConfig;
use crate::error::ScheduleResult;
use crate::grid::{generate_grid, GridParams};
use crate::output::{
    long_csv_name, publish_mirror, wide_csv_name, write_long_csv, write_wide_csv,
};
use crate::schedule::{compose_schedule, pivot_wide, BenefitRow, WideTable};

/// Both shapes of one year's schedule
#[derive(Debug, Clone)]
pub struct YearSchedule {
    pub year: u16,
    pub long: Vec<BenefitRow>,
    pub wide: WideTable,
}

/// Per-year run summary for console reporting
#[derive(Debug, Clone)]
pub struct YearSummary {
    pub year: u16,
    pub long_rows: usize,
    pub wide_rows: usize,
    /// Largest composed total EITC across the grid
    pub max_total_eitc: f64,
}

/// Pipeline runner holding the configuration and a calculator
///
/// # Example
/// ```ignore
/// let runner = PipelineRunner::new(config, Box::new(StubCalculator::new()));
/// let summaries = runner.run()?;
/// ```
pub struct PipelineRunner {
    config: PipelineConfig,
    calculator: Box<dyn TaxCalculator>,
}

impl PipelineRunner {
    pub fn new(config: PipelineConfig, calculator: Box<dyn TaxCalculator>) -> Self {
        Self { config, calculator }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Build one year's schedule without touching the filesystem
    pub fn build_year(&self, year: u16) -> ScheduleResult<YearSchedule> {
        let grid = generate_grid(GridParams {
            year,
            max_dependents: self.config.max_dependents,
            child_ages_from: self.config.yctc.start_year,
        })?;
        log::info!("year {year}: generated {} grid rows", grid.len());

        let results = run_calculator(self.calculator.as_ref(), &grid)?;
        let long = compose_schedule(&results, &self.config.yctc);
        let wide = pivot_wide(&long)?;
        log::info!(
            "year {year}: composed {} long rows, {} wide rows",
            long.len(),
            wide.rows.len()
        );

        Ok(YearSchedule { year, long, wide })
    }

    /// Build and export every configured year, in order.
    ///
    /// Aborts on the first failing year; that year's files are neither
    /// written nor updated, earlier years' files remain.
    pub fn run(&self) -> ScheduleResult<Vec<YearSummary>> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let mut summaries = Vec::new();
        for &year in &self.config.years {
            let schedule = self.build_year(year)?;

            let long_path = self.config.output_dir.join(long_csv_name(year));
            let wide_path = self.config.output_dir.join(wide_csv_name(year));
            write_long_csv(&long_path, &schedule.long)?;
            write_wide_csv(&wide_path, &schedule.wide)?;

            if let Some(publish_dir) = &self.config.publish_dir {
                publish_mirror(&[long_path, wide_path], publish_dir)?;
            }

            summaries.push(summarize(&schedule));
        }

        // Run-record snapshot of the effective parameters
        let config_path = self.config.output_dir.join("run_config.json");
        self.config.write_json_path(&config_path)?;

        Ok(summaries)
    }

    /// Paths `run` writes for one year, relative to the output directory
    pub fn year_output_paths(&self, year: u16) -> [PathBuf; 2] {
        [
            self.config.output_dir.join(long_csv_name(year)),
            self.config.output_dir.join(wide_csv_name(year)),
        ]
    }
}

fn summarize(schedule: &YearSchedule) -> YearSummary {
    let max_total_eitc = schedule
        .long
        .iter()
        .filter_map(|r| r.total_eitc)
        .fold(0.0f64, f64::max);
    YearSummary {
        year: schedule.year,
        long_rows: schedule.long.len(),
        wide_rows: schedule.wide.rows.len(),
        max_total_eitc,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{RawResult, StubCalculator};
    use crate::error::ScheduleError;
    use crate::grid::GridRow;

    fn test_config(name: &str) -> PipelineConfig {
        let dir = std::env::temp_dir()
            .join("eitc_schedules_pipeline_test")
            .join(name);
        // Start from a clean slate so file-absence assertions mean something
        let _ = std::fs::remove_dir_all(&dir);
        let mut config = PipelineConfig::default_study(&dir);
        config.years = vec![2017, 2019];
        config
    }

    #[test]
    fn test_build_year_shapes() {
        let config = test_config("build_year");
        let runner = PipelineRunner::new(config, Box::new(StubCalculator::new()));

        let schedule = runner.build_year(2019).unwrap();
        assert_eq!(schedule.long.len(), 1001 * 4);
        assert_eq!(schedule.wide.rows.len(), 1001);
        assert_eq!(schedule.wide.columns.len(), 5 * 4);
    }

    #[test]
    fn test_run_writes_files_per_year() {
        let config = test_config("run_ok");
        let runner = PipelineRunner::new(config, Box::new(StubCalculator::new()));

        let summaries = runner.run().unwrap();
        assert_eq!(summaries.len(), 2);
        assert!(summaries[0].max_total_eitc > 0.0);

        for year in [2017, 2019] {
            for path in runner.year_output_paths(year) {
                assert!(path.exists(), "missing {}", path.display());
            }
        }
        assert!(runner.config().output_dir.join("run_config.json").exists());
    }

    #[test]
    fn test_run_mirrors_to_publish_dir() {
        let mut config = test_config("run_publish");
        config.years = vec![2019];
        config.publish_dir = Some(config.output_dir.join("publish"));
        let runner = PipelineRunner::new(config, Box::new(StubCalculator::new()));

        runner.run().unwrap();
        let publish = runner.config().publish_dir.clone().unwrap();
        assert!(publish.join(long_csv_name(2019)).exists());
        assert!(publish.join(wide_csv_name(2019)).exists());
    }

    /// Calculator that drops the last result row of every batch
    struct ShortCalculator;

    impl TaxCalculator for ShortCalculator {
        fn calculate(&self, batch: &[GridRow]) -> ScheduleResult<Vec<RawResult>> {
            Ok(batch
                .iter()
                .take(batch.len() - 1)
                .map(|row| RawResult {
                    row_id: row.row_id,
                    fields: Default::default(),
                })
                .collect())
        }
    }

    #[test]
    fn test_mismatch_aborts_without_output() {
        let mut config = test_config("run_mismatch");
        config.years = vec![2017];
        let runner = PipelineRunner::new(config, Box::new(ShortCalculator));

        let err = runner.run().unwrap_err();
        assert!(matches!(err, ScheduleError::AdapterMismatch { .. }));
        for path in runner.year_output_paths(2017) {
            assert!(!path.exists(), "unexpected {}", path.display());
        }
    }

    #[test]
    fn test_failure_keeps_earlier_years() {
        /// Fails only for 2019 batches
        struct FailsIn2019(StubCalculator);

        impl TaxCalculator for FailsIn2019 {
            fn calculate(&self, batch: &[GridRow]) -> ScheduleResult<Vec<RawResult>> {
                if batch.first().map(|r| r.year) == Some(2019) {
                    let mut out = self.0.calculate(batch)?;
                    out.pop();
                    return Ok(out);
                }
                self.0.calculate(batch)
            }
        }

        let config = test_config("run_partial");
        let runner = PipelineRunner::new(config, Box::new(FailsIn2019(StubCalculator::new())));

        assert!(runner.run().is_err());
        // 2017 completed before the 2019 failure
        for path in runner.year_output_paths(2017) {
            assert!(path.exists());
        }
        for path in runner.year_output_paths(2019) {
            assert!(!path.exists());
        }
    }
}
