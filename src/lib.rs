//! EITC Schedules - Synthetic tax-benefit schedule pipeline for CalEITC analysis
//!
//! This library provides:
//! - Synthetic household earnings-grid generation
//! - A batch tax-calculator interface with numbered TAXSIM-style outputs
//! - Benefit composition (federal/state EITC, CTC, Young Child Tax Credit)
//! - Long-to-wide schedule reshaping for plotting
//! - CSV schedule export with optional publication mirroring

pub mod calculator;
pub mod config;
pub mod error;
pub mod grid;
pub mod output;
pub mod pipeline;
pub mod schedule;

// Re-export commonly used types
pub use calculator::{CommandCalculator, StubCalculator, TaxCalculator};
pub use config::PipelineConfig;
pub use error::{ScheduleError, ScheduleResult};
pub use grid::{generate_grid, GridParams, GridRow};
pub use pipeline::{PipelineRunner, YearSchedule, YearSummary};
pub use schedule::{BenefitRow, WideTable, YctcPolicy};
