//! EITC Schedules CLI
//!
//! Builds synthetic CalEITC benefit-schedule tables for the configured tax
//! years and exports the long- and wide-form CSVs.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use eitc_schedules::{
    CommandCalculator, PipelineConfig, PipelineRunner, StubCalculator, TaxCalculator,
};

#[derive(Debug, Parser)]
#[command(name = "eitc_schedules", about = "Build synthetic CalEITC benefit schedules")]
struct Cli {
    /// JSON configuration file; replaces the grid and output flags below
    #[arg(long, conflicts_with_all = ["years", "max_children", "publish_dir"])]
    config: Option<PathBuf>,

    /// Tax years to build schedules for
    #[arg(long, num_args = 1.., value_name = "YEAR")]
    years: Vec<u16>,

    /// Highest qualifying-child count (3 means "3 or more")
    #[arg(long, default_value_t = 3)]
    max_children: u8,

    /// Output directory for the schedule CSVs
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Mirror written files into this secondary publication directory
    #[arg(long)]
    publish_dir: Option<PathBuf>,

    /// External batch calculator executable; the in-memory stub schedules
    /// are used when omitted
    #[arg(long, value_name = "PROGRAM")]
    calculator: Option<PathBuf>,

    /// Deadline in seconds for the external calculator
    #[arg(long, requires = "calculator")]
    timeout_secs: Option<u64>,
}

impl Cli {
    fn into_parts(self) -> anyhow::Result<(PipelineConfig, Box<dyn TaxCalculator>)> {
        let calculator: Box<dyn TaxCalculator> = match &self.calculator {
            Some(program) => {
                let mut calc = CommandCalculator::new(program.clone());
                if let Some(secs) = self.timeout_secs {
                    calc = calc.with_timeout(Duration::from_secs(secs));
                }
                Box::new(calc)
            }
            None => Box::new(StubCalculator::new()),
        };

        let config = match self.config {
            Some(path) => PipelineConfig::from_json_path(&path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => {
                let mut config = PipelineConfig::default_study(self.output_dir);
                if !self.years.is_empty() {
                    config.years = self.years;
                }
                config.max_dependents = self.max_children;
                config.publish_dir = self.publish_dir;
                config
            }
        };

        Ok((config, calculator))
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let (config, calculator) = Cli::parse().into_parts()?;
    let runner = PipelineRunner::new(config, calculator);

    println!("EITC Schedules v0.1.0");
    println!("=====================\n");

    let summaries = runner.run().context("pipeline run failed")?;

    println!(
        "{:>6} {:>10} {:>10} {:>16}",
        "Year", "LongRows", "WideRows", "MaxTotalEITC"
    );
    println!("{}", "-".repeat(46));
    for s in &summaries {
        println!(
            "{:>6} {:>10} {:>10} {:>16.2}",
            s.year, s.long_rows, s.wide_rows, s.max_total_eitc
        );
    }

    println!(
        "\nSchedules written to: {}",
        runner.config().output_dir.display()
    );
    if let Some(publish) = &runner.config().publish_dir {
        println!("Mirrored to: {}", publish.display());
    }

    Ok(())
}
