//! Pipeline configuration
//!
//! All run parameters travel in one explicit value; there is no
//! process-wide mutable state.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ScheduleResult;
use crate::schedule::YctcPolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Tax years to build schedules for, processed in order
    pub years: Vec<u16>,
    /// Highest qualifying-child count (1..=3; 3 means "3 or more")
    pub max_dependents: u8,
    #[serde(default)]
    pub yctc: YctcPolicy,
    /// Where the schedule CSVs are written
    pub output_dir: PathBuf,
    /// Optional secondary publication directory; every written file is
    /// mirrored there when set
    #[serde(default)]
    pub publish_dir: Option<PathBuf>,
}

impl PipelineConfig {
    /// Default study configuration: the schedule-figure years of the
    /// CalEITC analysis, all child counts, current YCTC parameters
    pub fn default_study(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            years: vec![2015, 2016, 2017, 2019],
            max_dependents: 3,
            yctc: YctcPolicy::default(),
            output_dir: output_dir.into(),
            publish_dir: None,
        }
    }

    /// Load a configuration from a JSON file
    pub fn from_json_path(path: impl AsRef<Path>) -> ScheduleResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write the configuration as pretty JSON (the run-record snapshot)
    pub fn write_json_path(&self, path: impl AsRef<Path>) -> ScheduleResult<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let dir = std::env::temp_dir().join("eitc_schedules_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");

        let mut config = PipelineConfig::default_study("out");
        config.publish_dir = Some(PathBuf::from("publish"));
        config.write_json_path(&path).unwrap();

        let loaded = PipelineConfig::from_json_path(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_yctc_defaults_when_absent() {
        let json = r#"{"years":[2019],"max_dependents":3,"output_dir":"out"}"#;
        let config: PipelineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.yctc, YctcPolicy::default());
        assert_eq!(config.publish_dir, None);
    }
}
