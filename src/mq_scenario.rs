//! YAML scenario files
//!
//! A scenario names a sweep and overrides the defaults of [`SweepConfig`]:
//!
//! ```yaml
//! meta:
//!   name: Flaky CI
//!   description: Long jobs with a high bounce rate
//! config:
//!   job_duration: 45
//!   failure_probability: 0.2
//!   max_queue_size: 15
//!   overflow_count: 5
//!   overflow_probability: 0.3
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::mq_error::SimError;
use crate::mq_sweep::{parse_seed_hex, SweepConfig};

/// Scenario file format
#[derive(Debug, Deserialize)]
pub struct ScenarioFile {
    /// Scenario metadata
    #[serde(default)]
    pub meta: ScenarioMeta,

    /// Sweep configuration
    pub config: ScenarioConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScenarioMeta {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Sweep settings; everything but the job model is optional
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    pub job_duration: u64,
    pub failure_probability: f64,
    pub min_queue_size: Option<u64>,
    pub max_queue_size: Option<u64>,
    pub sim_duration_hours: Option<u64>,
    pub overflow_count: Option<u64>,
    pub overflow_probability: Option<f64>,
    pub report_losses: Option<bool>,
    /// Hex seed, with or without `0x`
    pub seed: Option<String>,
}

impl ScenarioFile {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SimError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: &Path) -> Result<Self, SimError> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Build the sweep configuration; `seed` overrides any seed in the file
    pub fn sweep_config(&self, seed: Option<[u8; 32]>) -> Result<SweepConfig, SimError> {
        let c = &self.config;
        let defaults = SweepConfig::default();

        let file_seed = c.seed.as_deref().map(parse_seed_hex).transpose()?;

        Ok(SweepConfig {
            min_queue_size: c.min_queue_size.unwrap_or(defaults.min_queue_size),
            max_queue_size: c.max_queue_size.unwrap_or(defaults.max_queue_size),
            sim_duration_hours: c.sim_duration_hours.unwrap_or(defaults.sim_duration_hours),
            job_duration: c.job_duration,
            failure_probability: c.failure_probability,
            overflow_count: c.overflow_count.unwrap_or(defaults.overflow_count),
            overflow_probability: c
                .overflow_probability
                .unwrap_or(defaults.overflow_probability),
            seed: seed.or(file_seed),
            report_losses: c.report_losses.unwrap_or(defaults.report_losses),
        })
    }
}

/// All `.yaml`/`.yml` files in `dir`, sorted by path
pub fn scenario_files(dir: &Path) -> Result<Vec<PathBuf>, SimError> {
    let mut scenarios = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );
        if is_yaml && path.is_file() {
            scenarios.push(path);
        }
    }
    scenarios.sort();
    Ok(scenarios)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_scenario_uses_defaults() {
        let scenario = ScenarioFile::from_yaml_str(
            "config:\n  job_duration: 20\n  failure_probability: 0.15\n",
        )
        .unwrap();
        assert!(scenario.meta.name.is_none());

        let config = scenario.sweep_config(None).unwrap();
        assert_eq!(config.job_duration, 20);
        assert_eq!(config.failure_probability, 0.15);
        assert_eq!(config.min_queue_size, 1);
        assert_eq!(config.max_queue_size, 10);
        assert_eq!(config.sim_duration_hours, 10_000);
        assert_eq!(config.overflow_count, 0);
        assert_eq!(config.seed, None);
        assert!(config.report_losses);
    }

    #[test]
    fn test_full_scenario() {
        let yaml = r#"
meta:
  name: Nightly
  description: Short simulation without loss column
config:
  job_duration: 45
  failure_probability: 0.2
  min_queue_size: 2
  max_queue_size: 15
  sim_duration_hours: 96
  overflow_count: 5
  overflow_probability: 0.3
  report_losses: false
  seed: "0x0102"
"#;
        let scenario = ScenarioFile::from_yaml_str(yaml).unwrap();
        assert_eq!(scenario.meta.name.as_deref(), Some("Nightly"));

        let config = scenario.sweep_config(None).unwrap();
        assert_eq!(config.min_queue_size, 2);
        assert_eq!(config.max_queue_size, 15);
        assert_eq!(config.sim_duration_hours, 96);
        assert_eq!(config.overflow_count, 5);
        assert_eq!(config.overflow_probability, 0.3);
        assert!(!config.report_losses);
        assert_eq!(config.seed.unwrap()[..2], [1, 2]);

        // command line seed wins
        let config = scenario.sweep_config(Some([7u8; 32])).unwrap();
        assert_eq!(config.seed, Some([7u8; 32]));
    }

    #[test]
    fn test_missing_required_field() {
        let err = ScenarioFile::from_yaml_str("config:\n  job_duration: 20\n").unwrap_err();
        assert!(matches!(err, SimError::Scenario(_)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "config:\n  job_duration: 20\n  failure_probability: 0.1\n  queue: 3\n";
        assert!(ScenarioFile::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_bad_seed_rejected() {
        let yaml = "config:\n  job_duration: 20\n  failure_probability: 0.1\n  seed: nothex\n";
        let scenario = ScenarioFile::from_yaml_str(yaml).unwrap();
        assert!(matches!(
            scenario.sweep_config(None),
            Err(SimError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_bundled_scenarios_are_valid() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios");
        let files = scenario_files(&dir).unwrap();
        assert!(!files.is_empty());

        for path in files {
            let scenario = ScenarioFile::load(&path).unwrap();
            let config = scenario.sweep_config(None).unwrap();
            assert!(config.validate().is_ok(), "{}", path.display());
        }
    }
}
