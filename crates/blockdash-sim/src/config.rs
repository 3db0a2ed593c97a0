use serde::Deserialize;
use std::path::Path;

use crate::error::SimError;

#[derive(Debug, Deserialize)]
pub struct SimConfig {
    pub world: WorldSection,
    #[serde(default)]
    pub simulation: SimulationSection,
    pub logging: LoggingSection,
    #[serde(default)]
    pub snapshot: SnapshotSection,
}

#[derive(Debug, Deserialize)]
pub struct WorldSection {
    pub seed: i64,
}

#[derive(Debug, Deserialize)]
pub struct SimulationSection {
    /// Ticks to run before exiting. 0 = run until Ctrl+C.
    #[serde(default)]
    pub ticks: u64,
    /// Ticks per second, 1 to 1000. Default: 60.
    #[serde(default = "default_tick_rate")]
    pub tick_rate: u32,
    /// Input script driving the player. Default: "explore".
    #[serde(default = "default_script")]
    pub script: String,
}

/// Highest accepted tick rate.
pub const MAX_TICK_RATE: u32 = 1000;

fn default_tick_rate() -> u32 {
    60
}

fn default_script() -> String {
    "explore".into()
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            ticks: 0,
            tick_rate: default_tick_rate(),
            script: default_script(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct SnapshotSection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_snapshot_path")]
    pub path: String,
}

fn default_snapshot_path() -> String {
    "snapshot.json".into()
}

impl Default for SnapshotSection {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_snapshot_path(),
        }
    }
}

impl SimConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SimError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, SimError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), SimError> {
        if !(1..=MAX_TICK_RATE).contains(&self.simulation.tick_rate) {
            return Err(SimError::InvalidConfig(format!(
                "simulation.tick_rate must be between 1 and {MAX_TICK_RATE}"
            )));
        }
        if self.snapshot.enabled && self.snapshot.path.trim().is_empty() {
            return Err(SimError::InvalidConfig(
                "snapshot.path must be set when snapshots are enabled".into(),
            ));
        }
        Ok(())
    }

    /// The world seed as the generator takes it. Negative seeds keep their bits.
    pub fn seed(&self) -> u64 {
        self.world.seed as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_config() {
        let toml_str = r#"
            [world]
            seed = 12345

            [simulation]
            ticks = 600
            tick_rate = 30
            script = "builder"

            [logging]
            level = "debug"

            [snapshot]
            enabled = true
            path = "out/frame.json"
        "#;
        let config = SimConfig::parse(toml_str).unwrap();
        assert_eq!(config.world.seed, 12345);
        assert_eq!(config.simulation.ticks, 600);
        assert_eq!(config.simulation.tick_rate, 30);
        assert_eq!(config.simulation.script, "builder");
        assert_eq!(config.logging.level, "debug");
        assert!(config.snapshot.enabled);
        assert_eq!(config.snapshot.path, "out/frame.json");
    }

    #[test]
    fn parse_config_defaults() {
        let toml_str = r#"
            [world]
            seed = -7

            [logging]
            level = "info"
        "#;
        let config = SimConfig::parse(toml_str).unwrap();
        // simulation section defaults when absent
        assert_eq!(config.simulation.ticks, 0);
        assert_eq!(config.simulation.tick_rate, 60);
        assert_eq!(config.simulation.script, "explore");
        // snapshot section defaults when absent
        assert!(!config.snapshot.enabled);
        assert_eq!(config.snapshot.path, "snapshot.json");
        assert_eq!(config.seed(), (-7i64) as u64);
    }

    #[test]
    fn partial_simulation_section() {
        let toml_str = r#"
            [world]
            seed = 1

            [simulation]
            ticks = 10

            [logging]
            level = "warn"
        "#;
        let config = SimConfig::parse(toml_str).unwrap();
        assert_eq!(config.simulation.ticks, 10);
        assert_eq!(config.simulation.tick_rate, 60);
        assert_eq!(config.simulation.script, "explore");
    }

    #[test]
    fn zero_tick_rate_rejected() {
        let toml_str = r#"
            [world]
            seed = 1

            [simulation]
            tick_rate = 0

            [logging]
            level = "info"
        "#;
        let err = SimConfig::parse(toml_str).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
    }

    #[test]
    fn tick_rate_above_cap_rejected() {
        let config = |rate: u32| {
            format!(
                "[world]\nseed = 1\n\n[simulation]\ntick_rate = {rate}\n\n[logging]\nlevel = \"info\"\n"
            )
        };
        assert!(SimConfig::parse(&config(MAX_TICK_RATE)).is_ok());
        let err = SimConfig::parse(&config(MAX_TICK_RATE + 1)).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
        let err = SimConfig::parse(&config(2_000_000_000)).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
    }

    #[test]
    fn missing_world_section_is_parse_error() {
        let toml_str = r#"
            [logging]
            level = "info"
        "#;
        let err = SimConfig::parse(toml_str).unwrap_err();
        assert!(matches!(err, SimError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SimConfig::load("definitely/not/here/blockdash.toml").unwrap_err();
        assert!(matches!(err, SimError::Io(_)));
    }
}
