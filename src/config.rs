use crate::error::Result;
use crate::physics::Scalar;
use crate::physics::integrators::IntegratorKind;
use crate::plotting::{OutputFormat, RenderSettings, TrajectoryStyle};
use crate::scenario::ScenarioSettings;
use crate::simulation::SimulationSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const APPLICATION_NAME: &str = "orbitplot";
const CONFIG_FILE_NAME: &str = "config.toml";
const ENVIRONMENT_PREFIX: &str = "ORBITPLOT";
const ENVIRONMENT_SEPARATOR: &str = "__";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub physics: PhysicsConfig,
    pub simulation: SimulationSettings,
    pub scenario: ScenarioSettings,
    pub rendering: RenderingConfig,
    pub output: OutputConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravitational_constant: Scalar,
    pub integrator: IntegratorKind,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: 1.0,
            integrator: IntegratorKind::StormerVerlet,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct RenderingConfig {
    pub format: OutputFormat,
    pub canvas: RenderSettings,
    pub trajectories: TrajectoryStyle,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    /// Append a timestamp to output file names
    pub timestamp: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            timestamp: true,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a file, falling back to defaults if the file doesn't exist
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!(
                        "Failed to parse config file {}: {}. Using defaults.",
                        path.display(),
                        e
                    );
                    Self::default()
                }
            },
            Err(_) => {
                info!("Config file {} not found. Using defaults.", path.display());
                Self::default()
            }
        }
    }

    /// Location of the per-user configuration file, if the platform has one
    pub fn user_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", APPLICATION_NAME)
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load the per-user configuration file layered with `ORBITPLOT__*`
    /// environment overrides. Any failure falls back to defaults.
    pub fn load_from_user_config() -> Self {
        let environment = config::Environment::with_prefix(ENVIRONMENT_PREFIX)
            .separator(ENVIRONMENT_SEPARATOR)
            .try_parsing(true);

        let loaded = match Self::user_config_path() {
            Some(path) => Self::load_layered(Some(&path), environment),
            None => Self::load_layered(None, environment),
        };

        loaded.unwrap_or_else(|e| {
            warn!("Failed to load user configuration: {}. Using defaults.", e);
            Self::default()
        })
    }

    fn load_layered(path: Option<&Path>, environment: config::Environment) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            info!("Reading user configuration from {}", path.display());
            builder = builder.add_source(config::File::from(path).required(false));
        }
        let config = builder
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
