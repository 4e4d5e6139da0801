//! Configuration models and loaders for elevator catalogs and planet models.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use shadow_astro::Ellipsoid;
use thiserror::Error;
use tracing::debug;

/// Elevator entry parsed from a catalog.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ElevatorConfig {
    pub name: String,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub height_km: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Reference ellipsoid override; WGS84 when absent.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct PlanetModelConfig {
    pub semi_major_km: f64,
    #[serde(default)]
    pub inverse_flattening: Option<f64>,
}

impl PlanetModelConfig {
    /// Ellipsoid described by this model; a missing inverse flattening means a sphere.
    pub fn ellipsoid(&self) -> Ellipsoid {
        let flattening = self.inverse_flattening.map_or(0.0, |inv| 1.0 / inv);
        Ellipsoid::new(self.semi_major_km, flattening)
    }

    /// Reject radii and flattenings that do not describe an oblate ellipsoid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason| ConfigError::Invalid {
            name: "planet model".to_string(),
            reason,
        };
        if !self.semi_major_km.is_finite() || self.semi_major_km <= 0.0 {
            return Err(invalid("semi-major axis must be finite and positive"));
        }
        if let Some(inv) = self.inverse_flattening {
            if !inv.is_finite() || inv <= 1.0 {
                return Err(invalid("inverse flattening must be finite and greater than 1"));
            }
        }
        Ok(())
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("elevator `{name}`: {reason}")]
    Invalid { name: String, reason: &'static str },
}

/// Load elevator definitions from a YAML list, a TOML file, or a directory of TOML files.
pub fn load_elevators<P: AsRef<Path>>(path: P) -> Result<Vec<ElevatorConfig>, ConfigError> {
    let elevators: Vec<ElevatorConfig> = load_records(path.as_ref())?;
    for elevator in &elevators {
        validate(elevator)?;
    }
    debug!(count = elevators.len(), path = %path.as_ref().display(), "loaded elevators");
    Ok(elevators)
}

/// Load a single planet model from YAML or TOML.
pub fn load_planet_model<P: AsRef<Path>>(path: P) -> Result<PlanetModelConfig, ConfigError> {
    let path = path.as_ref();
    let model: PlanetModelConfig = if is_toml(path) {
        toml::from_str(&std::fs::read_to_string(path)?)?
    } else {
        serde_yaml::from_reader(File::open(path)?)?
    };
    model.validate()?;
    debug!(semi_major_km = model.semi_major_km, path = %path.display(), "loaded planet model");
    Ok(model)
}

fn validate(elevator: &ElevatorConfig) -> Result<(), ConfigError> {
    let invalid = |reason| ConfigError::Invalid {
        name: elevator.name.clone(),
        reason,
    };
    if !(-90.0..=90.0).contains(&elevator.latitude_deg) {
        return Err(invalid("latitude must lie in [-90, 90] degrees"));
    }
    if !(-360.0..=360.0).contains(&elevator.longitude_deg) {
        return Err(invalid("longitude must lie in [-360, 360] degrees"));
    }
    if !elevator.height_km.is_finite() || elevator.height_km < 0.0 {
        return Err(invalid("height must be finite and non-negative"));
    }
    Ok(())
}

fn is_toml(path: &Path) -> bool {
    path.extension().map(|ext| ext == "toml").unwrap_or(false)
}

fn load_records<T>(path: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    if path.is_dir() {
        read_dir_records(path)
    } else if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_toml(path))
        .collect();
    entries.sort();
    let mut records = Vec::with_capacity(entries.len());
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        records.push(toml::from_str(&contents)?);
    }
    Ok(records)
}
