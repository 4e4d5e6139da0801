//! Export helpers for CSV and JSON shadow artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use shadow_geometry::{ShadowSample, Transition};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("filesystem error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

/// CSV row emitted by the sweep exporter.
#[derive(Debug, Clone, Serialize)]
pub struct SweepRecord {
    pub instant_utc: String,
    pub sun_elevation_deg: f64,
    pub umbra_km: f64,
    pub penumbra_km: f64,
}

impl From<&ShadowSample> for SweepRecord {
    fn from(sample: &ShadowSample) -> Self {
        Self {
            instant_utc: sample.instant.to_rfc3339(),
            sun_elevation_deg: sample.sun_elevation.to_degrees(),
            umbra_km: sample.heights.umbra_km,
            penumbra_km: sample.heights.penumbra_km,
        }
    }
}

/// Write sweep samples as CSV with a header row.
pub fn write_sweep_csv(writer: impl Write, samples: &[ShadowSample]) -> Result<(), ExportError> {
    let mut out = csv::Writer::from_writer(writer);
    for sample in samples {
        out.serialize(SweepRecord::from(sample))?;
    }
    out.flush()?;
    Ok(())
}

/// Full sweep report serialized to JSON.
#[derive(Debug, Serialize)]
pub struct SweepReport<'a> {
    pub name: &'a str,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub height_km: f64,
    pub samples: &'a [ShadowSample],
    pub transitions: &'a [Transition],
}

/// Write a sweep report as pretty-printed JSON.
pub fn write_sweep_json(mut writer: impl Write, report: &SweepReport<'_>) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Convenience wrapper writing CSV to a filesystem path (or stdout for `-`).
pub fn export_sweep_csv(path: &Path, samples: &[ShadowSample]) -> Result<(), ExportError> {
    write_sweep_csv(writer_for_path(path)?, samples)
}

/// Convenience wrapper writing JSON to a filesystem path (or stdout for `-`).
pub fn export_sweep_json(path: &Path, report: &SweepReport<'_>) -> Result<(), ExportError> {
    write_sweep_json(writer_for_path(path)?, report)
}
