//! NAIF kernel catalog and the CSPICE-backed astronomy service.
//!
//! The catalog and path validation are always available so the importer and
//! CLI can report on local kernels. [`SpiceAstronomy`] and the toolkit calls
//! need the `spice` feature, which links CSPICE through `cspice-sys`.

use std::fs;
use std::path::PathBuf;

use shadow_astro::AstroError;
use thiserror::Error;
use tracing::debug;

pub mod kernels;
#[cfg(feature = "spice")]
mod toolkit;

use kernels::{KERNEL_CATALOG, KernelDescriptor};
#[cfg(feature = "spice")]
pub use toolkit::{SpiceAstronomy, epoch_seconds, load_default_kernels};

/// Basic metadata describing a local SPICE kernel.
#[derive(Debug)]
pub struct KernelSummary {
    pub descriptor: &'static KernelDescriptor,
    pub path: PathBuf,
    pub file_size_bytes: u64,
}

/// Errors surfaced while validating or querying the SPICE toolkit.
#[derive(Debug, Error)]
pub enum EphemerisError {
    #[error("kernel `{name}` is missing at {path}")]
    MissingKernel { name: &'static str, path: PathBuf },
    #[error("kernel `{name}` path contains invalid UTF-8: {path}")]
    InvalidKernelPath { name: &'static str, path: PathBuf },
    #[error("failed to read metadata for kernel `{name}`: {source}")]
    Io {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid epoch string `{epoch}`")]
    InvalidEpoch { epoch: String },
    #[error("SPICE kernel call failed: {message}")]
    Spice { message: String },
}

impl From<EphemerisError> for AstroError {
    fn from(err: EphemerisError) -> Self {
        AstroError::Backend(err.to_string())
    }
}

/// Whether this build links the CSPICE toolkit.
pub fn toolkit_available() -> bool {
    cfg!(feature = "spice")
}

/// Summarize the local kernel set with file sizes and descriptions.
pub fn kernel_summaries() -> Result<Vec<KernelSummary>, EphemerisError> {
    validate_kernel_paths()?;
    KERNEL_CATALOG
        .iter()
        .map(|descriptor| {
            let path = descriptor.local_path();
            let metadata = fs::metadata(&path).map_err(|source| EphemerisError::Io {
                name: descriptor.filename,
                source,
            })?;
            Ok(KernelSummary {
                descriptor,
                path,
                file_size_bytes: metadata.len(),
            })
        })
        .collect()
}

/// Catalog entries with no file on disk yet.
pub fn missing_kernels() -> Vec<&'static KernelDescriptor> {
    let missing: Vec<_> = KERNEL_CATALOG
        .iter()
        .filter(|descriptor| !descriptor.local_path().exists())
        .collect();
    debug!(missing = missing.len(), total = KERNEL_CATALOG.len(), "kernel scan");
    missing
}

/// Check that every catalog kernel exists and has a UTF-8 path.
pub fn validate_kernel_paths() -> Result<(), EphemerisError> {
    for descriptor in KERNEL_CATALOG {
        let path = descriptor.local_path();
        if !path.exists() {
            return Err(EphemerisError::MissingKernel {
                name: descriptor.filename,
                path,
            });
        }
        if path.to_str().is_none() {
            return Err(EphemerisError::InvalidKernelPath {
                name: descriptor.filename,
                path,
            });
        }
    }
    Ok(())
}
