//! Downloads the NAIF kernel catalog used by the SPICE astronomy service.

use std::fs::{self, File};
use std::io::copy;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use shadow_ephem_spice::kernels::KernelDescriptor;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of attempting to download a kernel.
#[derive(Debug, PartialEq, Eq)]
pub enum KernelStatus {
    Downloaded(PathBuf),
    AlreadyPresent(PathBuf),
}

impl KernelStatus {
    pub fn path(&self) -> &Path {
        match self {
            Self::Downloaded(path) | Self::AlreadyPresent(path) => path,
        }
    }
}

/// Download every kernel in `descriptors` into `dir`, skipping files already present.
///
/// A failed transfer removes its partial file before the error is returned.
pub fn download_kernels(
    descriptors: &[KernelDescriptor],
    dir: &Path,
) -> Result<Vec<KernelStatus>, ImportError> {
    fs::create_dir_all(dir)?;
    let mut statuses = Vec::with_capacity(descriptors.len());
    let mut client = None;

    for descriptor in descriptors {
        let dest = descriptor.path_in(dir);
        if dest.exists() {
            info!(kernel = descriptor.filename, path = %dest.display(), "already present");
            statuses.push(KernelStatus::AlreadyPresent(dest));
            continue;
        }
        let client = match &client {
            Some(client) => client,
            None => client.insert(Client::builder().build()?),
        };
        info!(url = descriptor.url, path = %dest.display(), "downloading kernel");
        if let Err(err) = download_kernel(client, descriptor, &dest) {
            warn!(kernel = descriptor.filename, %err, "download failed");
            let _ = fs::remove_file(&dest);
            return Err(err);
        }
        statuses.push(KernelStatus::Downloaded(dest));
    }

    Ok(statuses)
}

fn download_kernel(
    client: &Client,
    descriptor: &KernelDescriptor,
    dest: &Path,
) -> Result<(), ImportError> {
    let mut response = client.get(descriptor.url).send()?.error_for_status()?;
    let mut file = File::create(dest)?;
    copy(&mut response, &mut file)?;
    Ok(())
}

/// Human-readable byte count (`512 B`, `31.2 MB`).
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit_idx = 0;
    while value >= 1024.0 && unit_idx < UNITS.len() - 1 {
        value /= 1024.0;
        unit_idx += 1;
    }
    if unit_idx == 0 {
        format!("{bytes} {}", UNITS[unit_idx])
    } else {
        format!("{value:.1} {}", UNITS[unit_idx])
    }
}

#[cfg(test)]
mod tests {
    use shadow_ephem_spice::kernels::KERNEL_CATALOG;

    use super::*;

    #[test]
    fn present_kernels_are_not_downloaded() {
        let dir = tempfile::tempdir().unwrap();
        for descriptor in KERNEL_CATALOG {
            fs::write(descriptor.path_in(dir.path()), b"stub").unwrap();
        }
        let statuses = download_kernels(KERNEL_CATALOG, dir.path()).unwrap();
        assert_eq!(statuses.len(), KERNEL_CATALOG.len());
        assert!(
            statuses
                .iter()
                .all(|s| matches!(s, KernelStatus::AlreadyPresent(_)))
        );
        assert_eq!(statuses[0].path(), dir.path().join("naif0012.tls"));
    }

    #[test]
    fn sizes_are_scaled_to_binary_units() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(32 * 1024 * 1024 + 200 * 1024), "32.2 MB");
    }
}
