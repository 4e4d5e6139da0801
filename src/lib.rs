//! Umbra and penumbra exit heights for space elevators and other tall structures.
//!
//! The workspace crates are re-exported here so front-ends depend on a single
//! library: geometry lives in [`geometry`], astronomy services in [`astro`]
//! and [`ephem_spice`], file formats in [`config`] and [`export`], and the
//! vector and time helpers in [`math`].

pub mod backend;
pub mod catalog;

pub use shadow_astro as astro;
pub use shadow_config as config;
pub use shadow_core as math;
pub use shadow_ephem_spice as ephem_spice;
pub use shadow_export as export;
pub use shadow_geometry as geometry;
pub use shadow_importer as importer;

pub use backend::{Backend, BackendError, build_service};
pub use catalog::{CatalogEntry, evaluate_catalog};

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
