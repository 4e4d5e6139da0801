//! Selection of the astronomy service behind the shadow engine.

use shadow_astro::{AnalyticAstronomy, AstronomyService, Ellipsoid};
use shadow_ephem_spice::EphemerisError;
use thiserror::Error;
use tracing::{info, warn};

/// Astronomy backend chosen on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Backend {
    /// Closed-form ellipsoid, GMST rotation and almanac Sun.
    #[default]
    Analytic,
    /// NAIF kernels through CSPICE (needs the `spice` feature).
    Spice,
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("this build has no SPICE support; rebuild with `--features spice`")]
    SpiceUnavailable,
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
}

/// Build the service for `backend`.
///
/// `ellipsoid` overrides the analytic planet model; the SPICE backend always
/// reads radii from its planetary constants kernel.
pub fn build_service(
    backend: Backend,
    ellipsoid: Option<Ellipsoid>,
) -> Result<Box<dyn AstronomyService>, BackendError> {
    match backend {
        Backend::Analytic => {
            let ellipsoid = ellipsoid.unwrap_or_default();
            info!(
                semi_major_km = ellipsoid.semi_major_km,
                flattening = ellipsoid.flattening,
                "analytic astronomy backend"
            );
            Ok(Box::new(AnalyticAstronomy::new(ellipsoid)))
        }
        Backend::Spice => {
            if ellipsoid.is_some() {
                warn!("planet model ignored by the SPICE backend");
            }
            spice_service()
        }
    }
}

#[cfg(feature = "spice")]
fn spice_service() -> Result<Box<dyn AstronomyService>, BackendError> {
    for kernel in shadow_ephem_spice::missing_kernels() {
        warn!(kernel = kernel.filename, "missing; run `fetch_spice` first");
    }
    let service = shadow_ephem_spice::SpiceAstronomy::new()?;
    info!("SPICE astronomy backend");
    Ok(Box::new(service))
}

#[cfg(not(feature = "spice"))]
fn spice_service() -> Result<Box<dyn AstronomyService>, BackendError> {
    Err(BackendError::SpiceUnavailable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analytic_backend_honours_planet_override() {
        let mars = Ellipsoid::new(3_396.2, 1.0 / 169.8);
        let service = build_service(Backend::Analytic, Some(mars)).unwrap();
        assert_eq!(service.ellipsoid(), mars);
        let default = build_service(Backend::default(), None).unwrap();
        assert_eq!(default.ellipsoid(), Ellipsoid::WGS84);
    }

    #[cfg(not(feature = "spice"))]
    #[test]
    fn spice_backend_requires_the_feature() {
        assert!(matches!(
            build_service(Backend::Spice, None),
            Err(BackendError::SpiceUnavailable)
        ));
    }
}
