//! Geodetic → inertial frame conversion.

use chrono::{DateTime, Utc};
use shadow_astro::{AstronomyService, Geodetic};
use shadow_core::vector::Vector3;

use crate::ShadowError;

/// Inertial position (km) of a geodetic point at `instant`.
///
/// Latitude and longitude are radians, height is kilometres and is passed
/// through unclamped. The ellipsoid model and planetary rotation belong to
/// `astro`; its errors propagate unchanged.
pub fn geodetic_to_inertial<S: AstronomyService + ?Sized>(
    astro: &S,
    latitude: f64,
    longitude: f64,
    height_km: f64,
    instant: DateTime<Utc>,
) -> Result<Vector3, ShadowError> {
    let point = Geodetic::new(latitude, longitude, height_km);
    Ok(astro.geodetic_to_inertial(&point, instant)?)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use shadow_astro::{AnalyticAstronomy, AstroError};
    use shadow_core::vector;

    use super::*;

    #[test]
    fn height_extends_the_radius_at_the_equator() {
        let astro = AnalyticAstronomy::default();
        let instant = Utc.with_ymd_and_hms(2024, 3, 20, 16, 0, 0).unwrap();
        let lon = 120_f64.to_radians();
        let base = geodetic_to_inertial(&astro, 0.0, lon, 0.0, instant).unwrap();
        let top = geodetic_to_inertial(&astro, 0.0, lon, 100_000.0, instant).unwrap();
        assert!((vector::norm(&top) - vector::norm(&base) - 100_000.0).abs() < 1e-6);
        let cos = vector::dot(&base, &top) / (vector::norm(&base) * vector::norm(&top));
        assert!((cos - 1.0).abs() < 1e-12);
    }

    #[test]
    fn service_errors_propagate_unchanged() {
        let astro = AnalyticAstronomy::default();
        let instant = Utc.with_ymd_and_hms(2024, 3, 20, 16, 0, 0).unwrap();
        let err = geodetic_to_inertial(&astro, 3.0, 0.0, 0.0, instant).unwrap_err();
        assert!(matches!(
            err,
            ShadowError::Astro(AstroError::OutOfRange { what: "latitude", .. })
        ));
    }
}
