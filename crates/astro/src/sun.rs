//! Low-precision solar ephemeris (Astronomical Almanac, good to ~0.01° for 1950–2050).

use chrono::{DateTime, Utc};
use shadow_core::constants::{AU_KM, SUN_RADIUS_KM};
use shadow_core::time::days_since_j2000;
use shadow_core::vector;

use crate::SunState;

/// Geocentric position of the Sun in the mean equatorial frame of date (km).
pub fn sun_position_km(instant: DateTime<Utc>) -> [f64; 3] {
    let n = days_since_j2000(instant);
    let mean_longitude = (280.460 + 0.985_647_4 * n).to_radians();
    let mean_anomaly = (357.528 + 0.985_600_3 * n).to_radians();
    let ecliptic_longitude = mean_longitude
        + (1.915 * mean_anomaly.sin() + 0.020 * (2.0 * mean_anomaly).sin()).to_radians();
    let obliquity = (23.439 - 0.000_000_4 * n).to_radians();
    let distance_au =
        1.000_14 - 0.016_71 * mean_anomaly.cos() - 0.000_14 * (2.0 * mean_anomaly).cos();

    let (sin_lambda, cos_lambda) = ecliptic_longitude.sin_cos();
    let (sin_eps, cos_eps) = obliquity.sin_cos();
    vector::scale(
        &[cos_lambda, cos_eps * sin_lambda, sin_eps * sin_lambda],
        distance_au * AU_KM,
    )
}

/// Angular diameter (radians) of a sphere of the Sun's radius seen from `distance_km`.
pub fn angular_diameter(distance_km: f64) -> f64 {
    2.0 * (SUN_RADIUS_KM / distance_km).clamp(-1.0, 1.0).asin()
}

/// Solar state at `instant`.
pub fn sun_state(instant: DateTime<Utc>) -> SunState {
    let position_km = sun_position_km(instant);
    SunState {
        position_km,
        angular_diameter: angular_diameter(vector::norm(&position_km)),
    }
}
