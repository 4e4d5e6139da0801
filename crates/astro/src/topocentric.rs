//! Topocentric (east/north/up) frames and azimuth/elevation reduction.

use shadow_core::units::wrap_two_pi;
use shadow_core::vector::{self, Vector3};

use crate::{AstroError, Geodetic, Horizontal};

/// Local east/north/up unit vectors of a geodetic point, in the body-fixed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    pub east: Vector3,
    pub north: Vector3,
    pub up: Vector3,
}

impl LocalFrame {
    /// Frame whose `up` is the ellipsoid normal at `point`.
    pub fn at(point: &Geodetic) -> Self {
        let (sin_lat, cos_lat) = point.latitude.sin_cos();
        let (sin_lon, cos_lon) = point.longitude.sin_cos();
        Self {
            east: [-sin_lon, cos_lon, 0.0],
            north: [-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat],
            up: [cos_lat * cos_lon, cos_lat * sin_lon, sin_lat],
        }
    }

    /// Apply the same transform to all three axes.
    pub fn map(self, f: impl Fn(&Vector3) -> Vector3) -> Self {
        Self {
            east: f(&self.east),
            north: f(&self.north),
            up: f(&self.up),
        }
    }

    /// Azimuth/elevation of `target_km` seen from `observer_km`; all vectors share one frame.
    pub fn horizontal(
        &self,
        observer_km: &Vector3,
        target_km: &Vector3,
    ) -> Result<Horizontal, AstroError> {
        let line_of_sight = vector::sub(target_km, observer_km);
        let range_km = vector::norm(&line_of_sight);
        let unit = vector::normalize(&line_of_sight)
            .ok_or(AstroError::DegenerateVector("target coincides with observer"))?;
        let elevation = vector::dot(&unit, &self.up).clamp(-1.0, 1.0).asin();
        let azimuth = wrap_two_pi(
            vector::dot(&unit, &self.east).atan2(vector::dot(&unit, &self.north)),
        );
        Ok(Horizontal {
            azimuth,
            elevation,
            range_km,
        })
    }
}
