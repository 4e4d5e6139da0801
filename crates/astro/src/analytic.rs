//! Closed-form astronomy service: ellipsoid geometry, GMST rotation, almanac Sun.

use chrono::{DateTime, Utc};
use shadow_core::time::gmst;
use shadow_core::vector::{self, Vector3};
use tracing::trace;

use crate::topocentric::LocalFrame;
use crate::{AstroError, AstronomyService, Ellipsoid, Geodetic, Horizontal, SunState, sun};

/// Astronomy service that needs no kernels or network access.
///
/// The inertial frame is the planet-centred mean equator of date; the planet
/// rotates about +z by Greenwich Mean Sidereal Time.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticAstronomy {
    ellipsoid: Ellipsoid,
}

impl AnalyticAstronomy {
    pub fn new(ellipsoid: Ellipsoid) -> Self {
        Self { ellipsoid }
    }

    /// Body-fixed → inertial rotation angle at `instant`.
    pub fn rotation_angle(&self, instant: DateTime<Utc>) -> f64 {
        gmst(instant)
    }
}

impl AstronomyService for AnalyticAstronomy {
    fn ellipsoid(&self) -> Ellipsoid {
        self.ellipsoid
    }

    fn geodetic_to_inertial(
        &self,
        point: &Geodetic,
        instant: DateTime<Utc>,
    ) -> Result<Vector3, AstroError> {
        point.validate()?;
        let body_fixed = self.ellipsoid.to_body_fixed(point);
        Ok(vector::rotate_z(&body_fixed, self.rotation_angle(instant)))
    }

    fn sun(&self, instant: DateTime<Utc>) -> Result<SunState, AstroError> {
        let state = sun::sun_state(instant);
        trace!(?instant, position_km = ?state.position_km, "analytic sun state");
        Ok(state)
    }

    fn azimuth_elevation(
        &self,
        observer: &Geodetic,
        target_km: &Vector3,
        instant: DateTime<Utc>,
    ) -> Result<Horizontal, AstroError> {
        let observer_km = self.geodetic_to_inertial(observer, instant)?;
        let angle = self.rotation_angle(instant);
        LocalFrame::at(observer)
            .map(|axis| vector::rotate_z(axis, angle))
            .horizontal(&observer_km, target_km)
    }

    fn dip(&self, point_km: &Vector3, instant: DateTime<Utc>) -> Result<f64, AstroError> {
        if !point_km.iter().all(|c| c.is_finite()) {
            return Err(AstroError::DegenerateVector("non-finite dip point"));
        }
        let body_fixed = vector::rotate_z(point_km, -self.rotation_angle(instant));
        let geodetic = self.ellipsoid.from_body_fixed(&body_fixed);
        Ok(self.ellipsoid.dip(&geodetic))
    }
}
