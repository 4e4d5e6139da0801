//! Umbra/penumbra cone construction and exit-height reduction.

use std::f64::consts::FRAC_PI_2;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shadow_astro::{AstronomyService, SunState};
use shadow_core::vector;
use tracing::debug;

use crate::ShadowError;
use crate::cone::Cone;
use crate::elevator::ElevatorState;

/// Heights (km above the base) at which the structure leaves each shadow.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ShadowHeights {
    pub umbra_km: f64,
    pub penumbra_km: f64,
}

impl ShadowHeights {
    /// Fully sunlit.
    pub const NONE: ShadowHeights = ShadowHeights {
        umbra_km: 0.0,
        penumbra_km: 0.0,
    };

    pub fn in_umbra(&self) -> bool {
        self.umbra_km > 0.0
    }

    pub fn in_penumbra(&self) -> bool {
        self.penumbra_km > 0.0
    }
}

/// Umbral cone and its point reflection, the penumbral cone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowCones {
    pub umbra: Cone,
    pub penumbra: Cone,
}

impl ShadowCones {
    /// Cones cast by the planet for the solar state `sun` at `instant`.
    ///
    /// The umbra apex sits on the anti-solar axis at the distance where the
    /// planet's equatorial radius subtends the Sun's angular radius. Its
    /// half-angle is `π/2` plus the horizon dip seen from the apex.
    pub fn build<S: AstronomyService + ?Sized>(
        astro: &S,
        sun: &SunState,
        instant: DateTime<Utc>,
    ) -> Result<Self, ShadowError> {
        let sun_unit = vector::normalize(&sun.position_km)
            .ok_or(ShadowError::DegenerateGeometry("sun position has no direction"))?;
        let angular_radius = sun.angular_diameter / 2.0;
        if !(angular_radius > 0.0 && angular_radius.is_finite()) {
            return Err(ShadowError::DegenerateGeometry(
                "sun angular diameter must be positive",
            ));
        }

        let radius = astro.ellipsoid().semi_major_km;
        let vertex = vector::scale(&vector::neg(&sun_unit), radius / angular_radius);
        let dip = astro.dip(&vertex, instant)?;
        let umbra = Cone::new(vertex, sun_unit, FRAC_PI_2 + dip)?;
        debug!(
            apex_distance_km = radius / angular_radius,
            half_angle = umbra.half_angle,
            "shadow cones"
        );

        Ok(Self {
            umbra,
            penumbra: umbra.reflected(),
        })
    }
}

/// Exit heights of the umbra and penumbra along the elevator in `state`.
///
/// Returns [`ShadowHeights::NONE`] when the Sun is above the base horizon.
/// Otherwise each height is the furthest intersection of the structure's
/// line with the corresponding cone, clamped into `[0, height]`; a line that
/// misses a cone contributes 0.
pub fn compute_shadow_heights<S: AstronomyService + ?Sized>(
    state: &ElevatorState,
    astro: &S,
) -> Result<ShadowHeights, ShadowError> {
    let elevator = state.elevator();
    let instant = state.instant();

    let top_km = astro.geodetic_to_inertial(&elevator.top(), instant)?;
    let direction = vector::normalize(&top_km)
        .ok_or(ShadowError::DegenerateGeometry("structure top at planet centre"))?;

    let sun = state.sun();
    let horizontal = astro.azimuth_elevation(&elevator.base(), &sun.position_km, instant)?;
    if horizontal.elevation > 0.0 {
        debug!(
            elevation_deg = horizontal.elevation.to_degrees(),
            "sun above base horizon"
        );
        return Ok(ShadowHeights::NONE);
    }

    let cones = ShadowCones::build(astro, sun, instant)?;
    let base = state.base_km();
    let umbra_raw = cones.umbra.intersect_line(base, &direction).far();
    let penumbra_raw = cones.penumbra.intersect_line(base, &direction).far();

    let height = elevator.height_km();
    let heights = ShadowHeights {
        umbra_km: clamp_height(umbra_raw.unwrap_or(0.0), height),
        penumbra_km: clamp_height(penumbra_raw.unwrap_or(0.0), height),
    };
    debug!(
        ?umbra_raw,
        ?penumbra_raw,
        umbra_km = heights.umbra_km,
        penumbra_km = heights.penumbra_km,
        "shadow exit heights"
    );
    Ok(heights)
}

/// Clamp a raw distance along the structure into `[0, height_km]`.
fn clamp_height(raw_km: f64, height_km: f64) -> f64 {
    raw_km.max(0.0).min(height_km)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use shadow_astro::{AnalyticAstronomy, Ellipsoid, Geodetic, Horizontal};
    use shadow_core::vector::Vector3;

    use super::*;
    use crate::cone::intersect;
    use crate::elevator::Elevator;

    #[test]
    fn clamp_keeps_heights_inside_the_structure() {
        assert_eq!(clamp_height(-5.0, 100.0), 0.0);
        assert_eq!(clamp_height(150.0, 100.0), 100.0);
        assert_eq!(clamp_height(42.5, 100.0), 42.5);
        assert_eq!(clamp_height(f64::NAN, 100.0), 0.0);
    }

    #[test]
    fn penumbra_cone_is_the_reflected_umbra() {
        let astro = AnalyticAstronomy::default();
        let instant = Utc.with_ymd_and_hms(2024, 3, 20, 14, 0, 0).unwrap();
        let sun = astro.sun(instant).unwrap();
        let cones = ShadowCones::build(&astro, &sun, instant).unwrap();
        assert_eq!(cones.penumbra.vertex, vector::neg(&cones.umbra.vertex));
        assert_eq!(cones.penumbra.axis, vector::neg(&cones.umbra.axis));
        assert_eq!(cones.penumbra.half_angle, cones.umbra.half_angle);

        let origin = astro
            .geodetic_to_inertial(&Geodetic::from_degrees(0.0, 120.0, 0.0), instant)
            .unwrap();
        let direction = vector::normalize(&origin).unwrap();
        assert_eq!(
            cones.penumbra.intersect_line(&origin, &direction),
            intersect(
                &vector::neg(&cones.umbra.vertex),
                &vector::neg(&cones.umbra.axis),
                cones.umbra.half_angle,
                &origin,
                &direction,
            )
        );
    }

    #[test]
    fn umbra_apex_lies_far_behind_the_planet() {
        let astro = AnalyticAstronomy::default();
        let instant = Utc.with_ymd_and_hms(2024, 7, 4, 0, 0, 0).unwrap();
        let sun = astro.sun(instant).unwrap();
        let cones = ShadowCones::build(&astro, &sun, instant).unwrap();
        let apex_distance = vector::norm(&cones.umbra.vertex);
        // Earth's umbra is roughly 1.4 million km long.
        assert!((1.3e6..1.45e6).contains(&apex_distance), "{apex_distance}");
        assert!(vector::dot(&cones.umbra.vertex, &sun.position_km) < 0.0);
        // Effective opening angle equals the Sun's angular radius.
        let opening = std::f64::consts::PI - cones.umbra.half_angle;
        assert!((opening - sun.angular_diameter / 2.0).abs() < 1e-4);
    }

    /// Service with a fixed Sun and no rotation, for exact geometry checks.
    struct FixedSun {
        sun_km: Vector3,
        elevation: f64,
    }

    impl AstronomyService for FixedSun {
        fn ellipsoid(&self) -> Ellipsoid {
            Ellipsoid::new(6_378.0, 0.0)
        }

        fn geodetic_to_inertial(
            &self,
            point: &Geodetic,
            _instant: DateTime<Utc>,
        ) -> Result<Vector3, shadow_astro::AstroError> {
            Ok(self.ellipsoid().to_body_fixed(point))
        }

        fn sun(&self, _instant: DateTime<Utc>) -> Result<SunState, shadow_astro::AstroError> {
            Ok(SunState {
                position_km: self.sun_km,
                angular_diameter: 0.0093,
            })
        }

        fn azimuth_elevation(
            &self,
            _observer: &Geodetic,
            _target_km: &Vector3,
            _instant: DateTime<Utc>,
        ) -> Result<Horizontal, shadow_astro::AstroError> {
            Ok(Horizontal {
                azimuth: 0.0,
                elevation: self.elevation,
                range_km: 1.0,
            })
        }

        fn dip(
            &self,
            point_km: &Vector3,
            _instant: DateTime<Utc>,
        ) -> Result<f64, shadow_astro::AstroError> {
            let e = self.ellipsoid();
            Ok(e.dip(&e.from_body_fixed(point_km)))
        }
    }

    fn night_side_heights(latitude_deg: f64, height_km: f64) -> ShadowHeights {
        let astro = FixedSun {
            sun_km: [-1.496e8, 0.0, 0.0],
            elevation: -FRAC_PI_2,
        };
        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Elevator::new(latitude_deg, 0.0, height_km)
            .at(&astro, instant)
            .unwrap()
            .shadow_heights(&astro)
            .unwrap()
    }

    #[test]
    fn structure_near_the_antisolar_point_is_fully_shadowed() {
        let heights = night_side_heights(5.0, 50_000.0);
        assert_eq!(heights.umbra_km, 50_000.0);
        assert_eq!(heights.penumbra_km, 50_000.0);
    }

    #[test]
    fn tall_structure_exits_umbra_before_penumbra() {
        let heights = night_side_heights(5.0, 100_000.0);
        assert!((heights.umbra_km - 63_108.9).abs() < 1.0, "{heights:?}");
        assert!((heights.penumbra_km - 70_910.0).abs() < 1.0, "{heights:?}");
    }

    #[test]
    fn positive_sun_elevation_short_circuits() {
        let astro = FixedSun {
            sun_km: [1.496e8, 0.0, 0.0],
            elevation: 1e-9,
        };
        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let heights = Elevator::new(0.0, 0.0, 50_000.0)
            .at(&astro, instant)
            .unwrap()
            .shadow_heights(&astro)
            .unwrap();
        assert_eq!(heights, ShadowHeights::NONE);
        assert!(!heights.in_umbra() && !heights.in_penumbra());
    }

    #[test]
    fn zero_sun_size_is_rejected() {
        let astro = AnalyticAstronomy::default();
        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let sun = SunState {
            position_km: [1.0, 0.0, 0.0],
            angular_diameter: 0.0,
        };
        assert!(matches!(
            ShadowCones::build(&astro, &sun, instant),
            Err(ShadowError::DegenerateGeometry(_))
        ));
    }
}
