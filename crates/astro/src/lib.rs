//! Astronomy service abstraction consumed by the shadow geometry engine.
//!
//! The engine never talks to an ephemeris directly. It asks an
//! [`AstronomyService`] for four things: geodetic→inertial conversion, the
//! solar state, topocentric azimuth/elevation, and horizon dip. The
//! [`AnalyticAstronomy`] implementation covers all four in closed form; the
//! SPICE-backed service lives in `shadow_ephem_spice`.

use chrono::{DateTime, Utc};
use shadow_core::vector::Vector3;
use thiserror::Error;

pub mod analytic;
pub mod ellipsoid;
pub mod sun;
pub mod topocentric;

pub use analytic::AnalyticAstronomy;
pub use ellipsoid::Ellipsoid;

/// Geodetic position on the planet's reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodetic {
    /// Geodetic latitude (radians).
    pub latitude: f64,
    /// East longitude (radians).
    pub longitude: f64,
    /// Height above the ellipsoid (kilometres).
    pub height_km: f64,
}

impl Geodetic {
    pub fn new(latitude: f64, longitude: f64, height_km: f64) -> Self {
        Self {
            latitude,
            longitude,
            height_km,
        }
    }

    /// Build from degrees, converting latitude and longitude to radians.
    pub fn from_degrees(latitude_deg: f64, longitude_deg: f64, height_km: f64) -> Self {
        Self::new(latitude_deg.to_radians(), longitude_deg.to_radians(), height_km)
    }

    /// Same ground point at a different height.
    pub fn with_height(self, height_km: f64) -> Self {
        Self { height_km, ..self }
    }

    /// Reject non-finite values and latitude/longitude outside their domain.
    pub fn validate(&self) -> Result<(), AstroError> {
        use std::f64::consts::{FRAC_PI_2, TAU};

        if !self.latitude.is_finite() || self.latitude.abs() > FRAC_PI_2 {
            return Err(AstroError::OutOfRange {
                what: "latitude",
                value: self.latitude,
            });
        }
        if !self.longitude.is_finite() || self.longitude.abs() > TAU {
            return Err(AstroError::OutOfRange {
                what: "longitude",
                value: self.longitude,
            });
        }
        if !self.height_km.is_finite() {
            return Err(AstroError::OutOfRange {
                what: "height",
                value: self.height_km,
            });
        }
        Ok(())
    }
}

/// Sun position and apparent size at an instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunState {
    /// Inertial position of the Sun relative to the planet centre (km).
    pub position_km: Vector3,
    /// Apparent angular diameter seen from the planet centre (radians).
    pub angular_diameter: f64,
}

/// Azimuth (clockwise from north) and elevation above the local horizontal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Horizontal {
    pub azimuth: f64,
    pub elevation: f64,
    pub range_km: f64,
}

/// Errors surfaced by astronomy services.
#[derive(Debug, Error)]
pub enum AstroError {
    #[error("{what} out of range: {value}")]
    OutOfRange { what: &'static str, value: f64 },
    #[error("degenerate vector: {0}")]
    DegenerateVector(&'static str),
    #[error("ephemeris backend failed: {0}")]
    Backend(String),
}

/// Queries the shadow engine needs from an ephemeris/ellipsoid provider.
///
/// Implementations are pure with respect to `instant`: the same arguments
/// always produce the same answer.
pub trait AstronomyService {
    /// Reference ellipsoid of the planet.
    fn ellipsoid(&self) -> Ellipsoid;

    /// Position of a geodetic point in the planet-centred inertial frame at `instant`.
    fn geodetic_to_inertial(
        &self,
        point: &Geodetic,
        instant: DateTime<Utc>,
    ) -> Result<Vector3, AstroError>;

    /// Solar position and angular diameter at `instant`.
    fn sun(&self, instant: DateTime<Utc>) -> Result<SunState, AstroError>;

    /// Azimuth/elevation of an inertial target as seen from `observer`.
    fn azimuth_elevation(
        &self,
        observer: &Geodetic,
        target_km: &Vector3,
        instant: DateTime<Utc>,
    ) -> Result<Horizontal, AstroError>;

    /// Horizon dip (radians) at the geodetic equivalent of an inertial point.
    fn dip(&self, point_km: &Vector3, instant: DateTime<Utc>) -> Result<f64, AstroError>;
}
