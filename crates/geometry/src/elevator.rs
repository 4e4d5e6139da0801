//! Elevator identity and time-stamped snapshots.

use chrono::{DateTime, Utc};
use shadow_astro::{AstronomyService, Geodetic, SunState};
use shadow_core::vector::Vector3;
use tracing::debug;

use crate::ShadowError;
use crate::shadow::{ShadowHeights, compute_shadow_heights};

/// Vertical structure rooted at a geodetic point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Elevator {
    latitude: f64,
    longitude: f64,
    height_km: f64,
}

impl Elevator {
    /// Latitude and longitude in degrees, height in kilometres.
    pub fn new(latitude_deg: f64, longitude_deg: f64, height_km: f64) -> Self {
        Self::from_radians(latitude_deg.to_radians(), longitude_deg.to_radians(), height_km)
    }

    pub fn from_radians(latitude: f64, longitude: f64, height_km: f64) -> Self {
        Self {
            latitude,
            longitude,
            height_km,
        }
    }

    /// Latitude (radians).
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude (radians).
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn height_km(&self) -> f64 {
        self.height_km
    }

    /// Ground station at the foot of the structure.
    pub fn base(&self) -> Geodetic {
        Geodetic::new(self.latitude, self.longitude, 0.0)
    }

    /// Top of the structure.
    pub fn top(&self) -> Geodetic {
        self.base().with_height(self.height_km)
    }

    /// Snapshot of the structure and the Sun at `instant`.
    pub fn at<S: AstronomyService + ?Sized>(
        &self,
        astro: &S,
        instant: DateTime<Utc>,
    ) -> Result<ElevatorState, ShadowError> {
        if !self.height_km.is_finite() || self.height_km < 0.0 {
            return Err(ShadowError::InvalidHeight(self.height_km));
        }
        let base_km = astro.geodetic_to_inertial(&self.base(), instant)?;
        let sun = astro.sun(instant)?;
        debug!(%instant, ?base_km, sun_km = ?sun.position_km, "elevator snapshot");
        Ok(ElevatorState {
            elevator: *self,
            instant,
            base_km,
            sun,
        })
    }
}

/// Immutable view of an [`Elevator`] at one instant.
///
/// Base position and solar state are always computed together; moving to a
/// new instant builds a new snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevatorState {
    elevator: Elevator,
    instant: DateTime<Utc>,
    base_km: Vector3,
    sun: SunState,
}

impl ElevatorState {
    pub fn elevator(&self) -> &Elevator {
        &self.elevator
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    /// Inertial position of the base (km).
    pub fn base_km(&self) -> &Vector3 {
        &self.base_km
    }

    pub fn sun(&self) -> &SunState {
        &self.sun
    }

    /// Fresh snapshot of the same elevator at `instant`.
    pub fn set_time<S: AstronomyService + ?Sized>(
        &self,
        astro: &S,
        instant: DateTime<Utc>,
    ) -> Result<ElevatorState, ShadowError> {
        self.elevator.at(astro, instant)
    }

    /// Umbra and penumbra exit heights for this snapshot.
    pub fn shadow_heights<S: AstronomyService + ?Sized>(
        &self,
        astro: &S,
    ) -> Result<ShadowHeights, ShadowError> {
        compute_shadow_heights(self, astro)
    }
}
