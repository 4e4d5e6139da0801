//! Evaluate every elevator in a catalog at one instant.

use chrono::{DateTime, Utc};
use shadow_astro::AstronomyService;
use shadow_config::ElevatorConfig;
use shadow_geometry::{Elevator, ShadowError, ShadowHeights};
use tracing::debug;

/// Shadow heights of one catalog elevator.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub name: String,
    pub elevator: Elevator,
    pub heights: ShadowHeights,
}

/// Geometric identity of a catalog record.
pub fn elevator_from_config(config: &ElevatorConfig) -> Elevator {
    Elevator::new(config.latitude_deg, config.longitude_deg, config.height_km)
}

/// Shadow heights for each record, in catalog order.
pub fn evaluate_catalog<S: AstronomyService + ?Sized>(
    elevators: &[ElevatorConfig],
    astro: &S,
    instant: DateTime<Utc>,
) -> Result<Vec<CatalogEntry>, ShadowError> {
    elevators
        .iter()
        .map(|config| {
            let elevator = elevator_from_config(config);
            let heights = elevator.at(astro, instant)?.shadow_heights(astro)?;
            debug!(name = %config.name, ?heights, "catalog entry");
            Ok(CatalogEntry {
                name: config.name.clone(),
                elevator,
                heights,
            })
        })
        .collect()
}
