//! Shadow geometry for vertical structures on a rotating ellipsoidal planet.
//!
//! An [`Elevator`] is a vertical line rooted at a geodetic point. Taking an
//! [`ElevatorState`] snapshot at an instant fixes its inertial base position
//! and the solar state; [`ElevatorState::shadow_heights`] then intersects the
//! line with the umbral and penumbral cones and reports how high each shadow
//! reaches along the structure.

use shadow_astro::AstroError;
use thiserror::Error;

pub mod cone;
pub mod elevator;
pub mod frame;
pub mod shadow;
pub mod sweep;

pub use cone::{Cone, Intersection, QuadraticCoefficients, intersect};
pub use elevator::{Elevator, ElevatorState};
pub use frame::geodetic_to_inertial;
pub use shadow::{ShadowCones, ShadowHeights, compute_shadow_heights};
pub use sweep::{
    MAX_SWEEP_SAMPLES, ShadowSample, Transition, TransitionKind, sweep, transitions,
};

/// Errors surfaced while building snapshots or evaluating shadows.
#[derive(Debug, Error)]
pub enum ShadowError {
    #[error("astronomy service failed: {0}")]
    Astro(#[from] AstroError),
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(&'static str),
    #[error("cone half-angle {half_angle} rad outside [0, π]")]
    InvalidCone { half_angle: f64 },
    #[error("elevator height must be finite and non-negative (got {0} km)")]
    InvalidHeight(f64),
    #[error(
        "sweep step must be positive, the window must not be reversed, and it may hold at most {} samples",
        MAX_SWEEP_SAMPLES
    )]
    InvalidSweep,
}
