//! Double-napped cones and the line–cone intersection solver.

use shadow_core::matrix::{self, IDENTITY, Matrix3};
use shadow_core::vector::{self, Vector3};
use tracing::trace;

use crate::ShadowError;

/// Cone with apex `vertex`, unit `axis` pointing the way it opens, and half-angle `half_angle`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cone {
    pub vertex: Vector3,
    pub axis: Vector3,
    pub half_angle: f64,
}

impl Cone {
    /// Validated cone. The axis is normalized; the half-angle must lie in `[0, π]`.
    pub fn new(vertex: Vector3, axis: Vector3, half_angle: f64) -> Result<Self, ShadowError> {
        if !vertex.iter().all(|c| c.is_finite()) {
            return Err(ShadowError::DegenerateGeometry("cone vertex is not finite"));
        }
        let axis = vector::normalize(&axis)
            .ok_or(ShadowError::DegenerateGeometry("cone axis has no direction"))?;
        if !(0.0..=std::f64::consts::PI).contains(&half_angle) {
            return Err(ShadowError::InvalidCone { half_angle });
        }
        Ok(Self {
            vertex,
            axis,
            half_angle,
        })
    }

    /// Point reflection through the origin: vertex and axis negated, same half-angle.
    pub fn reflected(&self) -> Self {
        Self {
            vertex: vector::neg(&self.vertex),
            axis: vector::neg(&self.axis),
            half_angle: self.half_angle,
        }
    }

    /// Intersect the line `origin + t·direction` with this cone.
    pub fn intersect_line(&self, origin: &Vector3, direction: &Vector3) -> Intersection {
        intersect(&self.vertex, &self.axis, self.half_angle, origin, direction)
    }
}

/// Classified line–cone intersection. Parameters are distances along the line direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intersection {
    None,
    /// Single (grazing) root.
    Ray(f64),
    /// Two roots in solver order, which is not numeric order.
    Segment(f64, f64),
}

impl Intersection {
    /// All roots, in solver order.
    pub fn parameters(&self) -> Vec<f64> {
        match *self {
            Intersection::None => Vec::new(),
            Intersection::Ray(t) => vec![t],
            Intersection::Segment(t1, t2) => vec![t1, t2],
        }
    }

    /// Furthest root along the line.
    pub fn far(&self) -> Option<f64> {
        match *self {
            Intersection::None => None,
            Intersection::Ray(t) => Some(t),
            Intersection::Segment(t1, t2) => Some(t1.max(t2)),
        }
    }

    /// Nearest root along the line.
    pub fn near(&self) -> Option<f64> {
        match *self {
            Intersection::None => None,
            Intersection::Ray(t) => Some(t),
            Intersection::Segment(t1, t2) => Some(t1.min(t2)),
        }
    }
}

/// Coefficients of `c2·t² + 2·c1·t + c0 = 0` for a line against a cone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticCoefficients {
    pub c0: f64,
    pub c1: f64,
    pub c2: f64,
}

impl QuadraticCoefficients {
    pub fn new(
        vertex: &Vector3,
        axis: &Vector3,
        half_angle: f64,
        origin: &Vector3,
        direction: &Vector3,
    ) -> Self {
        let m = cone_form(axis, half_angle);
        let delta = vector::sub(origin, vertex);
        Self {
            c0: matrix::bilinear(&delta, &m, &delta),
            c1: matrix::bilinear(direction, &m, &delta),
            c2: matrix::bilinear(direction, &m, direction),
        }
    }

    /// `c1² − c0·c2`.
    pub fn discriminant(&self) -> f64 {
        self.c1 * self.c1 - self.c0 * self.c2
    }

    /// Value of the quadratic at `t`.
    pub fn evaluate(&self, t: f64) -> f64 {
        self.c2 * t * t + 2.0 * self.c1 * t + self.c0
    }
}

/// `A·Aᵗ − cos²Θ·I`.
fn cone_form(axis: &Vector3, half_angle: f64) -> Matrix3 {
    let cos = half_angle.cos();
    matrix::sub(&matrix::outer(axis, axis), &matrix::scale(&IDENTITY, cos * cos))
}

/// Intersect the line `origin + t·direction` with the double cone `(vertex, axis, half_angle)`.
///
/// `axis` and `direction` must be unit vectors and `half_angle` must lie in
/// `[0, π]`; [`Cone::new`] enforces this for callers that need it. Both nappes
/// count. A line parallel to a ruling (`c2 == 0`) is reported as
/// [`Intersection::None`].
pub fn intersect(
    vertex: &Vector3,
    axis: &Vector3,
    half_angle: f64,
    origin: &Vector3,
    direction: &Vector3,
) -> Intersection {
    let q = QuadraticCoefficients::new(vertex, axis, half_angle, origin, direction);
    trace!(c0 = q.c0, c1 = q.c1, c2 = q.c2, "line-cone quadratic");

    if q.c2 == 0.0 {
        return Intersection::None;
    }
    let disc = q.discriminant();
    if disc > 0.0 {
        let root = disc.sqrt();
        Intersection::Segment((-q.c1 + root) / q.c2, (-q.c1 - root) / q.c2)
    } else if disc == 0.0 {
        Intersection::Ray(-q.c1 / q.c2)
    } else {
        Intersection::None
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_4, FRAC_PI_6, PI};

    use super::*;

    const Z: Vector3 = [0.0, 0.0, 1.0];
    const ORIGIN: Vector3 = [0.0, 0.0, 0.0];

    #[test]
    fn crossing_line_yields_segment_with_roots_on_the_cone() {
        let origin = [-3.0, 0.0, 2.0];
        let direction = [1.0, 0.0, 0.0];
        let hit = intersect(&ORIGIN, &Z, FRAC_PI_4, &origin, &direction);
        let Intersection::Segment(t1, t2) = hit else {
            panic!("expected a segment, got {hit:?}");
        };
        let q = QuadraticCoefficients::new(&ORIGIN, &Z, FRAC_PI_4, &origin, &direction);
        for t in [t1, t2] {
            assert!(q.evaluate(t).abs() < 1e-9, "residual at {t}");
        }
        assert!((hit.near().unwrap() - 1.0).abs() < 1e-9);
        assert!((hit.far().unwrap() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn solver_order_follows_the_sign_of_c2() {
        // Shallow crossing: c2 < 0, so the "+" root is the smaller one.
        let hit = intersect(&ORIGIN, &Z, FRAC_PI_4, &[-3.0, 0.0, 2.0], &[1.0, 0.0, 0.0]);
        let Intersection::Segment(first, second) = hit else {
            panic!("expected a segment");
        };
        assert!(first < second);

        // Steep crossing along the axis: c2 > 0, so the "+" root is the larger one.
        let hit = intersect(&ORIGIN, &Z, FRAC_PI_6, &[0.0, 1.0, -10.0], &Z);
        let Intersection::Segment(first, second) = hit else {
            panic!("expected a segment");
        };
        assert!(first > second);
        assert_eq!(hit.far(), Some(first));
    }

    #[test]
    fn grazing_line_yields_a_single_ray_root() {
        // A zero half-angle cone collapses onto its axis; a line crossing the axis touches it once.
        let hit = intersect(&ORIGIN, &Z, 0.0, &[0.0, -1.0, 5.0], &[0.0, 1.0, 0.0]);
        assert_eq!(hit, Intersection::Ray(1.0));
        assert_eq!(hit.parameters(), vec![1.0]);

        let hit = intersect(&ORIGIN, &Z, PI, &[0.0, -1.0, 5.0], &[0.0, 1.0, 0.0]);
        assert_eq!(hit, Intersection::Ray(1.0));
    }

    #[test]
    fn negative_discriminant_is_a_miss_not_a_ray() {
        let q = QuadraticCoefficients::new(&ORIGIN, &Z, FRAC_PI_6, &[10.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);
        assert!(q.discriminant() < 0.0);
        let hit = intersect(&ORIGIN, &Z, FRAC_PI_6, &[10.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);
        assert_eq!(hit, Intersection::None);
        assert_eq!(hit.far(), None);
        assert!(hit.parameters().is_empty());
    }

    #[test]
    fn line_parallel_to_a_ruling_is_reported_as_none() {
        let hit = intersect(&ORIGIN, &Z, 0.0, &[1.0, 0.0, 0.0], &Z);
        assert_eq!(hit, Intersection::None);
    }

    #[test]
    fn opposite_nappe_intersections_are_kept() {
        // Line along the axis through the apex meets both nappes when offset slightly.
        let hit = intersect(&ORIGIN, &Z, FRAC_PI_6, &[0.0, 1.0, -10.0], &Z);
        let near = hit.near().unwrap();
        let far = hit.far().unwrap();
        assert!(-10.0 + near < 0.0, "near root on the lower nappe");
        assert!(-10.0 + far > 0.0, "far root on the upper nappe");
    }

    #[test]
    fn reflected_cone_matches_negated_arguments() {
        let cone = Cone::new([1.0, 2.0, -3.0], [0.0, 2.0, 0.0], 2.9).unwrap();
        assert_eq!(cone.axis, [0.0, 1.0, 0.0]);
        let mirror = cone.reflected();
        let origin = [4.0, -1.0, 0.5];
        let direction = vector::normalize(&[0.3, 0.9, -0.1]).unwrap();
        assert_eq!(
            mirror.intersect_line(&origin, &direction),
            intersect(
                &vector::neg(&cone.vertex),
                &vector::neg(&cone.axis),
                cone.half_angle,
                &origin,
                &direction
            )
        );
    }

    #[test]
    fn cone_construction_rejects_bad_inputs() {
        assert!(matches!(
            Cone::new(ORIGIN, [0.0, 0.0, 0.0], 1.0),
            Err(ShadowError::DegenerateGeometry(_))
        ));
        assert!(matches!(
            Cone::new(ORIGIN, Z, 3.5),
            Err(ShadowError::InvalidCone { .. })
        ));
        assert!(matches!(
            Cone::new(ORIGIN, Z, -0.1),
            Err(ShadowError::InvalidCone { .. })
        ));
        assert!(Cone::new([f64::NAN, 0.0, 0.0], Z, 1.0).is_err());
    }
}
