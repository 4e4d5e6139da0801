//! Core units, constants, and shared primitives for the elevator shadow workspace.

/// Physical constants. Lengths are kilometres unless stated otherwise.
pub mod constants {
    /// Kilometres per astronomical unit.
    pub const AU_KM: f64 = 149_597_870.7;
    /// Seconds per Julian day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
    /// Days per Julian century.
    pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;
    /// Julian date of the J2000.0 epoch (2000-01-01T12:00:00 TT).
    pub const J2000_JD: f64 = 2_451_545.0;
    /// Julian date of the Unix epoch (1970-01-01T00:00:00 UTC).
    pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;
    /// Nominal photospheric radius of the Sun (IAU 2015 resolution B3).
    pub const SUN_RADIUS_KM: f64 = 695_700.0;
    /// WGS84 semi-major axis (equatorial radius).
    pub const WGS84_SEMI_MAJOR_KM: f64 = 6_378.137;
    /// WGS84 flattening.
    pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;
}

/// Angle helpers.
pub mod units {
    /// Wrap an angle in radians into `[0, 2π)`.
    #[inline]
    pub fn wrap_two_pi(angle: f64) -> f64 {
        angle.rem_euclid(std::f64::consts::TAU)
    }
}

/// Lightweight time utilities shared across crates.
pub mod time {
    use chrono::{DateTime, Utc};

    use super::constants::{
        DAYS_PER_JULIAN_CENTURY, J2000_JD, SECONDS_PER_DAY, UNIX_EPOCH_JD,
    };
    use super::units::wrap_two_pi;

    /// Convert seconds to days.
    #[inline]
    pub fn seconds_to_days(seconds: f64) -> f64 {
        seconds / SECONDS_PER_DAY
    }

    /// Julian date of a UTC instant.
    pub fn julian_date(instant: DateTime<Utc>) -> f64 {
        let seconds =
            instant.timestamp() as f64 + f64::from(instant.timestamp_subsec_nanos()) * 1.0e-9;
        UNIX_EPOCH_JD + seconds_to_days(seconds)
    }

    /// Days elapsed since J2000.0.
    pub fn days_since_j2000(instant: DateTime<Utc>) -> f64 {
        julian_date(instant) - J2000_JD
    }

    /// Greenwich Mean Sidereal Time in radians (IAU 1982 model, UT1 taken as UTC).
    pub fn gmst(instant: DateTime<Utc>) -> f64 {
        let t = days_since_j2000(instant) / DAYS_PER_JULIAN_CENTURY;
        let seconds = 67_310.548_41 + (876_600.0 * 3_600.0 + 8_640_184.812_866) * t
            + 0.093_104 * t * t
            - 6.2e-6 * t * t * t;
        // 240 sidereal seconds per degree.
        wrap_two_pi((seconds / 240.0).to_radians())
    }
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a 3D vector, kilometres unless stated otherwise.
    pub type Vector3 = [f64; 3];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Vector addition.
    #[inline]
    pub fn add(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }

    /// Negate a vector.
    #[inline]
    pub fn neg(v: &Vector3) -> Vector3 {
        [-v[0], -v[1], -v[2]]
    }

    /// Unit vector along `v`, or `None` when `v` has zero or non-finite length.
    pub fn normalize(v: &Vector3) -> Option<Vector3> {
        let length = norm(v);
        if length > 0.0 && length.is_finite() {
            Some(scale(v, 1.0 / length))
        } else {
            None
        }
    }

    /// Rotate a vector about +z by `angle` radians (right-handed).
    pub fn rotate_z(v: &Vector3, angle: f64) -> Vector3 {
        let (sin, cos) = angle.sin_cos();
        [cos * v[0] - sin * v[1], sin * v[0] + cos * v[1], v[2]]
    }
}

/// Row-major 3×3 matrices over [`vector::Vector3`].
pub mod matrix {
    use super::vector::{Vector3, dot};

    pub type Matrix3 = [[f64; 3]; 3];

    pub const IDENTITY: Matrix3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    /// Outer product `a·bᵗ`.
    pub fn outer(a: &Vector3, b: &Vector3) -> Matrix3 {
        let mut m = [[0.0; 3]; 3];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = a[i] * b[j];
            }
        }
        m
    }

    /// Element-wise difference `a - b`.
    pub fn sub(a: &Matrix3, b: &Matrix3) -> Matrix3 {
        let mut m = *a;
        for (row, other) in m.iter_mut().zip(b) {
            for (value, o) in row.iter_mut().zip(other) {
                *value -= o;
            }
        }
        m
    }

    /// Scale every element.
    pub fn scale(a: &Matrix3, s: f64) -> Matrix3 {
        a.map(|row| row.map(|value| value * s))
    }

    /// Matrix–vector product `M·v`.
    pub fn mul_vec(m: &Matrix3, v: &Vector3) -> Vector3 {
        [dot(&m[0], v), dot(&m[1], v), dot(&m[2], v)]
    }

    /// Transpose.
    pub fn transpose(m: &Matrix3) -> Matrix3 {
        let mut t = [[0.0; 3]; 3];
        for (i, row) in m.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                t[j][i] = *value;
            }
        }
        t
    }

    /// Bilinear form `uᵗ·M·v`.
    pub fn bilinear(u: &Vector3, m: &Matrix3, v: &Vector3) -> f64 {
        dot(u, &mul_vec(m, v))
    }
}
