//! Reference ellipsoid geometry: geodetic ↔ body-fixed conversion and horizon dip.

use shadow_core::constants::{WGS84_FLATTENING, WGS84_SEMI_MAJOR_KM};
use shadow_core::vector::Vector3;

use crate::Geodetic;

/// Heights closer to the surface than this (km) have no measurable dip.
const DIP_HEIGHT_EPSILON_KM: f64 = 1.0e-6;

/// Oblate ellipsoid of revolution described by its equatorial radius and flattening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    pub semi_major_km: f64,
    pub flattening: f64,
}

impl Ellipsoid {
    pub const WGS84: Ellipsoid = Ellipsoid {
        semi_major_km: WGS84_SEMI_MAJOR_KM,
        flattening: WGS84_FLATTENING,
    };

    pub fn new(semi_major_km: f64, flattening: f64) -> Self {
        Self {
            semi_major_km,
            flattening,
        }
    }

    /// Polar radius.
    pub fn semi_minor_km(&self) -> f64 {
        self.semi_major_km * (1.0 - self.flattening)
    }

    /// First eccentricity squared.
    pub fn eccentricity_squared(&self) -> f64 {
        self.flattening * (2.0 - self.flattening)
    }

    /// Prime-vertical radius of curvature at `latitude`.
    fn prime_vertical_radius(&self, latitude: f64) -> f64 {
        let sin = latitude.sin();
        self.semi_major_km / (1.0 - self.eccentricity_squared() * sin * sin).sqrt()
    }

    /// Body-fixed cartesian position (km) of a geodetic point.
    pub fn to_body_fixed(&self, point: &Geodetic) -> Vector3 {
        let e2 = self.eccentricity_squared();
        let n = self.prime_vertical_radius(point.latitude);
        let (sin_lat, cos_lat) = point.latitude.sin_cos();
        let (sin_lon, cos_lon) = point.longitude.sin_cos();
        [
            (n + point.height_km) * cos_lat * cos_lon,
            (n + point.height_km) * cos_lat * sin_lon,
            (n * (1.0 - e2) + point.height_km) * sin_lat,
        ]
    }

    /// Geodetic coordinates of a body-fixed position (Bowring's closed form).
    pub fn from_body_fixed(&self, position: &Vector3) -> Geodetic {
        let a = self.semi_major_km;
        let b = self.semi_minor_km();
        let e2 = self.eccentricity_squared();
        let ep2 = (a * a - b * b) / (b * b);
        let [x, y, z] = *position;
        let p = x.hypot(y);

        if p < 1.0e-9 * a {
            let latitude = std::f64::consts::FRAC_PI_2.copysign(z);
            return Geodetic::new(latitude, 0.0, z.abs() - b);
        }

        let theta = (z * a).atan2(p * b);
        let (sin_t, cos_t) = theta.sin_cos();
        let latitude = (z + ep2 * b * sin_t.powi(3)).atan2(p - e2 * a * cos_t.powi(3));
        let longitude = y.atan2(x);
        let n = self.prime_vertical_radius(latitude);
        let (sin_lat, cos_lat) = latitude.sin_cos();
        let height_km = if cos_lat.abs() > sin_lat.abs() {
            p / cos_lat - n
        } else {
            z / sin_lat - n * (1.0 - e2)
        };
        Geodetic::new(latitude, longitude, height_km)
    }

    /// Geocentric radius of the ellipsoid surface at a geodetic latitude.
    pub fn radius_at(&self, latitude: f64) -> f64 {
        let a = self.semi_major_km;
        let b = self.semi_minor_km();
        let (sin, cos) = latitude.sin_cos();
        let numerator = (a * a * cos).powi(2) + (b * b * sin).powi(2);
        let denominator = (a * cos).powi(2) + (b * sin).powi(2);
        (numerator / denominator).sqrt()
    }

    /// Horizon dip (radians) for an observer at `point`.
    ///
    /// Positive above the surface, negative below it.
    pub fn dip(&self, point: &Geodetic) -> f64 {
        let h = point.height_km;
        if h.abs() < DIP_HEIGHT_EPSILON_KM {
            return 0.0;
        }
        let r = self.radius_at(point.latitude);
        let dip = (r / (r + h.abs())).clamp(-1.0, 1.0).acos();
        if h > 0.0 { dip } else { -dip }
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equator_point_sits_at_semi_major_axis() {
        let p = Ellipsoid::WGS84.to_body_fixed(&Geodetic::new(0.0, 0.0, 0.0));
        assert!((p[0] - WGS84_SEMI_MAJOR_KM).abs() < 1e-9);
        assert!(p[1].abs() < 1e-9 && p[2].abs() < 1e-9);
    }

    #[test]
    fn pole_point_sits_at_semi_minor_axis() {
        let e = Ellipsoid::WGS84;
        let p = e.to_body_fixed(&Geodetic::new(std::f64::consts::FRAC_PI_2, 0.0, 0.0));
        assert!((p[2] - e.semi_minor_km()).abs() < 1e-6);
    }

    #[test]
    fn body_fixed_conversion_inverts() {
        let e = Ellipsoid::WGS84;
        for &(lat, lon, h) in &[
            (45.0_f64, -75.0_f64, 0.0),
            (-33.9, 151.2, 2.5),
            (0.0, 120.0, 100_000.0),
            (80.0, 10.0, 35_786.0),
        ] {
            let geodetic = Geodetic::from_degrees(lat, lon, h);
            let back = e.from_body_fixed(&e.to_body_fixed(&geodetic));
            assert!((back.latitude - geodetic.latitude).abs() < 1e-9, "lat {lat}");
            assert!((back.longitude - geodetic.longitude).abs() < 1e-9, "lon {lon}");
            assert!((back.height_km - h).abs() < 1e-4, "h {h} -> {}", back.height_km);
        }
    }

    #[test]
    fn radius_shrinks_towards_the_pole() {
        let e = Ellipsoid::WGS84;
        let equator = e.radius_at(0.0);
        let pole = e.radius_at(std::f64::consts::FRAC_PI_2);
        assert!((equator - 6_378.137).abs() < 1e-9);
        assert!((pole - 6_356.752).abs() < 1e-3);
    }

    #[test]
    fn dip_grows_with_height_and_flips_sign_below_surface() {
        let e = Ellipsoid::WGS84;
        assert_eq!(e.dip(&Geodetic::new(0.0, 0.0, 0.0)), 0.0);
        let low = e.dip(&Geodetic::new(0.0, 0.0, 0.1));
        let high = e.dip(&Geodetic::new(0.0, 0.0, 1_000.0));
        assert!(low > 0.0 && high > low);
        assert!(e.dip(&Geodetic::new(0.0, 0.0, -0.1)) < 0.0);
        // acos(R / (R + h)) for a 1 km observer is about 1.01 degrees.
        let one_km = e.dip(&Geodetic::new(0.0, 0.0, 1.0)).to_degrees();
        assert!((one_km - 1.0144).abs() < 0.01, "dip {one_km}");
    }
}
