//! CSPICE calls and the [`SpiceAstronomy`] service built on them.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::sync::{Mutex, MutexGuard, OnceLock};

use chrono::{DateTime, Utc};
use cspice_sys::{
    SpiceBoolean, SpiceDouble, SpiceInt, bodvrd_c, erract_c, failed_c, furnsh_c, getmsg_c,
    kclear_c, pxform_c, reset_c, spkpos_c, str2et_c,
};
use shadow_astro::topocentric::LocalFrame;
use shadow_astro::{AstroError, AstronomyService, Ellipsoid, Geodetic, Horizontal, SunState, sun};
use shadow_core::matrix::{self, Matrix3};
use shadow_core::vector::{self, Vector3};
use tracing::{debug, info, trace};

use crate::EphemerisError;
use crate::kernels::{KERNEL_CATALOG, KernelDescriptor};

/// Planet-fixed frame rotated into J2000 for every query.
const BODY_FRAME: &str = "IAU_EARTH";
const INERTIAL_FRAME: &str = "J2000";

static INITIALIZED: OnceLock<()> = OnceLock::new();
static INITIALIZE_LOCK: Mutex<()> = Mutex::new(());
/// CSPICE keeps global error state; one call sequence at a time.
static CALL_LOCK: Mutex<()> = Mutex::new(());

fn lock(mutex: &'static Mutex<()>) -> MutexGuard<'static, ()> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Furnish every catalog kernel once per process.
pub fn load_default_kernels() -> Result<(), EphemerisError> {
    if INITIALIZED.get().is_some() {
        return Ok(());
    }
    let _init = lock(&INITIALIZE_LOCK);
    if INITIALIZED.get().is_some() {
        return Ok(());
    }
    initialize_spice()?;
    let _ = INITIALIZED.set(());
    info!(kernels = KERNEL_CATALOG.len(), "SPICE kernels loaded");
    Ok(())
}

/// Ephemeris seconds past J2000 for a UTC instant.
pub fn epoch_seconds(instant: DateTime<Utc>) -> Result<f64, EphemerisError> {
    load_default_kernels()?;
    let epoch = instant.format("%Y-%m-%dT%H:%M:%S%.6f").to_string();
    let epoch_c = CString::new(epoch.as_str())
        .map_err(|_| EphemerisError::InvalidEpoch { epoch: epoch.clone() })?;
    let _call = lock(&CALL_LOCK);
    let mut et: SpiceDouble = 0.0;
    unsafe {
        str2et_c(epoch_c.as_ptr() as *mut c_char, &mut et);
    }
    check_for_spice_error()?;
    Ok(et)
}

fn initialize_spice() -> Result<(), EphemerisError> {
    crate::validate_kernel_paths()?;
    let _call = lock(&CALL_LOCK);
    unsafe {
        kclear_c();
    }
    configure_error_handling();
    for descriptor in KERNEL_CATALOG {
        let c_path = path_to_cstring(descriptor)?;
        debug!(kernel = descriptor.filename, "furnsh");
        unsafe {
            furnsh_c(c_path.as_ptr() as *mut c_char);
        }
        check_for_spice_error()?;
    }
    Ok(())
}

fn path_to_cstring(descriptor: &KernelDescriptor) -> Result<CString, EphemerisError> {
    let path = descriptor.local_path();
    let path_str = path
        .to_str()
        .ok_or_else(|| EphemerisError::InvalidKernelPath {
            name: descriptor.filename,
            path: path.clone(),
        })?;
    CString::new(path_str).map_err(|_| EphemerisError::InvalidKernelPath {
        name: descriptor.filename,
        path,
    })
}

fn c_string(value: &str) -> Result<CString, EphemerisError> {
    CString::new(value).map_err(|_| EphemerisError::Spice {
        message: format!("interior NUL in `{value}`"),
    })
}

fn configure_error_handling() {
    const SET: &[u8] = b"SET\0";
    const RETURN_MODE: &[u8] = b"RETURN\0";
    unsafe {
        erract_c(
            SET.as_ptr() as *mut c_char,
            0 as SpiceInt,
            RETURN_MODE.as_ptr() as *mut c_char,
        );
    }
}

fn check_for_spice_error() -> Result<(), EphemerisError> {
    unsafe {
        if failed_c() != 0 as SpiceBoolean {
            const LONG: &[u8] = b"LONG\0";
            let mut buffer = vec![0 as c_char; 1024];
            getmsg_c(
                LONG.as_ptr() as *mut c_char,
                buffer.len() as SpiceInt,
                buffer.as_mut_ptr(),
            );
            reset_c();
            let message = CStr::from_ptr(buffer.as_ptr())
                .to_string_lossy()
                .trim()
                .to_string();
            return Err(EphemerisError::Spice { message });
        }
    }
    Ok(())
}

/// Body-fixed → J2000 rotation at ephemeris time `et`.
fn body_to_inertial(et: f64) -> Result<Matrix3, EphemerisError> {
    let from = c_string(BODY_FRAME)?;
    let to = c_string(INERTIAL_FRAME)?;
    let mut rotation: [[SpiceDouble; 3]; 3] = [[0.0; 3]; 3];
    let _call = lock(&CALL_LOCK);
    unsafe {
        pxform_c(
            from.as_ptr() as *mut c_char,
            to.as_ptr() as *mut c_char,
            et,
            rotation.as_mut_ptr(),
        );
    }
    check_for_spice_error()?;
    Ok(rotation)
}

/// Light-time and stellar-aberration corrected Sun position seen from Earth (J2000, km).
fn sun_position(et: f64) -> Result<Vector3, EphemerisError> {
    let target = c_string("SUN")?;
    let frame = c_string(INERTIAL_FRAME)?;
    let correction = c_string("LT+S")?;
    let observer = c_string("EARTH")?;
    let mut position: [SpiceDouble; 3] = [0.0; 3];
    let mut light_time: SpiceDouble = 0.0;
    let _call = lock(&CALL_LOCK);
    unsafe {
        spkpos_c(
            target.as_ptr() as *mut c_char,
            et,
            frame.as_ptr() as *mut c_char,
            correction.as_ptr() as *mut c_char,
            observer.as_ptr() as *mut c_char,
            position.as_mut_ptr(),
            &mut light_time,
        );
    }
    check_for_spice_error()?;
    trace!(et, light_time, "spkpos SUN");
    Ok(position)
}

/// Earth tri-axial radii from the loaded PCK.
fn earth_radii() -> Result<[f64; 3], EphemerisError> {
    let body = c_string("EARTH")?;
    let item = c_string("RADII")?;
    let mut dim: SpiceInt = 0;
    let mut radii: [SpiceDouble; 3] = [0.0; 3];
    let _call = lock(&CALL_LOCK);
    unsafe {
        bodvrd_c(
            body.as_ptr() as *mut c_char,
            item.as_ptr() as *mut c_char,
            3,
            &mut dim,
            radii.as_mut_ptr(),
        );
    }
    check_for_spice_error()?;
    if dim != 3 {
        return Err(EphemerisError::Spice {
            message: format!("EARTH RADII has {dim} values"),
        });
    }
    Ok(radii)
}

/// Astronomy service answering from NAIF kernels.
///
/// The inertial frame is J2000 centred on Earth; the planet rotates by the
/// `IAU_EARTH` orientation model. The ellipsoid comes from the PCK radii.
#[derive(Debug, Clone, Copy)]
pub struct SpiceAstronomy {
    ellipsoid: Ellipsoid,
}

impl SpiceAstronomy {
    /// Load the kernel catalog and read Earth's shape.
    pub fn new() -> Result<Self, EphemerisError> {
        load_default_kernels()?;
        let radii = earth_radii()?;
        let equatorial = radii[0];
        let polar = radii[2];
        let ellipsoid = Ellipsoid::new(equatorial, (equatorial - polar) / equatorial);
        debug!(equatorial, polar, "SPICE ellipsoid");
        Ok(Self { ellipsoid })
    }

    fn rotation(&self, instant: DateTime<Utc>) -> Result<Matrix3, EphemerisError> {
        body_to_inertial(epoch_seconds(instant)?)
    }
}

impl AstronomyService for SpiceAstronomy {
    fn ellipsoid(&self) -> Ellipsoid {
        self.ellipsoid
    }

    fn geodetic_to_inertial(
        &self,
        point: &Geodetic,
        instant: DateTime<Utc>,
    ) -> Result<Vector3, AstroError> {
        point.validate()?;
        let rotation = self.rotation(instant)?;
        Ok(matrix::mul_vec(&rotation, &self.ellipsoid.to_body_fixed(point)))
    }

    fn sun(&self, instant: DateTime<Utc>) -> Result<SunState, AstroError> {
        let position_km = sun_position(epoch_seconds(instant)?)?;
        Ok(SunState {
            position_km,
            angular_diameter: sun::angular_diameter(vector::norm(&position_km)),
        })
    }

    fn azimuth_elevation(
        &self,
        observer: &Geodetic,
        target_km: &Vector3,
        instant: DateTime<Utc>,
    ) -> Result<Horizontal, AstroError> {
        observer.validate()?;
        let rotation = self.rotation(instant)?;
        let observer_km = matrix::mul_vec(&rotation, &self.ellipsoid.to_body_fixed(observer));
        LocalFrame::at(observer)
            .map(|axis| matrix::mul_vec(&rotation, axis))
            .horizontal(&observer_km, target_km)
    }

    fn dip(&self, point_km: &Vector3, instant: DateTime<Utc>) -> Result<f64, AstroError> {
        if !point_km.iter().all(|c| c.is_finite()) {
            return Err(AstroError::DegenerateVector("non-finite dip point"));
        }
        let rotation = self.rotation(instant)?;
        let body_fixed = matrix::mul_vec(&matrix::transpose(&rotation), point_km);
        Ok(self.ellipsoid.dip(&self.ellipsoid.from_body_fixed(&body_fixed)))
    }
}
