use std::env;
use std::path::{Path, PathBuf};

/// Default location of the NAIF kernels, relative to the working directory.
pub const LOCAL_SPICE_DIR: &str = "data/spice";

/// Environment variable overriding [`LOCAL_SPICE_DIR`].
pub const SPICE_DIR_ENV: &str = "ELEVATOR_SHADOW_SPICE_DIR";

/// Directory the kernel catalog is read from and downloaded into.
pub fn kernel_dir() -> PathBuf {
    env::var_os(SPICE_DIR_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(LOCAL_SPICE_DIR))
}

/// SPICE kernel families the shadow service needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelKind {
    /// SPK: ephemerides (Sun position relative to Earth).
    Spk,
    /// LSK: leap seconds (UTC ↔ ET).
    Lsk,
    /// PCK: Earth orientation and radii.
    Pck,
}

impl KernelKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Spk => "SPK (ephemeris)",
            Self::Lsk => "LSK (leap seconds)",
            Self::Pck => "PCK (planetary constants)",
        }
    }
}

/// Metadata describing a kernel in the catalog.
#[derive(Debug, Clone, Copy)]
pub struct KernelDescriptor {
    pub filename: &'static str,
    pub url: &'static str,
    pub kind: KernelKind,
    pub description: &'static str,
}

impl KernelDescriptor {
    /// On-disk path inside [`kernel_dir`].
    pub fn local_path(self) -> PathBuf {
        self.path_in(&kernel_dir())
    }

    pub fn path_in(self, dir: &Path) -> PathBuf {
        dir.join(self.filename)
    }
}

/// Kernels furnished by the SPICE astronomy service, in load order.
pub const KERNEL_CATALOG: &[KernelDescriptor] = &[
    KernelDescriptor {
        filename: "naif0012.tls",
        url: "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/lsk/naif0012.tls",
        kind: KernelKind::Lsk,
        description: "NAIF leap seconds kernel for UTC to ephemeris time conversion.",
    },
    KernelDescriptor {
        filename: "pck00011.tpc",
        url: "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/pck/pck00011.tpc",
        kind: KernelKind::Pck,
        description: "Planetary constants: IAU_EARTH orientation model and Earth radii.",
    },
    KernelDescriptor {
        filename: "de440s.bsp",
        url: "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/spk/planets/de440s.bsp",
        kind: KernelKind::Spk,
        description: "JPL DE440 short ephemeris: Sun and Earth positions (1550–2650).",
    },
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn catalog_covers_each_kind_once() {
        let kinds: HashSet<_> = KERNEL_CATALOG.iter().map(|k| k.kind).collect();
        assert_eq!(kinds.len(), 3);
        assert_eq!(KERNEL_CATALOG[0].kind, KernelKind::Lsk);
    }

    #[test]
    fn urls_point_at_naif_generic_kernels() {
        for kernel in KERNEL_CATALOG {
            assert!(kernel.url.starts_with("https://naif.jpl.nasa.gov/pub/naif/generic_kernels/"));
            assert!(kernel.url.ends_with(kernel.filename));
        }
    }

    #[test]
    fn path_in_joins_the_filename() {
        let path = KERNEL_CATALOG[2].path_in(Path::new("/tmp/kernels"));
        assert_eq!(path, Path::new("/tmp/kernels/de440s.bsp"));
    }
}
