//! Named store of surfaces and spectra shared between pipeline stages.
//!
//! Stages never reach for a global store: each receives a
//! [`SurfaceArchive`] by reference. [`MemoryArchive`] is the in-process
//! implementation; file-backed stores live in the infrastructure layer.

use crate::grid::{DenseSurface, Histogram1D};
use crate::types::ArchiveError;
use std::collections::BTreeMap;

/// Archive key for the surface at parameter `p`.
///
/// The parameter is printed to one decimal with the point replaced by `_`.
///
/// # Example
///
/// ```
/// use xsec_core::archive::surface_key;
///
/// assert_eq!(surface_key(10.5), "v10_5");
/// assert_eq!(surface_key(52.8), "v52_8");
/// assert_eq!(surface_key(1.54999999), "v1_5");
/// ```
pub fn surface_key(p: f64) -> String {
    format!("v{:.1}", p).replace('.', "_")
}

/// Key-value store of named surfaces and 1D spectra.
///
/// `put_*` overwrites any entry of the same name; `get` fails with
/// [`ArchiveError::NotFound`] when the name is absent.
pub trait SurfaceArchive {
    /// Surface stored under `name`.
    fn surface(&self, name: &str) -> Result<DenseSurface, ArchiveError>;

    /// Store `surface` under `name`.
    fn put_surface(&mut self, name: &str, surface: &DenseSurface) -> Result<(), ArchiveError>;

    /// Spectrum stored under `name`.
    fn spectrum(&self, name: &str) -> Result<Histogram1D, ArchiveError>;

    /// Store `spectrum` under `name`.
    fn put_spectrum(&mut self, name: &str, spectrum: &Histogram1D) -> Result<(), ArchiveError>;

    /// Names of all stored entries, surfaces first, each group sorted.
    fn names(&self) -> Vec<String>;

    /// Whether a surface or spectrum is stored under `name`.
    fn contains(&self, name: &str) -> bool {
        self.names().iter().any(|n| n == name)
    }
}

/// In-memory archive.
///
/// # Example
///
/// ```
/// use xsec_core::archive::{MemoryArchive, SurfaceArchive};
/// use xsec_core::grid::{DenseSurface, UniformAxis};
///
/// let x = UniformAxis::new(2, 0.0, 1.0).unwrap();
/// let y = UniformAxis::new(1, -1.0, 1.0).unwrap();
///
/// let mut archive = MemoryArchive::new();
/// archive.put_surface("v10_0", &DenseSurface::new("v10_0", x, y)).unwrap();
///
/// assert!(archive.contains("v10_0"));
/// assert!(archive.surface("v11_0").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryArchive {
    surfaces: BTreeMap<String, DenseSurface>,
    spectra: BTreeMap<String, Histogram1D>,
}

impl MemoryArchive {
    /// Empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.surfaces.len() + self.spectra.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SurfaceArchive for MemoryArchive {
    fn surface(&self, name: &str) -> Result<DenseSurface, ArchiveError> {
        self.surfaces
            .get(name)
            .cloned()
            .ok_or_else(|| ArchiveError::NotFound {
                name: name.to_string(),
            })
    }

    fn put_surface(&mut self, name: &str, surface: &DenseSurface) -> Result<(), ArchiveError> {
        self.surfaces.insert(name.to_string(), surface.clone());
        Ok(())
    }

    fn spectrum(&self, name: &str) -> Result<Histogram1D, ArchiveError> {
        self.spectra
            .get(name)
            .cloned()
            .ok_or_else(|| ArchiveError::NotFound {
                name: name.to_string(),
            })
    }

    fn put_spectrum(&mut self, name: &str, spectrum: &Histogram1D) -> Result<(), ArchiveError> {
        self.spectra.insert(name.to_string(), spectrum.clone());
        Ok(())
    }

    fn names(&self) -> Vec<String> {
        self.surfaces.keys().chain(self.spectra.keys()).cloned().collect()
    }

    fn contains(&self, name: &str) -> bool {
        self.surfaces.contains_key(name) || self.spectra.contains_key(name)
    }
}
