//! # infra_store: File-Backed Surface Archive
//!
//! [`JsonArchive`] persists the pipeline's named surfaces and spectra so that
//! each stage can run as a separate process. The archive is a directory:
//!
//! ```text
//! <root>/
//!   surfaces/v10_0.json
//!   surfaces/fluxW.json
//!   spectra/SNSflux.json
//! ```
//!
//! Every `put_*` writes its entry immediately through a temporary file and
//! a rename, so a crash never leaves a half-written document behind.
//! Entries are re-checked on load: the contents length must match the axes.

#![deny(missing_docs)]

use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use xsec_core::archive::SurfaceArchive;
use xsec_core::grid::{DenseSurface, Histogram1D, UniformAxis};
use xsec_core::types::ArchiveError;

const SURFACE_DIR: &str = "surfaces";
const SPECTRUM_DIR: &str = "spectra";
const EXTENSION: &str = "json";

/// Directory-backed archive with one JSON document per entry.
///
/// # Example
///
/// ```no_run
/// use infra_store::JsonArchive;
/// use xsec_core::archive::SurfaceArchive;
///
/// let archive = JsonArchive::open("outfiles/diffxsections").unwrap();
/// let surface = archive.surface("v10_0").unwrap();
/// println!("{}", surface.title());
/// ```
#[derive(Debug, Clone)]
pub struct JsonArchive {
    root: PathBuf,
}

impl JsonArchive {
    /// Open the archive at `root`, creating the directory layout if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ArchiveError> {
        let root = root.into();
        for sub in [SURFACE_DIR, SPECTRUM_DIR] {
            let dir = root.join(sub);
            fs::create_dir_all(&dir).map_err(|e| io_error(&dir, e))?;
        }
        debug!(root = %root.display(), "Opened archive");
        Ok(Self { root })
    }

    /// Archive root directory.
    pub fn directory(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, sub: &str, name: &str) -> Result<PathBuf, ArchiveError> {
        if name.is_empty()
            || name.starts_with('.')
            || name.contains(|c: char| c == '/' || c == '\\' || c.is_control())
        {
            return Err(ArchiveError::Io(format!("invalid entry name '{}'", name)));
        }
        Ok(self.root.join(sub).join(format!("{}.{}", name, EXTENSION)))
    }

    fn read_entry<T: serde::de::DeserializeOwned>(
        &self,
        sub: &str,
        name: &str,
    ) -> Result<T, ArchiveError> {
        let path = self.entry_path(sub, name)?;
        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ArchiveError::NotFound {
                    name: name.to_string(),
                })
            }
            Err(e) => return Err(io_error(&path, e)),
        };
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| ArchiveError::Serialization(format!("{}: {}", path.display(), e)))
    }

    fn write_entry<T: serde::Serialize>(
        &self,
        sub: &str,
        name: &str,
        value: &T,
    ) -> Result<(), ArchiveError> {
        let path = self.entry_path(sub, name)?;
        let tmp = path.with_extension("json.tmp");

        let file = fs::File::create(&tmp).map_err(|e| io_error(&tmp, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, value)
            .map_err(|e| ArchiveError::Serialization(format!("{}: {}", name, e)))?;
        writer.flush().map_err(|e| io_error(&tmp, e))?;
        drop(writer);

        fs::rename(&tmp, &path).map_err(|e| io_error(&path, e))?;
        debug!(name, path = %path.display(), "Stored archive entry");
        Ok(())
    }

    fn list(&self, sub: &str) -> Vec<String> {
        let mut names: Vec<String> = match fs::read_dir(self.root.join(sub)) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == EXTENSION))
                .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(String::from))
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }
}

fn io_error(path: &Path, e: std::io::Error) -> ArchiveError {
    ArchiveError::Io(format!("{}: {}", path.display(), e))
}

fn check_axis(name: &str, axis: &UniformAxis) -> Result<(), ArchiveError> {
    UniformAxis::new(axis.n_bins(), axis.min(), axis.max())
        .map(|_| ())
        .map_err(|e| ArchiveError::Serialization(format!("{}: {}", name, e)))
}

fn check_length(name: &str, got: usize, expected: usize) -> Result<(), ArchiveError> {
    if got != expected {
        return Err(ArchiveError::Serialization(format!(
            "{}: {} values stored for {} bins",
            name, got, expected
        )));
    }
    Ok(())
}

impl SurfaceArchive for JsonArchive {
    fn surface(&self, name: &str) -> Result<DenseSurface, ArchiveError> {
        let surface: DenseSurface = self.read_entry(SURFACE_DIR, name)?;
        check_axis(name, surface.x_axis())?;
        check_axis(name, surface.y_axis())?;
        check_length(
            name,
            surface.contents().len(),
            surface.x_axis().n_bins() * surface.y_axis().n_bins(),
        )?;
        Ok(surface)
    }

    fn put_surface(&mut self, name: &str, surface: &DenseSurface) -> Result<(), ArchiveError> {
        self.write_entry(SURFACE_DIR, name, surface)
    }

    fn spectrum(&self, name: &str) -> Result<Histogram1D, ArchiveError> {
        let spectrum: Histogram1D = self.read_entry(SPECTRUM_DIR, name)?;
        check_axis(name, spectrum.axis())?;
        check_length(name, spectrum.contents().len(), spectrum.axis().n_bins())?;
        Ok(spectrum)
    }

    fn put_spectrum(&mut self, name: &str, spectrum: &Histogram1D) -> Result<(), ArchiveError> {
        self.write_entry(SPECTRUM_DIR, name, spectrum)
    }

    fn names(&self) -> Vec<String> {
        let mut names = self.list(SURFACE_DIR);
        names.extend(self.list(SPECTRUM_DIR));
        names
    }

    fn contains(&self, name: &str) -> bool {
        [SURFACE_DIR, SPECTRUM_DIR].iter().any(|sub| {
            self.entry_path(sub, name)
                .map(|path| path.is_file())
                .unwrap_or(false)
        })
    }
}
