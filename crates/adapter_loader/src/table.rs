//! Loader for tabulated double-differential cross sections.
//!
//! # Format
//!
//! ```text
//! 10.5                                   incident neutrino energy (MeV)
//! 0                                      angle in degrees
//! 0.5660(0) 0.2360(0) 0.1234(-42)        E_total  p_e  d2sigma/dp_e dOmega
//! ...
//! 5
//! ...
//! ```
//!
//! Every numeric field of a data line is `mantissa(exponent)`. Each row is
//! converted to one sample:
//!
//! - `x = E_total - m_e`, clamped at 0 (electron kinetic energy)
//! - `y = cos(theta)`
//! - `value = d2sigma/dp dOmega · 10^50 · 2πE/p`, i.e. per unit kinetic
//!   energy and unit cosine, in units of 10^-50 cm^2/MeV
//!
//! # Example
//!
//! ```
//! use adapter_loader::table::TableLoader;
//!
//! let text = "10.5\n0\n1.0(0) 0.5(0) 2.0(-50)\n2.0(0) 1.5(0) 3.0(-50)\n";
//! let table = TableLoader::load_from_reader(text.as_bytes()).unwrap();
//!
//! assert_eq!(table.set.parameter, 10.5);
//! assert_eq!(table.set.len(), 2);
//! assert!((table.x_max - 1.489).abs() < 1e-12);
//! ```

use crate::error::LoaderError;
use std::f64::consts::PI;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;
use xsec_core::types::SampleSet;

/// Electron rest mass (MeV).
pub const ELECTRON_MASS: f64 = 0.511;

/// Cross sections are stored in units of 10^-50 cm^2.
pub const VALUE_EXPONENT_SHIFT: i32 = 50;

/// One raw data row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableRow {
    /// Total electron energy (MeV)
    pub total_energy: f64,
    /// Electron momentum (MeV)
    pub momentum: f64,
    /// d2sigma / dp dOmega (cm^2 / MeV sr)
    pub cross_section: f64,
}

impl TableRow {
    /// Electron kinetic energy, clamped at 0.
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        (self.total_energy - ELECTRON_MASS).max(0.0)
    }

    /// Cross section per unit kinetic energy and unit cosine, scaled by 10^50.
    ///
    /// `dp/dE = E/p` and `dOmega = 2π dcos(theta)`.
    pub fn converted_value(&self) -> f64 {
        let scaled = self.cross_section * 10f64.powi(VALUE_EXPONENT_SHIFT);
        if scaled == 0.0 {
            0.0
        } else {
            scaled * 2.0 * PI * self.total_energy / self.momentum
        }
    }
}

/// A loaded table.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTable {
    /// Samples grouped by angle; the parameter is the incident energy
    pub set: SampleSet,
    /// Largest kinetic energy observed (0 for a table without data)
    pub x_max: f64,
}

/// Loader for the tabulated text format.
pub struct TableLoader;

impl TableLoader {
    /// Load the table at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<LoadedTable, LoaderError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::load_from_reader(BufReader::new(file))?;
        debug!(
            path = %path.display(),
            energy = table.set.parameter,
            samples = table.set.len(),
            "Loaded cross-section table"
        );
        Ok(table)
    }

    /// Load a table from `reader`.
    pub fn load_from_reader<R: BufRead>(reader: R) -> Result<LoadedTable, LoaderError> {
        let mut lines = reader.lines().enumerate();

        let header = match lines.next() {
            Some((_, line)) => line.map_err(|source| LoaderError::Read { line: 1, source })?,
            None => return Err(LoaderError::Header(String::new())),
        };
        let energy = header
            .split_whitespace()
            .next()
            .and_then(|t| t.parse::<f64>().ok())
            .filter(|e| e.is_finite())
            .ok_or_else(|| LoaderError::Header(header.trim().to_string()))?;

        let mut set = SampleSet::new(energy);
        let mut in_slice = false;
        for (index, line) in lines {
            let number = index + 1;
            let line = line.map_err(|source| LoaderError::Read {
                line: number,
                source,
            })?;
            let text = line.trim();
            if text.is_empty() {
                continue;
            }

            if text.contains('(') {
                if !in_slice {
                    return Err(LoaderError::DataBeforeAngle(number));
                }
                let row = parse_row(text).map_err(|reason| LoaderError::Data {
                    line: number,
                    reason,
                })?;
                if let Some(slice) = set.slices.last_mut() {
                    slice.push(row.kinetic_energy(), row.converted_value());
                }
            } else {
                let degrees: i32 = text.parse().map_err(|_| LoaderError::Angle {
                    line: number,
                    text: text.to_string(),
                })?;
                set.begin_slice(degrees, f64::from(degrees).to_radians().cos());
                in_slice = true;
            }
        }

        let x_max = set.x_max().unwrap_or(0.0);
        Ok(LoadedTable { set, x_max })
    }
}

/// Parse a data line of three `mantissa(exponent)` fields.
///
/// # Example
///
/// ```
/// use adapter_loader::table::parse_row;
///
/// let row = parse_row("1.5(1) 2.0( -1 ) 3.0(-43)").unwrap();
/// assert_eq!(row.total_energy, 15.0);
/// assert_eq!(row.momentum, 0.2);
/// ```
pub fn parse_row(text: &str) -> Result<TableRow, String> {
    let mut rest = text;
    let mut fields = [0.0; 3];
    for (i, field) in fields.iter_mut().enumerate() {
        let (value, tail) = parse_field(rest).map_err(|e| format!("field {}: {}", i + 1, e))?;
        *field = value;
        rest = tail;
    }
    if !rest.trim().is_empty() {
        return Err(format!("unexpected trailing text '{}'", rest.trim()));
    }
    Ok(TableRow {
        total_energy: fields[0],
        momentum: fields[1],
        cross_section: fields[2],
    })
}

/// Parse one `mantissa(exponent)` field from the front of `text`.
fn parse_field(text: &str) -> Result<(f64, &str), String> {
    let open = text.find('(').ok_or("missing '('")?;
    let close = text[open..]
        .find(')')
        .map(|i| open + i)
        .ok_or("missing ')'")?;

    let mantissa_text = text[..open].trim();
    let exponent_text = text[open + 1..close].trim();
    let mantissa: f64 = mantissa_text
        .parse()
        .map_err(|_| format!("invalid mantissa '{}'", mantissa_text))?;
    let exponent: i32 = exponent_text
        .parse()
        .map_err(|_| format!("invalid exponent '{}'", exponent_text))?;

    Ok((mantissa * 10f64.powi(exponent), &text[close + 1..]))
}
