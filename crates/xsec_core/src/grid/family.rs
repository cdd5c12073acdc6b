//! Parameter-indexed collection of dense surfaces.

use super::DenseSurface;

/// Parameters closer than this are treated as the same key.
pub const PARAMETER_TOLERANCE: f64 = 1e-6;

/// A surface together with the parameter value it was evaluated at.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyMember {
    /// Parameter value (incident energy)
    pub parameter: f64,
    /// Surface at that parameter
    pub surface: DenseSurface,
}

/// Surfaces keyed by a continuous parameter, kept in ascending order.
///
/// Keys are unique up to [`PARAMETER_TOLERANCE`]; inserting at an existing
/// key replaces the surface stored there.
///
/// # Example
///
/// ```
/// use xsec_core::grid::{DenseSurface, SurfaceFamily, UniformAxis};
///
/// let x = UniformAxis::new(2, 0.0, 1.0).unwrap();
/// let y = UniformAxis::new(1, -1.0, 1.0).unwrap();
///
/// let mut family = SurfaceFamily::new();
/// family.insert(20.0, DenseSurface::new("v20_0", x, y));
/// family.insert(10.0, DenseSurface::new("v10_0", x, y));
///
/// assert_eq!(family.parameters(), vec![10.0, 20.0]);
/// assert!(family.get(10.0).is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceFamily {
    members: Vec<FamilyMember>,
}

impl SurfaceFamily {
    /// Empty family.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the surface at `parameter`.
    pub fn insert(&mut self, parameter: f64, surface: DenseSurface) {
        let pos = self
            .members
            .partition_point(|m| m.parameter < parameter - PARAMETER_TOLERANCE);
        match self.members.get_mut(pos) {
            Some(m) if (m.parameter - parameter).abs() <= PARAMETER_TOLERANCE => {
                m.surface = surface;
            }
            _ => self.members.insert(
                pos,
                FamilyMember {
                    parameter,
                    surface,
                },
            ),
        }
    }

    /// Surface stored at `parameter`.
    pub fn get(&self, parameter: f64) -> Option<&DenseSurface> {
        self.members
            .iter()
            .find(|m| (m.parameter - parameter).abs() <= PARAMETER_TOLERANCE)
            .map(|m| &m.surface)
    }

    /// Members in ascending parameter order.
    #[inline]
    pub fn members(&self) -> &[FamilyMember] {
        &self.members
    }

    /// Parameter values in ascending order.
    pub fn parameters(&self) -> Vec<f64> {
        self.members.iter().map(|m| m.parameter).collect()
    }

    /// Number of surfaces.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the family is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::UniformAxis;

    fn surface(title: &str) -> DenseSurface {
        let x = UniformAxis::new(1, 0.0, 1.0).unwrap();
        let y = UniformAxis::new(1, 0.0, 1.0).unwrap();
        DenseSurface::new(title, x, y)
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut family = SurfaceFamily::new();
        for p in [3.0, 1.0, 2.0] {
            family.insert(p, surface("s"));
        }
        assert_eq!(family.parameters(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_insert_replaces_same_key() {
        let mut family = SurfaceFamily::new();
        family.insert(1.5, surface("old"));
        family.insert(1.5 + 1e-9, surface("new"));
        assert_eq!(family.len(), 1);
        assert_eq!(family.get(1.5).unwrap().title(), "new");
    }

    #[test]
    fn test_get_missing() {
        let family = SurfaceFamily::new();
        assert!(family.get(1.0).is_none());
        assert!(family.is_empty());
    }
}
