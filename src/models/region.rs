//! Travel-time region (isochrone) geometry.

use geo::coordinate_position::{CoordPos, CoordinatePosition};
use geo::{BoundingRect, Coord, LineString, MultiPolygon, Polygon};

use super::GeoPoint;
use crate::error::{Error, Result};

/// Where a point lies relative to a region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Inside,
    Boundary,
    Outside,
}

/// A reachable area, stored in lon/lat order like every geo geometry
#[derive(Debug, Clone)]
pub struct Region {
    geometry: MultiPolygon<f64>,
}

impl Region {
    pub fn new(geometry: MultiPolygon<f64>) -> Self {
        Self { geometry }
    }

    /// Build a single-polygon region from GeoPoint rings.
    ///
    /// Rings are closed if needed; each needs at least three distinct vertices.
    pub fn from_rings(exterior: &[GeoPoint], holes: &[Vec<GeoPoint>]) -> Result<Self> {
        let exterior = close_ring(exterior)?;
        let holes = holes
            .iter()
            .map(|h| close_ring(h))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(MultiPolygon::new(vec![Polygon::new(exterior, holes)])))
    }

    pub fn geometry(&self) -> &MultiPolygon<f64> {
        &self.geometry
    }

    /// Boundary-inclusive containment
    pub fn contains(&self, point: GeoPoint) -> bool {
        self.membership(point) != Membership::Outside
    }

    pub fn membership(&self, point: GeoPoint) -> Membership {
        let coord: Coord<f64> = point.into();
        match self.geometry.coordinate_position(&coord) {
            CoordPos::Inside => Membership::Inside,
            CoordPos::OnBoundary => Membership::Boundary,
            CoordPos::Outside => Membership::Outside,
        }
    }

    /// Bounding box as ([min_lon, min_lat], [max_lon, max_lat])
    pub fn envelope(&self) -> Option<([f64; 2], [f64; 2])> {
        self.geometry
            .bounding_rect()
            .map(|rect| ([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]))
    }
}

fn close_ring(vertices: &[GeoPoint]) -> Result<LineString<f64>> {
    let mut ring: Vec<Coord<f64>> = vertices.iter().map(|p| (*p).into()).collect();

    if ring.first() != ring.last() {
        if let Some(first) = ring.first().copied() {
            ring.push(first);
        }
    }

    // closed ring: three vertices plus the repeated first one
    if ring.len() < 4 {
        return Err(Error::InvalidInput(format!(
            "region ring needs at least 3 vertices, got {}",
            vertices.len()
        )));
    }

    Ok(LineString::new(ring))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn square() -> Region {
        Region::from_rings(
            &[pt(51.4, -0.2), pt(51.6, -0.2), pt(51.6, 0.0), pt(51.4, 0.0)],
            &[],
        )
        .unwrap()
    }

    #[test]
    fn test_membership() {
        let region = square();
        assert_eq!(region.membership(pt(51.5, -0.1)), Membership::Inside);
        assert_eq!(region.membership(pt(51.3, -0.1)), Membership::Outside);
        assert_eq!(region.membership(pt(51.4, -0.2)), Membership::Boundary);
        assert_eq!(region.membership(pt(51.5, 0.0)), Membership::Boundary);
        assert!(region.contains(pt(51.6, 0.0)));
    }

    #[test]
    fn test_hole_excluded() {
        let hole = vec![pt(51.45, -0.15), pt(51.55, -0.15), pt(51.55, -0.05), pt(51.45, -0.05)];
        let region = Region::from_rings(
            &[pt(51.4, -0.2), pt(51.6, -0.2), pt(51.6, 0.0), pt(51.4, 0.0)],
            &[hole],
        )
        .unwrap();

        assert!(!region.contains(pt(51.5, -0.1)));
        assert!(region.contains(pt(51.42, -0.18)));
    }

    #[test]
    fn test_degenerate_ring_rejected() {
        assert!(Region::from_rings(&[pt(0.0, 0.0), pt(1.0, 1.0)], &[]).is_err());
    }

    #[test]
    fn test_envelope() {
        let (min, max) = square().envelope().unwrap();
        assert_eq!(min, [-0.2, 51.4]);
        assert_eq!(max, [0.0, 51.6]);
    }
}
