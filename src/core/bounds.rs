use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

/// Geographic bounding box in degrees.
///
/// A box is either built from at least one coordinate or not built at all;
/// consumers represent the "no extent yet" case as `Option<BoundingBox>`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Degenerate box covering a single coordinate
    pub fn from_point(point: &LatLng) -> Self {
        Self::new(point.lat, point.lat, point.lng, point.lng)
    }

    /// Extends the box to include a coordinate
    pub fn extend(&mut self, point: &LatLng) {
        self.min_lat = self.min_lat.min(point.lat);
        self.max_lat = self.max_lat.max(point.lat);
        self.min_lon = self.min_lon.min(point.lng);
        self.max_lon = self.max_lon.max(point.lng);
    }

    /// Checks if the box contains a coordinate
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lng >= self.min_lon
            && point.lng <= self.max_lon
    }

    /// Checks if the box intersects with another box
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !(other.max_lat < self.min_lat
            || other.min_lat > self.max_lat
            || other.max_lon < self.min_lon
            || other.min_lon > self.max_lon)
    }

    /// Gets the center coordinate of the box
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    /// Returns the union of this box with another box
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(
            self.min_lat.min(other.min_lat),
            self.max_lat.max(other.max_lat),
            self.min_lon.min(other.min_lon),
            self.max_lon.max(other.max_lon),
        )
    }

    /// A box is valid when min does not exceed max on either axis
    pub fn is_valid(&self) -> bool {
        self.min_lat <= self.max_lat && self.min_lon <= self.max_lon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_from_point() {
        let mut bbox = BoundingBox::from_point(&LatLng::new(20.0, 10.0));
        bbox.extend(&LatLng::new(40.0, 30.0));

        assert_eq!(bbox.min_lat, 20.0);
        assert_eq!(bbox.max_lat, 40.0);
        assert_eq!(bbox.min_lon, 10.0);
        assert_eq!(bbox.max_lon, 30.0);
        assert!(bbox.is_valid());
    }

    #[test]
    fn test_contains() {
        let bbox = BoundingBox::new(40.0, 41.0, -75.0, -73.0);

        assert!(bbox.contains(&LatLng::new(40.5, -74.0)));
        assert!(!bbox.contains(&LatLng::new(42.0, -74.0)));
    }

    #[test]
    fn test_intersects() {
        let a = BoundingBox::new(0.0, 10.0, 0.0, 10.0);
        let b = BoundingBox::new(5.0, 15.0, 5.0, 15.0);
        let c = BoundingBox::new(20.0, 30.0, 20.0, 30.0);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_union() {
        let a = BoundingBox::new(0.0, 10.0, 0.0, 10.0);
        let b = BoundingBox::new(-5.0, 5.0, 5.0, 15.0);
        let u = a.union(&b);

        assert_eq!(u, BoundingBox::new(-5.0, 10.0, 0.0, 15.0));
    }
}
