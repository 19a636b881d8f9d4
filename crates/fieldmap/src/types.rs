use crate::geometry::{self, PolygonId};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A `(latitude, longitude)` pair, stored on disk as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng(pub f64, pub f64);

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self(lat, lng)
    }

    pub fn lat(&self) -> f64 {
        self.0
    }

    pub fn lng(&self) -> f64 {
        self.1
    }

    /// JSON has no representation for NaN or infinity.
    pub fn is_finite(&self) -> bool {
        self.0.is_finite() && self.1.is_finite()
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self(lat, lng)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.0, self.1)
    }
}

/// A named field boundary with its derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub id: PolygonId,
    /// User label. Empty for polygons created by a draw gesture.
    pub name: String,
    /// Closed ring; the last vertex connects back to the first.
    pub coordinates: Vec<LatLng>,
    /// Vertex mean of `coordinates` as of the last recompute.
    pub centroid: LatLng,
    /// Shoelace area of `coordinates` as of the last recompute.
    /// `None` for records persisted before an area was computed.
    pub area: Option<f64>,
}

impl Polygon {
    /// Build a record with derived fields computed from `coordinates`.
    pub fn new(id: PolygonId, name: impl Into<String>, coordinates: Vec<LatLng>) -> Self {
        let mut polygon = Self {
            id,
            name: name.into(),
            coordinates,
            centroid: LatLng::new(0.0, 0.0),
            area: None,
        };
        polygon.recompute();
        polygon
    }

    /// Refresh `centroid` and `area` from the current coordinates.
    ///
    /// Metrics that overflow are not stored: the centroid keeps its previous
    /// value and the area becomes `None`.
    pub fn recompute(&mut self) {
        let centroid = geometry::centroid(&self.coordinates);
        if centroid.is_finite() {
            self.centroid = centroid;
        }
        let area = geometry::area(&self.coordinates);
        self.area = area.is_finite().then_some(area);
    }

    /// Sidebar text for the area. A zero or missing area reads as unavailable.
    pub fn area_label(&self) -> String {
        match self.area {
            Some(area) if area != 0.0 && !area.is_nan() => {
                format!("Area: {area:.2} hectares")
            }
            _ => "Area not available".to_string(),
        }
    }
}

/// Reject rings that cannot be stored: non-finite vertices, or vertices so
/// large that the centroid or area overflows.
pub fn check_ring(ring: &[LatLng]) -> Result<()> {
    if let Some(point) = ring.iter().find(|p| !p.is_finite()) {
        return Err(anyhow!("ring vertex {point:?} is not finite"));
    }
    if !geometry::centroid(ring).is_finite() {
        return Err(anyhow!("ring centroid overflows"));
    }
    if !geometry::area(ring).is_finite() {
        return Err(anyhow!("ring area overflows"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latlng_serializes_as_pair() {
        let point = LatLng::new(23.6345, -102.5528);
        let json = serde_json::to_string(&point).expect("serialize");
        assert_eq!(json, "[23.6345,-102.5528]");
        let parsed: LatLng = serde_json::from_str("[1.5,2.5]").expect("deserialize");
        assert_eq!(parsed, LatLng::new(1.5, 2.5));
    }

    #[test]
    fn test_polygon_new_computes_metrics() {
        let polygon = Polygon::new(
            PolygonId::new(1),
            "Field A",
            vec![
                LatLng::new(0.0, 0.0),
                LatLng::new(0.0, 2.0),
                LatLng::new(2.0, 2.0),
                LatLng::new(2.0, 0.0),
            ],
        );
        assert_eq!(polygon.area, Some(4.0));
        assert_eq!(polygon.centroid, LatLng::new(1.0, 1.0));
    }

    #[test]
    fn test_polygon_reads_null_area() {
        let json = r#"{"id":2,"name":"","coordinates":[[0,0],[0,1],[1,1]],"centroid":[0,0],"area":null}"#;
        let polygon: Polygon = serde_json::from_str(json).expect("deserialize");
        assert_eq!(polygon.id, PolygonId::new(2));
        assert_eq!(polygon.area, None);
        assert_eq!(polygon.coordinates.len(), 3);
    }

    #[test]
    fn test_polygon_writes_layout() {
        let polygon = Polygon::new(PolygonId::new(5), "North", vec![LatLng::new(1.0, 2.0)]);
        let value = serde_json::to_value(&polygon).expect("serialize");
        assert_eq!(value["id"], 5);
        assert_eq!(value["name"], "North");
        assert_eq!(value["coordinates"][0][1], 2.0);
        assert_eq!(value["centroid"][0], 1.0);
        assert_eq!(value["area"], 0.0);
    }

    fn huge_ring() -> Vec<LatLng> {
        vec![
            LatLng::new(1e308, 0.0),
            LatLng::new(1e308, 1.0),
            LatLng::new(1e308, 2.0),
        ]
    }

    #[test]
    fn test_recompute_overflow_keeps_storable_values() {
        let mut polygon = Polygon::new(PolygonId::new(1), "Far", Vec::new());
        polygon.coordinates = huge_ring();
        polygon.recompute();

        assert_eq!(polygon.centroid, LatLng::new(0.0, 0.0));
        assert_eq!(polygon.area, None);

        let json = serde_json::to_string(&polygon).expect("serialize");
        let restored: Polygon = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, polygon);
    }

    #[test]
    fn test_check_ring() {
        assert!(check_ring(&[]).is_ok());
        assert!(check_ring(&[LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0)]).is_ok());
        assert!(check_ring(&huge_ring()).is_err());
        assert!(check_ring(&[LatLng::new(f64::NAN, 0.0)]).is_err());
        assert!(check_ring(&[LatLng::new(0.0, f64::INFINITY)]).is_err());
    }

    #[test]
    fn test_area_label() {
        let mut polygon = Polygon::new(PolygonId::new(1), "A", Vec::new());
        assert_eq!(polygon.area_label(), "Area not available");

        polygon.area = None;
        assert_eq!(polygon.area_label(), "Area not available");

        polygon.area = Some(4.0);
        assert_eq!(polygon.area_label(), "Area: 4.00 hectares");

        polygon.area = Some(0.123456);
        assert_eq!(polygon.area_label(), "Area: 0.12 hectares");
    }
}
