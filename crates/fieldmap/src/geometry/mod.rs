use crate::types::LatLng;

pub mod ids;

pub use ids::PolygonId;

/// Vertex mean of a ring.
///
/// This is not the area-weighted centroid: every vertex counts once, so the
/// result shifts toward densely sampled edges. An empty ring yields `(0, 0)`.
pub fn centroid(ring: &[LatLng]) -> LatLng {
    if ring.is_empty() {
        return LatLng::new(0.0, 0.0);
    }

    let (lat_sum, lng_sum) = ring
        .iter()
        .fold((0.0, 0.0), |(lat, lng), point| (lat + point.lat(), lng + point.lng()));
    let count = ring.len() as f64;
    LatLng::new(lat_sum / count, lng_sum / count)
}

/// Shoelace area of a ring, halved, without taking the magnitude.
///
/// Latitude is treated as `x` and longitude as `y`. The ring closes implicitly
/// from the last vertex back to the first.
pub fn signed_area(ring: &[LatLng]) -> f64 {
    let n = ring.len();
    let mut sum = 0.0;
    for i in 0..n {
        let current = ring[i];
        let next = ring[(i + 1) % n];
        sum += current.lat() * next.lng() - current.lng() * next.lat();
    }
    sum / 2.0
}

/// Planar area of a ring in squared coordinate units (degrees, for map input).
///
/// Rings with fewer than three vertices have zero area.
pub fn area(ring: &[LatLng]) -> f64 {
    signed_area(ring).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<LatLng> {
        vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 2.0),
            LatLng::new(2.0, 2.0),
            LatLng::new(2.0, 0.0),
        ]
    }

    #[test]
    fn test_centroid_empty_is_origin() {
        assert_eq!(centroid(&[]), LatLng::new(0.0, 0.0));
    }

    #[test]
    fn test_centroid_square() {
        assert_eq!(centroid(&square()), LatLng::new(1.0, 1.0));
    }

    #[test]
    fn test_centroid_is_vertex_mean() {
        // Extra vertex along one edge pulls the mean, unlike an area centroid.
        let ring = vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 2.0),
            LatLng::new(2.0, 2.0),
            LatLng::new(2.0, 1.0),
            LatLng::new(2.0, 0.0),
        ];
        let c = centroid(&ring);
        assert!((c.lat() - 1.2).abs() < 1e-12);
        assert!((c.lng() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_area_square() {
        assert_eq!(area(&square()), 4.0);
    }

    #[test]
    fn test_area_degenerate_rings() {
        assert_eq!(area(&[]), 0.0);
        assert_eq!(area(&[LatLng::new(1.0, 1.0)]), 0.0);
        assert_eq!(area(&[LatLng::new(1.0, 1.0), LatLng::new(3.0, 5.0)]), 0.0);
    }

    #[test]
    fn test_area_ignores_winding() {
        let mut reversed = square();
        reversed.reverse();
        assert_eq!(area(&reversed), area(&square()));
        assert_eq!(signed_area(&reversed), -signed_area(&square()));
    }

    #[test]
    fn test_area_explicitly_closed_ring() {
        // Repeating the first vertex adds a zero-length edge.
        let mut closed = square();
        closed.push(LatLng::new(0.0, 0.0));
        assert_eq!(area(&closed), 4.0);
    }

    #[test]
    fn test_area_triangle() {
        let triangle = vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(4.0, 0.0),
            LatLng::new(0.0, 3.0),
        ];
        assert_eq!(area(&triangle), 6.0);
        assert!(signed_area(&triangle) > 0.0);
    }
}
