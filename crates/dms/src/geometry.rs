//! Planar geometry on normalized landmarks

use landmark_feed::Landmark;

/// Euclidean distance in the image plane; `z` is ignored
pub fn distance(a: &Landmark, b: &Landmark) -> f32 {
    (a.x - b.x).hypot(a.y - b.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Landmark::new(0.0, 0.0);
        let b = Landmark::new(0.3, 0.4);
        assert!((distance(&a, &b) - 0.5).abs() < 1e-6);
        assert_eq!(distance(&a, &a), 0.0);
    }

    #[test]
    fn test_distance_ignores_depth() {
        let a = Landmark { x: 0.1, y: 0.1, z: 0.0 };
        let b = Landmark { x: 0.1, y: 0.1, z: 5.0 };
        assert_eq!(distance(&a, &b), 0.0);
    }

    #[test]
    fn test_distance_symmetric() {
        let a = Landmark::new(0.12, 0.7);
        let b = Landmark::new(0.9, 0.05);
        assert_eq!(distance(&a, &b), distance(&b, &a));
    }
}
