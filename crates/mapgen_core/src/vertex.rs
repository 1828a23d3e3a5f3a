//! Vertex geometry on a toroidal map grid.
//!
//! Map edges wrap in both directions, so every distance and neighbourhood
//! query here takes the wraparound into account. Distances are evaluated
//! with fixed-point arithmetic so that every platform computes the same
//! value for the same pair of vertices.
//!
//! The grid is a staggered hexagon layout: odd rows are shifted half a
//! vertex to the right, which is why map heights must be even for the
//! wrap to line up.

use fixed::types::I32F32;
use serde::{Deserialize, Serialize};

/// Fixed-point number type used for distance math.
pub type Fixed = I32F32;

/// Map dimensions in vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MapExtent {
    /// Width.
    pub x: u16,
    /// Height.
    pub y: u16,
}

impl MapExtent {
    /// Create a new extent.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Number of vertices covered by this extent.
    #[must_use]
    pub const fn area(self) -> usize {
        self.x as usize * self.y as usize
    }

    /// The smaller of both dimensions.
    #[must_use]
    pub fn min_dim(self) -> u16 {
        self.x.min(self.y)
    }

    /// Center vertex of the map.
    #[must_use]
    pub const fn center(self) -> Position {
        Position::new(self.x as i32 / 2, self.y as i32 / 2)
    }
}

impl std::fmt::Display for MapExtent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.x, self.y)
    }
}

/// A vertex on the map, always in bounds once produced by [`wrap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MapPoint {
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
}

impl MapPoint {
    /// Marker for an unassigned player start.
    pub const INVALID: Self = Self { x: 0xFF, y: 0xFF };

    /// Create a new map point.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Returns true unless this is the [`MapPoint::INVALID`] sentinel.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        !(self.x == Self::INVALID.x && self.y == Self::INVALID.y)
    }
}

impl Default for MapPoint {
    fn default() -> Self {
        Self::INVALID
    }
}

impl From<MapPoint> for Position {
    fn from(pt: MapPoint) -> Self {
        Self::new(i32::from(pt.x), i32::from(pt.y))
    }
}

/// A signed grid position; may lie outside the map until wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

/// Wrap a position into the map bounds.
#[must_use]
pub fn wrap(pos: Position, size: MapExtent) -> MapPoint {
    let w = i32::from(size.x);
    let h = i32::from(size.y);
    MapPoint::new(pos.x.rem_euclid(w) as u16, pos.y.rem_euclid(h) as u16)
}

/// Row-major index of a vertex.
#[must_use]
pub fn index(pt: MapPoint, size: MapExtent) -> usize {
    pt.y as usize * size.x as usize + pt.x as usize
}

/// Inverse of [`index`].
#[must_use]
pub fn position(index: usize, size: MapExtent) -> MapPoint {
    let w = size.x as usize;
    MapPoint::new((index % w) as u16, (index / w) as u16)
}

/// Squared toroidal distance in whole vertices.
#[must_use]
pub fn distance_squared(p1: Position, p2: Position, size: MapExtent) -> u64 {
    let w = i64::from(size.x);
    let h = i64::from(size.y);
    let dx = (i64::from(p1.x) - i64::from(p2.x)).rem_euclid(w);
    let dy = (i64::from(p1.y) - i64::from(p2.y)).rem_euclid(h);
    let dx = dx.min(w - dx);
    let dy = dy.min(h - dy);
    (dx * dx + dy * dy) as u64
}

/// Euclidean distance between two positions on the wrapping map.
#[must_use]
pub fn distance_fixed(p1: Position, p2: Position, size: MapExtent) -> Fixed {
    fixed_sqrt(distance_squared(p1, p2, size))
}

/// Euclidean distance between two positions on the wrapping map.
///
/// Each axis uses the shorter of the direct and the wrapped offset.
#[must_use]
pub fn distance(p1: Position, p2: Position, size: MapExtent) -> f64 {
    distance_fixed(p1, p2, size).to_num::<f64>()
}

/// Largest distance any vertex can have from any other on this map.
#[must_use]
pub fn max_distance(size: MapExtent) -> f64 {
    let half = Position::new(i32::from(size.x / 2), i32::from(size.y / 2));
    distance(Position::default(), half, size)
}

/// Square root of a whole number in fixed-point.
///
/// Perfect squares come out exact; other values are refined by bisection
/// between the neighbouring integers.
fn fixed_sqrt(value: u64) -> Fixed {
    let mut root = (value as f64).sqrt() as u64;
    while root * root > value {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= value {
        root += 1;
    }
    if root * root == value {
        return Fixed::from_num(root);
    }

    let target = Fixed::saturating_from_num(value);
    let mut low = Fixed::from_num(root);
    let mut high = low + Fixed::ONE;
    for _ in 0..32 {
        let mid = (low + high) / Fixed::from_num(2);
        if mid.saturating_mul(mid) <= target {
            low = mid;
        } else {
            high = mid;
        }
    }
    low
}

/// The six neighbours of a vertex on the staggered hex grid.
///
/// Order: west, east, north-west, north-east, south-west, south-east.
#[must_use]
pub fn neighbours(pt: MapPoint, size: MapExtent) -> [MapPoint; 6] {
    let p = Position::from(pt);
    // Odd rows sit half a vertex further east.
    let shift = i32::from(pt.y % 2);
    let offsets = [
        Position::new(-1, 0),
        Position::new(1, 0),
        Position::new(shift - 1, -1),
        Position::new(shift, -1),
        Position::new(shift - 1, 1),
        Position::new(shift, 1),
    ];
    offsets.map(|o| wrap(p + o, size))
}

/// All vertices within `radius` of `center`, center included.
///
/// The result is ordered by distance, then by row-major index, and never
/// contains a vertex twice even when the radius exceeds half the map.
#[must_use]
pub fn points_in_radius(center: MapPoint, radius: u16, size: MapExtent) -> Vec<MapPoint> {
    let c = Position::from(center);
    let r = i32::from(radius);
    let r_sq = u64::from(radius) * u64::from(radius);
    let mut seen = vec![false; size.area()];
    let mut points = Vec::new();

    for dy in -r..=r {
        for dx in -r..=r {
            let pt = wrap(c + Position::new(dx, dy), size);
            let idx = index(pt, size);
            if seen[idx] {
                continue;
            }
            let dist_sq = distance_squared(c, Position::from(pt), size);
            if dist_sq <= r_sq {
                seen[idx] = true;
                points.push((dist_sq, idx, pt));
            }
        }
    }

    points.sort_unstable_by_key(|&(d, i, _)| (d, i));
    points.into_iter().map(|(_, _, pt)| pt).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(x: u16, y: u16) -> MapExtent {
        MapExtent::new(x, y)
    }

    #[test]
    fn test_distance_direct() {
        let d = distance(Position::new(0, 0), Position::new(3, 4), size(32, 32));
        assert_eq!(d, 5.0);
    }

    #[test]
    fn test_distance_wraps_both_axes() {
        // (1,1) and (31,31) are two steps apart on each axis across the edge.
        let d_sq = distance_squared(Position::new(1, 1), Position::new(31, 31), size(32, 32));
        assert_eq!(d_sq, 8);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let s = size(38, 30);
        let a = Position::new(2, 27);
        let b = Position::new(30, 5);
        assert_eq!(distance(a, b, s), distance(b, a, s));
    }

    #[test]
    fn test_distance_accepts_unwrapped_positions() {
        let s = size(20, 20);
        let a = distance(Position::new(-1, 0), Position::new(1, 0), s);
        let b = distance(Position::new(19, 0), Position::new(1, 0), s);
        assert_eq!(a, b);
        assert_eq!(a, 2.0);
    }

    #[test]
    fn test_fixed_sqrt_precision() {
        let two = fixed_sqrt(2).to_num::<f64>();
        assert!((two - std::f64::consts::SQRT_2).abs() < 1e-6);
        assert_eq!(fixed_sqrt(0), Fixed::ZERO);
        assert_eq!(fixed_sqrt(10_000), Fixed::from_num(100));
    }

    #[test]
    fn test_index_roundtrip() {
        let s = size(30, 20);
        let pt = MapPoint::new(7, 13);
        assert_eq!(position(index(pt, s), s), pt);
    }

    #[test]
    fn test_wrap_negative() {
        let s = size(16, 18);
        assert_eq!(wrap(Position::new(-1, -1), s), MapPoint::new(15, 17));
        assert_eq!(wrap(Position::new(16, 36), s), MapPoint::new(0, 0));
    }

    #[test]
    fn test_neighbours_wrap_on_even_and_odd_rows() {
        let s = size(16, 16);
        let even = neighbours(MapPoint::new(0, 0), s);
        assert_eq!(even[0], MapPoint::new(15, 0));
        assert_eq!(even[2], MapPoint::new(15, 15));
        assert_eq!(even[3], MapPoint::new(0, 15));

        let odd = neighbours(MapPoint::new(15, 1), s);
        assert_eq!(odd[1], MapPoint::new(0, 1));
        assert_eq!(odd[3], MapPoint::new(0, 0));
        assert_eq!(odd[5], MapPoint::new(0, 2));
    }

    #[test]
    fn test_points_in_radius_ordered_and_unique() {
        let s = size(16, 16);
        let pts = points_in_radius(MapPoint::new(0, 0), 1, s);
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[0], MapPoint::new(0, 0));

        // Radius larger than the map covers each vertex exactly once.
        let all = points_in_radius(MapPoint::new(3, 3), 40, s);
        assert_eq!(all.len(), s.area());
    }

    #[test]
    fn test_invalid_sentinel() {
        assert!(!MapPoint::INVALID.is_valid());
        assert!(MapPoint::new(0, 0).is_valid());
        assert_eq!(MapPoint::default(), MapPoint::INVALID);
    }
}
