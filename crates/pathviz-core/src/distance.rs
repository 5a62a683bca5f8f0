use crate::geom::Point;

/// Manhattan (L1) distance between two points.
///
/// This is the search heuristic even though moves are 8-directional, so it
/// can overestimate along diagonals.
#[inline]
pub fn manhattan(a: Point, b: Point) -> u32 {
    (a.x - b.x).unsigned_abs() + (a.y - b.y).unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_sums_axis_deltas() {
        assert_eq!(manhattan(Point::new(0, 0), Point::new(4, 4)), 8);
        assert_eq!(manhattan(Point::new(3, 1), Point::new(1, 2)), 3);
        assert_eq!(manhattan(Point::new(2, 2), Point::new(2, 2)), 0);
    }
}
