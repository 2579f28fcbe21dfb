use wavepath_core::Point;

/// Unit steps in expansion and backtracking order: west, east, north, south.
///
/// Both backends (and the WGSL kernels) must scan neighbours in exactly this
/// order; it is the tie-break that makes reconstructed paths identical.
pub const DIRECTIONS: [Point; 4] = [
    Point::new(-1, 0),
    Point::new(1, 0),
    Point::new(0, -1),
    Point::new(0, 1),
];

/// The four axis-aligned neighbours of `p` in [`DIRECTIONS`] order.
///
/// Neighbours may lie outside any grid; callers filter them.
#[inline]
pub fn cardinal(p: Point) -> [Point; 4] {
    DIRECTIONS.map(|d| p + d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_west_east_north_south() {
        let p = Point::new(5, 5);
        assert_eq!(
            cardinal(p),
            [
                Point::new(4, 5),
                Point::new(6, 5),
                Point::new(5, 4),
                Point::new(5, 6),
            ]
        );
    }
}
