//! Snapping to a grid quantum.

/// Snaps `pos` to the largest multiple of `grid` less than or equal to `pos`.
///
/// # Example
///
/// ```
/// # use geometry::prelude::*;
/// assert_eq!(snap_down(39, 20), 20);
/// assert_eq!(snap_down(40, 20), 40);
/// assert_eq!(snap_down(-1, 20), -20);
/// ```
pub const fn snap_down(pos: i64, grid: i64) -> i64 {
    assert!(grid > 0);
    pos - pos.rem_euclid(grid)
}

/// Snaps `pos` to the smallest multiple of `grid` greater than or equal to `pos`.
///
/// # Example
///
/// ```
/// # use geometry::prelude::*;
/// assert_eq!(snap_up(21, 20), 40);
/// assert_eq!(snap_up(40, 20), 40);
/// assert_eq!(snap_up(-1, 20), 0);
/// ```
pub const fn snap_up(pos: i64, grid: i64) -> i64 {
    assert!(grid > 0);
    let rem = pos.rem_euclid(grid);
    if rem == 0 {
        pos
    } else {
        pos + grid - rem
    }
}
