// ============================================================================
// SHAPE GEOMETRY - distance fields used by the stroke rasterizer
// ============================================================================

/// Distance from `(px, py)` to the segment `a → b`.
/// A zero-length segment measures the distance to `a`.
#[inline]
pub fn sdf_line_segment(px: f32, py: f32, ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let dx = bx - ax;
    let dy = by - ay;
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > f32::EPSILON {
        (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let cx = ax + t * dx;
    let cy = ay + t * dy;
    ((px - cx) * (px - cx) + (py - cy) * (py - cy)).sqrt()
}

/// Inclusive pixel bounds `(min_x, min_y, max_x, max_y)` of a capsule of
/// `radius` around `a → b`, clipped to a `width × height` canvas.
/// `None` when the capsule lies entirely off-canvas.
pub fn capsule_bounds(
    a: (f32, f32),
    b: (f32, f32),
    radius: f32,
    width: u32,
    height: u32,
) -> Option<(u32, u32, u32, u32)> {
    if width == 0 || height == 0 {
        return None;
    }
    let min_x = (a.0.min(b.0) - radius).floor();
    let min_y = (a.1.min(b.1) - radius).floor();
    let max_x = (a.0.max(b.0) + radius).ceil();
    let max_y = (a.1.max(b.1) + radius).ceil();
    if max_x < 0.0 || max_y < 0.0 || min_x > (width - 1) as f32 || min_y > (height - 1) as f32 {
        return None;
    }
    Some((
        min_x.max(0.0) as u32,
        min_y.max(0.0) as u32,
        (max_x as u32).min(width - 1),
        (max_y as u32).min(height - 1),
    ))
}

/// Inclusive pixel bounds of the axis-aligned square of side `2 * half`
/// centred on `center`, clipped to the canvas.
pub fn square_bounds(
    center: (f32, f32),
    half: u32,
    width: u32,
    height: u32,
) -> Option<(u32, u32, u32, u32)> {
    capsule_bounds(center, center, half as f32, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_vertical_segment() {
        assert_eq!(sdf_line_segment(12.0, 30.0, 10.0, 10.0, 10.0, 50.0), 2.0);
        // Beyond the end cap the distance is measured to the endpoint.
        assert_eq!(sdf_line_segment(10.0, 53.0, 10.0, 10.0, 10.0, 50.0), 3.0);
    }

    #[test]
    fn degenerate_segment_is_a_point() {
        let d = sdf_line_segment(3.0, 4.0, 0.0, 0.0, 0.0, 0.0);
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn bounds_are_clipped_to_canvas() {
        assert_eq!(
            capsule_bounds((1.0, 1.0), (5.0, 2.0), 2.5, 100, 100),
            Some((0, 0, 8, 5))
        );
        assert_eq!(
            capsule_bounds((95.0, 95.0), (120.0, 99.0), 1.0, 100, 100),
            Some((94, 94, 99, 99))
        );
    }

    #[test]
    fn offscreen_capsule_has_no_bounds() {
        assert_eq!(capsule_bounds((-20.0, 5.0), (-10.0, 5.0), 2.0, 50, 50), None);
        assert_eq!(square_bounds((70.0, 70.0), 3, 50, 50), None);
    }
}
