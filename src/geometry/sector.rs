/// Point at `radius` along `angle_deg`, measured clockwise from +x in screen space.
pub fn polar(cx: f64, cy: f64, radius: f64, angle_deg: f64) -> (f64, f64) {
    let rad = angle_deg.to_radians();
    (cx + radius * rad.cos(), cy + radius * rad.sin())
}

/// SVG path for an annular sector: radial edge out, outer arc clockwise,
/// radial edge in, inner arc back to the start.
pub fn annular_sector_path(
    cx: f64,
    cy: f64,
    inner_radius: f64,
    outer_radius: f64,
    start_angle: f64,
    sweep: f64,
) -> String {
    let end_angle = start_angle + sweep;

    let (x1, y1) = polar(cx, cy, inner_radius, start_angle);
    let (x2, y2) = polar(cx, cy, outer_radius, start_angle);
    let (x3, y3) = polar(cx, cy, outer_radius, end_angle);
    let (x4, y4) = polar(cx, cy, inner_radius, end_angle);

    let large_arc = if sweep > 180.0 { 1 } else { 0 };

    [
        format!("M {:.3} {:.3}", x1, y1),
        format!("L {:.3} {:.3}", x2, y2),
        format!(
            "A {:.3} {:.3} 0 {} 1 {:.3} {:.3}",
            outer_radius, outer_radius, large_arc, x3, y3
        ),
        format!("L {:.3} {:.3}", x4, y4),
        format!(
            "A {:.3} {:.3} 0 {} 0 {:.3} {:.3}",
            inner_radius, inner_radius, large_arc, x1, y1
        ),
        "Z".to_string(),
    ]
    .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polar_screen_convention() {
        let (x, y) = polar(200.0, 200.0, 100.0, 90.0);
        assert!((x - 200.0).abs() < 1e-9);
        assert!((y - 300.0).abs() < 1e-9);

        let (x, y) = polar(200.0, 200.0, 100.0, -90.0);
        assert!((x - 200.0).abs() < 1e-9);
        assert!((y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_large_arc_flag() {
        let small = annular_sector_path(0.0, 0.0, 10.0, 20.0, 0.0, 120.0);
        let large = annular_sector_path(0.0, 0.0, 10.0, 20.0, 0.0, 200.0);
        assert!(small.contains(" 0 0 1 "));
        assert!(large.contains(" 0 1 1 "));
        assert!(large.ends_with('Z'));
    }
}
